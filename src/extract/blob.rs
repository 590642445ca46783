use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::BlobError;
use crate::markup;

static CHART_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)chartData: "(.*?)",\n"#).unwrap());

/// Serialized table inside the page's chart script. `None` when the marker is absent.
pub fn locate_in_html(html: &str) -> Option<String> {
    CHART_DATA_RE
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Walks `key_path` through the JSON object. Every failure here is fatal.
pub fn locate_in_json(json: &str, key_path: &[String]) -> Result<String, BlobError> {
    let root: Value = serde_json::from_str(json)?;
    let mut node = &root;
    let mut walked = Vec::with_capacity(key_path.len());
    for key in key_path {
        walked.push(key.as_str());
        node = node
            .get(key)
            .ok_or_else(|| BlobError::MissingKey(walked.join(".")))?;
    }
    node.as_str()
        .map(str::to_string)
        .ok_or_else(|| BlobError::NotAString(walked.join(".")))
}

/// Undo the JS string escaping (`\t`, `\n`, `\/`) and the five HTML entities.
pub fn unescape(blob: &str) -> String {
    let text = blob
        .replace("\\t", "\t")
        .replace("\\n", "\n")
        .replace("\\/", "/");
    markup::decode_entities(&text)
}
