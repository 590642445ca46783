use crate::markup;
use crate::schema::DatasetSchema;

const NAME_COL: usize = 1;
const URL_COL: usize = 2;
const STALE_NAME_COL: usize = 3;

/// Split a linked company cell into `(display name, url)`.
///
/// Both parts are trimmed and one trailing `/` is dropped from the URL so the
/// same site joins across years. Without an anchor the cell comes back as the
/// name with an empty URL.
pub fn extract_name_and_url(cell: &str) -> (String, String) {
    match markup::find_anchor(cell) {
        Some((href, text)) => {
            let url = href.trim();
            let url = url.strip_suffix('/').unwrap_or(url);
            (text.trim().to_string(), url.to_string())
        }
        None => (cell.to_string(), String::new()),
    }
}

/// Reshape one blob row into the dataset's column layout.
pub fn restructure(mut row: Vec<String>, schema: &DatasetSchema) -> Vec<String> {
    if row.len() > NAME_COL {
        let (name, url) = extract_name_and_url(&row[NAME_COL]);
        row[NAME_COL] = name;
        row.insert(URL_COL, url);

        if schema.drop_stale_name_column
            && row.len() > schema.headers.len()
            && row.len() > STALE_NAME_COL
        {
            row.remove(STALE_NAME_COL);
        }
    }

    row.iter().map(|cell| markup::strip_tags(cell)).collect()
}

pub fn split_line(line: &str) -> Vec<String> {
    line.split('\t').map(str::to_string).collect()
}
