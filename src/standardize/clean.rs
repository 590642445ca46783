use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::markup;

// "^(in SGD)^" style unit annotations in published headers.
static ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\^\([^)]+\)\^").unwrap());

/// A standardized value: a parsed number, or the source text when it would not parse.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            // Debug keeps the ".0" on whole numbers, so the output parses back to itself.
            Cell::Number(n) => write!(f, "{:?}", n),
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

pub fn clean_column_name(name: &str) -> String {
    ANNOTATION_RE.replace_all(name, "").replace("**", "").trim().to_string()
}

/// `"$1,234,567"` → `1234567.0`. Non-numeric text is kept as-is.
pub fn clean_currency(cell: Cell) -> Cell {
    coerce(cell, &['$', ','])
}

/// `"45.6%"` → `45.6`. Non-numeric text is kept as-is.
pub fn clean_percentage(cell: Cell) -> Cell {
    coerce(cell, &['%', ','])
}

fn coerce(cell: Cell, strip: &[char]) -> Cell {
    match cell {
        Cell::Text(text) => {
            let stripped: String = text.chars().filter(|c| !strip.contains(c)).collect();
            match stripped.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Cell::Number(n),
                _ => Cell::Text(text),
            }
        }
        number => number,
    }
}

/// Website for a name cell: the first anchor's `href`, else the whole text if it
/// looks like a URL, else empty.
pub fn extract_website(name: &str) -> String {
    if let Some(href) = markup::anchor_href(name) {
        return href;
    }
    if name.contains("http") {
        name.to_string()
    } else {
        String::new()
    }
}

pub fn clean_name(name: &str) -> String {
    markup::to_plain_text(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn column_names() {
        assert_eq!(clean_column_name("Revenue 2018^(in SGD)^**"), "Revenue 2018");
        assert_eq!(clean_column_name(" Absolute growth rate^(in %)^ "), "Absolute growth rate");
        assert_eq!(clean_column_name("**Rank**"), "Rank");
        assert_eq!(clean_column_name("Revenue 2018 (in SGD)"), "Revenue 2018 (in SGD)");
    }

    #[test]
    fn column_names_idempotent() {
        for raw in ["Revenue 2018^(in SGD)^**", "Name", "CAGR^(in %)^"] {
            let once = clean_column_name(raw);
            assert_eq!(clean_column_name(&once), once);
        }
    }

    #[test]
    fn currency() {
        assert_eq!(clean_currency(text("$1,234,567")), Cell::Number(1234567.0));
        assert_eq!(clean_currency(text(" $900 ")), Cell::Number(900.0));
        assert_eq!(clean_currency(text("N/A")), text("N/A"));
        assert_eq!(clean_currency(text("")), text(""));
        assert_eq!(clean_currency(text("nan")), text("nan"));
        assert_eq!(clean_currency(Cell::Number(5.0)), Cell::Number(5.0));
    }

    #[test]
    fn percentage() {
        assert_eq!(clean_percentage(text("45.6%")), Cell::Number(45.6));
        assert_eq!(clean_percentage(text("-12.3%")), Cell::Number(-12.3));
        assert_eq!(clean_percentage(text("1,234.5%")), Cell::Number(1234.5));
        assert_eq!(clean_percentage(text("n.a.")), text("n.a."));
    }

    #[test]
    fn numbers_reparse_to_themselves() {
        for s in ["1234567.0", "45.6", "-12.3", "0.1"] {
            let n = clean_currency(text(s));
            assert_eq!(n.to_string(), s);
            assert_eq!(clean_currency(text(&n.to_string())), n);
        }
    }

    #[test]
    fn website_from_name() {
        assert_eq!(
            extract_website(r#"<a href="https://acme.sg/">Acme</a>"#),
            "https://acme.sg/"
        );
        assert_eq!(extract_website("https://bare.sg"), "https://bare.sg");
        assert_eq!(extract_website("Plain Co"), "");
        assert_eq!(
            extract_website(r#"<a href="https://x.sg/?a=1&amp;b=2">X</a>"#),
            "https://x.sg/?a=1&b=2"
        );
    }

    #[test]
    fn name_markup() {
        assert_eq!(clean_name(r#"<a href="https://acme.sg">Acme &amp; Sons</a>"#), "Acme & Sons");
        assert_eq!(clean_name("Plain"), "Plain");
        assert_eq!(
            clean_name(r#"<a href="https://c.sg">Caf&eacute; &#8217;s&nbsp;Co</a>"#),
            "Caf\u{e9} \u{2019}s\u{a0}Co"
        );
    }
}
