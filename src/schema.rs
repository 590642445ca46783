use serde::Deserialize;

use crate::error::SchemaError;

/// One dataset edition: its reference years and, for extracted years, the output header.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSchema {
    pub year: u16,
    pub period_start: u16,
    pub period_end: u16,
    #[serde(default)]
    pub headers: Vec<String>,
    /// The 2020 source repeats the company name in the column after the linked name.
    #[serde(default)]
    pub drop_stale_name_column: bool,
}

impl DatasetSchema {
    pub fn is_extractable(&self) -> bool {
        !self.headers.is_empty()
    }
}

pub fn find(datasets: &[DatasetSchema], year: u16) -> Result<&DatasetSchema, SchemaError> {
    datasets
        .iter()
        .find(|d| d.year == year)
        .ok_or(SchemaError::UnknownYear(year))
}

/// Lookup for the extraction pipelines: the year must exist and carry a header.
pub fn find_extractable(
    datasets: &[DatasetSchema],
    year: u16,
) -> Result<&DatasetSchema, SchemaError> {
    let schema = find(datasets, year)?;
    if !schema.is_extractable() {
        return Err(SchemaError::NoHeader(year));
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn builtin_extractable_years() {
        let s = Settings::load(None).unwrap();
        let y2020 = find_extractable(&s.datasets, 2020).unwrap();
        assert!(y2020.drop_stale_name_column);
        assert_eq!(y2020.headers.len(), 11);
        assert_eq!(y2020.headers[6], "Revenue 2018 (in SGD)");

        let y2021 = find_extractable(&s.datasets, 2021).unwrap();
        assert!(!y2021.drop_stale_name_column);
        assert_eq!(y2021.headers[7], "Revenue 2016 (in SGD)");
    }

    #[test]
    fn harmonize_only_year_has_no_header() {
        let s = Settings::load(None).unwrap();
        assert_eq!(find(&s.datasets, 2024).unwrap().period_end, 2022);
        assert!(matches!(
            find_extractable(&s.datasets, 2024),
            Err(SchemaError::NoHeader(2024))
        ));
    }

    #[test]
    fn unknown_year() {
        let s = Settings::load(None).unwrap();
        assert!(matches!(find(&s.datasets, 1999), Err(SchemaError::UnknownYear(1999))));
    }
}
