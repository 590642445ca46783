use thiserror::Error;

/// Hard failures while pulling the blob out of a JSON envelope.
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing key `{0}` in JSON envelope")]
    MissingKey(String),

    #[error("value at `{0}` is not a string")]
    NotAString(String),
}

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("no dataset configured for year {0}")]
    UnknownYear(u16),

    #[error("dataset {0} has no extraction header")]
    NoHeader(u16),
}

#[derive(Error, Debug)]
pub enum TableError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("line {line}: {found} fields, header has {expected}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
}
