/// Transient upstream failure for one partition request. Retried, then absorbed.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("error sending request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream responded with status {0}")]
    Status(u16),
}

/// Upstream payload that cannot be read as observation rows.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("missing required value: {0}")]
    MissingValue(&'static str),
    #[error("invalid observation time {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: time::error::Parse,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("malformed upstream payload: {0}")]
    Parse(#[from] ParseError),
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}
