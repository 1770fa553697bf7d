use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("answer payload is not valid JSON of the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("answer payload is missing the `{0}` field")]
    MissingField(&'static str),
}
