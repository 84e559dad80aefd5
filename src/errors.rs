use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoreNetError {
    #[error("missing paired table: {0}")]
    MissingPairedTable(String),
    #[error("invalid face name: {0}")]
    InvalidFace(String),
    #[error("invalid axis name: {0}")]
    InvalidAxis(String),
    #[error("network does not percolate: {0}")]
    NonPercolating(String),
    #[error("column error: {0}")]
    Column(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PoreNetError {
    pub fn missing_paired_table<T: Into<String>>(msg: T) -> Self {
        PoreNetError::MissingPairedTable(msg.into())
    }

    pub fn invalid_face<T: Into<String>>(msg: T) -> Self {
        PoreNetError::InvalidFace(msg.into())
    }

    pub fn invalid_axis<T: Into<String>>(msg: T) -> Self {
        PoreNetError::InvalidAxis(msg.into())
    }

    pub fn non_percolating<T: Into<String>>(msg: T) -> Self {
        PoreNetError::NonPercolating(msg.into())
    }

    pub fn column<T: Into<String>>(msg: T) -> Self {
        PoreNetError::Column(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        PoreNetError::InvalidInput(msg.into())
    }
}
