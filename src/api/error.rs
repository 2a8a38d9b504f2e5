use http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    ConfigurationError(String),

    #[error("Authentication failed: {message}")]
    AuthenticationError {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid API response ({1}): {0}")]
    InvalidResponse(String, String),

    #[error("Unexpected data shape: {0}")]
    DataShapeError(String),

    #[error("Unable to format report: {0}")]
    FormatError(String),
}

impl Error {
    pub(crate) fn data_shape(what: impl Into<String>) -> Self {
        Error::DataShapeError(what.into())
    }
}

impl From<config::ConfigError> for Error {
    fn from(error: config::ConfigError) -> Self {
        Error::ConfigurationError(error.to_string())
    }
}
