use thiserror::Error;

/// Errors that can occur while publishing a course.
///
/// `CommercePublisher::publish` logs these and reports `false`; they only
/// reach callers of `try_publish`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// No commerce API base URL is configured.
    #[error("Commerce API URL is not configured")]
    ConfigurationMissing,

    /// The commerce API answered with a status other than 200 or 201.
    #[error("Commerce API rejected the request with status {status}")]
    RemoteRejected { status: u16, body: String },

    /// Connection, DNS or timeout failure.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The course could not be turned into a request body.
    #[error("Serialization failure: {0}")]
    Serialization(String),
}

impl PublishError {
    /// True when nothing was sent to the commerce API.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::ConfigurationMissing | Self::Serialization(_))
    }
}
