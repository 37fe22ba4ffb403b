use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("invalid protocol {name}: {reason}")]
    InvalidProtocol { name: String, reason: &'static str },

    #[error("timeline contains no mark")]
    EmptyTimeline,

    /// The events were not produced by the protocol they are decoded with
    #[error("malformed timeline: {0}")]
    Malformed(String),

    #[cfg(feature = "config")]
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("config parse: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(name: &str, reason: &'static str) -> Self {
        Error::InvalidProtocol {
            name: name.to_string(),
            reason,
        }
    }
}
