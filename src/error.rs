/// Errors surfaced by queue construction, configuration and decoding.
///
/// Full, empty and timed-out operations are ordinary outcomes and are reported through
/// `Result<(), T>` / `Option<T>` on the queue methods instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WQError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(&'static str),

    #[cfg(feature = "json")]
    #[error("failed to decode queue contents: {0}")]
    Decode(#[source] serde_json::Error),

    #[cfg(feature = "json")]
    #[error("failed to encode queue contents: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid queue config: {0}")]
    Config(#[from] toml::de::Error),
}
