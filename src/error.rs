use thiserror::Error;

/// Failures surfaced by the pull request pipeline.
///
/// Every variant aborts the whole fetch. Callers never get a partial list.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid credential/configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The GraphQL endpoint could not be reached, or the request was
    /// cancelled or ran past its deadline.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered, but with application-level errors or an
    /// envelope without data.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A result item did not match its discriminator-to-shape mapping.
    #[error("decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            // A non-2xx answer still came from GitHub, so the transport worked
            // but the API refused the request.
            octocrab::Error::GitHub { source, .. } => Error::Protocol(format!(
                "GitHub API returned {}: {}",
                source.status_code, source.message
            )),
            _ => Error::Transport(err.to_string()),
        }
    }
}
