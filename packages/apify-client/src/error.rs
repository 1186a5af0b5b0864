use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApifyError>;

#[derive(Debug, Error)]
pub enum ApifyError {
    /// The API returned a non-success HTTP status.
    #[error("Apify API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// An actor run finished in a non-success state.
    #[error("Apify run ended with status {0}")]
    RunFailed(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
