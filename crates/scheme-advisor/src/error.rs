use advisor_common::error::CommonError;
use advisor_common::openai::OpenAiClientError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] CommonError),
}

/// Failures of a single advisory round-trip. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("no API key configured (set GROQ_API_KEY or OPENAI_API_KEY)")]
    MissingApiKey,

    #[error(transparent)]
    Client(#[from] OpenAiClientError),

    #[error("completion response had no content")]
    EmptyResponse,
}

/// Failures of a session transition that abort the current interaction.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no filtered schemes to select from; submit filters first")]
    NotFiltered,

    #[error("scheme not in the current results: {0}")]
    UnknownScheme(String),

    #[error(transparent)]
    Advisory(#[from] AdvisoryError),
}
