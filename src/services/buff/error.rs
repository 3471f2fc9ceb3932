//! Error types for the Buff163 market client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Market returned HTTP status {0}")]
    Http(reqwest::StatusCode),

    #[error("API error: {message} (code: {code})")]
    Api {
        code: String,
        message: String,
    },

    #[error("Invalid response format: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response envelope has no data")]
    MissingData,

    #[error("Invalid client setting: {0}")]
    InvalidSetting(String),
}

pub type MarketResult<T> = Result<T, MarketError>;

impl MarketError {
    pub fn api_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// True when the market answered but the body could not be understood
    ///
    /// Everything else (transport, HTTP status, API error codes) counts as a
    /// network or configuration problem.
    pub fn is_processing_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::MissingData)
    }

    /// The market rejected the session cookie
    pub fn is_login_required(&self) -> bool {
        match self {
            Self::Api { code, .. } => code.eq_ignore_ascii_case("Login Required"),
            Self::Http(status) => *status == reqwest::StatusCode::UNAUTHORIZED,
            _ => false,
        }
    }
}
