use thiserror::Error;

/// Failures reported by a [`BrowserSession`](super::BrowserSession)
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("No element matches {selector} (index {index})")]
    ElementNotFound { selector: String, index: usize },

    #[error("{action} failed: {message}")]
    Action {
        action: &'static str,
        message: String,
    },
}

impl BrowserError {
    /// Wrap an error returned by the driver (headless_chrome reports `anyhow` errors)
    pub fn action(action: &'static str, err: impl std::fmt::Display) -> Self {
        BrowserError::Action {
            action,
            message: err.to_string(),
        }
    }
}

/// Reasons a collection run stops before the scroll loop
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Missing login identifier or password (set FB_PHONE, FB_EMAIL or FB_USERNAME and FB_PASSWORD)")]
    MissingCredentials,

    #[error("Login rejected, still on {url}")]
    LoginRejected { url: String },

    #[error("Login form not found")]
    LoginFormMissing,

    #[error(transparent)]
    Browser(#[from] BrowserError),
}
