//! Runtime settings, resolved once at startup from the CLI and the environment.

use crate::extract::DEFAULT_KNOWN_NEIGHBORHOODS;
use crate::scrapers::{ChromeOptions, CollectionParams};
use std::fmt;
use std::path::PathBuf;

pub const ENV_PHONE: &str = "FB_PHONE";
pub const ENV_EMAIL: &str = "FB_EMAIL";
pub const ENV_USERNAME: &str = "FB_USERNAME";
pub const ENV_PASSWORD: &str = "FB_PASSWORD";

/// Kind of identifier used to log in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKind {
    Phone,
    Email,
    Username,
}

/// Login identifier and password.
///
/// The identifier is the first non-empty value among phone, email and
/// username, in that order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    login: Option<(LoginKind, String)>,
    password: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolve credentials through `lookup`, which maps a variable name to its value
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let login = [
            (LoginKind::Phone, ENV_PHONE),
            (LoginKind::Email, ENV_EMAIL),
            (LoginKind::Username, ENV_USERNAME),
        ]
        .into_iter()
        .find_map(|(kind, key)| non_empty(key).map(|value| (kind, value)));

        Self {
            login,
            password: non_empty(ENV_PASSWORD),
        }
    }

    pub fn login_kind(&self) -> Option<LoginKind> {
        self.login.as_ref().map(|(kind, _)| *kind)
    }

    pub fn login_id(&self) -> Option<&str> {
        self.login.as_ref().map(|(_, id)| id.as_str())
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.login.is_some() && self.password.is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login_kind", &self.login_kind())
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Settings of the `collect` command
#[derive(Debug, Clone)]
pub struct CollectSettings {
    pub output_dir: PathBuf,
    pub known_neighborhoods: Vec<String>,
    pub credentials: Credentials,
    pub chrome: ChromeOptions,
    pub params: CollectionParams,
}

impl Default for CollectSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data").join("raw"),
            known_neighborhoods: DEFAULT_KNOWN_NEIGHBORHOODS
                .iter()
                .map(|n| n.to_string())
                .collect(),
            credentials: Credentials::default(),
            chrome: ChromeOptions::default(),
            params: CollectionParams::default(),
        }
    }
}

/// Settings of the `dashboard` command
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub data_path: PathBuf,
}
