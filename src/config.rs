use std::time::Duration;

use tracing::warn;

use crate::session::SessionIndicator;
use crate::utils::app_error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_LOCATION: &str = "/";

/// Settings of the composer, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub session: SessionIndicator,
    pub session_cookie: Option<String>,
    pub location: String,
    pub request_timeout: Option<Duration>,
    pub json_content_type: bool,
    /// Treat a non-2xx json reply to a new post as a failure
    pub check_post_status: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session: SessionIndicator::anonymous(),
            session_cookie: None,
            location: DEFAULT_LOCATION.to_string(),
            request_timeout: None,
            json_content_type: true,
            check_post_status: false,
        }
    }
}

impl Config {
    /// Load `.env` if there is one, then read the process environment
    pub fn from_env() -> Result<Self, ClientError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Error reading .env file : {e}");
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("NETWORK_BASE_URL").unwrap_or(defaults.base_url);
        if !base_url.starts_with("http://") {
            return Err(ClientError::InvalidConfig(format!(
                "NETWORK_BASE_URL must be an http:// url, got `{base_url}`"
            )));
        }

        let location = lookup("NETWORK_LOCATION").unwrap_or(defaults.location);
        if !location.starts_with('/') {
            return Err(ClientError::InvalidConfig(format!(
                "NETWORK_LOCATION must be an absolute path, got `{location}`"
            )));
        }

        let request_timeout = match lookup("NETWORK_REQUEST_TIMEOUT_SECS") {
            Some(secs) => {
                let secs: u64 = secs.trim().parse().map_err(|_| {
                    ClientError::InvalidConfig(format!(
                        "NETWORK_REQUEST_TIMEOUT_SECS must be a number of seconds, got `{secs}`"
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let json_content_type = flag(&lookup, "NETWORK_JSON_CONTENT_TYPE", defaults.json_content_type)?;
        let check_post_status = flag(&lookup, "NETWORK_CHECK_POST_STATUS", defaults.check_post_status)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session: SessionIndicator::from_rendered(lookup("NETWORK_LOGGED_USERNAME").as_deref()),
            session_cookie: lookup("NETWORK_SESSION_COOKIE").filter(|c| !c.is_empty()),
            location,
            request_timeout,
            json_content_type,
            check_post_status,
        })
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ClientError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes") => Ok(true),
        Some("0" | "false" | "no") => Ok(false),
        Some(other) => Err(ClientError::InvalidConfig(format!(
            "{key} must be true or false, got `{other}`"
        ))),
    }
}
