use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_URL_TEMPLATE: &str = "http://wmh-wtc.com/?round={round}";
pub const DEFAULT_ROUNDS: u32 = 6;
pub const DEFAULT_DB_PATH: &str = "data.sqlite";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub url_template: String,
    pub rounds: u32,
    /// Bound of each inter-stage queue; 0 makes every hand-off a rendezvous.
    pub queue_capacity: usize,
    pub http_timeout: Duration,
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            rounds: DEFAULT_ROUNDS,
            queue_capacity: 0,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl Config {
    /// Reads `.env.local`, `.env`, then the `WTC_*` environment variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let defaults = Self::default();
        let url_template = env::var("WTC_URL_TEMPLATE")
            .ok()
            .and_then(checked_url_template)
            .unwrap_or(defaults.url_template);
        let rounds = env::var("WTC_ROUNDS")
            .ok()
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(defaults.rounds)
            .clamp(1, 64);
        let queue_capacity = env::var("WTC_QUEUE_CAPACITY")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.queue_capacity)
            .min(1024);
        let http_timeout = Duration::from_secs(
            env::var("WTC_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
                .clamp(1, 120),
        );
        let db_path = env::var("WTC_DB")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        Self {
            url_template,
            rounds,
            queue_capacity,
            http_timeout,
            db_path,
        }
    }

    pub fn round_url(&self, round: u32) -> String {
        self.url_template.replace("{round}", &round.to_string())
    }
}

/// Keeps an override only when it has a `{round}` placeholder.
fn checked_url_template(raw: String) -> Option<String> {
    if raw.contains("{round}") {
        return Some(raw);
    }
    warn!(template = %raw, "WTC_URL_TEMPLATE has no {{round}} placeholder, using default");
    None
}

#[cfg(test)]
mod tests {
    use super::{Config, checked_url_template};

    #[test]
    fn url_template_without_placeholder_is_rejected() {
        assert_eq!(checked_url_template("http://example.com/".to_string()), None);
        assert_eq!(
            checked_url_template("http://example.com/r/{round}".to_string()).as_deref(),
            Some("http://example.com/r/{round}")
        );
    }

    #[test]
    fn round_url_substitutes_round() {
        let config = Config::default();
        assert_eq!(config.round_url(3), "http://wmh-wtc.com/?round=3");
    }
}
