//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

const DEFAULT_DB_PATH: &str = "./data/fitness-bot.db";
const DEFAULT_TURN_TIMEOUT_SECS: u64 = 30;

/// Bot configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram Bot API token. Without one the bot runs on stdin/stdout.
    pub telegram_token: Option<SecretString>,
    /// Usernames or numeric ids allowed to talk to the bot; `*` allows all.
    pub allowed_users: Vec<String>,
    /// libSQL database file.
    pub db_path: PathBuf,
    /// Upper bound on one dialog turn, storage calls included.
    pub turn_timeout: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: None,
            allowed_users: vec!["*".to_string()],
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            turn_timeout: Duration::from_secs(DEFAULT_TURN_TIMEOUT_SECS),
        }
    }
}

impl BotConfig {
    /// Read `TELEGRAM_BOT_TOKEN`, `TELEGRAM_ALLOWED_USERS`,
    /// `FITNESS_BOT_DB_PATH` and `FITNESS_BOT_TURN_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let telegram_token = lookup("TELEGRAM_BOT_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(SecretString::from);

        let allowed_users: Vec<String> = lookup("TELEGRAM_ALLOWED_USERS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let db_path = lookup("FITNESS_BOT_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let turn_timeout = match lookup("FITNESS_BOT_TURN_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                    key: "FITNESS_BOT_TURN_TIMEOUT_SECS".into(),
                    message: format!("'{raw}': {e}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "FITNESS_BOT_TURN_TIMEOUT_SECS".into(),
                        message: "must be at least 1".into(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.turn_timeout,
        };

        Ok(Self {
            telegram_token,
            allowed_users,
            db_path,
            turn_timeout,
        })
    }

    /// Whether everyone may use the bot.
    pub fn allows_everyone(&self) -> bool {
        self.allowed_users.iter().any(|u| u == "*")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]).unwrap();
        assert!(cfg.telegram_token.is_none());
        assert_eq!(cfg.allowed_users, vec!["*"]);
        assert!(cfg.allows_everyone());
        assert_eq!(cfg.db_path, PathBuf::from("./data/fitness-bot.db"));
        assert_eq!(cfg.turn_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_all_values() {
        let cfg = config(&[
            ("TELEGRAM_BOT_TOKEN", "123:ABC"),
            ("TELEGRAM_ALLOWED_USERS", "alice, 42 ,,bob"),
            ("FITNESS_BOT_DB_PATH", "/tmp/fit.db"),
            ("FITNESS_BOT_TURN_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(
            cfg.telegram_token.as_ref().map(|t| t.expose_secret()),
            Some("123:ABC")
        );
        assert_eq!(cfg.allowed_users, vec!["alice", "42", "bob"]);
        assert!(!cfg.allows_everyone());
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/fit.db"));
        assert_eq!(cfg.turn_timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_token_means_cli() {
        let cfg = config(&[("TELEGRAM_BOT_TOKEN", "  ")]).unwrap();
        assert!(cfg.telegram_token.is_none());
    }

    #[test]
    fn invalid_timeout_rejected() {
        for bad in ["soon", "-1", "0"] {
            let err = config(&[("FITNESS_BOT_TURN_TIMEOUT_SECS", bad)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "FITNESS_BOT_TURN_TIMEOUT_SECS"),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn debug_does_not_leak_token() {
        let cfg = config(&[("TELEGRAM_BOT_TOKEN", "super-secret")]).unwrap();
        assert!(!format!("{cfg:?}").contains("super-secret"));
    }
}
