//! Runtime configuration.
//!
//! Everything is read from environment variables:
//!
//! | Variable            | Required | Default        |
//! |---------------------|----------|----------------|
//! | `SLACK_WEBHOOK_URL` | yes      |                |
//! | `WARMUP_SECONDS`    | no       | 5              |
//! | `CLUSTER_NAME`      | no       |                |
//! | `IGNORE_ACTIONS`    | no       | (none)         |
//! | `WATCH_NAMESPACE`   | no       | all namespaces |

use crate::error::ControllerError;
use crate::event::Action;
use std::env;
use std::time::Duration;

/// Default warm-up window before notifications are sent.
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(5);

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub webhook_url: String,
    pub warmup: Duration,
    /// Shown as the footer of every notification
    pub cluster_name: Option<String>,
    /// Actions that are never posted
    pub ignored_actions: Vec<Action>,
    /// Restrict watches to one namespace; `None` watches all namespaces
    pub namespace: Option<String>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let webhook_url = get("SLACK_WEBHOOK_URL").ok_or_else(|| {
            ControllerError::InvalidConfig(
                "SLACK_WEBHOOK_URL environment variable is required".to_string(),
            )
        })?;

        let warmup = match get("WARMUP_SECONDS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                ControllerError::InvalidConfig(format!("WARMUP_SECONDS '{}': {}", raw, e))
            })?,
            None => DEFAULT_WARMUP,
        };

        let ignored_actions = match get("IGNORE_ACTIONS") {
            Some(raw) => raw
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(str::parse::<Action>)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            webhook_url,
            warmup,
            cluster_name: get("CLUSTER_NAME"),
            ignored_actions,
            namespace: get("WATCH_NAMESPACE"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ControllerError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("SLACK_WEBHOOK_URL", "https://hooks.example.com/x")]).unwrap();

        assert_eq!(config.webhook_url, "https://hooks.example.com/x");
        assert_eq!(config.warmup, DEFAULT_WARMUP);
        assert_eq!(config.cluster_name, None);
        assert!(config.ignored_actions.is_empty());
        assert_eq!(config.namespace, None);
    }

    #[test]
    fn test_webhook_url_required() {
        assert!(matches!(config_from(&[]), Err(ControllerError::InvalidConfig(_))));
        assert!(matches!(
            config_from(&[("SLACK_WEBHOOK_URL", "  ")]),
            Err(ControllerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_all_options() {
        let config = config_from(&[
            ("SLACK_WEBHOOK_URL", "https://hooks.example.com/x"),
            ("WARMUP_SECONDS", "12"),
            ("CLUSTER_NAME", "prod-eu-1"),
            ("IGNORE_ACTIONS", "Deleted, modified"),
            ("WATCH_NAMESPACE", "payments"),
        ])
        .unwrap();

        assert_eq!(config.warmup, Duration::from_secs(12));
        assert_eq!(config.cluster_name.as_deref(), Some("prod-eu-1"));
        assert_eq!(config.ignored_actions, vec![Action::Deleted, Action::Modified]);
        assert_eq!(config.namespace.as_deref(), Some("payments"));
    }

    #[test]
    fn test_invalid_warmup_rejected() {
        let result = config_from(&[
            ("SLACK_WEBHOOK_URL", "https://hooks.example.com/x"),
            ("WARMUP_SECONDS", "five"),
        ]);
        assert!(matches!(result, Err(ControllerError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_ignored_action_rejected() {
        let result = config_from(&[
            ("SLACK_WEBHOOK_URL", "https://hooks.example.com/x"),
            ("IGNORE_ACTIONS", "added,bookmark"),
        ]);
        assert!(matches!(result, Err(ControllerError::InvalidConfig(_))));
    }
}
