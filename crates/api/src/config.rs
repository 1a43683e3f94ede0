use rulecheck_core::shapes::ShapeConfig;
use validator::Validate;

/// Error raised while loading [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got '{value}'")]
    InvalidVar {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone, Validate)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    #[validate(length(min = 1))]
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
    /// Allowed values of the measurement `type` discriminator.
    #[validate(length(min = 1))]
    pub type_choices: Vec<String>,
    /// Allowed values of the selection `choice` field.
    #[validate(length(min = 1))]
    pub selection_choices: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `TYPE_CHOICES`         | `absolute,relative,name`   |
    /// | `SELECTION_CHOICES`    | `correct,valid`            |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ShapeConfig::default();

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port: u16 = parse_var(&lookup, "PORT", "u16", 3000)?;

        let cors_origins =
            split_list(&lookup("CORS_ORIGINS").unwrap_or_else(|| "http://localhost:5173".into()));

        let request_timeout_secs: u64 = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", "u64", 30)?;

        let type_choices = lookup("TYPE_CHOICES")
            .map(|v| split_list(&v))
            .unwrap_or(defaults.type_choices);

        let selection_choices = lookup("SELECTION_CHOICES")
            .map(|v| split_list(&v))
            .unwrap_or(defaults.selection_choices);

        let config = Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            type_choices,
            selection_choices,
        };
        config.validate()?;
        Ok(config)
    }

    /// Value sets for the built-in rule sets.
    pub fn shape_config(&self) -> ShapeConfig {
        ShapeConfig {
            type_choices: self.type_choices.clone(),
            selection_choices: self.selection_choices.clone(),
            ..ShapeConfig::default()
        }
    }
}

fn parse_var<F, T>(
    lookup: &F,
    var: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidVar {
            var,
            expected,
            value,
        }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.type_choices, vec!["absolute", "relative", "name"]);
        assert_eq!(config.selection_choices, vec!["correct", "valid"]);
    }

    #[test]
    fn lists_are_split_and_trimmed() {
        let config = load(&[("TYPE_CHOICES", " absolute , relative,, ")]).unwrap();
        assert_eq!(config.type_choices, vec!["absolute", "relative"]);
        assert_eq!(config.shape_config().type_choices, config.type_choices);
    }

    #[test]
    fn bad_port_is_reported() {
        assert_matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidVar { var: "PORT", .. })
        );
    }

    #[test]
    fn timeout_outside_range_fails_validation() {
        assert_matches!(
            load(&[("REQUEST_TIMEOUT_SECS", "0")]),
            Err(ConfigError::Invalid(_))
        );
    }

    #[test]
    fn empty_choice_list_fails_validation() {
        assert_matches!(load(&[("SELECTION_CHOICES", " , ")]), Err(ConfigError::Invalid(_)));
    }
}
