//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Base URL of the activity API used by tracker clients
    pub activity_api_url: String,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            activity_api_url: "http://localhost:8080".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first if present. Every value has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        Ok(Self {
            port,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            activity_api_url: env::var("ACTIVITY_API_URL")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("PORT", "9090");
        env::remove_var("ACTIVITY_API_URL");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 9090);
        assert_eq!(config.activity_api_url, "http://localhost:9090");

        env::set_var("PORT", "not-a-port");
        assert!(Config::from_env().is_err());

        env::remove_var("PORT");
    }
}
