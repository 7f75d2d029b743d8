use crate::db::InitOptions;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub database_args: Option<String>,
    pub init_scripts: Vec<PathBuf>,
    pub migration_scripts: Vec<PathBuf>,
    pub init_retries: u32,
    pub init_retry_delay_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let database_args = env_map
            .get("DATABASE_ARGS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let init_scripts = parse_script_list(&env_map, "DATABASE_INIT_SCRIPT");
        let migration_scripts = parse_script_list(&env_map, "DATABASE_MIGRATION_SCRIPT");

        let init_retries = env_map
            .get("DATABASE_INIT_RETRIES")
            .map(|s| s.as_str())
            .unwrap_or("1")
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "DATABASE_INIT_RETRIES".to_string(),
                    "must be a valid u32".to_string(),
                )
            })?;

        let init_retry_delay_secs = env_map
            .get("DATABASE_INIT_RETRIES_DELAY")
            .map(|s| s.as_str())
            .unwrap_or("2")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "DATABASE_INIT_RETRIES_DELAY".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        Ok(Config {
            port,
            database_path,
            database_args,
            init_scripts,
            migration_scripts,
            init_retries,
            init_retry_delay_secs,
        })
    }

    /// Initializer options derived from this configuration.
    pub fn init_options(&self) -> InitOptions {
        InitOptions {
            database_path: self.database_path.clone(),
            database_args: self.database_args.clone(),
            init_scripts: self.init_scripts.clone(),
            migration_scripts: self.migration_scripts.clone(),
            retries: self.init_retries,
            retry_delay: Duration::from_secs(self.init_retry_delay_secs),
        }
    }
}

fn parse_script_list(env_map: &HashMap<String, String>, key: &str) -> Vec<PathBuf> {
    env_map
        .get(key)
        .map(|value| {
            value
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/test.db".to_string());
        map
    }

    #[test]
    fn test_missing_database_path() {
        let env_map = HashMap::new();
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.init_retries, 1);
        assert_eq!(config.init_retry_delay_secs, 2);
        assert!(config.database_args.is_none());
        assert!(config.init_scripts.is_empty());
        assert!(config.migration_scripts.is_empty());
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_retries() {
        let mut env_map = setup_required_env();
        env_map.insert("DATABASE_INIT_RETRIES".to_string(), "-3".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "DATABASE_INIT_RETRIES"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_script_lists_are_split_and_trimmed() {
        let mut env_map = setup_required_env();
        env_map.insert(
            "DATABASE_INIT_SCRIPT".to_string(),
            "sql/init.sql".to_string(),
        );
        env_map.insert(
            "DATABASE_MIGRATION_SCRIPT".to_string(),
            " sql/migrations/0001.sql , sql/migrations/0002.sql ,".to_string(),
        );

        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.init_scripts, vec![PathBuf::from("sql/init.sql")]);
        assert_eq!(
            config.migration_scripts,
            vec![
                PathBuf::from("sql/migrations/0001.sql"),
                PathBuf::from("sql/migrations/0002.sql"),
            ]
        );
    }

    #[test]
    fn test_init_options_derivation() {
        let mut env_map = setup_required_env();
        env_map.insert("DATABASE_INIT_RETRIES".to_string(), "5".to_string());
        env_map.insert("DATABASE_INIT_RETRIES_DELAY".to_string(), "7".to_string());
        env_map.insert("DATABASE_ARGS".to_string(), "cache=shared".to_string());

        let opts = Config::from_env_map(env_map).unwrap().init_options();
        assert_eq!(opts.retries, 5);
        assert_eq!(opts.retry_delay, Duration::from_secs(7));
        assert_eq!(opts.database_args.as_deref(), Some("cache=shared"));
    }
}
