use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "10485760".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("FRONTEND_URL")?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            storage: StorageConfig {
                root: env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage".to_string()),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        let saved_db = env::var("DB_URL").ok();
        let saved_frontend = env::var("FRONTEND_URL").ok();

        env::set_var("DB_URL", "postgres://localhost/test");
        env::set_var("FRONTEND_URL", "http://localhost:5173, http://localhost:3000");
        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("STORAGE_ROOT");

        let config = AppConfig::from_env().unwrap();

        if let Some(v) = saved_db {
            env::set_var("DB_URL", v);
        } else {
            env::remove_var("DB_URL");
        }
        if let Some(v) = saved_frontend {
            env::set_var("FRONTEND_URL", v);
        } else {
            env::remove_var("FRONTEND_URL");
        }

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.root, "storage");
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://localhost:5173", "http://localhost:3000"]
        );
        assert_eq!(config.server_address(), "0.0.0.0:3000");
    }

    #[test]
    #[serial]
    fn test_from_env_missing_db_url() {
        let saved_db = env::var("DB_URL").ok();
        let saved_frontend = env::var("FRONTEND_URL").ok();

        env::remove_var("DB_URL");
        env::set_var("FRONTEND_URL", "http://localhost:5173");

        let result = AppConfig::from_env();

        if let Some(v) = saved_db {
            env::set_var("DB_URL", v);
        }
        if let Some(v) = saved_frontend {
            env::set_var("FRONTEND_URL", v);
        } else {
            env::remove_var("FRONTEND_URL");
        }

        assert!(result.is_err());
    }
}
