use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub runtime: RuntimeKind,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub jobs: JobsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Execution environment capability. Restricted runtimes (edge workers,
/// serverless) cannot host background timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeKind {
    Full,
    Restricted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub require_auth: bool,
    pub token_secret: String,
    pub token_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    pub maintenance_enabled: bool,
    pub maintenance_interval_secs: u64,
    pub checklist_retention_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment presets first, then specific env var overrides
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("APP_RUNTIME") {
            self.runtime = match v.as_str() {
                "restricted" | "edge" => RuntimeKind::Restricted,
                _ => RuntimeKind::Full,
            };
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_REQUIRE_AUTH") {
            self.security.require_auth = v.parse().unwrap_or(self.security.require_auth);
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_SECRET") {
            self.security.token_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_EXPIRY_HOURS") {
            self.security.token_expiry_hours = v.parse().unwrap_or(self.security.token_expiry_hours);
        }

        // Jobs overrides
        if let Ok(v) = env::var("JOBS_MAINTENANCE_ENABLED") {
            self.jobs.maintenance_enabled = v.parse().unwrap_or(self.jobs.maintenance_enabled);
        }
        if let Ok(v) = env::var("JOBS_MAINTENANCE_INTERVAL_SECS") {
            self.jobs.maintenance_interval_secs = v.parse().unwrap_or(self.jobs.maintenance_interval_secs);
        }
        if let Ok(v) = env::var("JOBS_CHECKLIST_RETENTION_DAYS") {
            self.jobs.checklist_retention_days = v.parse().unwrap_or(self.jobs.checklist_retention_days);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            runtime: RuntimeKind::Full,
            database: DatabaseConfig {
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                require_auth: false,
                token_secret: "dev-secret-change-me".to_string(),
                token_expiry_hours: 24 * 7, // 1 week
            },
            jobs: JobsConfig {
                maintenance_enabled: true,
                maintenance_interval_secs: 60,
                checklist_retention_days: 7,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            runtime: RuntimeKind::Full,
            database: DatabaseConfig {
                max_connections: 20,
                connect_timeout_secs: 10,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.stashpad.example.com".to_string()],
                require_auth: true,
                token_secret: String::new(), // must come from SECURITY_TOKEN_SECRET
                token_expiry_hours: 24,
            },
            jobs: JobsConfig {
                maintenance_enabled: true,
                maintenance_interval_secs: 300,
                checklist_retention_days: 14,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            runtime: RuntimeKind::Full,
            database: DatabaseConfig {
                max_connections: 50,
                connect_timeout_secs: 5,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.stashpad.example.com".to_string()],
                require_auth: true,
                token_secret: String::new(), // must come from SECURITY_TOKEN_SECRET
                token_expiry_hours: 4,
            },
            jobs: JobsConfig {
                maintenance_enabled: true,
                maintenance_interval_secs: 900,
                checklist_retention_days: 30,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.security.require_auth);
        assert!(config.jobs.maintenance_enabled);
        assert_eq!(config.jobs.checklist_retention_days, 7);
        assert_eq!(config.runtime, RuntimeKind::Full);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.require_auth);
        assert!(config.security.token_secret.is_empty());
        assert_eq!(config.jobs.maintenance_interval_secs, 900);
    }
}
