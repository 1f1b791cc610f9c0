//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::{collections::HashSet, net::SocketAddr, str::FromStr};
use wallet_ledger::{
    db::DatabaseConfig,
    wallet::{Balance, MAX_WALLET_ID_LEN},
};

/// Default server bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration (used by the postgres backend)
    pub database: DatabaseConfig,
    /// Where wallet records live
    pub storage: StorageBackend,
    /// Wallets created at startup if missing
    pub seed_wallets: Vec<SeedWallet>,
    /// Prometheus exporter address; metrics are disabled when unset
    pub metrics_bind: Option<SocketAddr>,
}

/// Wallet storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL with row-level locks
    Postgres,
    /// Process memory; contents are lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid {
                var: "STORAGE_BACKEND".to_string(),
                reason: format!("Unknown backend \"{s}\" (expected postgres or memory)"),
            }),
        }
    }
}

/// Wallet to create at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedWallet {
    pub id: String,
    pub balance: Balance,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    /// * `storage_override` - Optional storage backend override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<ServerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
        storage_override: Option<StorageBackend>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_addr("SERVER_BIND", std::env::var("SERVER_BIND").ok())?
                .unwrap_or_else(default_bind),
        };

        let mut database = DatabaseConfig::from_env();
        if let Some(database_url) = database_url_override {
            database.database_url = database_url;
        }

        let storage = match storage_override {
            Some(storage) => storage,
            None => std::env::var("STORAGE_BACKEND")
                .ok()
                .map(|v| v.parse::<StorageBackend>())
                .transpose()?
                .unwrap_or(StorageBackend::Postgres),
        };

        let seed_wallets = std::env::var("SEED_WALLETS")
            .ok()
            .map(|v| parse_seed_wallets(&v))
            .transpose()?
            .unwrap_or_default();

        let metrics_bind = parse_addr("METRICS_BIND", std::env::var("METRICS_BIND").ok())?;

        Ok(ServerConfig {
            bind,
            database,
            storage,
            seed_wallets,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage == StorageBackend::Postgres {
            if self.database.max_connections == 0 {
                return Err(ConfigError::Invalid {
                    var: "DB_MAX_CONNECTIONS".to_string(),
                    reason: "Must be greater than 0".to_string(),
                });
            }

            if self.database.min_connections > self.database.max_connections {
                return Err(ConfigError::Invalid {
                    var: "DB_MIN_CONNECTIONS".to_string(),
                    reason: format!(
                        "Cannot exceed max connections ({})",
                        self.database.max_connections
                    ),
                });
            }
        }

        let mut seen = HashSet::new();
        for seed in &self.seed_wallets {
            if seed.id.is_empty() || seed.id.chars().count() > MAX_WALLET_ID_LEN {
                return Err(ConfigError::Invalid {
                    var: "SEED_WALLETS".to_string(),
                    reason: format!(
                        "Wallet id \"{}\" must be 1 to {MAX_WALLET_ID_LEN} characters",
                        seed.id
                    ),
                });
            }
            if seed.balance < 0 {
                return Err(ConfigError::Invalid {
                    var: "SEED_WALLETS".to_string(),
                    reason: format!("Balance of wallet \"{}\" must not be negative", seed.id),
                });
            }
            if !seen.insert(seed.id.as_str()) {
                return Err(ConfigError::Invalid {
                    var: "SEED_WALLETS".to_string(),
                    reason: format!("Wallet \"{}\" listed twice", seed.id),
                });
            }
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse `id=balance,id=balance` into seed wallets
///
/// Blank entries are skipped.
pub fn parse_seed_wallets(raw: &str) -> Result<Vec<SeedWallet>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, balance) = entry.split_once('=').ok_or_else(|| ConfigError::Invalid {
                var: "SEED_WALLETS".to_string(),
                reason: format!("Entry \"{entry}\" is not in id=balance form"),
            })?;
            let balance = balance.trim().parse::<Balance>().map_err(|_| ConfigError::Invalid {
                var: "SEED_WALLETS".to_string(),
                reason: format!("Balance in \"{entry}\" is not an integer"),
            })?;
            Ok(SeedWallet {
                id: id.trim().to_string(),
                balance,
            })
        })
        .collect()
}

fn parse_addr(var: &str, value: Option<String>) -> Result<Option<SocketAddr>, ConfigError> {
    value
        .map(|v| {
            v.parse().map_err(|_| ConfigError::Invalid {
                var: var.to_string(),
                reason: format!("\"{v}\" is not a valid IP:PORT address"),
            })
        })
        .transpose()
}

fn default_bind() -> SocketAddr {
    DEFAULT_BIND
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8000)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:8080".parse().unwrap(),
            database: DatabaseConfig {
                database_url: "test".to_string(),
                max_connections: 10,
                min_connections: 1,
                connection_timeout_secs: 5,
                idle_timeout_secs: 300,
                max_lifetime_secs: 1800,
            },
            storage: StorageBackend::Postgres,
            seed_wallets: vec![],
            metrics_bind: None,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            var: "SEED_WALLETS".to_string(),
            reason: "bad entry".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SEED_WALLETS"));
        assert!(msg.contains("bad entry"));
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(
            "postgres".parse::<StorageBackend>().unwrap(),
            StorageBackend::Postgres
        );
        assert_eq!(
            "Memory".parse::<StorageBackend>().unwrap(),
            StorageBackend::Memory
        );
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_parse_seed_wallets() {
        let seeds = parse_seed_wallets(" alice=1000, bob = 0 ,,").unwrap();
        assert_eq!(
            seeds,
            vec![
                SeedWallet {
                    id: "alice".to_string(),
                    balance: 1000
                },
                SeedWallet {
                    id: "bob".to_string(),
                    balance: 0
                },
            ]
        );
        assert!(parse_seed_wallets("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_seed_wallets_rejects_malformed() {
        assert!(parse_seed_wallets("alice").is_err());
        assert!(parse_seed_wallets("alice=lots").is_err());
    }

    #[test]
    fn test_config_validation_ok() {
        let mut config = base_config();
        config.seed_wallets = parse_seed_wallets("a=1,b=2").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_pool_bounds() {
        let mut config = base_config();
        config.database.min_connections = 20; // Invalid: more than max
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "DB_MIN_CONNECTIONS"));

        // Pool settings are irrelevant for the memory backend
        config.storage = StorageBackend::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_seed_wallets() {
        let mut config = base_config();
        config.seed_wallets = vec![SeedWallet {
            id: "a".to_string(),
            balance: -1,
        }];
        assert!(config.validate().is_err());

        config.seed_wallets = parse_seed_wallets("a=1,a=2").unwrap();
        assert!(config.validate().is_err());

        config.seed_wallets = vec![SeedWallet {
            id: "x".repeat(MAX_WALLET_ID_LEN + 1),
            balance: 0,
        }];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_addr() {
        assert_eq!(parse_addr("X", None).unwrap(), None);
        assert_eq!(
            parse_addr("X", Some("0.0.0.0:9090".to_string())).unwrap(),
            Some("0.0.0.0:9090".parse().unwrap())
        );
        assert!(parse_addr("X", Some("nonsense".to_string())).is_err());
    }
}
