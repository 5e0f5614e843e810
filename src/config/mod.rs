use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub membership: MembershipConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
    pub session_duration_hours: i64,
    pub default_admin_username: String,
    pub default_admin_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MembershipConfig {
    /// Size of the "expiring soon" window shown on the dashboard and reminders.
    pub expiring_soon_days: i64,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self { expiring_soon_days: 7 }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite://gym.db")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.bcrypt_cost", 12)?
            .set_default("auth.session_duration_hours", 24)?
            .set_default("auth.default_admin_username", "admin")?
            .set_default("auth.default_admin_password", "admin123")?
            .set_default("membership.expiring_soon_days", 7)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with GYMKEEPER__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("GYMKEEPER").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://gym.db".to_string(),
                max_connections: 5,
            },
            auth: AuthConfig {
                bcrypt_cost: 12,
                session_duration_hours: 24,
                default_admin_username: "admin".to_string(),
                default_admin_password: "admin123".to_string(),
            },
            membership: MembershipConfig::default(),
        }
    }
}
