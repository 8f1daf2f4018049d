use std::net::SocketAddr;
use std::path::PathBuf;

/// Placeholder location; operators point `DATABASE_URL` at their own instance.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/your_database_name";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "./client/build";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl AppConfig {
    /// Reads `DATABASE_URL`, `PORT` and `STATIC_DIR`, falling back to defaults.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.database_url);

        let port = match lookup("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!("Ignoring invalid PORT value {:?}, using {}", raw, DEFAULT_PORT);
                    DEFAULT_PORT
                }
            },
            None => defaults.port,
        };

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        Self {
            database_url,
            port,
            static_dir,
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.listen_addr().port(), 5000);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db:5432/carebook"),
            ("PORT", "8080"),
            ("STATIC_DIR", "/srv/www"),
        ]));
        assert_eq!(config.database_url, "postgres://db:5432/carebook");
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, PathBuf::from("/srv/www"));
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = AppConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
