use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::http::cors::OriginPattern;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,https://*.vercel.app,https://vercel.app";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,
    #[error("invalid {name} value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<OriginPattern>,
}

impl Config {
    /// Reads the process environment after loading `.env`, if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_err() {
            tracing::debug!("no .env file found");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty()).ok_or(ConfigError::MissingDatabaseUrl)?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            None => 8080,
        };
        let origins = lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string());
        let allowed_origins = origins.split(',').filter(|o| !o.trim().is_empty()).map(OriginPattern::parse).collect();
        Ok(Self { database_url, host, port, allowed_origins })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::Invalid { name: "HOST", value: self.host.clone() })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "sqlite://todos.db")])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.listen_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.allowed_origins.len(), 3);
        assert!(config.allowed_origins.iter().any(|o| o.matches("https://app.vercel.app")));
    }

    #[rstest]
    #[case(&[])]
    #[case(&[("DATABASE_URL", "")])]
    fn database_url_is_required(#[case] vars: &[(&str, &str)]) {
        assert_eq!(Config::from_lookup(lookup(vars)).unwrap_err(), ConfigError::MissingDatabaseUrl);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "sqlite::memory:"), ("PORT", "eighty")])).unwrap_err();
        assert_eq!(err, ConfigError::Invalid { name: "PORT", value: "eighty".into() });
    }

    #[rstest]
    #[case("::1", "[::1]:8080")]
    #[case("::", "[::]:8080")]
    #[case("127.0.0.1", "127.0.0.1:8080")]
    fn listen_addr_accepts_ipv4_and_ipv6(#[case] host: &str, #[case] expected: &str) {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "sqlite::memory:"), ("HOST", host)])).unwrap();
        assert_eq!(config.listen_addr().unwrap().to_string(), expected);
    }

    #[test]
    fn bad_host_is_rejected() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "sqlite::memory:"), ("HOST", "localhost:80")])).unwrap();
        assert_eq!(config.listen_addr().unwrap_err(), ConfigError::Invalid { name: "HOST", value: "localhost:80".into() });
    }

    #[test]
    fn origins_are_configurable() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("CORS_ALLOWED_ORIGINS", "https://todo.example.com, "),
        ]))
        .unwrap();
        assert_eq!(config.allowed_origins, vec![OriginPattern::Exact("https://todo.example.com".into())]);
        assert_eq!(config.listen_addr().unwrap().to_string(), "127.0.0.1:9000");
    }
}
