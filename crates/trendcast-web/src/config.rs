//! Listener configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::{Result, WebError};

/// Where the dashboard listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
        }
    }
}

impl WebConfig {
    /// Read `HOST` and `PORT`, falling back to 127.0.0.1:8080
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(host) = var("HOST") {
            config.host = host.parse().map_err(|_| WebError::Config {
                name: "HOST".to_string(),
                value: host,
            })?;
        }
        if let Some(port) = var("PORT") {
            config.port = port.parse().map_err(|_| WebError::Config {
                name: "PORT".to_string(),
                value: port,
            })?;
        }

        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WebConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_host_and_port() {
        let config =
            WebConfig::from_lookup(lookup(&[("HOST", "0.0.0.0"), ("PORT", "3000")])).unwrap();
        assert_eq!(config.addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_bad_port() {
        let err = WebConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
