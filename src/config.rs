// ⚙️ Server Configuration - Environment variables with defaults

use anyhow::{anyhow, Context, Result};
use std::net::SocketAddr;

use crate::scoring::ScoringPolicy;

pub const ADDR_VAR: &str = "RECEIPT_PROCESSOR_ADDR";
pub const POLICY_VAR: &str = "RECEIPT_PROCESSOR_POLICY";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub policy: ScoringPolicy,
}

impl ServerConfig {
    /// Read configuration from the process environment, loading `.env` if present
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr_text = lookup(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr_text
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {:?}", ADDR_VAR, addr_text))?;

        let policy = match lookup(POLICY_VAR) {
            Some(value) => value
                .parse::<ScoringPolicy>()
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("Invalid {}", POLICY_VAR))?,
            None => ScoringPolicy::default(),
        };

        Ok(ServerConfig { addr, policy })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            policy: ScoringPolicy::default(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.policy, ScoringPolicy::Lenient);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (ADDR_VAR, "127.0.0.1:9000"),
            (POLICY_VAR, "strict"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.policy, ScoringPolicy::Strict);
    }

    #[test]
    fn test_invalid_addr() {
        let err = ServerConfig::from_lookup(lookup_from(&[(ADDR_VAR, "localhost")])).unwrap_err();
        assert!(err.to_string().contains(ADDR_VAR));
    }

    #[test]
    fn test_invalid_policy() {
        let err = ServerConfig::from_lookup(lookup_from(&[(POLICY_VAR, "whatever")])).unwrap_err();
        assert!(err.to_string().contains(POLICY_VAR));
    }
}
