//! Deployment configuration
//!
//! Read from environment variables:
//! - `LEDGER_NETWORK`: network profile (`local`, `rinkeby`, `bsc`, `ropsten`)
//! - `INFURA_URL` / `BSC_URL` / `ROPSTEN_URL`: endpoint of the remote profiles
//! - `PRIVATE_KEY`: hex secret key of the deployer (dev account 0 if unset)
//! - `REPORT_GAS`: when present, print an operation report after script runs

use crate::crypto::{dev_account, KeyError, KeyPair};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default token parameters, matching the reference deployment
pub const DEFAULT_TOKEN_NAME: &str = "Test Token S";
pub const DEFAULT_TOKEN_SYMBOL: &str = "TTS";
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;
pub const DEFAULT_TOKEN_SUPPLY: u128 = 1_000_000;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown network: {0} (expected local, rinkeby, bsc or ropsten)")]
    UnknownNetwork(String),
    #[error("Invalid PRIVATE_KEY: {0}")]
    InvalidPrivateKey(KeyError),
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
}

/// Network profile a deployment is attributed to
///
/// Profiles only describe where a deployment would go; nothing here dials
/// the endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Local,
    Rinkeby,
    Bsc,
    Ropsten,
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Network::Local => "local",
            Network::Rinkeby => "rinkeby",
            Network::Bsc => "bsc",
            Network::Ropsten => "ropsten",
        }
    }

    /// Environment variable holding this profile's endpoint URL
    pub fn endpoint_var(&self) -> Option<&'static str> {
        match self {
            Network::Local => None,
            Network::Rinkeby => Some("INFURA_URL"),
            Network::Bsc => Some("BSC_URL"),
            Network::Ropsten => Some("ROPSTEN_URL"),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "local" => Ok(Network::Local),
            "rinkeby" => Ok(Network::Rinkeby),
            "bsc" => Ok(Network::Bsc),
            "ropsten" => Ok(Network::Ropsten),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Constructor arguments of the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub supply: u128,
}

impl Default for TokenParams {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOKEN_NAME.to_string(),
            symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
            decimals: DEFAULT_TOKEN_DECIMALS,
            supply: DEFAULT_TOKEN_SUPPLY,
        }
    }
}

/// Everything a deployment needs
#[derive(Clone, Debug)]
pub struct DeployConfig {
    pub network: Network,
    /// Endpoint URL; empty when the profile's variable is unset
    pub endpoint: String,
    pub deployer: KeyPair,
    pub token: TokenParams,
    pub report_operations: bool,
}

impl DeployConfig {
    /// Local profile, dev account 0, default token parameters
    pub fn local() -> Result<Self, ConfigError> {
        Ok(Self {
            network: Network::Local,
            endpoint: String::new(),
            deployer: dev_account(0)?,
            token: TokenParams::default(),
            report_operations: false,
        })
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network: Network = lookup("LEDGER_NETWORK").unwrap_or_default().parse()?;

        let endpoint = network
            .endpoint_var()
            .and_then(|var| lookup(var))
            .unwrap_or_default();

        let deployer = match lookup("PRIVATE_KEY").filter(|k| !k.trim().is_empty()) {
            Some(key) => {
                KeyPair::from_private_key_hex(&key).map_err(ConfigError::InvalidPrivateKey)?
            }
            None => dev_account(0)?,
        };

        if network != Network::Local && endpoint.is_empty() {
            log::warn!(
                "No endpoint configured for network {} (set {})",
                network,
                network.endpoint_var().unwrap_or_default()
            );
        }

        Ok(Self {
            network,
            endpoint,
            deployer,
            token: TokenParams::default(),
            report_operations: lookup("REPORT_GAS").is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DeployConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.network, Network::Local);
        assert!(config.endpoint.is_empty());
        assert_eq!(config.deployer.address(), dev_account(0).unwrap().address());
        assert_eq!(config.token, TokenParams::default());
        assert_eq!(config.token.name, "Test Token S");
        assert_eq!(config.token.symbol, "TTS");
        assert_eq!(config.token.decimals, 18);
        assert_eq!(config.token.supply, 1_000_000);
        assert!(!config.report_operations);
    }

    #[test]
    fn test_remote_network_endpoint() {
        let config = DeployConfig::from_lookup(lookup_from(&[
            ("LEDGER_NETWORK", "BSC"),
            ("BSC_URL", "https://bsc.example"),
            ("INFURA_URL", "https://infura.example"),
            ("REPORT_GAS", "1"),
        ]))
        .unwrap();

        assert_eq!(config.network, Network::Bsc);
        assert_eq!(config.endpoint, "https://bsc.example");
        assert!(config.report_operations);
    }

    #[test]
    fn test_missing_endpoint_is_empty() {
        let config =
            DeployConfig::from_lookup(lookup_from(&[("LEDGER_NETWORK", "ropsten")])).unwrap();
        assert_eq!(config.network, Network::Ropsten);
        assert!(config.endpoint.is_empty());
    }

    #[test]
    fn test_private_key() {
        let key = dev_account(7).unwrap();
        let hex = format!("0x{}", key.private_key_hex());
        let config = DeployConfig::from_lookup(lookup_from(&[("PRIVATE_KEY", hex.as_str())])).unwrap();
        assert_eq!(config.deployer.address(), key.address());

        let result = DeployConfig::from_lookup(lookup_from(&[("PRIVATE_KEY", "xyz")]));
        assert!(matches!(result, Err(ConfigError::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_unknown_network() {
        let result = DeployConfig::from_lookup(lookup_from(&[("LEDGER_NETWORK", "mainnet")]));
        assert!(matches!(result, Err(ConfigError::UnknownNetwork(n)) if n == "mainnet"));
    }

    #[test]
    fn test_network_names_round_trip() {
        for network in [Network::Local, Network::Rinkeby, Network::Bsc, Network::Ropsten] {
            assert_eq!(network.name().parse::<Network>().unwrap(), network);
        }
    }
}
