//! Ledger deployment
//!
//! Instantiates the ledger once from a [`DeployConfig`], crediting the whole
//! supply to the configured deployer.

pub mod config;

pub use config::{ConfigError, DeployConfig, Network, TokenParams};

use crate::crypto::Address;
use crate::token::{SharedToken, Token, TokenMetadata};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A deployed ledger together with where and by whom it was deployed
#[derive(Clone, Debug)]
pub struct Deployment {
    pub record: DeploymentRecord,
    pub token: SharedToken,
}

/// Printable summary of a deployment
#[derive(Clone, Debug, Serialize)]
pub struct DeploymentRecord {
    pub network: Network,
    pub endpoint: String,
    pub deployer: Address,
    pub metadata: TokenMetadata,
    pub deployer_balance: u128,
    pub deployed_at: DateTime<Utc>,
}

/// Deploy a fresh ledger
pub fn deploy(config: &DeployConfig) -> Deployment {
    let deployer = config.deployer.address();
    let params = &config.token;

    log::info!("Deploying ledger with the account: {}", deployer);
    log::info!("Network: {}", config.network);

    let token = Token::new(
        params.name.clone(),
        params.symbol.clone(),
        params.decimals,
        params.supply,
        deployer,
    );

    let record = DeploymentRecord {
        network: config.network,
        endpoint: config.endpoint.clone(),
        deployer,
        metadata: token.metadata().clone(),
        deployer_balance: token.balance_of(&deployer),
        deployed_at: Utc::now(),
    };

    log::info!(
        "Ledger {} ({}) deployed, supply {}",
        record.metadata.name(),
        record.metadata.symbol(),
        record.metadata.total_supply()
    );

    Deployment {
        record,
        token: SharedToken::new(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::dev_account;

    #[test]
    fn test_deploy_defaults() {
        let config = DeployConfig::local().unwrap();
        let deployment = deploy(&config);
        let deployer = dev_account(0).unwrap().address();

        assert_eq!(deployment.record.deployer, deployer);
        assert_eq!(deployment.record.deployer_balance, 1_000_000);
        assert_eq!(deployment.token.name(), "Test Token S");
        assert_eq!(deployment.token.symbol(), "TTS");
        assert_eq!(deployment.token.decimals(), 18);
        assert_eq!(deployment.token.balance_of(&deployer), 1_000_000);
        assert!(deployment.token.drain_events().is_empty());
    }

    #[test]
    fn test_deploy_custom_params() {
        let mut config = DeployConfig::local().unwrap();
        config.deployer = dev_account(3).unwrap();
        config.token = TokenParams {
            name: "Other".to_string(),
            symbol: "OTH".to_string(),
            decimals: 6,
            supply: 42,
        };

        let deployment = deploy(&config);
        assert_eq!(deployment.token.total_supply(), 42);
        assert_eq!(
            deployment
                .token
                .balance_of(&dev_account(3).unwrap().address()),
            42
        );
        assert_eq!(deployment.token.balance_of(&dev_account(0).unwrap().address()), 0);
    }

    #[test]
    fn test_record_serializes() {
        let deployment = deploy(&DeployConfig::local().unwrap());
        let json = serde_json::to_value(&deployment.record).unwrap();

        assert_eq!(json["network"], "local");
        assert_eq!(json["metadata"]["symbol"], "TTS");
        assert_eq!(json["deployer"], deployment.record.deployer.to_string());
    }
}
