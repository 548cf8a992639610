//! CLI commands for the ledger
//!
//! Implements all command handlers for the CLI interface.

use super::script::{run_script, Script, ScriptReport, StepResult};
use crate::crypto::{dev_accounts, KeyPair};
use crate::deploy::{deploy, DeployConfig, Deployment};
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Deploy a ledger and print the deployment record
pub fn cmd_deploy(config: &DeployConfig, json: bool) -> CliResult<Deployment> {
    let deployment = deploy(config);
    let record = &deployment.record;

    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(deployment);
    }

    let meta = &record.metadata;
    println!("🚀 Ledger deployed!");
    println!("   ├─ Network: {}", record.network);
    if !record.endpoint.is_empty() {
        println!("   ├─ Endpoint: {}", record.endpoint);
    }
    println!("   ├─ Deployer: {}", record.deployer);
    println!("   ├─ Name: {}", meta.name());
    println!("   ├─ Symbol: {}", meta.symbol());
    println!("   ├─ Decimals: {}", meta.decimals());
    println!(
        "   ├─ Total supply: {} ({} {})",
        meta.total_supply(),
        meta.format_amount(meta.total_supply()),
        meta.symbol()
    );
    println!("   └─ Deployer balance: {}", record.deployer_balance);

    Ok(deployment)
}

/// List development accounts, or generate a fresh key pair
pub fn cmd_accounts(count: u32, generate: bool) -> CliResult<()> {
    if generate {
        let kp = KeyPair::generate();
        println!("🔐 New key pair generated!");
        println!("   📍 Address: {}", kp.address());
        println!("   🔑 Public Key: {}", kp.public_key_hex());
        println!("   🗝️  Private Key: {}", kp.private_key_hex());
        println!("\n   ⚠️  Export it as PRIVATE_KEY to deploy from this account.");
        return Ok(());
    }

    println!("📋 Development accounts:");
    for (index, kp) in dev_accounts(count)?.iter().enumerate() {
        println!("   #{:<3} {}", index, kp.address());
    }

    Ok(())
}

/// Deploy a ledger and run a script of operations against it
pub fn cmd_run(config: &DeployConfig, path: &Path, json: bool) -> CliResult<ScriptReport> {
    let script = Script::load(path)?;

    let mut config = config.clone();
    if let Some(params) = &script.token {
        config.token = params.clone();
    }

    let deployment = deploy(&config);
    let report = run_script(&deployment.token, &script)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, config.report_operations);
    }

    if !report.passed() {
        return Err(format!(
            "script failed: {} unmet expectation(s), supply check {}",
            report.failed_expectations,
            if report.supply_ok { "passed" } else { "FAILED" }
        )
        .into());
    }

    Ok(report)
}

fn print_report(report: &ScriptReport, with_operations: bool) {
    println!("📜 Script results:");
    for step in &report.steps {
        let mark = match step.expectation_met {
            Some(true) => "✅",
            Some(false) => "❌",
            None => "  ",
        };
        let result = match &step.result {
            StepResult::Success { success } => format!("returned {}", success),
            StepResult::Value { value } => format!("= {}", value),
            StepResult::Reverted { reason } => format!("reverted: {}", reason),
        };
        println!("   {} [{}] {} {}", mark, step.index, step.op, result);
        for event in &step.events {
            println!("         └─ {}", event);
        }
    }

    println!("\n   Events emitted: {}", report.events.len());
    println!(
        "   Supply check: {}",
        if report.supply_ok { "passed" } else { "FAILED" }
    );

    if with_operations {
        println!("\n📊 Operation report:");
        for (op, count) in &report.operations {
            println!("   {:<14} {}", op, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cmd_deploy() {
        let config = DeployConfig::local().unwrap();
        let deployment = cmd_deploy(&config, false).unwrap();

        assert_eq!(deployment.token.total_supply(), 1_000_000);
        assert_eq!(
            deployment.token.balance_of(&config.deployer.address()),
            1_000_000
        );
    }

    #[test]
    fn test_cmd_accounts() {
        cmd_accounts(3, false).unwrap();
        cmd_accounts(0, true).unwrap();
    }

    #[test]
    fn test_cmd_run_passes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{
                "token": {{ "supply": 500 }},
                "steps": [
                    {{ "op": "transfer", "caller": "#0", "to": "#1", "amount": 500, "expect": "ok" }},
                    {{ "op": "transfer", "caller": "#0", "to": "#1", "amount": 1,
                       "expect": "Transfer amount exceeds balance" }}
                ]
            }}"##
        )
        .unwrap();

        let report = cmd_run(&DeployConfig::local().unwrap(), file.path(), true).unwrap();
        assert!(report.passed());
        assert_eq!(report.events.len(), 1);
    }

    #[test]
    fn test_cmd_run_reports_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{ "steps": [ {{ "op": "balance_of", "account": "#5", "expect": 1 }} ] }}"##
        )
        .unwrap();

        let mut config = DeployConfig::local().unwrap();
        config.report_operations = true;
        assert!(cmd_run(&config, file.path(), false).is_err());
    }

    #[test]
    fn test_cmd_run_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(cmd_run(&DeployConfig::local().unwrap(), &missing, false).is_err());
    }
}
