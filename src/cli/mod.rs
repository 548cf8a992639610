//! Command-line surface: deployment, account listing and scripted sessions

pub mod commands;
pub mod script;

pub use commands::{cmd_accounts, cmd_deploy, cmd_run, CliResult};
pub use script::{run_script, Script, ScriptError, ScriptReport, Step, StepResult};
