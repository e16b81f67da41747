//! `fosa config` and `fosa blocklist`: rule file lookup and inspection.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use fosa_engine::{Blocklist, RuleConfig};

use crate::CliError;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective rules as TOML
    #[command(after_help = "\
Examples:
  fosa config show
  fosa config show --config rules.toml > my-rules.toml")]
    Show {
        /// Rule file (TOML). Defaults to <config dir>/fosa/rules.toml when present
        #[arg(long, env = "FOSA_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Check a rule file without running
    #[command(after_help = "\
Examples:
  fosa config validate rules.toml")]
    Validate {
        /// Path to the rule file
        file: PathBuf,
    },
}

pub fn cmd_config(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Show { config } => cmd_config_show(config),
        ConfigCommands::Validate { file } => cmd_config_validate(file),
    }
}

/// `<config dir>/fosa/rules.toml`, if such a file exists.
pub fn default_config_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("fosa").join("rules.toml");
    path.is_file().then_some(path)
}

/// Resolve the rule set for a run: an explicit file, else the per-user
/// default file, else the built-in rules.
pub fn load_config(explicit: Option<&Path>) -> Result<RuleConfig, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => {
                log::debug!("no rule file, using built-in rules");
                return Ok(RuleConfig::default());
            }
        },
    };
    read_config(&path)
}

fn read_config(path: &Path) -> Result<RuleConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read rule file {}: {e}", path.display())))?;
    let config = RuleConfig::from_toml(&text)
        .map_err(|e| CliError::from(e).with_hint(format!("in {}", path.display())))?;
    log::debug!("rules loaded from {}", path.display());
    Ok(config)
}

fn cmd_config_show(config: Option<PathBuf>) -> Result<(), CliError> {
    let rules = load_config(config.as_deref())?;
    let text = rules.to_toml()?;
    print!("{text}");
    Ok(())
}

fn cmd_config_validate(file: PathBuf) -> Result<(), CliError> {
    let rules = read_config(&file)?;
    eprintln!(
        "valid: {} excluded content type(s), {} protected, blocklist header '{}'",
        rules.rules.excluded_content_types.len(),
        rules.rules.protected_content_types.len(),
        rules.blocklist.partner_header,
    );
    Ok(())
}

pub fn cmd_blocklist(file: PathBuf, config: Option<PathBuf>) -> Result<(), CliError> {
    let rules = load_config(config.as_deref())?;
    let text = fosa_io::text::read_text(&file)?;
    let blocklist = Blocklist::parse(&text, &rules.blocklist)?;

    let json = serde_json::to_string_pretty(&blocklist)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
    println!("{json}");

    eprintln!(
        "{} partner(s), {} blocked agreement(s)",
        blocklist.len(),
        blocklist.agreement_count()
    );
    Ok(())
}
