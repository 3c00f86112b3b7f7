//! Handler for the `profile` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::config::NetworkProfile;
use crate::error::{ConfigError, Result};

/// Starter profile template with field documentation.
const PROFILE_TEMPLATE: &str = include_str!("../../../../profile.toml.example");

/// Execute `profile show`.
pub fn execute_show(profile_path: Option<&Path>) -> Result<()> {
    let profile = NetworkProfile::resolve(profile_path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "profile.show",
            "profile": profile,
        }));
        return Ok(());
    }

    output::section("Network Profile");
    output::field("Network", &profile.network);
    output::field("Chain id", profile.chain_id);
    output::field("RPC", &profile.rpc_url);

    output::section("Contracts");
    output::field("Relayer", &profile.relayer);
    output::field(
        "Bet token",
        format!(
            "{} ({}, {} decimals)",
            profile.bet_token, profile.token_symbol, profile.token_decimals
        ),
    );
    output::field("Native", &profile.native_symbol);

    output::section("Endpoints");
    output::field("Game feed", &profile.data_feed_url);
    output::field("Bets subgraph", &profile.bets_subgraph_url);
    output::field("Book API", &profile.book_api_url);

    Ok(())
}

/// Execute `profile init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "profile",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, PROFILE_TEMPLATE)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "profile.init",
            "path": path.display().to_string(),
        }));
        return Ok(());
    }

    output::section("Profile Initialized");
    output::success("Created profile file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!(
        "1. Edit {} if you need non-default endpoints",
        path.display()
    ));
    output::note("2. Set BETTOR_PRIVATE_KEY in the environment (never on the command line)");
    output::note(&format!(
        "3. Run: punter profile show --profile {}",
        path.display()
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_valid_toml() {
        let parsed: std::result::Result<toml::Value, _> = toml::from_str(PROFILE_TEMPLATE);
        assert!(parsed.is_ok(), "PROFILE_TEMPLATE is not valid TOML");
    }

    #[test]
    fn template_loads_as_the_stock_polygon_profile() {
        let profile: NetworkProfile = toml::from_str(PROFILE_TEMPLATE).unwrap();
        assert_eq!(profile.network, "polygon");
        assert_eq!(profile.chain_id, 137);
        assert!(profile.relayer_address().is_ok());
        assert!(profile.bet_token_address().is_ok());
    }

    #[test]
    fn init_creates_the_file_with_template_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");

        execute_init(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), PROFILE_TEMPLATE);
    }

    #[test]
    fn init_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("profile.toml");

        execute_init(&path, false).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        fs::write(&path, "chain_id = 1\n").unwrap();

        let err = execute_init(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "chain_id = 1\n");
    }

    #[test]
    fn init_overwrites_with_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        fs::write(&path, "chain_id = 1\n").unwrap();

        execute_init(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), PROFILE_TEMPLATE);
    }

    #[test]
    fn show_resolves_an_explicit_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        fs::write(&path, "token_symbol = \"USDC\"\n").unwrap();

        assert!(execute_show(Some(&path)).is_ok());
    }
}
