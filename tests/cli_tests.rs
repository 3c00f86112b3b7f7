//! CLI integration tests.
//!
//! These run the real binary but never reach the network: every case
//! either exercises clap itself or fails during input resolution in
//! JSON mode, before any client makes a request.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

/// Well-known development key (publicly documented, carries nothing).
const TEST_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

/// Environment variables the resolution layer reads. Cleared on every
/// invocation so ambient shell state cannot leak into assertions.
const RESOLVED_ENV: &[&str] = &[
    "POLYGON_RPC_URL",
    "BETTOR_PRIVATE_KEY",
    "BETTOR_ADDRESS",
    "BET_AMOUNT",
    "CONDITION_ID",
    "OUTCOME_ID",
    "MIN_ODDS",
    "BET_IDS",
    "PUNTER_PROFILE",
];

fn punter() -> Command {
    let mut cmd = cargo_bin_cmd!("punter");
    for name in RESOLVED_ENV {
        cmd.env_remove(name);
    }
    cmd
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    path.push(format!("punter-cli-{name}-{nanos}.toml"));
    fs::write(&path, contents).expect("write temp file");
    path
}

#[test]
fn test_help_lists_lifecycle_commands() {
    punter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("games"))
        .stdout(predicate::str::contains("balances"))
        .stdout(predicate::str::contains("allowance"))
        .stdout(predicate::str::contains("bets"))
        .stdout(predicate::str::contains("place"))
        .stdout(predicate::str::contains("claim"))
        .stdout(predicate::str::contains("profile"));
}

#[test]
fn test_version() {
    punter()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("punter"));
}

#[test]
fn test_no_subcommand_fails_with_usage() {
    punter()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_subcommand_fails() {
    punter().arg("settle").assert().failure();
}

#[test]
fn test_color_never_flag_is_accepted() {
    punter().args(["--color", "never", "--help"]).assert().success();
}

#[test]
fn test_games_help_lists_filters() {
    punter()
        .args(["games", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--sport"))
        .stdout(predicate::str::contains("--country"))
        .stdout(predicate::str::contains("--order-by"));
}

#[test]
fn test_games_rejects_non_numeric_first() {
    punter().args(["games", "--first", "many"]).assert().failure();
}

#[test]
fn test_place_help_never_offers_a_key_flag() {
    punter()
        .args(["place", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--amount"))
        .stdout(predicate::str::contains("--min-odds"))
        .stdout(predicate::str::contains("--private-key").not())
        .stdout(predicate::str::contains("--key").not());
}

#[test]
fn test_json_balances_without_address_is_missing_input() {
    let profile = temp_file("balances", "");
    punter()
        .args(["--json", "balances", "--profile"])
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("BETTOR_ADDRESS"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_json_allowance_without_address_is_missing_input() {
    let profile = temp_file("allowance", "");
    punter()
        .args(["--json", "allowance", "--profile"])
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("BETTOR_ADDRESS"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_json_place_without_amount_is_missing_input() {
    let profile = temp_file("place-amount", "");
    punter()
        .args(["--json", "place", "--profile"])
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("BET_AMOUNT"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_json_place_without_selection_is_missing_input() {
    let profile = temp_file("place-selection", "");
    punter()
        .args(["--json", "place", "--amount", "1000000", "--profile"])
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--condition-id"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_json_place_without_key_is_missing_input() {
    let profile = temp_file("place-key", "");
    punter()
        .args([
            "--json",
            "place",
            "--amount",
            "1000000",
            "--min-odds",
            "1.5",
            "--condition-id",
            "100500",
            "--outcome-id",
            "29",
            "--profile",
        ])
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("BETTOR_PRIVATE_KEY"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_json_place_without_yes_requires_confirmation() {
    let profile = temp_file("place-confirm", "");
    punter()
        .env("BETTOR_PRIVATE_KEY", TEST_KEY)
        .args([
            "--json",
            "place",
            "--amount",
            "1000000",
            "--min-odds",
            "1.5",
            "--condition-id",
            "100500",
            "--outcome-id",
            "29",
            "--profile",
        ])
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_place_rejects_mismatched_selection_lists() {
    let profile = temp_file("place-mismatch", "");
    punter()
        .args([
            "--json",
            "place",
            "--amount",
            "1000000",
            "--condition-id",
            "100500",
            "--condition-id",
            "100501",
            "--outcome-id",
            "29",
            "--profile",
        ])
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 condition ids but 1 outcome ids"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_json_claim_without_bet_ids_is_missing_input() {
    let profile = temp_file("claim-ids", "");
    punter()
        .args(["--json", "claim", "--profile"])
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("BET_IDS"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_claim_rejects_malformed_bet_ids() {
    let profile = temp_file("claim-bad-ids", "");
    punter()
        .args(["--json", "claim", "--bet-ids", "12,abc", "--profile"])
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("abc"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_json_claim_without_yes_requires_confirmation() {
    let profile = temp_file("claim-confirm", "");
    punter()
        .env("BETTOR_PRIVATE_KEY", TEST_KEY)
        .args(["--json", "claim", "--bet-ids", "12,34", "--profile"])
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_profile_show_reports_polygon_defaults() {
    let profile = temp_file("show", "");
    punter()
        .args(["profile", "show", "--profile"])
        .arg(&profile)
        .assert()
        .success()
        .stdout(predicate::str::contains("polygon"))
        .stdout(predicate::str::contains("137"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_json_profile_show_emits_the_profile() {
    let profile = temp_file("show-json", "token_symbol = \"USDC\"\n");
    punter()
        .args(["--json", "profile", "show", "--profile"])
        .arg(&profile)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\":\"profile.show\""))
        .stdout(predicate::str::contains("\"token_symbol\":\"USDC\""));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_profile_show_rejects_a_broken_profile() {
    let profile = temp_file("show-broken", "chain_id = \"polygon\"\n");
    punter()
        .args(["profile", "show", "--profile"])
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_profile_show_rejects_a_missing_explicit_profile() {
    punter()
        .args(["profile", "show", "--profile", "/nonexistent/punter-profile.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read profile"));
}

#[test]
fn test_profile_init_writes_and_refuses_overwrite() {
    let dir = std::env::temp_dir().join(format!(
        "punter-init-{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    let path = dir.join("profile.toml");

    punter()
        .args(["profile", "init"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists(), "profile file should have been written");

    punter()
        .args(["profile", "init"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    punter()
        .args(["profile", "init", "--force"])
        .arg(&path)
        .assert()
        .success();

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_initialized_profile_round_trips_through_show() {
    let dir = std::env::temp_dir().join(format!(
        "punter-roundtrip-{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    let path = dir.join("profile.toml");

    punter()
        .args(["profile", "init"])
        .arg(&path)
        .assert()
        .success();

    punter()
        .args(["profile", "show", "--profile"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("polygon"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_profile_env_var_names_the_profile() {
    let profile = temp_file("env-profile", "token_symbol = \"DAI\"\n");
    punter()
        .env("PUNTER_PROFILE", &profile)
        .args(["profile", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DAI"));
    let _ = fs::remove_file(&profile);
}

#[test]
fn test_quiet_mode_silences_games_listing() {
    let profile = temp_file("quiet", "");
    punter()
        .args(["--quiet", "games", "--profile"])
        .arg(&profile)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let _ = fs::remove_file(&profile);
}
