//! Network profile: chain, token, relayer, and endpoint settings.
//!
//! Profiles are TOML files where every field has a Polygon default, so
//! an empty file (or no file at all) yields the stock Polygon profile.
//! Resolution order: the `--profile` flag, the `PUNTER_PROFILE`
//! environment variable, `~/.punter/profile.toml` when present, and
//! finally the built-in defaults.

use std::path::Path;
use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::paths;
use crate::error::{ConfigError, Result};

/// Environment variable naming an alternate profile file.
pub const PROFILE_ENV: &str = "PUNTER_PROFILE";

const POLYGON_NETWORK: &str = "polygon";
const POLYGON_CHAIN_ID: u64 = 137;
const POLYGON_RPC_URL: &str = "https://poly.api.pocket.network";
const POLYGON_RELAYER: &str = "0x8dA05c0021e6b35865FDC959c54dCeF3A4AbBa9d";
const POLYGON_BET_TOKEN: &str = "0xc2132d05d31c914a87c6611c10748aeb04b58e8f";
const POLYGON_TOKEN_SYMBOL: &str = "USDT";
const POLYGON_TOKEN_DECIMALS: u32 = 6;
const POLYGON_NATIVE_SYMBOL: &str = "POL";
const POLYGON_DATA_FEED_URL: &str =
    "https://thegraph-1.onchainfeed.org/subgraphs/name/azuro-protocol/azuro-data-feed-polygon";
const POLYGON_BETS_SUBGRAPH_URL: &str =
    "https://thegraph.onchainfeed.org/subgraphs/name/azuro-protocol/azuro-api-polygon-v3";
const POLYGON_BOOK_API_URL: &str = "https://api.pinwin.xyz";

fn default_network() -> String {
    POLYGON_NETWORK.to_string()
}

const fn default_chain_id() -> u64 {
    POLYGON_CHAIN_ID
}

fn default_rpc_url() -> String {
    POLYGON_RPC_URL.to_string()
}

fn default_relayer() -> String {
    POLYGON_RELAYER.to_string()
}

fn default_bet_token() -> String {
    POLYGON_BET_TOKEN.to_string()
}

fn default_token_symbol() -> String {
    POLYGON_TOKEN_SYMBOL.to_string()
}

const fn default_token_decimals() -> u32 {
    POLYGON_TOKEN_DECIMALS
}

fn default_native_symbol() -> String {
    POLYGON_NATIVE_SYMBOL.to_string()
}

fn default_data_feed_url() -> String {
    POLYGON_DATA_FEED_URL.to_string()
}

fn default_bets_subgraph_url() -> String {
    POLYGON_BETS_SUBGRAPH_URL.to_string()
}

fn default_book_api_url() -> String {
    POLYGON_BOOK_API_URL.to_string()
}

/// Settings for one venue deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// Chain slug sent to the venue in bet and claim requests.
    #[serde(default = "default_network")]
    pub network: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Relayer contract allowed to move the bet token. Order payloads
    /// must target this address or signing is refused.
    #[serde(default = "default_relayer")]
    pub relayer: String,
    /// ERC-20 token bets are denominated in.
    #[serde(default = "default_bet_token")]
    pub bet_token: String,
    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u32,
    #[serde(default = "default_native_symbol")]
    pub native_symbol: String,
    /// GraphQL endpoint serving upcoming games and odds.
    #[serde(default = "default_data_feed_url")]
    pub data_feed_url: String,
    /// GraphQL endpoint serving historical bets.
    #[serde(default = "default_bets_subgraph_url")]
    pub bets_subgraph_url: String,
    /// Base URL of the venue's agent API.
    #[serde(default = "default_book_api_url")]
    pub book_api_url: String,
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self {
            network: default_network(),
            chain_id: default_chain_id(),
            rpc_url: default_rpc_url(),
            relayer: default_relayer(),
            bet_token: default_bet_token(),
            token_symbol: default_token_symbol(),
            token_decimals: default_token_decimals(),
            native_symbol: default_native_symbol(),
            data_feed_url: default_data_feed_url(),
            bets_subgraph_url: default_bets_subgraph_url(),
            book_api_url: default_book_api_url(),
        }
    }
}

impl NetworkProfile {
    /// The stock Polygon profile.
    #[must_use]
    pub fn polygon() -> Self {
        Self::default()
    }

    /// Loads and validates a profile file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadFile`] when the file cannot be read,
    /// [`ConfigError::Parse`] when it is not valid TOML, and
    /// [`ConfigError::InvalidValue`] when a field fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let profile: Self = match toml::from_str(&content) {
            Ok(profile) => profile,
            Err(source) => {
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    content,
                    source,
                }
                .into())
            }
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Resolves the effective profile for a run.
    ///
    /// # Errors
    ///
    /// An explicitly named profile (flag or environment variable) must
    /// load cleanly; only the implicit default path is allowed to be
    /// absent.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Ok(env_path) = std::env::var(PROFILE_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Self::load(Path::new(trimmed));
            }
        }
        let default_path = paths::default_profile();
        if default_path.exists() {
            debug!(path = %default_path.display(), "loading default profile");
            return Self::load(&default_path);
        }
        Ok(Self::polygon())
    }

    fn validate(&self) -> Result<()> {
        if self.network.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "network",
                reason: "must not be empty".into(),
            }
            .into());
        }
        if self.chain_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain_id",
                reason: "must not be zero".into(),
            }
            .into());
        }
        if self.token_decimals > 18 {
            return Err(ConfigError::InvalidValue {
                field: "token_decimals",
                reason: "must be at most 18".into(),
            }
            .into());
        }
        Self::check_address("relayer", &self.relayer)?;
        Self::check_address("bet_token", &self.bet_token)?;
        Self::check_url("rpc_url", &self.rpc_url)?;
        Self::check_url("data_feed_url", &self.data_feed_url)?;
        Self::check_url("bets_subgraph_url", &self.bets_subgraph_url)?;
        Self::check_url("book_api_url", &self.book_api_url)?;
        Ok(())
    }

    fn check_address(field: &'static str, value: &str) -> Result<()> {
        Address::from_str(value)
            .map(|_| ())
            .map_err(|err| {
                ConfigError::InvalidValue {
                    field,
                    reason: err.to_string(),
                }
                .into()
            })
    }

    fn check_url(field: &'static str, value: &str) -> Result<()> {
        Url::parse(value)
            .map(|_| ())
            .map_err(|err| {
                ConfigError::InvalidValue {
                    field,
                    reason: err.to_string(),
                }
                .into()
            })
    }

    /// Relayer contract as a checked address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the profile value
    /// does not parse.
    pub fn relayer_address(&self) -> Result<Address> {
        Address::from_str(&self.relayer).map_err(|err| {
            ConfigError::InvalidValue {
                field: "relayer",
                reason: err.to_string(),
            }
            .into()
        })
    }

    /// Bet token contract as a checked address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the profile value
    /// does not parse.
    pub fn bet_token_address(&self) -> Result<Address> {
        Address::from_str(&self.bet_token).map_err(|err| {
            ConfigError::InvalidValue {
                field: "bet_token",
                reason: err.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn polygon_defaults_are_complete_and_valid() {
        let profile = NetworkProfile::polygon();
        assert_eq!(profile.network, "polygon");
        assert_eq!(profile.chain_id, 137);
        assert_eq!(profile.token_symbol, "USDT");
        assert_eq!(profile.token_decimals, 6);
        assert_eq!(profile.native_symbol, "POL");
        assert!(profile.relayer_address().is_ok());
        assert!(profile.bet_token_address().is_ok());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn empty_profile_file_yields_the_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(&path, "").unwrap();

        let profile = NetworkProfile::load(&path).unwrap();
        assert_eq!(profile.chain_id, 137);
        assert_eq!(profile.rpc_url, POLYGON_RPC_URL);
    }

    #[test]
    fn partial_profile_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(&path, "rpc_url = \"https://rpc.example.org\"\ntoken_symbol = \"USDC\"\n")
            .unwrap();

        let profile = NetworkProfile::load(&path).unwrap();
        assert_eq!(profile.rpc_url, "https://rpc.example.org");
        assert_eq!(profile.token_symbol, "USDC");
        assert_eq!(profile.chain_id, 137);
    }

    #[test]
    fn malformed_toml_reports_a_parse_error_with_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(&path, "rpc_url = \n").unwrap();

        let err = NetworkProfile::load(&path).unwrap_err();
        match err {
            Error::Config(ConfigError::Parse { content, .. }) => {
                assert!(content.contains("rpc_url"));
            }
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn invalid_relayer_address_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(&path, "relayer = \"not-an-address\"\n").unwrap();

        let err = NetworkProfile::load(&path).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "relayer", .. })
        ));
    }

    #[test]
    fn missing_explicit_profile_is_an_error() {
        let err = NetworkProfile::load(Path::new("/nonexistent/profile.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ReadFile { .. })));
    }
}
