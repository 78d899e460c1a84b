//! Environment lookup and validation.
//!
//! `AppConfig::from_env` reads the process environment; the lookup is
//! parameterised so tests can feed a plain map instead of mutating global
//! state.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};
use crate::model::AppConfig;

/// Bucket receiving clean objects.
pub const ENV_DEST_BUCKET: &str = "CLAMGATE_DEST_BUCKET";
/// Bucket receiving flagged objects.
pub const ENV_QUARANTINE_BUCKET: &str = "CLAMGATE_QUARANTINE_BUCKET";
/// Webhook URL for detection alerts.
pub const ENV_WEBHOOK_URL: &str = "CLAMGATE_SLACK_WEBHOOK";
/// Optional bind address override.
pub const ENV_BIND_ADDR: &str = "CLAMGATE_BIND_ADDR";
/// Optional listen port, honoured when no bind address is given.
pub const ENV_PORT: &str = "PORT";
/// Optional scratch-directory override.
pub const ENV_SCRATCH_DIR: &str = "CLAMGATE_SCRATCH_DIR";
/// Optional signature-directory override.
pub const ENV_SIGNATURE_DIR: &str = "CLAMGATE_SIGNATURE_DIR";
/// Optional signature updater binary override.
pub const ENV_FRESHCLAM_BIN: &str = "CLAMGATE_FRESHCLAM_BIN";
/// Optional scanner binary override.
pub const ENV_CLAMSCAN_BIN: &str = "CLAMGATE_CLAMSCAN_BIN";
/// Optional static store access token (local development; production uses
/// the metadata service).
pub const ENV_ACCESS_TOKEN: &str = "CLAMGATE_ACCESS_TOKEN";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SCRATCH_DIR: &str = "/tmp/clamgate";
const DEFAULT_SIGNATURE_DIR: &str = "/tmp/clamgate/signatures";
const DEFAULT_FRESHCLAM_BIN: &str = "/usr/bin/freshclam";
const DEFAULT_CLAMSCAN_BIN: &str = "/usr/bin/clamscan";

impl AppConfig {
    /// Load and validate configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or a provided
    /// value fails validation.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or a provided
    /// value fails validation.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let dest_bucket = required(&lookup, ENV_DEST_BUCKET)?;
        let quarantine_bucket = required(&lookup, ENV_QUARANTINE_BUCKET)?;
        let webhook_url = required(&lookup, ENV_WEBHOOK_URL)?;
        if !(webhook_url.starts_with("https://") || webhook_url.starts_with("http://")) {
            return Err(ConfigError::InvalidField {
                field: ENV_WEBHOOK_URL,
                value: webhook_url,
                reason: "webhook url must be http(s)",
            });
        }
        if dest_bucket == quarantine_bucket {
            return Err(ConfigError::InvalidField {
                field: ENV_QUARANTINE_BUCKET,
                value: quarantine_bucket,
                reason: "quarantine bucket must differ from the clean destination",
            });
        }

        let bind_addr = parse_bind_addr(&lookup)?;
        let scratch_dir = path_or(&lookup, ENV_SCRATCH_DIR, DEFAULT_SCRATCH_DIR);
        let signature_dir = path_or(&lookup, ENV_SIGNATURE_DIR, DEFAULT_SIGNATURE_DIR);
        let freshclam_bin = path_or(&lookup, ENV_FRESHCLAM_BIN, DEFAULT_FRESHCLAM_BIN);
        let clamscan_bin = path_or(&lookup, ENV_CLAMSCAN_BIN, DEFAULT_CLAMSCAN_BIN);
        let access_token = lookup(ENV_ACCESS_TOKEN).filter(|value| !value.trim().is_empty());

        Ok(Self {
            bind_addr,
            dest_bucket,
            quarantine_bucket,
            webhook_url,
            scratch_dir,
            signature_dir,
            freshclam_bin,
            clamscan_bin,
            access_token,
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> ConfigResult<String> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv { name }),
    }
}

fn path_or(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> PathBuf {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| PathBuf::from(default), PathBuf::from)
}

fn parse_bind_addr(lookup: &impl Fn(&str) -> Option<String>) -> ConfigResult<SocketAddr> {
    if let Some(addr) = lookup(ENV_BIND_ADDR) {
        return addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidField {
                field: ENV_BIND_ADDR,
                value: addr,
                reason: "not a valid socket address",
            });
    }
    let port = match lookup(ENV_PORT) {
        Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidField {
            field: ENV_PORT,
            value: raw,
            reason: "not a valid port",
        })?,
        None => DEFAULT_PORT,
    };
    Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (ENV_DEST_BUCKET, "clean-bucket"),
            (ENV_QUARANTINE_BUCKET, "quarantine-bucket"),
            (ENV_WEBHOOK_URL, "https://hooks.test/services/T000"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> ConfigResult<AppConfig> {
        AppConfig::from_lookup(|name| env.get(name).map(ToString::to_string))
    }

    #[test]
    fn minimal_environment_loads_with_defaults() {
        let config = load(&base_env()).expect("minimal env should load");
        assert_eq!(config.dest_bucket, "clean-bucket");
        assert_eq!(config.quarantine_bucket, "quarantine-bucket");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.scratch_dir, PathBuf::from("/tmp/clamgate"));
        assert_eq!(
            config.signature_dir,
            PathBuf::from("/tmp/clamgate/signatures")
        );
    }

    #[test]
    fn missing_required_variable_is_rejected() {
        let mut env = base_env();
        env.remove(ENV_QUARANTINE_BUCKET);
        let err = load(&env).expect_err("missing quarantine bucket must fail");
        assert!(matches!(
            err,
            ConfigError::MissingEnv {
                name: ENV_QUARANTINE_BUCKET
            }
        ));
    }

    #[test]
    fn empty_required_variable_is_rejected() {
        let mut env = base_env();
        env.insert(ENV_DEST_BUCKET, "  ");
        let err = load(&env).expect_err("blank destination bucket must fail");
        assert!(matches!(
            err,
            ConfigError::MissingEnv {
                name: ENV_DEST_BUCKET
            }
        ));
    }

    #[test]
    fn identical_buckets_are_rejected() {
        let mut env = base_env();
        env.insert(ENV_QUARANTINE_BUCKET, "clean-bucket");
        let err = load(&env).expect_err("identical buckets must fail");
        assert!(matches!(err, ConfigError::InvalidField { .. }));
    }

    #[test]
    fn port_variable_sets_bind_address() {
        let mut env = base_env();
        env.insert(ENV_PORT, "9090");
        let config = load(&env).expect("port override should load");
        assert_eq!(config.bind_addr.port(), 9090);
    }

    #[test]
    fn explicit_bind_addr_wins_over_port() {
        let mut env = base_env();
        env.insert(ENV_PORT, "9090");
        env.insert(ENV_BIND_ADDR, "127.0.0.1:7000");
        let config = load(&env).expect("bind addr override should load");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:7000");
    }

    #[test]
    fn malformed_webhook_url_is_rejected() {
        let mut env = base_env();
        env.insert(ENV_WEBHOOK_URL, "hooks.test/services/T000");
        let err = load(&env).expect_err("schemeless webhook must fail");
        assert!(matches!(err, ConfigError::InvalidField { .. }));
    }
}
