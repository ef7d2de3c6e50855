//! Configuration for the bridge binary.
//!
//! Every option can be given as a command-line flag or through the
//! environment. Flags win over environment variables.
//!
//! | flag | env | default |
//! |---|---|---|
//! | `--mqtt-host` | `MQTT_HOST` | `localhost` |
//! | `--mqtt-port` | `MQTT_PORT` | `1883` |
//! | `--mqtt-user` | `MQTT_USER` | unset |
//! | `--mqtt-pass` | `MQTT_PASS` | unset |
//! | `--mqtt-client-id` | `MQTT_CLIENT_ID` | generated |
//! | `--mqtt-keepalive-secs` | `MQTT_KEEPALIVE_SECS` | `60` |
//! | `--reconnect-delay-ms` | `MQTT_RECONNECT_DELAY_MS` | `2000` |
//! | `--topic-prefix` | `TOPIC_PREFIX` | `shairport-sync` |
//! | `--http-host` | `HTTP_HOST` | `0.0.0.0` |
//! | `--http-port` | `HTTP_PORT` | `5000` |
//! | `--debug` | `DEBUG` | off |
//! | `--log-json` | `LOG_JSON` | off |
//!
//! The two switches take an optional value (`--debug=1`, `DEBUG=yes`,
//! `LOG_JSON=off`); any of `1/0`, `true/false`, `yes/no`, `on/off` works.

use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use shairport_metadata_api::ServerConfig;
use shairport_metadata_core::DEFAULT_TOPIC_PREFIX;
use shairport_metadata_core::topic::normalize_prefix;

use crate::error::ConfigError;
use crate::mqtt::MqttSettings;

/// Complete bridge configuration.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shairport-metadata-server",
    version,
    about = "Serve Shairport Sync now-playing metadata from MQTT over HTTP"
)]
pub struct BridgeConfig {
    /// MQTT broker host.
    #[arg(long, env = "MQTT_HOST", default_value = "localhost")]
    pub mqtt_host: String,

    /// MQTT broker port.
    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    pub mqtt_port: u16,

    /// MQTT username. Only used together with a password.
    #[arg(long, env = "MQTT_USER")]
    pub mqtt_user: Option<String>,

    /// MQTT password. Only used together with a username.
    #[arg(long, env = "MQTT_PASS", hide_env_values = true)]
    pub mqtt_pass: Option<String>,

    /// MQTT client id. A random one is generated when unset.
    #[arg(long, env = "MQTT_CLIENT_ID")]
    pub mqtt_client_id: Option<String>,

    /// MQTT keep-alive interval in seconds.
    #[arg(long, env = "MQTT_KEEPALIVE_SECS", default_value_t = 60)]
    pub mqtt_keepalive_secs: u64,

    /// Pause before polling the broker again after a connection error.
    #[arg(long, env = "MQTT_RECONNECT_DELAY_MS", default_value_t = 2000)]
    pub reconnect_delay_ms: u64,

    /// Topic namespace Shairport Sync publishes under.
    #[arg(long, env = "TOPIC_PREFIX", default_value = DEFAULT_TOPIC_PREFIX)]
    pub topic_prefix: String,

    /// Address the HTTP server binds to.
    #[arg(long, env = "HTTP_HOST", default_value = "0.0.0.0")]
    pub http_host: String,

    /// Port the HTTP server listens on.
    #[arg(long, env = "HTTP_PORT", default_value_t = 5000)]
    pub http_port: u16,

    /// Enable debug logging.
    #[arg(
        long,
        env = "DEBUG",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true"
    )]
    pub debug: bool,

    /// Emit logs as JSON lines.
    #[arg(
        long,
        env = "LOG_JSON",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true"
    )]
    pub log_json: bool,
}

impl BridgeConfig {
    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt_host.trim().is_empty() {
            return Err(ConfigError::Empty("MQTT host"));
        }
        if self.http_host.trim().is_empty() {
            return Err(ConfigError::Empty("HTTP host"));
        }
        let prefix = normalize_prefix(&self.topic_prefix);
        if prefix.is_empty() {
            return Err(ConfigError::Empty("topic prefix"));
        }
        if prefix.contains(['#', '+']) {
            return Err(ConfigError::WildcardPrefix(self.topic_prefix.clone()));
        }
        if self.mqtt_keepalive_secs == 0 {
            return Err(ConfigError::ZeroKeepAlive);
        }
        Ok(())
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub const fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    /// Query server settings.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.http_host.clone(),
            port: self.http_port,
        }
    }

    /// MQTT connection settings.
    ///
    /// Credentials are passed on only when both user and password are set.
    pub fn mqtt_settings(&self) -> MqttSettings {
        let credentials = match (&self.mqtt_user, &self.mqtt_pass) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        };

        MqttSettings {
            host: self.mqtt_host.clone(),
            port: self.mqtt_port,
            client_id: self
                .mqtt_client_id
                .clone()
                .unwrap_or_else(MqttSettings::generate_client_id),
            credentials,
            keep_alive: Duration::from_secs(self.mqtt_keepalive_secs),
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
            topic_prefix: normalize_prefix(&self.topic_prefix).to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> BridgeConfig {
        let argv = std::iter::once("shairport-metadata-server").chain(args.iter().copied());
        BridgeConfig::try_parse_from(argv).unwrap_or_else(|e| {
            tracing::error!("argument parsing failed: {e}");
            std::process::exit(1);
        })
    }

    fn defaults() -> BridgeConfig {
        parse(&[
            "--mqtt-host",
            "localhost",
            "--mqtt-port",
            "1883",
            "--topic-prefix",
            "shairport-sync",
            "--http-host",
            "0.0.0.0",
            "--http-port",
            "5000",
        ])
    }

    #[test]
    fn flags_are_parsed() {
        let config = parse(&[
            "--mqtt-host",
            "broker.lan",
            "--mqtt-port",
            "8883",
            "--topic-prefix",
            "airplay/",
            "--http-port",
            "8080",
            "--debug",
        ]);
        assert_eq!(config.mqtt_host, "broker.lan");
        assert_eq!(config.mqtt_port, 8883);
        assert_eq!(config.http_port, 8080);
        assert!(config.debug);
        assert_eq!(config.log_filter(), "debug");
        assert_eq!(config.mqtt_settings().topic_prefix, "airplay");
    }

    #[test]
    fn defaults_validate() {
        let config = defaults();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(
            config.server_config(),
            ServerConfig {
                host: String::from("0.0.0.0"),
                port: 5000,
            }
        );
    }

    #[test]
    fn credentials_need_both_parts() {
        let mut config = defaults();
        config.mqtt_user = Some(String::from("user"));
        config.mqtt_pass = None;
        assert!(config.mqtt_settings().credentials.is_none());

        config.mqtt_pass = Some(String::from("secret"));
        assert_eq!(
            config.mqtt_settings().credentials,
            Some((String::from("user"), String::from("secret")))
        );
    }

    #[test]
    fn explicit_client_id_is_kept() {
        let mut config = defaults();
        config.mqtt_client_id = Some(String::from("display-bridge"));
        assert_eq!(config.mqtt_settings().client_id, "display-bridge");
    }

    #[test]
    fn rejects_wildcard_prefix() {
        let mut config = defaults();
        config.topic_prefix = String::from("shairport/#");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WildcardPrefix(_))
        ));
    }

    #[test]
    fn rejects_empty_values() {
        let mut config = defaults();
        config.topic_prefix = String::from("/");
        assert_eq!(config.validate(), Err(ConfigError::Empty("topic prefix")));

        let mut config = defaults();
        config.mqtt_host = String::from("  ");
        assert_eq!(config.validate(), Err(ConfigError::Empty("MQTT host")));
    }

    #[test]
    fn rejects_zero_keepalive() {
        let mut config = defaults();
        config.mqtt_keepalive_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroKeepAlive));
    }

    #[test]
    fn switches_default_off() {
        let config = defaults();
        assert!(!config.debug);
        assert!(!config.log_json);
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn switches_accept_numeric_values() {
        let config = parse(&["--debug=1", "--log-json=1"]);
        assert!(config.debug);
        assert!(config.log_json);

        let config = parse(&["--debug=0", "--log-json=0"]);
        assert!(!config.debug);
        assert!(!config.log_json);
    }

    #[test]
    fn switches_accept_words() {
        let config = parse(&["--debug=yes", "--log-json=off"]);
        assert!(config.debug);
        assert!(!config.log_json);

        let config = parse(&["--debug=false", "--log-json=on"]);
        assert!(!config.debug);
        assert!(config.log_json);
    }

    #[test]
    fn bare_switch_does_not_consume_next_flag() {
        let config = parse(&["--log-json", "--http-port", "8080"]);
        assert!(config.log_json);
        assert_eq!(config.http_port, 8080);
    }

    #[test]
    fn switch_rejects_garbage() {
        let argv = ["shairport-metadata-server", "--debug=maybe"];
        assert!(BridgeConfig::try_parse_from(argv).is_err());
    }
}
