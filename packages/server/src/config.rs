//! Server configuration.
//!
//! Every option can be given on the command line or through a `HIROBA_*`
//! environment variable.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::domain::DEFAULT_PARTICIPANT_CAPACITY;

/// What happens to an identity's older connection when a new one opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PresencePolicy {
    /// Every connection of an identity stays open and receives room traffic
    #[default]
    MultiDevice,
    /// Only the newest connection stays; the previous one is closed
    SingleSession,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "hiroba-server")]
#[command(about = "Multi-room chat server with realtime fan-out")]
#[command(version)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on (0 picks a free port)
    #[arg(short, long, env = "HIROBA_PORT", default_value_t = 8080)]
    pub port: u16,

    /// HMAC secret used to sign and verify access tokens
    #[arg(long, env = "HIROBA_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Lifetime of issued access tokens
    #[arg(long, env = "HIROBA_TOKEN_TTL_MINUTES", default_value_t = 60)]
    pub token_ttl_minutes: i64,

    #[arg(long, env = "HIROBA_PRESENCE_POLICY", value_enum, default_value_t = PresencePolicy::MultiDevice)]
    pub presence_policy: PresencePolicy,

    /// Participant capacity of newly created rooms
    #[arg(long, env = "HIROBA_MAX_PARTICIPANTS", default_value_t = DEFAULT_PARTICIPANT_CAPACITY)]
    pub max_participants: usize,

    /// How long a connection caches its own display name
    #[arg(long, env = "HIROBA_NAME_CACHE_TTL_SECS", default_value_t = 60)]
    pub name_cache_ttl_secs: u64,

    /// JSON file of `{ "profile_id", "user_name" }` records to seed the identity store
    #[arg(long, env = "HIROBA_USERS")]
    pub users: Option<PathBuf>,

    /// Expose `POST /api/tokens` for local development
    #[arg(long, env = "HIROBA_DEV_TOKEN_ENDPOINT", default_value_t = false)]
    pub dev_token_endpoint: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn test_defaults() {
        // テスト項目: 必須項目だけを指定した場合のデフォルト値
        // when (操作):
        let config = ServerConfig::parse_from(["hiroba-server", "--jwt-secret", "s3cret"]);

        // then (期待する結果):
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.presence_policy, PresencePolicy::MultiDevice);
        assert_eq!(config.max_participants, 100);
        assert_eq!(config.token_ttl_minutes, 60);
        assert!(!config.dev_token_endpoint);
        assert!(config.users.is_none());
    }

    #[test]
    fn test_presence_policy_flag() {
        // テスト項目: presence-policy は kebab-case の値で指定できる
        let config = ServerConfig::parse_from([
            "hiroba-server",
            "--jwt-secret",
            "s3cret",
            "--presence-policy",
            "single-session",
            "--port",
            "0",
        ]);

        assert_eq!(config.presence_policy, PresencePolicy::SingleSession);
        assert_eq!(config.port, 0);
    }

    #[test]
    fn test_jwt_secret_is_required() {
        // テスト項目: JWT のシークレットは必須で、既定値を持たない（環境変数からのみ補える）
        // given (前提条件):
        let command = ServerConfig::command();

        // when (操作):
        let secret = command
            .get_arguments()
            .find(|arg| arg.get_id() == "jwt_secret")
            .unwrap();

        // then (期待する結果):
        assert!(secret.is_required_set());
        assert!(secret.get_default_values().is_empty());
        assert_eq!(secret.get_env(), Some(OsStr::new("HIROBA_JWT_SECRET")));
    }
}
