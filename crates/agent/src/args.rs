use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use a2a_auth::{AuthConfig, AuthError, HmacAuth, RequestSigner, StaticSecrets};

use crate::server::ServerConfig;

/// Command-line and environment settings shared by every agent binary.
/// Flatten into a binary's own `clap::Parser`.
#[derive(Debug, Clone, clap::Args)]
pub struct AgentArgs {
    /// Listen address. Each binary has its own default.
    #[arg(long, env = "A2A_BIND")]
    pub bind: Option<SocketAddr>,

    /// Identity used when signing outbound requests.
    #[arg(long, env = "A2A_AGENT_ID")]
    pub agent_id: Option<String>,

    /// Shared secret for outbound signatures. Unsigned when absent.
    #[arg(long, env = "A2A_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Inbound secrets as `agent_id=secret,...`. Enables signature checks.
    #[arg(long, env = "A2A_PEER_SECRETS", hide_env_values = true)]
    pub peer_secrets: Option<String>,

    /// Accepted clock skew for signed requests; 0 disables the check.
    #[arg(long, env = "A2A_CLOCK_SKEW_SECS", default_value_t = 120)]
    pub clock_skew_secs: u64,

    #[arg(long, env = "A2A_REQUEST_TIMEOUT_MS", default_value_t = 5000)]
    pub request_timeout_ms: u64,
}

impl AgentArgs {
    pub fn bind_or(&self, default: SocketAddr) -> SocketAddr {
        self.bind.unwrap_or(default)
    }

    pub fn agent_id_or(&self, default: &str) -> String {
        self.agent_id.clone().unwrap_or_else(|| default.to_string())
    }

    pub fn signer(&self, agent_id: &str) -> Option<RequestSigner> {
        self.secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| RequestSigner::new(agent_id, s.as_bytes()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Inbound verification, when peer secrets are configured.
    pub fn hmac_auth(&self) -> Result<Option<HmacAuth>, AuthError> {
        let Some(table) = self.peer_secrets.as_deref().filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };
        let secrets = StaticSecrets::parse(table)?;
        let config = AuthConfig {
            clock_skew: Duration::from_secs(self.clock_skew_secs),
            ..AuthConfig::default()
        };
        Ok(Some(HmacAuth::new(Arc::new(secrets), config)))
    }

    pub fn server_config(&self) -> Result<ServerConfig, AuthError> {
        Ok(ServerConfig {
            request_timeout: self.request_timeout(),
            auth: self.hmac_auth()?,
        })
    }
}
