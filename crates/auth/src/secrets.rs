use std::collections::HashMap;

use crate::error::AuthError;

/// Lookup from calling agent id to its shared secret.
///
/// Any `Fn(&str) -> Option<Vec<u8>>` works, so callers can plug in whatever
/// credential store they have.
pub trait SecretProvider: Send + Sync {
    fn secret_for(&self, agent_id: &str) -> Option<Vec<u8>>;
}

impl<F> SecretProvider for F
where
    F: Fn(&str) -> Option<Vec<u8>> + Send + Sync,
{
    fn secret_for(&self, agent_id: &str) -> Option<Vec<u8>> {
        self(agent_id)
    }
}

/// Fixed table of peer secrets, usually loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticSecrets {
    secrets: HashMap<String, Vec<u8>>,
}

impl StaticSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, agent_id: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        self.secrets.insert(agent_id.into(), secret.into());
        self
    }

    /// Parse `agent-a=secret1,agent-b=secret2`. Whitespace around entries is ignored.
    pub fn parse(table: &str) -> Result<Self, AuthError> {
        let mut secrets = HashMap::new();
        for entry in table.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Some((id, secret)) = entry.split_once('=') else {
                return Err(AuthError::InvalidSecretEntry(entry.to_string()));
            };
            let (id, secret) = (id.trim(), secret.trim());
            if id.is_empty() || secret.is_empty() {
                return Err(AuthError::InvalidSecretEntry(entry.to_string()));
            }
            secrets.insert(id.to_string(), secret.as_bytes().to_vec());
        }
        Ok(Self { secrets })
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl SecretProvider for StaticSecrets {
    fn secret_for(&self, agent_id: &str) -> Option<Vec<u8>> {
        self.secrets.get(agent_id).cloned()
    }
}
