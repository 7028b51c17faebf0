//! Self-describing discovery document served at `/.well-known/agent.json`.

/// Version of the A2A contract implemented by this workspace.
pub const CONTRACT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AgentMeta {
    pub agent_id: String,
    pub name: String,
    /// Implementation version.
    pub version: String,
    pub contract_version: String,
    pub capabilities: Vec<AgentCapability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthSpec>,
}

impl AgentMeta {
    pub fn new(
        agent_id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
            version: version.into(),
            contract_version: CONTRACT_VERSION.to_string(),
            capabilities: Vec::new(),
            auth: None,
        }
    }

    #[must_use]
    pub fn with_capability(
        mut self,
        task_type: impl Into<String>,
        input_schema: impl Into<String>,
        output_schema: impl Into<String>,
    ) -> Self {
        self.capabilities.push(AgentCapability {
            task_type: task_type.into(),
            input_schema: input_schema.into(),
            output_schema: output_schema.into(),
        });
        self
    }

    #[must_use]
    pub fn with_auth(mut self, auth: AuthSpec) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn supports(&self, task_type: &str) -> bool {
        self.capabilities.iter().any(|c| c.task_type == task_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AgentCapability {
    pub task_type: String,
    /// Schema name or URL describing the expected input.
    pub input_schema: String,
    pub output_schema: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AuthScheme {
    #[serde(rename = "HMAC")]
    Hmac,
    #[serde(rename = "mTLS")]
    MTls,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthSpec {
    pub required: bool,
    pub scheme: AuthScheme,
}

impl AuthSpec {
    pub fn hmac(required: bool) -> Self {
        Self {
            required,
            scheme: AuthScheme::Hmac,
        }
    }
}
