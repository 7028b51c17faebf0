use a2a_agent::{AgentClient, ClientError};
use a2a_contract::AgentMeta;
use tokio::task::JoinSet;

/// Fetch every agent's discovery document and log what it offers.
///
/// Diagnostic only: routing stays as configured whatever this returns.
pub async fn discover_agents(
    client: &AgentClient,
    urls: &[&str],
) -> Vec<(String, Result<AgentMeta, ClientError>)> {
    let mut lookups = JoinSet::new();
    for url in urls {
        let client = client.clone();
        let url = url.to_string();
        lookups.spawn(async move {
            let meta = client.discover(&url).await;
            (url, meta)
        });
    }

    let mut found = Vec::with_capacity(urls.len());
    while let Some(joined) = lookups.join_next().await {
        let Ok((url, meta)) = joined else {
            continue;
        };
        match &meta {
            Ok(meta) => {
                let capabilities: Vec<&str> =
                    meta.capabilities.iter().map(|c| c.task_type.as_str()).collect();
                tracing::info!(
                    url = %url,
                    agent_id = %meta.agent_id,
                    contract_version = %meta.contract_version,
                    capabilities = ?capabilities,
                    "discovered agent"
                );
            }
            Err(e) => tracing::warn!(url = %url, error = %e, "discovery failed"),
        }
        found.push((url, meta));
    }
    found
}
