use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use a2a_agent::{AgentArgs, AgentClient, AgentState, ClientConfig, logging, router, serve, shutdown_on_ctrl_c};
use a2a_concierge::{ConciergeConfig, ConciergeService, discover_agents};
use a2a_task_store_memory::MemoryTaskStore;
use clap::Parser;
use tokio_util::sync::CancellationToken;

const DEFAULT_BIND: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), 8080);

#[derive(Debug, Parser)]
#[command(name = "a2a-concierge", version, about = "Fans QUOTE and SHIP tasks out to A2A agents")]
struct Args {
    #[command(flatten)]
    agent: AgentArgs,

    /// Comma-separated base URLs of the pricing agents.
    #[arg(
        long,
        env = "PRICING_AGENT_URLS",
        value_delimiter = ',',
        default_value = "http://localhost:8081,http://localhost:8082"
    )]
    pricing_agent_urls: Vec<String>,

    #[arg(long, env = "SHIP_AGENT_URL", default_value = "http://localhost:8081")]
    ship_agent_url: String,

    #[arg(long, env = "INTERPRETER_URL", default_value = "http://localhost:8083")]
    interpreter_url: String,

    #[arg(long, env = "AGGREGATION_TIMEOUT_MS", default_value_t = 1800)]
    aggregation_timeout_ms: u64,
}

impl Args {
    fn concierge_config(&self) -> ConciergeConfig {
        ConciergeConfig {
            pricing_agents: self
                .pricing_agent_urls
                .iter()
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .collect(),
            ship_agent: self.ship_agent_url.clone(),
            interpreter: self.interpreter_url.clone(),
            aggregation_timeout: Duration::from_millis(self.aggregation_timeout_ms),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("info");
    let args = Args::parse();

    let agent_id = args.agent.agent_id_or("agent.concierge");
    let config = args.concierge_config();
    anyhow::ensure!(!config.pricing_agents.is_empty(), "no pricing agents configured");

    let client = AgentClient::new(
        ClientConfig {
            request_timeout: args.agent.request_timeout(),
            ..ClientConfig::default()
        },
        args.agent.signer(&agent_id),
    )?;

    let discovery_client = client.clone();
    let urls: Vec<String> = config.agent_urls().into_iter().map(str::to_string).collect();
    tokio::spawn(async move {
        let urls: Vec<&str> = urls.iter().map(String::as_str).collect();
        discover_agents(&discovery_client, &urls).await;
    });

    tracing::info!(
        agent_id = %agent_id,
        pricing_agents = ?config.pricing_agents,
        ship_agent = %config.ship_agent,
        interpreter = %config.interpreter,
        "starting concierge"
    );

    let shutdown = CancellationToken::new();
    let state = AgentState::new(
        Arc::new(ConciergeService::new(agent_id, config, client.clone())),
        Arc::new(MemoryTaskStore::new()),
        client,
        args.agent.server_config()?,
    )
    .with_shutdown(shutdown.clone());

    tokio::spawn(shutdown_on_ctrl_c(shutdown.clone()));
    serve(args.agent.bind_or(DEFAULT_BIND), router(state), shutdown).await?;
    Ok(())
}
