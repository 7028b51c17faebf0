use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use a2a_agent::{AgentArgs, AgentClient, AgentState, ClientConfig, logging, router, serve, shutdown_on_ctrl_c};
use a2a_carrier::{CarrierConfig, CarrierService};
use a2a_task_store_memory::MemoryTaskStore;
use clap::Parser;
use tokio_util::sync::CancellationToken;

const DEFAULT_BIND: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), 8081);

#[derive(Debug, Parser)]
#[command(name = "a2a-carrier", version, about = "Reference carrier agent for QUOTE and SHIP")]
struct Args {
    #[command(flatten)]
    agent: AgentArgs,

    #[arg(long, env = "CARRIER_NAME", default_value = "AgentA")]
    name: String,

    #[arg(long, env = "CARRIER_SERVICE", default_value = "EXPRESS")]
    service: String,

    #[arg(long, env = "CARRIER_BASE_PRICE", default_value_t = 7000)]
    base_price: u64,

    #[arg(long, env = "CARRIER_PER_KG", default_value_t = 1500)]
    per_kg: u64,

    #[arg(long, env = "CARRIER_PRIORITY_SURCHARGE", default_value_t = 3000)]
    priority_surcharge: u64,

    #[arg(long, env = "CARRIER_CURRENCY", default_value = "KRW")]
    currency: String,

    #[arg(long, env = "CARRIER_ETA_DAYS", default_value_t = 2)]
    eta_days: u32,

    /// Delay every answer, to demo deadline handling.
    #[arg(long, env = "CARRIER_LATENCY_MS", default_value_t = 0)]
    latency_ms: u64,

    #[arg(long, env = "CARRIER_TRACKING_PREFIX", default_value = "A")]
    tracking_prefix: String,
}

impl Args {
    fn carrier_config(&self) -> CarrierConfig {
        CarrierConfig {
            name: self.name.clone(),
            service: self.service.clone(),
            base_price: self.base_price,
            per_kg: self.per_kg,
            priority_surcharge: self.priority_surcharge,
            currency: self.currency.clone(),
            eta_days: self.eta_days,
            latency: Duration::from_millis(self.latency_ms),
            tracking_prefix: self.tracking_prefix.clone(),
            ..CarrierConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("info");
    let args = Args::parse();

    let agent_id = args.agent.agent_id_or("carrier.agent-a");
    let config = args.carrier_config();
    tracing::info!(
        agent_id = %agent_id,
        carrier = %config.name,
        latency_ms = args.latency_ms,
        "starting carrier"
    );

    let client = AgentClient::new(ClientConfig::default(), args.agent.signer(&agent_id))?;
    let shutdown = CancellationToken::new();
    let state = AgentState::new(
        Arc::new(CarrierService::new(agent_id, config)),
        Arc::new(MemoryTaskStore::new()),
        client,
        args.agent.server_config()?,
    )
    .with_shutdown(shutdown.clone());

    tokio::spawn(shutdown_on_ctrl_c(shutdown.clone()));
    serve(args.agent.bind_or(DEFAULT_BIND), router(state), shutdown).await?;
    Ok(())
}
