use std::net::SocketAddr;
use std::sync::Arc;

use a2a_agent::{AgentArgs, AgentClient, AgentState, ClientConfig, logging, router, serve, shutdown_on_ctrl_c};
use a2a_interpreter::{FallbackInterpreter, InterpretService, Interpreter, LlmConfig, LlmInterpreter, RuleInterpreter};
use a2a_task_store_memory::MemoryTaskStore;
use clap::Parser;
use tokio_util::sync::CancellationToken;

const DEFAULT_BIND: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), 8083);

#[derive(Debug, Parser)]
#[command(name = "a2a-interpreter", version, about = "INTERPRET agent: free text to quote input")]
struct Args {
    #[command(flatten)]
    agent: AgentArgs,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// OpenAI-compatible endpoint, e.g. a local model server.
    #[arg(long, env = "OPENAI_BASE_URL")]
    openai_base_url: Option<String>,

    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    openai_model: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("info");
    let args = Args::parse();

    let agent_id = args.agent.agent_id_or("agent.interpreter");
    let rules: Arc<dyn Interpreter> = Arc::new(RuleInterpreter::new());
    let interpreter: Arc<dyn Interpreter> =
        if args.openai_api_key.is_some() || args.openai_base_url.is_some() {
            let mut config = LlmConfig {
                api_key: args.openai_api_key.clone(),
                model: args.openai_model.clone(),
                ..LlmConfig::default()
            };
            if let Some(base_url) = &args.openai_base_url {
                config.base_url = base_url.clone();
            }
            tracing::info!(model = %config.model, base_url = %config.base_url, "llm interpretation enabled");
            Arc::new(FallbackInterpreter::new(Arc::new(LlmInterpreter::new(config)?), rules))
        } else {
            tracing::info!("no llm configured, using rule interpretation");
            rules
        };

    let client = AgentClient::new(ClientConfig::default(), args.agent.signer(&agent_id))?;
    let shutdown = CancellationToken::new();
    let state = AgentState::new(
        Arc::new(InterpretService::new(agent_id, interpreter)),
        Arc::new(MemoryTaskStore::new()),
        client,
        args.agent.server_config()?,
    )
    .with_shutdown(shutdown.clone());

    tokio::spawn(shutdown_on_ctrl_c(shutdown.clone()));
    serve(args.agent.bind_or(DEFAULT_BIND), router(state), shutdown).await?;
    Ok(())
}
