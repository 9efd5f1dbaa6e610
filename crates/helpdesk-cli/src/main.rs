use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use helpdesk_flow::dispatch::DEFAULT_TRIAGE_CHANNEL;
use helpdesk_flow::{Workflow, WorkflowConfig};
use helpdesk_slack::{DEFAULT_API_BASE, SignatureVerifier, SlackClient};
use helpdesk_store::MemoryStore;
use tracing_subscriber::EnvFilter;

mod display;
mod server;

#[derive(Parser)]
#[command(name = "helpdesk", version, about = "Helpdesk request workflow for Slack")]
struct Cli {
    /// Bot token used for Web API calls
    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    bot_token: String,

    /// Signing secret used to verify inbound requests
    #[arg(long, env = "SLACK_SIGNING_SECRET", hide_env_values = true)]
    signing_secret: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    bind: std::net::IpAddr,

    /// Channel new requests are announced in
    #[arg(long, env = "HELPDESK_TRIAGE_CHANNEL", default_value = DEFAULT_TRIAGE_CHANNEL)]
    triage_channel: String,

    /// Web API base URL
    #[arg(long, env = "SLACK_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    tracing::info!("helpdesk v{}", env!("CARGO_PKG_VERSION"));

    let platform = Arc::new(SlackClient::new(cli.api_base, cli.bot_token));
    let store = Arc::new(MemoryStore::new());
    let config = WorkflowConfig {
        triage_channel: cli.triage_channel,
        ..WorkflowConfig::default()
    };
    let state = server::AppState {
        workflow: Arc::new(Workflow::new(platform, store, config)),
        verifier: SignatureVerifier::new(cli.signing_secret),
    };

    let addr = SocketAddr::new(cli.bind, cli.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, server::router(state)).await?;
    Ok(())
}
