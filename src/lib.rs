pub mod assistant;
pub mod cli;
pub mod config;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;
pub mod session;

use assistant::AssistantGateway;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let llm_config = args.llm_config();

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("HTTP API Port: {:?}", args.http_port);
    info!("Model: {}", llm_config.model);
    info!("Base URL: {}", llm_config.base_url.as_deref().unwrap_or("client default"));
    info!("API Key Present: {}", llm_config.credential().is_some());
    info!("Request Timeout: {}s", args.request_timeout_secs);
    info!("Max Connections/s: {}", args.max_connections_per_second);
    info!("-------------------------");

    let gateway = Arc::new(
        AssistantGateway::from_config(&llm_config).map_err(|e|
            format!("Failed to build assistant gateway: {}", e)
        )?
    );

    let server = Server::new(
        args.server_addr.clone(),
        gateway,
        args.http_port,
        args.max_connections_per_second,
    );
    server.run().await?;

    Ok(())
}
