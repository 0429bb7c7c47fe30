pub mod api;
pub mod websocket;

use crate::assistant::AssistantGateway;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    addr: String,
    gateway: Arc<AssistantGateway>,
    http_port: Option<u16>,
    max_connections_per_second: u32,
}

impl Server {
    pub fn new(
        addr: String,
        gateway: Arc<AssistantGateway>,
        http_port: Option<u16>,
        max_connections_per_second: u32
    ) -> Self {
        Self {
            addr,
            gateway,
            http_port,
            max_connections_per_second,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Some(http_port) = self.http_port {
            api::start_http_server(http_port, self.gateway.clone()).await?;
        }

        websocket::start_ws_server(
            &self.addr,
            self.gateway.clone(),
            self.max_connections_per_second,
        ).await
    }
}
