use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::gateway::{InitStatus, ModelGateway};

/// Shared, read-only context handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<ModelGateway>,
    pub init_status: Arc<InitStatus>,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub async fn new(config: Config, shutdown: CancellationToken) -> anyhow::Result<Self> {
        let gateway = ModelGateway::initialize(&config).await?;
        Ok(Self::with_gateway(config, gateway, shutdown))
    }

    pub fn with_gateway(config: Config, gateway: ModelGateway, shutdown: CancellationToken) -> Self {
        let init_status = gateway.status();
        Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
            init_status: Arc::new(init_status),
            shutdown,
        }
    }
}
