//! Coordinator server

use crate::common::{CoordinatorConfig, Result};
use crate::coordinator::admission::AdmissionQueue;
use crate::coordinator::http::{create_router, CoordState};
use crate::coordinator::router::Router;
use crate::coordinator::transport::HttpTransport;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub struct Coordinator {
    config: CoordinatorConfig,
}

impl Coordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    pub async fn serve(self) -> Result<()> {
        tracing::info!("Starting coordinator");
        tracing::info!("  HTTP API: {}", self.config.bind_addr);
        for (i, dc) in self.config.data_centers.iter().enumerate() {
            tracing::info!("  Data center {}: {}", i + 1, dc);
        }

        let transport = Arc::new(HttpTransport::new());
        let router = Arc::new(Router::new(transport, self.config.data_centers.clone()));
        let admission = Arc::new(AdmissionQueue::new());

        let http_state = CoordState {
            admission,
            router,
        };
        let http_router = create_router(http_state).layer(TraceLayer::new_for_http());

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("✓ Coordinator ready (mode: replication)");

        axum::serve(listener, http_router).await?;
        Ok(())
    }
}
