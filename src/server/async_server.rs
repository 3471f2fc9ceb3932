use std::sync::Arc;
use std::time::Duration;

use anyhow::{ Context, Result };
use tokio::net::TcpListener;
use tokio::sync::Semaphore;

use super::connection::handle_connection;
use crate::config::ServerSettings;
use crate::plugins::CommandRegistry;
use crate::{ log_debug, log_error, log_info, log_warn };

/// Bind the chat gateway and serve until the task is cancelled
pub async fn run_async_server(settings: &ServerSettings, registry: Arc<CommandRegistry>) -> Result<()> {
    let addr = settings.listen_addr();
    let listener = TcpListener::bind(&addr).await.context(format!("Failed to bind to {}", addr))?;

    serve(listener, settings.max_connections, Duration::from_secs(settings.timeout), registry).await
}

/// Accept chat clients on an already bound listener
pub async fn serve(
    listener: TcpListener,
    max_connections: usize,
    idle_timeout: Duration,
    registry: Arc<CommandRegistry>
) -> Result<()> {
    let slots = Arc::new(Semaphore::new(max_connections.max(1)));

    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                log_error!("Failed to accept connection: {}", e);
                continue;
            }
        };

        let Ok(permit) = slots.clone().try_acquire_owned() else {
            log_warn!("Connection limit reached, rejecting {}", addr);
            drop(stream);
            continue;
        };

        log_info!("Accepted connection from {}", addr);
        let registry = registry.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, addr, idle_timeout, registry).await {
                log_error!("Connection handling error for {}: {}", addr, e);
            }
            log_debug!("Connection from {} closed", addr);
            drop(permit);
        });
    }
}
