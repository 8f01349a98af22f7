use stock_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment and logging
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(None, config.log_dir.as_deref());

    print_banner();
    tracing::info!(environment = %config.environment, "stock server starting");

    // 2. Wire services against the configured backend
    let state = ServerState::initialize(&config).await;

    // 3. Serve until shutdown
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
