use clap::Parser;
use tokio::net::TcpListener;
use todo_server::{dispatcher_from_config, init_logging, Config, ServerError};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = Config::parse();
    init_logging(&config.log_filter, config.log_format)?;

    let dispatcher = dispatcher_from_config(&config)?;
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        storage = ?config.storage,
        database_path = %config.database_path.display(),
        "listening"
    );

    todo_server::run(listener, dispatcher).await?;
    tracing::info!("server stopped");
    Ok(())
}
