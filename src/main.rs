use todo_portal::{Config, TodoClient, web};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let client = TodoClient::from_config(&config)?;
    let app = web::router(web::AppState::new(client), config.session_ttl());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(
        addr = config.bind_addr(),
        api_base = %config.api_base,
        "todo-portal listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
