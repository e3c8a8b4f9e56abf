use faircher_mcp::{
    build_app,
    config::{Config, Transport},
    domain::registry::ToolRegistry,
    logging, stdio, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let registry = ToolRegistry::builtin()?;
    info!(tools = ?registry, "tool registry ready");
    let state = AppState::new(registry, config.apps_challenge_token.clone());

    match config.transport {
        Transport::Http => {
            let bind_socket = config.bind_socket()?;
            let app = build_app(state);
            let listener = tokio::net::TcpListener::bind(bind_socket).await?;

            info!(
                bind_addr = %config.bind_addr,
                port = config.port,
                "server starting"
            );

            axum::serve(listener, app.into_make_service()).await?;
        }
        Transport::Stdio => stdio::run_stdio(state).await?,
    }

    Ok(())
}
