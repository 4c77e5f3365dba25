mod routes;
pub mod state;

pub use routes::make_router;
pub use state::ServerState;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

pub async fn run_server(state: ServerState, port: u16) -> Result<()> {
    let app = make_router(state);
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "ridemix server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
