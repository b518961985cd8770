use axum::{
    Router,
    routing::{get, post},
};

use std::{path::PathBuf, sync::Arc};

use crate::{categories, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Directory `POST /transactions/import` resolves file names against.
    pub upload_dir: PathBuf,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/transactions/import", post(transactions::import))
        .route("/categories", get(categories::list))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    upload_dir: PathBuf,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);
    tracing::info!("Importing uploads from {}", upload_dir.display());

    let state = ServerState {
        engine: Arc::new(engine),
        upload_dir,
    };

    axum::serve(listener, router(state)).await
}
