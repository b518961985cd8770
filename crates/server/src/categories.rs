//! Categories API endpoints.

use api_types::category::CategoryView;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState, transactions::map_category};

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .list_categories()
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(categories))
}
