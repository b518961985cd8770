//! Transactions API endpoints

use std::path::Path;

use api_types::{
    balance::BalanceView,
    category::CategoryView,
    transaction::{
        TransactionImport, TransactionKind as ApiKind, TransactionListResponse, TransactionNew,
        TransactionView,
    },
};
use axum::{Json, extract::State, http::StatusCode};
use engine::Money;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Outcome => ApiKind::Outcome,
    }
}

pub(crate) fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        title: category.title,
        created_at: category.created_at,
    }
}

fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        title: tx.title,
        kind: map_kind(tx.kind),
        value: tx.value.as_f64(),
        category: map_category(tx.category),
        created_at: tx.created_at,
    }
}

fn map_balance(balance: engine::Balance) -> BalanceView {
    BalanceView {
        income: balance.income.as_f64(),
        outcome: balance.outcome.as_f64(),
        total: balance.total.as_f64(),
    }
}

/// JSON numbers go through their shortest decimal form so `3.5` stays `3.5`.
fn parse_value(value: f64) -> Result<Money, ServerError> {
    if !value.is_finite() {
        return Err(ServerError::Generic("value must be a finite number".to_string()));
    }
    Ok(value.to_string().parse::<Money>()?)
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let transactions = state
        .engine
        .list_transactions()
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();
    let balance = state.engine.balance().await?;

    Ok(Json(TransactionListResponse {
        transactions,
        balance: map_balance(balance),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .create_transaction(engine::CreateTransactionCmd {
            title: payload.title,
            value: parse_value(payload.value)?,
            kind: payload.kind,
            category: payload.category,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn import(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionImport>,
) -> Result<(StatusCode, Json<Vec<TransactionView>>), ServerError> {
    let name = Path::new(&payload.file_name);
    if name.file_name() != Some(name.as_os_str()) {
        return Err(ServerError::Generic(
            "file_name must be a bare file name".to_string(),
        ));
    }

    let created = state
        .engine
        .import_transactions(state.upload_dir.join(name))
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok((StatusCode::CREATED, Json(created)))
}
