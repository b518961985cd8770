use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod category {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub title: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;
    use crate::category::CategoryView;

    /// Body of `POST /transactions`.
    ///
    /// `type` is kept as free text so the server can report unknown values
    /// as a validation error instead of a decoding one.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub title: String,
        pub value: f64,
        #[serde(rename = "type")]
        pub kind: String,
        pub category: String,
    }

    /// Body of `POST /transactions/import`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TransactionImport {
        /// Bare file name inside the configured upload directory.
        pub file_name: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Outcome,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub title: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub value: f64,
        pub category: CategoryView,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        pub balance: crate::balance::BalanceView,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct BalanceView {
        pub income: f64,
        pub outcome: f64,
        pub total: f64,
    }
}
