//! Transaction primitives.
//!
//! A `Transaction` is an immutable ledger record: once persisted it is never
//! edited or removed.

use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Outcome,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "outcome" => Ok(Self::Outcome),
            other => Err(EngineError::InvalidTransactionType(format!(
                "expected income or outcome, got {other:?}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub title: String,
    pub kind: TransactionKind,
    pub value: Money,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

/// A validated transaction that has not been written yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTransaction {
    pub title: String,
    pub kind: TransactionKind,
    pub value: Money,
    pub category: Category,
}

impl NewTransaction {
    pub fn new(
        title: String,
        kind: TransactionKind,
        value: Money,
        category: Category,
    ) -> ResultEngine<Self> {
        if title.trim().is_empty() {
            return Err(EngineError::InvalidName(
                "transaction title must not be empty".to_string(),
            ));
        }
        if value.is_negative() {
            return Err(EngineError::InvalidAmount(
                "value must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            title,
            kind,
            value,
            category,
        })
    }

    /// Assigns identity and timestamp, turning the draft into a ledger record.
    pub fn into_transaction(self) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            title: self.title,
            kind: self.kind,
            value: self.value,
            category: self.category,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub kind: String,
    pub value_minor: i64,
    pub category_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            title: ActiveValue::Set(tx.title.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            value_minor: ActiveValue::Set(tx.value.minor()),
            category_id: ActiveValue::Set(tx.category.id),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<(Model, Category)> for Transaction {
    type Error = EngineError;

    fn try_from((model, category): (Model, Category)) -> Result<Self, Self::Error> {
        if model.category_id != category.id {
            return Err(EngineError::KeyNotFound(format!(
                "category {} of transaction {}",
                model.category_id, model.id
            )));
        }
        Ok(Self {
            id: model.id,
            title: model.title,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            value: Money::new(model.value_minor),
            category,
            created_at: model.created_at,
        })
    }
}
