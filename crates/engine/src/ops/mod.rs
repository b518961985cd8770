use sea_orm::DatabaseConnection;

use crate::{EngineError, LedgerStore, Money, ResultEngine, SeaOrmStore};

mod balance;
mod categories;
mod import;
mod transactions;

pub use transactions::CreateTransactionCmd;

/// Entry point for every ledger operation.
///
/// The engine owns no state besides its store; it is safe to share behind an
/// `Arc` and call concurrently. No coordination happens between concurrent
/// calls: two outcomes racing on the same balance can both pass the check, and
/// two first references to the same category title can both create it.
#[derive(Debug)]
pub struct Engine<S = SeaOrmStore> {
    store: S,
}

impl<S: LedgerStore> Engine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} title must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn ensure_non_negative(value: Money) -> ResultEngine<()> {
    if value.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "value must be >= 0, got {value}"
        )));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine::new(SeaOrmStore::new(self.database)))
    }
}
