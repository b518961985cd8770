use crate::{
    EngineError, LedgerStore, Money, NewTransaction, ResultEngine, Transaction, TransactionKind,
};

use super::{Engine, ensure_non_negative, normalize_required_name};

/// Input of [`Engine::create_transaction`].
///
/// `kind` stays raw text: rejecting unknown types is part of the operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTransactionCmd {
    pub title: String,
    pub value: Money,
    pub kind: String,
    pub category: String,
}

impl<S: LedgerStore> Engine<S> {
    /// Validates and persists a single transaction.
    ///
    /// Steps run in this order, and any failure stops before the next one:
    /// 1. type, title and value validation
    /// 2. balance check (outcomes only; `value` must not exceed the net total)
    /// 3. category find-or-create
    /// 4. transaction insert
    ///
    /// A rejected transaction therefore never leaves a new category behind.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<Transaction> {
        let kind = TransactionKind::try_from(cmd.kind.as_str())?;
        let title = normalize_required_name(&cmd.title, "transaction")?;
        let category_title = normalize_required_name(&cmd.category, "category")?;
        ensure_non_negative(cmd.value)?;

        let balance = self.balance().await?;
        if kind == TransactionKind::Outcome && cmd.value > balance.total {
            return Err(EngineError::InsufficientBalance(format!(
                "outcome of {} exceeds balance of {}",
                cmd.value, balance.total
            )));
        }

        let category = self.resolve_category(&category_title).await?;
        let tx = self
            .store
            .create_transaction(NewTransaction::new(title, kind, cmd.value, category)?)
            .await?;

        tracing::info!(id = %tx.id, kind = %tx.kind, value = %tx.value, "transaction created");
        Ok(tx)
    }

    pub async fn list_transactions(&self) -> ResultEngine<Vec<Transaction>> {
        self.store.list_transactions().await
    }
}
