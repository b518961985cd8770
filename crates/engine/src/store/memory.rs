use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use sea_orm::DbErr;

use crate::{
    Balance, Category, EngineError, Money, NewTransaction, ResultEngine, Transaction,
    TransactionKind,
};

use super::LedgerStore;

/// In-process [`LedgerStore`], mainly for tests.
///
/// Like the SQL adapter it performs no uniqueness check on category titles.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> ResultEngine<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| EngineError::Database(DbErr::Custom("memory store poisoned".to_string())))
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn transaction_totals(&self) -> ResultEngine<Balance> {
        let state = self.state()?;
        let mut income = Money::ZERO;
        let mut outcome = Money::ZERO;
        for tx in &state.transactions {
            let sum = match tx.kind {
                TransactionKind::Income => &mut income,
                TransactionKind::Outcome => &mut outcome,
            };
            *sum = sum.checked_add(tx.value).ok_or_else(|| {
                EngineError::InvalidAmount(format!("{} total overflows", tx.kind))
            })?;
        }
        Ok(Balance::new(income, outcome))
    }

    async fn find_category_by_title(&self, title: &str) -> ResultEngine<Option<Category>> {
        let state = self.state()?;
        Ok(state.categories.iter().find(|c| c.title == title).cloned())
    }

    async fn find_categories_by_titles(&self, titles: &[String]) -> ResultEngine<Vec<Category>> {
        let state = self.state()?;
        Ok(state
            .categories
            .iter()
            .filter(|c| titles.contains(&c.title))
            .cloned()
            .collect())
    }

    async fn create_category(&self, title: &str) -> ResultEngine<Category> {
        let category = Category::new(title.to_string());
        self.state()?.categories.push(category.clone());
        Ok(category)
    }

    async fn create_categories(&self, titles: &[String]) -> ResultEngine<Vec<Category>> {
        let created: Vec<Category> = titles
            .iter()
            .map(|title| Category::new(title.clone()))
            .collect();
        self.state()?.categories.extend(created.iter().cloned());
        Ok(created)
    }

    async fn create_transaction(&self, new: NewTransaction) -> ResultEngine<Transaction> {
        let tx = new.into_transaction();
        self.state()?.transactions.push(tx.clone());
        Ok(tx)
    }

    async fn create_transactions(
        &self,
        new: Vec<NewTransaction>,
    ) -> ResultEngine<Vec<Transaction>> {
        let created: Vec<Transaction> = new
            .into_iter()
            .map(NewTransaction::into_transaction)
            .collect();
        self.state()?.transactions.extend(created.iter().cloned());
        Ok(created)
    }

    async fn list_transactions(&self) -> ResultEngine<Vec<Transaction>> {
        Ok(self.state()?.transactions.clone())
    }

    async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        Ok(self.state()?.categories.clone())
    }
}
