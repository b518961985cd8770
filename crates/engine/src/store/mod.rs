//! Persistence port consumed by the engine.
//!
//! The engine never reaches for a global connection: it is handed a
//! [`LedgerStore`] at construction. [`SeaOrmStore`] is the production adapter,
//! [`MemoryStore`] an in-process fake.
//!
//! Each batch method is one logical write: it either persists every item or
//! none. An adapter may split it into several statements to stay under
//! backend limits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{Balance, Category, NewTransaction, ResultEngine, Transaction};

pub use memory::MemoryStore;
pub use sea::SeaOrmStore;

mod memory;
mod sea;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Sums persisted transaction values per kind.
    async fn transaction_totals(&self) -> ResultEngine<Balance>;

    /// Exact-match lookup by title.
    async fn find_category_by_title(&self, title: &str) -> ResultEngine<Option<Category>>;

    async fn find_categories_by_titles(&self, titles: &[String]) -> ResultEngine<Vec<Category>>;

    async fn create_category(&self, title: &str) -> ResultEngine<Category>;

    /// Creates one category per title, in the given order, as one write.
    async fn create_categories(&self, titles: &[String]) -> ResultEngine<Vec<Category>>;

    async fn create_transaction(&self, new: NewTransaction) -> ResultEngine<Transaction>;

    /// Persists every transaction as one write, preserving input order.
    async fn create_transactions(
        &self,
        new: Vec<NewTransaction>,
    ) -> ResultEngine<Vec<Transaction>>;

    /// All transactions with their category, oldest first.
    async fn list_transactions(&self) -> ResultEngine<Vec<Transaction>>;

    /// All categories, oldest first.
    async fn list_categories(&self) -> ResultEngine<Vec<Category>>;
}

#[async_trait]
impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    async fn transaction_totals(&self) -> ResultEngine<Balance> {
        (**self).transaction_totals().await
    }

    async fn find_category_by_title(&self, title: &str) -> ResultEngine<Option<Category>> {
        (**self).find_category_by_title(title).await
    }

    async fn find_categories_by_titles(&self, titles: &[String]) -> ResultEngine<Vec<Category>> {
        (**self).find_categories_by_titles(titles).await
    }

    async fn create_category(&self, title: &str) -> ResultEngine<Category> {
        (**self).create_category(title).await
    }

    async fn create_categories(&self, titles: &[String]) -> ResultEngine<Vec<Category>> {
        (**self).create_categories(titles).await
    }

    async fn create_transaction(&self, new: NewTransaction) -> ResultEngine<Transaction> {
        (**self).create_transaction(new).await
    }

    async fn create_transactions(
        &self,
        new: Vec<NewTransaction>,
    ) -> ResultEngine<Vec<Transaction>> {
        (**self).create_transactions(new).await
    }

    async fn list_transactions(&self) -> ResultEngine<Vec<Transaction>> {
        (**self).list_transactions().await
    }

    async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        (**self).list_categories().await
    }
}
