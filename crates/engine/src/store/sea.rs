use async_trait::async_trait;
use sea_orm::{QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*};

use crate::{
    Balance, Category, EngineError, Money, NewTransaction, ResultEngine, Transaction,
    TransactionKind, categories, transactions,
};

use super::LedgerStore;

/// Bound-parameter ceiling of a single SQLite statement.
const MAX_BIND_PARAMS: usize = 32_766;
const CATEGORY_COLUMNS: usize = 3;
const TRANSACTION_COLUMNS: usize = 6;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

/// [`LedgerStore`] backed by a SeaORM connection.
#[derive(Clone, Debug)]
pub struct SeaOrmStore {
    database: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl LedgerStore for SeaOrmStore {
    async fn transaction_totals(&self) -> ResultEngine<Balance> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_string(
            backend,
            "SELECT kind, COALESCE(SUM(value_minor), 0) AS total \
             FROM transactions \
             GROUP BY kind",
        );

        let mut income = Money::ZERO;
        let mut outcome = Money::ZERO;
        for row in self.database.query_all(stmt).await? {
            let kind: String = row.try_get("", "kind")?;
            let total: i64 = row.try_get("", "total")?;
            match TransactionKind::try_from(kind.as_str())? {
                TransactionKind::Income => income += Money::new(total),
                TransactionKind::Outcome => outcome += Money::new(total),
            }
        }

        Ok(Balance::new(income, outcome))
    }

    async fn find_category_by_title(&self, title: &str) -> ResultEngine<Option<Category>> {
        let model = categories::Entity::find()
            .filter(categories::Column::Title.eq(title))
            .one(&self.database)
            .await?;
        Ok(model.map(Category::from))
    }

    async fn find_categories_by_titles(&self, titles: &[String]) -> ResultEngine<Vec<Category>> {
        let mut found = Vec::new();
        for chunk in titles.chunks(MAX_BIND_PARAMS) {
            let models = categories::Entity::find()
                .filter(categories::Column::Title.is_in(chunk.iter().cloned()))
                .all(&self.database)
                .await?;
            found.extend(models.into_iter().map(Category::from));
        }
        Ok(found)
    }

    async fn create_category(&self, title: &str) -> ResultEngine<Category> {
        let category = Category::new(title.to_string());
        categories::Entity::insert(categories::ActiveModel::from(&category))
            .exec_without_returning(&self.database)
            .await?;
        Ok(category)
    }

    async fn create_categories(&self, titles: &[String]) -> ResultEngine<Vec<Category>> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }
        let created: Vec<Category> = titles
            .iter()
            .map(|title| Category::new(title.clone()))
            .collect();
        with_tx!(self, |db_tx| {
            for chunk in created.chunks(MAX_BIND_PARAMS / CATEGORY_COLUMNS) {
                categories::Entity::insert_many(chunk.iter().map(categories::ActiveModel::from))
                    .exec_without_returning(&db_tx)
                    .await?;
            }
            Ok(created)
        })
    }

    async fn create_transaction(&self, new: NewTransaction) -> ResultEngine<Transaction> {
        let tx = new.into_transaction();
        transactions::Entity::insert(transactions::ActiveModel::from(&tx))
            .exec_without_returning(&self.database)
            .await?;
        Ok(tx)
    }

    async fn create_transactions(
        &self,
        new: Vec<NewTransaction>,
    ) -> ResultEngine<Vec<Transaction>> {
        if new.is_empty() {
            return Ok(Vec::new());
        }
        let created: Vec<Transaction> = new
            .into_iter()
            .map(NewTransaction::into_transaction)
            .collect();
        with_tx!(self, |db_tx| {
            for chunk in created.chunks(MAX_BIND_PARAMS / TRANSACTION_COLUMNS) {
                transactions::Entity::insert_many(
                    chunk.iter().map(transactions::ActiveModel::from),
                )
                .exec_without_returning(&db_tx)
                .await?;
            }
            Ok(created)
        })
    }

    async fn list_transactions(&self) -> ResultEngine<Vec<Transaction>> {
        let rows: Vec<(transactions::Model, Option<categories::Model>)> =
            transactions::Entity::find()
                .find_also_related(categories::Entity)
                .order_by_asc(transactions::Column::CreatedAt)
                .all(&self.database)
                .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (tx_model, category_model) in rows {
            let category = category_model.ok_or_else(|| {
                EngineError::KeyNotFound(format!("category {}", tx_model.category_id))
            })?;
            out.push(Transaction::try_from((tx_model, Category::from(category)))?);
        }
        Ok(out)
    }

    async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::CreatedAt)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }
}
