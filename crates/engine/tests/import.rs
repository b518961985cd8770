use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use sea_orm::{Database, DbErr};
use tempfile::TempDir;

use engine::{
    Balance, Category, CreateTransactionCmd, Engine, EngineError, LedgerStore, MemoryStore, Money,
    NewTransaction, ResultEngine, Transaction, TransactionKind,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn upload(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn import_creates_rows_and_categories_then_removes_file() {
    let engine = engine_with_db().await;
    let dir = tempfile::tempdir().unwrap();
    let path = upload(
        &dir,
        "import.csv",
        "title,type,value,category\nSalary,income,5000,Job\nBus,outcome,3.5,Transport\n",
    );

    let created = engine.import_transactions(&path).await.unwrap();

    assert_eq!(created.len(), 2);
    assert_eq!(created[0].title, "Salary");
    assert_eq!(created[0].kind, TransactionKind::Income);
    assert_eq!(created[0].value, Money::new(500_000));
    assert_eq!(created[0].category.title, "Job");
    assert_eq!(created[1].title, "Bus");
    assert_eq!(created[1].kind, TransactionKind::Outcome);
    assert_eq!(created[1].value, Money::new(350));
    assert_eq!(created[1].category.title, "Transport");

    let mut titles: Vec<String> = engine
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["Job".to_string(), "Transport".to_string()]);
    assert_eq!(engine.list_transactions().await.unwrap().len(), 2);
    assert!(!path.exists());
}

#[tokio::test]
async fn rows_sharing_a_title_share_one_category() {
    let engine = engine_with_db().await;
    let dir = tempfile::tempdir().unwrap();
    let path = upload(
        &dir,
        "import.csv",
        "title,type,value,category\nCoffee,outcome,2,Food\nSalary,income,100,Job\nSandwich,outcome,5,Food\n",
    );

    let created = engine.import_transactions(&path).await.unwrap();

    assert_eq!(created.len(), 3);
    assert_eq!(created[0].category.id, created[2].category.id);
    let food: Vec<Category> = engine
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .filter(|c| c.title == "Food")
        .collect();
    assert_eq!(food.len(), 1);
    assert_eq!(food[0].id, created[0].category.id);
}

#[tokio::test]
async fn existing_categories_are_reused() {
    let engine = engine_with_db().await;
    let job = engine.resolve_category("Job").await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = upload(
        &dir,
        "import.csv",
        "title,type,value,category\nSalary,income,100,Job\nGym,outcome,30,Health\n",
    );

    let created = engine.import_transactions(&path).await.unwrap();

    assert_eq!(created[0].category.id, job.id);
    assert_eq!(engine.list_categories().await.unwrap().len(), 2);
}

#[tokio::test]
async fn incomplete_rows_are_dropped_without_aborting() {
    let engine = engine_with_db().await;
    let dir = tempfile::tempdir().unwrap();
    let path = upload(
        &dir,
        "import.csv",
        "title,type,value,category\nGift,income,,Misc\nSalary,income,100,Job\n",
    );

    let created = engine.import_transactions(&path).await.unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].title, "Salary");
    let categories = engine.list_categories().await.unwrap();
    assert!(categories.iter().all(|c| c.title != "Misc"));
    assert!(!path.exists());
}

#[tokio::test]
async fn missing_file_fails_and_writes_nothing() {
    let engine = engine_with_db().await;
    let dir = tempfile::tempdir().unwrap();

    let err = engine
        .import_transactions(dir.path().join("missing.csv"))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::FileRead(_)));
    assert!(engine.list_categories().await.unwrap().is_empty());
    assert!(engine.list_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn import_skips_the_balance_check() {
    let engine = engine_with_db().await;
    let dir = tempfile::tempdir().unwrap();
    let path = upload(
        &dir,
        "import.csv",
        "title,type,value,category\nRent,outcome,900,Home\n",
    );

    engine.import_transactions(&path).await.unwrap();

    assert_eq!(engine.balance().await.unwrap().total, Money::new(-90_000));

    let err = engine
        .create_transaction(CreateTransactionCmd {
            title: "Coffee".to_string(),
            value: Money::new(1),
            kind: "outcome".to_string(),
            category: "Food".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientBalance(_)));
}

#[tokio::test]
async fn invalid_row_aborts_before_any_write_and_keeps_file() {
    let engine = engine_with_db().await;
    let dir = tempfile::tempdir().unwrap();
    let path = upload(
        &dir,
        "import.csv",
        "title,type,value,category\nSalary,income,100,Job\nRefund,refund,5,Shop\n",
    );

    let err = engine.import_transactions(&path).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransactionType(msg) if msg.contains("line 3")));

    let path_bad_value = upload(
        &dir,
        "value.csv",
        "title,type,value,category\nSalary,income,lots,Job\n",
    );
    let err = engine.import_transactions(&path_bad_value).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    assert!(engine.list_categories().await.unwrap().is_empty());
    assert!(engine.list_transactions().await.unwrap().is_empty());
    assert!(path.exists());
    assert!(path_bad_value.exists());
}

#[tokio::test]
async fn header_only_file_imports_nothing_and_is_removed() {
    let engine = Engine::new(MemoryStore::new());
    let dir = tempfile::tempdir().unwrap();
    let path = upload(&dir, "empty.csv", "title,type,value,category\n");

    let created = engine.import_transactions(&path).await.unwrap();

    assert!(created.is_empty());
    assert!(!path.exists());
}

/// What a batch transaction write does before (or instead of) reaching the store.
enum OnBatchWrite {
    Fail,
    RemoveSource(PathBuf),
}

/// Delegates to a [`MemoryStore`], intercepting batch transaction writes.
struct InterceptedStore {
    inner: Arc<MemoryStore>,
    on_batch: OnBatchWrite,
}

#[async_trait]
impl LedgerStore for InterceptedStore {
    async fn transaction_totals(&self) -> ResultEngine<Balance> {
        self.inner.transaction_totals().await
    }

    async fn find_category_by_title(&self, title: &str) -> ResultEngine<Option<Category>> {
        self.inner.find_category_by_title(title).await
    }

    async fn find_categories_by_titles(&self, titles: &[String]) -> ResultEngine<Vec<Category>> {
        self.inner.find_categories_by_titles(titles).await
    }

    async fn create_category(&self, title: &str) -> ResultEngine<Category> {
        self.inner.create_category(title).await
    }

    async fn create_categories(&self, titles: &[String]) -> ResultEngine<Vec<Category>> {
        self.inner.create_categories(titles).await
    }

    async fn create_transaction(&self, new: NewTransaction) -> ResultEngine<Transaction> {
        self.inner.create_transaction(new).await
    }

    async fn create_transactions(
        &self,
        new: Vec<NewTransaction>,
    ) -> ResultEngine<Vec<Transaction>> {
        match &self.on_batch {
            OnBatchWrite::Fail => Err(EngineError::Database(DbErr::Custom("disk full".to_string()))),
            OnBatchWrite::RemoveSource(path) => {
                std::fs::remove_file(path).unwrap();
                self.inner.create_transactions(new).await
            }
        }
    }

    async fn list_transactions(&self) -> ResultEngine<Vec<Transaction>> {
        self.inner.list_transactions().await
    }

    async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        self.inner.list_categories().await
    }
}

#[tokio::test]
async fn storage_failure_propagates_and_keeps_file() {
    let memory = Arc::new(MemoryStore::new());
    let engine = Engine::new(InterceptedStore {
        inner: memory.clone(),
        on_batch: OnBatchWrite::Fail,
    });
    let dir = tempfile::tempdir().unwrap();
    let path = upload(
        &dir,
        "import.csv",
        "title,type,value,category\nSalary,income,100,Job\n",
    );

    let err = engine.import_transactions(&path).await.unwrap_err();

    assert_eq!(
        err,
        EngineError::Database(DbErr::Custom("disk full".to_string()))
    );
    assert!(path.exists());
    assert!(memory.list_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn memory_store_behaves_like_the_database() {
    let memory = Arc::new(MemoryStore::new());
    let engine = Engine::new(memory.clone());
    let dir = tempfile::tempdir().unwrap();
    let path = upload(
        &dir,
        "import.csv",
        "title,type,value,category\nSalary,income,10,Job\nTaxi,outcome,12.5,Transport\nBus,outcome,2,Transport\n",
    );

    engine.import_transactions(&path).await.unwrap();

    assert_eq!(memory.list_categories().await.unwrap().len(), 2);
    assert_eq!(
        engine.balance().await.unwrap(),
        Balance::new(Money::new(1000), Money::new(1450))
    );
}

#[tokio::test]
async fn removal_failure_after_commit_still_succeeds() {
    let memory = Arc::new(MemoryStore::new());
    let dir = tempfile::tempdir().unwrap();
    let path = upload(
        &dir,
        "import.csv",
        "title,type,value,category\nSalary,income,100,Job\n",
    );
    let engine = Engine::new(InterceptedStore {
        inner: memory.clone(),
        on_batch: OnBatchWrite::RemoveSource(path.clone()),
    });

    let created = engine.import_transactions(&path).await.unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(memory.list_transactions().await.unwrap().len(), 1);
    assert!(!path.exists());
}

#[tokio::test]
async fn large_import_is_written_in_chunks() {
    let engine = engine_with_db().await;
    let dir = tempfile::tempdir().unwrap();
    let rows = 12_000;
    let mut contents = String::from("title,type,value,category\n");
    for i in 0..rows {
        contents.push_str(&format!("Row{i},income,1,Cat{i}\n"));
    }
    let path = upload(&dir, "large.csv", &contents);

    let created = engine.import_transactions(&path).await.unwrap();

    assert_eq!(created.len(), rows);
    assert_eq!(engine.list_categories().await.unwrap().len(), rows);
    assert_eq!(engine.list_transactions().await.unwrap().len(), rows);
    assert_eq!(
        engine.balance().await.unwrap(),
        Balance::new(Money::new(100 * rows as i64), Money::ZERO)
    );
    assert!(!path.exists());

    // Every category now exists, so the second pass only looks them up.
    let again = upload(&dir, "again.csv", &contents);
    engine.import_transactions(&again).await.unwrap();
    assert_eq!(engine.list_categories().await.unwrap().len(), rows);
    assert_eq!(engine.list_transactions().await.unwrap().len(), 2 * rows);
}
