use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use crate::{
    Category, EngineError, LedgerStore, Money, NewTransaction, RawRow, ResultEngine, Transaction,
    TransactionKind, read_rows,
};

use super::{Engine, ensure_non_negative};

/// An import source owned by one import for its whole duration.
///
/// Reading leaves the file untouched; [`UploadedFile::remove`] consumes the
/// handle and is only reached after every write succeeded. Dropping the handle
/// keeps the file, so a failed import can be inspected and retried.
struct UploadedFile {
    path: PathBuf,
}

impl UploadedFile {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    async fn read_rows(&self) -> ResultEngine<Vec<RawRow>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_rows(&path)?.collect::<ResultEngine<Vec<_>>>())
            .await
            .map_err(|err| EngineError::FileRead(format!("reader task failed: {err}")))?
    }

    /// The ledger is already committed at this point; failing here would
    /// invite a retry that duplicates every row, so the error is only logged.
    async fn remove(self) {
        if let Err(err) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), "failed to remove imported file: {err}");
        }
    }
}

struct ImportRow {
    title: String,
    kind: TransactionKind,
    value: Money,
    category: String,
}

impl TryFrom<RawRow> for ImportRow {
    type Error = EngineError;

    fn try_from(row: RawRow) -> Result<Self, Self::Error> {
        let line = row.line;
        let kind = TransactionKind::try_from(row.kind.as_str()).map_err(|_| {
            EngineError::InvalidTransactionType(format!(
                "line {line}: expected income or outcome, got {:?}",
                row.kind
            ))
        })?;
        let value: Money = row.value.parse().map_err(|_| {
            EngineError::InvalidAmount(format!("line {line}: invalid value {:?}", row.value))
        })?;
        ensure_non_negative(value)
            .map_err(|_| EngineError::InvalidAmount(format!("line {line}: value must be >= 0")))?;

        Ok(Self {
            title: row.title,
            kind,
            value,
            category: row.category,
        })
    }
}

impl<S: LedgerStore> Engine<S> {
    /// Imports every row of a delimited file, then deletes the file.
    ///
    /// All rows are read and validated before the first write. Categories are
    /// resolved with one lookup and at most one batch insert, transactions are
    /// written with one batch insert. If either write fails the file stays in
    /// place and nothing is returned.
    ///
    /// Unlike [`Engine::create_transaction`] there is no balance check here:
    /// an import may leave the ledger with a negative total.
    pub async fn import_transactions(
        &self,
        path: impl AsRef<Path>,
    ) -> ResultEngine<Vec<Transaction>> {
        let file = UploadedFile::new(path.as_ref());

        let rows = file
            .read_rows()
            .await?
            .into_iter()
            .map(ImportRow::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let categories = self.resolve_categories(&rows).await?;

        let new = rows
            .into_iter()
            .map(|row| {
                let category = categories
                    .get(&row.category)
                    .cloned()
                    .ok_or_else(|| EngineError::KeyNotFound(row.category.clone()))?;
                NewTransaction::new(row.title, row.kind, row.value, category)
            })
            .collect::<ResultEngine<Vec<_>>>()?;

        let created = self.store.create_transactions(new).await?;
        file.remove().await;

        tracing::info!(
            path = %path.as_ref().display(),
            transactions = created.len(),
            "import completed"
        );
        Ok(created)
    }

    /// Batch find-or-create for every category title referenced by `rows`.
    async fn resolve_categories(
        &self,
        rows: &[ImportRow],
    ) -> ResultEngine<HashMap<String, Category>> {
        let mut seen = HashSet::new();
        let requested: Vec<String> = rows
            .iter()
            .filter(|row| seen.insert(row.category.as_str()))
            .map(|row| row.category.clone())
            .collect();

        let existing = self.store.find_categories_by_titles(&requested).await?;
        let missing: Vec<String> = {
            let known: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();
            requested
                .into_iter()
                .filter(|title| !known.contains(title.as_str()))
                .collect()
        };

        let created = self.store.create_categories(&missing).await?;
        if !created.is_empty() {
            tracing::debug!(count = created.len(), "categories created by import");
        }

        let mut by_title = HashMap::with_capacity(existing.len() + created.len());
        for category in existing.into_iter().chain(created) {
            by_title.entry(category.title.clone()).or_insert(category);
        }
        Ok(by_title)
    }
}
