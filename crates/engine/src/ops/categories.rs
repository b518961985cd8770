use crate::{Category, LedgerStore, ResultEngine};

use super::{Engine, normalize_required_name};

impl<S: LedgerStore> Engine<S> {
    /// Find-or-create a category by title.
    ///
    /// The title is trimmed, then matched exactly. Lookup and insert are two
    /// separate store calls, so concurrent first uses of a title may create
    /// duplicates.
    pub async fn resolve_category(&self, title: &str) -> ResultEngine<Category> {
        let title = normalize_required_name(title, "category")?;

        if let Some(category) = self.store.find_category_by_title(&title).await? {
            return Ok(category);
        }

        let category = self.store.create_category(&title).await?;
        tracing::debug!(id = %category.id, title = %category.title, "category created");
        Ok(category)
    }

    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        self.store.list_categories().await
    }
}
