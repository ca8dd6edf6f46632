//! Category repository

use std::sync::Arc;

use crate::domain::entities::Category;
use crate::domain::validation::normalize_category_name;
use crate::store::ModerationStore;
use parlor_common::{Error, Result};

#[derive(Clone)]
pub struct CategoryRepository {
    store: Arc<dyn ModerationStore>,
}

impl CategoryRepository {
    pub fn new(store: Arc<dyn ModerationStore>) -> Self {
        Self { store }
    }

    /// Create a category. The id is derived deterministically from the
    /// name; name uniqueness is enforced case-insensitively.
    pub async fn create_category(&self, name: &str, order: i32) -> Result<Category> {
        let category = Category::new(name, order)?;

        if let Some(existing) = self
            .store
            .find_category_by_name(&category.normalized_name())
            .await?
        {
            return Err(Error::Conflict(format!(
                "Category name already in use by '{}'",
                existing.name
            )));
        }
        if self.store.get_category(&category.id).await?.is_some() {
            return Err(Error::Conflict(format!(
                "Category id '{}' already exists",
                category.id
            )));
        }

        self.store.insert_category(&category).await?;
        tracing::info!(id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Delete a category, migrating its posts to `migrate_to` first.
    /// Returns the number of posts migrated.
    pub async fn delete_category(&self, category_id: &str, migrate_to: &str) -> Result<u64> {
        if category_id == migrate_to {
            return Err(Error::Validation(
                "Migration target must differ from the category being deleted".to_string(),
            ));
        }
        if self.store.get_category(category_id).await?.is_none() {
            return Err(Error::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }
        if self.store.get_category(migrate_to).await?.is_none() {
            return Err(Error::NotFound(format!(
                "Migration target category {} not found",
                migrate_to
            )));
        }

        let migrated = self.store.migrate_posts(category_id, migrate_to).await?;
        self.store.delete_category(category_id).await?;
        tracing::info!(id = %category_id, migrate_to = %migrate_to, migrated, "Category deleted");
        Ok(migrated)
    }

    /// Categories ordered by display order
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.store.list_categories().await
    }

    /// Case-insensitive lookup by display name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        self.store
            .find_category_by_name(&normalize_category_name(name))
            .await
    }
}
