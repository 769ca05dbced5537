//! Entity services: validation first, then exactly one adapter call.
//!
//! Nothing is retried here; a failed store call goes straight back to the caller.

use crate::domain::model::{Person, Product, SheetEntity};
use crate::error::ServiceError;
use crate::infra::sheets::SheetBackend;
use crate::storage::sheet::EntityTable;
use std::sync::Arc;

pub type PersonService = EntityService<Person>;
pub type ProductService = EntityService<Product>;

pub struct EntityService<E: SheetEntity> {
    table: EntityTable<E>,
}

impl<E: SheetEntity> EntityService<E> {
    pub fn new(backend: Arc<dyn SheetBackend>, sheet: impl Into<String>) -> Self {
        Self {
            table: EntityTable::new(backend, sheet),
        }
    }

    /// Every stored entity in sheet order. An empty sheet yields an empty list.
    pub async fn list(&self) -> Result<Vec<E>, ServiceError> {
        Ok(self.table.list_all().await?)
    }

    /// Validates `input` and appends it. Invalid input never reaches the store.
    pub async fn create(&self, input: &E::Input) -> Result<E, ServiceError> {
        let entity = E::from_input(input).map_err(|e| {
            tracing::debug!(entity = E::LABEL, error = %e, "Create rejected");
            e
        })?;
        let row_index = self.table.append(&entity).await?;
        tracing::info!(entity = E::LABEL, row_index, "Created");
        Ok(entity.with_row_index(row_index))
    }

    /// Validates `input` and replaces the row at `row_index` with it.
    pub async fn update(&self, row_index: u32, input: &E::Input) -> Result<E, ServiceError> {
        let entity = E::from_input(input).map_err(|e| {
            tracing::debug!(entity = E::LABEL, row_index, error = %e, "Update rejected");
            e
        })?;
        self.table.replace_at(row_index, &entity).await?;
        tracing::info!(entity = E::LABEL, row_index, "Updated");
        Ok(entity.with_row_index(row_index))
    }

    /// Removes the row at `row_index`. Every later position shifts down by one, so
    /// callers must reload their full list afterwards.
    pub async fn delete(&self, row_index: u32) -> Result<(), ServiceError> {
        self.table.delete_at(row_index).await?;
        tracing::info!(entity = E::LABEL, row_index, "Deleted");
        Ok(())
    }
}
