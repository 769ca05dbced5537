//! Client-side list cache.
//!
//! Positions shift on every delete, so the cache is never patched in place: each
//! successful mutation is followed by a full reload. Methods take `&mut self`,
//! which keeps one session's mutate-then-reload sequences from overlapping.

use super::api::Resource;
use super::error::ClientError;
use crate::domain::model::SheetEntity;

pub struct Collection<E: SheetEntity> {
    resource: Resource<E>,
    items: Vec<E>,
    last_error: Option<ClientError>,
}

impl<E: SheetEntity> Collection<E> {
    pub fn new(resource: Resource<E>) -> Self {
        Self {
            resource,
            items: Vec::new(),
            last_error: None,
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// The failure of the most recent call, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    fn track<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match result {
            Ok(v) => {
                self.last_error = None;
                Ok(v)
            }
            Err(e) => {
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub async fn reload(&mut self) -> Result<&[E], ClientError> {
        let result = self.resource.list().await;
        self.items = self.track(result)?;
        Ok(&self.items)
    }

    pub async fn create(&mut self, input: &E::Input) -> Result<E, ClientError> {
        let result = self.resource.create(input).await;
        let created = self.track(result)?;
        self.reload().await?;
        Ok(created)
    }

    pub async fn update(&mut self, row_index: u32, input: &E::Input) -> Result<E, ClientError> {
        let result = self.resource.update(row_index, input).await;
        let updated = self.track(result)?;
        self.reload().await?;
        Ok(updated)
    }

    pub async fn remove(&mut self, row_index: u32) -> Result<(), ClientError> {
        let result = self.resource.delete(row_index).await;
        self.track(result)?;
        self.reload().await?;
        Ok(())
    }
}
