use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::warn;

use super::{credentials::CredentialSource, GoogleSheets, SheetRef, SheetStore, StoreError};
use crate::table::RawTable;

/// Builds the Google client on first use and keeps it.
///
/// A failed build is not remembered, so the next call tries again. Any
/// call rejected as unauthenticated drops the cached client. Two first
/// calls racing may both connect; the later one is kept.
pub struct LazySheets {
    source: CredentialSource,
    client: RwLock<Option<Arc<GoogleSheets>>>,
}

impl LazySheets {
    pub fn new(source: CredentialSource) -> Self {
        Self {
            source,
            client: RwLock::new(None),
        }
    }

    pub async fn client(&self) -> Result<Arc<GoogleSheets>, StoreError> {
        if let Some(c) = self.client.read().await.as_ref() {
            return Ok(Arc::clone(c));
        }

        let fresh = Arc::new(GoogleSheets::connect(&self.source).await?);
        *self.client.write().await = Some(Arc::clone(&fresh));
        Ok(fresh)
    }

    pub async fn invalidate(&self) {
        *self.client.write().await = None;
    }

    async fn settle<T>(&self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        if let Err(e) = &result {
            if e.is_auth() {
                warn!("dropping cached Sheets client: {}", e);
                self.invalidate().await;
            }
        }
        result
    }
}

#[async_trait]
impl SheetStore for LazySheets {
    async fn read_grid(&self, sheet: &SheetRef) -> Result<RawTable, StoreError> {
        let client = self.client().await?;
        self.settle(client.read_grid(sheet).await).await
    }

    async fn read_header(&self, sheet: &SheetRef) -> Result<Vec<String>, StoreError> {
        let client = self.client().await?;
        self.settle(client.read_header(sheet).await).await
    }

    async fn append_row(&self, sheet: &SheetRef, row: Vec<String>) -> Result<String, StoreError> {
        let client = self.client().await?;
        self.settle(client.append_row(sheet, row).await).await
    }

    async fn probe(&self, spreadsheet_id: &str) -> Result<String, StoreError> {
        let client = self.client().await?;
        self.settle(client.probe(spreadsheet_id).await).await
    }

    async fn worksheets(&self, spreadsheet_id: &str) -> Result<Vec<String>, StoreError> {
        let client = self.client().await?;
        self.settle(client.worksheets(spreadsheet_id).await).await
    }

    async fn ready(&self) -> Result<(), StoreError> {
        self.client().await.map(|_| ())
    }
}
