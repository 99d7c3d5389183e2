// src/sheets/mod.rs

pub mod client;
pub mod credentials;
pub mod lazy;
#[cfg(test)]
pub mod memory;

pub use client::GoogleSheets;
pub use lazy::LazySheets;
#[cfg(test)]
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::table::RawTable;

/// Address of one worksheet inside one spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRef {
    pub spreadsheet_id: String,
    pub worksheet: String,
}

impl SheetRef {
    pub fn new(spreadsheet_id: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
        }
    }
}

impl std::fmt::Display for SheetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.spreadsheet_id, self.worksheet)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no Google credentials found: {0}")]
    Credentials(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("Google Sheets API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("request to Google Sheets failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected reply from Google Sheets: {0}")]
    Decode(String),
}

impl StoreError {
    /// True when the cached client should be thrown away.
    pub fn is_auth(&self) -> bool {
        matches!(self, StoreError::Auth(_))
    }
}

/// Tabular storage the API reads from and appends to.
/// Retries, timeouts and durability are the implementation's concern.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Every row of the worksheet as text cells.
    async fn read_grid(&self, sheet: &SheetRef) -> Result<RawTable, StoreError>;

    /// The worksheet's current first row.
    async fn read_header(&self, sheet: &SheetRef) -> Result<Vec<String>, StoreError>;

    /// Append one row after the last populated row. Returns the updated range.
    async fn append_row(&self, sheet: &SheetRef, row: Vec<String>) -> Result<String, StoreError>;

    /// Cheap reachability check; returns the spreadsheet title.
    async fn probe(&self, spreadsheet_id: &str) -> Result<String, StoreError>;

    /// Titles of the spreadsheet's worksheets, in tab order.
    async fn worksheets(&self, spreadsheet_id: &str) -> Result<Vec<String>, StoreError>;

    /// Whether a connection can be made at all, without naming a sheet.
    async fn ready(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
