use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;

use super::{SheetRef, SheetStore, StoreError};
use crate::table::RawTable;

/// In-process store for exercising handlers without the network.
#[derive(Default)]
pub struct MemoryStore {
    sheets: Mutex<HashMap<SheetRef, RawTable>>,
    outage: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(self, sheet: SheetRef, rows: &[&[&str]]) -> Self {
        let grid = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        self.sheets.lock().unwrap().insert(sheet, grid);
        self
    }

    /// Make every call fail with `message` until cleared.
    pub fn set_outage(&self, message: Option<&str>) {
        *self.outage.lock().unwrap() = message.map(str::to_string);
    }

    pub fn rows(&self, sheet: &SheetRef) -> RawTable {
        self.sheets
            .lock()
            .unwrap()
            .get(sheet)
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.outage.lock().unwrap().as_ref() {
            Some(msg) => Err(StoreError::Auth(msg.clone())),
            None => Ok(()),
        }
    }

    fn not_found() -> StoreError {
        StoreError::Status {
            status: 404,
            message: "Requested entity was not found.".into(),
        }
    }
}

#[async_trait]
impl SheetStore for MemoryStore {
    async fn read_grid(&self, sheet: &SheetRef) -> Result<RawTable, StoreError> {
        self.check()?;
        self.sheets
            .lock()
            .unwrap()
            .get(sheet)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn read_header(&self, sheet: &SheetRef) -> Result<Vec<String>, StoreError> {
        let grid = self.read_grid(sheet).await?;
        Ok(grid.into_iter().next().unwrap_or_default())
    }

    async fn append_row(&self, sheet: &SheetRef, row: Vec<String>) -> Result<String, StoreError> {
        self.check()?;
        let mut sheets = self.sheets.lock().unwrap();
        let grid = sheets.get_mut(sheet).ok_or_else(Self::not_found)?;
        grid.push(row);
        Ok(format!("{}!A{}", sheet.worksheet, grid.len()))
    }

    async fn probe(&self, spreadsheet_id: &str) -> Result<String, StoreError> {
        self.check()?;
        let sheets = self.sheets.lock().unwrap();
        if sheets.keys().any(|s| s.spreadsheet_id == spreadsheet_id) {
            Ok(format!("memory:{}", spreadsheet_id))
        } else {
            Err(Self::not_found())
        }
    }

    async fn worksheets(&self, spreadsheet_id: &str) -> Result<Vec<String>, StoreError> {
        self.check()?;
        let mut names: Vec<String> = self
            .sheets
            .lock()
            .unwrap()
            .keys()
            .filter(|s| s.spreadsheet_id == spreadsheet_id)
            .map(|s| s.worksheet.clone())
            .collect();
        if names.is_empty() {
            return Err(Self::not_found());
        }
        names.sort();
        Ok(names)
    }

    async fn ready(&self) -> Result<(), StoreError> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_worksheets_lists_tabs_of_one_spreadsheet() {
        let store = MemoryStore::new()
            .with_sheet(SheetRef::new("a", "Responses"), &[&["x"]])
            .with_sheet(SheetRef::new("a", "Mapping"), &[&["y"]])
            .with_sheet(SheetRef::new("b", "Other"), &[]);

        assert_eq!(store.worksheets("a").await.unwrap(), ["Mapping", "Responses"]);
        assert!(matches!(
            store.worksheets("zzz").await,
            Err(StoreError::Status { status: 404, .. })
        ));

        store.set_outage(Some("expired"));
        assert!(store.worksheets("a").await.unwrap_err().is_auth());
    }
}
