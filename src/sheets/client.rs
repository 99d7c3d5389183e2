use std::sync::Arc;

use async_trait::async_trait;
use google_cloud_auth::{
    credentials::CredentialsFile, project::Config, token::DefaultTokenSourceProvider,
};
use google_cloud_token::{TokenSource, TokenSourceProvider};
use reqwest::{header::AUTHORIZATION, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use super::{credentials::CredentialSource, SheetRef, SheetStore, StoreError};
use crate::table::RawTable;

const SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];
const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Google Sheets v4 REST client authenticated as a service account.
pub struct GoogleSheets {
    http: Client,
    tokens: Arc<dyn TokenSource>,
    base: Url,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct AppendReply {
    #[serde(default)]
    updates: Option<AppendUpdates>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    #[serde(default)]
    updated_range: String,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    properties: SpreadsheetProperties,
}

#[derive(Deserialize)]
struct SpreadsheetProperties {
    #[serde(default)]
    title: String,
}

#[derive(Deserialize)]
struct SpreadsheetTabs {
    #[serde(default)]
    sheets: Vec<Tab>,
}

#[derive(Deserialize)]
struct Tab {
    properties: SpreadsheetProperties,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GoogleSheets {
    /// Load credentials, build a token source and fetch one token so a
    /// bad key fails here rather than on the first request.
    pub async fn connect(source: &CredentialSource) -> Result<Self, StoreError> {
        let raw = source.load()?;
        let creds = CredentialsFile::new_from_str(&raw)
            .await
            .map_err(|e| StoreError::Credentials(e.to_string()))?;

        let config = Config::default().with_scopes(SCOPES);
        let provider = DefaultTokenSourceProvider::new_with_credentials(config, Box::new(creds))
            .await
            .map_err(|e| StoreError::Auth(e.to_string()))?;
        let tokens = provider.token_source();
        tokens
            .token()
            .await
            .map_err(|e| StoreError::Auth(e.to_string()))?;

        info!("Google Sheets client initialized");
        Ok(Self::with_token_source(Client::new(), tokens))
    }

    pub fn with_token_source(http: Client, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http,
            tokens,
            base: Url::parse(API_BASE).expect("Sheets API base URL should be valid"),
        }
    }

    /// `…/spreadsheets/{id}/values/{range}` with each segment escaped.
    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("Sheets API base URL is hierarchical")
            .extend([spreadsheet_id, "values", range]);
        url
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, StoreError> {
        let token = self
            .tokens
            .token()
            .await
            .map_err(|e| StoreError::Auth(e.to_string()))?;
        let bearer = if token.starts_with("Bearer ") {
            token
        } else {
            format!("Bearer {}", token)
        };

        let resp = req.header(AUTHORIZATION, bearer).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorReply>(&body)
            .map(|r| r.error.message)
            .unwrap_or(body);
        if status == StatusCode::UNAUTHORIZED {
            Err(StoreError::Auth(message))
        } else {
            Err(StoreError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// `…/spreadsheets/{id}?fields=…` for spreadsheet metadata.
    async fn metadata<T: serde::de::DeserializeOwned>(
        &self,
        spreadsheet_id: &str,
        fields: &str,
    ) -> Result<T, StoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("Sheets API base URL is hierarchical")
            .push(spreadsheet_id);
        let req = self.http.get(url).query(&[("fields", fields)]);

        self.send(req)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<RawTable, StoreError> {
        let url = self.values_url(spreadsheet_id, range);
        let reply: ValueRange = self
            .send(self.http.get(url))
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(reply
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

#[async_trait]
impl SheetStore for GoogleSheets {
    async fn read_grid(&self, sheet: &SheetRef) -> Result<RawTable, StoreError> {
        let grid = self
            .read_range(&sheet.spreadsheet_id, &a1_range(&sheet.worksheet, None))
            .await?;
        debug!(sheet = %sheet, rows = grid.len(), "read grid");
        Ok(grid)
    }

    async fn read_header(&self, sheet: &SheetRef) -> Result<Vec<String>, StoreError> {
        let grid = self
            .read_range(&sheet.spreadsheet_id, &a1_range(&sheet.worksheet, Some("1:1")))
            .await?;
        Ok(grid.into_iter().next().unwrap_or_default())
    }

    async fn append_row(&self, sheet: &SheetRef, row: Vec<String>) -> Result<String, StoreError> {
        let range = a1_range(&sheet.worksheet, None);
        let url = self.values_url(&sheet.spreadsheet_id, &format!("{}:append", range));
        let req = self
            .http
            .post(url)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": [row] }));

        let reply: AppendReply = self
            .send(req)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let updated = reply.updates.map(|u| u.updated_range).unwrap_or_default();
        debug!(sheet = %sheet, range = %updated, "appended row");
        Ok(updated)
    }

    async fn probe(&self, spreadsheet_id: &str) -> Result<String, StoreError> {
        let meta: SpreadsheetMeta = self.metadata(spreadsheet_id, "properties.title").await?;
        Ok(meta.properties.title)
    }

    async fn worksheets(&self, spreadsheet_id: &str) -> Result<Vec<String>, StoreError> {
        let tabs: SpreadsheetTabs = self
            .metadata(spreadsheet_id, "sheets.properties.title")
            .await?;
        Ok(tabs.sheets.into_iter().map(|t| t.properties.title).collect())
    }
}

/// A1 notation for a whole worksheet or a row span of it. Names other
/// than plain alphanumerics are single-quoted, with inner quotes doubled.
fn a1_range(worksheet: &str, span: Option<&str>) -> String {
    let name = if worksheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        worksheet.to_string()
    } else {
        format!("'{}'", worksheet.replace('\'', "''"))
    };
    match span {
        Some(s) => format!("{}!{}", name, s),
        None => name,
    }
}

fn cell_text(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
