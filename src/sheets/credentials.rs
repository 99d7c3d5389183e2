use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use super::StoreError;

/// Where service-account credentials may come from, in lookup order.
#[derive(Debug, Clone)]
pub struct CredentialSource {
    /// Key file on disk, tried first.
    pub file: PathBuf,
    /// Inline key JSON, used when the file is absent.
    pub inline_json: Option<String>,
}

impl CredentialSource {
    /// Resolve the service-account JSON text.
    pub fn load(&self) -> Result<String, StoreError> {
        if self.file.is_file() {
            info!(path = %self.file.display(), "using credentials file");
            return read_file(&self.file);
        }

        match self.inline_json.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                info!("using inline credentials");
                normalize_inline(raw)
            }
            _ => Err(StoreError::Credentials(format!(
                "{} does not exist and GOOGLE_CREDENTIALS_JSON is not set",
                self.file.display()
            ))),
        }
    }
}

fn read_file(path: &Path) -> Result<String, StoreError> {
    std::fs::read_to_string(path)
        .map_err(|e| StoreError::Credentials(format!("reading {}: {}", path.display(), e)))
}

/// Keys pasted into an env var usually carry `\n` escapes instead of
/// line breaks inside `private_key`; put the breaks back.
fn normalize_inline(raw: &str) -> Result<String, StoreError> {
    let mut creds: Value = serde_json::from_str(raw).map_err(|e| {
        StoreError::Credentials(format!("invalid JSON in GOOGLE_CREDENTIALS_JSON: {}", e))
    })?;

    if let Some(email) = creds.get("client_email").and_then(Value::as_str) {
        debug!(client_email = %email, "service account");
    }
    if let Some(Value::String(key)) = creds.get_mut("private_key") {
        *key = key.replace("\\n", "\n");
    }

    Ok(creds.to_string())
}
