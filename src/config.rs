use std::{collections::HashMap, env, path::PathBuf};

use crate::{error::ApiError, sheets::credentials::CredentialSource, sheets::SheetRef};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_WORKSHEET: &str = "Sheet1";
const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
const DEFAULT_EMAIL_DOMAIN: &str = "company.com";

/// The three sheets the service works against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sheet {
    Questions,
    Mapping,
    Responses,
}

impl Sheet {
    pub fn id_var(&self) -> &'static str {
        match self {
            Sheet::Questions => "GOOGLE_SHEET_ID_QUESTIONS",
            Sheet::Mapping => "GOOGLE_SHEET_ID_MAPPING",
            Sheet::Responses => "GOOGLE_SHEET_ID_RESPONSES",
        }
    }

    pub fn name_var(&self) -> &'static str {
        match self {
            Sheet::Questions => "QUESTIONS_SHEET_NAME",
            Sheet::Mapping => "MAPPING_SHEET_NAME",
            Sheet::Responses => "RESPONSES_SHEET_NAME",
        }
    }

    pub const ALL: [Sheet; 3] = [Sheet::Questions, Sheet::Mapping, Sheet::Responses];
}

#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub spreadsheet_id: Option<String>,
    pub worksheet: String,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub questions: SheetConfig,
    pub mapping: SheetConfig,
    pub responses: SheetConfig,
    pub credentials: CredentialSource,
    pub development: bool,
    pub sso_email_domain: String,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_vars(env::vars().collect())
    }

    /// Build from an explicit variable map. Blank values count as unset.
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        let get = |k: &str| {
            vars.get(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let sheet = |s: Sheet| SheetConfig {
            spreadsheet_id: get(s.id_var()),
            worksheet: get(s.name_var()).unwrap_or_else(|| DEFAULT_WORKSHEET.to_string()),
        };

        Self {
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            questions: sheet(Sheet::Questions),
            mapping: sheet(Sheet::Mapping),
            responses: sheet(Sheet::Responses),
            credentials: CredentialSource {
                file: PathBuf::from(
                    get("GOOGLE_CREDENTIALS_FILE")
                        .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string()),
                ),
                inline_json: get("GOOGLE_CREDENTIALS_JSON"),
            },
            development: get("APP_ENV")
                .map(|e| e.eq_ignore_ascii_case("development"))
                .unwrap_or(false),
            sso_email_domain: get("SSO_EMAIL_DOMAIN")
                .unwrap_or_else(|| DEFAULT_EMAIL_DOMAIN.to_string()),
        }
    }

    pub fn sheet(&self, which: Sheet) -> &SheetConfig {
        match which {
            Sheet::Questions => &self.questions,
            Sheet::Mapping => &self.mapping,
            Sheet::Responses => &self.responses,
        }
    }

    /// Resolve a sheet address, or report which variable is missing.
    pub fn sheet_ref(&self, which: Sheet) -> Result<SheetRef, ApiError> {
        let cfg = self.sheet(which);
        cfg.spreadsheet_id
            .as_ref()
            .map(|id| SheetRef::new(id.clone(), cfg.worksheet.clone()))
            .ok_or_else(|| ApiError::ConfigurationMissing(format!("{} not configured", which.id_var())))
    }

    /// First configured spreadsheet id, in questions/mapping/responses order.
    pub fn any_spreadsheet_id(&self) -> Option<&str> {
        Sheet::ALL
            .iter()
            .find_map(|s| self.sheet(*s).spreadsheet_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_vars(HashMap::new());
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.questions.worksheet, "Sheet1");
        assert!(cfg.mapping.spreadsheet_id.is_none());
        assert_eq!(cfg.credentials.file, PathBuf::from("credentials.json"));
        assert!(!cfg.development);
        assert_eq!(cfg.sso_email_domain, "company.com");
        assert!(cfg.any_spreadsheet_id().is_none());
    }

    #[test]
    fn test_overrides_and_blanks() {
        let cfg = Config::from_vars(vars(&[
            ("PORT", "8080"),
            ("GOOGLE_SHEET_ID_MAPPING", " map-id "),
            ("GOOGLE_SHEET_ID_RESPONSES", "   "),
            ("RESPONSES_SHEET_NAME", "Form Responses"),
            ("APP_ENV", "Development"),
        ]));
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.any_spreadsheet_id(), Some("map-id"));
        assert!(cfg.responses.spreadsheet_id.is_none());
        assert_eq!(cfg.responses.worksheet, "Form Responses");
        assert!(cfg.development);
    }

    #[test]
    fn test_sheet_ref_missing_names_variable() {
        let cfg = Config::from_vars(vars(&[("GOOGLE_SHEET_ID_QUESTIONS", "q-id")]));
        assert_eq!(
            cfg.sheet_ref(Sheet::Questions).unwrap(),
            SheetRef::new("q-id", "Sheet1")
        );
        match cfg.sheet_ref(Sheet::Responses) {
            Err(ApiError::ConfigurationMissing(msg)) => {
                assert!(msg.contains("GOOGLE_SHEET_ID_RESPONSES"))
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
