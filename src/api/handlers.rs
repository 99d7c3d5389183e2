use std::convert::Infallible;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};
use warp::{
    http::HeaderMap,
    hyper::body::Bytes,
    reply::{Reply, Response},
};

use super::Shared;
use crate::{
    config::Sheet,
    error::ApiError,
    identity,
    questions::{self, extract},
    submit::{self, Submission},
    table::{filter_by_field, project},
};

/// Mapping rows are matched on this column.
pub const MAPPING_EMAIL_FIELD: &str = "Email";

const SERVICE_NAME: &str = "Feedback Hub Backend";

#[derive(Debug, Default, Deserialize)]
pub struct MappingQuery {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

fn respond(route: &str, development: bool, result: Result<Value, ApiError>) -> Response {
    match result {
        Ok(body) => warp::reply::json(&body).into_response(),
        Err(e) => {
            if e.status().is_server_error() {
                error!(route = %route, "{}", e);
            } else {
                warn!(route = %route, "{}", e);
            }
            warp::reply::with_status(warp::reply::json(&e.body(development)), e.status())
                .into_response()
        }
    }
}

pub async fn health(state: Shared) -> Result<Response, Infallible> {
    let probe = match state.config.any_spreadsheet_id() {
        Some(id) => state.store.probe(id).await.map(|_| ()),
        None => state.store.ready().await,
    };
    if let Err(e) = &probe {
        warn!("health probe failed: {}", e);
    }

    Ok(warp::reply::json(&json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339(),
        "google_sheets_connected": probe.is_ok(),
    }))
    .into_response())
}

pub async fn test_sheets(state: Shared) -> Result<Response, Infallible> {
    Ok(respond("test-sheets", state.config.development, inspect_sheets(&state).await))
}

/// Open the questions spreadsheet and list its worksheets.
async fn inspect_sheets(state: &Shared) -> Result<Value, ApiError> {
    let sheet = state.config.sheet_ref(Sheet::Questions)?;
    let title = state.store.probe(&sheet.spreadsheet_id).await?;
    let worksheets = state.store.worksheets(&sheet.spreadsheet_id).await?;
    info!(title = %title, worksheets = worksheets.len(), "connection test passed");

    Ok(json!({
        "success": true,
        "message": "Successfully connected to Google Sheets",
        "spreadsheet_id": sheet.spreadsheet_id,
        "spreadsheet_title": title,
        "worksheets_count": worksheets.len(),
        "worksheets": worksheets,
    }))
}

pub async fn questions(state: Shared) -> Result<Response, Infallible> {
    Ok(respond("questions", state.config.development, load_questions(&state).await))
}

async fn load_questions(state: &Shared) -> Result<Value, ApiError> {
    let sheet = state.config.sheet_ref(Sheet::Questions)?;
    let grid = state.store.read_grid(&sheet).await?;
    let items = extract(&grid);
    let categories = questions::categories(&items);
    info!(
        rows = grid.len(),
        questions = items.len(),
        categories = categories.len(),
        "extracted questions"
    );

    Ok(json!({
        "success": true,
        "count": items.len(),
        "data": items,
        "categories": categories,
    }))
}

pub async fn mapping(query: MappingQuery, state: Shared) -> Result<Response, Infallible> {
    Ok(respond("mapping", state.config.development, load_mapping(&state, query).await))
}

async fn load_mapping(state: &Shared, query: MappingQuery) -> Result<Value, ApiError> {
    let sheet = state.config.sheet_ref(Sheet::Mapping)?;
    let grid = state.store.read_grid(&sheet).await?;
    let email = query.email.unwrap_or_default();
    let records = filter_by_field(project(&grid).records, MAPPING_EMAIL_FIELD, &email);
    info!(email = %email, matched = records.len(), "mapping lookup");

    let filtered_by = if email.is_empty() {
        "all".to_string()
    } else {
        email
    };
    Ok(json!({
        "success": true,
        "count": records.len(),
        "data": records,
        "filtered_by": filtered_by,
    }))
}

pub async fn responses(state: Shared) -> Result<Response, Infallible> {
    Ok(respond("responses", state.config.development, load_responses(&state).await))
}

async fn load_responses(state: &Shared) -> Result<Value, ApiError> {
    let sheet = state.config.sheet_ref(Sheet::Responses)?;
    let grid = state.store.read_grid(&sheet).await?;
    let projection = project(&grid);
    info!(records = projection.records.len(), "read responses");

    Ok(json!({
        "success": true,
        "count": projection.records.len(),
        "data": projection.records,
        "headers": projection.header,
    }))
}

pub async fn submit_feedback(body: Bytes, state: Shared) -> Result<Response, Infallible> {
    Ok(respond("submit-feedback", state.config.development, store_feedback(&state, &body).await))
}

fn parse_submission(body: &[u8]) -> Result<Submission, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("No data provided".into()));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(map),
        Ok(Value::Object(_)) | Ok(Value::Null) => {
            Err(ApiError::BadRequest("No data provided".into()))
        }
        Ok(_) => Err(ApiError::BadRequest(
            "Submission must be a JSON object".into(),
        )),
        Err(e) => Err(ApiError::BadRequest(format!("Invalid JSON body: {}", e))),
    }
}

async fn store_feedback(state: &Shared, body: &[u8]) -> Result<Value, ApiError> {
    let payload = parse_submission(body)?;
    info!(fields = payload.len(), "received feedback submission");

    let missing = submit::missing_required(&payload);
    if !missing.is_empty() {
        return Err(ApiError::Validation { missing });
    }

    let sheet = state.config.sheet_ref(Sheet::Responses)?;
    let header = state.store.read_header(&sheet).await?;
    if header.is_empty() {
        return Err(ApiError::UpstreamUnavailable(format!(
            "responses sheet {} has no header row",
            sheet
        )));
    }

    let row = submit::encode(&header, &payload);
    let range = state.store.append_row(&sheet, row).await?;
    info!(columns = header.len(), range = %range, "feedback appended");

    Ok(json!({
        "success": true,
        "message": "Feedback submitted successfully",
        "timestamp": Utc::now().to_rfc3339(),
        "fields_submitted": payload.len(),
    }))
}

pub async fn detect_email(headers: HeaderMap, state: Shared) -> Result<Response, Infallible> {
    let reply = match identity::detect_email(&headers, &state.config.sso_email_domain) {
        Some(email) => {
            info!(email = %email, "detected email from SSO headers");
            json!({ "success": true, "email": email, "source": "sso_headers" })
        }
        None => json!({ "success": false, "error": "No email detected" }),
    };
    Ok(warp::reply::json(&reply).into_response())
}

pub async fn decode_token(query: TokenQuery, state: Shared) -> Result<Response, Infallible> {
    let result = match query.token.as_deref().map(str::trim) {
        None | Some("") => Err(ApiError::BadRequest("No token provided".into())),
        Some(token) => identity::decode_token(token)
            .map(|email| json!({ "success": true, "email": email, "source": "token" }))
            .ok_or_else(|| ApiError::BadRequest("Invalid token".into())),
    };
    Ok(respond("decode-token", state.config.development, result))
}
