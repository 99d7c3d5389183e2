// src/api/mod.rs

pub mod handlers;

use std::{convert::Infallible, sync::Arc};

use serde_json::json;
use tracing::warn;
use warp::{http::StatusCode, reject::Rejection, reply::Reply, Filter};

use crate::{config::Config, sheets::SheetStore};

/// Request bodies above this size are refused.
const MAX_BODY_BYTES: u64 = 256 * 1024;

/// Everything a handler needs, shared across requests.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SheetStore>,
}

pub type Shared = Arc<AppState>;

fn with_state(state: Shared) -> impl Filter<Extract = (Shared,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&state))
}

/// All `/api/*` routes, with CORS, request tracing and JSON rejections.
pub fn routes(state: Shared) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let api = warp::path("api");

    let health = api
        .and(warp::path("health"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::health);

    let test_sheets = api
        .and(warp::path("test-sheets"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::test_sheets);

    let questions = api
        .and(warp::path("questions").or(warp::path("survey-questions")).unify())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::questions);

    let mapping = api
        .and(
            warp::path("mapping")
                .or(warp::path("mapping-data"))
                .unify()
                .or(warp::path("management-mapping"))
                .unify(),
        )
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<handlers::MappingQuery>())
        .and(with_state(state.clone()))
        .and_then(handlers::mapping);

    let responses = api
        .and(warp::path("responses").or(warp::path("feedback-responses")).unify())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::responses);

    let submit = api
        .and(
            warp::path("submit-feedback")
                .or(warp::path("feedback-responses"))
                .unify(),
        )
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_state(state.clone()))
        .and_then(handlers::submit_feedback);

    let detect_email = api
        .and(warp::path("detect-email"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::header::headers_cloned())
        .and(with_state(state.clone()))
        .and_then(handlers::detect_email);

    let decode_token = api
        .and(warp::path("decode-token"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<handlers::TokenQuery>())
        .and(with_state(state))
        .and_then(handlers::decode_token);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type"]);

    health
        .or(test_sheets)
        .or(questions)
        .or(mapping)
        .or(responses)
        .or(submit)
        .or(detect_email)
        .or(decode_token)
        .with(cors)
        .with(warp::trace::request())
        .recover(handle_rejection)
}

/// Turn warp rejections into the same JSON error shape handlers use.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query string".to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::BAD_REQUEST, "No data provided".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else if let Some(e) = err.find::<warp::cors::CorsForbidden>() {
        (StatusCode::FORBIDDEN, e.to_string())
    } else {
        warn!("unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "success": false, "error": message })),
        status,
    ))
}
