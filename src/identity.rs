use base64::{engine::general_purpose::STANDARD, Engine as _};
use warp::http::HeaderMap;

/// Headers an SSO proxy may put the signed-in user in, checked in order.
pub const SSO_HEADERS: &[&str] = &[
    "X-Forwarded-User",
    "X-REMOTE-USER",
    "REMOTE_USER",
    "X-Auth-Email",
    "X-User-Email",
    "X-Goog-Authenticated-User-Email",
    "OIDC_CLAIM_email",
];

const GOOGLE_ACCOUNT_PREFIX: &str = "accounts.google.com:";

/// Find the user from SSO headers and rewrite it onto `domain`.
/// Service-account identities are skipped.
pub fn detect_email(headers: &HeaderMap, domain: &str) -> Option<String> {
    SSO_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|v| v.to_str().ok())
        .map(str::trim)
        .find(|v| !v.is_empty() && !v.contains("gserviceaccount.com"))
        .map(|v| {
            let v = v.strip_prefix(GOOGLE_ACCOUNT_PREFIX).unwrap_or(v);
            let local = v.split('@').next().unwrap_or(v);
            format!("{}@{}", local, domain)
        })
}

/// Decode a base64 token carrying an email address.
pub fn decode_token(token: &str) -> Option<String> {
    let bytes = STANDARD.decode(token.trim()).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    text.contains('@').then_some(text)
}
