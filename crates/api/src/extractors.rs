//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

use reclaim_common::AppError;
use reclaim_core::Identity;
use reclaim_db::entities::user;

use crate::state::AppState;

const USER_ID_HEADER: &str = "x-user-id";
const USER_EMAIL_HEADER: &str = "x-user-email";
const USER_NAME_HEADER: &str = "x-user-name";

/// The calling user, resolved from the gateway identity headers.
///
/// The gateway authenticates and forwards `X-User-Id`, `X-User-Email`
/// and `X-User-Name`. Resolution upserts the user row, so handlers
/// always see a persisted user. Missing or blank headers reject with
/// `Unauthorized`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = identity_from_headers(&parts.headers)?;
        let user = state.user_service.ensure_user(&identity).await?;
        Ok(Self(user))
    }
}

fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, AppError> {
    Ok(Identity {
        id: header_value(headers, USER_ID_HEADER)?,
        email: header_value(headers, USER_EMAIL_HEADER)?,
        name: header_value(headers, USER_NAME_HEADER)?,
    })
}

fn header_value(headers: &HeaderMap, name: &str) -> Result<String, AppError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| AppError::Unauthorized(format!("Missing identity header {name}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identity_requires_all_three_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("u1"));
        headers.insert(USER_EMAIL_HEADER, HeaderValue::from_static("u1@campus.edu"));
        assert!(identity_from_headers(&headers).is_err());

        headers.insert(USER_NAME_HEADER, HeaderValue::from_static("Avery Chen"));
        let identity = identity_from_headers(&headers).unwrap();
        assert_eq!(identity.id, "u1");
        assert_eq!(identity.email, "u1@campus.edu");
        assert_eq!(identity.name, "Avery Chen");
    }

    #[test]
    fn test_blank_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("   "));
        assert!(header_value(&headers, USER_ID_HEADER).is_err());
    }

    #[test]
    fn test_header_whitespace_is_trimmed() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static(" u1 "));
        assert_eq!(header_value(&headers, USER_ID_HEADER).unwrap(), "u1");
    }
}
