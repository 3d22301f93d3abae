//! Caller identity extracted from request headers.
//!
//! Headers are set by the gateway after it has authenticated the caller.
//! A request without `X-Customer-Code` runs as the anonymous (nil) principal,
//! which can only pass flows that need no role and no ownership.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use service_core::error::AppError;
use service_core::security::SecurityContext;
use uuid::Uuid;

pub const ROLE_NAMES_HEADER: &str = "X-Role-Names";
pub const CUSTOMER_CODE_HEADER: &str = "X-Customer-Code";
pub const SESSION_CODE_HEADER: &str = "X-Session-Code";

#[derive(Debug, Clone)]
pub struct Principal(pub SecurityContext);

impl Principal {
    pub fn context(&self) -> &SecurityContext {
        &self.0
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AppError> {
    headers
        .get(name)
        .map(|value| {
            value.to_str().map_err(|_| {
                AppError::BadRequest(anyhow::anyhow!("Header {} is not valid text", name))
            })
        })
        .transpose()
}

fn header_uuid(headers: &HeaderMap, name: &str) -> Result<Option<Uuid>, AppError> {
    header_str(headers, name)?
        .map(|raw| {
            Uuid::parse_str(raw.trim()).map_err(|_| {
                AppError::BadRequest(anyhow::anyhow!("Header {} must be a UUID", name))
            })
        })
        .transpose()
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let role_name_csv = header_str(&parts.headers, ROLE_NAMES_HEADER)?.unwrap_or_default();
        let principal_code = header_uuid(&parts.headers, CUSTOMER_CODE_HEADER)?.unwrap_or(Uuid::nil());

        let mut ctx = SecurityContext::new(role_name_csv, principal_code);
        if let Some(session_code) = header_uuid(&parts.headers, SESSION_CODE_HEADER)? {
            ctx = ctx.with_session_code(session_code);
        }

        tracing::debug!(
            principal_code = %ctx.principal_code,
            session_code = %ctx.session_code,
            "Principal extracted"
        );

        Ok(Principal(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<Principal, AppError> {
        let (mut parts, _) = request.into_parts();
        Principal::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_full_headers() {
        let customer = Uuid::new_v4();
        let session = Uuid::new_v4();
        let request = Request::builder()
            .header(ROLE_NAMES_HEADER, "User, Admin")
            .header(CUSTOMER_CODE_HEADER, customer.to_string())
            .header(SESSION_CODE_HEADER, session.to_string())
            .body(())
            .unwrap();

        let Principal(ctx) = extract(request).await.unwrap();
        assert_eq!(ctx.principal_code, customer);
        assert_eq!(ctx.session_code, session);
        assert!(ctx.has_role("Admin"));
    }

    #[tokio::test]
    async fn test_anonymous_defaults() {
        let request = Request::builder().body(()).unwrap();
        let Principal(ctx) = extract(request).await.unwrap();
        assert!(ctx.principal_code.is_nil());
        assert_eq!(ctx.role_name_csv, "");
    }

    #[tokio::test]
    async fn test_malformed_customer_code() {
        let request = Request::builder()
            .header(CUSTOMER_CODE_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        assert!(matches!(extract(request).await, Err(AppError::BadRequest(_))));
    }
}
