use std::sync::Arc;

use axum::{
    extract::State,
    http::{self, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, model::CurrentUser, token::TokenIssuer, AppState};

/// Resolve the caller from an `Authorization: Bearer <token>` header.
///
/// Every failure collapses into `Unauthenticated`; the underlying reason is
/// only logged.
pub fn resolve_identity(
    headers: &HeaderMap,
    tokens: &TokenIssuer,
) -> Result<CurrentUser, AppError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AppError::Unauthenticated)?;

    let token = match auth_header.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            token.trim()
        }
        _ => return Err(AppError::Unauthenticated),
    };

    tokens.verify(token).map_err(|err| {
        tracing::debug!("rejected bearer token: {}", err);
        AppError::Unauthenticated
    })
}

pub async fn mw_require_auth<B>(
    State(data): State<Arc<AppState>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let current_user = resolve_identity(request.headers(), &data.tokens)?;

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
