//! Open a database session for the request before the handler runs.

use crate::error::AppError;
use crate::session::Session;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Extractor holding the request's [`Session`]. Released when the handler returns.
pub struct DbSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for DbSession {
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = state.sessions.open().await?;
        Ok(DbSession(session))
    }
}
