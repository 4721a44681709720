use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::auth::Session;
use crate::errors::AppError;
use crate::models::profile::UserType;
use crate::state::AppState;

/// The raw bearer token of the request.
pub struct BearerToken(pub String);

/// The session behind the request's bearer token, if any.
///
/// Resolved against Redis at most once per request; later extractors reuse
/// the cached value from the request extensions.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

/// A session that must belong to an organization.
pub struct OrganizationSession(pub Session);

/// A session that must belong to a candidate.
pub struct CandidateSession(pub Session);

impl CurrentSession {
    /// Missing session → redirect to the role's login page; wrong role → 403.
    pub fn require(self, role: UserType) -> Result<Session, AppError> {
        self.0
            .ok_or(AppError::LoginRequired(role.login_page()))?
            .require_role(role)
    }
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

#[async_trait]
impl FromRequestParts<AppState> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_token(&parts.headers)
            .map(BearerToken)
            .ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<CurrentSession>() {
            return Ok(cached.clone());
        }

        let session = match bearer_token(&parts.headers) {
            Some(token) => state.sessions.resolve(&token).await?,
            None => None,
        };

        let current = CurrentSession(session);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OrganizationSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentSession::from_request_parts(parts, state).await?;
        current.require(UserType::Organization).map(OrganizationSession)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CandidateSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentSession::from_request_parts(parts, state).await?;
        current.require(UserType::Candidate).map(CandidateSession)
    }
}
