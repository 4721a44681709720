use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::auth::accounts::{authenticate, register};
use crate::auth::{BearerToken, CurrentSession, Session};
use crate::errors::AppError;
use crate::models::profile::UserType;
use crate::routes::pages::Page;
use crate::state::AppState;
use crate::validation::{is_valid_email, normalize_email, MIN_PASSWORD_LEN};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub confirm_password: Option<String>,
    pub user_type: UserType,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// The portal the user signed in from; a mismatching account is refused.
    #[serde(default)]
    pub user_type: Option<UserType>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub session: Session,
    pub redirect: Page,
}

impl SignupRequest {
    fn validate(&self) -> Result<(), AppError> {
        if !is_valid_email(&self.email) {
            return Err(AppError::Validation("Invalid email address".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if let Some(confirm) = &self.confirm_password {
            if confirm != &self.password {
                return Err(AppError::Validation("Passwords do not match".to_string()));
            }
        }
        Ok(())
    }
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    req.validate()?;

    let email = normalize_email(&req.email);
    let profile = register(state.store.as_ref(), &email, req.password, req.user_type).await?;

    let session = Session {
        user_id: profile.id,
        email: profile.email,
        user_type: profile.user_type,
    };
    let token = state.sessions.create(&session).await?;

    let redirect = match session.user_type {
        UserType::Organization => Page::OrganizationLanding,
        UserType::Candidate => Page::CvUpload,
    };

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            session,
            redirect,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = normalize_email(&req.email);
    let profile = authenticate(state.store.as_ref(), &email, req.password, req.user_type).await?;

    let session = Session {
        user_id: profile.id,
        email: profile.email,
        user_type: profile.user_type,
    };
    let token = state.sessions.create(&session).await?;
    let redirect = session.user_type.home_page();

    Ok(Json(AuthResponse {
        token,
        session,
        redirect,
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, AppError> {
    state.sessions.revoke(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
pub async fn handle_get_session(
    CurrentSession(session): CurrentSession,
) -> Result<Json<Session>, AppError> {
    session.map(Json).ok_or(AppError::Unauthorized)
}
