//! Authentication handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use folio_core::domain::{Session, User};
use folio_core::error::DomainError;
use folio_shared::dto::{Credentials, SessionResponse, SessionStatus, UserResponse};

use crate::middleware::auth::{session_cookie, session_token};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn session_response(user: &User, session: &Session) -> SessionResponse {
    SessionResponse {
        user: UserResponse {
            id: user.id.to_string(),
            username: user.username.clone(),
        },
        expires_at: session.expires_at.to_rfc3339(),
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> AppResult<HttpResponse> {
    if !state.registration_enabled {
        return Err(AppError::Forbidden("registration is disabled".to_string()));
    }

    let req = body.into_inner();
    let user = state.auth.register_user(&req.username, &req.password).await?;
    let session = state.auth.issue_session(user.id).await?;

    tracing::info!(user_id = %user.id, "Account registered");

    Ok(HttpResponse::Created()
        .cookie(session_cookie(&session, state.cookie_secure))
        .json(session_response(&user, &session)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Unknown users get the same answer as wrong passwords.
    let (user, session) = state
        .auth
        .login(&req.username, &req.password)
        .await
        .map_err(|err| match err {
            DomainError::NotFound { .. } => AppError::from(DomainError::InvalidCredentials),
            other => other.into(),
        })?;

    tracing::debug!(user_id = %user.id, "Session issued");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&session, state.cookie_secure))
        .json(session_response(&user, &session)))
}

/// GET /api/auth/session
pub async fn session(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let authenticated = match session_token(&req) {
        Some(token) => state.auth.validate_session(&token).await?,
        None => false,
    };

    Ok(HttpResponse::Ok().json(SessionStatus { authenticated }))
}
