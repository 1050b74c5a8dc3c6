//! Session cookie handling and the admin extractor.

use actix_web::cookie::{Cookie, SameSite, time::OffsetDateTime};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use folio_core::domain::Session;
use folio_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_token";

/// Cookie handed out on login and registration. Expires with the session.
pub fn session_cookie(session: &Session, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, session.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .finish();

    if let Ok(expires) = OffsetDateTime::from_unix_timestamp(session.expires_at.timestamp()) {
        cookie.set_expires(expires);
    }
    cookie
}

/// Token from the request's session cookie, if any.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Proof that the request carries a live session.
///
/// Taking this as a handler argument gates the handler:
/// ```ignore
/// async fn create_post(admin: AdminSession, ...) -> AppResult<HttpResponse>
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub user_id: Uuid,
}

impl FromRequest for AdminSession {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = session_token(req);

        Box::pin(async move {
            let state = state.ok_or_else(|| {
                AppError::Internal("AppState not found in app data".to_string())
            })?;
            let token =
                token.ok_or_else(|| AppError::Unauthorized(AuthError::MissingSession.to_string()))?;

            match state.auth.session_user(&token).await? {
                Some(user_id) => Ok(AdminSession { user_id }),
                None => Err(AppError::Unauthorized(AuthError::SessionExpired.to_string())),
            }
        })
    }
}
