//! Registration, login and session checks.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::domain::{Session, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, SessionRepository, TokenGenerator, UserRepository};

/// Default session lifetime in hours.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenGenerator>,
    session_ttl: TimeDelta,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenGenerator>,
    ) -> Self {
        Self {
            users,
            sessions,
            passwords,
            tokens,
            session_ttl: TimeDelta::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }

    pub fn with_session_ttl(mut self, ttl: TimeDelta) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn session_ttl(&self) -> TimeDelta {
        self.session_ttl
    }

    /// Create a user with a hashed password. Usernames are unique.
    pub async fn register_user(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "username and password are required".to_string(),
            ));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "username '{username}' is already registered"
            )));
        }

        let hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        self.users
            .insert(username, &hash)
            .await
            .map_err(|err| match err {
                RepoError::Constraint(_) => DomainError::Duplicate(format!(
                    "username '{username}' is already registered"
                )),
                other => other.into(),
            })
    }

    /// Check a username/password pair. The returned user still carries its
    /// password hash; callers must not pass it downstream.
    pub async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        let username = username.trim();
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            return Err(DomainError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Start a new session for `user_id`.
    pub async fn issue_session(&self, user_id: Uuid) -> Result<Session, DomainError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.session_ttl)
            .ok_or_else(|| {
                DomainError::Internal(format!("session ttl {} out of range", self.session_ttl))
            })?;
        let session = Session::new(self.tokens.generate(), user_id, expires_at);
        self.sessions.insert(session.clone()).await?;
        Ok(session)
    }

    /// Authenticate and open a session in one step.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, Session), DomainError> {
        let user = self.authenticate_user(username, password).await?;
        let session = self.issue_session(user.id).await?;
        Ok((user, session))
    }

    pub async fn validate_session(&self, token: &str) -> Result<bool, DomainError> {
        self.validate_session_at(token, Utc::now()).await
    }

    /// Session check against an explicit clock. Does not extend the session.
    pub async fn validate_session_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        Ok(self.session_user_at(token, now).await?.is_some())
    }

    /// Owning user of a live session, if any.
    pub async fn session_user(&self, token: &str) -> Result<Option<Uuid>, DomainError> {
        self.session_user_at(token, Utc::now()).await
    }

    async fn session_user_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, DomainError> {
        if token.is_empty() {
            return Ok(None);
        }
        let session = self.sessions.find_by_token(token).await?;
        Ok(session
            .filter(|s| s.is_valid_at(now))
            .map(|s| s.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::AuthError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Stand-in "hash": reversible on purpose so tests can see it is not plaintext.
    struct ReversedPasswords;

    impl PasswordService for ReversedPasswords {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("rev:{}", password.chars().rev().collect::<String>()))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            Ok(self.hash(password)? == hash)
        }
    }

    struct FixedToken;

    impl TokenGenerator for FixedToken {
        fn generate(&self) -> String {
            "token-1".to_string()
        }
    }

    #[derive(Default)]
    struct Users(Mutex<Vec<User>>);

    #[async_trait]
    impl UserRepository for Users {
        async fn insert(&self, username: &str, password_hash: &str) -> Result<User, RepoError> {
            let user = User::new(Uuid::new_v4(), username.into(), password_hash.into());
            self.0.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }
    }

    #[derive(Default)]
    struct Sessions(Mutex<Vec<Session>>);

    #[async_trait]
    impl SessionRepository for Sessions {
        async fn insert(&self, session: Session) -> Result<(), RepoError> {
            self.0.lock().unwrap().push(session);
            Ok(())
        }

        async fn find_by_token(&self, token: &str) -> Result<Option<Session>, RepoError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.token == token)
                .cloned())
        }
    }

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(Users::default()),
            Arc::new(Sessions::default()),
            Arc::new(ReversedPasswords),
            Arc::new(FixedToken),
        )
    }

    #[tokio::test]
    async fn test_register_requires_both_fields() {
        let svc = service();
        assert!(matches!(
            svc.register_user("", "pw").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            svc.register_user("admin", "").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username() {
        let svc = service();
        svc.register_user("admin", "pw").await.unwrap();
        let err = svc.register_user("admin", "other").await.unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_authenticate_outcomes() {
        let svc = service();
        svc.register_user("admin", "hunter2").await.unwrap();

        let user = svc.authenticate_user("admin", "hunter2").await.unwrap();
        assert_ne!(user.password_hash, "hunter2");

        assert!(matches!(
            svc.authenticate_user("admin", "wrong").await,
            Err(DomainError::InvalidCredentials)
        ));
        assert!(matches!(
            svc.authenticate_user("nobody", "hunter2").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_session_lifetime() {
        let svc = service().with_session_ttl(TimeDelta::hours(1));
        let session = svc.issue_session(Uuid::new_v4()).await.unwrap();

        let just_before = session.expires_at - TimeDelta::seconds(1);
        let just_after = session.expires_at + TimeDelta::seconds(1);

        assert!(svc.validate_session_at(&session.token, just_before).await.unwrap());
        assert!(!svc.validate_session_at(&session.token, just_after).await.unwrap());
        assert!(!svc.validate_session("unknown").await.unwrap());
    }

    #[tokio::test]
    async fn test_session_ttl_past_calendar_range_is_an_error() {
        let sessions = Arc::new(Sessions::default());
        let svc = AuthService::new(
            Arc::new(Users::default()),
            sessions.clone(),
            Arc::new(ReversedPasswords),
            Arc::new(FixedToken),
        )
        .with_session_ttl(TimeDelta::hours(3_000_000_000));

        let result = svc.issue_session(Uuid::new_v4()).await;

        assert!(matches!(result, Err(DomainError::Internal(_))));
        assert!(sessions.0.lock().unwrap().is_empty());
    }
}
