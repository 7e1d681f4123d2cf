//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{
    AuthServiceError, IssuedSession, NewSession, NewUser, UserRecord, UserUuid,
    generate_session_token, hash_session_token, repository::PgAuthRepository,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Registers a marketplace account.
    ///
    /// # Errors
    ///
    /// Returns an error when the email is already taken or the insert fails.
    pub async fn create_user(&self, user: NewUser) -> Result<UserRecord, AuthServiceError> {
        self.repository
            .create_user(&user)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Issues a new session for the given user.
    ///
    /// The raw token is returned once and never stored.
    ///
    /// # Errors
    ///
    /// Returns an error if database insertion fails.
    pub async fn issue_session(
        &self,
        user_uuid: Uuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedSession, AuthServiceError> {
        let token = generate_session_token();

        let metadata = self
            .repository
            .create_session(&NewSession {
                uuid: Uuid::now_v7(),
                user_uuid: user_uuid.into(),
                token_hash: hash_session_token(&token),
                expires_at,
            })
            .await
            .map_err(AuthServiceError::from)?;

        Ok(IssuedSession { token, metadata })
    }

    /// Revokes a session by UUID. Returns `true` if the session was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_session(&self, session_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_session(session_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let session = self
            .repository
            .find_active_session_by_token_hash(&hash_session_token(bearer_token))
            .await
            .map_err(AuthServiceError::from)?
            .ok_or(AuthServiceError::NotFound)?;

        // Best-effort metadata update; auth success should not depend on this write.
        let _touch_result = self.repository.touch_session_last_used(session.uuid).await;

        Ok(session.user_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn issued_session_token_authenticates_to_its_user() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let user = ctx.create_user("login@example.com").await?;
        let issued = svc.issue_session(user.into_uuid(), None).await?;

        let authenticated = svc.authenticate_bearer(&issued.token).await?;

        assert_eq!(authenticated, user);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_token_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let result = svc.authenticate_bearer("fr_not_a_real_token").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoked_session_no_longer_authenticates() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let user = ctx.create_user("revoked@example.com").await?;
        let issued = svc.issue_session(user.into_uuid(), None).await?;

        assert!(svc.revoke_session(issued.metadata.uuid).await?);

        let result = svc.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoking_twice_reports_inactive() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let user = ctx.create_user("revoke-twice@example.com").await?;
        let issued = svc.issue_session(user.into_uuid(), None).await?;

        assert!(svc.revoke_session(issued.metadata.uuid).await?);
        assert!(!svc.revoke_session(issued.metadata.uuid).await?);

        Ok(())
    }

    #[tokio::test]
    async fn expired_session_no_longer_authenticates() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let user = ctx.create_user("expired@example.com").await?;
        let expired_at = Timestamp::now() - jiff::SignedDuration::from_secs(60);
        let issued = svc.issue_session(user.into_uuid(), Some(expired_at)).await?;

        let result = svc.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        ctx.create_user("taken@example.com").await?;

        let result = svc
            .create_user(NewUser {
                uuid: UserUuid::new(),
                email: "taken@example.com".to_string(),
                name: "Second".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }
}
