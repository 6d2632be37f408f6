//! AuthenticateUser command
//!
//! Checks credentials and returns the user. Issuing a session is the caller's
//! job; this crate only owns the session store it will use.

use super::{find_by_email, normalize_email};
use crate::auth::verify_password;
use crate::context::KanbanContext;
use crate::error::{BoardError, Result};
use crate::processor::unlogged;
use crate::types::User;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::debug;

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Verify an email and password pair
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthenticateUser {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

operation!(AuthenticateUser, verb = "authenticate", noun = "user", description = "Check a user's credentials");

impl AuthenticateUser {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    async fn authenticate(&self, ctx: &KanbanContext) -> Result<User> {
        let email = normalize_email(&self.email);
        if email.is_empty() || self.password.is_empty() {
            return Err(BoardError::validation("email and password are required"));
        }

        let found = ctx
            .store()
            .read(move |conn| find_by_email(conn, &email))
            .await?;
        let Some((user, hash)) = found else {
            debug!("login for unknown email");
            return Err(BoardError::unauthorized(INVALID_CREDENTIALS));
        };

        let password = self.password.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;
        if !verified {
            debug!(user = %user.id, "login with wrong password");
            return Err(BoardError::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(user)
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for AuthenticateUser {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let result = async { Ok(serde_json::to_value(self.authenticate(ctx).await?)?) }.await;
        unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TEST_HASHING_COST;
    use crate::user::RegisterUser;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, KanbanContext) {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::open(temp.path().join("auth.db"))
            .await
            .unwrap()
            .with_hashing_cost(TEST_HASHING_COST);
        RegisterUser::new("grace@example.com", "Grace", "cobol")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_login_succeeds_case_insensitively() {
        let (_temp, ctx) = setup().await;
        let user = AuthenticateUser::new("Grace@Example.com", "cobol")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(user["name"], "Grace");
    }

    #[tokio::test]
    async fn test_bad_credentials_are_unauthorized() {
        let (_temp, ctx) = setup().await;
        for (email, password) in [("grace@example.com", "fortran"), ("nobody@example.com", "cobol")] {
            let err = AuthenticateUser::new(email, password)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap_err();
            assert!(matches!(err, BoardError::Unauthorized { .. }));
            assert_eq!(err.to_string(), "unauthorized: invalid email or password");
        }
    }
}
