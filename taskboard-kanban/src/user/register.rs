//! RegisterUser command

use super::{find_by_email, normalize_email, provision_workspace, Provisioning};
use crate::auth::hash_password;
use crate::context::KanbanContext;
use crate::error::{required, BoardError, Result};
use crate::processor::logged;
use crate::types::{User, UserId};
use chrono::Utc;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Create an account, then provision a starter workspace for it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterUser {
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
}

operation!(RegisterUser, verb = "register", noun = "user", description = "Create a user account");

impl RegisterUser {
    pub fn new(email: impl Into<String>, name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password: password.into(),
        }
    }

    async fn register(&self, ctx: &KanbanContext) -> Result<(User, Provisioning)> {
        let email = normalize_email(&self.email);
        if email.is_empty() || !email.contains('@') {
            return Err(BoardError::validation("a valid email is required"));
        }
        let name = required(&self.name, "name")?;
        if self.password.is_empty() {
            return Err(BoardError::validation("password is required"));
        }

        let password = self.password.clone();
        let cost = ctx.hashing_cost();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;

        let user = User {
            id: UserId::new(),
            email,
            name,
            created_at: Utc::now(),
        };
        let row = user.clone();
        ctx.store()
            .write(move |tx| {
                if find_by_email(tx, &row.email)?.is_some() {
                    return Err(BoardError::already_exists("user", row.email.as_str()));
                }
                tx.execute(
                    "INSERT INTO users (id, email, name, password_hash, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![row.id, row.email, row.name, password_hash, row.created_at],
                )?;
                Ok(())
            })
            .await?;

        let provisioning = provision_workspace(ctx, &user).await;
        Ok((user, provisioning))
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for RegisterUser {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let registered = self.register(ctx).await;
        let new_user = registered.as_ref().ok().map(|(user, _)| user.id.to_string());
        let result = registered.map(|(user, provisioning)| {
            json!({
                "user": user,
                "provisioning": provisioning,
            })
        });

        logged(self, start, result).attribute_to(new_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TEST_HASHING_COST;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, KanbanContext) {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::open(temp.path().join("users.db"))
            .await
            .unwrap()
            .with_hashing_cost(TEST_HASHING_COST);
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_register_provisions_and_hides_password() {
        let (_temp, ctx) = setup().await;
        let result = RegisterUser::new(" Ada@Example.com ", "Ada", "s3cret")
            .execute(&ctx)
            .await;

        let (value, log) = result.split();
        let value = value.unwrap();
        assert_eq!(value["user"]["email"], "ada@example.com");
        assert_eq!(value["provisioning"]["status"], "provisioned");
        assert!(value["user"].get("password_hash").is_none());

        let log = log.unwrap();
        assert_eq!(log.actor.as_deref(), value["user"]["id"].as_str());
        assert!(log.input.get("password").is_none());
        assert_eq!(log.input["name"], "Ada");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_already_exists() {
        let (_temp, ctx) = setup().await;
        RegisterUser::new("ada@example.com", "Ada", "pw")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let err = RegisterUser::new("ADA@example.com", "Other", "pw")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(matches!(err, BoardError::AlreadyExists { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_register_validates_fields() {
        let (_temp, ctx) = setup().await;
        for (email, name, password) in [
            ("", "Ada", "pw"),
            ("not-an-email", "Ada", "pw"),
            ("a@b.c", "  ", "pw"),
            ("a@b.c", "Ada", ""),
        ] {
            let result = RegisterUser::new(email, name, password)
                .execute(&ctx)
                .await
                .into_result();
            assert!(
                matches!(result, Err(BoardError::Validation { .. })),
                "{email:?} {name:?} {password:?}"
            );
        }
    }
}
