//! Operation metadata and execution traits

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Metadata every command carries
pub trait Operation {
    /// The action, e.g. "move"
    fn verb(&self) -> &'static str;

    /// The target entity, e.g. "task"
    fn noun(&self) -> &'static str;

    /// One-line human description
    fn description(&self) -> &'static str;

    /// Canonical "verb noun" string used in activity logs
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Execute a command against a context
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}

/// Implement [`Operation`] for a command struct.
///
/// ```ignore
/// operation!(MoveTask, verb = "move", noun = "task", description = "Move a task");
/// ```
#[macro_export]
macro_rules! operation {
    ($ty:ty, verb = $verb:literal, noun = $noun:literal, description = $description:literal $(,)?) => {
        impl $crate::Operation for $ty {
            fn verb(&self) -> &'static str {
                $verb
            }

            fn noun(&self) -> &'static str {
                $noun
            }

            fn description(&self) -> &'static str {
                $description
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogEntry;

    struct Ping;

    operation!(Ping, verb = "ping", noun = "board", description = "No-op probe");

    struct Ctx;

    #[async_trait]
    impl Execute<Ctx, String> for Ping {
        async fn execute(&self, _ctx: &Ctx) -> ExecutionResult<Value, String> {
            ExecutionResult::Logged {
                value: Value::Bool(true),
                log_entry: LogEntry::new(self.op_string(), Value::Null, Value::Null, None, 0),
            }
        }
    }

    #[test]
    fn test_operation_metadata() {
        assert_eq!(Ping.verb(), "ping");
        assert_eq!(Ping.noun(), "board");
        assert_eq!(Ping.op_string(), "ping board");
        assert_eq!(Ping.description(), "No-op probe");
    }

    #[tokio::test]
    async fn test_execute_returns_logged_result() {
        let result = Ping.execute(&Ctx).await;
        assert!(result.should_log());
        assert_eq!(result.into_result().unwrap(), Value::Bool(true));
    }
}
