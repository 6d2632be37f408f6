//! Operation processor that records activity
//!
//! Runs a command, attributes its log entry to the acting user and appends it to
//! the activity table. Recording is best-effort: a failed append is logged and
//! never turns a successful command into a failure.

use crate::context::KanbanContext;
use crate::error::{BoardError, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;
use taskboard_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};
use tracing::warn;

#[derive(Debug, Default, Clone, Copy)]
pub struct KanbanOperationProcessor;

impl KanbanOperationProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OperationProcessor<KanbanContext, BoardError> for KanbanOperationProcessor {
    async fn process<O>(&self, operation: &O, ctx: &KanbanContext) -> Result<Value>
    where
        O: Execute<KanbanContext, BoardError>,
    {
        let (result, log_entry) = operation
            .execute(ctx)
            .await
            .attribute_to(ctx.actor_id().map(|id| id.to_string()))
            .split();

        if let Some(entry) = log_entry {
            if let Err(err) = ctx.append_activity(&entry).await {
                warn!(op = %entry.op, error = %err, "failed to record activity");
            }
        }

        result
    }
}

/// Wrap a mutation's outcome with a log entry describing it
pub(crate) fn logged<O>(op: &O, start: Instant, result: Result<Value>) -> ExecutionResult<Value, BoardError>
where
    O: Operation + Serialize,
{
    let input = serde_json::to_value(op).unwrap_or(Value::Null);
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(value) => ExecutionResult::Logged {
            value: value.clone(),
            log_entry: LogEntry::new(op.op_string(), input, value, None, duration_ms),
        },
        Err(error) => {
            let output = json!({ "error": error.to_string() });
            ExecutionResult::Failed {
                error,
                log_entry: Some(LogEntry::new(op.op_string(), input, output, None, duration_ms)),
            }
        }
    }
}

/// Wrap a query's outcome; reads are never recorded
pub(crate) fn unlogged(result: Result<Value>) -> ExecutionResult<Value, BoardError> {
    match result {
        Ok(value) => ExecutionResult::Unlogged { value },
        Err(error) => ExecutionResult::Failed {
            error,
            log_entry: None,
        },
    }
}
