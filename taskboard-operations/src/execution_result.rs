//! Command outcomes and the activity entry that goes with them

use crate::LogEntry;

/// Outcome of a command.
///
/// Mutations come back `Logged` and their entry lands in the activity trail.
/// Reads come back `Unlogged`. A rejected mutation is `Failed` and may still
/// carry an entry describing the input that was refused.
#[derive(Debug)]
pub enum ExecutionResult<T, E> {
    Logged { value: T, log_entry: LogEntry },
    Unlogged { value: T },
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// The activity entry, if this outcome produces one
    pub fn log_entry(&self) -> Option<&LogEntry> {
        match self {
            Self::Logged { log_entry, .. } => Some(log_entry),
            Self::Failed { log_entry, .. } => log_entry.as_ref(),
            Self::Unlogged { .. } => None,
        }
    }

    pub fn log_entry_mut(&mut self) -> Option<&mut LogEntry> {
        match self {
            Self::Logged { log_entry, .. } => Some(log_entry),
            Self::Failed { log_entry, .. } => log_entry.as_mut(),
            Self::Unlogged { .. } => None,
        }
    }

    /// Credit the entry to `actor` unless it already names one
    pub fn attribute_to(mut self, actor: Option<impl Into<String>>) -> Self {
        if let (Some(entry), Some(actor)) = (self.log_entry_mut(), actor) {
            if entry.actor.is_none() {
                entry.actor = Some(actor.into());
            }
        }
        self
    }

    /// Whether the activity trail gets an entry
    pub fn should_log(&self) -> bool {
        self.log_entry().is_some()
    }

    /// Separate the caller's result from the entry to record
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Drop the entry and keep the result
    pub fn into_result(self) -> Result<T, E> {
        self.split().0
    }
}
