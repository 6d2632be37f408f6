//! Board-level types: Workspace, Board, List and the nested board view

use super::ids::{BoardId, ListId, TaskId, UserId, WorkspaceId};
use super::task::TaskStatus;
use serde::{Deserialize, Serialize};

/// A workspace groups boards and the users allowed to touch them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Role a user holds in a workspace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

/// A board owns an ordered set of lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub workspace_id: WorkspaceId,
    pub owner_id: UserId,
}

/// A list is a column on a board and owns an ordered set of tasks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct List {
    pub id: ListId,
    pub board_id: BoardId,
    pub name: String,
    pub position: i64,
}

/// Names of the lists every provisioned board starts with
pub const DEFAULT_LIST_NAMES: [&str; 3] = ["To Do", "In Progress", "Done"];

/// Which nested collections a board read should include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardInclude {
    /// Lists with their tasks
    #[default]
    ListsAndTasks,
    /// Lists only, each with an empty task array
    Lists,
    /// Board header only
    Nothing,
}

impl BoardInclude {
    /// Parse the `include` selector. Empty means everything; anything
    /// unrecognised means the board header alone.
    pub fn parse(selector: &str) -> Self {
        match selector {
            "" | "lists,tasks" => Self::ListsAndTasks,
            "lists" => Self::Lists,
            _ => Self::Nothing,
        }
    }

    pub fn wants_lists(&self) -> bool {
        !matches!(self, Self::Nothing)
    }

    pub fn wants_tasks(&self) -> bool {
        matches!(self, Self::ListsAndTasks)
    }
}

/// Board payload returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardView {
    pub id: BoardId,
    pub name: String,
    pub lists: Vec<ListView>,
}

/// List payload nested in a [`BoardView`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListView {
    pub id: ListId,
    pub name: String,
    pub position: i64,
    pub tasks: Vec<TaskView>,
}

/// Task payload nested in a [`ListView`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskView {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub position: i64,
    pub assignees: Vec<UserId>,
    pub comment_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_selector() {
        assert_eq!(BoardInclude::parse(""), BoardInclude::ListsAndTasks);
        assert_eq!(BoardInclude::parse("lists,tasks"), BoardInclude::ListsAndTasks);
        assert_eq!(BoardInclude::parse("lists"), BoardInclude::Lists);
        assert_eq!(BoardInclude::parse("tasks"), BoardInclude::Nothing);

        assert!(BoardInclude::Lists.wants_lists());
        assert!(!BoardInclude::Lists.wants_tasks());
        assert!(!BoardInclude::Nothing.wants_lists());
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(serde_json::to_value(MemberRole::Owner).unwrap(), "owner");
        assert_eq!(MemberRole::Member.as_str(), "member");
    }
}
