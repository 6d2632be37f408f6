//! List commands
//!
//! Lists are the ordered members of a board. Creation appends, deletion
//! compacts, and every other position change goes through the orchestrator.

mod add;
mod delete;
mod mv;
mod reorder;
mod update;

pub use add::AddList;
pub use delete::DeleteList;
pub use mv::MoveList;
pub use reorder::ReorderLists;
pub use update::UpdateList;

pub(crate) use add::insert_list;
