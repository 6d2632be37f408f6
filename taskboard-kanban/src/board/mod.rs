//! Board commands

mod add;
mod get;

pub use add::AddBoard;
pub use get::GetBoard;

pub(crate) use add::insert_board;
