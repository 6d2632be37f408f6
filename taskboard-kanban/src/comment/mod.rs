//! Comment operations

mod add;
mod list;

pub use add::AddComment;
pub use list::ListComments;
