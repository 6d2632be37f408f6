//! Activity trail commands

mod list;

pub use list::ListActivity;
