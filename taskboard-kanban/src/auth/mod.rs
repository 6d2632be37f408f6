//! Credentials and sessions

mod password;
mod session;

pub use password::{hash_password, verify_password, HashingCost};
pub use session::{random_token, MemorySessionStore, Session, SessionStore, DEFAULT_SESSION_TTL_SECS};
