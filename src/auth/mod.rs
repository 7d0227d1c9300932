//! Authentication state for the ClassHub client.
//!
//! This module provides `SessionStore`, the single holder of the bearer
//! credential. The store is optimistic: it only tracks presence, and the
//! request pipeline tears the session down when the backend rejects it.

pub mod session;

pub use session::{SessionStore, TOKEN_KEY};
