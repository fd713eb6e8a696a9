//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod bot;
pub mod conversation;
pub mod counter;
pub mod ledger;
pub mod memory;
pub mod pool;
