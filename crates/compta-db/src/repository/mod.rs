//! # Repository Module
//!
//! ```text
//! Database
//!   ├── accounts()   → AccountRepository    (accounts table)
//!   └── operations() → OperationRepository  (operations table)
//! ```
//!
//! Repositories are thin wrappers over a cloned `SqlitePool`; the SQL for
//! each table lives in one place.

pub mod account;
pub mod operation;
