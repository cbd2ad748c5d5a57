//! # compta-db: Database Layer for Compta
//!
//! SQLite storage for accounts and operations, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Compta Data Flow                                 │
//! │                                                                         │
//! │  Caller (seed binary, front ends)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    compta-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ AccountRepo    │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ OperationRepo  │    │ _schema.sql  │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (COMPTA_DB_PATH or the caller's default)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only raw operation inputs are stored. Derived amounts come from
//! [`compta_core::AmountCalculator`] every time they are read.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use compta_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env("./compta.db")).await?;
//! for op in db.operations().list_for_account("BANK").await? {
//!     println!("{}", op.gross_amount()?);
//! }
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DB_PATH_ENV};

pub use repository::account::AccountRepository;
pub use repository::operation::OperationRepository;
