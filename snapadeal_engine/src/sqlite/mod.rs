//! SQLite backend for the Snapadeal engine.

mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
