//! SQLite persistence for the catalog.
//!
//! `pool` opens the database and applies migrations, `models` holds the row
//! types, and `crud` has one async function per query the handlers need.
//!
pub(crate) mod crud;
pub(crate) mod models;
pub(crate) mod pool;
