/*!
 * Database module for persistent catalog storage.
 *
 * This module provides SQLite-based persistence for:
 * - Resolved subtitle records (which file serves which media/language)
 * - Known series registrations
 * - Queue-tracking rows for in-flight translation jobs
 */

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::DatabaseConnection;
pub use repository::Repository;
