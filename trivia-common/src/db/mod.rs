//! Database access shared across the workspace

pub mod init;
pub mod models;

pub use init::init_database;
