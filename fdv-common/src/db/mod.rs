//! SQLite storage for saved pipeline responses

pub mod init;
pub mod queries;

pub use init::*;
pub use queries::*;
