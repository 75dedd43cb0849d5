//! Database module for bookbits
//!
//! Read-only access to the Apple Books annotation and library databases.

mod schema;
mod queries;

pub use schema::Store;
pub use queries::core_data_timestamp;
