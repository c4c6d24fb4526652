pub mod error;
pub mod field_kinds;
pub mod replicated;
pub mod store;
