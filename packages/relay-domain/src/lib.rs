pub mod fallback;
pub mod query;
pub mod records;
pub mod session;
