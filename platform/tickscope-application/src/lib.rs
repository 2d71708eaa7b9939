pub mod config;
pub mod meta;
pub mod querying;
pub mod reporting;
