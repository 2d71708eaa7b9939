pub mod history;
pub mod page_source;
