pub mod aggregator;
pub mod codec;
pub mod fetcher;
pub mod page_index;
pub mod table;
