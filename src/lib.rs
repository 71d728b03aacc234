pub mod collections;
pub mod date_time;
pub mod showcase;
pub mod storage;

pub use date_time::StoredDateTime;
