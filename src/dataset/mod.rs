pub mod record;
pub mod sink;
pub mod source;
pub mod table;

pub use record::{PreparedRecord, RawRecord, SalesRecord};
pub use table::Table;
