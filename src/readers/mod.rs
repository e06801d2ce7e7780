pub mod column_resolver;
pub mod table_reader;

pub use column_resolver::{column_letter, column_letter_index, resolve_column};
pub use table_reader::{SourceFormat, SourceTable, TableReader};
