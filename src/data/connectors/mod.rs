mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::{ColumnMap, OhlcColumn};
pub use validator::DataValidator;
