pub mod error;
pub mod types;
pub mod value;

pub use error::{MetaError, Result};
pub use types::{Command, CommandType, DbField, Field};
pub use value::{DataType, Value};
