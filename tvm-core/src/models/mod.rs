mod key;
mod tvm_values;
mod tvm_variable;

pub use key::{KeyId, Operator, parse_key_sequence};
pub use tvm_values::TvmValues;
pub use tvm_variable::TvmVariable;
