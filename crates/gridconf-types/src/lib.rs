pub mod builtins;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod table_types;

pub use builtins::{
    BoolType, DurationType, DurationUnit, FloatType, IntType, StringType, parse_float_literal,
    parse_int_literal,
};
pub use descriptor::{ArrayType, TypeDescriptor};
pub use error::TypeError;
pub use registry::TypeRegistry;
pub use table_types::{ConstantRefType, DatabaseRefType};
