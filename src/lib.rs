#![deny(unsafe_code)]

pub mod error;
pub mod features;
pub mod module;
pub mod operators;
pub mod types;

mod func_validator;
mod module_validator;

pub use error::{validation, Error};
pub use features::{Feature, FeatureSpec};
pub use func_validator::{validate_function_body, CodeValidator};
pub use module::*;
pub use module_validator::{
    validate_data_segments, validate_elem_segments, validate_exception_type_defs, validate_exports,
    validate_function_declarations, validate_global_defs, validate_imports, validate_initializer,
    validate_memory_defs, validate_module, validate_start_function, validate_table_defs,
    validate_types,
};
pub use operators::{BlockSig, MemImm, Operator};
pub use types::*;

// Debug macro that only prints when validator_debug feature is enabled
#[cfg(feature = "validator_debug")]
macro_rules! debug_println {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

#[cfg(not(feature = "validator_debug"))]
macro_rules! debug_println {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_println;
