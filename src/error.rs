use std::fmt::{Display, Formatter};

// The validator reports every failure the same way: a single error carrying a
// human-readable message for the first rule the module violates. There is no
// recovery and no partial acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Validation(String),
}

impl Error {
    pub fn message(&self) -> &str {
        match self {
            Error::Validation(s) => s,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for Error {}

#[inline(always)]
pub fn validation<T>(msg: impl Into<String>) -> Result<T, Error> {
    Err(Error::Validation(msg.into()))
}

// Control structure errors
pub const ELSE_OUTSIDE_IF: &str = "else only allowed in if context";
pub const END_IN_TRY: &str = "end may not occur in try context";
pub const IF_REQUIRES_IDENTITY_SIGNATURE: &str = "else-less if must have identity signature";
pub const CATCH_OUTSIDE_TRY: &str = "catch only allowed in try/catch context";
pub const RETHROW_TARGET_NOT_CATCH: &str = "rethrow must target a catch";
pub const BR_TABLE_ARITY_MISMATCH: &str =
    "br_table targets must all take the same number of parameters";
pub const STACK_NOT_EMPTY_AT_END: &str = "stack was not empty at end of control structure";
pub const END_OF_CODE_BEFORE_END_OF_FUNCTION: &str = "end of code reached before end of function";
pub const BLOCK_PARAMS_DISABLED: &str = "block has params, but \"multivalue\" extension is disabled";
pub const BLOCK_RESULTS_DISABLED: &str =
    "block has multiple results, but \"multivalue\" extension is disabled";
// Operand errors
pub const SELECT_OPERANDS_NOT_NUMERIC: &str = "non-typed select operands must be numeric types";
pub const SELECT_OPERAND_MISMATCH: &str =
    "non-typed select operands must have the same numeric type";
pub const ALIGNMENT_TOO_LARGE: &str = "load or store alignment greater than natural alignment";
pub const NO_DEFAULT_MEMORY: &str = "load or store in module without default memory";
pub const ATOMIC_NO_DEFAULT_MEMORY: &str = "atomic memory operator in module without default memory";
pub const ATOMIC_REQUIRES_SHARED_MEMORY: &str =
    "atomic memory operators require a memory with the shared flag";
pub const ATOMIC_ALIGNMENT_NOT_NATURAL: &str = "atomic memory operators must have natural alignment";
pub const INVALID_LANE_INDEX: &str = "invalid lane index";
pub const INVALID_SHUFFLE_LANE_INDEX: &str = "invalid shuffle lane index";
pub const CALL_INDIRECT_ELEM_TYPE: &str = "call_indirect requires a table element type of funcref";
pub const TABLE_COPY_ELEM_TYPE: &str =
    "source table element type must be a subtype of the destination table element type";
pub const GLOBAL_IS_IMMUTABLE: &str = "attempting to mutate immutable global";
// Declaration errors
pub const INITIALIZER_GLOBAL_NOT_IMPORTED: &str =
    "global variable initializer expression may only access imported globals";
pub const INITIALIZER_GLOBAL_MUTABLE: &str =
    "global variable initializer expression may only access immutable globals";
pub const INVALID_INITIALIZER: &str = "invalid initializer expression";
pub const MUTABLE_GLOBAL_IMPORT: &str = "mutable globals cannot be imported";
pub const MUTABLE_GLOBAL_EXPORT: &str = "mutable globals cannot be exported";
pub const DUPLICATE_EXPORT_NAME: &str = "duplicate export name";
pub const TOO_MANY_TABLES: &str = "too many tables";
pub const TOO_MANY_MEMORIES: &str = "too many memories";
pub const SHARED_TABLE_REQUIRES_MAX: &str = "shared tables must have a maximum size";
pub const SHARED_MEMORY_REQUIRES_MAX: &str = "shared memories must have a maximum size";
pub const SIZE_MIN_GREATER_THAN_MAX: &str = "size minimum must not be greater than maximum";
pub const SIZE_MAX_EXCEEDS_LIMIT: &str = "maximum size exceeds limit";
pub const START_FUNC_TYPE: &str = "start function must not have any parameters or results";
pub const ELEM_SEGMENT_TABLE_TYPE: &str = "active elem segments must be in funcref tables";
pub const REF_NULL_IN_ACTIVE_SEGMENT: &str = "ref.null is only allowed in passive segments";
pub const MULTIPLE_RESULTS_DISABLED: &str =
    "function/block has multiple return values, but \"multivalue\" extension is disabled";
pub const TOO_MANY_RETURN_VALUES: &str = "function has more return values than lgtm can support";
