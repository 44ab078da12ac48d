use crate::features::FeatureSpec;
use crate::operators::Operator;
use crate::types::*;

// ---------------- Import/Export related ----------------
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportRef {
    pub module: String,
    pub field: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExternKind {
    Func,
    Table,
    Memory,
    Global,
    ExceptionType,
}

// The ordered import list; the imported entries themselves live at the front
// of their per-kind index spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Import {
    pub module: String,
    pub field: String,
    pub kind: ExternKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Export {
    pub name: String,
    pub kind: ExternKind,
    pub index: u32,
}

// ---------------- Initializer Expressions ----------------
// The restricted constant expressions used for global initial values and
// active segment base offsets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InitializerExpression {
    I32Const(i32),
    I64Const(i64),
    F32Const(u32),
    F64Const(u64),
    V128Const([u8; 16]),
    GlobalGet(u32),
    RefNull,
    RefFunc(u32),
    Invalid,
}

// ---------------- Structures ----------------
// Each index space merges imports and definitions: imported entries come
// first and carry `import: Some(..)`; defined entries follow with `None`.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Function {
    pub type_index: u32,
    // Non-parameter locals only; parameters come from the signature.
    pub locals: Vec<ValType>,
    pub body: Vec<Operator>,
    pub import: Option<ImportRef>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    pub ty: TableType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub import: Option<ImportRef>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Memory {
    pub ty: MemoryType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub import: Option<ImportRef>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Global {
    pub ty: GlobalType,
    // Absent for imports; a defined global without an initializer fails
    // validation the same way an invalid initializer does.
    #[cfg_attr(feature = "serde", serde(default))]
    pub init: Option<InitializerExpression>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub import: Option<ImportRef>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExceptionTypeDef {
    pub ty: ExceptionType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub import: Option<ImportRef>,
}

// ---------------- Segments ----------------
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SegmentMode {
    // `index` names the table (element segments) or memory (data segments)
    // the segment is applied to at instantiation.
    Active {
        index: u32,
        offset: InitializerExpression,
    },
    Passive,
}

impl SegmentMode {
    #[inline(always)]
    pub fn is_active(&self) -> bool {
        matches!(self, SegmentMode::Active { .. })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Elem {
    RefNull,
    RefFunc(u32),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementSegment {
    pub mode: SegmentMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elems: Vec<Elem>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataSegment {
    pub mode: SegmentMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub data: Vec<u8>,
}

// ---------------- Module Structure ----------------
// The structural input to the validator: an already-decoded module. All
// cross-references are integer indices into the sibling vectors; the
// validator never mutates any of this.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Module {
    pub feature_spec: FeatureSpec,
    pub types: Vec<Signature>,
    pub imports: Vec<Import>,
    pub functions: Vec<Function>,
    pub tables: Vec<Table>,
    pub memories: Vec<Memory>,
    pub globals: Vec<Global>,
    pub exception_types: Vec<ExceptionTypeDef>,
    pub exports: Vec<Export>,
    pub start: Option<u32>,
    pub elem_segments: Vec<ElementSegment>,
    pub data_segments: Vec<DataSegment>,
}

impl Module {
    pub fn new(feature_spec: FeatureSpec) -> Self {
        Self {
            feature_spec,
            ..Self::default()
        }
    }
}
