use std::fmt::{Display, Formatter};

use crate::error::*;
use crate::features::FeatureSpec;

// ---------------- Value Types ----------------
// `Any` and `None` are validator-internal: `Any` is the top type used by
// polymorphic operand constraints (drop, untyped select), `None` is the bottom
// type produced by pops in unreachable code. Neither is admitted as a declared
// type.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ValType {
    I32 = 0x7f,
    I64 = 0x7e,
    F32 = 0x7d,
    F64 = 0x7c,
    V128 = 0x7b,
    FuncRef = 0x70,
    AnyRef = 0x6f,
    NullRef = 0x6e,
    Any = 0xff,
    None = 0xfe,
}

impl ValType {
    #[inline(always)]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ValType::I32 | ValType::I64 | ValType::F32 | ValType::F64 | ValType::V128
        )
    }

    #[inline(always)]
    pub fn is_reference(self) -> bool {
        matches!(self, ValType::FuncRef | ValType::AnyRef | ValType::NullRef)
    }

    pub fn check_feature(self, features: &FeatureSpec) -> Result<(), Error> {
        let enabled = match self {
            ValType::I32 | ValType::I64 | ValType::F32 | ValType::F64 => features.mvp,
            ValType::V128 => features.simd,
            ValType::FuncRef | ValType::AnyRef => features.reference_types,
            ValType::NullRef | ValType::Any | ValType::None => false,
        };
        if !enabled {
            return validation(format!("invalid value type ({})", self));
        }
        Ok(())
    }
}

impl Display for ValType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ValType::I32 => "i32",
            ValType::I64 => "i64",
            ValType::F32 => "f32",
            ValType::F64 => "f64",
            ValType::V128 => "v128",
            ValType::FuncRef => "funcref",
            ValType::AnyRef => "anyref",
            ValType::NullRef => "nullref",
            ValType::Any => "any",
            ValType::None => "none",
        })
    }
}

// Reflexive; None is a subtype of everything, everything is a subtype of Any,
// and nullref <: funcref <: anyref.
#[inline]
pub fn is_subtype(sub: ValType, sup: ValType) -> bool {
    if sub == sup || sub == ValType::None || sup == ValType::Any {
        return true;
    }
    match (sub, sup) {
        (ValType::NullRef, ValType::FuncRef)
        | (ValType::NullRef, ValType::AnyRef)
        | (ValType::FuncRef, ValType::AnyRef) => true,
        _ => false,
    }
}

// ---------------- Reference Types ----------------
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RefType {
    FuncRef = 0x70,
    AnyRef = 0x6f,
    NullRef = 0x6e,
}

impl RefType {
    #[inline(always)]
    pub fn as_val_type(self) -> ValType {
        match self {
            RefType::FuncRef => ValType::FuncRef,
            RefType::AnyRef => ValType::AnyRef,
            RefType::NullRef => ValType::NullRef,
        }
    }

    // funcref tables are MVP; anyref element types came with reference-types.
    // nullref is never a declarable element type.
    pub fn check_feature(self, features: &FeatureSpec) -> Result<(), Error> {
        let enabled = match self {
            RefType::FuncRef => features.mvp,
            RefType::AnyRef => features.reference_types,
            RefType::NullRef => false,
        };
        if !enabled {
            return validation(format!("invalid reference type ({})", self.as_val_type()));
        }
        Ok(())
    }
}

// Table element types relate only trivially: an element type is a subtype of
// itself, and nullref of everything. The funcref <: anyref edge belongs to
// the operand lattice above, not to element-type constraints.
#[inline]
pub fn is_elem_subtype(sub: RefType, sup: RefType) -> bool {
    sub == sup || sub == RefType::NullRef
}

// ---------------- Function Types ----------------
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Signature {
    pub params: Vec<ValType>,
    pub results: Vec<ValType>,
}

impl Signature {
    pub fn new(params: Vec<ValType>, results: Vec<ValType>) -> Self {
        Self { params, results }
    }
}

// Results of a type used as a *function* signature are bounded; the raw types
// table is not, because block types live there too.
pub const MAX_RETURN_VALUES: usize = 16;

// ---------------- Size Constraints ----------------
pub const UNBOUNDED: u64 = u64::MAX;
pub const MAX_MEMORY_PAGES: u64 = 65536;
pub const MAX_TABLE_ELEMS: u64 = u32::MAX as u64;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SizeConstraints {
    pub min: u64,
    // UNBOUNDED means no declared maximum; the implicit ceiling still applies.
    pub max: u64,
}

impl Default for SizeConstraints {
    fn default() -> Self {
        Self { min: 0, max: UNBOUNDED }
    }
}

impl SizeConstraints {
    pub fn at_least(min: u64) -> Self {
        Self { min, max: UNBOUNDED }
    }

    pub fn bounded(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn check(self, ceiling: u64) -> Result<(), Error> {
        let max = if self.max == UNBOUNDED { ceiling } else { self.max };
        if self.min > max {
            return validation(SIZE_MIN_GREATER_THAN_MAX);
        }
        if max > ceiling {
            return validation(SIZE_MAX_EXCEEDS_LIMIT);
        }
        Ok(())
    }
}

// ---------------- Table/Memory/Global/Exception Types ----------------
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableType {
    pub elem_type: RefType,
    pub size: SizeConstraints,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shared: bool,
}

impl TableType {
    pub fn check(&self, features: &FeatureSpec) -> Result<(), Error> {
        self.elem_type.check_feature(features)?;
        self.size.check(MAX_TABLE_ELEMS)?;
        if self.shared {
            if !features.shared_tables {
                return validation("shared table requires the shared-tables feature");
            }
            if self.size.max == UNBOUNDED {
                return validation(SHARED_TABLE_REQUIRES_MAX);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryType {
    pub size: SizeConstraints,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shared: bool,
}

impl MemoryType {
    pub fn check(&self, features: &FeatureSpec) -> Result<(), Error> {
        self.size.check(MAX_MEMORY_PAGES)?;
        if self.shared {
            if !features.atomics {
                return validation("shared memory requires the atomics feature");
            }
            if self.size.max == UNBOUNDED {
                return validation(SHARED_MEMORY_REQUIRES_MAX);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalType {
    pub ty: ValType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mutable: bool,
}

impl GlobalType {
    pub fn check(&self, features: &FeatureSpec) -> Result<(), Error> {
        self.ty.check_feature(features)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExceptionType {
    pub params: Vec<ValType>,
}

impl ExceptionType {
    pub fn check(&self, features: &FeatureSpec) -> Result<(), Error> {
        for param in &self.params {
            param.check_feature(features)?;
        }
        Ok(())
    }
}
