use crate::features::Feature;
use crate::types::ValType;

// ---------------- Immediates ----------------
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MemImm {
    pub align_log2: u32,
    pub offset: u64,
}

// The block-type immediate of block/loop/if/try: either empty, a single
// result type, or an index into the module's types table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlockSig {
    Empty,
    Result(ValType),
    Type(u32),
}

// Alignment/sharedness requirements of a load, store, or atomic operator.
#[derive(Debug, Copy, Clone)]
pub(crate) struct MemAccess {
    pub imm: MemImm,
    pub natural_align_log2: u32,
    pub atomic: bool,
}

// ---------------- Operators ----------------
// The tagged operator union the streaming facade consumes; variant names map
// one-to-one onto WebAssembly opcodes. Immediates are carried inline, so an
// operator is self-contained (br_table targets included).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Operator {
    // Control
    Unreachable,
    Nop,
    Block(BlockSig),
    Loop(BlockSig),
    If(BlockSig),
    Else,
    End,
    Try(BlockSig),
    Catch(u32),
    CatchAll,
    Throw(u32),
    Rethrow(u32),
    Br(u32),
    BrIf(u32),
    BrTable { targets: Vec<u32>, default_target: u32 },
    Return,
    Call(u32),
    CallIndirect { type_index: u32, table_index: u32 },
    // Parametric
    Drop,
    Select { ty: Option<ValType> },
    // Variables
    LocalGet(u32),
    LocalSet(u32),
    LocalTee(u32),
    GlobalGet(u32),
    GlobalSet(u32),
    // References
    RefNull,
    RefIsNull,
    RefFunc(u32),
    // Tables
    TableGet(u32),
    TableSet(u32),
    TableGrow(u32),
    TableFill(u32),
    TableSize(u32),
    TableCopy { dst_table: u32, src_table: u32 },
    TableInit { table_index: u32, elem_index: u32 },
    ElemDrop(u32),
    // Memory management
    MemorySize(u32),
    MemoryGrow(u32),
    MemoryCopy { dst_mem: u32, src_mem: u32 },
    MemoryFill(u32),
    MemoryInit { mem_index: u32, data_index: u32 },
    DataDrop(u32),
    // Loads/stores
    I32Load(MemImm), I64Load(MemImm), F32Load(MemImm), F64Load(MemImm),
    I32Load8S(MemImm), I32Load8U(MemImm), I32Load16S(MemImm), I32Load16U(MemImm),
    I64Load8S(MemImm), I64Load8U(MemImm), I64Load16S(MemImm), I64Load16U(MemImm),
    I64Load32S(MemImm), I64Load32U(MemImm),
    I32Store(MemImm), I64Store(MemImm), F32Store(MemImm), F64Store(MemImm),
    I32Store8(MemImm), I32Store16(MemImm),
    I64Store8(MemImm), I64Store16(MemImm), I64Store32(MemImm),
    V128Load(MemImm), V128Store(MemImm),
    // Constants
    I32Const(i32), I64Const(i64), F32Const(u32), F64Const(u64), V128Const([u8; 16]),
    // i32 comparisons
    I32Eqz, I32Eq, I32Ne, I32LtS, I32LtU, I32GtS, I32GtU, I32LeS, I32LeU, I32GeS, I32GeU,
    // i64 comparisons
    I64Eqz, I64Eq, I64Ne, I64LtS, I64LtU, I64GtS, I64GtU, I64LeS, I64LeU, I64GeS, I64GeU,
    // f32/f64 comparisons
    F32Eq, F32Ne, F32Lt, F32Gt, F32Le, F32Ge,
    F64Eq, F64Ne, F64Lt, F64Gt, F64Le, F64Ge,
    // i32 arithmetic
    I32Clz, I32Ctz, I32Popcnt,
    I32Add, I32Sub, I32Mul, I32DivS, I32DivU, I32RemS, I32RemU,
    I32And, I32Or, I32Xor, I32Shl, I32ShrS, I32ShrU, I32Rotl, I32Rotr,
    // i64 arithmetic
    I64Clz, I64Ctz, I64Popcnt,
    I64Add, I64Sub, I64Mul, I64DivS, I64DivU, I64RemS, I64RemU,
    I64And, I64Or, I64Xor, I64Shl, I64ShrS, I64ShrU, I64Rotl, I64Rotr,
    // f32 arithmetic
    F32Abs, F32Neg, F32Ceil, F32Floor, F32Trunc, F32Nearest, F32Sqrt,
    F32Add, F32Sub, F32Mul, F32Div, F32Min, F32Max, F32Copysign,
    // f64 arithmetic
    F64Abs, F64Neg, F64Ceil, F64Floor, F64Trunc, F64Nearest, F64Sqrt,
    F64Add, F64Sub, F64Mul, F64Div, F64Min, F64Max, F64Copysign,
    // Conversions
    I32WrapI64, I32TruncF32S, I32TruncF32U, I32TruncF64S, I32TruncF64U,
    I64ExtendI32S, I64ExtendI32U, I64TruncF32S, I64TruncF32U, I64TruncF64S, I64TruncF64U,
    F32ConvertI32S, F32ConvertI32U, F32ConvertI64S, F32ConvertI64U, F32DemoteF64,
    F64ConvertI32S, F64ConvertI32U, F64ConvertI64S, F64ConvertI64U, F64PromoteF32,
    I32ReinterpretF32, I64ReinterpretF64, F32ReinterpretI32, F64ReinterpretI64,
    // SIMD splats
    I8x16Splat, I16x8Splat, I32x4Splat, I64x2Splat, F32x4Splat, F64x2Splat,
    // SIMD lane access
    I8x16ExtractLaneS(u8), I8x16ExtractLaneU(u8), I16x8ExtractLaneS(u8), I16x8ExtractLaneU(u8),
    I32x4ExtractLane(u8), I64x2ExtractLane(u8), F32x4ExtractLane(u8), F64x2ExtractLane(u8),
    I8x16ReplaceLane(u8), I16x8ReplaceLane(u8), I32x4ReplaceLane(u8),
    I64x2ReplaceLane(u8), F32x4ReplaceLane(u8), F64x2ReplaceLane(u8),
    I8x16Shuffle([u8; 16]),
    I8x16Swizzle,
    // SIMD integer arithmetic
    I8x16Add, I8x16Sub, I8x16Neg,
    I8x16AddSatS, I8x16AddSatU, I8x16SubSatS, I8x16SubSatU,
    I16x8Add, I16x8Sub, I16x8Mul, I16x8Neg,
    I16x8AddSatS, I16x8AddSatU, I16x8SubSatS, I16x8SubSatU,
    I32x4Add, I32x4Sub, I32x4Mul, I32x4Neg,
    I64x2Add, I64x2Sub, I64x2Mul, I64x2Neg,
    // SIMD shifts
    I8x16Shl, I8x16ShrS, I8x16ShrU,
    I16x8Shl, I16x8ShrS, I16x8ShrU,
    I32x4Shl, I32x4ShrS, I32x4ShrU,
    I64x2Shl, I64x2ShrS, I64x2ShrU,
    // SIMD boolean reductions
    I8x16AnyTrue, I8x16AllTrue, I16x8AnyTrue, I16x8AllTrue,
    I32x4AnyTrue, I32x4AllTrue, I64x2AnyTrue, I64x2AllTrue,
    // SIMD integer comparisons
    I8x16Eq, I8x16Ne, I8x16LtS, I8x16LtU, I8x16GtS, I8x16GtU, I8x16LeS, I8x16LeU, I8x16GeS, I8x16GeU,
    I16x8Eq, I16x8Ne, I16x8LtS, I16x8LtU, I16x8GtS, I16x8GtU, I16x8LeS, I16x8LeU, I16x8GeS, I16x8GeU,
    I32x4Eq, I32x4Ne, I32x4LtS, I32x4LtU, I32x4GtS, I32x4GtU, I32x4LeS, I32x4LeU, I32x4GeS, I32x4GeU,
    // SIMD float comparisons
    F32x4Eq, F32x4Ne, F32x4Lt, F32x4Gt, F32x4Le, F32x4Ge,
    F64x2Eq, F64x2Ne, F64x2Lt, F64x2Gt, F64x2Le, F64x2Ge,
    // SIMD bitwise
    V128And, V128Or, V128Xor, V128AndNot, V128Not, V128Bitselect,
    // SIMD float arithmetic
    F32x4Abs, F32x4Neg, F32x4Sqrt, F32x4Add, F32x4Sub, F32x4Mul, F32x4Div, F32x4Min, F32x4Max,
    F64x2Abs, F64x2Neg, F64x2Sqrt, F64x2Add, F64x2Sub, F64x2Mul, F64x2Div, F64x2Min, F64x2Max,
    // SIMD conversions
    I32x4TruncSatF32x4S, I32x4TruncSatF32x4U, F32x4ConvertI32x4S, F32x4ConvertI32x4U,
    // Atomic wait/notify
    AtomicNotify(MemImm), I32AtomicWait(MemImm), I64AtomicWait(MemImm),
    // Atomic loads/stores
    I32AtomicLoad(MemImm), I64AtomicLoad(MemImm),
    I32AtomicLoad8U(MemImm), I32AtomicLoad16U(MemImm),
    I64AtomicLoad8U(MemImm), I64AtomicLoad16U(MemImm), I64AtomicLoad32U(MemImm),
    I32AtomicStore(MemImm), I64AtomicStore(MemImm),
    I32AtomicStore8(MemImm), I32AtomicStore16(MemImm),
    I64AtomicStore8(MemImm), I64AtomicStore16(MemImm), I64AtomicStore32(MemImm),
    // Atomic read-modify-write
    I32AtomicRmwAdd(MemImm), I32AtomicRmw8AddU(MemImm), I32AtomicRmw16AddU(MemImm),
    I64AtomicRmwAdd(MemImm), I64AtomicRmw8AddU(MemImm), I64AtomicRmw16AddU(MemImm), I64AtomicRmw32AddU(MemImm),
    I32AtomicRmwSub(MemImm), I32AtomicRmw8SubU(MemImm), I32AtomicRmw16SubU(MemImm),
    I64AtomicRmwSub(MemImm), I64AtomicRmw8SubU(MemImm), I64AtomicRmw16SubU(MemImm), I64AtomicRmw32SubU(MemImm),
    I32AtomicRmwAnd(MemImm), I32AtomicRmw8AndU(MemImm), I32AtomicRmw16AndU(MemImm),
    I64AtomicRmwAnd(MemImm), I64AtomicRmw8AndU(MemImm), I64AtomicRmw16AndU(MemImm), I64AtomicRmw32AndU(MemImm),
    I32AtomicRmwOr(MemImm), I32AtomicRmw8OrU(MemImm), I32AtomicRmw16OrU(MemImm),
    I64AtomicRmwOr(MemImm), I64AtomicRmw8OrU(MemImm), I64AtomicRmw16OrU(MemImm), I64AtomicRmw32OrU(MemImm),
    I32AtomicRmwXor(MemImm), I32AtomicRmw8XorU(MemImm), I32AtomicRmw16XorU(MemImm),
    I64AtomicRmwXor(MemImm), I64AtomicRmw8XorU(MemImm), I64AtomicRmw16XorU(MemImm), I64AtomicRmw32XorU(MemImm),
    I32AtomicRmwXchg(MemImm), I32AtomicRmw8XchgU(MemImm), I32AtomicRmw16XchgU(MemImm),
    I64AtomicRmwXchg(MemImm), I64AtomicRmw8XchgU(MemImm), I64AtomicRmw16XchgU(MemImm), I64AtomicRmw32XchgU(MemImm),
    I32AtomicRmwCmpxchg(MemImm), I32AtomicRmw8CmpxchgU(MemImm), I32AtomicRmw16CmpxchgU(MemImm),
    I64AtomicRmwCmpxchg(MemImm), I64AtomicRmw8CmpxchgU(MemImm), I64AtomicRmw16CmpxchgU(MemImm), I64AtomicRmw32CmpxchgU(MemImm),
}

// ---------------- Simple Operator Table ----------------
// Every operator with no special control-flow or index semantics is declared
// here once: wire name, required feature, and stack signature. The body
// validator handles these uniformly (feature check, immediate check, pop
// params, push results); everything else gets an explicit dispatch arm.
macro_rules! simple_ops {
    ($( $variant:ident $(($imm:tt))? = $name:literal, $feature:ident, [$($p:ident),*] -> [$($r:ident),*]; )*) => {
        impl Operator {
            pub(crate) fn simple_info(&self) -> Option<(&'static str, Feature)> {
                match self {
                    $( Operator::$variant $(($imm))? => Some(($name, Feature::$feature)), )*
                    _ => None,
                }
            }

            pub(crate) fn simple_signature(&self) -> Option<(&'static [ValType], &'static [ValType])> {
                match self {
                    $( Operator::$variant $(($imm))? =>
                        Some((&[$(ValType::$p),*], &[$(ValType::$r),*])), )*
                    _ => None,
                }
            }
        }
    };
}

simple_ops! {
    // Constants
    I32Const(_) = "i32.const", Mvp, [] -> [I32];
    I64Const(_) = "i64.const", Mvp, [] -> [I64];
    F32Const(_) = "f32.const", Mvp, [] -> [F32];
    F64Const(_) = "f64.const", Mvp, [] -> [F64];
    V128Const(_) = "v128.const", Simd, [] -> [V128];
    // Loads
    I32Load(_) = "i32.load", Mvp, [I32] -> [I32];
    I64Load(_) = "i64.load", Mvp, [I32] -> [I64];
    F32Load(_) = "f32.load", Mvp, [I32] -> [F32];
    F64Load(_) = "f64.load", Mvp, [I32] -> [F64];
    I32Load8S(_) = "i32.load8_s", Mvp, [I32] -> [I32];
    I32Load8U(_) = "i32.load8_u", Mvp, [I32] -> [I32];
    I32Load16S(_) = "i32.load16_s", Mvp, [I32] -> [I32];
    I32Load16U(_) = "i32.load16_u", Mvp, [I32] -> [I32];
    I64Load8S(_) = "i64.load8_s", Mvp, [I32] -> [I64];
    I64Load8U(_) = "i64.load8_u", Mvp, [I32] -> [I64];
    I64Load16S(_) = "i64.load16_s", Mvp, [I32] -> [I64];
    I64Load16U(_) = "i64.load16_u", Mvp, [I32] -> [I64];
    I64Load32S(_) = "i64.load32_s", Mvp, [I32] -> [I64];
    I64Load32U(_) = "i64.load32_u", Mvp, [I32] -> [I64];
    V128Load(_) = "v128.load", Simd, [I32] -> [V128];
    // Stores
    I32Store(_) = "i32.store", Mvp, [I32, I32] -> [];
    I64Store(_) = "i64.store", Mvp, [I32, I64] -> [];
    F32Store(_) = "f32.store", Mvp, [I32, F32] -> [];
    F64Store(_) = "f64.store", Mvp, [I32, F64] -> [];
    I32Store8(_) = "i32.store8", Mvp, [I32, I32] -> [];
    I32Store16(_) = "i32.store16", Mvp, [I32, I32] -> [];
    I64Store8(_) = "i64.store8", Mvp, [I32, I64] -> [];
    I64Store16(_) = "i64.store16", Mvp, [I32, I64] -> [];
    I64Store32(_) = "i64.store32", Mvp, [I32, I64] -> [];
    V128Store(_) = "v128.store", Simd, [I32, V128] -> [];
    // References
    RefNull = "ref.null", ReferenceTypes, [] -> [NullRef];
    RefIsNull = "ref.is_null", ReferenceTypes, [AnyRef] -> [I32];
    // i32 comparisons
    I32Eqz = "i32.eqz", Mvp, [I32] -> [I32];
    I32Eq = "i32.eq", Mvp, [I32, I32] -> [I32];
    I32Ne = "i32.ne", Mvp, [I32, I32] -> [I32];
    I32LtS = "i32.lt_s", Mvp, [I32, I32] -> [I32];
    I32LtU = "i32.lt_u", Mvp, [I32, I32] -> [I32];
    I32GtS = "i32.gt_s", Mvp, [I32, I32] -> [I32];
    I32GtU = "i32.gt_u", Mvp, [I32, I32] -> [I32];
    I32LeS = "i32.le_s", Mvp, [I32, I32] -> [I32];
    I32LeU = "i32.le_u", Mvp, [I32, I32] -> [I32];
    I32GeS = "i32.ge_s", Mvp, [I32, I32] -> [I32];
    I32GeU = "i32.ge_u", Mvp, [I32, I32] -> [I32];
    // i64 comparisons
    I64Eqz = "i64.eqz", Mvp, [I64] -> [I32];
    I64Eq = "i64.eq", Mvp, [I64, I64] -> [I32];
    I64Ne = "i64.ne", Mvp, [I64, I64] -> [I32];
    I64LtS = "i64.lt_s", Mvp, [I64, I64] -> [I32];
    I64LtU = "i64.lt_u", Mvp, [I64, I64] -> [I32];
    I64GtS = "i64.gt_s", Mvp, [I64, I64] -> [I32];
    I64GtU = "i64.gt_u", Mvp, [I64, I64] -> [I32];
    I64LeS = "i64.le_s", Mvp, [I64, I64] -> [I32];
    I64LeU = "i64.le_u", Mvp, [I64, I64] -> [I32];
    I64GeS = "i64.ge_s", Mvp, [I64, I64] -> [I32];
    I64GeU = "i64.ge_u", Mvp, [I64, I64] -> [I32];
    // f32 comparisons
    F32Eq = "f32.eq", Mvp, [F32, F32] -> [I32];
    F32Ne = "f32.ne", Mvp, [F32, F32] -> [I32];
    F32Lt = "f32.lt", Mvp, [F32, F32] -> [I32];
    F32Gt = "f32.gt", Mvp, [F32, F32] -> [I32];
    F32Le = "f32.le", Mvp, [F32, F32] -> [I32];
    F32Ge = "f32.ge", Mvp, [F32, F32] -> [I32];
    // f64 comparisons
    F64Eq = "f64.eq", Mvp, [F64, F64] -> [I32];
    F64Ne = "f64.ne", Mvp, [F64, F64] -> [I32];
    F64Lt = "f64.lt", Mvp, [F64, F64] -> [I32];
    F64Gt = "f64.gt", Mvp, [F64, F64] -> [I32];
    F64Le = "f64.le", Mvp, [F64, F64] -> [I32];
    F64Ge = "f64.ge", Mvp, [F64, F64] -> [I32];
    // i32 arithmetic
    I32Clz = "i32.clz", Mvp, [I32] -> [I32];
    I32Ctz = "i32.ctz", Mvp, [I32] -> [I32];
    I32Popcnt = "i32.popcnt", Mvp, [I32] -> [I32];
    I32Add = "i32.add", Mvp, [I32, I32] -> [I32];
    I32Sub = "i32.sub", Mvp, [I32, I32] -> [I32];
    I32Mul = "i32.mul", Mvp, [I32, I32] -> [I32];
    I32DivS = "i32.div_s", Mvp, [I32, I32] -> [I32];
    I32DivU = "i32.div_u", Mvp, [I32, I32] -> [I32];
    I32RemS = "i32.rem_s", Mvp, [I32, I32] -> [I32];
    I32RemU = "i32.rem_u", Mvp, [I32, I32] -> [I32];
    I32And = "i32.and", Mvp, [I32, I32] -> [I32];
    I32Or = "i32.or", Mvp, [I32, I32] -> [I32];
    I32Xor = "i32.xor", Mvp, [I32, I32] -> [I32];
    I32Shl = "i32.shl", Mvp, [I32, I32] -> [I32];
    I32ShrS = "i32.shr_s", Mvp, [I32, I32] -> [I32];
    I32ShrU = "i32.shr_u", Mvp, [I32, I32] -> [I32];
    I32Rotl = "i32.rotl", Mvp, [I32, I32] -> [I32];
    I32Rotr = "i32.rotr", Mvp, [I32, I32] -> [I32];
    // i64 arithmetic
    I64Clz = "i64.clz", Mvp, [I64] -> [I64];
    I64Ctz = "i64.ctz", Mvp, [I64] -> [I64];
    I64Popcnt = "i64.popcnt", Mvp, [I64] -> [I64];
    I64Add = "i64.add", Mvp, [I64, I64] -> [I64];
    I64Sub = "i64.sub", Mvp, [I64, I64] -> [I64];
    I64Mul = "i64.mul", Mvp, [I64, I64] -> [I64];
    I64DivS = "i64.div_s", Mvp, [I64, I64] -> [I64];
    I64DivU = "i64.div_u", Mvp, [I64, I64] -> [I64];
    I64RemS = "i64.rem_s", Mvp, [I64, I64] -> [I64];
    I64RemU = "i64.rem_u", Mvp, [I64, I64] -> [I64];
    I64And = "i64.and", Mvp, [I64, I64] -> [I64];
    I64Or = "i64.or", Mvp, [I64, I64] -> [I64];
    I64Xor = "i64.xor", Mvp, [I64, I64] -> [I64];
    I64Shl = "i64.shl", Mvp, [I64, I64] -> [I64];
    I64ShrS = "i64.shr_s", Mvp, [I64, I64] -> [I64];
    I64ShrU = "i64.shr_u", Mvp, [I64, I64] -> [I64];
    I64Rotl = "i64.rotl", Mvp, [I64, I64] -> [I64];
    I64Rotr = "i64.rotr", Mvp, [I64, I64] -> [I64];
    // f32 arithmetic
    F32Abs = "f32.abs", Mvp, [F32] -> [F32];
    F32Neg = "f32.neg", Mvp, [F32] -> [F32];
    F32Ceil = "f32.ceil", Mvp, [F32] -> [F32];
    F32Floor = "f32.floor", Mvp, [F32] -> [F32];
    F32Trunc = "f32.trunc", Mvp, [F32] -> [F32];
    F32Nearest = "f32.nearest", Mvp, [F32] -> [F32];
    F32Sqrt = "f32.sqrt", Mvp, [F32] -> [F32];
    F32Add = "f32.add", Mvp, [F32, F32] -> [F32];
    F32Sub = "f32.sub", Mvp, [F32, F32] -> [F32];
    F32Mul = "f32.mul", Mvp, [F32, F32] -> [F32];
    F32Div = "f32.div", Mvp, [F32, F32] -> [F32];
    F32Min = "f32.min", Mvp, [F32, F32] -> [F32];
    F32Max = "f32.max", Mvp, [F32, F32] -> [F32];
    F32Copysign = "f32.copysign", Mvp, [F32, F32] -> [F32];
    // f64 arithmetic
    F64Abs = "f64.abs", Mvp, [F64] -> [F64];
    F64Neg = "f64.neg", Mvp, [F64] -> [F64];
    F64Ceil = "f64.ceil", Mvp, [F64] -> [F64];
    F64Floor = "f64.floor", Mvp, [F64] -> [F64];
    F64Trunc = "f64.trunc", Mvp, [F64] -> [F64];
    F64Nearest = "f64.nearest", Mvp, [F64] -> [F64];
    F64Sqrt = "f64.sqrt", Mvp, [F64] -> [F64];
    F64Add = "f64.add", Mvp, [F64, F64] -> [F64];
    F64Sub = "f64.sub", Mvp, [F64, F64] -> [F64];
    F64Mul = "f64.mul", Mvp, [F64, F64] -> [F64];
    F64Div = "f64.div", Mvp, [F64, F64] -> [F64];
    F64Min = "f64.min", Mvp, [F64, F64] -> [F64];
    F64Max = "f64.max", Mvp, [F64, F64] -> [F64];
    F64Copysign = "f64.copysign", Mvp, [F64, F64] -> [F64];
    // Conversions
    I32WrapI64 = "i32.wrap_i64", Mvp, [I64] -> [I32];
    I32TruncF32S = "i32.trunc_f32_s", Mvp, [F32] -> [I32];
    I32TruncF32U = "i32.trunc_f32_u", Mvp, [F32] -> [I32];
    I32TruncF64S = "i32.trunc_f64_s", Mvp, [F64] -> [I32];
    I32TruncF64U = "i32.trunc_f64_u", Mvp, [F64] -> [I32];
    I64ExtendI32S = "i64.extend_i32_s", Mvp, [I32] -> [I64];
    I64ExtendI32U = "i64.extend_i32_u", Mvp, [I32] -> [I64];
    I64TruncF32S = "i64.trunc_f32_s", Mvp, [F32] -> [I64];
    I64TruncF32U = "i64.trunc_f32_u", Mvp, [F32] -> [I64];
    I64TruncF64S = "i64.trunc_f64_s", Mvp, [F64] -> [I64];
    I64TruncF64U = "i64.trunc_f64_u", Mvp, [F64] -> [I64];
    F32ConvertI32S = "f32.convert_i32_s", Mvp, [I32] -> [F32];
    F32ConvertI32U = "f32.convert_i32_u", Mvp, [I32] -> [F32];
    F32ConvertI64S = "f32.convert_i64_s", Mvp, [I64] -> [F32];
    F32ConvertI64U = "f32.convert_i64_u", Mvp, [I64] -> [F32];
    F32DemoteF64 = "f32.demote_f64", Mvp, [F64] -> [F32];
    F64ConvertI32S = "f64.convert_i32_s", Mvp, [I32] -> [F64];
    F64ConvertI32U = "f64.convert_i32_u", Mvp, [I32] -> [F64];
    F64ConvertI64S = "f64.convert_i64_s", Mvp, [I64] -> [F64];
    F64ConvertI64U = "f64.convert_i64_u", Mvp, [I64] -> [F64];
    F64PromoteF32 = "f64.promote_f32", Mvp, [F32] -> [F64];
    I32ReinterpretF32 = "i32.reinterpret_f32", Mvp, [F32] -> [I32];
    I64ReinterpretF64 = "i64.reinterpret_f64", Mvp, [F64] -> [I64];
    F32ReinterpretI32 = "f32.reinterpret_i32", Mvp, [I32] -> [F32];
    F64ReinterpretI64 = "f64.reinterpret_i64", Mvp, [I64] -> [F64];
    // SIMD splats
    I8x16Splat = "i8x16.splat", Simd, [I32] -> [V128];
    I16x8Splat = "i16x8.splat", Simd, [I32] -> [V128];
    I32x4Splat = "i32x4.splat", Simd, [I32] -> [V128];
    I64x2Splat = "i64x2.splat", Simd, [I64] -> [V128];
    F32x4Splat = "f32x4.splat", Simd, [F32] -> [V128];
    F64x2Splat = "f64x2.splat", Simd, [F64] -> [V128];
    // SIMD lane access
    I8x16ExtractLaneS(_) = "i8x16.extract_lane_s", Simd, [V128] -> [I32];
    I8x16ExtractLaneU(_) = "i8x16.extract_lane_u", Simd, [V128] -> [I32];
    I16x8ExtractLaneS(_) = "i16x8.extract_lane_s", Simd, [V128] -> [I32];
    I16x8ExtractLaneU(_) = "i16x8.extract_lane_u", Simd, [V128] -> [I32];
    I32x4ExtractLane(_) = "i32x4.extract_lane", Simd, [V128] -> [I32];
    I64x2ExtractLane(_) = "i64x2.extract_lane", Simd, [V128] -> [I64];
    F32x4ExtractLane(_) = "f32x4.extract_lane", Simd, [V128] -> [F32];
    F64x2ExtractLane(_) = "f64x2.extract_lane", Simd, [V128] -> [F64];
    I8x16ReplaceLane(_) = "i8x16.replace_lane", Simd, [V128, I32] -> [V128];
    I16x8ReplaceLane(_) = "i16x8.replace_lane", Simd, [V128, I32] -> [V128];
    I32x4ReplaceLane(_) = "i32x4.replace_lane", Simd, [V128, I32] -> [V128];
    I64x2ReplaceLane(_) = "i64x2.replace_lane", Simd, [V128, I64] -> [V128];
    F32x4ReplaceLane(_) = "f32x4.replace_lane", Simd, [V128, F32] -> [V128];
    F64x2ReplaceLane(_) = "f64x2.replace_lane", Simd, [V128, F64] -> [V128];
    I8x16Shuffle(_) = "i8x16.shuffle", Simd, [V128, V128] -> [V128];
    I8x16Swizzle = "i8x16.swizzle", Simd, [V128, V128] -> [V128];
    // SIMD integer arithmetic
    I8x16Add = "i8x16.add", Simd, [V128, V128] -> [V128];
    I8x16Sub = "i8x16.sub", Simd, [V128, V128] -> [V128];
    I8x16Neg = "i8x16.neg", Simd, [V128] -> [V128];
    I8x16AddSatS = "i8x16.add_sat_s", Simd, [V128, V128] -> [V128];
    I8x16AddSatU = "i8x16.add_sat_u", Simd, [V128, V128] -> [V128];
    I8x16SubSatS = "i8x16.sub_sat_s", Simd, [V128, V128] -> [V128];
    I8x16SubSatU = "i8x16.sub_sat_u", Simd, [V128, V128] -> [V128];
    I16x8Add = "i16x8.add", Simd, [V128, V128] -> [V128];
    I16x8Sub = "i16x8.sub", Simd, [V128, V128] -> [V128];
    I16x8Mul = "i16x8.mul", Simd, [V128, V128] -> [V128];
    I16x8Neg = "i16x8.neg", Simd, [V128] -> [V128];
    I16x8AddSatS = "i16x8.add_sat_s", Simd, [V128, V128] -> [V128];
    I16x8AddSatU = "i16x8.add_sat_u", Simd, [V128, V128] -> [V128];
    I16x8SubSatS = "i16x8.sub_sat_s", Simd, [V128, V128] -> [V128];
    I16x8SubSatU = "i16x8.sub_sat_u", Simd, [V128, V128] -> [V128];
    I32x4Add = "i32x4.add", Simd, [V128, V128] -> [V128];
    I32x4Sub = "i32x4.sub", Simd, [V128, V128] -> [V128];
    I32x4Mul = "i32x4.mul", Simd, [V128, V128] -> [V128];
    I32x4Neg = "i32x4.neg", Simd, [V128] -> [V128];
    I64x2Add = "i64x2.add", Simd, [V128, V128] -> [V128];
    I64x2Sub = "i64x2.sub", Simd, [V128, V128] -> [V128];
    I64x2Mul = "i64x2.mul", Simd, [V128, V128] -> [V128];
    I64x2Neg = "i64x2.neg", Simd, [V128] -> [V128];
    // SIMD shifts
    I8x16Shl = "i8x16.shl", Simd, [V128, I32] -> [V128];
    I8x16ShrS = "i8x16.shr_s", Simd, [V128, I32] -> [V128];
    I8x16ShrU = "i8x16.shr_u", Simd, [V128, I32] -> [V128];
    I16x8Shl = "i16x8.shl", Simd, [V128, I32] -> [V128];
    I16x8ShrS = "i16x8.shr_s", Simd, [V128, I32] -> [V128];
    I16x8ShrU = "i16x8.shr_u", Simd, [V128, I32] -> [V128];
    I32x4Shl = "i32x4.shl", Simd, [V128, I32] -> [V128];
    I32x4ShrS = "i32x4.shr_s", Simd, [V128, I32] -> [V128];
    I32x4ShrU = "i32x4.shr_u", Simd, [V128, I32] -> [V128];
    I64x2Shl = "i64x2.shl", Simd, [V128, I32] -> [V128];
    I64x2ShrS = "i64x2.shr_s", Simd, [V128, I32] -> [V128];
    I64x2ShrU = "i64x2.shr_u", Simd, [V128, I32] -> [V128];
    // SIMD boolean reductions
    I8x16AnyTrue = "i8x16.any_true", Simd, [V128] -> [I32];
    I8x16AllTrue = "i8x16.all_true", Simd, [V128] -> [I32];
    I16x8AnyTrue = "i16x8.any_true", Simd, [V128] -> [I32];
    I16x8AllTrue = "i16x8.all_true", Simd, [V128] -> [I32];
    I32x4AnyTrue = "i32x4.any_true", Simd, [V128] -> [I32];
    I32x4AllTrue = "i32x4.all_true", Simd, [V128] -> [I32];
    I64x2AnyTrue = "i64x2.any_true", Simd, [V128] -> [I32];
    I64x2AllTrue = "i64x2.all_true", Simd, [V128] -> [I32];
    // SIMD integer comparisons
    I8x16Eq = "i8x16.eq", Simd, [V128, V128] -> [V128];
    I8x16Ne = "i8x16.ne", Simd, [V128, V128] -> [V128];
    I8x16LtS = "i8x16.lt_s", Simd, [V128, V128] -> [V128];
    I8x16LtU = "i8x16.lt_u", Simd, [V128, V128] -> [V128];
    I8x16GtS = "i8x16.gt_s", Simd, [V128, V128] -> [V128];
    I8x16GtU = "i8x16.gt_u", Simd, [V128, V128] -> [V128];
    I8x16LeS = "i8x16.le_s", Simd, [V128, V128] -> [V128];
    I8x16LeU = "i8x16.le_u", Simd, [V128, V128] -> [V128];
    I8x16GeS = "i8x16.ge_s", Simd, [V128, V128] -> [V128];
    I8x16GeU = "i8x16.ge_u", Simd, [V128, V128] -> [V128];
    I16x8Eq = "i16x8.eq", Simd, [V128, V128] -> [V128];
    I16x8Ne = "i16x8.ne", Simd, [V128, V128] -> [V128];
    I16x8LtS = "i16x8.lt_s", Simd, [V128, V128] -> [V128];
    I16x8LtU = "i16x8.lt_u", Simd, [V128, V128] -> [V128];
    I16x8GtS = "i16x8.gt_s", Simd, [V128, V128] -> [V128];
    I16x8GtU = "i16x8.gt_u", Simd, [V128, V128] -> [V128];
    I16x8LeS = "i16x8.le_s", Simd, [V128, V128] -> [V128];
    I16x8LeU = "i16x8.le_u", Simd, [V128, V128] -> [V128];
    I16x8GeS = "i16x8.ge_s", Simd, [V128, V128] -> [V128];
    I16x8GeU = "i16x8.ge_u", Simd, [V128, V128] -> [V128];
    I32x4Eq = "i32x4.eq", Simd, [V128, V128] -> [V128];
    I32x4Ne = "i32x4.ne", Simd, [V128, V128] -> [V128];
    I32x4LtS = "i32x4.lt_s", Simd, [V128, V128] -> [V128];
    I32x4LtU = "i32x4.lt_u", Simd, [V128, V128] -> [V128];
    I32x4GtS = "i32x4.gt_s", Simd, [V128, V128] -> [V128];
    I32x4GtU = "i32x4.gt_u", Simd, [V128, V128] -> [V128];
    I32x4LeS = "i32x4.le_s", Simd, [V128, V128] -> [V128];
    I32x4LeU = "i32x4.le_u", Simd, [V128, V128] -> [V128];
    I32x4GeS = "i32x4.ge_s", Simd, [V128, V128] -> [V128];
    I32x4GeU = "i32x4.ge_u", Simd, [V128, V128] -> [V128];
    // SIMD float comparisons
    F32x4Eq = "f32x4.eq", Simd, [V128, V128] -> [V128];
    F32x4Ne = "f32x4.ne", Simd, [V128, V128] -> [V128];
    F32x4Lt = "f32x4.lt", Simd, [V128, V128] -> [V128];
    F32x4Gt = "f32x4.gt", Simd, [V128, V128] -> [V128];
    F32x4Le = "f32x4.le", Simd, [V128, V128] -> [V128];
    F32x4Ge = "f32x4.ge", Simd, [V128, V128] -> [V128];
    F64x2Eq = "f64x2.eq", Simd, [V128, V128] -> [V128];
    F64x2Ne = "f64x2.ne", Simd, [V128, V128] -> [V128];
    F64x2Lt = "f64x2.lt", Simd, [V128, V128] -> [V128];
    F64x2Gt = "f64x2.gt", Simd, [V128, V128] -> [V128];
    F64x2Le = "f64x2.le", Simd, [V128, V128] -> [V128];
    F64x2Ge = "f64x2.ge", Simd, [V128, V128] -> [V128];
    // SIMD bitwise
    V128And = "v128.and", Simd, [V128, V128] -> [V128];
    V128Or = "v128.or", Simd, [V128, V128] -> [V128];
    V128Xor = "v128.xor", Simd, [V128, V128] -> [V128];
    V128AndNot = "v128.andnot", Simd, [V128, V128] -> [V128];
    V128Not = "v128.not", Simd, [V128] -> [V128];
    V128Bitselect = "v128.bitselect", Simd, [V128, V128, V128] -> [V128];
    // SIMD float arithmetic
    F32x4Abs = "f32x4.abs", Simd, [V128] -> [V128];
    F32x4Neg = "f32x4.neg", Simd, [V128] -> [V128];
    F32x4Sqrt = "f32x4.sqrt", Simd, [V128] -> [V128];
    F32x4Add = "f32x4.add", Simd, [V128, V128] -> [V128];
    F32x4Sub = "f32x4.sub", Simd, [V128, V128] -> [V128];
    F32x4Mul = "f32x4.mul", Simd, [V128, V128] -> [V128];
    F32x4Div = "f32x4.div", Simd, [V128, V128] -> [V128];
    F32x4Min = "f32x4.min", Simd, [V128, V128] -> [V128];
    F32x4Max = "f32x4.max", Simd, [V128, V128] -> [V128];
    F64x2Abs = "f64x2.abs", Simd, [V128] -> [V128];
    F64x2Neg = "f64x2.neg", Simd, [V128] -> [V128];
    F64x2Sqrt = "f64x2.sqrt", Simd, [V128] -> [V128];
    F64x2Add = "f64x2.add", Simd, [V128, V128] -> [V128];
    F64x2Sub = "f64x2.sub", Simd, [V128, V128] -> [V128];
    F64x2Mul = "f64x2.mul", Simd, [V128, V128] -> [V128];
    F64x2Div = "f64x2.div", Simd, [V128, V128] -> [V128];
    F64x2Min = "f64x2.min", Simd, [V128, V128] -> [V128];
    F64x2Max = "f64x2.max", Simd, [V128, V128] -> [V128];
    // SIMD conversions
    I32x4TruncSatF32x4S = "i32x4.trunc_sat_f32x4_s", Simd, [V128] -> [V128];
    I32x4TruncSatF32x4U = "i32x4.trunc_sat_f32x4_u", Simd, [V128] -> [V128];
    F32x4ConvertI32x4S = "f32x4.convert_i32x4_s", Simd, [V128] -> [V128];
    F32x4ConvertI32x4U = "f32x4.convert_i32x4_u", Simd, [V128] -> [V128];
    // Atomic wait/notify
    AtomicNotify(_) = "atomic.notify", Atomics, [I32, I32] -> [I32];
    I32AtomicWait(_) = "i32.atomic.wait", Atomics, [I32, I32, I64] -> [I32];
    I64AtomicWait(_) = "i64.atomic.wait", Atomics, [I32, I64, I64] -> [I32];
    // Atomic loads/stores
    I32AtomicLoad(_) = "i32.atomic.load", Atomics, [I32] -> [I32];
    I64AtomicLoad(_) = "i64.atomic.load", Atomics, [I32] -> [I64];
    I32AtomicLoad8U(_) = "i32.atomic.load8_u", Atomics, [I32] -> [I32];
    I32AtomicLoad16U(_) = "i32.atomic.load16_u", Atomics, [I32] -> [I32];
    I64AtomicLoad8U(_) = "i64.atomic.load8_u", Atomics, [I32] -> [I64];
    I64AtomicLoad16U(_) = "i64.atomic.load16_u", Atomics, [I32] -> [I64];
    I64AtomicLoad32U(_) = "i64.atomic.load32_u", Atomics, [I32] -> [I64];
    I32AtomicStore(_) = "i32.atomic.store", Atomics, [I32, I32] -> [];
    I64AtomicStore(_) = "i64.atomic.store", Atomics, [I32, I64] -> [];
    I32AtomicStore8(_) = "i32.atomic.store8", Atomics, [I32, I32] -> [];
    I32AtomicStore16(_) = "i32.atomic.store16", Atomics, [I32, I32] -> [];
    I64AtomicStore8(_) = "i64.atomic.store8", Atomics, [I32, I64] -> [];
    I64AtomicStore16(_) = "i64.atomic.store16", Atomics, [I32, I64] -> [];
    I64AtomicStore32(_) = "i64.atomic.store32", Atomics, [I32, I64] -> [];
    // Atomic read-modify-write
    I32AtomicRmwAdd(_) = "i32.atomic.rmw.add", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw8AddU(_) = "i32.atomic.rmw8.add_u", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw16AddU(_) = "i32.atomic.rmw16.add_u", Atomics, [I32, I32] -> [I32];
    I64AtomicRmwAdd(_) = "i64.atomic.rmw.add", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw8AddU(_) = "i64.atomic.rmw8.add_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw16AddU(_) = "i64.atomic.rmw16.add_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw32AddU(_) = "i64.atomic.rmw32.add_u", Atomics, [I32, I64] -> [I64];
    I32AtomicRmwSub(_) = "i32.atomic.rmw.sub", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw8SubU(_) = "i32.atomic.rmw8.sub_u", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw16SubU(_) = "i32.atomic.rmw16.sub_u", Atomics, [I32, I32] -> [I32];
    I64AtomicRmwSub(_) = "i64.atomic.rmw.sub", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw8SubU(_) = "i64.atomic.rmw8.sub_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw16SubU(_) = "i64.atomic.rmw16.sub_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw32SubU(_) = "i64.atomic.rmw32.sub_u", Atomics, [I32, I64] -> [I64];
    I32AtomicRmwAnd(_) = "i32.atomic.rmw.and", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw8AndU(_) = "i32.atomic.rmw8.and_u", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw16AndU(_) = "i32.atomic.rmw16.and_u", Atomics, [I32, I32] -> [I32];
    I64AtomicRmwAnd(_) = "i64.atomic.rmw.and", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw8AndU(_) = "i64.atomic.rmw8.and_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw16AndU(_) = "i64.atomic.rmw16.and_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw32AndU(_) = "i64.atomic.rmw32.and_u", Atomics, [I32, I64] -> [I64];
    I32AtomicRmwOr(_) = "i32.atomic.rmw.or", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw8OrU(_) = "i32.atomic.rmw8.or_u", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw16OrU(_) = "i32.atomic.rmw16.or_u", Atomics, [I32, I32] -> [I32];
    I64AtomicRmwOr(_) = "i64.atomic.rmw.or", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw8OrU(_) = "i64.atomic.rmw8.or_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw16OrU(_) = "i64.atomic.rmw16.or_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw32OrU(_) = "i64.atomic.rmw32.or_u", Atomics, [I32, I64] -> [I64];
    I32AtomicRmwXor(_) = "i32.atomic.rmw.xor", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw8XorU(_) = "i32.atomic.rmw8.xor_u", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw16XorU(_) = "i32.atomic.rmw16.xor_u", Atomics, [I32, I32] -> [I32];
    I64AtomicRmwXor(_) = "i64.atomic.rmw.xor", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw8XorU(_) = "i64.atomic.rmw8.xor_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw16XorU(_) = "i64.atomic.rmw16.xor_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw32XorU(_) = "i64.atomic.rmw32.xor_u", Atomics, [I32, I64] -> [I64];
    I32AtomicRmwXchg(_) = "i32.atomic.rmw.xchg", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw8XchgU(_) = "i32.atomic.rmw8.xchg_u", Atomics, [I32, I32] -> [I32];
    I32AtomicRmw16XchgU(_) = "i32.atomic.rmw16.xchg_u", Atomics, [I32, I32] -> [I32];
    I64AtomicRmwXchg(_) = "i64.atomic.rmw.xchg", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw8XchgU(_) = "i64.atomic.rmw8.xchg_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw16XchgU(_) = "i64.atomic.rmw16.xchg_u", Atomics, [I32, I64] -> [I64];
    I64AtomicRmw32XchgU(_) = "i64.atomic.rmw32.xchg_u", Atomics, [I32, I64] -> [I64];
    I32AtomicRmwCmpxchg(_) = "i32.atomic.rmw.cmpxchg", Atomics, [I32, I32, I32] -> [I32];
    I32AtomicRmw8CmpxchgU(_) = "i32.atomic.rmw8.cmpxchg_u", Atomics, [I32, I32, I32] -> [I32];
    I32AtomicRmw16CmpxchgU(_) = "i32.atomic.rmw16.cmpxchg_u", Atomics, [I32, I32, I32] -> [I32];
    I64AtomicRmwCmpxchg(_) = "i64.atomic.rmw.cmpxchg", Atomics, [I32, I64, I64] -> [I64];
    I64AtomicRmw8CmpxchgU(_) = "i64.atomic.rmw8.cmpxchg_u", Atomics, [I32, I64, I64] -> [I64];
    I64AtomicRmw16CmpxchgU(_) = "i64.atomic.rmw16.cmpxchg_u", Atomics, [I32, I64, I64] -> [I64];
    I64AtomicRmw32CmpxchgU(_) = "i64.atomic.rmw32.cmpxchg_u", Atomics, [I32, I64, I64] -> [I64];
}

impl Operator {
    pub fn name(&self) -> &'static str {
        if let Some((name, _)) = self.simple_info() {
            return name;
        }
        use Operator::*;
        match self {
            Unreachable => "unreachable",
            Nop => "nop",
            Block(_) => "block",
            Loop(_) => "loop",
            If(_) => "if",
            Else => "else",
            End => "end",
            Try(_) => "try",
            Catch(_) => "catch",
            CatchAll => "catch_all",
            Throw(_) => "throw",
            Rethrow(_) => "rethrow",
            Br(_) => "br",
            BrIf(_) => "br_if",
            BrTable { .. } => "br_table",
            Return => "return",
            Call(_) => "call",
            CallIndirect { .. } => "call_indirect",
            Drop => "drop",
            Select { .. } => "select",
            LocalGet(_) => "local.get",
            LocalSet(_) => "local.set",
            LocalTee(_) => "local.tee",
            GlobalGet(_) => "global.get",
            GlobalSet(_) => "global.set",
            RefFunc(_) => "ref.func",
            TableGet(_) => "table.get",
            TableSet(_) => "table.set",
            TableGrow(_) => "table.grow",
            TableFill(_) => "table.fill",
            TableSize(_) => "table.size",
            TableCopy { .. } => "table.copy",
            TableInit { .. } => "table.init",
            ElemDrop(_) => "elem.drop",
            MemorySize(_) => "memory.size",
            MemoryGrow(_) => "memory.grow",
            MemoryCopy { .. } => "memory.copy",
            MemoryFill(_) => "memory.fill",
            MemoryInit { .. } => "memory.init",
            DataDrop(_) => "data.drop",
            _ => unreachable!("operator missing from the simple-op table"),
        }
    }

    pub fn required_feature(&self) -> Feature {
        if let Some((_, feature)) = self.simple_info() {
            return feature;
        }
        use Operator::*;
        match self {
            Try(_) | Catch(_) | CatchAll | Throw(_) | Rethrow(_) => Feature::ExceptionHandling,
            RefFunc(_) | TableGet(_) | TableSet(_) | TableGrow(_) | TableFill(_) | TableSize(_) => {
                Feature::ReferenceTypes
            }
            TableCopy { .. } | TableInit { .. } | ElemDrop(_) | MemoryCopy { .. }
            | MemoryFill(_) | MemoryInit { .. } | DataDrop(_) => Feature::BulkMemoryOperations,
            _ => Feature::Mvp,
        }
    }

    // The alignment/memory requirements of loads, stores, and atomics; the
    // stack effects stay in the simple-op table.
    pub(crate) fn mem_access(&self) -> Option<MemAccess> {
        use Operator::*;
        let (imm, natural_align_log2, atomic) = match self {
            I32Load8S(imm) | I32Load8U(imm) | I64Load8S(imm) | I64Load8U(imm)
            | I32Store8(imm) | I64Store8(imm) => (imm, 0, false),
            I32Load16S(imm) | I32Load16U(imm) | I64Load16S(imm) | I64Load16U(imm)
            | I32Store16(imm) | I64Store16(imm) => (imm, 1, false),
            I32Load(imm) | F32Load(imm) | I64Load32S(imm) | I64Load32U(imm) | I32Store(imm)
            | F32Store(imm) | I64Store32(imm) => (imm, 2, false),
            I64Load(imm) | F64Load(imm) | I64Store(imm) | F64Store(imm) => (imm, 3, false),
            V128Load(imm) | V128Store(imm) => (imm, 4, false),
            I32AtomicLoad8U(imm) | I64AtomicLoad8U(imm) | I32AtomicStore8(imm)
            | I64AtomicStore8(imm) | I32AtomicRmw8AddU(imm) | I32AtomicRmw8SubU(imm)
            | I32AtomicRmw8AndU(imm) | I32AtomicRmw8OrU(imm) | I32AtomicRmw8XorU(imm)
            | I32AtomicRmw8XchgU(imm) | I32AtomicRmw8CmpxchgU(imm) | I64AtomicRmw8AddU(imm)
            | I64AtomicRmw8SubU(imm) | I64AtomicRmw8AndU(imm) | I64AtomicRmw8OrU(imm)
            | I64AtomicRmw8XorU(imm) | I64AtomicRmw8XchgU(imm) | I64AtomicRmw8CmpxchgU(imm) => {
                (imm, 0, true)
            }
            I32AtomicLoad16U(imm) | I64AtomicLoad16U(imm) | I32AtomicStore16(imm)
            | I64AtomicStore16(imm) | I32AtomicRmw16AddU(imm) | I32AtomicRmw16SubU(imm)
            | I32AtomicRmw16AndU(imm) | I32AtomicRmw16OrU(imm) | I32AtomicRmw16XorU(imm)
            | I32AtomicRmw16XchgU(imm) | I32AtomicRmw16CmpxchgU(imm) | I64AtomicRmw16AddU(imm)
            | I64AtomicRmw16SubU(imm) | I64AtomicRmw16AndU(imm) | I64AtomicRmw16OrU(imm)
            | I64AtomicRmw16XorU(imm) | I64AtomicRmw16XchgU(imm) | I64AtomicRmw16CmpxchgU(imm) => {
                (imm, 1, true)
            }
            AtomicNotify(imm) | I32AtomicWait(imm) | I32AtomicLoad(imm) | I64AtomicLoad32U(imm)
            | I32AtomicStore(imm) | I64AtomicStore32(imm) | I32AtomicRmwAdd(imm)
            | I32AtomicRmwSub(imm) | I32AtomicRmwAnd(imm) | I32AtomicRmwOr(imm)
            | I32AtomicRmwXor(imm) | I32AtomicRmwXchg(imm) | I32AtomicRmwCmpxchg(imm)
            | I64AtomicRmw32AddU(imm) | I64AtomicRmw32SubU(imm) | I64AtomicRmw32AndU(imm)
            | I64AtomicRmw32OrU(imm) | I64AtomicRmw32XorU(imm) | I64AtomicRmw32XchgU(imm)
            | I64AtomicRmw32CmpxchgU(imm) => (imm, 2, true),
            I64AtomicWait(imm) | I64AtomicLoad(imm) | I64AtomicStore(imm)
            | I64AtomicRmwAdd(imm) | I64AtomicRmwSub(imm) | I64AtomicRmwAnd(imm)
            | I64AtomicRmwOr(imm) | I64AtomicRmwXor(imm) | I64AtomicRmwXchg(imm)
            | I64AtomicRmwCmpxchg(imm) => (imm, 3, true),
            _ => return None,
        };
        Some(MemAccess {
            imm: *imm,
            natural_align_log2,
            atomic,
        })
    }

    // Lane-indexed SIMD operators: (lane immediate, lane count).
    pub(crate) fn lane_imm(&self) -> Option<(u8, u8)> {
        use Operator::*;
        match self {
            I8x16ExtractLaneS(lane) | I8x16ExtractLaneU(lane) | I8x16ReplaceLane(lane) => {
                Some((*lane, 16))
            }
            I16x8ExtractLaneS(lane) | I16x8ExtractLaneU(lane) | I16x8ReplaceLane(lane) => {
                Some((*lane, 8))
            }
            I32x4ExtractLane(lane) | I32x4ReplaceLane(lane) | F32x4ExtractLane(lane)
            | F32x4ReplaceLane(lane) => Some((*lane, 4)),
            I64x2ExtractLane(lane) | I64x2ReplaceLane(lane) | F64x2ExtractLane(lane)
            | F64x2ReplaceLane(lane) => Some((*lane, 2)),
            _ => None,
        }
    }
}
