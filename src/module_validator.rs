use std::collections::HashSet;

use crate::error::*;
use crate::func_validator::validate_function_body;
use crate::module::*;
use crate::types::*;

// ---------------- Index Checks ----------------
pub(crate) fn check_index(what: &str, index: u32, count: usize) -> Result<(), Error> {
    if index as usize >= count {
        return validation(format!(
            "invalid {} index: {} ({} count is {})",
            what, index, what, count
        ));
    }
    Ok(())
}

// Resolves a function index to its signature. Used by call/ref.func/start;
// the declared signature was already bounds-checked when declarations were
// validated, so no return-count check happens here.
pub(crate) fn function_type(module: &Module, index: u32) -> Result<&Signature, Error> {
    check_index("function", index, module.functions.len())?;
    let type_index = module.functions[index as usize].type_index;
    check_index("type", type_index, module.types.len())?;
    Ok(&module.types[type_index as usize])
}

// A type used as a *function* signature (import, declaration, call_indirect)
// is subject to the return-count bound; raw types-table entries are not,
// because block types share the table.
pub(crate) fn signature_use(module: &Module, type_index: u32) -> Result<&Signature, Error> {
    check_index("type", type_index, module.types.len())?;
    let ty = &module.types[type_index as usize];
    if ty.results.len() > MAX_RETURN_VALUES {
        return validation(TOO_MANY_RETURN_VALUES);
    }
    Ok(ty)
}

pub(crate) fn global_index(
    module: &Module,
    index: u32,
    must_be_mutable: bool,
    must_be_immutable: bool,
    must_be_import: bool,
) -> Result<ValType, Error> {
    check_index("global", index, module.globals.len())?;
    let global = &module.globals[index as usize];
    if must_be_mutable && !global.ty.mutable {
        return validation(GLOBAL_IS_IMMUTABLE);
    }
    if must_be_import && global.import.is_none() {
        return validation(INITIALIZER_GLOBAL_NOT_IMPORTED);
    }
    if must_be_immutable && global.ty.mutable {
        return validation(INITIALIZER_GLOBAL_MUTABLE);
    }
    Ok(global.ty.ty)
}

fn check_type(expected: ValType, actual: ValType, context: &str) -> Result<(), Error> {
    if !is_subtype(actual, expected) {
        return validation(format!(
            "type mismatch: expected {} but got {} in {}",
            expected, actual, context
        ));
    }
    Ok(())
}

// ---------------- Initializer Validation ----------------
// The restricted constant expressions: literals, ref.null/ref.func, and
// global.get of an imported immutable global.
pub fn validate_initializer(
    module: &Module,
    expression: &InitializerExpression,
    expected: ValType,
    context: &str,
) -> Result<(), Error> {
    let actual = match expression {
        InitializerExpression::I32Const(_) => ValType::I32,
        InitializerExpression::I64Const(_) => ValType::I64,
        InitializerExpression::F32Const(_) => ValType::F32,
        InitializerExpression::F64Const(_) => ValType::F64,
        InitializerExpression::V128Const(_) => ValType::V128,
        InitializerExpression::GlobalGet(index) => global_index(module, *index, false, true, true)?,
        InitializerExpression::RefNull => ValType::NullRef,
        InitializerExpression::RefFunc(index) => {
            function_type(module, *index)?;
            ValType::FuncRef
        }
        InitializerExpression::Invalid => return validation(INVALID_INITIALIZER),
    };
    check_type(expected, actual, context)
}

// ---------------- Declaration Validation ----------------
pub fn validate_types(module: &Module) -> Result<(), Error> {
    for ty in &module.types {
        for param in &ty.params {
            param.check_feature(&module.feature_spec)?;
        }
        for result in &ty.results {
            result.check_feature(&module.feature_spec)?;
        }
        // The return-count bound is deliberately not enforced here: block
        // types live in the same table and are not subject to it.
        if ty.results.len() > 1 && !module.feature_spec.multiple_results_and_block_params {
            return validation(MULTIPLE_RESULTS_DISABLED);
        }
    }
    Ok(())
}

pub fn validate_imports(module: &Module) -> Result<(), Error> {
    // A decoder that miscounts its import list is a caller bug, not a
    // property of the module.
    debug_assert_eq!(
        module.imports.len(),
        module.functions.iter().filter(|f| f.import.is_some()).count()
            + module.tables.iter().filter(|t| t.import.is_some()).count()
            + module.memories.iter().filter(|m| m.import.is_some()).count()
            + module.globals.iter().filter(|g| g.import.is_some()).count()
            + module
                .exception_types
                .iter()
                .filter(|e| e.import.is_some())
                .count(),
        "per-kind import counts must sum to the import list length"
    );

    for function in module.functions.iter().filter(|f| f.import.is_some()) {
        signature_use(module, function.type_index)?;
    }
    for table in module.tables.iter().filter(|t| t.import.is_some()) {
        table.ty.check(&module.feature_spec)?;
    }
    for memory in module.memories.iter().filter(|m| m.import.is_some()) {
        memory.ty.check(&module.feature_spec)?;
    }
    for global in module.globals.iter().filter(|g| g.import.is_some()) {
        global.ty.check(&module.feature_spec)?;
        if global.ty.mutable && !module.feature_spec.import_export_mutable_globals {
            return validation(MUTABLE_GLOBAL_IMPORT);
        }
    }
    for exception_type in module.exception_types.iter().filter(|e| e.import.is_some()) {
        exception_type.ty.check(&module.feature_spec)?;
    }

    if !module.feature_spec.reference_types && module.tables.len() > 1 {
        return validation(TOO_MANY_TABLES);
    }
    // The limit on memories is not relaxed by any feature.
    if module.memories.len() > 1 {
        return validation(TOO_MANY_MEMORIES);
    }
    Ok(())
}

pub fn validate_function_declarations(module: &Module) -> Result<(), Error> {
    for function in module.functions.iter().filter(|f| f.import.is_none()) {
        signature_use(module, function.type_index)?;
    }
    Ok(())
}

pub fn validate_table_defs(module: &Module) -> Result<(), Error> {
    for table in module.tables.iter().filter(|t| t.import.is_none()) {
        table.ty.check(&module.feature_spec)?;
    }
    if !module.feature_spec.reference_types && module.tables.len() > 1 {
        return validation(TOO_MANY_TABLES);
    }
    Ok(())
}

pub fn validate_memory_defs(module: &Module) -> Result<(), Error> {
    for memory in module.memories.iter().filter(|m| m.import.is_none()) {
        memory.ty.check(&module.feature_spec)?;
    }
    if module.memories.len() > 1 {
        return validation(TOO_MANY_MEMORIES);
    }
    Ok(())
}

pub fn validate_global_defs(module: &Module) -> Result<(), Error> {
    for global in module.globals.iter().filter(|g| g.import.is_none()) {
        global.ty.check(&module.feature_spec)?;
        match &global.init {
            Some(init) => {
                validate_initializer(module, init, global.ty.ty, "global initializer expression")?
            }
            None => return validation(INVALID_INITIALIZER),
        }
    }
    Ok(())
}

pub fn validate_exception_type_defs(module: &Module) -> Result<(), Error> {
    for exception_type in module.exception_types.iter().filter(|e| e.import.is_none()) {
        exception_type.ty.check(&module.feature_spec)?;
    }
    Ok(())
}

pub fn validate_exports(module: &Module) -> Result<(), Error> {
    let mut names = HashSet::new();
    for export in &module.exports {
        match export.kind {
            ExternKind::Func => check_index("function", export.index, module.functions.len())?,
            ExternKind::Table => check_index("table", export.index, module.tables.len())?,
            ExternKind::Memory => check_index("memory", export.index, module.memories.len())?,
            ExternKind::Global => {
                check_index("global", export.index, module.globals.len())?;
                let global = &module.globals[export.index as usize];
                if global.ty.mutable && !module.feature_spec.import_export_mutable_globals {
                    return validation(MUTABLE_GLOBAL_EXPORT);
                }
            }
            ExternKind::ExceptionType => {
                check_index("exception type", export.index, module.exception_types.len())?
            }
        }

        if !names.insert(export.name.as_str()) {
            return validation(format!("{}: {}", DUPLICATE_EXPORT_NAME, export.name));
        }
    }
    Ok(())
}

pub fn validate_start_function(module: &Module) -> Result<(), Error> {
    if let Some(start) = module.start {
        let ty = function_type(module, start)?;
        if !ty.params.is_empty() || !ty.results.is_empty() {
            return validation(START_FUNC_TYPE);
        }
    }
    Ok(())
}

pub fn validate_elem_segments(module: &Module) -> Result<(), Error> {
    for segment in &module.elem_segments {
        if let SegmentMode::Active { index, offset } = &segment.mode {
            check_index("table", *index, module.tables.len())?;
            let table_type = &module.tables[*index as usize].ty;
            if !is_elem_subtype(RefType::FuncRef, table_type.elem_type) {
                return validation(ELEM_SEGMENT_TABLE_TYPE);
            }
            validate_initializer(module, offset, ValType::I32, "elem segment base initializer")?;
        }
        for elem in &segment.elems {
            match elem {
                Elem::RefNull => {
                    if segment.mode.is_active() {
                        return validation(REF_NULL_IN_ACTIVE_SEGMENT);
                    }
                }
                Elem::RefFunc(index) => {
                    check_index("function", *index, module.functions.len())?;
                }
            }
        }
    }
    Ok(())
}

pub fn validate_data_segments(module: &Module) -> Result<(), Error> {
    for segment in &module.data_segments {
        if let SegmentMode::Active { index, offset } = &segment.mode {
            check_index("memory", *index, module.memories.len())?;
            validate_initializer(module, offset, ValType::I32, "data segment base initializer")?;
        }
    }
    Ok(())
}

// ---------------- Module Validation ----------------
// Declarations in dependency order, then every defined function body.
pub fn validate_module(module: &Module) -> Result<(), Error> {
    validate_types(module)?;
    validate_imports(module)?;
    validate_function_declarations(module)?;
    validate_table_defs(module)?;
    validate_memory_defs(module)?;
    validate_global_defs(module)?;
    validate_exception_type_defs(module)?;
    validate_exports(module)?;
    validate_start_function(module)?;
    validate_elem_segments(module)?;
    validate_data_segments(module)?;

    for function in module.functions.iter().filter(|f| f.import.is_none()) {
        validate_function_body(module, function)?;
    }
    Ok(())
}
