use lgtm::Operator::*;
use lgtm::*;

// ---------------- Builders ----------------
fn add_func(module: &mut Module, params: Vec<ValType>, results: Vec<ValType>, body: Vec<Operator>) {
    let type_index = module.types.len() as u32;
    module.types.push(Signature::new(params, results));
    module.functions.push(Function {
        type_index,
        locals: vec![],
        body,
        import: None,
    });
}

fn func_module(
    features: FeatureSpec,
    params: Vec<ValType>,
    results: Vec<ValType>,
    body: Vec<Operator>,
) -> Module {
    let mut module = Module::new(features);
    add_func(&mut module, params, results, body);
    module
}

fn table(elem_type: RefType) -> Table {
    Table {
        ty: TableType {
            elem_type,
            size: SizeConstraints::at_least(1),
            shared: false,
        },
        import: None,
    }
}

fn default_memory() -> Memory {
    Memory {
        ty: MemoryType {
            size: SizeConstraints::at_least(1),
            shared: false,
        },
        import: None,
    }
}

fn shared_memory() -> Memory {
    Memory {
        ty: MemoryType {
            size: SizeConstraints::bounded(1, 16),
            shared: true,
        },
        import: None,
    }
}

fn import_global(module: &mut Module, ty: ValType, mutable: bool) {
    let field = format!("g{}", module.globals.len());
    module.imports.push(Import {
        module: "env".into(),
        field: field.clone(),
        kind: ExternKind::Global,
    });
    module.globals.push(Global {
        ty: GlobalType { ty, mutable },
        init: None,
        import: Some(ImportRef {
            module: "env".into(),
            field,
        }),
    });
}

fn define_global(module: &mut Module, ty: ValType, mutable: bool, init: InitializerExpression) {
    module.globals.push(Global {
        ty: GlobalType { ty, mutable },
        init: Some(init),
        import: None,
    });
}

fn mem_imm(align_log2: u32) -> MemImm {
    MemImm {
        align_log2,
        offset: 0,
    }
}

fn expect_valid(module: &Module) {
    if let Err(err) = validate_module(module) {
        panic!("expected valid module, got: {}", err.message());
    }
}

fn expect_invalid(module: &Module, expected: &str) {
    match validate_module(module) {
        Err(err) => assert!(
            err.message().starts_with(expected),
            "expected error starting with {:?}, got {:?}",
            expected,
            err.message()
        ),
        Ok(()) => panic!("expected error starting with {:?}, but module validated", expected),
    }
}

// ---------------- Basic Bodies ----------------
#[test]
fn const_result_is_accepted() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![I32Const(42), End],
    );
    expect_valid(&module);
}

#[test]
fn missing_result_at_end_is_rejected() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![I32Const(1), Drop, End],
    );
    expect_invalid(&module, "type mismatch: expected i32 but stack was empty");
}

#[test]
fn residual_stack_at_end_is_rejected() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(1), End],
    );
    expect_invalid(&module, "stack was not empty at end of control structure: i32");
}

#[test]
fn block_result_then_drop_is_accepted() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![Block(BlockSig::Result(ValType::I32)), I32Const(7), End, Drop, End],
    );
    expect_valid(&module);
}

#[test]
fn push_after_unreachable_still_typechecks_at_end() {
    // The i64 constant is pushed even in unreachable code, so the final end
    // sees an i64 where an i32 is required.
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![Unreachable, I64Const(0), End],
    );
    expect_invalid(&module, "type mismatch: expected i32 but got i64");
}

#[test]
fn unreachable_supplies_missing_result() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![Unreachable, End],
    );
    expect_valid(&module);
}

#[test]
fn br_on_empty_stack_is_rejected() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![Block(BlockSig::Result(ValType::I32)), Br(0), End, End],
    );
    expect_invalid(&module, "type mismatch: expected i32 but stack was empty");
}

#[test]
fn drop_on_empty_stack_is_rejected() {
    let module = func_module(FeatureSpec::default(), vec![], vec![], vec![Drop, End]);
    expect_invalid(&module, "type mismatch: expected any but stack was empty");
}

#[test]
fn truncated_body_is_rejected() {
    let module = func_module(FeatureSpec::default(), vec![], vec![], vec![]);
    expect_invalid(&module, "end of code reached before end of function");
}

#[test]
fn operator_after_final_end_is_rejected() {
    let module = func_module(FeatureSpec::default(), vec![], vec![], vec![End, Nop]);
    expect_invalid(&module, "operator after end of function: nop");
}

// ---------------- Structured Control ----------------
#[test]
fn if_else_with_result_is_accepted() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![
            I32Const(1),
            If(BlockSig::Result(ValType::I32)),
            I32Const(2),
            Else,
            I32Const(3),
            End,
            End,
        ],
    );
    expect_valid(&module);
}

#[test]
fn else_less_if_with_result_is_rejected() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![
            I32Const(1),
            If(BlockSig::Result(ValType::I32)),
            I32Const(2),
            End,
            Drop,
            End,
        ],
    );
    expect_invalid(&module, "else-less if must have identity signature");
}

#[test]
fn else_less_if_without_result_is_accepted() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(1), If(BlockSig::Empty), Nop, End, End],
    );
    expect_valid(&module);
}

#[test]
fn else_outside_if_is_rejected() {
    let module = func_module(FeatureSpec::default(), vec![], vec![], vec![Else, End]);
    expect_invalid(&module, "else only allowed in if context");
}

#[test]
fn loop_branch_consumes_loop_params() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(0), Loop(BlockSig::Type(1)), Br(0), End, End],
    );
    module.types.push(Signature::new(vec![ValType::I32], vec![]));
    expect_valid(&module);
}

#[test]
fn block_params_flow_into_the_block() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(7), Block(BlockSig::Type(1)), End, Drop, End],
    );
    module
        .types
        .push(Signature::new(vec![ValType::I32], vec![ValType::I32]));
    expect_valid(&module);
}

#[test]
fn block_params_require_multivalue() {
    let features = FeatureSpec {
        multiple_results_and_block_params: false,
        ..FeatureSpec::default()
    };
    let mut module = func_module(
        features,
        vec![],
        vec![],
        vec![I32Const(7), Block(BlockSig::Type(1)), End, Drop, End],
    );
    module
        .types
        .push(Signature::new(vec![ValType::I32], vec![ValType::I32]));
    expect_invalid(&module, "block has params, but \"multivalue\" extension is disabled");
}

#[test]
fn multiple_results_require_multivalue() {
    let features = FeatureSpec {
        multiple_results_and_block_params: false,
        ..FeatureSpec::default()
    };
    let mut module = Module::new(features);
    module
        .types
        .push(Signature::new(vec![], vec![ValType::I32, ValType::I32]));
    expect_invalid(
        &module,
        "function/block has multiple return values, but \"multivalue\" extension is disabled",
    );
}

#[test]
fn multi_value_function_results_are_accepted() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32, ValType::I32],
        vec![I32Const(1), I32Const(2), End],
    );
    expect_valid(&module);
}

#[test]
fn br_if_keeps_branch_arguments() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![I32Const(5), I32Const(1), BrIf(0), End],
    );
    expect_valid(&module);
}

#[test]
fn br_table_with_matching_targets_is_accepted() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![
            Block(BlockSig::Empty),
            I32Const(0),
            BrTable {
                targets: vec![0],
                default_target: 0,
            },
            End,
            End,
        ],
    );
    expect_valid(&module);
}

#[test]
fn br_table_arity_mismatch_is_rejected() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![
            Block(BlockSig::Result(ValType::I32)),
            Block(BlockSig::Empty),
            I32Const(0),
            BrTable {
                targets: vec![1],
                default_target: 0,
            },
            End,
            End,
            Drop,
            End,
        ],
    );
    expect_invalid(
        &module,
        "br_table targets must all take the same number of parameters",
    );
}

#[test]
fn branch_depth_out_of_range_is_rejected() {
    let module = func_module(FeatureSpec::default(), vec![], vec![], vec![Br(1), End]);
    expect_invalid(&module, "invalid label index: 1 (label count is 1)");
}

#[test]
fn return_type_mismatch_is_rejected() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![I64Const(1), Return, End],
    );
    expect_invalid(&module, "type mismatch: expected i32 but got i64 in ret operand");
}

// ---------------- Select ----------------
#[test]
fn untyped_select_unifies_numeric_operands() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![I32Const(1), I32Const(2), I32Const(0), Select { ty: None }, End],
    );
    expect_valid(&module);
}

#[test]
fn untyped_select_operand_mismatch_is_rejected() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(1), I64Const(2), I32Const(0), Select { ty: None }, Drop, End],
    );
    expect_invalid(
        &module,
        "non-typed select operands must have the same numeric type",
    );
}

#[test]
fn untyped_select_on_references_is_rejected() {
    let module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![RefNull, RefNull, I32Const(0), Select { ty: None }, Drop, End],
    );
    expect_invalid(&module, "non-typed select operands must be numeric types");
}

#[test]
fn untyped_select_with_two_bottom_operands_pushes_bottom() {
    // Both operands come from unreachable code; the pushed type is the
    // bottom type, which drop then accepts.
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![Unreachable, I32Const(0), Select { ty: None }, Drop, End],
    );
    expect_valid(&module);
}

#[test]
fn typed_select_accepts_reference_operands() {
    let module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![ValType::FuncRef],
        vec![
            RefNull,
            RefNull,
            I32Const(0),
            Select {
                ty: Some(ValType::FuncRef),
            },
            End,
        ],
    );
    expect_valid(&module);
}

#[test]
fn typed_select_requires_reference_types() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![
            I32Const(1),
            I32Const(2),
            I32Const(0),
            Select {
                ty: Some(ValType::I32),
            },
            End,
        ],
    );
    expect_invalid(&module, "typed select requires the reference-types feature");
}

// ---------------- Locals and Globals ----------------
#[test]
fn local_get_pushes_local_type() {
    let module = func_module(
        FeatureSpec::default(),
        vec![ValType::I32],
        vec![ValType::I32],
        vec![LocalGet(0), End],
    );
    expect_valid(&module);
}

#[test]
fn local_index_out_of_range_is_rejected() {
    let module = func_module(
        FeatureSpec::default(),
        vec![ValType::I32],
        vec![],
        vec![LocalGet(1), Drop, End],
    );
    expect_invalid(&module, "invalid local index: 1 (local count is 1)");
}

#[test]
fn local_set_type_mismatch_is_rejected() {
    let module = func_module(
        FeatureSpec::default(),
        vec![ValType::I32],
        vec![],
        vec![I64Const(0), LocalSet(0), End],
    );
    expect_invalid(&module, "type mismatch: expected i32 but got i64 in local.set operand");
}

#[test]
fn local_tee_keeps_the_value() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I64],
        vec![I64Const(9), LocalTee(0), End],
    );
    module.functions[0].locals = vec![ValType::I64];
    expect_valid(&module);
}

#[test]
fn local_declaration_is_feature_gated() {
    let mut module = func_module(FeatureSpec::default(), vec![], vec![], vec![End]);
    module.functions[0].locals = vec![ValType::V128];
    expect_invalid(&module, "invalid value type (v128)");
}

#[test]
fn global_get_pushes_global_type() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![GlobalGet(0), End],
    );
    import_global(&mut module, ValType::I32, false);
    expect_valid(&module);
}

#[test]
fn global_set_of_immutable_global_is_rejected() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(1), GlobalSet(0), End],
    );
    import_global(&mut module, ValType::I32, false);
    expect_invalid(&module, "attempting to mutate immutable global");
}

#[test]
fn global_set_of_mutable_global_is_accepted() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(1), GlobalSet(0), End],
    );
    define_global(&mut module, ValType::I32, true, InitializerExpression::I32Const(0));
    expect_valid(&module);
}

// ---------------- Initializer Expressions ----------------
#[test]
fn global_initializer_type_mismatch_is_rejected() {
    let mut module = Module::new(FeatureSpec::default());
    define_global(&mut module, ValType::I32, false, InitializerExpression::I64Const(0));
    expect_invalid(
        &module,
        "type mismatch: expected i32 but got i64 in global initializer expression",
    );
}

#[test]
fn global_initializer_may_read_imported_immutable_global() {
    let mut module = Module::new(FeatureSpec::default());
    import_global(&mut module, ValType::I32, false);
    define_global(&mut module, ValType::I32, false, InitializerExpression::GlobalGet(0));
    expect_valid(&module);
}

#[test]
fn global_initializer_may_not_read_defined_global() {
    let mut module = Module::new(FeatureSpec::default());
    define_global(&mut module, ValType::I32, false, InitializerExpression::I32Const(1));
    define_global(&mut module, ValType::I32, false, InitializerExpression::GlobalGet(0));
    expect_invalid(
        &module,
        "global variable initializer expression may only access imported globals",
    );
}

#[test]
fn global_initializer_may_not_read_mutable_global() {
    let mut module = Module::new(FeatureSpec::default());
    import_global(&mut module, ValType::I32, true);
    define_global(&mut module, ValType::I32, false, InitializerExpression::GlobalGet(0));
    expect_invalid(
        &module,
        "global variable initializer expression may only access immutable globals",
    );
}

#[test]
fn ref_null_initializer_satisfies_funcref_global() {
    let mut module = Module::new(FeatureSpec::all());
    define_global(&mut module, ValType::FuncRef, false, InitializerExpression::RefNull);
    expect_valid(&module);
}

#[test]
fn ref_func_initializer_checks_function_index() {
    let mut module = Module::new(FeatureSpec::all());
    define_global(&mut module, ValType::FuncRef, false, InitializerExpression::RefFunc(0));
    expect_invalid(&module, "invalid function index: 0 (function count is 0)");
}

#[test]
fn missing_initializer_on_defined_global_is_rejected() {
    let mut module = Module::new(FeatureSpec::default());
    module.globals.push(Global {
        ty: GlobalType {
            ty: ValType::I32,
            mutable: false,
        },
        init: None,
        import: None,
    });
    expect_invalid(&module, "invalid initializer expression");
}

// ---------------- Declarations ----------------
#[test]
fn mutable_global_import_requires_feature() {
    let features = FeatureSpec {
        import_export_mutable_globals: false,
        ..FeatureSpec::default()
    };
    let mut module = Module::new(features);
    import_global(&mut module, ValType::I32, true);
    expect_invalid(&module, "mutable globals cannot be imported");
}

#[test]
fn mutable_global_export_requires_feature() {
    let features = FeatureSpec {
        import_export_mutable_globals: false,
        ..FeatureSpec::default()
    };
    let mut module = Module::new(features);
    define_global(&mut module, ValType::I32, true, InitializerExpression::I32Const(0));
    module.exports.push(Export {
        name: "g".into(),
        kind: ExternKind::Global,
        index: 0,
    });
    expect_invalid(&module, "mutable globals cannot be exported");
}

#[test]
fn mutable_global_export_with_feature_is_accepted() {
    let mut module = Module::new(FeatureSpec::default());
    define_global(&mut module, ValType::I32, true, InitializerExpression::I32Const(0));
    module.exports.push(Export {
        name: "g".into(),
        kind: ExternKind::Global,
        index: 0,
    });
    expect_valid(&module);
}

#[test]
fn duplicate_export_names_are_rejected() {
    let mut module = func_module(FeatureSpec::default(), vec![], vec![], vec![End]);
    module.exports.push(Export {
        name: "run".into(),
        kind: ExternKind::Func,
        index: 0,
    });
    module.exports.push(Export {
        name: "run".into(),
        kind: ExternKind::Func,
        index: 0,
    });
    expect_invalid(&module, "duplicate export name: run");
}

#[test]
fn export_index_out_of_range_is_rejected() {
    let mut module = Module::new(FeatureSpec::default());
    module.exports.push(Export {
        name: "f".into(),
        kind: ExternKind::Func,
        index: 0,
    });
    expect_invalid(&module, "invalid function index: 0 (function count is 0)");
}

#[test]
fn start_function_must_take_and_return_nothing() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![ValType::I32],
        vec![],
        vec![End],
    );
    module.start = Some(0);
    expect_invalid(&module, "start function must not have any parameters or results");
}

#[test]
fn nullary_start_function_is_accepted() {
    let mut module = func_module(FeatureSpec::default(), vec![], vec![], vec![End]);
    module.start = Some(0);
    expect_valid(&module);
}

#[test]
fn too_many_memories_is_not_relaxed_by_reference_types() {
    let mut module = Module::new(FeatureSpec::all());
    module.memories.push(default_memory());
    module.memories.push(default_memory());
    expect_invalid(&module, "too many memories");
}

#[test]
fn second_table_requires_reference_types() {
    let mut module = Module::new(FeatureSpec::default());
    module.tables.push(table(RefType::FuncRef));
    module.tables.push(table(RefType::FuncRef));
    expect_invalid(&module, "too many tables");

    module.feature_spec = FeatureSpec::all();
    expect_valid(&module);
}

#[test]
fn memory_limits_must_be_ordered() {
    let mut module = Module::new(FeatureSpec::default());
    module.memories.push(Memory {
        ty: MemoryType {
            size: SizeConstraints::bounded(5, 2),
            shared: false,
        },
        import: None,
    });
    expect_invalid(&module, "size minimum must not be greater than maximum");
}

#[test]
fn memory_max_may_not_exceed_page_limit() {
    let mut module = Module::new(FeatureSpec::default());
    module.memories.push(Memory {
        ty: MemoryType {
            size: SizeConstraints::bounded(0, 100_000),
            shared: false,
        },
        import: None,
    });
    expect_invalid(&module, "maximum size exceeds limit");
}

#[test]
fn shared_memory_requires_atomics_and_bounded_max() {
    let mut module = Module::new(FeatureSpec::default());
    module.memories.push(shared_memory());
    expect_invalid(&module, "shared memory requires the atomics feature");

    let mut module = Module::new(FeatureSpec::all());
    module.memories.push(Memory {
        ty: MemoryType {
            size: SizeConstraints::at_least(1),
            shared: true,
        },
        import: None,
    });
    expect_invalid(&module, "shared memories must have a maximum size");

    let mut module = Module::new(FeatureSpec::all());
    module.memories.push(shared_memory());
    expect_valid(&module);
}

#[test]
fn shared_table_requires_shared_tables_and_bounded_max() {
    let mut module = Module::new(FeatureSpec::default());
    module.tables.push(Table {
        ty: TableType {
            elem_type: RefType::FuncRef,
            size: SizeConstraints::bounded(1, 8),
            shared: true,
        },
        import: None,
    });
    expect_invalid(&module, "shared table requires the shared-tables feature");

    let mut module = Module::new(FeatureSpec::all());
    module.tables.push(Table {
        ty: TableType {
            elem_type: RefType::FuncRef,
            size: SizeConstraints::at_least(1),
            shared: true,
        },
        import: None,
    });
    expect_invalid(&module, "shared tables must have a maximum size");
}

#[test]
fn declared_types_are_feature_gated() {
    let mut module = Module::new(FeatureSpec::default());
    module.types.push(Signature::new(vec![ValType::V128], vec![]));
    expect_invalid(&module, "invalid value type (v128)");

    let mut module = Module::new(FeatureSpec::default());
    define_global(&mut module, ValType::FuncRef, false, InitializerExpression::RefNull);
    expect_invalid(&module, "invalid value type (funcref)");
}

#[test]
fn function_signature_return_count_is_bounded() {
    let mut module = Module::new(FeatureSpec::default());
    add_func(&mut module, vec![], vec![ValType::I32; 17], vec![]);
    expect_invalid(&module, "function has more return values than lgtm can support");
}

// ---------------- Segments ----------------
#[test]
fn active_elem_segment_in_funcref_table_is_accepted() {
    let mut module = func_module(FeatureSpec::default(), vec![], vec![], vec![End]);
    module.tables.push(table(RefType::FuncRef));
    module.elem_segments.push(ElementSegment {
        mode: SegmentMode::Active {
            index: 0,
            offset: InitializerExpression::I32Const(0),
        },
        elems: vec![Elem::RefFunc(0)],
    });
    expect_valid(&module);
}

#[test]
fn active_elem_segment_requires_funcref_table() {
    let mut module = Module::new(FeatureSpec::all());
    module.tables.push(table(RefType::AnyRef));
    module.elem_segments.push(ElementSegment {
        mode: SegmentMode::Active {
            index: 0,
            offset: InitializerExpression::I32Const(0),
        },
        elems: vec![],
    });
    expect_invalid(&module, "active elem segments must be in funcref tables");
}

#[test]
fn elem_segment_offset_must_be_i32() {
    let mut module = Module::new(FeatureSpec::default());
    module.tables.push(table(RefType::FuncRef));
    module.elem_segments.push(ElementSegment {
        mode: SegmentMode::Active {
            index: 0,
            offset: InitializerExpression::I64Const(0),
        },
        elems: vec![],
    });
    expect_invalid(
        &module,
        "type mismatch: expected i32 but got i64 in elem segment base initializer",
    );
}

#[test]
fn ref_null_element_is_only_allowed_in_passive_segments() {
    let mut module = Module::new(FeatureSpec::default());
    module.tables.push(table(RefType::FuncRef));
    module.elem_segments.push(ElementSegment {
        mode: SegmentMode::Active {
            index: 0,
            offset: InitializerExpression::I32Const(0),
        },
        elems: vec![Elem::RefNull],
    });
    expect_invalid(&module, "ref.null is only allowed in passive segments");

    let mut module = Module::new(FeatureSpec::default());
    module.elem_segments.push(ElementSegment {
        mode: SegmentMode::Passive,
        elems: vec![Elem::RefNull],
    });
    expect_valid(&module);
}

#[test]
fn elem_segment_function_indices_are_checked() {
    let mut module = Module::new(FeatureSpec::default());
    module.elem_segments.push(ElementSegment {
        mode: SegmentMode::Passive,
        elems: vec![Elem::RefFunc(3)],
    });
    expect_invalid(&module, "invalid function index: 3 (function count is 0)");
}

#[test]
fn active_data_segment_checks_memory_and_offset() {
    let mut module = Module::new(FeatureSpec::default());
    module.data_segments.push(DataSegment {
        mode: SegmentMode::Active {
            index: 0,
            offset: InitializerExpression::I32Const(0),
        },
        data: vec![1, 2, 3],
    });
    expect_invalid(&module, "invalid memory index: 0 (memory count is 0)");

    let mut module = Module::new(FeatureSpec::default());
    module.memories.push(default_memory());
    module.data_segments.push(DataSegment {
        mode: SegmentMode::Active {
            index: 0,
            offset: InitializerExpression::F32Const(0),
        },
        data: vec![],
    });
    expect_invalid(
        &module,
        "type mismatch: expected i32 but got f32 in data segment base initializer",
    );

    let mut module = Module::new(FeatureSpec::default());
    module.data_segments.push(DataSegment {
        mode: SegmentMode::Passive,
        data: vec![0; 8],
    });
    expect_valid(&module);
}

// ---------------- Memory Operators ----------------
#[test]
fn load_and_store_with_natural_alignment_are_accepted() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![
            I32Const(0),
            I32Load(mem_imm(2)),
            Drop,
            I32Const(0),
            I32Const(1),
            I32Store(mem_imm(2)),
            End,
        ],
    );
    module.memories.push(default_memory());
    expect_valid(&module);
}

#[test]
fn load_alignment_above_natural_is_rejected() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(0), I32Load(mem_imm(3)), Drop, End],
    );
    module.memories.push(default_memory());
    expect_invalid(&module, "load or store alignment greater than natural alignment");
}

#[test]
fn load_without_default_memory_is_rejected() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(0), I32Load(mem_imm(2)), Drop, End],
    );
    expect_invalid(&module, "load or store in module without default memory");
}

#[test]
fn store_operand_type_is_checked() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(0), I64Const(1), I32Store(mem_imm(2)), End],
    );
    module.memories.push(default_memory());
    expect_invalid(&module, "type mismatch: expected i32 but got i64 in i32.store operand");
}

#[test]
fn memory_grow_returns_previous_size() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![ValType::I32],
        vec![I32Const(1), MemoryGrow(0), End],
    );
    module.memories.push(default_memory());
    expect_valid(&module);
}

#[test]
fn bulk_memory_operators_are_feature_gated() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![
            I32Const(0),
            I32Const(0),
            I32Const(0),
            MemoryCopy {
                dst_mem: 0,
                src_mem: 0,
            },
            End,
        ],
    );
    module.memories.push(default_memory());
    expect_invalid(&module, "memory.copy requires the bulk-memory-operations feature");

    module.feature_spec = FeatureSpec::all();
    expect_valid(&module);
}

#[test]
fn memory_init_checks_data_segment_index() {
    let mut module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![
            I32Const(0),
            I32Const(0),
            I32Const(0),
            MemoryInit {
                mem_index: 0,
                data_index: 0,
            },
            End,
        ],
    );
    module.memories.push(default_memory());
    expect_invalid(&module, "invalid data segment index: 0 (data segment count is 0)");
}

// ---------------- Atomics ----------------
#[test]
fn atomic_load_on_shared_memory_is_accepted() {
    let mut module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![I32Const(0), I32AtomicLoad(mem_imm(2)), Drop, End],
    );
    module.memories.push(shared_memory());
    expect_valid(&module);
}

#[test]
fn atomic_operator_requires_shared_memory_when_flag_is_set() {
    let mut module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![I32Const(0), I32AtomicLoad(mem_imm(2)), Drop, End],
    );
    module.memories.push(default_memory());
    expect_invalid(&module, "atomic memory operators require a memory with the shared flag");

    module.feature_spec.require_shared_flag_for_atomic_operators = false;
    expect_valid(&module);
}

#[test]
fn atomic_operator_without_memory_is_rejected() {
    let module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![I32Const(0), I32AtomicLoad(mem_imm(2)), Drop, End],
    );
    expect_invalid(&module, "atomic memory operator in module without default memory");
}

#[test]
fn atomic_alignment_must_be_natural() {
    let mut module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![I32Const(0), I32AtomicLoad(mem_imm(1)), Drop, End],
    );
    module.memories.push(shared_memory());
    expect_invalid(&module, "atomic memory operators must have natural alignment");
}

#[test]
fn atomic_rmw_and_cmpxchg_typecheck() {
    let mut module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![ValType::I64],
        vec![I32Const(0), I64Const(1), I64AtomicRmwAdd(mem_imm(3)), End],
    );
    module.memories.push(shared_memory());
    expect_valid(&module);

    let mut module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![ValType::I32],
        vec![
            I32Const(0),
            I64Const(1),
            I32Const(2),
            I32AtomicRmwCmpxchg(mem_imm(2)),
            End,
        ],
    );
    module.memories.push(shared_memory());
    expect_invalid(&module, "type mismatch: expected i32 but got i64");
}

#[test]
fn atomics_are_feature_gated() {
    let features = FeatureSpec {
        atomics: false,
        ..FeatureSpec::all()
    };
    let mut module = func_module(
        features,
        vec![],
        vec![],
        vec![I32Const(0), I32AtomicLoad(mem_imm(2)), Drop, End],
    );
    module.memories.push(default_memory());
    expect_invalid(&module, "i32.atomic.load requires the atomics feature");
}

// ---------------- Calls ----------------
#[test]
fn call_pops_arguments_and_pushes_results() {
    let mut module = Module::new(FeatureSpec::default());
    add_func(
        &mut module,
        vec![ValType::I32],
        vec![ValType::I32],
        vec![LocalGet(0), End],
    );
    add_func(
        &mut module,
        vec![],
        vec![ValType::I32],
        vec![I32Const(1), Call(0), End],
    );
    expect_valid(&module);
}

#[test]
fn call_argument_type_mismatch_is_rejected() {
    let mut module = Module::new(FeatureSpec::default());
    add_func(
        &mut module,
        vec![ValType::I32],
        vec![ValType::I32],
        vec![LocalGet(0), End],
    );
    add_func(
        &mut module,
        vec![],
        vec![ValType::I32],
        vec![F32Const(0), Call(0), End],
    );
    expect_invalid(&module, "type mismatch: expected i32 but got f32 in call arguments operand");
}

#[test]
fn call_index_out_of_range_is_rejected() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![Call(7), End],
    );
    expect_invalid(&module, "invalid function index: 7 (function count is 1)");
}

#[test]
fn call_indirect_through_funcref_table_is_accepted() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![
            I32Const(0),
            CallIndirect {
                type_index: 0,
                table_index: 0,
            },
            End,
        ],
    );
    module.tables.push(table(RefType::FuncRef));
    expect_valid(&module);
}

#[test]
fn call_indirect_requires_funcref_table() {
    let mut module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![
            I32Const(0),
            CallIndirect {
                type_index: 0,
                table_index: 0,
            },
            End,
        ],
    );
    module.tables.push(table(RefType::AnyRef));
    expect_invalid(&module, "call_indirect requires a table element type of funcref");
}

// ---------------- Tables and References ----------------
#[test]
fn table_get_pushes_element_type() {
    let mut module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![ValType::FuncRef],
        vec![I32Const(0), TableGet(0), End],
    );
    module.tables.push(table(RefType::FuncRef));
    expect_valid(&module);
}

#[test]
fn table_set_checks_element_type() {
    let mut module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![I32Const(0), I32Const(1), TableSet(0), End],
    );
    module.tables.push(table(RefType::FuncRef));
    expect_invalid(&module, "type mismatch: expected funcref but got i32 in table.set operand");
}

#[test]
fn table_grow_and_fill_typecheck() {
    let mut module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![ValType::I32],
        vec![
            RefNull,
            I32Const(4),
            TableGrow(0),
            Drop,
            I32Const(0),
            RefNull,
            I32Const(2),
            TableFill(0),
            TableSize(0),
            End,
        ],
    );
    module.tables.push(table(RefType::FuncRef));
    expect_valid(&module);
}

#[test]
fn table_copy_requires_element_subtype() {
    let mut module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![
            I32Const(0),
            I32Const(0),
            I32Const(0),
            TableCopy {
                dst_table: 1,
                src_table: 0,
            },
            End,
        ],
    );
    module.tables.push(table(RefType::FuncRef));
    module.tables.push(table(RefType::AnyRef));
    // funcref into anyref is fine...
    expect_valid(&module);

    // ...anyref into funcref is not.
    module.functions[0].body = vec![
        I32Const(0),
        I32Const(0),
        I32Const(0),
        TableCopy {
            dst_table: 0,
            src_table: 1,
        },
        End,
    ];
    expect_invalid(
        &module,
        "source table element type must be a subtype of the destination table element type",
    );
}

#[test]
fn table_operators_require_reference_types() {
    let mut module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(0), TableGet(0), Drop, End],
    );
    module.tables.push(table(RefType::FuncRef));
    expect_invalid(&module, "table.get requires the reference-types feature");
}

#[test]
fn ref_func_checks_function_index() {
    let module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![ValType::FuncRef],
        vec![RefFunc(9), End],
    );
    expect_invalid(&module, "invalid function index: 9 (function count is 1)");
}

#[test]
fn ref_is_null_accepts_any_reference() {
    let module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![ValType::I32],
        vec![RefNull, RefIsNull, End],
    );
    expect_valid(&module);
}

// ---------------- SIMD ----------------
#[test]
fn simd_arithmetic_typechecks() {
    let module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![
            V128Const([0; 16]),
            V128Const([1; 16]),
            I8x16Add,
            Drop,
            End,
        ],
    );
    expect_valid(&module);
}

#[test]
fn simd_operators_are_feature_gated() {
    let module = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![V128Const([0; 16]), Drop, End],
    );
    expect_invalid(&module, "v128.const requires the simd feature");
}

#[test]
fn splat_and_extract_lane_typecheck() {
    let module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![ValType::I64],
        vec![I64Const(1), I64x2Splat, I64x2ExtractLane(1), End],
    );
    expect_valid(&module);
}

#[test]
fn extract_lane_index_is_bounded() {
    let module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![V128Const([0; 16]), I8x16ExtractLaneS(16), Drop, End],
    );
    expect_invalid(&module, "invalid lane index: 16 (lane count is 16)");
}

#[test]
fn shuffle_lane_indices_are_bounded() {
    let module = func_module(
        FeatureSpec::all(),
        vec![],
        vec![],
        vec![
            V128Const([0; 16]),
            V128Const([0; 16]),
            I8x16Shuffle([32; 16]),
            Drop,
            End,
        ],
    );
    expect_invalid(&module, "invalid shuffle lane index: 32");
}

// ---------------- Exceptions ----------------
fn exception_module(features: FeatureSpec, body: Vec<Operator>) -> Module {
    let mut module = func_module(features, vec![], vec![], body);
    module.exception_types.push(ExceptionTypeDef {
        ty: ExceptionType {
            params: vec![ValType::I32],
        },
        import: None,
    });
    module
}

#[test]
fn try_throw_catch_is_accepted() {
    let module = exception_module(
        FeatureSpec::all(),
        vec![
            Try(BlockSig::Empty),
            I32Const(1),
            Throw(0),
            Catch(0),
            Drop,
            End,
            End,
        ],
    );
    expect_valid(&module);
}

#[test]
fn catch_all_pushes_no_exception_arguments() {
    let module = exception_module(
        FeatureSpec::all(),
        vec![Try(BlockSig::Empty), CatchAll, End, End],
    );
    expect_valid(&module);
}

#[test]
fn end_may_not_close_a_try_by_default() {
    let module = exception_module(FeatureSpec::all(), vec![Try(BlockSig::Empty), End, End]);
    expect_invalid(&module, "end may not occur in try context");
}

#[test]
fn end_may_close_a_try_when_the_policy_allows_it() {
    let features = FeatureSpec {
        allow_end_after_try: true,
        ..FeatureSpec::all()
    };
    let module = exception_module(features, vec![Try(BlockSig::Empty), End, End]);
    expect_valid(&module);
}

#[test]
fn catch_outside_try_is_rejected() {
    let module = exception_module(
        FeatureSpec::all(),
        vec![Block(BlockSig::Empty), Catch(0), End, End],
    );
    expect_invalid(&module, "catch only allowed in try/catch context");
}

#[test]
fn throw_pops_exception_arguments() {
    let module = exception_module(
        FeatureSpec::all(),
        vec![Try(BlockSig::Empty), Throw(0), Catch(0), Drop, End, End],
    );
    expect_invalid(&module, "type mismatch: expected i32 but stack was empty");
}

#[test]
fn rethrow_must_target_a_catch() {
    let module = exception_module(
        FeatureSpec::all(),
        vec![
            Try(BlockSig::Empty),
            I32Const(1),
            Throw(0),
            Catch(0),
            Drop,
            Rethrow(0),
            End,
            End,
        ],
    );
    expect_valid(&module);

    let module = exception_module(
        FeatureSpec::all(),
        vec![Block(BlockSig::Empty), Rethrow(0), End, End],
    );
    expect_invalid(&module, "rethrow must target a catch");
}

#[test]
fn exception_operators_are_feature_gated() {
    let module = exception_module(
        FeatureSpec::default(),
        vec![Try(BlockSig::Empty), CatchAll, End, End],
    );
    expect_invalid(&module, "try requires the exception-handling feature");
}

// ---------------- Streaming Facade ----------------
#[test]
fn streaming_facade_accepts_operators_one_at_a_time() {
    let module = func_module(FeatureSpec::default(), vec![], vec![ValType::I32], vec![]);
    let mut validator = CodeValidator::new(&module, &module.functions[0]).unwrap();
    validator.op(&I32Const(3)).unwrap();
    assert!(validator.finish().is_err());
    validator.op(&End).unwrap();
    validator.finish().unwrap();

    let err = validator.op(&Nop).unwrap_err();
    assert!(err.message().starts_with("operator after end of function: nop"));
}

// ---------------- Feature Monotonicity ----------------
#[test]
fn enabling_more_features_preserves_acceptance() {
    let mut modules = vec![
        func_module(
            FeatureSpec::default(),
            vec![],
            vec![ValType::I32],
            vec![I32Const(42), End],
        ),
        func_module(
            FeatureSpec::default(),
            vec![],
            vec![],
            vec![Block(BlockSig::Result(ValType::I32)), I32Const(7), End, Drop, End],
        ),
        func_module(
            FeatureSpec::default(),
            vec![],
            vec![ValType::I32, ValType::I32],
            vec![I32Const(1), I32Const(2), End],
        ),
    ];
    let mut with_memory = func_module(
        FeatureSpec::default(),
        vec![],
        vec![],
        vec![I32Const(0), I32Load(mem_imm(2)), Drop, End],
    );
    with_memory.memories.push(default_memory());
    modules.push(with_memory);

    for mut module in modules.drain(..) {
        expect_valid(&module);
        module.feature_spec = FeatureSpec::all();
        expect_valid(&module);
    }
}
