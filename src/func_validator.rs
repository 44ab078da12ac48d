use crate::debug_println;
use crate::error::*;
use crate::module::{Function, Module};
use crate::module_validator::{check_index, function_type, global_index, signature_use};
use crate::operators::{BlockSig, MemAccess, Operator};
use crate::types::*;

// ---------------- Control Flow Structures ----------------
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ControlKind {
    Function,
    Block,
    IfThen,
    IfElse,
    Loop,
    Try,
    Catch,
}

// One active structured instruction. `params` is what a branch to this frame
// expects (the block params for loops, the results for everything else);
// `else_params` is what the else arm of an if starts with.
#[derive(Debug, Clone)]
struct ControlFrame {
    kind: ControlKind,
    outer_stack_size: usize,
    params: Vec<ValType>,
    results: Vec<ValType>,
    is_reachable: bool,
    else_params: Vec<ValType>,
}

// ---------------- Function Body Validator ----------------
// A symbolic abstract interpreter over the operand stack: operand types are
// tracked, values are not. While the innermost frame is unreachable, pops
// below the frame's floor yield the bottom type instead of underflowing.
struct FunctionValidator<'m> {
    module: &'m Module,
    func_type: Signature,
    locals: Vec<ValType>,
    stack: Vec<ValType>,
    control_stack: Vec<ControlFrame>,
}

impl<'m> FunctionValidator<'m> {
    fn new(module: &'m Module, func: &Function) -> Result<Self, Error> {
        let func_type = signature_use(module, func.type_index)?.clone();
        for local in &func.locals {
            local.check_feature(&module.feature_spec)?;
        }

        // Locals are the parameters followed by the declared locals.
        let mut locals = func_type.params.clone();
        locals.extend_from_slice(&func.locals);

        let results = func_type.results.clone();
        let mut validator = Self {
            module,
            func_type,
            locals,
            stack: Vec::with_capacity(64),
            control_stack: Vec::with_capacity(16),
        };
        validator.push_frame(ControlKind::Function, results.clone(), results, vec![]);
        Ok(validator)
    }

    // ---------------- Operand Stack Discipline ----------------
    fn inner_frame(&self) -> &ControlFrame {
        self.control_stack
            .last()
            .expect("operator dispatched with empty control stack")
    }

    fn peek(&self, context: &str, depth: usize, expected: ValType) -> Result<ValType, Error> {
        let frame = self.inner_frame();
        let actual = if self.stack.len() > frame.outer_stack_size + depth {
            self.stack[self.stack.len() - depth - 1]
        } else if !frame.is_reachable {
            // Unreachable code pops the bottom type, which satisfies anything.
            ValType::None
        } else {
            return validation(format!(
                "type mismatch: expected {} but stack was empty in {} operand",
                expected, context
            ));
        };

        if !is_subtype(actual, expected) {
            return validation(format!(
                "type mismatch: expected {} but got {} in {} operand",
                expected, actual, context
            ));
        }
        Ok(actual)
    }

    fn pop_expect(&mut self, context: &str, expected: ValType) -> Result<ValType, Error> {
        let actual = self.peek(context, 0, expected)?;
        if self.stack.len() > self.inner_frame().outer_stack_size {
            self.stack.pop();
        }
        Ok(actual)
    }

    fn pop_tuple(&mut self, context: &str, types: &[ValType]) -> Result<(), Error> {
        for &expected in types.iter().rev() {
            self.pop_expect(context, expected)?;
        }
        Ok(())
    }

    fn peek_tuple(&self, context: &str, types: &[ValType]) -> Result<(), Error> {
        for (position, &expected) in types.iter().enumerate() {
            self.peek(context, types.len() - position - 1, expected)?;
        }
        Ok(())
    }

    #[inline(always)]
    fn push(&mut self, ty: ValType) {
        self.stack.push(ty);
    }

    #[inline(always)]
    fn push_tuple(&mut self, types: &[ValType]) {
        self.stack.extend_from_slice(types);
    }

    fn enter_unreachable(&mut self) {
        let frame = self
            .control_stack
            .last_mut()
            .expect("operator dispatched with empty control stack");
        self.stack.truncate(frame.outer_stack_size);
        frame.is_reachable = false;
    }

    // ---------------- Control Stack ----------------
    fn push_frame(
        &mut self,
        kind: ControlKind,
        params: Vec<ValType>,
        results: Vec<ValType>,
        else_params: Vec<ValType>,
    ) {
        self.control_stack.push(ControlFrame {
            kind,
            outer_stack_size: self.stack.len(),
            params,
            results,
            is_reachable: true,
            else_params,
        });
    }

    // On normal exit of a frame, nothing may remain above its floor.
    fn check_frame_end(&self) -> Result<(), Error> {
        let frame = self.inner_frame();
        if self.stack.len() != frame.outer_stack_size {
            let residue = self.stack[frame.outer_stack_size..]
                .iter()
                .map(|ty| ty.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return validation(format!("{}: {}", STACK_NOT_EMPTY_AT_END, residue));
        }
        Ok(())
    }

    fn branch_target(&self, depth: u32) -> Result<&ControlFrame, Error> {
        check_index("label", depth, self.control_stack.len())?;
        Ok(&self.control_stack[self.control_stack.len() - depth as usize - 1])
    }

    fn local_type(&self, index: u32) -> Result<ValType, Error> {
        check_index("local", index, self.locals.len())?;
        Ok(self.locals[index as usize])
    }

    fn block_type(&self, sig: &BlockSig) -> Result<Signature, Error> {
        match sig {
            BlockSig::Empty => Ok(Signature::default()),
            BlockSig::Result(ty) => {
                ty.check_feature(&self.module.feature_spec)?;
                Ok(Signature::new(vec![], vec![*ty]))
            }
            BlockSig::Type(index) => {
                check_index("type", *index, self.module.types.len())?;
                let ty = self.module.types[*index as usize].clone();
                if !ty.params.is_empty() && !self.module.feature_spec.multiple_results_and_block_params
                {
                    return validation(BLOCK_PARAMS_DISABLED);
                }
                if ty.results.len() > 1 && !self.module.feature_spec.multiple_results_and_block_params
                {
                    return validation(BLOCK_RESULTS_DISABLED);
                }
                Ok(ty)
            }
        }
    }

    // Pop the current frame's results and check the stack is back at its
    // floor, then turn the frame into a catch arm.
    fn catch_transition(&mut self) -> Result<(), Error> {
        let results = self.inner_frame().results.clone();
        self.pop_tuple("try result", &results)?;
        self.check_frame_end()?;

        let frame = self
            .control_stack
            .last_mut()
            .expect("operator dispatched with empty control stack");
        if frame.kind == ControlKind::Try || frame.kind == ControlKind::Catch {
            frame.kind = ControlKind::Catch;
            frame.is_reachable = true;
            Ok(())
        } else {
            validation(CATCH_OUTSIDE_TRY)
        }
    }

    fn check_feature(&self, op: &Operator) -> Result<(), Error> {
        let feature = op.required_feature();
        if !self.module.feature_spec.has(feature) {
            return validation(format!(
                "{} requires the {} feature",
                op.name(),
                feature.name()
            ));
        }
        Ok(())
    }

    fn check_mem_access(&self, access: MemAccess) -> Result<(), Error> {
        if access.atomic {
            if self.module.memories.is_empty() {
                return validation(ATOMIC_NO_DEFAULT_MEMORY);
            }
            if self.module.feature_spec.require_shared_flag_for_atomic_operators
                && !self.module.memories[0].ty.shared
            {
                return validation(ATOMIC_REQUIRES_SHARED_MEMORY);
            }
            if access.imm.align_log2 != access.natural_align_log2 {
                return validation(ATOMIC_ALIGNMENT_NOT_NATURAL);
            }
        } else {
            if access.imm.align_log2 > access.natural_align_log2 {
                return validation(ALIGNMENT_TOO_LARGE);
            }
            if self.module.memories.is_empty() {
                return validation(NO_DEFAULT_MEMORY);
            }
        }
        Ok(())
    }

    // ---------------- Operator Dispatch ----------------
    fn step(&mut self, op: &Operator) -> Result<(), Error> {
        debug_println!(
            "validate {:24} frames={} stack={}",
            op.name(),
            self.control_stack.len(),
            self.stack.len()
        );
        self.check_feature(op)?;

        match op {
            Operator::Unreachable => self.enter_unreachable(),
            Operator::Nop => {}

            Operator::Block(sig) => {
                let ty = self.block_type(sig)?;
                self.pop_tuple("block arguments", &ty.params)?;
                self.push_frame(ControlKind::Block, ty.results.clone(), ty.results.clone(), vec![]);
                self.push_tuple(&ty.params);
            }
            Operator::Loop(sig) => {
                let ty = self.block_type(sig)?;
                self.pop_tuple("loop arguments", &ty.params)?;
                // A branch to a loop re-enters it, so the branch target type
                // is the params, not the results.
                self.push_frame(ControlKind::Loop, ty.params.clone(), ty.results.clone(), vec![]);
                self.push_tuple(&ty.params);
            }
            Operator::If(sig) => {
                let ty = self.block_type(sig)?;
                self.pop_expect("if condition", ValType::I32)?;
                self.pop_tuple("if arguments", &ty.params)?;
                self.push_frame(
                    ControlKind::IfThen,
                    ty.results.clone(),
                    ty.results.clone(),
                    ty.params.clone(),
                );
                self.push_tuple(&ty.params);
            }
            Operator::Else => {
                if self.inner_frame().kind != ControlKind::IfThen {
                    return validation(ELSE_OUTSIDE_IF);
                }
                let results = self.inner_frame().results.clone();
                self.pop_tuple("if result", &results)?;
                self.check_frame_end()?;

                let frame = self.control_stack.last_mut().expect("checked above");
                frame.kind = ControlKind::IfElse;
                frame.is_reachable = true;
                let else_params = frame.else_params.clone();
                self.push_tuple(&else_params);
            }
            Operator::End => {
                let frame = self.inner_frame().clone();
                if frame.kind == ControlKind::Try && !self.module.feature_spec.allow_end_after_try {
                    return validation(END_IN_TRY);
                }
                if frame.kind == ControlKind::IfThen && frame.results != frame.else_params {
                    return validation(IF_REQUIRES_IDENTITY_SIGNATURE);
                }
                self.pop_tuple("end result", &frame.results)?;
                self.check_frame_end()?;
                self.control_stack.pop();
                if !self.control_stack.is_empty() {
                    self.push_tuple(&frame.results);
                }
            }

            Operator::Try(sig) => {
                let ty = self.block_type(sig)?;
                self.pop_tuple("try arguments", &ty.params)?;
                self.push_frame(ControlKind::Try, ty.results.clone(), ty.results.clone(), vec![]);
                self.push_tuple(&ty.params);
            }
            Operator::Catch(index) => {
                check_index("exception type", *index, self.module.exception_types.len())?;
                let params = self.module.exception_types[*index as usize].ty.params.clone();
                self.catch_transition()?;
                self.push_tuple(&params);
            }
            Operator::CatchAll => {
                self.catch_transition()?;
            }
            Operator::Throw(index) => {
                check_index("exception type", *index, self.module.exception_types.len())?;
                let params = self.module.exception_types[*index as usize].ty.params.clone();
                self.pop_tuple("exception arguments", &params)?;
                self.enter_unreachable();
            }
            Operator::Rethrow(depth) => {
                if self.branch_target(*depth)?.kind != ControlKind::Catch {
                    return validation(RETHROW_TARGET_NOT_CATCH);
                }
                self.enter_unreachable();
            }

            Operator::Br(depth) => {
                let params = self.branch_target(*depth)?.params.clone();
                self.pop_tuple("br argument", &params)?;
                self.enter_unreachable();
            }
            Operator::BrIf(depth) => {
                let params = self.branch_target(*depth)?.params.clone();
                self.pop_expect("br_if condition", ValType::I32)?;
                self.pop_tuple("br_if argument", &params)?;
                // The fall-through path keeps the branch arguments.
                self.push_tuple(&params);
            }
            Operator::BrTable {
                targets,
                default_target,
            } => {
                self.pop_expect("br_table index", ValType::I32)?;
                let default_params = self.branch_target(*default_target)?.params.clone();
                for &target in targets {
                    let target_params = self.branch_target(target)?.params.clone();
                    if target_params.len() != default_params.len() {
                        return validation(BR_TABLE_ARITY_MISMATCH);
                    }
                    self.peek_tuple("br_table argument", &target_params)?;
                }
                self.pop_tuple("br_table argument", &default_params)?;
                self.enter_unreachable();
            }
            Operator::Return => {
                let results = self.func_type.results.clone();
                self.pop_tuple("ret", &results)?;
                self.enter_unreachable();
            }

            Operator::Call(index) => {
                let callee = function_type(self.module, *index)?.clone();
                self.pop_tuple("call arguments", &callee.params)?;
                self.push_tuple(&callee.results);
            }
            Operator::CallIndirect {
                type_index,
                table_index,
            } => {
                check_index("table", *table_index, self.module.tables.len())?;
                if self.module.tables[*table_index as usize].ty.elem_type != RefType::FuncRef {
                    return validation(CALL_INDIRECT_ELEM_TYPE);
                }
                let callee = signature_use(self.module, *type_index)?.clone();
                self.pop_expect("call_indirect function index", ValType::I32)?;
                self.pop_tuple("call_indirect arguments", &callee.params)?;
                self.push_tuple(&callee.results);
            }

            Operator::Drop => {
                self.pop_expect("drop", ValType::Any)?;
            }
            Operator::Select { ty: None } => {
                self.pop_expect("select condition", ValType::I32)?;
                let false_type = self.pop_expect("select false value", ValType::Any)?;
                let true_type = self.pop_expect("select true value", ValType::Any)?;

                if (false_type != ValType::None && !false_type.is_numeric())
                    || (true_type != ValType::None && !true_type.is_numeric())
                {
                    return validation(SELECT_OPERANDS_NOT_NUMERIC);
                }
                if false_type == ValType::None {
                    // Both operands may be the bottom type; then the bottom
                    // type is what gets pushed.
                    self.push(true_type);
                } else if true_type == ValType::None {
                    self.push(false_type);
                } else {
                    if false_type != true_type {
                        return validation(SELECT_OPERAND_MISMATCH);
                    }
                    self.push(false_type);
                }
            }
            Operator::Select { ty: Some(ty) } => {
                if !self.module.feature_spec.reference_types {
                    return validation("typed select requires the reference-types feature");
                }
                ty.check_feature(&self.module.feature_spec)?;
                self.pop_expect("select condition", ValType::I32)?;
                self.pop_expect("select false value", *ty)?;
                self.pop_expect("select true value", *ty)?;
                self.push(*ty);
            }

            Operator::LocalGet(index) => {
                let ty = self.local_type(*index)?;
                self.push(ty);
            }
            Operator::LocalSet(index) => {
                let ty = self.local_type(*index)?;
                self.pop_expect("local.set", ty)?;
            }
            Operator::LocalTee(index) => {
                let ty = self.local_type(*index)?;
                let actual = self.pop_expect("local.tee", ty)?;
                self.push(actual);
            }
            Operator::GlobalGet(index) => {
                let ty = global_index(self.module, *index, false, false, false)?;
                self.push(ty);
            }
            Operator::GlobalSet(index) => {
                let ty = global_index(self.module, *index, true, false, false)?;
                self.pop_expect("global.set", ty)?;
            }

            Operator::RefFunc(index) => {
                function_type(self.module, *index)?;
                self.push(ValType::FuncRef);
            }

            Operator::TableGet(index) => {
                check_index("table", *index, self.module.tables.len())?;
                let elem = self.module.tables[*index as usize].ty.elem_type.as_val_type();
                self.pop_expect("table.get", ValType::I32)?;
                self.push(elem);
            }
            Operator::TableSet(index) => {
                check_index("table", *index, self.module.tables.len())?;
                let elem = self.module.tables[*index as usize].ty.elem_type.as_val_type();
                self.pop_tuple("table.set", &[ValType::I32, elem])?;
            }
            Operator::TableGrow(index) => {
                check_index("table", *index, self.module.tables.len())?;
                let elem = self.module.tables[*index as usize].ty.elem_type.as_val_type();
                self.pop_tuple("table.grow", &[elem, ValType::I32])?;
                self.push(ValType::I32);
            }
            Operator::TableFill(index) => {
                check_index("table", *index, self.module.tables.len())?;
                let elem = self.module.tables[*index as usize].ty.elem_type.as_val_type();
                self.pop_tuple("table.fill", &[ValType::I32, elem, ValType::I32])?;
            }
            Operator::TableSize(index) => {
                check_index("table", *index, self.module.tables.len())?;
                self.push(ValType::I32);
            }
            Operator::TableCopy {
                dst_table,
                src_table,
            } => {
                check_index("table", *src_table, self.module.tables.len())?;
                check_index("table", *dst_table, self.module.tables.len())?;
                let src_elem = self.module.tables[*src_table as usize].ty.elem_type.as_val_type();
                let dst_elem = self.module.tables[*dst_table as usize].ty.elem_type.as_val_type();
                if !is_subtype(src_elem, dst_elem) {
                    return validation(TABLE_COPY_ELEM_TYPE);
                }
                self.pop_tuple("table.copy", &[ValType::I32, ValType::I32, ValType::I32])?;
            }
            Operator::TableInit {
                table_index,
                elem_index,
            } => {
                check_index("elem segment", *elem_index, self.module.elem_segments.len())?;
                check_index("table", *table_index, self.module.tables.len())?;
                self.pop_tuple("table.init", &[ValType::I32, ValType::I32, ValType::I32])?;
            }
            Operator::ElemDrop(index) => {
                check_index("elem segment", *index, self.module.elem_segments.len())?;
            }

            Operator::MemorySize(index) => {
                check_index("memory", *index, self.module.memories.len())?;
                self.push(ValType::I32);
            }
            Operator::MemoryGrow(index) => {
                check_index("memory", *index, self.module.memories.len())?;
                self.pop_expect("memory.grow", ValType::I32)?;
                self.push(ValType::I32);
            }
            Operator::MemoryCopy { dst_mem, src_mem } => {
                check_index("memory", *src_mem, self.module.memories.len())?;
                check_index("memory", *dst_mem, self.module.memories.len())?;
                self.pop_tuple("memory.copy", &[ValType::I32, ValType::I32, ValType::I32])?;
            }
            Operator::MemoryFill(index) => {
                check_index("memory", *index, self.module.memories.len())?;
                self.pop_tuple("memory.fill", &[ValType::I32, ValType::I32, ValType::I32])?;
            }
            Operator::MemoryInit {
                mem_index,
                data_index,
            } => {
                check_index("memory", *mem_index, self.module.memories.len())?;
                check_index("data segment", *data_index, self.module.data_segments.len())?;
                self.pop_tuple("memory.init", &[ValType::I32, ValType::I32, ValType::I32])?;
            }
            Operator::DataDrop(index) => {
                check_index("data segment", *index, self.module.data_segments.len())?;
            }

            // Everything else follows the uniform rule: immediates first,
            // then pop the declared params and push the declared results.
            op => {
                if let Some(access) = op.mem_access() {
                    self.check_mem_access(access)?;
                }
                if let Some((lane, num_lanes)) = op.lane_imm() {
                    if lane >= num_lanes {
                        return validation(format!(
                            "{}: {} (lane count is {})",
                            INVALID_LANE_INDEX, lane, num_lanes
                        ));
                    }
                }
                if let Operator::I8x16Shuffle(lanes) = op {
                    for &lane in lanes {
                        if lane >= 32 {
                            return validation(format!(
                                "{}: {}",
                                INVALID_SHUFFLE_LANE_INDEX, lane
                            ));
                        }
                    }
                }
                let (params, results) = op
                    .simple_signature()
                    .expect("operator missing from the simple-op table");
                self.pop_tuple(op.name(), params)?;
                self.push_tuple(results);
            }
        }
        Ok(())
    }
}

// ---------------- Streaming Facade ----------------
// A sink the decoder can drive one operator at a time, without building an
// AST: new -> op() per decoded operator -> finish() at end of body.
pub struct CodeValidator<'m> {
    ctx: FunctionValidator<'m>,
}

impl<'m> CodeValidator<'m> {
    pub fn new(module: &'m Module, func: &Function) -> Result<Self, Error> {
        Ok(Self {
            ctx: FunctionValidator::new(module, func)?,
        })
    }

    pub fn op(&mut self, op: &Operator) -> Result<(), Error> {
        // The function frame is popped by the body's final `end`; operators
        // past that point mean the body is malformed.
        if self.ctx.control_stack.is_empty() {
            return validation(format!("operator after end of function: {}", op.name()));
        }
        self.ctx.step(op)
    }

    pub fn finish(&self) -> Result<(), Error> {
        if !self.ctx.control_stack.is_empty() {
            return validation(END_OF_CODE_BEFORE_END_OF_FUNCTION);
        }
        Ok(())
    }
}

pub fn validate_function_body(module: &Module, func: &Function) -> Result<(), Error> {
    let mut validator = CodeValidator::new(module, func)?;
    for op in &func.body {
        validator.op(op)?;
    }
    validator.finish()
}
