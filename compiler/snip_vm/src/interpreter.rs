//! The bytecode interpreter.
//!
//! One operand stack shared by all frames and an explicit frame stack, so
//! snippet recursion never recurses on the host stack. Each frame records
//! where its operands start on the shared stack; returning truncates back to
//! that point.

use snip_ir::{ExceptionKind, MethodDef, Op, Value};
use tracing::{debug, trace};

use crate::config::VmConfig;
use crate::convert::{convert, unbox};
use crate::fault::{invalid_program, null_reference, Fault, VmResult};
use crate::library;
use crate::module::{MethodHandle, Module};
use crate::operators::{binary, unary};

/// An active method call.
#[derive(Debug)]
struct Frame {
    handle: MethodHandle,
    pc: usize,
    locals: Vec<Value>,
    /// Operand stack height when the frame was entered.
    base: usize,
}

/// Executes methods of one loaded module.
pub struct Vm<'a> {
    module: &'a Module,
    config: &'a VmConfig,
    stack: Vec<Value>,
    frames: Vec<Frame>,
}

impl<'a> Vm<'a> {
    pub fn new(module: &'a Module, config: &'a VmConfig) -> Self {
        Vm {
            module,
            config,
            stack: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Run `handle` with already bound arguments (see
    /// [`bind_arguments`](crate::bind_arguments)). Returns `Value::Void` for
    /// void methods.
    #[tracing::instrument(level = "debug", skip_all, fields(args = args.len()))]
    pub fn invoke(&mut self, handle: MethodHandle, args: Vec<Value>) -> VmResult<Value> {
        self.stack.clear();
        self.frames.clear();
        let method = self.method(handle)?;
        if args.len() != method.params.len() {
            return Err(invalid_program(&format!(
                "{} called with {} arguments",
                method.signature(),
                args.len()
            )));
        }
        self.enter(handle, args)?;
        let result = self.run();
        match &result {
            Ok(value) => debug!(result = %value, "invocation returned"),
            Err(fault) => debug!(%fault, "invocation faulted"),
        }
        result
    }

    fn method(&self, handle: MethodHandle) -> VmResult<&'a MethodDef> {
        let module: &'a Module = self.module;
        module
            .method(handle)
            .ok_or_else(|| invalid_program("call to a method outside the module"))
    }

    fn enter(&mut self, handle: MethodHandle, mut args: Vec<Value>) -> VmResult<()> {
        if self.frames.len() >= self.config.max_depth {
            return Err(Fault::of(ExceptionKind::InsufficientExecutionStackException));
        }
        let method = self.method(handle)?;
        trace!(method = %method.name, depth = self.frames.len(), "enter");
        args.resize(usize::from(method.locals), Value::Null);
        self.frames.push(Frame {
            handle,
            pc: 0,
            locals: args,
            base: self.stack.len(),
        });
        Ok(())
    }

    /// Leave the current frame. Returns the final result once the outermost
    /// frame has returned.
    fn leave(&mut self, value: Value, has_value: bool) -> Option<Value> {
        if let Some(frame) = self.frames.pop() {
            self.stack.truncate(frame.base);
        }
        if self.frames.is_empty() {
            return Some(value);
        }
        if has_value {
            self.stack.push(value);
        }
        None
    }

    fn frame(&mut self) -> VmResult<&mut Frame> {
        self.frames
            .last_mut()
            .ok_or_else(|| invalid_program("no active frame"))
    }

    fn pop(&mut self) -> VmResult<Value> {
        self.stack
            .pop()
            .ok_or_else(|| invalid_program("operand stack underflow"))
    }

    /// Pop the top `n` operands, in push order.
    fn pop_n(&mut self, n: usize) -> VmResult<Vec<Value>> {
        let at = self
            .stack
            .len()
            .checked_sub(n)
            .ok_or_else(|| invalid_program("operand stack underflow"))?;
        Ok(self.stack.split_off(at))
    }

    fn pop_bool(&mut self) -> VmResult<bool> {
        match self.pop()? {
            Value::Bool(b) => Ok(b),
            other => Err(invalid_program(&format!(
                "branch on {}",
                other.runtime_type_name()
            ))),
        }
    }

    fn jump(&mut self, target: u32) -> VmResult<()> {
        self.frame()?.pc = target as usize;
        Ok(())
    }

    fn run(&mut self) -> VmResult<Value> {
        loop {
            let (method, op) = {
                let frame = self.frame()?;
                let handle = frame.handle;
                let pc = frame.pc;
                frame.pc += 1;
                let method = self.method(handle)?;
                (method, method.code.get(pc).copied())
            };

            // Running off the end of the code is an implicit `return;`.
            let Some(op) = op else {
                if let Some(result) = self.leave(Value::Void, false) {
                    return Ok(result);
                }
                continue;
            };

            match op {
                Op::Const(index) => {
                    let value = method
                        .constants
                        .get(index as usize)
                        .ok_or_else(|| invalid_program("constant index out of range"))?
                        .to_value();
                    self.stack.push(value);
                }
                Op::LoadLocal(slot) => {
                    let value = self
                        .frame()?
                        .locals
                        .get(usize::from(slot))
                        .cloned()
                        .ok_or_else(|| invalid_program("local slot out of range"))?;
                    self.stack.push(value);
                }
                Op::StoreLocal(slot) => {
                    let value = self.pop()?;
                    let local = self
                        .frame()?
                        .locals
                        .get_mut(usize::from(slot))
                        .ok_or_else(|| invalid_program("local slot out of range"))?;
                    *local = value;
                }
                Op::Pop => {
                    self.pop()?;
                }
                Op::Dup => {
                    let top = self
                        .stack
                        .last()
                        .cloned()
                        .ok_or_else(|| invalid_program("operand stack underflow"))?;
                    self.stack.push(top);
                }
                Op::Nop => {}

                Op::Add
                | Op::Sub
                | Op::Mul
                | Op::Div
                | Op::Rem
                | Op::BitAnd
                | Op::BitOr
                | Op::BitXor
                | Op::Shl
                | Op::Shr
                | Op::Eq
                | Op::Ne
                | Op::Lt
                | Op::Le
                | Op::Gt
                | Op::Ge => {
                    let right = self.pop()?;
                    let left = self.pop()?;
                    self.stack.push(binary(op, &left, &right)?);
                }
                Op::Neg | Op::Not | Op::BitNot => {
                    let operand = self.pop()?;
                    self.stack.push(unary(op, &operand)?);
                }
                Op::Concat => {
                    let right = self.pop()?;
                    let left = self.pop()?;
                    self.stack.push(Value::string(format!("{left}{right}")));
                }
                Op::Convert(target) => {
                    let value = self.pop()?;
                    self.stack.push(convert(value, target)?);
                }
                Op::Unbox(target) => {
                    let value = self.pop()?;
                    self.stack.push(unbox(value, target)?);
                }

                Op::Jump(target) => self.jump(target)?,
                Op::JumpIfFalse(target) => {
                    if !self.pop_bool()? {
                        self.jump(target)?;
                    }
                }
                Op::JumpIfTrue(target) => {
                    if self.pop_bool()? {
                        self.jump(target)?;
                    }
                }

                Op::Call { class, method } => {
                    let handle = MethodHandle { class, method };
                    let arity = self.method(handle)?.params.len();
                    let args = self.pop_n(arity)?;
                    self.enter(handle, args)?;
                }
                Op::Intrinsic(intrinsic) => {
                    let args = self.pop_n(intrinsic.arity())?;
                    if let Some(value) = library::call(intrinsic, &args, &self.config.print)? {
                        self.stack.push(value);
                    }
                }

                Op::Return => {
                    let value = self.pop()?;
                    if let Some(result) = self.leave(value, true) {
                        return Ok(result);
                    }
                }
                Op::ReturnVoid => {
                    if let Some(result) = self.leave(Value::Void, false) {
                        return Ok(result);
                    }
                }
                Op::Throw => {
                    return Err(match self.pop()? {
                        Value::Exception(e) => Fault::thrown(&e),
                        Value::Null => null_reference(),
                        other => invalid_program(&format!(
                            "throw of {}",
                            other.runtime_type_name()
                        )),
                    });
                }
            }
        }
    }
}
