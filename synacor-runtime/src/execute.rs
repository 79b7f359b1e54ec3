//! Instruction execution for the Synacor VM
//!
//! Dispatch goes through [`DISPATCH`], a static table indexed by opcode value.
//! Each handler receives the raw operand words and reports how the program
//! counter moves next.

use crate::debug::Command;
use crate::error::{Result, RuntimeError};
use crate::memory::OutOfRange;
use crate::state::HaltReason;
use crate::vm::VM;
use synacor_spec::{Opcode, Operand, MAX_LITERAL, MODULUS};

/// Program counter movement after a handler runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance past the opcode and its operands
    Next,
    /// Continue at an absolute address
    Jump(usize),
    /// Execute the same instruction again
    Repeat,
    /// Stop without a fault; the program counter stays on this instruction
    Halt(HaltReason),
}

/// Operand words of the instruction being executed
#[derive(Debug, Clone, Copy)]
pub struct Operands {
    pub pc: usize,
    pub opcode: Opcode,
    pub raw: [u16; 3],
}

impl Operands {
    /// Resolve operand `i` to a value
    #[inline]
    fn value(&self, i: usize, vm: &VM) -> Result<u16> {
        vm.state
            .resolve(self.raw[i])
            .map_err(|_| RuntimeError::IllegalOperand {
                pc: self.pc,
                value: self.raw[i],
            })
    }

    /// Register index named by the destination operand
    ///
    /// Only opcodes that write a register have one; it is always the first operand.
    #[inline]
    fn dest(&self) -> Result<usize> {
        Operand::decode(self.raw[0])
            .ok()
            .and_then(Operand::register)
            .filter(|_| self.opcode.writes_register())
            .ok_or(RuntimeError::InvalidDestination {
                pc: self.pc,
                operand: self.raw[0],
            })
    }

    fn address_fault(&self, fault: OutOfRange) -> RuntimeError {
        RuntimeError::AddressOutOfRange {
            pc: self.pc,
            address: fault.address,
        }
    }
}

pub type Handler = fn(&mut VM, &Operands) -> Result<Flow>;

/// Opcode descriptor: name and operand count come from the opcode
#[derive(Clone, Copy)]
pub struct Operation {
    pub opcode: Opcode,
    pub handler: Handler,
}

impl Operation {
    const fn new(opcode: Opcode, handler: Handler) -> Self {
        Self { opcode, handler }
    }

    pub const fn name(&self) -> &'static str {
        self.opcode.name()
    }

    pub const fn operand_count(&self) -> usize {
        self.opcode.operand_count()
    }
}

/// Dispatch table, indexed by opcode value
pub static DISPATCH: [Operation; Opcode::COUNT] = [
    Operation::new(Opcode::Halt, op_halt),
    Operation::new(Opcode::Set, op_set),
    Operation::new(Opcode::Push, op_push),
    Operation::new(Opcode::Pop, op_pop),
    Operation::new(Opcode::Eq, op_eq),
    Operation::new(Opcode::Gt, op_gt),
    Operation::new(Opcode::Jmp, op_jmp),
    Operation::new(Opcode::Jt, op_jt),
    Operation::new(Opcode::Jf, op_jf),
    Operation::new(Opcode::Add, op_add),
    Operation::new(Opcode::Mult, op_mult),
    Operation::new(Opcode::Mod, op_mod),
    Operation::new(Opcode::And, op_and),
    Operation::new(Opcode::Or, op_or),
    Operation::new(Opcode::Not, op_not),
    Operation::new(Opcode::Rmem, op_rmem),
    Operation::new(Opcode::Wmem, op_wmem),
    Operation::new(Opcode::Call, op_call),
    Operation::new(Opcode::Ret, op_ret),
    Operation::new(Opcode::Out, op_out),
    Operation::new(Opcode::In, op_in),
    Operation::new(Opcode::Noop, op_noop),
];

/// Look up the descriptor for an opcode word
pub fn lookup(pc: usize, word: u16) -> Result<&'static Operation> {
    Opcode::from_word(word)
        .map(|opcode| &DISPATCH[opcode.to_word() as usize])
        .ok_or(RuntimeError::UnknownOpcode { pc, word })
}

/// Wrap to 15 bits
#[inline]
fn wrap(value: u32) -> u16 {
    (value % MODULUS) as u16
}

// ========== Stack and registers ==========

fn op_halt(_vm: &mut VM, _ops: &Operands) -> Result<Flow> {
    Ok(Flow::Halt(HaltReason::Halt))
}

fn op_set(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    let dst = ops.dest()?;
    vm.state.registers[dst] = ops.value(1, vm)?;
    Ok(Flow::Next)
}

fn op_push(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    let value = ops.value(0, vm)?;
    vm.state.stack.push(value);
    Ok(Flow::Next)
}

fn op_pop(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    if vm.state.stack.is_empty() {
        return Ok(Flow::Halt(HaltReason::StackUnderflow));
    }
    let dst = ops.dest()?;
    if let Some(value) = vm.state.stack.pop() {
        vm.state.registers[dst] = value;
    }
    Ok(Flow::Next)
}

// ========== Compare ==========

fn compare(vm: &mut VM, ops: &Operands, test: fn(u16, u16) -> bool) -> Result<Flow> {
    let dst = ops.dest()?;
    let b = ops.value(1, vm)?;
    let c = ops.value(2, vm)?;
    vm.state.registers[dst] = test(b, c) as u16;
    Ok(Flow::Next)
}

fn op_eq(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    compare(vm, ops, |b, c| b == c)
}

fn op_gt(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    compare(vm, ops, |b, c| b > c)
}

// ========== Jump ==========

fn op_jmp(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    Ok(Flow::Jump(ops.value(0, vm)? as usize))
}

fn op_jt(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    if ops.value(0, vm)? != 0 {
        Ok(Flow::Jump(ops.value(1, vm)? as usize))
    } else {
        Ok(Flow::Next)
    }
}

fn op_jf(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    if ops.value(0, vm)? == 0 {
        Ok(Flow::Jump(ops.value(1, vm)? as usize))
    } else {
        Ok(Flow::Next)
    }
}

// ========== Arithmetic and logical ==========

fn binary(vm: &mut VM, ops: &Operands, apply: fn(u32, u32) -> u32) -> Result<Flow> {
    let dst = ops.dest()?;
    let b = ops.value(1, vm)? as u32;
    let c = ops.value(2, vm)? as u32;
    vm.state.registers[dst] = wrap(apply(b, c));
    Ok(Flow::Next)
}

fn op_add(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    binary(vm, ops, |b, c| b + c)
}

fn op_mult(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    binary(vm, ops, |b, c| b * c)
}

fn op_mod(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    if ops.value(2, vm)? == 0 {
        return Err(RuntimeError::DivisionByZero { pc: ops.pc });
    }
    binary(vm, ops, |b, c| b % c)
}

fn op_and(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    binary(vm, ops, |b, c| b & c)
}

fn op_or(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    binary(vm, ops, |b, c| b | c)
}

fn op_not(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    let dst = ops.dest()?;
    vm.state.registers[dst] = !ops.value(1, vm)? & MAX_LITERAL;
    Ok(Flow::Next)
}

// ========== Memory ==========

fn op_rmem(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    let dst = ops.dest()?;
    let address = ops.value(1, vm)? as usize;
    let value = vm
        .state
        .memory
        .read(address)
        .map_err(|fault| ops.address_fault(fault))?;
    vm.state.registers[dst] = value;
    Ok(Flow::Next)
}

fn op_wmem(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    let address = ops.value(0, vm)? as usize;
    let value = ops.value(1, vm)?;
    vm.state
        .memory
        .write(address, value)
        .map_err(|fault| ops.address_fault(fault))?;
    Ok(Flow::Next)
}

// ========== Subroutine ==========

fn op_call(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    let target = ops.value(0, vm)? as usize;
    vm.state.stack.push((ops.pc + Opcode::Call.width()) as u16);
    Ok(Flow::Jump(target))
}

fn op_ret(vm: &mut VM, _ops: &Operands) -> Result<Flow> {
    match vm.state.stack.pop() {
        Some(address) => Ok(Flow::Jump(address as usize)),
        None => Ok(Flow::Halt(HaltReason::StackUnderflow)),
    }
}

// ========== System ==========

fn op_out(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    let code = ops.value(0, vm)?;
    vm.io.write_char(code)?;
    Ok(Flow::Next)
}

fn op_in(vm: &mut VM, ops: &Operands) -> Result<Flow> {
    let dst = ops.dest()?;

    if let Some(code) = vm.io.next_pending() {
        vm.state.registers[dst] = code;
        return Ok(Flow::Next);
    }

    let Some(line) = vm.io.read_line()? else {
        return Ok(Flow::Halt(HaltReason::InputExhausted));
    };

    if let Some(parsed) = Command::parse(&line) {
        vm.dispatch_command(parsed)?;
        return Ok(Flow::Repeat);
    }

    vm.io.deliver_line();
    match vm.io.next_pending() {
        Some(code) => {
            vm.state.registers[dst] = code;
            Ok(Flow::Next)
        }
        None => Ok(Flow::Repeat),
    }
}

fn op_noop(_vm: &mut VM, _ops: &Operands) -> Result<Flow> {
    Ok(Flow::Next)
}
