//! VM state for the Synacor machine

use crate::memory::Memory;
use synacor_spec::{Operand, SpecError, NUM_REGISTERS};

/// VM state
#[derive(Debug, Clone, Default)]
pub struct VMState {
    /// Registers (r0-r7)
    pub registers: [u16; NUM_REGISTERS],

    /// Call/data stack
    pub stack: Vec<u16>,

    /// Memory
    pub memory: Memory,

    /// Program counter (index of the next opcode word)
    pub pc: usize,

    /// Executed instruction count
    pub steps: u64,

    /// Halted flag
    pub halted: bool,

    /// Halt reason
    pub halt_reason: Option<HaltReason>,
}

/// Ways a run ends without a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// HALT instruction
    Halt,
    /// POP or RET on an empty stack
    StackUnderflow,
    /// Program counter moved past the end of memory
    EndOfMemory,
    /// `!halt` or `!kill` from the debug console
    DebugCommand,
    /// Input source closed while the program was waiting for a character
    InputExhausted,
}

impl VMState {
    pub fn new(memory: Memory) -> Self {
        VMState {
            memory,
            ..Self::default()
        }
    }

    /// Resolve a raw operand to its value
    #[inline]
    pub fn resolve(&self, raw: u16) -> Result<u16, SpecError> {
        resolve(raw, &self.registers)
    }

    /// Halt execution
    pub fn halt(&mut self, reason: HaltReason) {
        self.halted = true;
        self.halt_reason = Some(reason);
    }
}

/// Literal pass-through for 0-32767, register contents for 32768-32775
#[inline]
pub fn resolve(raw: u16, registers: &[u16; NUM_REGISTERS]) -> Result<u16, SpecError> {
    Operand::decode(raw).map(|operand| operand.value(registers))
}

pub use synacor_spec::operand::is_register;
