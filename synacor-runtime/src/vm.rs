//! Virtual Machine for the Synacor architecture

use crate::error::{Result, RuntimeError};
use crate::execute::{lookup, Flow, Operands, Operation};
use crate::io::IOHandler;
use crate::memory::Memory;
use crate::state::{HaltReason, VMState};
use std::path::{Path, PathBuf};
use synacor_spec::Image;
use tracing::{debug, trace};

/// VM configuration
#[derive(Debug, Clone)]
pub struct VMConfig {
    /// Log every executed instruction at trace level
    pub trace: bool,

    /// File written by the `!history` console command
    pub history_path: PathBuf,

    /// File written by the `!dump` console command
    pub dump_path: PathBuf,
}

impl Default for VMConfig {
    fn default() -> Self {
        Self {
            trace: false,
            history_path: PathBuf::from("history.txt"),
            dump_path: PathBuf::from("dump.bin"),
        }
    }
}

/// Execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Number of instructions executed
    pub steps: u64,

    /// Reason for halting
    pub halt_reason: HaltReason,

    /// Lines written by the program
    pub output: Vec<String>,
}

/// Synacor Virtual Machine
#[derive(Debug)]
pub struct VM {
    /// Registers, stack, memory, PC and halt flag
    pub(crate) state: VMState,

    /// Character I/O and debug console
    pub(crate) io: IOHandler,

    /// Configuration
    pub(crate) config: VMConfig,
}

impl VM {
    /// Create a VM from an in-memory image
    ///
    /// All machine state starts fresh and the I/O handler is reset.
    pub fn from_image(image: Image, config: VMConfig, mut io: IOHandler) -> Result<Self> {
        image.validate()?;
        io.reset();
        debug!(words = image.len(), "image loaded");
        Ok(Self {
            state: VMState::new(Memory::from_image(image)),
            io,
            config,
        })
    }

    /// Load an image file
    pub fn load(path: impl AsRef<Path>, config: VMConfig, io: IOHandler) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading image");
        Self::from_image(Image::read(path)?, config, io)
    }

    /// Load the built-in self-test program with r1 preset to `'A'`
    pub fn load_test(config: VMConfig, io: IOHandler) -> Self {
        let mut io = io;
        io.reset();
        let mut state = VMState::new(Memory::from_image(Image::self_test()));
        state.registers[1] = 'A' as u16;
        debug!("self-test image loaded");
        Self { state, io, config }
    }

    /// Run the VM until halt
    ///
    /// Running an already halted VM returns immediately.
    pub fn run(&mut self) -> Result<ExecutionResult> {
        while !self.state.halted {
            self.step()?;
        }

        let halt_reason = self.state.halt_reason.unwrap_or(HaltReason::Halt);
        debug!(?halt_reason, steps = self.state.steps, pc = self.state.pc, "halted");

        Ok(ExecutionResult {
            steps: self.state.steps,
            halt_reason,
            output: self.io.output_lines().to_vec(),
        })
    }

    /// Execute a single instruction
    ///
    /// Does nothing once the VM has halted. A program counter past the end of
    /// memory halts with [`HaltReason::EndOfMemory`] instead of executing.
    pub fn step(&mut self) -> Result<()> {
        if self.state.halted {
            return Ok(());
        }
        let pc = self.state.pc;
        if pc >= self.state.memory.len() {
            self.state.halt(HaltReason::EndOfMemory);
            return Ok(());
        }

        let (operation, operands) = self.fetch_and_decode(pc)?;

        if self.config.trace {
            trace!(
                step = self.state.steps,
                "PC={:04X} {} {:?}",
                pc,
                operation.name(),
                &operands.raw[..operation.operand_count()]
            );
        }

        match (operation.handler)(self, &operands)? {
            Flow::Next => self.state.pc = pc + operation.opcode.width(),
            Flow::Jump(target) => self.state.pc = target,
            Flow::Repeat => {}
            Flow::Halt(reason) => self.state.halt(reason),
        }

        self.state.steps += 1;
        Ok(())
    }

    /// Fetch the opcode and operand words at `pc`
    fn fetch_and_decode(&self, pc: usize) -> Result<(&'static Operation, Operands)> {
        let fault = |address| RuntimeError::AddressOutOfRange { pc, address };

        let word = self.state.memory.read(pc).map_err(|f| fault(f.address))?;
        let operation = lookup(pc, word)?;

        let mut raw = [0u16; 3];
        for (i, slot) in raw.iter_mut().take(operation.operand_count()).enumerate() {
            *slot = self
                .state
                .memory
                .read(pc + 1 + i)
                .map_err(|f| fault(f.address))?;
        }

        Ok((
            operation,
            Operands {
                pc,
                opcode: operation.opcode,
                raw,
            },
        ))
    }

    /// Get current state (for debugging)
    pub fn state(&self) -> &VMState {
        &self.state
    }

    /// Mutable state, for presetting registers or memory before a run
    pub fn state_mut(&mut self) -> &mut VMState {
        &mut self.state
    }

    pub fn io(&self) -> &IOHandler {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut IOHandler {
        &mut self.io
    }

    pub fn config(&self) -> &VMConfig {
        &self.config
    }

    pub fn is_halted(&self) -> bool {
        self.state.halted
    }
}
