//! # Synacor Runtime
//!
//! Execute Synacor binary images.
//!
//! This runtime provides a virtual machine with 8 registers, an unbounded
//! stack and 32768 words of memory, driven by a fetch-decode-execute loop over
//! the 22 published instructions. Input typed at the console doubles as a
//! debugger: lines starting with a reserved `!` command inspect or modify the
//! machine instead of reaching the program.
//!
//! ## Example
//!
//! ```rust
//! use synacor_runtime::{HaltReason, IOHandler, VM, VMConfig};
//!
//! let mut vm = VM::load_test(VMConfig::default(), IOHandler::default());
//! let result = vm.run().unwrap();
//! assert_eq!(result.output, vec!["E".to_string()]);
//! assert_eq!(result.halt_reason, HaltReason::Halt);
//! ```

pub mod debug;
pub mod error;
pub mod execute;
pub mod io;
pub mod memory;
pub mod state;
pub mod vm;

pub use debug::{Command, UsageError};
pub use error::RuntimeError;
pub use execute::{Flow, Operation, DISPATCH};
pub use io::IOHandler;
pub use memory::Memory;
pub use state::{resolve, HaltReason, VMState};
pub use vm::{ExecutionResult, VMConfig, VM};

/// Simple execution helper
///
/// Runs an image against scripted input and returns the program's output lines.
pub fn run(image: synacor_spec::Image, input: &str) -> Result<Vec<String>, RuntimeError> {
    let mut vm = VM::from_image(image, VMConfig::default(), IOHandler::scripted(input))?;
    Ok(vm.run()?.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use synacor_spec::{Image, Opcode};

    #[test]
    fn test_public_exports() {
        let _ = VMConfig::default();
        let _ = HaltReason::Halt;
        let _ = Memory::new();
        assert_eq!(DISPATCH.len(), Opcode::COUNT);
    }

    #[test]
    fn test_run_helper() {
        let image = Image::new(vec![
            Opcode::Out.to_word(),
            'o' as u16,
            Opcode::Out.to_word(),
            'k' as u16,
            Opcode::Out.to_word(),
            10,
        ]);
        assert_eq!(run(image, "").unwrap(), vec!["ok".to_string()]);
    }

    #[test]
    fn test_runtime_error_reexport() {
        let err = RuntimeError::DivisionByZero { pc: 3 };
        assert_eq!(err.to_string(), "Division by zero at PC 0x0003");
    }
}
