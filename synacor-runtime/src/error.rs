//! Runtime error types for the Synacor VM

use synacor_spec::SpecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Load error: {0}")]
    Load(#[from] SpecError),

    #[error("Unknown opcode {word} at PC {pc:#06x}")]
    UnknownOpcode { pc: usize, word: u16 },

    #[error("Illegal operand {value} at PC {pc:#06x}")]
    IllegalOperand { pc: usize, value: u16 },

    #[error("Invalid destination at PC {pc:#06x}: operand {operand} is not a register")]
    InvalidDestination { pc: usize, operand: u16 },

    #[error("Division by zero at PC {pc:#06x}")]
    DivisionByZero { pc: usize },

    #[error("Memory address {address:#06x} out of range at PC {pc:#06x}")]
    AddressOutOfRange { pc: usize, address: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Check if this is an execution fault that aborted a run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RuntimeError::UnknownOpcode { .. }
                | RuntimeError::IllegalOperand { .. }
                | RuntimeError::InvalidDestination { .. }
                | RuntimeError::DivisionByZero { .. }
                | RuntimeError::AddressOutOfRange { .. }
        )
    }

    /// Program counter of the faulting instruction
    pub fn pc(&self) -> Option<usize> {
        match self {
            RuntimeError::UnknownOpcode { pc, .. }
            | RuntimeError::IllegalOperand { pc, .. }
            | RuntimeError::InvalidDestination { pc, .. }
            | RuntimeError::DivisionByZero { pc }
            | RuntimeError::AddressOutOfRange { pc, .. } => Some(*pc),
            RuntimeError::Load(_) | RuntimeError::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};
    use std::path::PathBuf;

    #[test]
    fn test_unknown_opcode_display() {
        let err = RuntimeError::UnknownOpcode { pc: 0x10, word: 99 };
        assert_eq!(err.to_string(), "Unknown opcode 99 at PC 0x0010");
    }

    #[test]
    fn test_invalid_destination_display() {
        let err = RuntimeError::InvalidDestination { pc: 4, operand: 12 };
        assert_eq!(
            err.to_string(),
            "Invalid destination at PC 0x0004: operand 12 is not a register"
        );
    }

    #[test]
    fn test_address_out_of_range_display() {
        let err = RuntimeError::AddressOutOfRange {
            pc: 0x20,
            address: 0x8000,
        };
        assert_eq!(
            err.to_string(),
            "Memory address 0x8000 out of range at PC 0x0020"
        );
    }

    #[test]
    fn test_load_error_from() {
        let spec_err = SpecError::ImageNotFound(PathBuf::from("nope.bin"));
        let err: RuntimeError = spec_err.into();
        assert!(err.to_string().contains("nope.bin"));
        assert!(!err.is_fatal());
        assert_eq!(err.pc(), None);
    }

    #[test]
    fn test_io_error_from() {
        let io_err = IoError::new(ErrorKind::BrokenPipe, "console closed");
        let err: RuntimeError = io_err.into();
        assert!(err.to_string().contains("console closed"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_is_fatal() {
        assert!(RuntimeError::DivisionByZero { pc: 0 }.is_fatal());
        assert!(RuntimeError::IllegalOperand { pc: 0, value: 40000 }.is_fatal());
        assert!(RuntimeError::UnknownOpcode { pc: 0, word: 30 }.is_fatal());
        assert_eq!(RuntimeError::DivisionByZero { pc: 7 }.pc(), Some(7));
    }
}
