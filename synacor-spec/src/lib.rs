//! # Synacor Architecture Specification
//!
//! Shared definitions for the Synacor 16-bit virtual machine.
//!
//! ## Key Features
//! - 15-bit address space (32768 words of 16 bits each)
//! - 8 registers, addressed by operands 32768..=32775
//! - Unbounded stack
//! - 22 fixed instructions, one opcode word followed by 0-3 operand words
//! - Little-endian word images with no header

pub mod error;
pub mod image;
pub mod opcode;
pub mod operand;

pub use error::{Result, SpecError};
pub use image::Image;
pub use opcode::Opcode;
pub use operand::Operand;

/// Number of registers
pub const NUM_REGISTERS: usize = 8;

/// Size of the address space in words
pub const ADDRESS_SPACE: usize = 1 << 15;

/// Arithmetic modulus; every arithmetic result wraps to this
pub const MODULUS: u32 = 1 << 15;

/// Largest literal value (also the 15-bit mask)
pub const MAX_LITERAL: u16 = 0x7FFF;

/// First operand value that names a register
pub const REGISTER_BASE: u16 = 0x8000;

/// Last operand value that names a register
pub const REGISTER_LAST: u16 = REGISTER_BASE + NUM_REGISTERS as u16 - 1;

/// Character code that flushes the output line and completes an input line
pub const NEWLINE: u16 = b'\n' as u16;
