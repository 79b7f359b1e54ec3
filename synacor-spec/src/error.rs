//! # Error Types for the Synacor architecture

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    // Image errors
    #[error("Image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    #[error("Image too large: {0} words (address space: 32768 words)")]
    ImageTooLarge(usize),

    // Instruction errors
    #[error("Illegal operand: {0} (valid range: 0-32775)")]
    IllegalOperand(u16),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SpecError>;
