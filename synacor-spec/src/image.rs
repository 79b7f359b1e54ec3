//! # Binary Images
//!
//! A Synacor image is a flat sequence of little-endian 16-bit words with no
//! header and no length prefix. Memory dumps use the same encoding.
//!
//! ```text
//! Offset  Size  Field
//! ──────────────────────────
//! 0x00    2     word 0
//! 0x02    2     word 1
//! ...
//! ```
//!
//! A trailing odd byte is ignored.

use crate::error::{Result, SpecError};
use crate::opcode::Opcode;
use crate::operand::reg;
use crate::{ADDRESS_SPACE, NEWLINE};
use std::fs;
use std::path::Path;

/// Loadable program image
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Image {
    words: Vec<u16>,
}

impl Image {
    /// Create an image from words
    pub fn new(words: Vec<u16>) -> Self {
        Self { words }
    }

    /// Built-in self-test program
    ///
    /// Stores `4 + r1` into r0, writes r0 as a character, writes a newline
    /// and halts. With r1 preset to `'A'` the program prints `E`.
    pub fn self_test() -> Self {
        Self::new(vec![
            Opcode::Add.to_word(),
            reg(0),
            reg(1),
            4,
            Opcode::Out.to_word(),
            reg(0),
            Opcode::Out.to_word(),
            NEWLINE,
            Opcode::Halt.to_word(),
        ])
    }

    /// Decode little-endian bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let words = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Self { words }
    }

    /// Encode to little-endian bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_words(&self.words)
    }

    /// Read an image file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SpecError::ImageNotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        let image = Self::from_bytes(&bytes);
        image.validate()?;
        Ok(image)
    }

    /// Check that the image fits in the address space
    pub fn validate(&self) -> Result<()> {
        if self.words.len() > ADDRESS_SPACE {
            return Err(SpecError::ImageTooLarge(self.words.len()));
        }
        Ok(())
    }

    /// Write the image to a file
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }

    pub fn into_words(self) -> Vec<u16> {
        self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<Vec<u16>> for Image {
    fn from(words: Vec<u16>) -> Self {
        Self::new(words)
    }
}

/// Encode words as little-endian bytes
pub fn encode_words(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}
