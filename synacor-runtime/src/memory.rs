//! Memory subsystem

use synacor_spec::{Image, ADDRESS_SPACE};

/// Access outside the 15-bit address space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    pub address: usize,
}

/// Word-addressed memory
///
/// Holds exactly the loaded image and grows on writes past its end. Cells
/// that were never written read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    data: Vec<u16>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_image(image: Image) -> Self {
        Memory {
            data: image.into_words(),
        }
    }

    pub fn read(&self, address: usize) -> Result<u16, OutOfRange> {
        if address >= ADDRESS_SPACE {
            return Err(OutOfRange { address });
        }
        Ok(self.data.get(address).copied().unwrap_or(0))
    }

    pub fn write(&mut self, address: usize, value: u16) -> Result<(), OutOfRange> {
        if address >= ADDRESS_SPACE {
            return Err(OutOfRange { address });
        }
        if address >= self.data.len() {
            self.data.resize(address + 1, 0);
        }
        self.data[address] = value;
        Ok(())
    }

    /// Read up to `count` words starting at `address`, stopping at the end of memory
    pub fn range(&self, address: usize, count: usize) -> &[u16] {
        let start = address.min(self.data.len());
        let end = address.saturating_add(count).min(self.data.len());
        &self.data[start..end]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.data
    }

    /// Snapshot the current contents as a dumpable image
    pub fn to_image(&self) -> Image {
        Image::new(self.data.clone())
    }
}
