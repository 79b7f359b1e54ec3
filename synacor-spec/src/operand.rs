//! Operand encoding
//!
//! Every operand word is one of:
//! - `0..=32767`: a literal value
//! - `32768..=32775`: registers 0-7
//! - `32776..=65535`: illegal

use crate::error::{Result, SpecError};
use crate::{MAX_LITERAL, NUM_REGISTERS, REGISTER_BASE, REGISTER_LAST};
use std::fmt;

/// Decoded operand word
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Literal value (0-32767)
    Literal(u16),
    /// Register index (0-7)
    Register(usize),
}

impl Operand {
    /// Classify a raw operand word
    pub fn decode(raw: u16) -> Result<Self> {
        if raw <= MAX_LITERAL {
            Ok(Operand::Literal(raw))
        } else if is_register(raw) {
            Ok(Operand::Register((raw - REGISTER_BASE) as usize))
        } else {
            Err(SpecError::IllegalOperand(raw))
        }
    }

    /// Resolve against a register file
    #[inline]
    pub fn value(self, registers: &[u16; NUM_REGISTERS]) -> u16 {
        match self {
            Operand::Literal(value) => value,
            Operand::Register(index) => registers[index],
        }
    }

    /// Register index, if this operand names one
    #[inline]
    pub fn register(self) -> Option<usize> {
        match self {
            Operand::Register(index) => Some(index),
            Operand::Literal(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => write!(f, "{}", value),
            Operand::Register(index) => write!(f, "r{}", index),
        }
    }
}

/// Check if a raw operand word names a register
#[inline]
pub const fn is_register(raw: u16) -> bool {
    raw >= REGISTER_BASE && raw <= REGISTER_LAST
}

/// Register operand word for index 0-7
#[inline]
pub const fn reg(index: usize) -> u16 {
    REGISTER_BASE + index as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_boundaries() {
        assert_eq!(Operand::decode(0).unwrap(), Operand::Literal(0));
        assert_eq!(Operand::decode(32767).unwrap(), Operand::Literal(32767));
        assert_eq!(Operand::decode(32768).unwrap(), Operand::Register(0));
        assert_eq!(Operand::decode(32775).unwrap(), Operand::Register(7));
        assert!(matches!(
            Operand::decode(32776),
            Err(SpecError::IllegalOperand(32776))
        ));
        assert!(Operand::decode(u16::MAX).is_err());
    }

    #[test]
    fn test_is_register() {
        assert!(!is_register(32767));
        assert!(is_register(32768));
        assert!(is_register(32775));
        assert!(!is_register(32776));
    }

    #[test]
    fn test_value() {
        let mut registers = [0u16; NUM_REGISTERS];
        registers[3] = 1234;
        assert_eq!(Operand::Literal(77).value(&registers), 77);
        assert_eq!(Operand::Register(3).value(&registers), 1234);
    }

    #[test]
    fn test_display() {
        assert_eq!(Operand::Literal(42).to_string(), "42");
        assert_eq!(Operand::Register(5).to_string(), "r5");
    }

    #[test]
    fn test_reg_helper() {
        assert_eq!(reg(0), 0x8000);
        assert_eq!(reg(7), 0x8007);
        assert_eq!(Operand::decode(reg(4)).unwrap().register(), Some(4));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_literals_pass_through(raw in 0u16..=MAX_LITERAL) {
            prop_assert_eq!(Operand::decode(raw).unwrap(), Operand::Literal(raw));
            prop_assert!(!is_register(raw));
        }

        #[test]
        fn test_registers_resolve(raw in REGISTER_BASE..=REGISTER_LAST, fill in 0u16..=MAX_LITERAL) {
            let mut registers = [0u16; NUM_REGISTERS];
            registers[(raw - REGISTER_BASE) as usize] = fill;
            let operand = Operand::decode(raw).unwrap();
            prop_assert!(is_register(raw));
            prop_assert_eq!(operand.value(&registers), fill);
            prop_assert_eq!(operand.register(), Some((raw - REGISTER_BASE) as usize));
        }

        #[test]
        fn test_illegal_range(raw in (REGISTER_LAST + 1)..=u16::MAX) {
            prop_assert!(Operand::decode(raw).is_err());
            prop_assert!(!is_register(raw));
        }
    }
}
