//! # Synacor Opcode Definitions
//!
//! This module defines the opcode values for all Synacor instructions.
//! Opcodes occupy a full word but only 0x00-0x15 are assigned.
//!
//! ## Opcode Layout
//!
//! Opcodes are organized by instruction family:
//! - 0x00-0x03: Stack and registers (HALT, SET, PUSH, POP)
//! - 0x04-0x05: Compare (EQ, GT)
//! - 0x06-0x08: Jump (JMP, JT, JF)
//! - 0x09-0x0E: Arithmetic and logical (ADD, MULT, MOD, AND, OR, NOT)
//! - 0x0F-0x10: Memory (RMEM, WMEM)
//! - 0x11-0x12: Subroutine (CALL, RET)
//! - 0x13-0x15: System (OUT, IN, NOOP)

/// Instruction opcode (values 0x00-0x15)
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// HALT: stop execution
    Halt = 0x00,
    /// SET a b: a = b
    Set = 0x01,
    /// PUSH a: push a onto the stack
    Push = 0x02,
    /// POP a: a = pop (halts on an empty stack)
    Pop = 0x03,
    /// EQ a b c: a = (b == c) ? 1 : 0
    Eq = 0x04,
    /// GT a b c: a = (b > c) ? 1 : 0
    Gt = 0x05,
    /// JMP a: pc = a
    Jmp = 0x06,
    /// JT a b: if a != 0 then pc = b
    Jt = 0x07,
    /// JF a b: if a == 0 then pc = b
    Jf = 0x08,
    /// ADD a b c: a = (b + c) % 32768
    Add = 0x09,
    /// MULT a b c: a = (b * c) % 32768
    Mult = 0x0A,
    /// MOD a b c: a = b % c
    Mod = 0x0B,
    /// AND a b c: a = b & c
    And = 0x0C,
    /// OR a b c: a = b | c
    Or = 0x0D,
    /// NOT a b: a = !b (15 bits)
    Not = 0x0E,
    /// RMEM a b: a = mem[b]
    Rmem = 0x0F,
    /// WMEM a b: mem[a] = b
    Wmem = 0x10,
    /// CALL a: push pc + 2, pc = a
    Call = 0x11,
    /// RET: pc = pop (halts on an empty stack)
    Ret = 0x12,
    /// OUT a: write character a
    Out = 0x13,
    /// IN a: a = next input character
    In = 0x14,
    /// NOOP: no operation
    Noop = 0x15,
}

impl Opcode {
    /// Number of assigned opcodes
    pub const COUNT: usize = 22;

    /// Longest instruction, in words (opcode plus three operands)
    pub const MAX_WORDS: usize = 4;

    /// Every opcode, ordered by value
    pub const ALL: [Opcode; Opcode::COUNT] = [
        Opcode::Halt,
        Opcode::Set,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Eq,
        Opcode::Gt,
        Opcode::Jmp,
        Opcode::Jt,
        Opcode::Jf,
        Opcode::Add,
        Opcode::Mult,
        Opcode::Mod,
        Opcode::And,
        Opcode::Or,
        Opcode::Not,
        Opcode::Rmem,
        Opcode::Wmem,
        Opcode::Call,
        Opcode::Ret,
        Opcode::Out,
        Opcode::In,
        Opcode::Noop,
    ];

    /// Try to convert from a memory word
    pub fn from_word(word: u16) -> Option<Self> {
        Self::ALL.get(word as usize).copied()
    }

    /// Convert to a memory word
    #[inline]
    pub const fn to_word(self) -> u16 {
        self as u16
    }

    /// Mnemonic used by the published instruction set
    pub const fn name(self) -> &'static str {
        match self {
            Opcode::Halt => "halt",
            Opcode::Set => "set",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Eq => "eq",
            Opcode::Gt => "gt",
            Opcode::Jmp => "jmp",
            Opcode::Jt => "jt",
            Opcode::Jf => "jf",
            Opcode::Add => "add",
            Opcode::Mult => "mult",
            Opcode::Mod => "mod",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Not => "not",
            Opcode::Rmem => "rmem",
            Opcode::Wmem => "wmem",
            Opcode::Call => "call",
            Opcode::Ret => "ret",
            Opcode::Out => "out",
            Opcode::In => "in",
            Opcode::Noop => "noop",
        }
    }

    /// Number of operand words following the opcode
    pub const fn operand_count(self) -> usize {
        match self {
            Opcode::Halt | Opcode::Ret | Opcode::Noop => 0,
            Opcode::Push
            | Opcode::Pop
            | Opcode::Jmp
            | Opcode::Call
            | Opcode::Out
            | Opcode::In => 1,
            Opcode::Set | Opcode::Jt | Opcode::Jf | Opcode::Not | Opcode::Rmem | Opcode::Wmem => 2,
            Opcode::Eq
            | Opcode::Gt
            | Opcode::Add
            | Opcode::Mult
            | Opcode::Mod
            | Opcode::And
            | Opcode::Or => 3,
        }
    }

    /// Total instruction length in words
    #[inline]
    pub const fn width(self) -> usize {
        self.operand_count() + 1
    }

    /// Check if the first operand must name a register
    #[inline]
    pub const fn writes_register(self) -> bool {
        matches!(
            self,
            Opcode::Set
                | Opcode::Pop
                | Opcode::Eq
                | Opcode::Gt
                | Opcode::Add
                | Opcode::Mult
                | Opcode::Mod
                | Opcode::And
                | Opcode::Or
                | Opcode::Not
                | Opcode::Rmem
                | Opcode::In
        )
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values() {
        assert_eq!(Opcode::Halt.to_word(), 0x00);
        assert_eq!(Opcode::Jmp.to_word(), 0x06);
        assert_eq!(Opcode::Add.to_word(), 0x09);
        assert_eq!(Opcode::Rmem.to_word(), 0x0F);
        assert_eq!(Opcode::Out.to_word(), 0x13);
        assert_eq!(Opcode::Noop.to_word(), 0x15);
    }

    #[test]
    fn test_opcode_from_word() {
        assert_eq!(Opcode::from_word(0x00), Some(Opcode::Halt));
        assert_eq!(Opcode::from_word(0x14), Some(Opcode::In));
        assert_eq!(Opcode::from_word(0x16), None);
        assert_eq!(Opcode::from_word(0x8000), None);
    }

    #[test]
    fn test_all_is_ordered_by_value() {
        for (index, opcode) in Opcode::ALL.iter().enumerate() {
            assert_eq!(opcode.to_word() as usize, index);
        }
    }

    #[test]
    fn test_operand_counts() {
        assert_eq!(Opcode::Halt.operand_count(), 0);
        assert_eq!(Opcode::Set.operand_count(), 2);
        assert_eq!(Opcode::Push.operand_count(), 1);
        assert_eq!(Opcode::Eq.operand_count(), 3);
        assert_eq!(Opcode::Jt.operand_count(), 2);
        assert_eq!(Opcode::Not.operand_count(), 2);
        assert_eq!(Opcode::Ret.operand_count(), 0);
        assert_eq!(Opcode::In.operand_count(), 1);
        assert_eq!(Opcode::Add.width(), 4);
    }

    #[test]
    fn test_writes_register() {
        assert!(Opcode::Set.writes_register());
        assert!(Opcode::In.writes_register());
        assert!(Opcode::Rmem.writes_register());
        assert!(!Opcode::Wmem.writes_register());
        assert!(!Opcode::Push.writes_register());
        assert!(!Opcode::Out.writes_register());
    }

    #[test]
    fn test_display() {
        assert_eq!(Opcode::Mult.to_string(), "mult");
        assert_eq!(Opcode::Noop.to_string(), "noop");
    }
}
