//! Debug console
//!
//! Completed input lines whose first word is one of the reserved `!` commands
//! are handled here instead of being delivered to the running program. All
//! numeric arguments are hexadecimal.

use crate::error::{Result, RuntimeError};
use crate::state::HaltReason;
use crate::vm::VM;
use std::fs;
use synacor_spec::{MAX_LITERAL, NUM_REGISTERS};
use thiserror::Error;
use tracing::{debug, warn};

const HELP: &[&str] = &[
    "[!] Available custom commands:",
    "[!] Command: !help - Prints the available custom commands.",
    "[!] Command: !history - Saves the past command history to disk.",
    "[!] Command: !halt - Sets the halt flag, killing the VM.",
    "[!] Command: !kill - Sets the halt flag, killing the VM.",
    "[!] Command: !dump - Dumps the current VM memory to disk.",
    "[!] Command: !pos - Prints the current execution position of the VM.",
    "[!] Command: !getreg - Prints the current register values.",
    "[!] Command: !getstack - Prints the current stack values.",
    "[!] Command: !setreg <index> <value> - Sets a register value.",
    "[!] Command: !poke <index> <value..> - Writes value(s) to memory.",
    "[!] Command: !peek <index> <count=1> - Reads value(s) from memory.",
];

/// Reserved console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    History,
    Halt,
    Dump,
    Pos,
    GetReg,
    GetStack,
    SetReg { index: usize, value: u16 },
    Poke { address: usize, values: Vec<u16> },
    Peek { address: usize, count: usize },
}

/// Malformed arguments to a reserved command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid arguments; {usage}")]
pub struct UsageError {
    pub usage: &'static str,
}

const SETREG_USAGE: UsageError = UsageError {
    usage: "!setreg <index> <value>",
};
const POKE_USAGE: UsageError = UsageError {
    usage: "!poke <index> <value..>",
};
const PEEK_USAGE: UsageError = UsageError {
    usage: "!peek <index> <count=1>",
};

impl Command {
    /// Parse a completed input line
    ///
    /// Returns `None` when the line is not reserved and belongs to the program.
    pub fn parse(line: &str) -> Option<std::result::Result<Command, UsageError>> {
        let mut words = line.split_whitespace();
        let name = words.next()?;
        let args: Vec<&str> = words.collect();

        let command = match name {
            "!help" => Ok(Command::Help),
            "!history" => Ok(Command::History),
            "!halt" | "!kill" => Ok(Command::Halt),
            "!dump" => Ok(Command::Dump),
            "!pos" => Ok(Command::Pos),
            "!getreg" => Ok(Command::GetReg),
            "!getstack" => Ok(Command::GetStack),
            "!setreg" => parse_setreg(&args),
            "!poke" => parse_poke(&args),
            "!peek" => parse_peek(&args),
            _ => return None,
        };
        Some(command)
    }
}

/// Hex index or count; range checks happen against the machine
fn parse_index(word: &str, usage: UsageError) -> std::result::Result<usize, UsageError> {
    usize::from_str_radix(word, 16).map_err(|_| usage)
}

/// Hex word value
fn parse_word(word: &str, usage: UsageError) -> std::result::Result<u16, UsageError> {
    u16::from_str_radix(word, 16).map_err(|_| usage)
}

fn parse_setreg(args: &[&str]) -> std::result::Result<Command, UsageError> {
    let [index, value] = args else {
        return Err(SETREG_USAGE);
    };
    let index = parse_index(index, SETREG_USAGE)?;
    let value = parse_word(value, SETREG_USAGE)?;
    if index >= NUM_REGISTERS || value > MAX_LITERAL {
        return Err(SETREG_USAGE);
    }
    Ok(Command::SetReg { index, value })
}

fn parse_poke(args: &[&str]) -> std::result::Result<Command, UsageError> {
    let Some((address, values)) = args.split_first() else {
        return Err(POKE_USAGE);
    };
    if values.is_empty() {
        return Err(POKE_USAGE);
    }
    let address = parse_index(address, POKE_USAGE)?;
    let values = values
        .iter()
        .map(|word| parse_word(word, POKE_USAGE))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Command::Poke { address, values })
}

fn parse_peek(args: &[&str]) -> std::result::Result<Command, UsageError> {
    let (address, count) = match args {
        [address] => (parse_index(address, PEEK_USAGE)?, 1),
        [address, count] => (
            parse_index(address, PEEK_USAGE)?,
            parse_index(count, PEEK_USAGE)?,
        ),
        _ => return Err(PEEK_USAGE),
    };
    Ok(Command::Peek { address, count })
}

fn format_words(words: &[u16]) -> String {
    words
        .iter()
        .map(|word| format!("{:04X}", word))
        .collect::<Vec<_>>()
        .join(" ")
}

impl VM {
    /// Run a parsed console command against the machine
    pub(crate) fn dispatch_command(
        &mut self,
        parsed: std::result::Result<Command, UsageError>,
    ) -> Result<()> {
        let command = match parsed {
            Ok(command) => command,
            Err(usage) => {
                warn!("{}", usage);
                self.io.report(format!("[!] {}", usage))?;
                return Ok(());
            }
        };
        debug!(?command, pc = self.state.pc, "debug command");

        match command {
            Command::Help => {
                for line in HELP {
                    self.io.report(*line)?;
                }
            }

            Command::History => {
                let path = &self.config.history_path;
                let mut text = String::new();
                for line in self.io.history() {
                    text.push_str(line);
                    text.push('\n');
                }
                let message = match fs::write(path, text) {
                    Ok(()) => format!("[!] Command history saved to: '{}'", path.display()),
                    Err(err) => {
                        warn!(%err, "failed to save history");
                        format!("[!] Failed to save command history: {}", err)
                    }
                };
                self.io.report(message)?;
            }

            Command::Halt => {
                self.state.halt(HaltReason::DebugCommand);
                self.io.report("[!] Virtual machine has been halted by force.")?;
            }

            Command::Dump => {
                let path = &self.config.dump_path;
                let message = match self.state.memory.to_image().write(path) {
                    Ok(()) => format!("[!] Memory dump saved to: '{}'", path.display()),
                    Err(err) => {
                        warn!(%err, "failed to save memory dump");
                        format!("[!] Failed to save memory dump: {}", err)
                    }
                };
                self.io.report(message)?;
            }

            Command::Pos => {
                let pc = self.state.pc;
                self.io.report(format!(
                    "[!] Current execution position: {:04X} ({})",
                    pc, pc
                ))?;
            }

            Command::GetReg => {
                for (n, value) in self.state.registers.iter().enumerate() {
                    self.io
                        .report(format!("[!] Register {}: {:04X} ({})", n, value, value))?;
                }
            }

            Command::GetStack => {
                for (n, value) in self.state.stack.iter().enumerate() {
                    self.io
                        .report(format!("[!] Stack {}: {:04X} ({})", n, value, value))?;
                }
            }

            Command::SetReg { index, value } => {
                self.state.registers[index] = value;
                self.io
                    .report(format!("[!] Register {} set to: {:04X}", index, value))?;
            }

            Command::Poke { address, values } => {
                let writable = address <= self.state.memory.len()
                    && address + values.len() <= synacor_spec::ADDRESS_SPACE;
                if !writable {
                    self.io.report("[!] Invalid memory index, cannot poke.")?;
                    return Ok(());
                }
                for (offset, value) in values.iter().enumerate() {
                    self.state
                        .memory
                        .write(address + offset, *value)
                        .map_err(|fault| RuntimeError::AddressOutOfRange {
                            pc: self.state.pc,
                            address: fault.address,
                        })?;
                }
                self.io.report(format!(
                    "[!] Memory written to {:04X}: {}",
                    address,
                    format_words(&values)
                ))?;
            }

            Command::Peek { address, count } => {
                if address >= self.state.memory.len() {
                    self.io.report("[!] Invalid memory index, cannot peek.")?;
                    return Ok(());
                }
                let words = format_words(self.state.memory.range(address, count));
                self.io
                    .report(format!("[!] Memory read from {:04X}: {}", address, words))?;
            }
        }

        Ok(())
    }
}
