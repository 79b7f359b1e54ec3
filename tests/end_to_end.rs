//! End-to-end tests: image files on disk through the runtime and console

use std::fs;
use synacor_runtime::{HaltReason, IOHandler, VMConfig, VM};
use synacor_spec::operand::reg;
use synacor_spec::{Image, Opcode};
use tempfile::tempdir;

/// Writes a greeting, then echoes each input line back prefixed with '>'
fn echo_image() -> Image {
    let mut words = Vec::new();
    for ch in "ready\n".chars() {
        words.extend([Opcode::Out.to_word(), ch as u16]);
    }
    // loop: in r0
    let top = words.len() as u16;
    words.extend([Opcode::In.to_word(), reg(0)]);
    // if r0 == '\n' then out '\n' and restart the line
    words.extend([Opcode::Eq.to_word(), reg(1), reg(0), 10]);
    let branch = words.len();
    words.extend([Opcode::Jt.to_word(), reg(1), 0]);
    words.extend([Opcode::Out.to_word(), reg(0)]);
    words.extend([Opcode::Jmp.to_word(), top]);
    let newline = words.len() as u16;
    words.extend([Opcode::Out.to_word(), 10]);
    words.extend([Opcode::Out.to_word(), '>' as u16]);
    words.extend([Opcode::Jmp.to_word(), top]);
    words[branch + 2] = newline;
    Image::new(words)
}

#[test]
fn test_image_file_round_trip_through_vm() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("echo.bin");
    echo_image().write(&path).unwrap();

    let mut vm = VM::load(&path, VMConfig::default(), IOHandler::scripted("abc\nxyz\n")).unwrap();
    let result = vm.run().unwrap();

    assert_eq!(result.halt_reason, HaltReason::InputExhausted);
    assert_eq!(
        result.output,
        vec!["ready".to_string(), "abc".to_string(), ">xyz".to_string()]
    );
    assert_eq!(vm.io().pending_output(), ">");
}

#[test]
fn test_console_session_with_dump_and_reload() {
    let dir = tempdir().unwrap();
    let dump_path = dir.path().join("session-dump.bin");
    let history_path = dir.path().join("session-history.txt");
    let config = VMConfig {
        trace: true,
        history_path: history_path.clone(),
        dump_path: dump_path.clone(),
    };

    let input = "hello\n!poke 0 0\n!dump\n!history\n!halt\n";
    let mut vm = VM::from_image(echo_image(), config, IOHandler::scripted(input)).unwrap();
    let result = vm.run().unwrap();
    assert_eq!(result.halt_reason, HaltReason::DebugCommand);
    assert_eq!(result.output, vec!["ready".to_string(), "hello".to_string()]);

    let history = fs::read_to_string(&history_path).unwrap();
    assert_eq!(history, "hello\n!poke 0 0\n!dump\n!history\n");

    // The dump has the first word patched to HALT, so a reload stops at once.
    let mut reloaded = VM::load(&dump_path, VMConfig::default(), IOHandler::default()).unwrap();
    let result = reloaded.run().unwrap();
    assert_eq!(result.halt_reason, HaltReason::Halt);
    assert_eq!(result.steps, 1);
    assert!(result.output.is_empty());
}

#[test]
fn test_missing_image_is_a_load_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("does-not-exist.bin");
    let err = VM::load(&path, VMConfig::default(), IOHandler::default()).unwrap_err();
    assert!(!err.is_fatal());
    assert!(err.to_string().contains("does-not-exist.bin"));
}

#[test]
fn test_odd_length_file_drops_last_byte() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("odd.bin");
    let mut bytes = Image::self_test().to_bytes();
    bytes.push(0xFF);
    fs::write(&path, &bytes).unwrap();

    let mut vm = VM::load(&path, VMConfig::default(), IOHandler::default()).unwrap();
    assert_eq!(vm.state().memory.len(), Image::self_test().len());

    vm.state_mut().registers[1] = 'A' as u16;
    assert_eq!(vm.run().unwrap().output, vec!["E".to_string()]);
}
