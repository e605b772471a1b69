//! Integration tests for the monitor console.

use lib65c02::monitor::{Command, Flow, Monitor, MonitorError};
use lib65c02::{FlatMemory, MemoryBus, PowerState, CPU};
use std::fs;
use std::path::PathBuf;

/// Helper function to create a monitor over a CPU with reset vector at 0x8000
fn setup_monitor() -> Monitor<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    Monitor::new(CPU::new(memory))
}

/// Runs a line and returns its output
fn run(monitor: &mut Monitor<FlatMemory>, line: &str) -> String {
    let mut out = Vec::new();
    monitor.run_line(line, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_register_display() {
    let mut monitor = setup_monitor();
    monitor.cpu_mut().set_a(0x42);
    monitor.cpu_mut().set_flag_c(true);

    let text = run(&mut monitor, "v");

    assert!(text.contains("A = $42"));
    assert!(text.contains("PC = $8000"));
    assert!(text.contains("SP = $FF"));
    assert!(text.contains("Status register: nv-bdIZC"));
}

#[test]
fn test_write_read_and_set_pc() {
    let mut monitor = setup_monitor();

    run(&mut monitor, "w 1234 ab");
    assert_eq!(monitor.cpu().memory().peek(0x1234), 0xAB);
    assert!(run(&mut monitor, "r 1234").contains("$1234: $AB"));

    run(&mut monitor, "s $2000");
    assert_eq!(monitor.cpu().pc(), 0x2000);
}

#[test]
fn test_step_and_counted_run() {
    let mut monitor = setup_monitor();
    // LDX #$00; loop: INX; BRA loop
    monitor
        .cpu_mut()
        .memory_mut()
        .load(0x8000, &[0xA2, 0x00, 0xE8, 0x80, 0xFD]);

    run(&mut monitor, "x");
    assert_eq!(monitor.cpu().pc(), 0x8002);

    let text = run(&mut monitor, "x 10");
    assert!(text.contains("Executing $10(16) instructions"));
    assert_eq!(monitor.cpu().x(), 8);
}

#[test]
fn test_counted_run_stops_at_breakpoint() {
    let mut monitor = setup_monitor();
    monitor
        .cpu_mut()
        .memory_mut()
        .load(0x8000, &[0xEA, 0xEA, 0xEA, 0xEA]);

    assert!(run(&mut monitor, "b 8002").contains("Set breakpoint at address $8002"));
    assert_eq!(monitor.breakpoint(), Some(0x8002));

    let text = run(&mut monitor, "x 100");
    assert!(text.contains("Breakpoint hit!"));
    assert_eq!(monitor.cpu().pc(), 0x8002);
}

#[test]
fn test_free_run_until_stp() {
    let mut monitor = setup_monitor();
    monitor
        .cpu_mut()
        .memory_mut()
        .load(0x8000, &[0xA9, 0x07, 0xDB]);

    let text = run(&mut monitor, "f");

    assert!(text.contains("Processor halted"));
    assert_eq!(monitor.cpu().a(), 0x07);
    assert_eq!(monitor.cpu().power_state(), PowerState::Halted);
}

#[test]
fn test_free_run_continues_past_wai() {
    let mut monitor = setup_monitor();
    // WAI; LDA #$07; STP
    monitor
        .cpu_mut()
        .memory_mut()
        .load(0x8000, &[0xCB, 0xA9, 0x07, 0xDB]);

    let text = run(&mut monitor, "f");

    assert!(text.contains("Processor halted"));
    assert_eq!(monitor.cpu().a(), 0x07);
    assert_eq!(monitor.cpu().pc(), 0x8004);
}

#[test]
fn test_free_run_limit() {
    let mut monitor = setup_monitor();
    // BRA to itself
    monitor.cpu_mut().memory_mut().load(0x8000, &[0x80, 0xFE]);
    monitor.set_free_run_limit(Some(50));

    let text = run(&mut monitor, "f");

    assert!(text.contains("Free-run limit reached"));
    assert_eq!(monitor.cpu().pc(), 0x8000);
}

#[test]
fn test_faithful_reset_command() {
    let mut monitor = setup_monitor();
    monitor.cpu_mut().set_a(0x99);
    monitor.cpu_mut().set_pc(0x1234);

    run(&mut monitor, "r");

    assert_eq!(monitor.cpu().pc(), 0x8000);
    assert_eq!(monitor.cpu().a(), 0x99);
}

#[test]
fn test_disassemble_command() {
    let mut monitor = setup_monitor();
    monitor
        .cpu_mut()
        .memory_mut()
        .load(0x8000, &[0xA9, 0x42, 0x8D, 0x00, 0x02, 0x03]);

    let text = run(&mut monitor, "d 8000 3");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines,
        vec![
            "8000  A9 42     LDA #$42",
            "8002  8D 00 02  STA $0200",
            "8005  03        .byte $03",
        ]
    );
}

#[test]
fn test_load_command() {
    let path: PathBuf = std::env::temp_dir().join(format!("lib65c02-monitor-{}.hex", std::process::id()));
    fs::write(
        &path,
        ":0B800000A9488DFF7FA9698DFF7FDB81\n:02FFFC00008083\n:00000001FF\n",
    )
    .unwrap();

    let mut monitor = setup_monitor();
    let text = run(&mut monitor, &format!("l {}", path.display()));
    fs::remove_file(&path).unwrap();

    assert!(text.contains("3 records loaded (13 bytes)"));
    assert_eq!(monitor.cpu().memory().peek(0x8001), 0x48);
}

#[test]
fn test_load_missing_file_is_an_error() {
    let mut monitor = setup_monitor();
    let result = monitor.run_line("l /nonexistent/program.hex", &mut Vec::new());
    assert!(matches!(result, Err(MonitorError::Io(_))));
}

#[test]
fn test_trap_surfaces_as_execution_error() {
    use lib65c02::{CpuConfig, UndefinedOpcodePolicy};

    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    memory.write(0x8000, 0x03);
    let config = CpuConfig::default().undefined_opcodes(UndefinedOpcodePolicy::Trap);
    let mut monitor = Monitor::new(CPU::with_config(memory, config));

    let result = monitor.execute(&Command::FreeRun, &mut Vec::new());
    assert!(matches!(result, Err(MonitorError::Execution(_))));
}

#[test]
fn test_quit() {
    let mut monitor = setup_monitor();
    assert_eq!(monitor.run_line("Q", &mut Vec::new()).unwrap(), Flow::Quit);
    assert_eq!(monitor.run_line("v", &mut Vec::new()).unwrap(), Flow::Continue);
}
