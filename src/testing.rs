//! Test doubles for the collaborator traits.

use std::collections::{HashMap, VecDeque};
use std::string::{String, ToString};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::vec::Vec;

use crate::kernel::{
    Console, ConsoleError, FileSystem, Kernel, OpenFile, OpenFileTable, Power, ProcessTable,
    SemaphoreTable,
};
use crate::exception::ExceptionKind;
use crate::machine::{regs, Machine, UserAddr};
use crate::syscall::{SyscallCode, SyscallOutcome};

/// Register file plus a flat user memory of fixed size.
pub struct TestMachine {
    registers: [i32; regs::NUM_TOTAL],
    memory: Vec<u8>,
}

impl TestMachine {
    pub fn new(memory_size: usize) -> Self {
        Self {
            registers: [0; regs::NUM_TOTAL],
            memory: vec![0; memory_size],
        }
    }

    pub fn set_pc(&mut self, pc: i32) {
        self.registers[regs::PC] = pc;
        self.registers[regs::NEXT_PC] = pc + 4;
    }

    pub fn load_syscall(&mut self, code: i32, args: &[i32]) {
        self.registers[regs::SYSCALL_CODE] = code;
        for (slot, &arg) in args.iter().enumerate() {
            self.registers[regs::ARG1 + slot] = arg;
        }
    }

    pub fn poke(&mut self, addr: usize, bytes: &[u8]) {
        self.memory[addr..addr + bytes.len()].copy_from_slice(bytes);
    }

    pub fn peek(&self, addr: usize, len: usize) -> Vec<u8> {
        self.memory[addr..addr + len].to_vec()
    }

    pub fn ret(&self) -> i32 {
        self.registers[regs::RETURN_VALUE]
    }

    pub fn pc(&self) -> (i32, i32, i32) {
        (
            self.registers[regs::PREV_PC],
            self.registers[regs::PC],
            self.registers[regs::NEXT_PC],
        )
    }

    fn span(&self, addr: UserAddr, size: usize) -> Option<std::ops::Range<usize>> {
        let start = addr.as_u32() as usize;
        let end = start.checked_add(size)?;
        (matches!(size, 1 | 2 | 4) && end <= self.memory.len()).then_some(start..end)
    }
}

impl Machine for TestMachine {
    fn read_register(&self, index: usize) -> i32 {
        self.registers[index]
    }

    fn write_register(&mut self, index: usize, value: i32) {
        self.registers[index] = value;
    }

    fn read_mem(&mut self, addr: UserAddr, size: usize) -> Option<i32> {
        let span = self.span(addr, size)?;
        let mut raw = [0u8; 4];
        raw[..size].copy_from_slice(&self.memory[span]);
        Some(i32::from_le_bytes(raw))
    }

    fn write_mem(&mut self, addr: UserAddr, size: usize, value: i32) -> bool {
        match self.span(addr, size) {
            Some(span) => {
                self.memory[span].copy_from_slice(&value.to_le_bytes()[..size]);
                true
            }
            None => false,
        }
    }
}

#[derive(Default)]
struct ConsoleState {
    input: VecDeque<u8>,
    output: Vec<u8>,
    fail_at_end: bool,
}

/// Console fed from a script; records everything written.
#[derive(Default)]
pub struct ScriptedConsole {
    state: Mutex<ConsoleState>,
}

impl ScriptedConsole {
    pub fn with_input(input: &[u8]) -> Self {
        let console = Self::default();
        console.push_input(input);
        console
    }

    pub fn push_input(&self, input: &[u8]) {
        self.state.lock().unwrap().input.extend(input.iter().copied());
    }

    /// Report a device error instead of end of stream once input runs out.
    pub fn fail_after_input(&self) {
        self.state.lock().unwrap().fail_at_end = true;
    }

    pub fn output(&self) -> Vec<u8> {
        self.state.lock().unwrap().output.clone()
    }

    pub fn remaining_input(&self) -> usize {
        self.state.lock().unwrap().input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_byte(&self) -> Result<Option<u8>, ConsoleError> {
        let mut state = self.state.lock().unwrap();
        match state.input.pop_front() {
            Some(byte) => Ok(Some(byte)),
            None if state.fail_at_end => Err(ConsoleError),
            None => Ok(None),
        }
    }

    fn write(&self, bytes: &[u8]) {
        self.state.lock().unwrap().output.extend_from_slice(bytes);
    }
}

/// In-memory file with a private cursor over shared contents.
pub struct MemFile {
    data: Arc<Mutex<Vec<u8>>>,
    pos: usize,
}

impl MemFile {
    pub fn with_contents(bytes: &[u8]) -> Self {
        Self {
            data: Arc::new(Mutex::new(bytes.to_vec())),
            pos: 0,
        }
    }
}

impl OpenFile for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let data = self.data.lock().unwrap();
        let available = data.len().saturating_sub(self.pos);
        let n = available.min(buf.len());
        if n == 0 {
            return 0;
        }
        buf[..n].copy_from_slice(&data[self.pos..self.pos + n]);
        self.pos += n;
        n
    }

    fn write(&mut self, buf: &[u8]) -> usize {
        let mut data = self.data.lock().unwrap();
        let end = self.pos + buf.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        buf.len()
    }

    fn seek(&mut self, position: usize) {
        self.pos = position;
    }

    fn tell(&self) -> usize {
        self.pos
    }

    fn length(&self) -> usize {
        self.data.lock().unwrap().len()
    }
}

/// Flat in-memory file system.
#[derive(Default)]
pub struct MemFs {
    files: Mutex<HashMap<String, Arc<Mutex<Vec<u8>>>>>,
}

impl MemFs {
    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().unwrap();
        files.get(name).map(|data| data.lock().unwrap().clone())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.files.lock().unwrap().contains_key(name)
    }
}

impl FileSystem for MemFs {
    fn create(&self, name: &str, initial_size: usize) -> bool {
        let mut files = self.files.lock().unwrap();
        if files.contains_key(name) {
            return false;
        }
        files.insert(
            name.to_string(),
            Arc::new(Mutex::new(vec![0; initial_size])),
        );
        true
    }

    fn open(&self, name: &str) -> Option<Box<dyn OpenFile>> {
        let files = self.files.lock().unwrap();
        let data = files.get(name)?.clone();
        Some(Box::new(MemFile { data, pos: 0 }))
    }
}

/// Process table that records calls and answers from fixed rules.
///
/// Only "shell" can be executed (pid 7); joining 7 yields exit code 3.
#[derive(Default)]
pub struct RecordingProcs {
    calls: Mutex<Vec<String>>,
}

impl RecordingProcs {
    pub const SHELL_PID: i32 = 7;

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessTable for RecordingProcs {
    fn exec(&self, name: &str) -> i32 {
        self.calls.lock().unwrap().push(format!("exec {name}"));
        if name == "shell" {
            Self::SHELL_PID
        } else {
            -1
        }
    }

    fn join(&self, id: i32) -> i32 {
        self.calls.lock().unwrap().push(format!("join {id}"));
        if id == Self::SHELL_PID {
            3
        } else {
            -1
        }
    }

    fn exit(&self, exit_code: i32) -> i32 {
        self.calls.lock().unwrap().push(format!("exit {exit_code}"));
        exit_code
    }
}

struct Sem {
    count: i32,
    next_ticket: u64,
    serving: u64,
}

/// Blocking named semaphores with FIFO wake order.
///
/// Each waiter draws a ticket; only the oldest ticket may take the count.
#[derive(Default)]
pub struct FifoSemaphores {
    table: Mutex<HashMap<String, Sem>>,
    changed: Condvar,
}

impl FifoSemaphores {
    pub fn count(&self, name: &str) -> Option<i32> {
        self.table.lock().unwrap().get(name).map(|sem| sem.count)
    }

    /// Threads currently blocked (or about to block) in `wait`.
    pub fn waiting(&self, name: &str) -> u64 {
        self.table
            .lock()
            .unwrap()
            .get(name)
            .map_or(0, |sem| sem.next_ticket - sem.serving)
    }
}

impl SemaphoreTable for FifoSemaphores {
    fn create(&self, name: &str, initial: i32) -> i32 {
        let mut table = self.table.lock().unwrap();
        if table.contains_key(name) {
            return -1;
        }
        table.insert(
            name.to_string(),
            Sem {
                count: initial,
                next_ticket: 0,
                serving: 0,
            },
        );
        0
    }

    fn wait(&self, name: &str) -> i32 {
        let mut table = self.table.lock().unwrap();
        let ticket = match table.get_mut(name) {
            Some(sem) => {
                sem.next_ticket += 1;
                sem.next_ticket - 1
            }
            None => return -1,
        };
        self.changed.notify_all();

        loop {
            if let Some(sem) = table.get_mut(name) {
                if sem.serving == ticket && sem.count > 0 {
                    sem.count -= 1;
                    sem.serving += 1;
                    self.changed.notify_all();
                    return 0;
                }
            }
            table = self.changed.wait(table).unwrap();
        }
    }

    fn signal(&self, name: &str) -> i32 {
        let mut table = self.table.lock().unwrap();
        match table.get_mut(name) {
            Some(sem) => {
                sem.count += 1;
                self.changed.notify_all();
                0
            }
            None => -1,
        }
    }
}

#[derive(Default)]
pub struct PowerSwitch {
    halted: AtomicBool,
}

impl PowerSwitch {
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }
}

impl Power for PowerSwitch {
    fn halt(&self) {
        self.halted.store(true, Ordering::SeqCst);
    }
}

/// Owns one of every double; lends them out as a [`Kernel`].
#[derive(Default)]
pub struct TestKernel {
    pub console: ScriptedConsole,
    pub fs: MemFs,
    pub files: OpenFileTable,
    pub procs: RecordingProcs,
    pub sems: FifoSemaphores,
    pub power: PowerSwitch,
}

impl TestKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kernel(&self) -> Kernel<'_> {
        Kernel::new(
            &self.console,
            &self.fs,
            &self.files,
            &self.procs,
            &self.sems,
            &self.power,
        )
    }
}

/// Trap into the kernel with `code` and `args`; returns r2 afterwards.
pub fn run_syscall(
    kernel: &Kernel<'_>,
    machine: &mut TestMachine,
    code: SyscallCode,
    args: &[i32],
) -> (SyscallOutcome, i32) {
    machine.load_syscall(code.raw(), args);
    let outcome = crate::handle_exception(kernel, machine, ExceptionKind::Syscall);
    (outcome, machine.ret())
}
