//! Register and Memory Facade
//!
//! The simulated CPU owns the register file and the user address space.
//! The trap core reaches both only through the [`Machine`] trait: indexed
//! register reads and writes, and byte-sized memory accesses that may fail.
//!
//! # Register Convention
//! - r2: operation code on entry, return value on exit
//! - r4..r7: syscall arguments 1-4
//! - r34/r35/r36: PC, NextPC, PrevPC

mod address;

pub use address::UserAddr;

/// Register indices used by the trap core.
pub mod regs {
    /// Operation code on syscall entry.
    pub const SYSCALL_CODE: usize = 2;
    /// Return value written back to the user program.
    pub const RETURN_VALUE: usize = 2;
    /// First syscall argument.
    pub const ARG1: usize = 4;
    /// Second syscall argument.
    pub const ARG2: usize = 5;
    /// Third syscall argument.
    pub const ARG3: usize = 6;
    /// Fourth syscall argument.
    pub const ARG4: usize = 7;
    /// Current program counter.
    pub const PC: usize = 34;
    /// Next program counter (branch delay slot).
    pub const NEXT_PC: usize = 35;
    /// Previous program counter, kept for debugging.
    pub const PREV_PC: usize = 36;
    /// Size of the register file.
    pub const NUM_TOTAL: usize = 40;
}

/// Width of one instruction in bytes.
pub const INSTRUCTION_WIDTH: i32 = 4;

/// Access to the register file and user memory of the trapping program.
///
/// Implemented by the machine simulator. Register indices outside
/// `0..regs::NUM_TOTAL` are a kernel bug, not user input; the trap core
/// only ever passes the constants in [`regs`].
pub trait Machine {
    /// Read register `index`.
    fn read_register(&self, index: usize) -> i32;

    /// Write `value` into register `index`.
    fn write_register(&mut self, index: usize, value: i32);

    /// Read `size` bytes (1, 2 or 4) at a user virtual address.
    ///
    /// Returns `None` if translation fails.
    fn read_mem(&mut self, addr: UserAddr, size: usize) -> Option<i32>;

    /// Write `size` bytes (1, 2 or 4) at a user virtual address.
    ///
    /// Returns `false` if translation fails.
    fn write_mem(&mut self, addr: UserAddr, size: usize, value: i32) -> bool;

    /// Step past the trapping instruction.
    ///
    /// PrevPC <- PC, PC <- NextPC, NextPC <- NextPC + 4. Holding `&mut self`
    /// for the whole rotation keeps it atomic with respect to every other
    /// register access.
    fn advance_pc(&mut self) {
        let pc = self.read_register(regs::PC);
        let next = self.read_register(regs::NEXT_PC);
        self.write_register(regs::PREV_PC, pc);
        self.write_register(regs::PC, next);
        self.write_register(regs::NEXT_PC, next.wrapping_add(INSTRUCTION_WIDTH));
    }
}
