//! Open File Table
//!
//! A fixed array of slots, each holding an open file and the access
//! rights it was opened with. Slots are addressed by index; the syscall
//! layer adds 2 to turn an index into a user handle.
//!
//! # Design
//! - Fixed-size array, no allocation after construction
//! - The slot array has its own `spin::Mutex`, held only to look up,
//!   fill or empty a slot
//! - Each open file sits behind a second lock; file I/O runs under that
//!   lock alone, so a slow file never stalls the other handles
//! - Closing a slot while its file is mid-I/O is safe: the I/O keeps the
//!   file alive until it finishes

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use spin::Mutex;

use super::{Access, FileTable, OpenFile};

/// Default number of slots.
pub const FILE_TABLE_SIZE: usize = 8;

/// Seek position meaning "end of file".
pub const SEEK_END: i32 = -1;

type SharedFile = Arc<Mutex<Box<dyn OpenFile>>>;

struct Slot {
    file: SharedFile,
    access: Access,
}

/// Open-file table with `N` slots.
pub struct OpenFileTable<const N: usize = FILE_TABLE_SIZE> {
    slots: Mutex<[Option<Slot>; N]>,
}

impl<const N: usize> OpenFileTable<N> {
    /// Create a table with every slot free.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(core::array::from_fn(|_| None)),
        }
    }

    /// Number of slots.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of occupied slots.
    pub fn open_count(&self) -> usize {
        self.slots.lock().iter().filter(|slot| slot.is_some()).count()
    }

    /// Clone out the file in `index` together with its rights.
    ///
    /// The table lock is released before this returns.
    fn file(&self, index: usize) -> Option<(SharedFile, Access)> {
        let slots = self.slots.lock();
        let slot = slots.get(index)?.as_ref()?;
        Some((Arc::clone(&slot.file), slot.access))
    }
}

impl<const N: usize> Default for OpenFileTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for OpenFileTable<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenFileTable")
            .field("capacity", &N)
            .field("open", &self.open_count())
            .finish()
    }
}

impl<const N: usize> FileTable for OpenFileTable<N> {
    fn open(&self, file: Box<dyn OpenFile>, access: Access) -> Result<usize, Box<dyn OpenFile>> {
        let mut slots = self.slots.lock();
        match slots.iter().position(|slot| slot.is_none()) {
            Some(index) => {
                slots[index] = Some(Slot {
                    file: Arc::new(Mutex::new(file)),
                    access,
                });
                Ok(index)
            }
            None => Err(file),
        }
    }

    fn close(&self, index: usize) -> i32 {
        let taken = self.slots.lock().get_mut(index).and_then(Option::take);
        // Dropped outside the table lock.
        match taken {
            Some(_) => 0,
            None => -1,
        }
    }

    fn access(&self, index: usize) -> Option<Access> {
        let slots = self.slots.lock();
        slots.get(index)?.as_ref().map(|slot| slot.access)
    }

    fn read_byte(&self, index: usize) -> Option<u8> {
        let (file, _) = self.file(index)?;
        let mut byte = [0u8; 1];
        let read = file.lock().read(&mut byte);
        (read == 1).then_some(byte[0])
    }

    fn write_byte(&self, index: usize, byte: u8) -> bool {
        match self.file(index) {
            Some((file, access)) if access.contains(Access::WRITE) => file.lock().write(&[byte]) == 1,
            _ => false,
        }
    }

    /// `SEEK_END` moves to the end of the file. Any other position must
    /// lie within `0..=length`. Returns the new position, or -1.
    fn seek(&self, index: usize, position: i32) -> i32 {
        let Some((file, _)) = self.file(index) else {
            return -1;
        };
        let mut file = file.lock();

        let length = file.length();
        let target = if position == SEEK_END {
            length
        } else {
            match usize::try_from(position) {
                Ok(pos) if pos <= length => pos,
                _ => return -1,
            }
        };

        match i32::try_from(target) {
            Ok(reported) => {
                file.seek(target);
                reported
            }
            Err(_) => -1,
        }
    }
}
