use std::collections::HashMap;

/// Width in bytes of every stack slot, all values are 32-bit ints
pub const SLOT_SIZE: i32 = 4;

/// Stack slots handed out to pseudo-registers of one function.
///
/// Slots are assigned in first-use order at decreasing offsets from rbp
/// (`-4`, `-8`, ...). The table only grows, a name keeps its slot for the
/// lifetime of the function.
#[derive(Debug, Default)]
pub struct FrameTable {
    slots: HashMap<String, i32>,
    lowest_offset: i32,
}

impl FrameTable {
    pub fn new() -> Self {
        Self {
            slots: HashMap::with_capacity(20),
            lowest_offset: 0,
        }
    }

    /// Offset for `name`, assigning the next free slot if it has none yet
    pub fn slot_for(&mut self, name: &str) -> i32 {
        if let Some(offset) = self.slots.get(name) {
            return *offset;
        }

        self.lowest_offset -= SLOT_SIZE;
        self.slots.insert(name.to_string(), self.lowest_offset);

        self.lowest_offset
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.slots.get(name).copied()
    }

    /// Bytes below rbp used by the assigned slots, before any alignment
    pub fn bytes_required(&self) -> i32 {
        -self.lowest_offset
    }
}
