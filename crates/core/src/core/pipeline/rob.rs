//! Reorder Buffer (ROB) for in-order commit.
//!
//! The ROB is a circular buffer that tracks in-flight instructions from
//! issue through commit. It provides:
//! 1. **Allocation:** Assigns unique, strictly monotone tags to
//!    instructions entering the backend.
//! 2. **Completion:** Records results broadcast from the functional units
//!    (the abstracted common data bus writes straight onto the entry).
//! 3. **In-order commit:** Retires instructions from the head in program
//!    order.
//! 4. **Flush:** Squashes every speculative entry after a misprediction.
//!
//! Live tags are contiguous (allocation is sequential, commit pops the
//! head, and flush empties the buffer), so a tag resolves to its slot with
//! O(1) arithmetic from the head tag rather than a linear scan.

use crate::isa::instruction::Opcode;

/// Unique tag identifying an in-flight instruction in the ROB.
///
/// Tags increase monotonically and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RobTag(pub u32);

/// Lifecycle state of a ROB entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RobState {
    /// Entry allocated but the instruction has not finished executing.
    #[default]
    Issued,
    /// Execution complete, result available, waiting to commit.
    Completed,
}

/// A single entry in the reorder buffer.
#[derive(Clone, Debug, Default)]
pub struct RobEntry {
    /// Unique tag for this entry.
    pub tag: RobTag,
    /// Operation of the instruction.
    pub opcode: Opcode,
    /// Destination register index (0 when the op writes no register).
    pub rd: usize,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Current lifecycle state (the "ready" flag).
    pub state: RobState,
    /// Computed result value (ALU output, load data, or branch outcome).
    pub result: i32,
    /// Predicted direction recorded at issue (branches only).
    pub pred_taken: bool,
    /// Computed redirect target, filled at execute (branches only).
    pub target: u32,
    /// Whether this slot is occupied.
    pub valid: bool,
}

impl RobEntry {
    /// True once the result has been broadcast onto this entry.
    pub fn is_ready(&self) -> bool {
        self.state == RobState::Completed
    }
}

/// Reorder buffer — circular buffer for in-order commit.
pub struct Rob {
    /// Fixed-size entry array.
    entries: Vec<RobEntry>,
    /// Index of the oldest entry (commit point).
    head: usize,
    /// Index where the next entry will be allocated.
    tail: usize,
    /// Number of valid entries.
    count: usize,
    /// Monotonically increasing tag counter.
    next_tag: u32,
}

impl Rob {
    /// Creates a new ROB with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, RobEntry::default);
        Self {
            entries,
            head: 0,
            tail: 0,
            count: 0,
            next_tag: 1,
        }
    }

    /// Returns the ROB capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of occupied entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the ROB is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if the ROB is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.entries.len()
    }

    /// Allocates a new entry at the tail. Returns `None` if the ROB is full.
    pub fn allocate(&mut self, opcode: Opcode, rd: usize, pc: u32) -> Option<RobTag> {
        if self.is_full() {
            return None;
        }

        let tag = RobTag(self.next_tag);
        self.next_tag += 1;

        self.entries[self.tail] = RobEntry {
            tag,
            opcode,
            rd,
            pc,
            state: RobState::Issued,
            result: 0,
            pred_taken: false,
            target: 0,
            valid: true,
        };

        self.tail = (self.tail + 1) % self.entries.len();
        self.count += 1;
        Some(tag)
    }

    /// Records the predicted direction for a branch entry.
    pub fn set_prediction(&mut self, tag: RobTag, taken: bool) {
        if let Some(entry) = self.find_entry_mut(tag) {
            entry.pred_taken = taken;
        }
    }

    /// Records the computed redirect target for a branch entry.
    pub fn set_target(&mut self, tag: RobTag, target: u32) {
        if let Some(entry) = self.find_entry_mut(tag) {
            entry.target = target;
        }
    }

    /// Marks an entry as completed with its result value.
    ///
    /// Writing the result and ready state onto the entry is the abstracted
    /// common data bus: any later reservation-station wake-up observes it.
    pub fn complete(&mut self, tag: RobTag, result: i32) {
        if let Some(entry) = self.find_entry_mut(tag) {
            entry.state = RobState::Completed;
            entry.result = result;
        }
    }

    /// Returns a reference to the head entry (oldest), if any.
    pub fn peek_head(&self) -> Option<&RobEntry> {
        if self.count == 0 {
            None
        } else {
            Some(&self.entries[self.head])
        }
    }

    /// Commits (retires) the head entry. Returns `None` if the ROB is
    /// empty or the head has not completed.
    pub fn commit_head(&mut self) -> Option<RobEntry> {
        if self.count == 0 || self.entries[self.head].state == RobState::Issued {
            return None;
        }

        let committed = self.entries[self.head].clone();
        self.entries[self.head].valid = false;
        self.head = (self.head + 1) % self.entries.len();
        self.count -= 1;
        Some(committed)
    }

    /// Flushes all entries from the ROB. Tags keep increasing.
    pub fn flush_all(&mut self) {
        for entry in &mut self.entries {
            entry.valid = false;
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    /// Slot index of a live tag, computed from the head tag.
    fn index_of(&self, tag: RobTag) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let head_tag = self.entries[self.head].tag.0;
        let offset = tag.0.checked_sub(head_tag)? as usize;
        if offset >= self.count {
            return None;
        }
        Some((self.head + offset) % self.entries.len())
    }

    /// Finds the entry with the given tag, if it is still live.
    pub fn find_entry(&self, tag: RobTag) -> Option<&RobEntry> {
        self.index_of(tag).map(|idx| &self.entries[idx])
    }

    /// Finds a mutable reference to the entry with the given tag.
    fn find_entry_mut(&mut self, tag: RobTag) -> Option<&mut RobEntry> {
        self.index_of(tag).map(|idx| &mut self.entries[idx])
    }

    /// True if the tag refers to a live (uncommitted, unflushed) entry.
    pub fn is_live(&self, tag: RobTag) -> bool {
        self.index_of(tag).is_some()
    }

    /// Iterates the live entries from head (oldest) to tail (youngest).
    pub fn iter_in_order(&self) -> impl Iterator<Item = &RobEntry> + '_ {
        (0..self.count).map(move |i| &self.entries[(self.head + i) % self.entries.len()])
    }

    /// Returns a copy of the live entries in program order.
    pub fn snapshot(&self) -> Vec<RobEntry> {
        self.iter_in_order().cloned().collect()
    }
}
