//! Load/store queue.
//!
//! A program-order queue of in-flight memory operations that gates memory
//! visibility:
//! 1. **Allocation:** An entry is pushed at issue, address unknown.
//! 2. **Resolution:** Execute fills in the effective address (and the
//!    store data) and sets the ready flag.
//! 3. **Commit gating:** A load or store may retire only when it is the
//!    queue head and resolved; the store's memory write happens at commit.
//!
//! Queue order equals ROB order for memory-class instructions, so the
//! head always corresponds to the oldest in-flight memory op.

use std::collections::VecDeque;

use crate::core::pipeline::rob::RobTag;

/// Kind of memory operation held in the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemKind {
    /// Memory read.
    Load,
    /// Memory write, deferred to commit.
    Store,
}

/// A single load/store queue entry.
#[derive(Clone, Debug)]
pub struct LsqEntry {
    /// ROB tag of the memory instruction.
    pub tag: RobTag,
    /// Load or store.
    pub kind: MemKind,
    /// Effective address, unknown until execute resolves it.
    pub addr: Option<u32>,
    /// Data to store (stores only).
    pub data: i32,
    /// True once the address (and data, for stores) have resolved.
    pub mem_ready: bool,
}

/// Program-order queue of in-flight memory operations.
pub struct LoadStoreQueue {
    entries: VecDeque<LsqEntry>,
}

impl Default for LoadStoreQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadStoreQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Returns the number of in-flight memory operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no memory operation is in flight.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a new entry at the tail, address unknown.
    pub fn push(&mut self, tag: RobTag, kind: MemKind) {
        self.entries.push_back(LsqEntry {
            tag,
            kind,
            addr: None,
            data: 0,
            mem_ready: false,
        });
    }

    /// Returns the oldest in-flight memory operation, if any.
    pub fn head(&self) -> Option<&LsqEntry> {
        self.entries.front()
    }

    /// Removes and returns the oldest entry.
    pub fn pop_head(&mut self) -> Option<LsqEntry> {
        self.entries.pop_front()
    }

    /// Records the resolved address of a load and marks it ready.
    pub fn resolve_load(&mut self, tag: RobTag, addr: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.tag == tag) {
            entry.addr = Some(addr);
            entry.mem_ready = true;
        }
    }

    /// Records the resolved address and data of a store and marks it ready.
    pub fn resolve_store(&mut self, tag: RobTag, addr: u32, data: i32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.tag == tag) {
            entry.addr = Some(addr);
            entry.data = data;
            entry.mem_ready = true;
        }
    }

    /// Iterates the entries from oldest to youngest.
    pub fn iter(&self) -> impl Iterator<Item = &LsqEntry> {
        self.entries.iter()
    }

    /// Discards every entry. Committed stores have already left the queue,
    /// so everything remaining is speculative.
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    /// Returns a copy of the entries in program order.
    pub fn snapshot(&self) -> Vec<LsqEntry> {
        self.entries.iter().cloned().collect()
    }
}
