//! Reservation stations.
//!
//! A station holds a dispatched instruction together with its captured
//! operand values or the tags of the producers it is still waiting on.
//! The core keeps two fixed pools: one for ALU-class operations (including
//! jumps and branches) and one for loads and stores.

use crate::core::pipeline::rob::RobTag;
use crate::isa::instruction::{DecodedInstruction, Opcode};

/// A single reservation station.
#[derive(Clone, Debug, Default)]
pub struct Station {
    /// Whether this station holds an in-flight instruction.
    pub busy: bool,
    /// Operation held by this station.
    pub op: Opcode,
    /// First operand value (valid once `qj` is clear).
    pub vj: i32,
    /// Second operand value (valid once `qk` is clear).
    pub vk: i32,
    /// Producer tag for the first operand; `None` means captured.
    pub qj: Option<RobTag>,
    /// Producer tag for the second operand; `None` means captured.
    pub qk: Option<RobTag>,
    /// ROB tag this station's result broadcasts to.
    pub dest: RobTag,
    /// Execution cycles remaining.
    pub remaining: u32,
    /// Total execution latency for this operation.
    pub total: u32,
    /// Decoded instruction held by this station.
    pub inst: DecodedInstruction,
    /// Effective address, computed on the first execute cycle (memory ops).
    pub eff_addr: Option<u32>,
}

impl Station {
    /// True when both operand tags are clear and the station can count
    /// down toward completion.
    pub fn operands_ready(&self) -> bool {
        self.qj.is_none() && self.qk.is_none()
    }

    /// Frees the station.
    pub fn clear(&mut self) {
        *self = Station::default();
    }
}

/// A fixed pool of reservation stations.
pub struct StationPool {
    stations: Vec<Station>,
}

impl StationPool {
    /// Creates a pool with the given number of stations, all free.
    pub fn new(capacity: usize) -> Self {
        let mut stations = Vec::with_capacity(capacity);
        stations.resize_with(capacity, Station::default);
        Self { stations }
    }

    /// Returns the number of stations in the pool.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.stations.len()
    }

    /// Returns the number of busy stations.
    pub fn len(&self) -> usize {
        self.stations.iter().filter(|s| s.busy).count()
    }

    /// Returns true if no station is busy.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if at least one station is free.
    pub fn has_free(&self) -> bool {
        self.stations.iter().any(|s| !s.busy)
    }

    /// Places an instruction into the first free station. Returns false
    /// (and drops the entry) if the pool is full.
    pub fn issue(&mut self, station: Station) -> bool {
        for slot in &mut self.stations {
            if !slot.busy {
                *slot = station;
                return true;
            }
        }
        false
    }

    /// Iterates over all stations.
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    /// Iterates mutably over all stations.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Station> {
        self.stations.iter_mut()
    }

    /// Frees every station.
    pub fn flush(&mut self) {
        for slot in &mut self.stations {
            slot.clear();
        }
    }

    /// Returns a copy of the busy stations.
    pub fn snapshot(&self) -> Vec<Station> {
        self.stations.iter().filter(|s| s.busy).cloned().collect()
    }
}
