//! Program store.
//!
//! An addressable map from PC to decoded instruction, filled by an
//! external parser (or built directly with the `DecodedInstruction`
//! constructors). Fetch simply looks up the current PC; a miss means
//! there is no instruction there and issue idles.

use std::collections::BTreeMap;

use crate::isa::instruction::DecodedInstruction;

/// Addressable map from PC to decoded instruction.
#[derive(Default)]
pub struct Program {
    instrs: BTreeMap<u32, DecodedInstruction>,
}

impl Program {
    /// Creates an empty program store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a program store from a list of decoded instructions, keyed
    /// by each instruction's own PC.
    pub fn from_instructions(instructions: Vec<DecodedInstruction>) -> Self {
        let mut program = Self::new();
        for inst in instructions {
            program.insert(inst);
        }
        program
    }

    /// Inserts an instruction at its PC, replacing any previous one.
    pub fn insert(&mut self, inst: DecodedInstruction) {
        self.instrs.insert(inst.pc, inst);
    }

    /// Returns the instruction at a PC, if any.
    pub fn fetch(&self, pc: u32) -> Option<&DecodedInstruction> {
        self.instrs.get(&pc)
    }

    /// Returns the number of stored instructions.
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    /// Returns true if the store holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    /// Iterates the instructions in ascending PC order.
    pub fn listing(&self) -> impl Iterator<Item = &DecodedInstruction> {
        self.instrs.values()
    }
}
