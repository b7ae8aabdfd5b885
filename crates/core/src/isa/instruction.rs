//! Decoded instruction format.
//!
//! The core does not parse assembly text; an external parser produces
//! immutable `DecodedInstruction` records and the program store maps each
//! PC to one. This module defines:
//! 1. **`Opcode`:** The supported operation set and its classification
//!    helpers (class, register usage, memory/branch predicates).
//! 2. **`DecodedInstruction`:** The record itself, with per-mnemonic
//!    constructors that also render the textual form used in traces.

use crate::isa::abi::REG_NAMES;

/// Supported operations, in decoded form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Opcode {
    /// Register-register addition.
    Add,
    /// Register-register subtraction.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Set less than (signed).
    Slt,
    /// Add immediate.
    Addi,
    /// Load word.
    Lw,
    /// Store word.
    Sw,
    /// Branch if equal.
    Beq,
    /// Branch if not equal.
    Bne,
    /// Unconditional jump (link write-back not modelled).
    Jal,
    /// Indirect jump; retires as a no-op in this model.
    Jalr,
    /// No operation.
    #[default]
    Nop,
}

/// Operation classes, used for reservation-station pool selection and
/// execution latency lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpClass {
    /// Integer ALU operations, jumps, and no-ops.
    Alu,
    /// Memory loads.
    Load,
    /// Memory stores.
    Store,
    /// Conditional branches.
    Branch,
}

impl Opcode {
    /// Operation class of this opcode.
    pub fn class(self) -> OpClass {
        match self {
            Opcode::Lw => OpClass::Load,
            Opcode::Sw => OpClass::Store,
            Opcode::Beq | Opcode::Bne => OpClass::Branch,
            _ => OpClass::Alu,
        }
    }

    /// True for conditional branches (BEQ/BNE).
    pub fn is_branch(self) -> bool {
        matches!(self, Opcode::Beq | Opcode::Bne)
    }

    /// True for loads.
    pub fn is_load(self) -> bool {
        self == Opcode::Lw
    }

    /// True for stores.
    pub fn is_store(self) -> bool {
        self == Opcode::Sw
    }

    /// True for memory operations (loads and stores).
    pub fn is_mem(self) -> bool {
        self.is_load() || self.is_store()
    }

    /// True when this operation writes its destination register at commit.
    ///
    /// Stores, branches, jumps, and NOPs do not write a register (JAL's
    /// link write-back is not modelled).
    pub fn writes_register(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::Slt
                | Opcode::Addi
                | Opcode::Lw
        )
    }

    /// True when this operation reads rs1.
    pub fn uses_rs1(self) -> bool {
        !matches!(self, Opcode::Jal | Opcode::Jalr | Opcode::Nop)
    }

    /// True when this operation reads rs2.
    pub fn uses_rs2(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::Slt
                | Opcode::Sw
                | Opcode::Beq
                | Opcode::Bne
        )
    }

    /// Assembly mnemonic for this opcode.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Slt => "SLT",
            Opcode::Addi => "ADDI",
            Opcode::Lw => "LW",
            Opcode::Sw => "SW",
            Opcode::Beq => "BEQ",
            Opcode::Bne => "BNE",
            Opcode::Jal => "JAL",
            Opcode::Jalr => "JALR",
            Opcode::Nop => "NOP",
        }
    }
}

/// Immutable decoded instruction record, as emitted by the parser.
///
/// Register index 0 is the hardwired zero register: reads return 0 and
/// writes are discarded. Unused register fields are 0. The immediate is
/// already sign-extended to 32 bits; for branches and JAL it is a byte
/// offset from the instruction's own PC.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Program counter of this instruction.
    pub pc: u32,
    /// Textual form, kept for trace output.
    pub text: String,
    /// Operation.
    pub opcode: Opcode,
    /// Destination register index (0 when absent).
    pub rd: usize,
    /// First source register index (0 when absent).
    pub rs1: usize,
    /// Second source register index (0 when absent).
    pub rs2: usize,
    /// Sign-extended 32-bit immediate.
    pub imm: i32,
}

impl DecodedInstruction {
    fn r_type(pc: u32, opcode: Opcode, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self {
            pc,
            text: format!(
                "{} {}, {}, {}",
                opcode.mnemonic(),
                REG_NAMES[rd],
                REG_NAMES[rs1],
                REG_NAMES[rs2]
            ),
            opcode,
            rd,
            rs1,
            rs2,
            imm: 0,
        }
    }

    /// `ADD rd, rs1, rs2`
    pub fn add(pc: u32, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self::r_type(pc, Opcode::Add, rd, rs1, rs2)
    }

    /// `SUB rd, rs1, rs2`
    pub fn sub(pc: u32, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self::r_type(pc, Opcode::Sub, rd, rs1, rs2)
    }

    /// `AND rd, rs1, rs2`
    pub fn and(pc: u32, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self::r_type(pc, Opcode::And, rd, rs1, rs2)
    }

    /// `OR rd, rs1, rs2`
    pub fn or(pc: u32, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self::r_type(pc, Opcode::Or, rd, rs1, rs2)
    }

    /// `XOR rd, rs1, rs2`
    pub fn xor(pc: u32, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self::r_type(pc, Opcode::Xor, rd, rs1, rs2)
    }

    /// `SLT rd, rs1, rs2` (signed compare)
    pub fn slt(pc: u32, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self::r_type(pc, Opcode::Slt, rd, rs1, rs2)
    }

    /// `ADDI rd, rs1, imm`
    pub fn addi(pc: u32, rd: usize, rs1: usize, imm: i32) -> Self {
        Self {
            pc,
            text: format!("ADDI {}, {}, {}", REG_NAMES[rd], REG_NAMES[rs1], imm),
            opcode: Opcode::Addi,
            rd,
            rs1,
            rs2: 0,
            imm,
        }
    }

    /// `LW rd, imm(rs1)`
    pub fn lw(pc: u32, rd: usize, imm: i32, rs1: usize) -> Self {
        Self {
            pc,
            text: format!("LW {}, {}({})", REG_NAMES[rd], imm, REG_NAMES[rs1]),
            opcode: Opcode::Lw,
            rd,
            rs1,
            rs2: 0,
            imm,
        }
    }

    /// `SW rs2, imm(rs1)` (rs2 is the store data)
    pub fn sw(pc: u32, rs2: usize, imm: i32, rs1: usize) -> Self {
        Self {
            pc,
            text: format!("SW {}, {}({})", REG_NAMES[rs2], imm, REG_NAMES[rs1]),
            opcode: Opcode::Sw,
            rd: 0,
            rs1,
            rs2,
            imm,
        }
    }

    /// `BEQ rs1, rs2, imm` (imm is a byte offset from this PC)
    pub fn beq(pc: u32, rs1: usize, rs2: usize, imm: i32) -> Self {
        Self {
            pc,
            text: format!("BEQ {}, {}, {}", REG_NAMES[rs1], REG_NAMES[rs2], imm),
            opcode: Opcode::Beq,
            rd: 0,
            rs1,
            rs2,
            imm,
        }
    }

    /// `BNE rs1, rs2, imm` (imm is a byte offset from this PC)
    pub fn bne(pc: u32, rs1: usize, rs2: usize, imm: i32) -> Self {
        Self {
            pc,
            text: format!("BNE {}, {}, {}", REG_NAMES[rs1], REG_NAMES[rs2], imm),
            opcode: Opcode::Bne,
            rd: 0,
            rs1,
            rs2,
            imm,
        }
    }

    /// `JAL rd, imm` (always redirects to `pc + imm`; no link write-back)
    pub fn jal(pc: u32, rd: usize, imm: i32) -> Self {
        Self {
            pc,
            text: format!("JAL {}, {}", REG_NAMES[rd], imm),
            opcode: Opcode::Jal,
            rd,
            rs1: 0,
            rs2: 0,
            imm,
        }
    }

    /// `NOP`
    pub fn nop(pc: u32) -> Self {
        Self {
            pc,
            text: "NOP".to_string(),
            opcode: Opcode::Nop,
            rd: 0,
            rs1: 0,
            rs2: 0,
            imm: 0,
        }
    }
}
