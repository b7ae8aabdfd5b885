use o3sim_core::{Config, DecodedInstruction, Program, Simulator};

/// Upper bound for `run_to_completion`; any well-formed test program
/// drains far below this.
const CYCLE_BOUND: u64 = 100_000;

pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            sim: Simulator::new(&config),
        }
    }

    /// Loads a program and points fetch at its first instruction.
    pub fn load_program(mut self, instructions: Vec<DecodedInstruction>) -> Self {
        let start_pc = instructions.first().map(|inst| inst.pc).unwrap_or(0);
        self.sim
            .load_program(Program::from_instructions(instructions), start_pc);
        self
    }

    /// Reads a committed architectural register value.
    pub fn reg(&self, idx: usize) -> i32 {
        self.sim.registers()[idx]
    }

    /// Reads a main memory word at a byte address.
    pub fn mem(&self, addr: u32) -> i32 {
        self.sim.core.mem.read_word(addr)
    }

    /// Preloads a main memory word at a byte address.
    pub fn set_mem(&mut self, addr: u32, value: i32) {
        self.sim.core.mem.write_word(addr, value);
    }

    /// Runs until the pipeline drains; panics if it never does.
    /// Returns the number of cycles used.
    pub fn run_to_completion(&mut self) -> u64 {
        let used = self.sim.run_until_idle(CYCLE_BOUND);
        assert!(used < CYCLE_BOUND, "pipeline failed to drain");
        used
    }
}
