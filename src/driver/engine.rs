// Execution engine for the pointer walk

use crate::config::{RunConfig, UninitPolicy};
use crate::driver::errors::RuntimeError;
use crate::driver::routines;
use crate::driver::step::Step;
use crate::memory::heap::{Heap, HeapError, LeakedBlock};
use crate::memory::value::{Address, Value};
use crate::memory::{pointer_add, INT_SIZE};
use crate::snapshot::{MockTerminal, Snapshot, SnapshotManager};
use tracing::{debug, info, warn};

/// The driver's local variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locals {
    /// The cursor
    pub a: Value,
    /// Buffer base, kept so the buffer can still be freed after `a` has moved
    pub base: Value,
    /// Loop counter, only in scope inside the loop
    pub i: Option<u32>,
    /// Pointer returned by the allocator routine
    pub heap_addr: Value,
}

impl Default for Locals {
    fn default() -> Self {
        Locals {
            a: Value::Null,
            base: Value::Null,
            i: None,
            heap_addr: Value::Uninitialized,
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Everything the program printed
    pub output: String,
    pub exit_code: i32,
    /// Addresses read before anything was written there, in read order
    pub uninitialized_reads: Vec<Address>,
    /// Blocks still allocated when the program returned
    pub leaks: Vec<LeakedBlock>,
    pub snapshots: usize,
}

/// Executes the step plan against the simulated heap and records history
pub struct Driver {
    config: RunConfig,

    /// Steps in execution order
    plan: Vec<Step>,

    /// Heap memory
    heap: Heap,

    /// Mock terminal for printed output
    terminal: MockTerminal,

    locals: Locals,

    /// Index into `plan` of the last executed step
    current_step: Option<usize>,

    /// Snapshot manager for reverse execution
    snapshot_manager: SnapshotManager,

    /// Current position in execution history (for stepping backward/forward)
    history_position: usize,

    /// Whether `run` has been called; a driver runs at most once
    started: bool,

    /// Whether execution has finished
    finished: bool,

    uninitialized_reads: Vec<Address>,
}

impl Driver {
    /// Create a driver for a configuration. The configuration should already
    /// have passed [`RunConfig::validate`].
    pub fn new(config: RunConfig) -> Self {
        let plan = Step::plan(&config);
        Driver {
            plan,
            heap: Heap::new(config.heap_limit),
            terminal: MockTerminal::new(),
            locals: Locals::default(),
            current_step: None,
            snapshot_manager: SnapshotManager::new(config.snapshot_limit),
            history_position: 0,
            started: false,
            finished: false,
            uninitialized_reads: Vec::new(),
            config,
        }
    }

    /// Run the program from start to finish
    pub fn run(&mut self) -> Result<RunReport, RuntimeError> {
        if self.started {
            return Err(RuntimeError::HistoryOperationFailed(
                "the program has already run".to_string(),
            ));
        }
        self.started = true;

        info!(
            buffer_len = self.config.buffer_len,
            iterations = self.config.iterations,
            steps = self.plan.len(),
            "starting run"
        );

        // Initial state, before anything executes
        self.take_snapshot()?;

        for index in 0..self.plan.len() {
            let step = self.plan[index];
            debug!(index, %step, "executing step");
            self.current_step = Some(index);
            self.execute_step(index, step)?;
            self.take_snapshot()?;
        }

        self.finished = true;
        let report = self.report();
        for leak in &report.leaks {
            let address = Value::Pointer(leak.address);
            warn!(
                address = %address,
                size = leak.size,
                "block never freed"
            );
        }
        info!(snapshots = report.snapshots, "run finished");
        Ok(report)
    }

    fn execute_step(&mut self, index: usize, step: Step) -> Result<(), RuntimeError> {
        let memory = |source| RuntimeError::Memory {
            step: index,
            source,
        };

        match step {
            Step::AllocateBuffer => {
                let size = self
                    .config
                    .buffer_len
                    .checked_mul(INT_SIZE)
                    .ok_or(HeapError::OutOfMemory {
                        requested: usize::MAX,
                        allocated: self.heap.total_allocated(),
                        limit: self.heap.max_size(),
                    })
                    .map_err(memory)?;
                let addr = self.heap.allocate(size).map_err(memory)?;
                self.locals.a = Value::Pointer(addr);
                self.locals.base = Value::Pointer(addr);
            }
            Step::PrintInitial => {
                let value = self.read_int_at(self.locals.a, "a", index)?;
                self.print(format!(" a is now {}\n", value), index);
            }
            Step::Mutate(i) => {
                self.locals.i = Some(i);
                let target = Self::pointer(self.locals.a, "a", index)?;
                routines::modifier(&mut self.heap, target, i).map_err(memory)?;
            }
            Step::PrintLoop(i) => {
                let value = self.read_int_at(self.locals.a, "a", index)?;
                self.print(format!("\n\t inside loop: a[{}] = {}", i, value), index);
            }
            Step::Advance(_) => {
                let addr = Self::pointer(self.locals.a, "a", index)?;
                self.locals.a = Value::Pointer(pointer_add(addr, 1, INT_SIZE));
            }
            Step::PrintFinal => {
                self.locals.i = None;
                let value = self.read_int_at(self.locals.a, "a", index)?;
                self.print(format!("\na is now {}\n", value), index);
            }
            Step::AllocateScalar => {
                let addr =
                    routines::foo(&mut self.heap, self.config.scalar_value).map_err(memory)?;
                self.locals.heap_addr = Value::Pointer(addr);
            }
            Step::PrintScalar => {
                let value = self.read_int_at(self.locals.heap_addr, "heap_addr", index)?;
                self.print(format!("\nfoo -->{}\n\n", value), index);
            }
            Step::Release => {
                let base = Self::pointer(self.locals.base, "base", index)?;
                let scalar = Self::pointer(self.locals.heap_addr, "heap_addr", index)?;
                self.heap.free(base).map_err(memory)?;
                self.heap.free(scalar).map_err(memory)?;
            }
            Step::Exit => {}
        }
        Ok(())
    }

    /// Dereference an int pointer held in a local, applying the uninit policy
    fn read_int_at(
        &mut self,
        ptr: Value,
        name: &'static str,
        step: usize,
    ) -> Result<i32, RuntimeError> {
        let addr = Self::pointer(ptr, name, step)?;
        let memory = |source| RuntimeError::Memory { step, source };

        match self.heap.read_int(addr).map_err(memory)? {
            Value::Int(n) => Ok(n),
            _ => {
                if self.config.uninit_policy == UninitPolicy::Strict {
                    return Err(RuntimeError::UninitializedRead {
                        address: addr,
                        step,
                    });
                }
                let address = Value::Pointer(addr);
                warn!(address = %address, step, "read of uninitialized int");
                self.uninitialized_reads.push(addr);
                self.heap.peek_int(addr).map_err(memory)
            }
        }
    }

    fn pointer(value: Value, name: &'static str, step: usize) -> Result<Address, RuntimeError> {
        value
            .as_pointer()
            .ok_or(RuntimeError::NotAPointer { name, step })
    }

    fn print(&mut self, text: String, step: usize) {
        self.terminal.print(text, step);
    }

    /// Summarize the run so far
    pub fn report(&self) -> RunReport {
        RunReport {
            output: self.terminal.contents(),
            exit_code: 0,
            uninitialized_reads: self.uninitialized_reads.clone(),
            leaks: self.heap.leaks(),
            snapshots: self.snapshot_manager.len(),
        }
    }

    // ========== History ==========

    fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        let snapshot = Snapshot {
            heap: self.heap.clone(),
            terminal: self.terminal.clone(),
            locals: self.locals,
            step: self.current_step,
        };

        if !self.snapshot_manager.push(snapshot) {
            return Err(RuntimeError::SnapshotLimitExceeded {
                current: self.snapshot_manager.memory_usage(),
                limit: self.snapshot_manager.memory_limit(),
            });
        }

        self.history_position = self.snapshot_manager.len() - 1;
        Ok(())
    }

    /// Restore execution state from a snapshot
    fn restore_snapshot(&mut self, index: usize) -> Result<(), RuntimeError> {
        let snapshot = self.snapshot_manager.get(index).ok_or_else(|| {
            RuntimeError::HistoryOperationFailed(format!("no snapshot at position {}", index))
        })?;
        self.heap = snapshot.heap.clone();
        self.terminal = snapshot.terminal.clone();
        self.locals = snapshot.locals;
        self.current_step = snapshot.step;
        self.history_position = index;
        Ok(())
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryOperationFailed(
                "already at the start of execution".to_string(),
            ));
        }
        self.restore_snapshot(self.history_position - 1)
    }

    /// Step forward in execution (replay the next snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.snapshot_manager.len() {
            return Err(RuntimeError::HistoryOperationFailed(
                "no more snapshots available (execution finished)".to_string(),
            ));
        }
        self.restore_snapshot(self.history_position + 1)
    }

    /// Rewind to the initial snapshot
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        self.restore_snapshot(0)
    }

    /// Jump to the last snapshot
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        match self.snapshot_manager.len() {
            0 => Err(RuntimeError::HistoryOperationFailed(
                "no snapshots recorded".to_string(),
            )),
            n => self.restore_snapshot(n - 1),
        }
    }

    // ========== Getter methods for UI ==========

    pub fn plan(&self) -> &[Step] {
        &self.plan
    }

    /// Index of the step the current snapshot was taken after
    pub fn current_step(&self) -> Option<usize> {
        self.current_step
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn terminal(&self) -> &MockTerminal {
        &self.terminal
    }

    pub fn locals(&self) -> &Locals {
        &self.locals
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Process exit code for the outcome of [`Driver::run`]
pub fn exit_status(result: &Result<RunReport, RuntimeError>) -> i32 {
    match result {
        Ok(report) => report.exit_code,
        Err(_) => 1,
    }
}
