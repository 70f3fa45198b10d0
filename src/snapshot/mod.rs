// Snapshot management for reverse execution

use crate::driver::engine::Locals;
use crate::memory::heap::Heap;

/// Mock terminal for capturing printed output
#[derive(Debug, Clone, Default)]
pub struct MockTerminal {
    pub chunks: Vec<TerminalChunk>,
}

impl MockTerminal {
    pub fn new() -> Self {
        MockTerminal { chunks: Vec::new() }
    }

    /// Print without adding a newline
    pub fn print(&mut self, text: String, step: usize) {
        if let Some(last) = self.chunks.last_mut() {
            if last.step == step {
                last.text.push_str(&text);
                return;
            }
        }
        self.chunks.push(TerminalChunk { text, step });
    }

    /// Everything printed so far, exactly as stdout would receive it
    pub fn contents(&self) -> String {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    /// Get all output as display lines
    pub fn get_output(&self) -> Vec<String> {
        let contents = self.contents();
        let mut lines: Vec<String> = contents.split('\n').map(|s| s.to_string()).collect();
        // Remove trailing empty string if text ended with newline
        if lines.last().is_some_and(|s| s.is_empty()) {
            lines.pop();
        }
        lines
    }
}

/// Output printed by a single step
#[derive(Debug, Clone)]
pub struct TerminalChunk {
    pub text: String,
    pub step: usize,
}

/// Snapshot of execution state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub heap: Heap,
    pub terminal: MockTerminal,
    pub locals: Locals,
    /// Step executed just before this snapshot; None for the initial state
    pub step: Option<usize>,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Heap: every block, tombstones included, stores data plus init map
        let heap_size: usize = self
            .heap
            .allocations()
            .values()
            .map(|block| block.size * 2)
            .sum();

        let terminal_size: usize = self.terminal.chunks.iter().map(|c| c.text.len()).sum();

        heap_size + terminal_size + std::mem::size_of::<Snapshot>()
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history. Returns false if it would exceed the limit.
    pub fn push(&mut self, snapshot: Snapshot) -> bool {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return false;
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        true
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_from_one_step_are_merged() {
        let mut term = MockTerminal::new();
        term.print("a".to_string(), 0);
        term.print("b\n".to_string(), 0);
        term.print("c".to_string(), 1);
        assert_eq!(term.chunks.len(), 2);
        assert_eq!(term.contents(), "ab\nc");
    }

    #[test]
    fn output_lines_drop_trailing_newline() {
        let mut term = MockTerminal::new();
        term.print("\nfoo -->123\n\n".to_string(), 3);
        assert_eq!(term.get_output(), vec!["", "foo -->123", ""]);
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            heap: Heap::default(),
            terminal: MockTerminal::new(),
            locals: Locals::default(),
            step: None,
        }
    }

    #[test]
    fn manager_enforces_memory_limit() {
        let size = snapshot().estimated_size();
        let mut manager = SnapshotManager::new(size * 2);
        assert!(manager.push(snapshot()));
        assert!(manager.push(snapshot()));
        assert!(!manager.push(snapshot()));
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.memory_usage(), size * 2);
    }
}
