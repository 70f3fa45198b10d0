//! The step plan
//!
//! A run is an explicit list of [`Step`]s built from the [`RunConfig`]. The
//! driver executes them in order and the replay UI shows the same list as the
//! program listing, highlighting the step the current snapshot was taken at.

use crate::config::RunConfig;
use std::fmt;

/// One observable action of the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `a = malloc(buffer_len * sizeof(int))`
    AllocateBuffer,
    /// Print the int under the cursor before the loop
    PrintInitial,
    /// Call the mutator on the cursor with loop index `i`
    Mutate(u32),
    /// Print the int under the cursor inside the loop
    PrintLoop(u32),
    /// `a++`
    Advance(u32),
    /// Print the int under the cursor after the loop
    PrintFinal,
    /// Call the allocator routine
    AllocateScalar,
    /// Print the scalar
    PrintScalar,
    /// Free the buffer base and the scalar
    Release,
    /// Return 0
    Exit,
}

impl Step {
    /// Build the plan for a configuration
    pub fn plan(config: &RunConfig) -> Vec<Step> {
        let mut steps = vec![Step::AllocateBuffer, Step::PrintInitial];
        for i in 1..=config.iterations {
            steps.push(Step::Mutate(i));
            steps.push(Step::PrintLoop(i));
            steps.push(Step::Advance(i));
        }
        steps.push(Step::PrintFinal);
        steps.push(Step::AllocateScalar);
        steps.push(Step::PrintScalar);
        if config.release_on_exit {
            steps.push(Step::Release);
        }
        steps.push(Step::Exit);
        steps
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::AllocateBuffer => write!(f, "a = malloc(N * sizeof(int))"),
            Step::PrintInitial => write!(f, "print *a"),
            Step::Mutate(i) => write!(f, "    modifier(a, {})", i),
            Step::PrintLoop(i) => write!(f, "    print a[{}] = *a", i),
            Step::Advance(_) => write!(f, "    a++"),
            Step::PrintFinal => write!(f, "print *a"),
            Step::AllocateScalar => write!(f, "heap_addr = foo()"),
            Step::PrintScalar => write!(f, "print *heap_addr"),
            Step::Release => write!(f, "free(base); free(heap_addr)"),
            Step::Exit => write!(f, "return 0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_shape() {
        let plan = Step::plan(&RunConfig::default());
        // 2 before the loop, 3 per iteration, 4 after
        assert_eq!(plan.len(), 2 + 3 * 10 + 4);
        assert_eq!(plan[0], Step::AllocateBuffer);
        assert_eq!(plan[2], Step::Mutate(1));
        assert_eq!(plan[31], Step::Advance(10));
        assert_eq!(plan.last(), Some(&Step::Exit));
        assert!(!plan.contains(&Step::Release));
    }

    #[test]
    fn release_is_planned_before_exit() {
        let config = RunConfig {
            release_on_exit: true,
            ..RunConfig::default()
        };
        let plan = Step::plan(&config);
        let n = plan.len();
        assert_eq!(&plan[n - 2..], &[Step::Release, Step::Exit]);
    }

    #[test]
    fn loop_indices_run_in_order() {
        let plan = Step::plan(&RunConfig::default());
        let indices: Vec<u32> = plan
            .iter()
            .filter_map(|s| match s {
                Step::PrintLoop(i) => Some(*i),
                _ => None,
            })
            .collect();
        assert_eq!(indices, (1..=10).collect::<Vec<_>>());
    }
}
