//! Run configuration and command-line parsing
//!
//! A bare invocation runs the walk with the default [`RunConfig`] and prints
//! its output. Flags only opt into extra behavior; none of them change what
//! a default run prints to stdout.

use crate::driver::constants::{
    BUFFER_LEN, DEFAULT_HEAP_LIMIT, DEFAULT_SNAPSHOT_LIMIT, ITERATIONS, SCALAR_VALUE,
};
use crate::memory::INT_SIZE;
use thiserror::Error;

/// Environment variable holding the `tracing` filter directive
pub const LOG_ENV: &str = "HEAPWALK_LOG";

pub const USAGE: &str = "\
Usage: heapwalk [OPTIONS]

Options:
  -v, --visualize  Replay the run in the terminal UI instead of printing it
      --release    Free the buffer and the scalar before exiting
      --strict     Treat reads of uninitialized memory as fatal
  -h, --help       Print this help

Environment:
  HEAPWALK_LOG     Log filter for stderr diagnostics (default: warn)";

/// Configuration errors, reported before anything runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),

    #[error("buffer must hold at least one int")]
    EmptyBuffer,

    #[error("a buffer of {buffer_len} ints does not fit in a heap of {heap_limit} bytes")]
    BufferTooLarge { buffer_len: usize, heap_limit: usize },

    #[error(
        "{iterations} iterations would leave the cursor at element {iterations}, \
         outside a buffer of {buffer_len} ints"
    )]
    CursorOutOfBounds { iterations: u32, buffer_len: usize },
}

/// How the driver treats a read of memory that was never written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UninitPolicy {
    /// Print whatever the backing bytes hold and record the read
    #[default]
    Zero,
    /// Abort the run with `RuntimeError::UninitializedRead`
    Strict,
}

/// Everything that parameterizes one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub buffer_len: usize,
    pub iterations: u32,
    pub scalar_value: i32,
    pub heap_limit: usize,
    pub snapshot_limit: usize,
    pub uninit_policy: UninitPolicy,
    pub release_on_exit: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            buffer_len: BUFFER_LEN,
            iterations: ITERATIONS,
            scalar_value: SCALAR_VALUE,
            heap_limit: DEFAULT_HEAP_LIMIT,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
            uninit_policy: UninitPolicy::Zero,
            release_on_exit: false,
        }
    }
}

impl RunConfig {
    /// Check that the cursor stays inside the buffer for the whole walk.
    /// After the loop the cursor is dereferenced at element `iterations`,
    /// so that element has to exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_len == 0 {
            return Err(ConfigError::EmptyBuffer);
        }
        let fits = self
            .buffer_len
            .checked_mul(INT_SIZE)
            .is_some_and(|bytes| bytes <= self.heap_limit);
        if !fits {
            return Err(ConfigError::BufferTooLarge {
                buffer_len: self.buffer_len,
                heap_limit: self.heap_limit,
            });
        }
        if self.iterations as usize >= self.buffer_len {
            return Err(ConfigError::CursorOutOfBounds {
                iterations: self.iterations,
                buffer_len: self.buffer_len,
            });
        }
        Ok(())
    }
}

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run { config: RunConfig, visualize: bool },
    Help,
}

/// Parse command-line arguments (without the program name)
pub fn parse_args<I>(args: I) -> Result<Command, ConfigError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut config = RunConfig::default();
    let mut visualize = false;

    for arg in args {
        match arg.as_ref() {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--visualize" => visualize = true,
            "--release" => config.release_on_exit = true,
            "--strict" => config.uninit_policy = UninitPolicy::Strict,
            other => return Err(ConfigError::UnknownArgument(other.to_string())),
        }
    }

    config.validate()?;
    Ok(Command::Run { config, visualize })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_runs_defaults() {
        let cmd = parse_args(Vec::<String>::new()).unwrap();
        assert_eq!(
            cmd,
            Command::Run {
                config: RunConfig::default(),
                visualize: false
            }
        );
    }

    #[test]
    fn defaults_match_the_walk() {
        let config = RunConfig::default();
        assert_eq!(config.buffer_len, 100);
        assert_eq!(config.iterations, 10);
        assert_eq!(config.scalar_value, 123);
        assert!(!config.release_on_exit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn flags_are_parsed() {
        let cmd = parse_args(["--release", "--strict", "-v"]).unwrap();
        match cmd {
            Command::Run { config, visualize } => {
                assert!(visualize);
                assert!(config.release_on_exit);
                assert_eq!(config.uninit_policy, UninitPolicy::Strict);
            }
            Command::Help => panic!("expected a run"),
        }
    }

    #[test]
    fn help_wins_over_other_flags() {
        assert_eq!(parse_args(["--release", "--help"]).unwrap(), Command::Help);
    }

    #[test]
    fn unknown_argument_is_rejected() {
        assert_eq!(
            parse_args(["--fast"]),
            Err(ConfigError::UnknownArgument("--fast".to_string()))
        );
    }

    #[test]
    fn cursor_must_stay_inside_buffer() {
        let config = RunConfig {
            buffer_len: 10,
            ..RunConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::CursorOutOfBounds {
                iterations: 10,
                buffer_len: 10
            })
        );

        let config = RunConfig {
            buffer_len: 11,
            ..RunConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn oversized_buffer_is_rejected() {
        let config = RunConfig {
            buffer_len: usize::MAX / 2,
            ..RunConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BufferTooLarge {
                buffer_len: usize::MAX / 2,
                heap_limit: DEFAULT_HEAP_LIMIT
            })
        );

        let config = RunConfig {
            buffer_len: 100,
            heap_limit: 399,
            ..RunConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BufferTooLarge { .. })
        ));
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let config = RunConfig {
            buffer_len: 0,
            iterations: 0,
            ..RunConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyBuffer));
    }
}
