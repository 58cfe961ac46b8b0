//! `InterpreterBuilder` for assembling configured interpreter instances.

use super::{Interpreter, State};
use crate::host::Host;
use crate::program::Program;
use crate::scope::Environment;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Default per-run wall-clock cap.
const DEFAULT_TIME_LIMIT: Duration = Duration::from_millis(10_000);

/// Builder for [`Interpreter`] instances.
///
/// The host is the one mandatory collaborator; everything else has a
/// default: a 10 s wall-clock cap per run and an entropy-seeded RNG.
pub struct InterpreterBuilder {
    host: Box<dyn Host>,
    time_limit: Duration,
    rng_seed: Option<u64>,
}

impl InterpreterBuilder {
    pub fn new(host: impl Host + 'static) -> Self {
        InterpreterBuilder {
            host: Box::new(host),
            time_limit: DEFAULT_TIME_LIMIT,
            rng_seed: None,
        }
    }

    /// Cap the wall-clock time of a single run.
    #[must_use]
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Seed `RND` deterministically (tests).
    #[must_use]
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn build(self) -> Interpreter {
        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut interpreter = Interpreter {
            program: Program::new(),
            env: Environment::new(),
            for_stack: Vec::new(),
            gosub_stack: Vec::new(),
            data_pool: Vec::new(),
            data_cursor: 0,
            cont_point: None,
            state: State::Idle,
            immediate: Vec::new(),
            surface: None,
            host: self.host,
            stop_flag: Arc::new(AtomicBool::new(false)),
            time_limit: self.time_limit,
            rng,
        };
        interpreter.seed_globals();
        interpreter
    }
}
