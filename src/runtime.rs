//! Top-level control loop wrapper.
//!
//! ```text
//!   setup ──Ok──▶ Running(app) ──step Ok──▶ Running(app)
//!     │                 │
//!     Err               step Err
//!     ▼                 ▼
//!   Halted(fault) ◀─────┘      (terminal: the app is dropped)
//! ```
//!
//! A setup failure and a fatal transport error end up in the same
//! terminal state.  What "halted" means physically (park the task, exit
//! the process) is the board's business.

use log::{error, info};

use crate::error::Fault;

#[derive(Debug)]
pub enum LoopState<A> {
    Running(A),
    Halted(Fault),
}

pub struct ControlLoop<A> {
    state: LoopState<A>,
}

impl<A> ControlLoop<A> {
    /// Wrap the outcome of the setup phase.
    pub fn start(setup: Result<A, Fault>) -> Self {
        let state = match setup {
            Ok(app) => {
                info!("control loop running");
                LoopState::Running(app)
            }
            Err(fault) => {
                error!("setup failed: {}", fault);
                LoopState::Halted(fault)
            }
        };
        Self { state }
    }

    /// Run one iteration.  Returns the fault once the loop is halted;
    /// a halted loop never runs the app again.
    pub fn step<F>(&mut self, iteration: F) -> Option<Fault>
    where
        F: FnOnce(&mut A) -> Result<(), Fault>,
    {
        let fault = match &mut self.state {
            LoopState::Halted(fault) => return Some(*fault),
            LoopState::Running(app) => match iteration(app) {
                Ok(()) => return None,
                Err(fault) => fault,
            },
        };
        error!("halting: {}", fault);
        self.state = LoopState::Halted(fault);
        Some(fault)
    }

    pub fn fault(&self) -> Option<Fault> {
        match self.state {
            LoopState::Halted(fault) => Some(fault),
            LoopState::Running(_) => None,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, LoopState::Halted(_))
    }

    pub fn app(&self) -> Option<&A> {
        match &self.state {
            LoopState::Running(app) => Some(app),
            LoopState::Halted(_) => None,
        }
    }

    pub fn state(&self) -> &LoopState<A> {
        &self.state
    }
}
