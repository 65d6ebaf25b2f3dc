//! Mutation lifecycle.
//!
//! Every engine mutation walks `Applied → Dispatched` and then settles as
//! `Committed`, `Compensated` or `Failed`. What happens on failure is
//! declared up front as a [`Compensation`].

use std::fmt;

/// What to do when a dispatched mutation fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    /// Nothing local was changed ahead of the remote call
    None,
    /// Local state ran ahead; discard it by reloading from the backend
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Local (optimistic) part done, nothing sent yet
    Applied,
    /// Remote calls issued
    Dispatched,
    Committed,
    /// Remote failed and local state was reloaded
    Compensated,
    /// Remote failed and local state could not be restored (or had nothing
    /// to restore)
    Failed,
}

impl Phase {
    pub fn is_settled(self) -> bool {
        matches!(self, Phase::Committed | Phase::Compensated | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Applied => "applied",
            Phase::Dispatched => "dispatched",
            Phase::Committed => "committed",
            Phase::Compensated => "compensated",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// What the engine must do after settling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Done,
    ReloadRequired,
}

/// A single mutation's progress through its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    name: &'static str,
    compensation: Compensation,
    phase: Phase,
}

impl Mutation {
    pub fn begin(name: &'static str, compensation: Compensation) -> Self {
        Mutation {
            name,
            compensation,
            phase: Phase::Applied,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn compensation(&self) -> Compensation {
        self.compensation
    }

    pub fn dispatch(&mut self) {
        if self.phase == Phase::Applied {
            self.phase = Phase::Dispatched;
        }
    }

    /// Record the remote outcome
    pub fn settle(&mut self, remote_ok: bool) -> Settlement {
        debug_assert_eq!(self.phase, Phase::Dispatched, "{} settled twice", self.name);
        if remote_ok {
            self.phase = Phase::Committed;
            return Settlement::Done;
        }
        match self.compensation {
            Compensation::None => {
                self.phase = Phase::Failed;
                Settlement::Done
            }
            Compensation::Reload => Settlement::ReloadRequired,
        }
    }

    /// Record the outcome of the compensating reload
    pub fn compensated(&mut self, reload_ok: bool) {
        self.phase = if reload_ok {
            Phase::Compensated
        } else {
            Phase::Failed
        };
    }
}
