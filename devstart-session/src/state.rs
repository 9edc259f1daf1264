//! Startup state machine.
//!
//! ```text
//! Idle → Resolving → Validating → CheckingPorts → CheckingScripts
//!      → StartingBackend → StartingFrontend → Running
//! ```
//!
//! Each state names the unit of work in progress. A passed step moves one
//! state forward; a failed step moves to `Failed`. `Running` and `Failed` are
//! terminal and absorb every further outcome.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    Idle,
    Resolving,
    Validating,
    CheckingPorts,
    CheckingScripts,
    StartingBackend,
    StartingFrontend,
    Running,
    Failed,
}

/// Result of the unit of work done in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Passed,
    Failed,
}

impl SessionState {
    /// The state after finishing the current step with `outcome`.
    pub fn next(self, outcome: StepOutcome) -> SessionState {
        use SessionState::*;

        if self.is_terminal() {
            return self;
        }
        if outcome == StepOutcome::Failed {
            return Failed;
        }
        match self {
            Idle => Resolving,
            Resolving => Validating,
            Validating => CheckingPorts,
            CheckingPorts => CheckingScripts,
            CheckingScripts => StartingBackend,
            StartingBackend => StartingFrontend,
            StartingFrontend => Running,
            Running | Failed => self,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Running | SessionState::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "idle",
            SessionState::Resolving => "resolving",
            SessionState::Validating => "validating",
            SessionState::CheckingPorts => "checking-ports",
            SessionState::CheckingScripts => "checking-scripts",
            SessionState::StartingBackend => "starting-backend",
            SessionState::StartingFrontend => "starting-frontend",
            SessionState::Running => "running",
            SessionState::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionState::*;
    use super::*;

    const FORWARD: [SessionState; 8] = [
        Idle,
        Resolving,
        Validating,
        CheckingPorts,
        CheckingScripts,
        StartingBackend,
        StartingFrontend,
        Running,
    ];

    #[test]
    fn passing_walks_the_fixed_order() {
        let mut state = Idle;
        let mut walked = vec![state];
        while !state.is_terminal() {
            state = state.next(StepOutcome::Passed);
            walked.push(state);
        }
        assert_eq!(walked, FORWARD);
    }

    #[test]
    fn failure_from_any_non_terminal_state_is_failed() {
        for state in FORWARD.iter().filter(|s| !s.is_terminal()) {
            assert_eq!(state.next(StepOutcome::Failed), Failed, "from {state}");
        }
    }

    #[test]
    fn terminal_states_absorb_outcomes() {
        for outcome in [StepOutcome::Passed, StepOutcome::Failed] {
            assert_eq!(Running.next(outcome), Running);
            assert_eq!(Failed.next(outcome), Failed);
        }
    }

    #[test]
    fn display_is_kebab_case() {
        assert_eq!(CheckingPorts.to_string(), "checking-ports");
        assert_eq!(
            serde_json::to_string(&StartingFrontend).expect("serialize"),
            "\"starting-frontend\""
        );
    }
}
