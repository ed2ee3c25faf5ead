use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::SigningError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    Idle,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorAction {
    Invoke,
    /// The attempt finished, successfully or not.
    Settle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: ActorState,
    pub to: ActorState,
    pub reason: &'static str,
}

pub fn actor_transition(
    state: ActorState,
    action: ActorAction,
) -> Result<(ActorState, StateTransition), SigningError> {
    let (to, reason) = match (state, action) {
        (ActorState::Idle, ActorAction::Invoke) => (ActorState::InFlight, "invoke"),
        (ActorState::InFlight, ActorAction::Settle) => (ActorState::Idle, "settle"),
        (ActorState::InFlight, ActorAction::Invoke) => return Err(SigningError::Busy),
        (ActorState::Idle, ActorAction::Settle) => {
            return Err(SigningError::InvalidRequest(
                "illegal actor transition: settle while idle".to_owned(),
            ))
        }
    };
    Ok((
        to,
        StateTransition {
            from: state,
            to,
            reason,
        },
    ))
}

/// At-most-one-in-flight guard for one actor. Entering while another
/// attempt holds the guard fails with [`SigningError::Busy`]; nothing is
/// queued.
#[derive(Debug, Clone, Default)]
pub struct InFlightGuard {
    in_flight: Arc<AtomicBool>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ActorState {
        if self.in_flight.load(Ordering::Acquire) {
            ActorState::InFlight
        } else {
            ActorState::Idle
        }
    }

    pub fn try_enter(&self) -> Result<InFlightPermit, SigningError> {
        let current = match self.in_flight.compare_exchange(
            false,
            true,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => ActorState::Idle,
            Err(_) => ActorState::InFlight,
        };
        let (_, transition) = actor_transition(current, ActorAction::Invoke)?;
        Ok(InFlightPermit {
            in_flight: Arc::clone(&self.in_flight),
            transition,
        })
    }
}

/// Held for the duration of one attempt; dropping it returns the actor to
/// `Idle` on every exit path, including early returns and panics.
#[derive(Debug)]
pub struct InFlightPermit {
    in_flight: Arc<AtomicBool>,
    transition: StateTransition,
}

impl InFlightPermit {
    pub fn transition(&self) -> &StateTransition {
        &self.transition
    }

    /// Ends the attempt, returning the actor to `Idle`.
    pub fn settle(self) -> Result<StateTransition, SigningError> {
        let current = if self.in_flight.load(Ordering::Acquire) {
            ActorState::InFlight
        } else {
            ActorState::Idle
        };
        let (_, transition) = actor_transition(current, ActorAction::Settle)?;
        Ok(transition)
    }
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
