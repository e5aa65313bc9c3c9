//! Lifecycle state machine
//!
//! The plugin is either idle or has exactly one periodic render timer
//! running. Rendering is only permitted while active.

use super::events::LifecycleEvent;

/// Plugin lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    /// No timer, no held subscriptions
    #[default]
    Inactive,
    /// Timer running, render cycles fire every period
    Active,
}

impl LifecycleState {
    /// Check if render cycles may run in this state
    pub fn is_active(&self) -> bool {
        matches!(self, LifecycleState::Active)
    }

    /// Process an event and return the next state
    ///
    /// Re-activating an active plugin stays active (the caller restarts
    /// the timer); deactivating an inactive one is a no-op.
    pub fn transition(self, event: LifecycleEvent) -> LifecycleState {
        use LifecycleEvent::*;
        use LifecycleState::*;

        match (self, event) {
            (Inactive, Activate) => Active,
            // Restart with the new configuration
            (Active, Activate) => Active,
            (_, Deactivate) => Inactive,
        }
    }
}
