//! Single-use spin gate
//!
//! Locked until an external unlock (a completed payment), consumed atomically
//! when a spin starts, locked again when the spin finishes.

use serde::{Deserialize, Serialize};

use crate::error::SpinError;

/// Current gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GateState {
    /// No spin entitlement
    #[default]
    Locked,
    /// Exactly one spin may start
    Unlocked,
    /// Entitlement consumed, spin animation still running
    Spinning,
}

/// Gate transition reported back to the owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    Unlocked,
    Locked,
    /// Unlock arrived mid-spin and is held until the spin completes
    Queued,
    /// Nothing changed
    None,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gate {
    state: GateState,
    /// Entitlement that arrived while spinning (at most one)
    pending_unlock: bool,
    /// Number of spins completed through this gate
    spins_completed: u32,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    pub fn spins_completed(&self) -> u32 {
        self.spins_completed
    }

    /// Grant one spin entitlement. Never stacks: repeated unlocks leave a
    /// single pending spin.
    pub fn unlock(&mut self) -> GateTransition {
        match self.state {
            GateState::Locked => {
                self.state = GateState::Unlocked;
                GateTransition::Unlocked
            }
            GateState::Unlocked => GateTransition::None,
            GateState::Spinning => {
                if self.pending_unlock {
                    GateTransition::None
                } else {
                    self.pending_unlock = true;
                    GateTransition::Queued
                }
            }
        }
    }

    /// Consume the entitlement. A second call before completion fails.
    pub fn try_spin(&mut self) -> Result<(), SpinError> {
        if self.state != GateState::Unlocked {
            return Err(SpinError::GateClosed);
        }
        self.state = GateState::Spinning;
        Ok(())
    }

    /// Spin finished: relock, then apply a queued unlock if one arrived mid-spin
    pub fn on_spin_complete(&mut self) -> GateTransition {
        if self.state != GateState::Spinning {
            return GateTransition::None;
        }
        self.spins_completed += 1;
        self.state = GateState::Locked;
        if std::mem::take(&mut self.pending_unlock) {
            self.state = GateState::Unlocked;
            return GateTransition::Unlocked;
        }
        GateTransition::Locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_locked() {
        let mut gate = Gate::new();
        assert_eq!(gate.state(), GateState::Locked);
        assert_eq!(gate.try_spin(), Err(SpinError::GateClosed));
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut gate = Gate::new();
        assert_eq!(gate.unlock(), GateTransition::Unlocked);
        assert_eq!(gate.unlock(), GateTransition::None);
        assert_eq!(gate.state(), GateState::Unlocked);

        // Only one spin despite two unlocks
        assert!(gate.try_spin().is_ok());
        gate.on_spin_complete();
        assert_eq!(gate.try_spin(), Err(SpinError::GateClosed));
    }

    #[test]
    fn test_double_click_spins_once() {
        let mut gate = Gate::new();
        gate.unlock();
        assert!(gate.try_spin().is_ok());
        assert_eq!(gate.try_spin(), Err(SpinError::GateClosed));
        assert_eq!(gate.state(), GateState::Spinning);
    }

    #[test]
    fn test_relocks_after_completion() {
        let mut gate = Gate::new();
        gate.unlock();
        gate.try_spin().unwrap();
        assert_eq!(gate.on_spin_complete(), GateTransition::Locked);
        assert_eq!(gate.state(), GateState::Locked);
        assert_eq!(gate.spins_completed(), 1);
        assert_eq!(gate.try_spin(), Err(SpinError::GateClosed));

        gate.unlock();
        assert!(gate.try_spin().is_ok());
    }

    #[test]
    fn test_unlock_mid_spin_is_queued_once() {
        let mut gate = Gate::new();
        gate.unlock();
        gate.try_spin().unwrap();

        assert_eq!(gate.unlock(), GateTransition::Queued);
        assert_eq!(gate.unlock(), GateTransition::None);
        assert_eq!(gate.state(), GateState::Spinning);

        assert_eq!(gate.on_spin_complete(), GateTransition::Unlocked);
        assert!(gate.is_unlocked());

        gate.try_spin().unwrap();
        assert_eq!(gate.on_spin_complete(), GateTransition::Locked);
    }

    #[test]
    fn test_complete_without_spin_is_noop() {
        let mut gate = Gate::new();
        assert_eq!(gate.on_spin_complete(), GateTransition::None);
        gate.unlock();
        assert_eq!(gate.on_spin_complete(), GateTransition::None);
        assert!(gate.is_unlocked());
    }
}
