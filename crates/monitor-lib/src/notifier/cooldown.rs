//! Per-kind alert cooldown bookkeeping
//!
//! The state lives only in memory and is owned by the check loop; a
//! restart clears it, so an alert sent just before a restart may be sent
//! again right after.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::evaluator::AlertKind;

/// Default minimum time between two alerts of the same kind (5 minutes)
pub const DEFAULT_COOLDOWN_SECS: u64 = 5 * 60;

/// Last send instant for each alert kind
#[derive(Debug, Clone)]
pub struct CooldownState {
    cooldown: Duration,
    last_sent: HashMap<AlertKind, Instant>,
}

impl Default for CooldownState {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_COOLDOWN_SECS))
    }
}

impl CooldownState {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_sent: HashMap::new(),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// True if `kind` may fire at `now`; records `now` as the last send when it may
    pub fn try_acquire(&mut self, kind: AlertKind, now: Instant) -> bool {
        if !self.is_eligible(kind, now) {
            return false;
        }
        self.last_sent.insert(kind, now);
        true
    }

    /// Eligibility check without recording anything
    pub fn is_eligible(&self, kind: AlertKind, now: Instant) -> bool {
        match self.last_sent.get(&kind) {
            None => true,
            Some(last) => now.saturating_duration_since(*last) >= self.cooldown,
        }
    }

    /// Time left before `kind` may fire again, zero if eligible
    pub fn remaining(&self, kind: AlertKind, now: Instant) -> Duration {
        self.last_sent
            .get(&kind)
            .map(|last| self.cooldown.saturating_sub(now.saturating_duration_since(*last)))
            .unwrap_or(Duration::ZERO)
    }
}
