//! Health pool value object
//!
//! Replaces loose `health`/`max_health` integers with a single type whose
//! constructor and mutators keep `0 <= current <= max` at all times.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A health pool.
///
/// # Invariants
///
/// - `current <= max`
/// - Both values are unsigned, so neither can go negative
///
/// # Examples
///
/// ```
/// use emberhold_domain::value_objects::Health;
///
/// let mut health = Health::full(100);
/// assert_eq!(health.take(30), 30);
/// assert_eq!(health.current(), 70);
/// assert_eq!(health.heal(1000), 30);
/// assert!(health.is_full());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HealthRepr", into = "HealthRepr")]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// A pool at full capacity.
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// A pool with an explicit current value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Constraint` if `current > max`.
    pub fn new(current: u32, max: u32) -> Result<Self, DomainError> {
        if current > max {
            return Err(DomainError::constraint(format!(
                "health {current} exceeds maximum {max}"
            )));
        }
        Ok(Self { current, max })
    }

    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Remove up to `amount`, saturating at zero. Returns the amount removed.
    pub fn take(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Add up to `amount`, capped at max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max - self.current);
        self.current += restored;
        restored
    }

    /// Refill to max. Returns the amount restored.
    pub fn restore(&mut self) -> u32 {
        let restored = self.max - self.current;
        self.current = self.max;
        restored
    }

    /// Drop straight to zero.
    pub fn deplete(&mut self) {
        self.current = 0;
    }

    /// Change the maximum and refill to it (level-up semantics).
    pub fn reset_max(&mut self, max: u32) {
        self.max = max;
        self.current = max;
    }
}

#[derive(Serialize, Deserialize)]
struct HealthRepr {
    current: u32,
    max: u32,
}

impl TryFrom<HealthRepr> for Health {
    type Error = DomainError;

    fn try_from(repr: HealthRepr) -> Result<Self, Self::Error> {
        Self::new(repr.current, repr.max)
    }
}

impl From<Health> for HealthRepr {
    fn from(health: Health) -> Self {
        Self {
            current: health.current,
            max: health.max,
        }
    }
}
