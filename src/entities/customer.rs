// Customer Entity - identity-keyed account holder
//
// Customers are loaded fully formed from storage and never mutated by the
// analytics layer. Equality and hashing go through the numeric id only, so
// a Customer can key a group-by map even if display fields diverge between
// snapshots.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Loyalty tier range accepted by `Customer::new` (inclusive).
pub const TIER_MIN: i32 = 1;
pub const TIER_MAX: i32 = 3;

/// Customer entity.
///
/// Identity: numeric `id` (assigned by storage, never changes)
/// Values: `name`, `tier` (loyalty classification, 1-3)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub tier: i32,
}

impl Customer {
    pub fn new(id: i64, name: impl Into<String>, tier: i32) -> Self {
        Customer {
            id,
            name: name.into(),
            tier,
        }
    }

    /// Tier membership check used by order filters.
    pub fn has_tier(&self, tier: i32) -> bool {
        self.tier == tier
    }

    /// True when the tier sits in the documented 1-3 range.
    pub fn tier_in_range(&self) -> bool {
        (TIER_MIN..=TIER_MAX).contains(&self.tier)
    }
}

// Identity-based equality: two snapshots of the same customer row are the
// same customer, whatever the value fields say.
impl PartialEq for Customer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Customer {}

impl Hash for Customer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ============================================================================
// TESTS
// ============================================================================
