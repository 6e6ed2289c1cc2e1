//! Resource ledger - settlement-wide resource totals

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Type of resource villagers can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Wood,
}

/// Unbounded counters, only ever increased by deliveries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceLedger {
    totals: AHashMap<ResourceType, u64>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the named counter, returns the new total
    pub fn deliver(&mut self, resource: ResourceType, amount: u64) -> u64 {
        let total = self.totals.entry(resource).or_insert(0);
        *total = total.saturating_add(amount);
        *total
    }

    /// Get current total of a resource
    pub fn get(&self, resource: ResourceType) -> u64 {
        self.totals.get(&resource).copied().unwrap_or(0)
    }

    pub fn wood(&self) -> u64 {
        self.get(ResourceType::Wood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_starts_empty() {
        let ledger = ResourceLedger::new();
        assert_eq!(ledger.wood(), 0);
    }

    #[test]
    fn test_deliver_accumulates() {
        let mut ledger = ResourceLedger::new();
        assert_eq!(ledger.deliver(ResourceType::Wood, 10), 10);
        assert_eq!(ledger.deliver(ResourceType::Wood, 10), 20);
        assert_eq!(ledger.get(ResourceType::Wood), 20);
    }

    #[test]
    fn test_deliver_saturates_instead_of_wrapping() {
        let mut ledger = ResourceLedger::new();
        ledger.deliver(ResourceType::Wood, u64::MAX - 1);
        assert_eq!(ledger.deliver(ResourceType::Wood, 5), u64::MAX);
    }
}
