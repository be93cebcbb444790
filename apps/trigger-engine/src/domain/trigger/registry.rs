//! Trigger Registry
//!
//! Symbol-keyed collection of live trigger conditions. Not synchronized; the
//! engine wraps it in a single mutex.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;

use super::TriggerCondition;
use crate::domain::shared::{OrderId, Symbol};

/// Live trigger conditions grouped by symbol.
///
/// A symbol is in the monitored set iff its condition list is non-empty.
/// Every mutating method restores this before returning.
#[derive(Debug, Default)]
pub struct TriggerRegistry {
    conditions: HashMap<Symbol, Vec<TriggerCondition>>,
    monitored: BTreeSet<Symbol>,
}

impl TriggerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a condition under its symbol.
    pub fn insert(&mut self, condition: TriggerCondition) {
        let symbol = condition.symbol().clone();
        self.conditions
            .entry(symbol.clone())
            .or_default()
            .push(condition);
        self.monitored.insert(symbol);
    }

    /// Register a condition unless its order is already watched.
    /// Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, condition: TriggerCondition) -> bool {
        if self.contains_order(condition.order_id()) {
            return false;
        }
        self.insert(condition);
        true
    }

    /// Remove every condition watching `order_id`. Returns how many were removed.
    pub fn remove_order(&mut self, order_id: &OrderId) -> usize {
        let mut removed = 0;
        let mut emptied = Vec::new();

        for (symbol, list) in &mut self.conditions {
            let before = list.len();
            list.retain(|c| c.order_id() != order_id);
            removed += before - list.len();
            if list.is_empty() {
                emptied.push(symbol.clone());
            }
        }

        for symbol in emptied {
            self.drop_symbol(&symbol);
        }

        removed
    }

    /// Reprice and evaluate every condition for `symbol` against `price`.
    ///
    /// Conditions that fire are removed and returned, so the same condition
    /// can never fire twice.
    pub fn evaluate(&mut self, symbol: &Symbol, price: Decimal) -> Vec<TriggerCondition> {
        let Some(list) = self.conditions.get_mut(symbol) else {
            return Vec::new();
        };

        let mut fired = Vec::new();
        let mut kept = Vec::with_capacity(list.len());
        for mut condition in list.drain(..) {
            if condition.observe(price) {
                fired.push(condition);
            } else {
                kept.push(condition);
            }
        }
        *list = kept;

        if list.is_empty() {
            self.drop_symbol(symbol);
        }

        fired
    }

    /// Monitored symbols, sorted.
    #[must_use]
    pub fn monitored_symbols(&self) -> Vec<Symbol> {
        self.monitored.iter().cloned().collect()
    }

    /// Whether `symbol` has live conditions.
    #[must_use]
    pub fn is_monitored(&self, symbol: &Symbol) -> bool {
        self.monitored.contains(symbol)
    }

    /// Number of monitored symbols.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.monitored.len()
    }

    /// Total number of live conditions.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.conditions.values().map(Vec::len).sum()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monitored.is_empty()
    }

    /// Conditions registered for `symbol`, in registration order.
    #[must_use]
    pub fn conditions_for(&self, symbol: &Symbol) -> &[TriggerCondition] {
        self.conditions.get(symbol).map_or(&[][..], Vec::as_slice)
    }

    /// Whether any condition watches `order_id`.
    #[must_use]
    pub fn contains_order(&self, order_id: &OrderId) -> bool {
        self.conditions
            .values()
            .flatten()
            .any(|c| c.order_id() == order_id)
    }

    /// Iterate `(symbol, conditions)` in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &[TriggerCondition])> {
        self.monitored
            .iter()
            .map(|s| (s, self.conditions_for(s)))
    }

    /// Check the monitored-set invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let non_empty: BTreeSet<&Symbol> = self
            .conditions
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(s, _)| s)
            .collect();

        non_empty.len() == self.conditions.len()
            && non_empty.len() == self.monitored.len()
            && self.monitored.iter().all(|s| non_empty.contains(s))
    }

    fn drop_symbol(&mut self, symbol: &Symbol) {
        self.conditions.remove(symbol);
        self.monitored.remove(symbol);
    }
}
