//! Transition functions (delta) for finite automata:
//! a two-key mapping from (state, symbol) to either a single destination
//! state (deterministic) or a set of destination states (non-deterministic).

use std::collections::BTreeMap;

use crate::error::AutomatonError;
use crate::state::{State, StateSet};
use crate::symbol::{Symbol, symbol_name};

/// Generic two-key transition table. `D` is the destination shape:
/// [`DetDelta`] maps to a single state, [`NonDetDelta`] to a state set.
/// Entries are kept in (state, symbol) order, so enumeration is stable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delta<D> {
    rows: BTreeMap<State, BTreeMap<Symbol, D>>,
}

/// Deterministic transition function: at most one destination per entry.
pub type DetDelta = Delta<State>;

/// Non-deterministic transition function: a destination set per entry.
pub type NonDetDelta = Delta<StateSet>;

impl<D> Default for Delta<D> {
    fn default() -> Self {
        Delta {
            rows: BTreeMap::new(),
        }
    }
}

impl<D> Delta<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the destination for (state, symbol). Absence of an entry is
    /// the undefined transition, not an error.
    pub fn get(&self, src: &str, symbol: Symbol) -> Option<&D> {
        self.rows.get(src)?.get(&symbol)
    }

    /// True iff `src` is the source of at least one stored transition.
    pub fn has_source(&self, src: &str) -> bool {
        self.rows.get(src).is_some_and(|row| !row.is_empty())
    }

    /// Number of stored (state, symbol) entries.
    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.values().all(BTreeMap::is_empty)
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Enumerate every stored entry as a (source, symbol, destination)
    /// triple, ordered by source state and then symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, Symbol, &D)> {
        self.rows.iter().flat_map(|(src, row)| {
            row.iter().map(move |(&symbol, dest)| (src, symbol, dest))
        })
    }

    fn row(&mut self, src: impl Into<State>) -> &mut BTreeMap<Symbol, D> {
        self.rows.entry(src.into()).or_default()
    }
}

impl DetDelta {
    /// Insert or replace the destination for (state, symbol).
    pub fn insert(&mut self, src: impl Into<State>, symbol: Symbol, dest: impl Into<State>) {
        self.row(src).insert(symbol, dest.into());
    }

    /// Widen to the non-deterministic shape: every destination becomes a
    /// singleton set. Always succeeds.
    pub fn to_nondeterministic(&self) -> NonDetDelta {
        let mut ndelta = NonDetDelta::new();
        for (src, symbol, dest) in self.transitions() {
            ndelta.add(src.clone(), symbol, dest.clone());
        }
        ndelta
    }
}

impl NonDetDelta {
    /// Union `dest` into the destination set for (state, symbol).
    pub fn add(&mut self, src: impl Into<State>, symbol: Symbol, dest: impl Into<State>) {
        self.row(src).entry(symbol).or_default().insert(dest);
    }

    /// Union every state of `dests` into the destination set for
    /// (state, symbol). An empty `dests` adds no entry.
    pub fn add_all(&mut self, src: impl Into<State>, symbol: Symbol, dests: &StateSet) {
        let src = src.into();
        for dest in dests {
            self.add(src.clone(), symbol, dest.clone());
        }
    }

    /// Narrow to the deterministic shape. Fails on the first entry whose
    /// destination set does not have exactly one element; absent entries are
    /// simply omitted.
    pub fn to_deterministic(&self) -> Result<DetDelta, AutomatonError> {
        let mut ddelta = DetDelta::new();
        for (src, symbol, dests) in self.transitions() {
            match dests.len() {
                1 => {
                    let dest = dests.any_element().cloned().unwrap_or_default();
                    ddelta.insert(src.clone(), symbol, dest);
                }
                count => {
                    return Err(AutomatonError::NotDeterministic {
                        state: src.clone(),
                        symbol: symbol_name(symbol),
                        count,
                    });
                }
            }
        }
        Ok(ddelta)
    }
}
