//! Deterministic finite automata, with table-filling minimization and
//! canonical renaming.

use std::collections::HashMap;
use std::fmt;

use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use log::debug;

use crate::automaton::{Automaton, fmt_automaton};
use crate::builder::FaBuilder;
use crate::delta::DetDelta;
use crate::error::AutomatonError;
use crate::state::{SetOfStateSets, State, StateSet};
use crate::symbol::{END_OF_INPUT, Symbol, SymbolSet, symbol_at, tape_of};

/// A deterministic finite automaton. Immutable once built; constructed only
/// by [`FaBuilder`] after validation.
#[derive(Clone, Debug)]
pub struct Dfa {
    states: StateSet,
    alphabet: SymbolSet,
    start: State,
    finals: StateSet,
    delta: DetDelta,
}

impl Dfa {
    pub(crate) fn new(
        states: StateSet,
        alphabet: SymbolSet,
        start: State,
        finals: StateSet,
        delta: DetDelta,
    ) -> Self {
        Dfa {
            states,
            alphabet,
            start,
            finals,
            delta,
        }
    }

    /// The deterministic transition function.
    pub fn delta(&self) -> &DetDelta {
        &self.delta
    }

    /// Acceptance test: follow the single destination for each consumed
    /// symbol; an undefined transition rejects immediately.
    pub fn accepts(&self, input: &str) -> bool {
        let tape = tape_of(input);
        let mut i = 0;
        let mut state = &self.start;
        let mut symbol = symbol_at(&tape, i);
        while symbol != END_OF_INPUT {
            match self.delta.get(state, symbol) {
                Some(dest) => state = dest,
                None => return false,
            }
            i += 1;
            symbol = symbol_at(&tape, i);
        }
        self.finals.contains(state)
    }

    /// The destination for (state, symbol) wrapped as a singleton set, or
    /// the empty set when the transition is undefined.
    pub fn delta_at(&self, src: &str, symbol: Symbol) -> StateSet {
        match self.delta.get(src, symbol) {
            Some(dest) => StateSet::singleton(dest.clone()),
            None => StateSet::new(),
        }
    }

    /// An equivalent DFA in which no two indistinguishable states remain
    /// distinct, computed with the table-filling algorithm. Unreachable
    /// states are not pruned: each survives as its own singleton class.
    pub fn minimal_of(&self) -> Result<Dfa, AutomatonError> {
        let states: Vec<&State> = self.states.iter().collect();
        let n = states.len();
        let index: HashMap<&str, usize> = states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();

        // Symmetric "distinguishable" relation as an n x n bit matrix.
        let mut ne = FixedBitSet::with_capacity(n * n);

        // Base case: final and non-final states are distinguishable.
        for (i, si) in states.iter().enumerate() {
            for (j, sj) in states.iter().enumerate() {
                if self.finals.contains(si) != self.finals.contains(sj) {
                    ne.insert(i * n + j);
                }
            }
        }

        // Fixpoint: distinguishability propagates backward through the
        // transition function.
        let mut rounds = 0;
        let mut any_change = true;
        while any_change {
            any_change = false;
            rounds += 1;
            for i in 0..n {
                for j in 0..n {
                    if i == j || ne.contains(i * n + j) {
                        continue;
                    }
                    for &symbol in &self.alphabet {
                        let dest_i = self.delta.get(states[i], symbol);
                        let dest_j = self.delta.get(states[j], symbol);
                        let distinguishable = match (dest_i, dest_j) {
                            (None, None) => false,
                            (Some(di), Some(dj)) => {
                                di != dj && ne.contains(index[di.as_str()] * n + index[dj.as_str()])
                            }
                            // Destinations differ and one is undefined.
                            _ => true,
                        };
                        if distinguishable {
                            ne.insert(i * n + j);
                            ne.insert(j * n + i);
                            any_change = true;
                            break;
                        }
                    }
                }
            }
            // The relation stays symmetric and never relates a state to
            // itself, at every round.
            #[cfg(debug_assertions)]
            for i in 0..n {
                debug_assert!(!ne.contains(i * n + i));
                for j in 0..n {
                    debug_assert_eq!(ne.contains(i * n + j), ne.contains(j * n + i));
                }
            }
        }
        debug!("table filling converged after {rounds} round(s) over {n} states");

        // Partition S into maximal classes of mutually equivalent states.
        let mut partition = SetOfStateSets::new();
        for (i, si) in states.iter().enumerate() {
            let mut class = StateSet::singleton((*si).clone());
            for (j, sj) in states.iter().enumerate() {
                if i != j && !ne.contains(i * n + j) {
                    class.insert((*sj).clone());
                }
            }
            partition.insert(class);
        }

        // Rebuild through a fresh builder: one state per class, transitions
        // taken from any representative (all representatives agree).
        let mut builder = FaBuilder::new();
        for class in partition.iter() {
            let Some(representative) = class.any_element() else {
                continue;
            };
            for &symbol in &self.alphabet {
                if let Some(dest) = self.delta.get(representative, symbol) {
                    if let Some(dest_class) = partition.iter().find(|c| c.contains(dest)) {
                        builder.add_transition(
                            class.composite_name(),
                            symbol,
                            dest_class.composite_name(),
                        );
                    }
                }
            }
        }
        if let Some(start_class) = partition.iter().find(|c| c.contains(&self.start)) {
            builder.set_start_state(start_class.composite_name());
        }
        for class in partition.iter() {
            if class.intersects(&self.finals) {
                builder.add_final_state(class.composite_name());
            }
        }
        builder.build_dfa()
    }

    /// An equivalent DFA whose states are renamed to "0".."N-1" (zero-padded
    /// to a common width) in discovery order from the start state.
    /// Unreachable states do not survive the renaming.
    pub fn renamed_of(&self) -> Result<Dfa, AutomatonError> {
        let sorted = self.top_sorted_states();
        let width = sorted.len().to_string().len();
        let mut new_name: IndexMap<State, State> = IndexMap::new();
        for (i, state) in sorted.iter().enumerate() {
            new_name.insert(state.clone(), format!("{i:0width$}"));
        }

        let mut builder = FaBuilder::new();
        for (src, symbol, dest) in self.delta.transitions() {
            if let (Some(new_src), Some(new_dest)) = (new_name.get(src), new_name.get(dest)) {
                builder.add_transition(new_src.clone(), symbol, new_dest.clone());
            }
        }
        if let Some(new_start) = new_name.get(&self.start) {
            builder.set_start_state(new_start.clone());
        }
        for state in &self.finals {
            if let Some(new_final) = new_name.get(state) {
                builder.add_final_state(new_final.clone());
            }
        }
        builder.build_dfa()
    }
}

impl Automaton for Dfa {
    fn states(&self) -> &StateSet {
        &self.states
    }

    fn alphabet(&self) -> &SymbolSet {
        &self.alphabet
    }

    fn start_state(&self) -> &State {
        &self.start
    }

    fn final_states(&self) -> &StateSet {
        &self.finals
    }

    fn is_deterministic(&self) -> bool {
        true
    }

    fn accepts(&self, input: &str) -> bool {
        Dfa::accepts(self, input)
    }

    fn delta_at(&self, src: &str, symbol: Symbol) -> StateSet {
        Dfa::delta_at(self, src, symbol)
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_automaton(f, self)
    }
}
