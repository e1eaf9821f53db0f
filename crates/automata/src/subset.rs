//! Subset construction: conversion of an NFA into an equivalent DFA by
//! tracking sets of simultaneously-possible states.

use log::debug;

use crate::automaton::Automaton;
use crate::builder::FaBuilder;
use crate::dfa::Dfa;
use crate::error::AutomatonError;
use crate::nfa::Nfa;
use crate::state::{SetOfStateSets, StateSet};

/// Convert an NFA into an equivalent DFA through a fresh builder. Each DFA
/// state is the composite name of a set of NFA states; the start state is
/// the epsilon-closure of the NFA's start state, and a state set is final
/// iff it intersects the NFA's final states.
///
/// The number of distinct state sets is bounded by 2^|S| and processed sets
/// are never re-added to the work-list, so the construction always
/// terminates; the exponential worst case is inherent to the algorithm.
pub fn subset_construction(nfa: &Nfa) -> Result<Dfa, AutomatonError> {
    let mut builder = FaBuilder::new();

    let start_set = nfa.eps_closure_of(nfa.start_state());
    let mut all_sets = SetOfStateSets::singleton(start_set.clone());
    let mut to_check = SetOfStateSets::singleton(start_set.clone());

    while let Some(src_set) = to_check.pop_first() {
        for &symbol in nfa.alphabet() {
            let dest_set: StateSet = nfa.eps_closure(&nfa.all_dests_for(&src_set, symbol));
            if dest_set.is_empty() {
                // Transition undefined for the whole set, nothing to record.
                continue;
            }
            if all_sets.insert(dest_set.clone()) {
                to_check.insert(dest_set.clone());
            }
            builder.add_transition(src_set.composite_name(), symbol, dest_set.composite_name());
        }
    }

    builder.set_start_state(start_set.composite_name());
    for state_set in all_sets.iter() {
        if state_set.intersects(nfa.final_states()) {
            builder.add_final_state(state_set.composite_name());
        }
    }
    debug!(
        "subset construction discovered {} state set(s) for {} NFA state(s)",
        all_sets.len(),
        nfa.states().len()
    );

    builder.build_dfa()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::EPSILON;

    fn sample_nfa() -> Nfa {
        let mut builder = FaBuilder::new();
        builder
            .set_start_state("1")
            .add_final_states(["2", "4"])
            .add_transition("1", 'a', "2")
            .add_transition("1", 'b', "1")
            .add_transition("2", 'a', "2")
            .add_transition("2", 'b', "1")
            .add_transition("2", 'b', "3")
            .add_transition("3", 'a', "2")
            .add_transition("3", 'b', "4")
            .add_transition("4", 'a', "4")
            .add_transition("4", 'b', "4");
        builder.build_nfa().unwrap()
    }

    fn language_samples() -> &'static [&'static str] {
        &[
            "", "a", "b", "ab", "ba", "aa", "bb", "abb", "abba", "bbab", "abab", "bbbb", "aabb",
            "abbb",
        ]
    }

    #[test]
    fn dfa_accepts_the_same_language() {
        let nfa = sample_nfa();
        let dfa = subset_construction(&nfa).unwrap();
        for input in language_samples() {
            assert_eq!(
                dfa.accepts(input),
                nfa.accepts_checked(input).unwrap(),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn start_state_is_the_closure_of_the_nfa_start() {
        let mut builder = FaBuilder::new();
        builder
            .set_start_state("S")
            .add_final_state("E")
            .add_transition("S", EPSILON, "A")
            .add_transition("A", 'a', "E");
        let nfa = builder.build_nfa().unwrap();
        let dfa = nfa.dfa_of().unwrap();
        assert_eq!(dfa.start_state(), "A+S");
        assert!(dfa.accepts("a"));
        assert!(!dfa.accepts(""));
    }

    #[test]
    fn no_transition_to_an_empty_set() {
        let nfa = sample_nfa();
        let dfa = subset_construction(&nfa).unwrap();
        for (_, _, dest) in dfa.delta().transitions() {
            assert!(!dest.is_empty());
        }
    }

    #[test]
    fn epsilon_cycles_terminate() {
        let mut builder = FaBuilder::new();
        builder
            .set_start_state("X")
            .add_final_state("Y")
            .add_transition("X", EPSILON, "Y")
            .add_transition("Y", EPSILON, "X")
            .add_transition("X", 'a', "X");
        let nfa = builder.build_nfa().unwrap();
        let dfa = subset_construction(&nfa).unwrap();
        assert!(dfa.accepts(""));
        assert!(dfa.accepts("aaa"));
        assert!(!dfa.accepts("b"));
    }

    #[test]
    fn minimization_after_subset_construction_round_trips() {
        let nfa = sample_nfa();
        let dfa = nfa.dfa_of().unwrap();
        let minimal = dfa.minimal_of().unwrap();
        assert!(minimal.states().len() <= dfa.states().len());
        for input in language_samples() {
            assert_eq!(
                minimal.accepts(input),
                nfa.accepts_checked(input).unwrap(),
                "input {input:?}"
            );
        }
    }
}
