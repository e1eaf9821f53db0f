//! Non-deterministic finite automata: three acceptance algorithms,
//! epsilon-closure computation and the hook into subset construction.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::automaton::{Automaton, fmt_automaton};
use crate::delta::NonDetDelta;
use crate::dfa::Dfa;
use crate::error::AutomatonError;
use crate::state::{State, StateSet};
use crate::subset::subset_construction;
use crate::symbol::{END_OF_INPUT, EPSILON, Symbol, SymbolSet, symbol_at, tape_of};

/// A non-deterministic finite automaton, possibly with epsilon transitions.
/// Immutable once built; constructed only by [`FaBuilder`](crate::FaBuilder)
/// after validation.
#[derive(Clone, Debug)]
pub struct Nfa {
    states: StateSet,
    alphabet: SymbolSet,
    start: State,
    finals: StateSet,
    delta: NonDetDelta,
}

impl Nfa {
    pub(crate) fn new(
        states: StateSet,
        alphabet: SymbolSet,
        start: State,
        finals: StateSet,
        delta: NonDetDelta,
    ) -> Self {
        Nfa {
            states,
            alphabet,
            start,
            finals,
            delta,
        }
    }

    /// The non-deterministic transition function.
    pub fn delta(&self) -> &NonDetDelta {
        &self.delta
    }

    /// Acceptance by recursive exploration of every branch, the reference
    /// semantics: epsilon branches are tried at the current position, then
    /// symbol branches at the next one.
    pub fn accepts_backtrack(&self, input: &str) -> bool {
        let tape = tape_of(input);
        self.backtrack(&self.start, &tape, 0)
    }

    fn backtrack(&self, state: &str, tape: &[Symbol], i: usize) -> bool {
        if let Some(eps_dests) = self.delta.get(state, EPSILON) {
            for dest in eps_dests {
                if self.backtrack(dest, tape, i) {
                    return true;
                }
            }
        }
        let symbol = symbol_at(tape, i);
        if symbol == END_OF_INPUT {
            return self.finals.contains(state);
        }
        if let Some(dests) = self.delta.get(state, symbol) {
            for dest in dests {
                if self.backtrack(dest, tape, i + 1) {
                    return true;
                }
            }
        }
        false
    }

    /// Acceptance with one concurrent task per branch point. Branching is
    /// identical to [`accepts_backtrack`](Self::accepts_backtrack); any
    /// branch reaching acceptance raises a shared flag, and every frame
    /// joins all tasks it spawned before returning. No early exit: all
    /// branches run to completion even once acceptance is known.
    pub fn accepts_concurrent(&self, input: &str) -> bool {
        let tape = tape_of(input);
        let accepted = AtomicBool::new(false);
        self.branch(&self.start, &tape, 0, &accepted);
        // All tasks joined above, so this read cannot race a writer.
        accepted.load(Ordering::Acquire)
    }

    fn branch(&self, state: &str, tape: &[Symbol], i: usize, accepted: &AtomicBool) {
        thread::scope(|scope| {
            if let Some(eps_dests) = self.delta.get(state, EPSILON) {
                for dest in eps_dests {
                    scope.spawn(move || self.branch(dest, tape, i, accepted));
                }
            }
            let symbol = symbol_at(tape, i);
            if symbol == END_OF_INPUT {
                if self.finals.contains(state) {
                    accepted.store(true, Ordering::Release);
                }
            } else if let Some(dests) = self.delta.get(state, symbol) {
                for dest in dests {
                    scope.spawn(move || self.branch(dest, tape, i + 1, accepted));
                }
            }
        });
    }

    /// Acceptance by tracing the set of simultaneously-possible states,
    /// closed under epsilon before and after every consumed symbol.
    pub fn accepts_subsets(&self, input: &str) -> bool {
        let tape = tape_of(input);
        let mut i = 0;
        let mut current = self.eps_closure(&StateSet::singleton(self.start.clone()));
        let mut symbol = symbol_at(&tape, i);
        while symbol != END_OF_INPUT {
            let dests = self.all_dests_for(&current, symbol);
            if dests.is_empty() {
                return false;
            }
            current = self.eps_closure(&dests);
            i += 1;
            symbol = symbol_at(&tape, i);
        }
        current.intersects(&self.finals)
    }

    /// Run all three acceptance algorithms and require them to agree; a
    /// disagreement is a defect in the engine, not a normal outcome.
    pub fn accepts_checked(&self, input: &str) -> Result<bool, AutomatonError> {
        let by_backtrack = self.accepts_backtrack(input);
        let by_branches = self.accepts_concurrent(input);
        let by_subsets = self.accepts_subsets(input);
        if by_backtrack == by_branches && by_branches == by_subsets {
            Ok(by_backtrack)
        } else {
            Err(AutomatonError::AcceptanceMismatch {
                input: input.to_string(),
            })
        }
    }

    /// The epsilon-closure of a single state.
    pub fn eps_closure_of(&self, src: &str) -> StateSet {
        self.eps_closure(&StateSet::singleton(src))
    }

    /// The epsilon-closure of a state set: the smallest superset closed
    /// under "include every epsilon-destination of any included state",
    /// computed by a work-list fixpoint.
    pub fn eps_closure(&self, src: &StateSet) -> StateSet {
        let mut closure = src.clone();
        let mut to_check = src.clone();
        while let Some(state) = to_check.pop_first() {
            if let Some(eps_dests) = self.delta.get(&state, EPSILON) {
                for dest in eps_dests {
                    if closure.insert(dest.clone()) {
                        to_check.insert(dest.clone());
                    }
                }
            }
        }
        closure
    }

    /// Union of the destinations for `symbol` over every state of `src`.
    pub fn all_dests_for(&self, src: &StateSet, symbol: Symbol) -> StateSet {
        let mut all = StateSet::new();
        for state in src {
            if let Some(dests) = self.delta.get(state, symbol) {
                all.insert_all(dests);
            }
        }
        all
    }

    /// An equivalent DFA obtained by subset construction.
    pub fn dfa_of(&self) -> Result<Dfa, AutomatonError> {
        subset_construction(self)
    }
}

impl Automaton for Nfa {
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
        false
    }

    /// Backtracking only; callers wanting the three algorithms cross-checked
    /// use [`accepts_checked`](Nfa::accepts_checked) instead.
    fn accepts(&self, input: &str) -> bool {
        self.accepts_backtrack(input)
    }

    fn delta_at(&self, src: &str, symbol: Symbol) -> StateSet {
        self.delta.get(src, symbol).cloned().unwrap_or_default()
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_automaton(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FaBuilder;

    /// NFA over {1,2,3,4}: start 1, finals {2,4}.
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

    fn eps_nfa() -> Nfa {
        // S -eps-> A -a-> E, S -eps-> B -b-> E
        let mut builder = FaBuilder::new();
        builder
            .set_start_state("S")
            .add_final_state("E")
            .add_transition("S", EPSILON, "A")
            .add_transition("S", EPSILON, "B")
            .add_transition("A", 'a', "E")
            .add_transition("B", 'b', "E");
        builder.build_nfa().unwrap()
    }

    #[test]
    fn three_algorithms_agree() {
        let nfa = sample_nfa();
        for input in ["abba", "bbab", "", "a", "b", "ab", "ba", "abb", "abbb", "c"] {
            let expected = nfa.accepts_backtrack(input);
            assert_eq!(nfa.accepts_concurrent(input), expected, "input {input:?}");
            assert_eq!(nfa.accepts_subsets(input), expected, "input {input:?}");
            assert_eq!(nfa.accepts_checked(input), Ok(expected));
        }
    }

    #[test]
    fn sample_acceptance() {
        let nfa = sample_nfa();
        assert!(nfa.accepts_checked("abba").unwrap());
        // "bbab" strands the run in {1, 3}, disjoint from the finals
        assert!(!nfa.accepts_checked("bbab").unwrap());
        assert!(nfa.accepts_checked("a").unwrap());
        assert!(!nfa.accepts_checked("").unwrap());
        assert!(!nfa.accepts_checked("b").unwrap());
    }

    #[test]
    fn eps_closure_fixpoint() {
        let mut builder = FaBuilder::new();
        builder
            .set_start_state("0")
            .add_final_state("2")
            .add_transition("0", EPSILON, "1")
            .add_transition("1", EPSILON, "2")
            .add_transition("2", 'a', "2");
        let nfa = builder.build_nfa().unwrap();
        let closure = nfa.eps_closure_of("0");
        assert_eq!(closure, ["0", "1", "2"].into_iter().collect());
        assert_eq!(nfa.eps_closure_of("2"), StateSet::singleton("2"));
    }

    #[test]
    fn epsilon_is_never_consumed_as_a_symbol() {
        let nfa = eps_nfa();
        assert!(nfa.accepts_checked("a").unwrap());
        assert!(nfa.accepts_checked("b").unwrap());
        assert!(!nfa.accepts_checked("").unwrap());
        assert!(!nfa.accepts_checked("ab").unwrap());
    }

    #[test]
    fn all_dests_unions_over_the_set() {
        let nfa = sample_nfa();
        let set: StateSet = ["1", "2"].into_iter().collect();
        let dests = nfa.all_dests_for(&set, 'b');
        assert_eq!(dests, ["1", "3"].into_iter().collect());
        assert!(nfa.all_dests_for(&StateSet::singleton("4"), 'c').is_empty());
    }

    #[test]
    fn traversal_follows_epsilon() {
        let nfa = eps_nfa();
        assert_eq!(nfa.top_sorted_states(), ["S", "A", "B", "E"]);
    }

    #[test]
    fn display_round_trips_through_the_parser() {
        let nfa = eps_nfa();
        let text = nfa.to_string();
        // E has no outgoing transitions; its line must still carry the
        // arrow the parser requires.
        assert!(text.lines().any(|line| line.trim() == "() E ->"));
        let reparsed = FaBuilder::from_text(&text).unwrap().build_nfa().unwrap();
        for input in ["", "a", "b", "ab", "ba"] {
            assert_eq!(
                reparsed.accepts_checked(input),
                nfa.accepts_checked(input),
                "input {input:?}"
            );
        }
    }
}
