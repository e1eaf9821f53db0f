//! The capability contract shared by deterministic and non-deterministic
//! finite automata, and the [`Fa`] sum of the two variants.

use std::fmt;

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::state::{State, StateSet};
use crate::symbol::{EPSILON, Symbol, SymbolSet, symbol_name};

/// Common contract over both automaton variants. An automaton is immutable
/// once built: the five defining components never change, and every derived
/// automaton is a fresh instance. The variant is chosen at construction
/// time and never changes, so dispatch through this trait is static in
/// practice; [`Fa`] exists for call sites that decide the variant at run
/// time (the builder's "build whichever kind fits").
pub trait Automaton {
    /// The state set S.
    fn states(&self) -> &StateSet;

    /// The alphabet V. Never contains a sentinel symbol.
    fn alphabet(&self) -> &SymbolSet;

    /// The start state s1, an element of S.
    fn start_state(&self) -> &State;

    /// The set of final states F, a subset of S.
    fn final_states(&self) -> &StateSet;

    /// Whether the transition relation is deterministic. Traversal follows
    /// epsilon transitions only for the non-deterministic variant.
    fn is_deterministic(&self) -> bool;

    /// Acceptance test: consume `input` symbol-by-symbol starting at s1.
    fn accepts(&self, input: &str) -> bool;

    /// Destinations for (state, symbol), state-set shaped for both
    /// variants: a DFA wraps its single destination as a singleton set, the
    /// empty set means the transition is undefined.
    fn delta_at(&self, src: &str, symbol: Symbol) -> StateSet;

    /// The outgoing transitions of `src` as (symbol, destinations) pairs in
    /// alphabet order, epsilon first for non-deterministic automata.
    /// Undefined entries are omitted.
    fn transitions_from(&self, src: &str) -> Vec<(Symbol, StateSet)> {
        let mut symbols = self.alphabet().clone();
        if !self.is_deterministic() {
            symbols.insert(EPSILON);
        }
        symbols
            .into_iter()
            .filter_map(|symbol| {
                let dests = self.delta_at(src, symbol);
                (!dests.is_empty()).then_some((symbol, dests))
            })
            .collect()
    }

    /// The states reachable from s1 in discovery order: a breadth-first
    /// traversal following every symbol in alphabet order (epsilon included
    /// for non-deterministic automata), visiting each destination once.
    /// Unreachable states are absent from the result.
    fn top_sorted_states(&self) -> Vec<State> {
        let mut sorted = vec![self.start_state().clone()];
        let mut i = 0;
        while i < sorted.len() {
            let src = sorted[i].clone();
            for (_, dests) in self.transitions_from(&src) {
                for dest in &dests {
                    if !sorted.contains(dest) {
                        sorted.push(dest.clone());
                    }
                }
            }
            i += 1;
        }
        sorted
    }
}

/// Render an automaton in the builder's line-oriented text format, states
/// in topological order. Reachable automata round-trip through
/// [`FaBuilder::from_text`](crate::FaBuilder::from_text); final states
/// without outgoing transitions are listed on their own `()` line.
pub(crate) fn fmt_automaton(f: &mut fmt::Formatter<'_>, fa: &dyn Automaton) -> fmt::Result {
    let mut unlisted_finals = fa.final_states().clone();
    for src in fa.top_sorted_states() {
        let transitions = fa.transitions_from(&src);
        if transitions.is_empty() {
            continue;
        }
        let start_mark = if src == *fa.start_state() { "->" } else { "  " };
        let final_mark = if fa.final_states().contains(&src) {
            "()"
        } else {
            "  "
        };
        write!(f, "{start_mark} {final_mark} {src} ->")?;
        let mut first = true;
        for (symbol, dests) in transitions {
            for dest in &dests {
                if !first {
                    write!(f, " |")?;
                }
                write!(f, " {} {dest}", symbol_name(symbol))?;
                first = false;
            }
        }
        writeln!(f)?;
        unlisted_finals.remove(&src);
    }
    for state in &unlisted_finals {
        writeln!(f, "   () {state} ->")?;
    }
    Ok(())
}

/// A finite automaton of either variant, as produced by
/// [`FaBuilder::build_fa`](crate::FaBuilder::build_fa).
#[derive(Clone, Debug)]
pub enum Fa {
    Deterministic(Dfa),
    NonDeterministic(Nfa),
}

impl Fa {
    pub fn as_dfa(&self) -> Option<&Dfa> {
        match self {
            Fa::Deterministic(dfa) => Some(dfa),
            Fa::NonDeterministic(_) => None,
        }
    }

    pub fn as_nfa(&self) -> Option<&Nfa> {
        match self {
            Fa::Deterministic(_) => None,
            Fa::NonDeterministic(nfa) => Some(nfa),
        }
    }
}

impl Automaton for Fa {
    fn states(&self) -> &StateSet {
        match self {
            Fa::Deterministic(dfa) => dfa.states(),
            Fa::NonDeterministic(nfa) => nfa.states(),
        }
    }

    fn alphabet(&self) -> &SymbolSet {
        match self {
            Fa::Deterministic(dfa) => dfa.alphabet(),
            Fa::NonDeterministic(nfa) => nfa.alphabet(),
        }
    }

    fn start_state(&self) -> &State {
        match self {
            Fa::Deterministic(dfa) => dfa.start_state(),
            Fa::NonDeterministic(nfa) => nfa.start_state(),
        }
    }

    fn final_states(&self) -> &StateSet {
        match self {
            Fa::Deterministic(dfa) => dfa.final_states(),
            Fa::NonDeterministic(nfa) => nfa.final_states(),
        }
    }

    fn is_deterministic(&self) -> bool {
        matches!(self, Fa::Deterministic(_))
    }

    fn accepts(&self, input: &str) -> bool {
        match self {
            Fa::Deterministic(dfa) => dfa.accepts(input),
            Fa::NonDeterministic(nfa) => Automaton::accepts(nfa, input),
        }
    }

    fn delta_at(&self, src: &str, symbol: Symbol) -> StateSet {
        match self {
            Fa::Deterministic(dfa) => dfa.delta_at(src, symbol),
            Fa::NonDeterministic(nfa) => nfa.delta_at(src, symbol),
        }
    }
}

impl fmt::Display for Fa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_automaton(f, self)
    }
}
