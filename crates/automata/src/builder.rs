//! The builder assembling finite automata from incremental edits or from a
//! line-oriented textual description, with validation before freezing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::automaton::Fa;
use crate::delta::NonDetDelta;
use crate::dfa::Dfa;
use crate::error::AutomatonError;
use crate::nfa::Nfa;
use crate::state::{State, StateSet, is_defined};
use crate::symbol::{EPSILON, Symbol, SymbolSet, is_epsilon, symbol_name};
use crate::transducer::{MealyDfa, MooreDfa};

/// Mutable accumulator for the five components of an automaton. The
/// transition table is kept in the non-deterministic shape and narrowed at
/// build time when a deterministic automaton is requested. Build operations
/// validate and freeze the accumulated data into an immutable automaton;
/// the builder itself can be cleared and reused.
///
/// # Textual description
///
/// [`from_text`](Self::from_text) parses one state's outgoing transitions
/// per line:
///
/// ```text
/// -> S -> 0 S | 0 A | 1 S   // leading -> marks the start state
///    A -> 1 E
/// () E ->                   // leading () marks a final state
/// ```
///
/// `->()` (or `-> ()`) marks a start state that is also final; `eps` names
/// the epsilon symbol; `//` starts a comment line.
#[derive(Clone, Debug, Default)]
pub struct FaBuilder {
    states: StateSet,
    alphabet: SymbolSet,
    delta: NonDetDelta,
    start: State,
    finals: StateSet,
    moore_lambda: BTreeMap<State, char>,
    mealy_lambda: BTreeMap<(State, Symbol), char>,
}

impl FaBuilder {
    /// Create an empty builder for programmatic initialization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from a textual automaton description.
    pub fn from_text(text: &str) -> Result<Self, AutomatonError> {
        let mut builder = FaBuilder::new();
        let mut lnr = 0;
        for line in text.lines() {
            lnr += 1;
            builder.parse_line(line, lnr)?;
        }
        if !is_defined(&builder.start) {
            return Err(AutomatonError::NoStartStateDeclared { line: lnr });
        }
        if builder.finals.is_empty() {
            return Err(AutomatonError::NoFinalStateDeclared { line: lnr });
        }
        Ok(builder)
    }

    fn parse_line(&mut self, line: &str, lnr: usize) -> Result<(), AutomatonError> {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            return Ok(()); // empty line
        };
        if first.starts_with("//") {
            return Ok(()); // comment line
        }

        let mut is_start = first == "->" || first == "->()";
        let mut is_final = first == "()" || first == "->()";
        let mut token = if is_start || is_final {
            tokens.next()
        } else {
            Some(first)
        };
        // "-> ()" with separate tokens also marks a final start state.
        if is_start && token == Some("()") {
            is_final = true;
            token = tokens.next();
        }
        let state = token
            .filter(|t| *t != "->")
            .ok_or(AutomatonError::MissingArrow { line: lnr })?
            .to_string();

        if tokens.next() != Some("->") {
            return Err(AutomatonError::MissingArrow { line: lnr });
        }
        if is_start {
            if is_defined(&self.start) {
                return Err(AutomatonError::StartStateRedefined { line: lnr });
            }
            self.set_start_state(state.clone());
        }
        if is_final {
            self.add_final_state(state.clone());
        }

        while let Some(mut sy) = tokens.next() {
            if sy == "|" {
                sy = tokens.next().ok_or_else(|| AutomatonError::MissingSymbol {
                    line: lnr,
                    state: state.clone(),
                })?;
            }
            let symbol = if sy == "eps" {
                EPSILON
            } else {
                let mut chars = sy.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(AutomatonError::SymbolTooLong {
                            line: lnr,
                            text: sy.to_string(),
                        });
                    }
                }
            };
            let dest = tokens
                .next()
                .filter(|t| *t != "|")
                .ok_or_else(|| AutomatonError::MissingDestination {
                    line: lnr,
                    symbol: symbol_name(symbol),
                })?;
            self.add_transition(state.clone(), symbol, dest);
        }
        Ok(())
    }

    // --- fluent programmatic surface ---

    /// Set the start state, replacing any earlier one, and add it to S.
    pub fn set_start_state(&mut self, state: impl Into<State>) -> &mut Self {
        let state = state.into();
        self.states.insert(state.clone());
        self.start = state;
        self
    }

    /// Add a final state; a final state is a state, too.
    pub fn add_final_state(&mut self, state: impl Into<State>) -> &mut Self {
        let state = state.into();
        self.states.insert(state.clone());
        self.finals.insert(state);
        self
    }

    /// Add every state of an iterator as a final state.
    pub fn add_final_states<I, S>(&mut self, states: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        for state in states {
            self.add_final_state(state);
        }
        self
    }

    /// Add a transition. Source and destination join S; the symbol joins V
    /// unless it is epsilon (epsilon is no alphabet symbol).
    pub fn add_transition(
        &mut self,
        src: impl Into<State>,
        symbol: Symbol,
        dest: impl Into<State>,
    ) -> &mut Self {
        let src = src.into();
        let dest = dest.into();
        self.states.insert(src.clone());
        if !is_epsilon(symbol) {
            self.alphabet.insert(symbol);
        }
        self.states.insert(dest.clone());
        self.delta.add(src, symbol, dest);
        self
    }

    /// Add one transition per state of `dests`.
    pub fn add_transitions(
        &mut self,
        src: impl Into<State>,
        symbol: Symbol,
        dests: &StateSet,
    ) -> &mut Self {
        let src = src.into();
        for dest in dests {
            self.add_transition(src.clone(), symbol, dest.clone());
        }
        self
    }

    /// Set the Moore output function (state -> output symbol). Totality
    /// over S is checked by [`build_moore_dfa`](Self::build_moore_dfa).
    pub fn set_moore_lambda<I, S>(&mut self, lambda: I) -> &mut Self
    where
        I: IntoIterator<Item = (S, char)>,
        S: Into<State>,
    {
        self.moore_lambda = lambda
            .into_iter()
            .map(|(state, out)| (state.into(), out))
            .collect();
        self
    }

    /// Set the Mealy output function ((state, symbol) -> output symbol).
    /// Coverage of every transition entry is checked by
    /// [`build_mealy_dfa`](Self::build_mealy_dfa).
    pub fn set_mealy_lambda<I, S>(&mut self, lambda: I) -> &mut Self
    where
        I: IntoIterator<Item = ((S, Symbol), char)>,
        S: Into<State>,
    {
        self.mealy_lambda = lambda
            .into_iter()
            .map(|((state, symbol), out)| ((state.into(), symbol), out))
            .collect();
        self
    }

    // --- validation and build operations ---

    /// True iff the accumulated transitions describe a deterministic
    /// automaton: no epsilon transition and no destination set with more
    /// than one element. Decides, without building anything, whether
    /// [`build_dfa`](Self::build_dfa) can succeed.
    pub fn represents_dfa(&self) -> bool {
        self.delta
            .transitions()
            .all(|(_, symbol, dests)| !is_epsilon(symbol) && dests.len() <= 1)
    }

    /// Validate the accumulated components: the table must be non-empty, a
    /// start state must be defined and be a source in the table, and at
    /// least one final state must exist. States unreachable from the start
    /// state are reported as a warning, not a failure.
    fn check_states(&self) -> Result<(), AutomatonError> {
        if self.delta.is_empty() {
            return Err(AutomatonError::EmptyDelta);
        }
        if !is_defined(&self.start) {
            return Err(AutomatonError::NoStartState);
        }
        if self.finals.is_empty() {
            return Err(AutomatonError::NoFinalStates);
        }
        if !self.delta.has_source(&self.start) {
            return Err(AutomatonError::StartStateNotInDelta {
                state: self.start.clone(),
            });
        }

        // Reachability fixpoint over every symbol, epsilon included.
        let mut symbols = self.alphabet.clone();
        symbols.insert(EPSILON);
        let mut reachable = StateSet::singleton(self.start.clone());
        loop {
            let old_size = reachable.len();
            let frontier: Vec<State> = reachable.iter().cloned().collect();
            for state in frontier {
                for &symbol in &symbols {
                    if let Some(dests) = self.delta.get(&state, symbol) {
                        reachable.insert_all(dests);
                    }
                }
            }
            if reachable.len() == old_size {
                break;
            }
        }
        let unreachable = self.states.difference(&reachable);
        if !unreachable.is_empty() {
            warn!("state(s) in {unreachable} cannot be reached");
        }
        Ok(())
    }

    fn freeze_dfa(&self) -> Result<Dfa, AutomatonError> {
        let ddelta = self.delta.to_deterministic()?;
        Ok(Dfa::new(
            self.states.clone(),
            self.alphabet.clone(),
            self.start.clone(),
            self.finals.clone(),
            ddelta,
        ))
    }

    /// Build whichever kind fits: a DFA when the transitions are
    /// deterministic, an NFA otherwise.
    pub fn build_fa(&self) -> Result<Fa, AutomatonError> {
        self.check_states()?;
        if self.represents_dfa() {
            Ok(Fa::Deterministic(self.freeze_dfa()?))
        } else {
            Ok(Fa::NonDeterministic(self.freeze_nfa()))
        }
    }

    /// Build a DFA; fails with [`AutomatonError::NondeterministicBuild`]
    /// when the accumulated transitions are non-deterministic.
    pub fn build_dfa(&self) -> Result<Dfa, AutomatonError> {
        if !self.represents_dfa() {
            return Err(AutomatonError::NondeterministicBuild);
        }
        self.check_states()?;
        self.freeze_dfa()
    }

    fn freeze_nfa(&self) -> Nfa {
        Nfa::new(
            self.states.clone(),
            self.alphabet.clone(),
            self.start.clone(),
            self.finals.clone(),
            self.delta.clone(),
        )
    }

    /// Build an NFA; narrowing is never required, so every valid builder
    /// state succeeds.
    pub fn build_nfa(&self) -> Result<Nfa, AutomatonError> {
        self.check_states()?;
        Ok(self.freeze_nfa())
    }

    /// Build a Moore transducer; the output function must be total over S.
    pub fn build_moore_dfa(&self) -> Result<MooreDfa, AutomatonError> {
        if !self.represents_dfa() {
            return Err(AutomatonError::NondeterministicBuild);
        }
        self.check_states()?;
        for state in &self.states {
            if !self.moore_lambda.contains_key(state) {
                return Err(AutomatonError::MissingMooreOutput {
                    state: state.clone(),
                });
            }
        }
        Ok(MooreDfa::new(self.freeze_dfa()?, self.moore_lambda.clone()))
    }

    /// Build a Mealy transducer; the output function must cover every
    /// populated transition entry.
    pub fn build_mealy_dfa(&self) -> Result<MealyDfa, AutomatonError> {
        if !self.represents_dfa() {
            return Err(AutomatonError::NondeterministicBuild);
        }
        self.check_states()?;
        for (src, symbol, _) in self.delta.transitions() {
            if !self.mealy_lambda.contains_key(&(src.clone(), symbol)) {
                return Err(AutomatonError::MissingMealyOutput {
                    state: src.clone(),
                    symbol: symbol_name(symbol),
                });
            }
        }
        Ok(MealyDfa::new(self.freeze_dfa()?, self.mealy_lambda.clone()))
    }

    /// Reset the builder to its empty state for reuse.
    pub fn clear(&mut self) {
        self.states = StateSet::new();
        self.alphabet.clear();
        self.delta.clear();
        self.start = State::new();
        self.finals = StateSet::new();
        self.moore_lambda.clear();
        self.mealy_lambda.clear();
    }
}

impl FromStr for FaBuilder {
    type Err = AutomatonError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        FaBuilder::from_text(text)
    }
}

impl fmt::Display for FaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "S  = {}", self.states)?;
        write!(f, "V  = {{")?;
        for (i, &symbol) in self.alphabet.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", symbol_name(symbol))?;
        }
        writeln!(f, "}}")?;
        writeln!(f, "s1 = {}", self.start)?;
        writeln!(f, "F  = {}", self.finals)?;
        writeln!(f, "delta = {{")?;
        for (src, symbol, dests) in self.delta.transitions() {
            writeln!(f, "  ({src}, {}) -> {dests}", symbol_name(symbol))?;
        }
        writeln!(f, "}}")
    }
}
