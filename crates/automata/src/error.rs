//! Error conditions reported by builders, conversions and simulations.

use thiserror::Error;

use crate::state::State;

/// Everything that can go wrong while parsing, validating, converting or
/// simulating an automaton. Fatal conditions carry the context needed to
/// diagnose them at the point of detection; advisory conditions (unreachable
/// states) are logged instead and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    // --- structural errors from the textual description ---
    #[error("error in line {line}: -> missing")]
    MissingArrow { line: usize },

    #[error("error in line {line}: no symbol for transition from {state}")]
    MissingSymbol { line: usize, state: State },

    #[error("error in line {line}: tape symbol {text} too long")]
    SymbolTooLong { line: usize, text: String },

    #[error("error in line {line}: destination state missing for symbol {symbol}")]
    MissingDestination { line: usize, symbol: String },

    #[error("error in line {line}: redefinition of start state")]
    StartStateRedefined { line: usize },

    #[error("error in line {line}: no start state defined")]
    NoStartStateDeclared { line: usize },

    #[error("error in line {line}: no final state(s) defined")]
    NoFinalStateDeclared { line: usize },

    // --- validation errors, fatal to a build operation ---
    #[error("transition function is empty")]
    EmptyDelta,

    #[error("no start state defined")]
    NoStartState,

    #[error("no final state(s) defined")]
    NoFinalStates,

    #[error("start state {state} is not a source of any transition")]
    StartStateNotInDelta { state: State },

    #[error("cannot build a DFA: the transition relation is non-deterministic")]
    NondeterministicBuild,

    #[error("no Moore output defined for state {state}")]
    MissingMooreOutput { state: State },

    #[error("no Mealy output defined for transition ({state}, {symbol})")]
    MissingMealyOutput { state: State, symbol: String },

    // --- conversion errors ---
    #[error(
        "entry ({state}, {symbol}) has {count} destination state(s), \
         a deterministic table requires exactly one"
    )]
    NotDeterministic {
        state: State,
        symbol: String,
        count: usize,
    },

    // --- internal-consistency failures ---
    #[error("acceptance algorithms disagree on input {input:?}")]
    AcceptanceMismatch { input: String },
}
