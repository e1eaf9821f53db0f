//! Finite transducers on top of a DFA: Moore machines attach an output to
//! every state, Mealy machines to every transition.

use std::collections::BTreeMap;
use std::fmt;

use crate::automaton::Automaton;
use crate::dfa::Dfa;
use crate::state::State;
use crate::symbol::{END_OF_INPUT, Symbol, symbol_at, tape_of};

/// A Moore machine: a DFA plus an output function over its states. On a
/// defined run the output has one character per *visited* state, the start
/// state included, so it is always one longer than the input.
///
/// Built by [`FaBuilder::build_moore_dfa`](crate::FaBuilder::build_moore_dfa),
/// which checks that the output function is total over the state set.
#[derive(Clone, Debug)]
pub struct MooreDfa {
    dfa: Dfa,
    lambda: BTreeMap<State, char>,
}

impl MooreDfa {
    pub(crate) fn new(dfa: Dfa, lambda: BTreeMap<State, char>) -> Self {
        MooreDfa { dfa, lambda }
    }

    /// The underlying acceptor.
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// The output character attached to `state`, if any.
    pub fn output_of(&self, state: &str) -> Option<char> {
        self.lambda.get(state).copied()
    }

    pub fn accepts(&self, input: &str) -> bool {
        self.dfa.accepts(input)
    }

    /// The output word for `input`, or `None` when the run gets stuck on an
    /// undefined transition. Acceptance does not matter here, only whether
    /// the whole input can be consumed.
    pub fn transduce(&self, input: &str) -> Option<String> {
        let tape = tape_of(input);
        let mut i = 0;
        let mut state = self.dfa.start_state();
        let mut output = String::new();
        output.push(*self.lambda.get(state)?);
        let mut symbol = symbol_at(&tape, i);
        while symbol != END_OF_INPUT {
            state = self.dfa.delta().get(state, symbol)?;
            output.push(*self.lambda.get(state)?);
            i += 1;
            symbol = symbol_at(&tape, i);
        }
        Some(output)
    }
}

impl fmt::Display for MooreDfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dfa)?;
        writeln!(f, "lambda:")?;
        for (state, out) in &self.lambda {
            writeln!(f, "  {state} -> {out}")?;
        }
        Ok(())
    }
}

/// A Mealy machine: a DFA plus an output function over its transitions. On
/// a defined run the output has one character per *consumed* symbol, so it
/// is always exactly as long as the input.
///
/// Built by [`FaBuilder::build_mealy_dfa`](crate::FaBuilder::build_mealy_dfa),
/// which checks that every transition carries an output.
#[derive(Clone, Debug)]
pub struct MealyDfa {
    dfa: Dfa,
    lambda: BTreeMap<(State, Symbol), char>,
}

impl MealyDfa {
    pub(crate) fn new(dfa: Dfa, lambda: BTreeMap<(State, Symbol), char>) -> Self {
        MealyDfa { dfa, lambda }
    }

    /// The underlying acceptor.
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// The output character attached to the transition (`state`, `symbol`).
    pub fn output_of(&self, state: &str, symbol: Symbol) -> Option<char> {
        self.lambda.get(&(state.to_string(), symbol)).copied()
    }

    pub fn accepts(&self, input: &str) -> bool {
        self.dfa.accepts(input)
    }

    /// The output word for `input`, or `None` when the run gets stuck. The
    /// empty input yields the empty output.
    pub fn transduce(&self, input: &str) -> Option<String> {
        let tape = tape_of(input);
        let mut i = 0;
        let mut state = self.dfa.start_state();
        let mut output = String::new();
        let mut symbol = symbol_at(&tape, i);
        while symbol != END_OF_INPUT {
            output.push(*self.lambda.get(&(state.clone(), symbol))?);
            state = self.dfa.delta().get(state, symbol)?;
            i += 1;
            symbol = symbol_at(&tape, i);
        }
        Some(output)
    }
}

impl fmt::Display for MealyDfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dfa)?;
        writeln!(f, "lambda:")?;
        for ((state, symbol), out) in &self.lambda {
            writeln!(f, "  ({state}, {symbol}) -> {out}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FaBuilder;
    use crate::error::AutomatonError;

    /// Parity counter over {0,1}: output e in states with an even number of
    /// ones seen so far, o otherwise.
    fn parity_moore() -> MooreDfa {
        let mut builder = FaBuilder::new();
        builder
            .set_start_state("E")
            .add_final_state("E")
            .add_transition("E", '0', "E")
            .add_transition("E", '1', "O")
            .add_transition("O", '0', "O")
            .add_transition("O", '1', "E")
            .set_moore_lambda([("E", 'e'), ("O", 'o')]);
        builder.build_moore_dfa().unwrap()
    }

    /// Bitwise NOT: every consumed 0 outputs 1 and vice versa.
    fn not_mealy() -> MealyDfa {
        let mut builder = FaBuilder::new();
        builder
            .set_start_state("S")
            .add_final_state("S")
            .add_transition("S", '0', "S")
            .add_transition("S", '1', "S")
            .set_mealy_lambda([(("S", '0'), '1'), (("S", '1'), '0')]);
        builder.build_mealy_dfa().unwrap()
    }

    #[test]
    fn moore_outputs_one_char_per_visited_state() {
        let moore = parity_moore();
        assert_eq!(moore.transduce(""), Some("e".to_string()));
        assert_eq!(moore.transduce("1"), Some("eo".to_string()));
        assert_eq!(moore.transduce("1101"), Some("eooeo".to_string()));
        assert_eq!(moore.output_of("E"), Some('e'));
    }

    #[test]
    fn moore_gets_stuck_on_undefined_transitions() {
        let moore = parity_moore();
        assert_eq!(moore.transduce("12"), None);
        assert!(!moore.accepts("12"));
    }

    #[test]
    fn moore_acceptance_delegates_to_the_dfa() {
        let moore = parity_moore();
        assert!(moore.accepts("1100"));
        assert!(!moore.accepts("100"));
    }

    #[test]
    fn mealy_outputs_one_char_per_consumed_symbol() {
        let mealy = not_mealy();
        assert_eq!(mealy.transduce(""), Some(String::new()));
        assert_eq!(mealy.transduce("0"), Some("1".to_string()));
        assert_eq!(mealy.transduce("0110"), Some("1001".to_string()));
        assert_eq!(mealy.output_of("S", '0'), Some('1'));
        assert_eq!(mealy.transduce("02"), None);
    }

    #[test]
    fn build_rejects_partial_output_functions() {
        let mut builder = FaBuilder::new();
        builder
            .set_start_state("E")
            .add_final_state("E")
            .add_transition("E", '1', "O")
            .add_transition("O", '1', "E")
            .set_moore_lambda([("E", 'e')]);
        assert_eq!(
            builder.build_moore_dfa().unwrap_err(),
            AutomatonError::MissingMooreOutput {
                state: "O".to_string()
            }
        );

        let mut builder = FaBuilder::new();
        builder
            .set_start_state("S")
            .add_final_state("S")
            .add_transition("S", '0', "S")
            .add_transition("S", '1', "S")
            .set_mealy_lambda([(("S", '0'), '1')]);
        assert_eq!(
            builder.build_mealy_dfa().unwrap_err(),
            AutomatonError::MissingMealyOutput {
                state: "S".to_string(),
                symbol: "1".to_string()
            }
        );
    }
}
