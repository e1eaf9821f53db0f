//! Finite automata as explicit mathematical objects: deterministic and
//! non-deterministic acceptors over `char` alphabets, a validating builder
//! with a line-oriented textual input format, subset construction,
//! table-filling minimization, canonical renaming and Moore/Mealy
//! transducers.
//!
//! ```
//! use automata::{Automaton, FaBuilder};
//!
//! let dfa = FaBuilder::from_text(
//!     "-> S -> 0 S | 1 A
//!         A -> 0 A | 1 S
//!     () A ->",
//! )
//! .unwrap()
//! .build_dfa()
//! .unwrap();
//! assert!(dfa.accepts("0100"));
//! assert!(!dfa.accepts("11"));
//! ```

pub mod automaton;
pub mod builder;
pub mod delta;
pub mod dfa;
pub mod error;
pub mod nfa;
pub mod state;
pub mod subset;
pub mod symbol;
pub mod transducer;

pub use automaton::{Automaton, Fa};
pub use builder::FaBuilder;
pub use delta::{Delta, DetDelta, NonDetDelta};
pub use dfa::Dfa;
pub use error::AutomatonError;
pub use nfa::Nfa;
pub use state::{SetOfStateSets, State, StateSet, is_defined};
pub use subset::subset_construction;
pub use symbol::{END_OF_INPUT, EPSILON, Symbol, SymbolSet, is_epsilon, symbol_name, tape_of};
pub use transducer::{MealyDfa, MooreDfa};
