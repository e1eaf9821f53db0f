//! Symbol types for automata transitions and input tapes.

use std::collections::BTreeSet;

/// A tape symbol. Ordinary symbols are printable characters; two reserved
/// control characters serve as sentinels and are never ordinary symbols.
pub type Symbol = char;

/// Sentinel terminating an input scan (never part of an alphabet).
pub const END_OF_INPUT: Symbol = '\0';

/// Sentinel for epsilon transitions, consumable without reading input.
/// Legal only in non-deterministic automata and never part of an alphabet.
pub const EPSILON: Symbol = '\u{1}';

/// An ordered set of symbols. Iteration order is part of the contract:
/// traversal and rendering walk the alphabet in this order.
pub type SymbolSet = BTreeSet<Symbol>;

/// Check if a symbol is the epsilon sentinel.
#[inline]
pub fn is_epsilon(symbol: Symbol) -> bool {
    symbol == EPSILON
}

/// Printable name of a symbol: the sentinels render as `eot` and `eps`.
pub fn symbol_name(symbol: Symbol) -> String {
    match symbol {
        END_OF_INPUT => "eot".to_string(),
        EPSILON => "eps".to_string(),
        other => other.to_string(),
    }
}

/// The symbol at position `i` of a tape, with every position at or past the
/// end reading as [`END_OF_INPUT`].
#[inline]
pub fn symbol_at(tape: &[Symbol], i: usize) -> Symbol {
    tape.get(i).copied().unwrap_or(END_OF_INPUT)
}

/// Split an input string into its tape symbols.
pub fn tape_of(input: &str) -> Vec<Symbol> {
    input.chars().collect()
}
