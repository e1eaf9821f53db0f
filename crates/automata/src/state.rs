//! State names and ordered sets of states.

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;

/// A state is identified by its name. The empty string is the undefined
/// state: it never appears in a state set or a transition table.
pub type State = String;

/// Check that a state name denotes an actual state.
#[inline]
pub fn is_defined(state: &str) -> bool {
    !state.is_empty()
}

/// Delimiter used when collapsing a set of states into one composite name.
const COMPOSITE_DELIMITER: char = '+';

/// An ordered, duplicate-free set of states. The empty set doubles as the
/// undefined transition result.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateSet {
    states: BTreeSet<State>,
}

impl StateSet {
    /// Create an empty state set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set containing a single state.
    pub fn singleton(state: impl Into<State>) -> Self {
        let mut set = Self::new();
        set.insert(state);
        set
    }

    /// Insert a state. Returns true if the state was not present before.
    pub fn insert(&mut self, state: impl Into<State>) -> bool {
        self.states.insert(state.into())
    }

    /// Insert every state of another set.
    pub fn insert_all(&mut self, other: &StateSet) {
        for state in other.iter() {
            self.states.insert(state.clone());
        }
    }

    /// Remove a state. Returns true if it was present.
    pub fn remove(&mut self, state: &str) -> bool {
        self.states.remove(state)
    }

    /// Remove and return the first state in order, for work-list loops.
    pub fn pop_first(&mut self) -> Option<State> {
        self.states.pop_first()
    }

    pub fn contains(&self, state: &str) -> bool {
        self.states.contains(state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, State> {
        self.states.iter()
    }

    /// The first state in order, without removing it.
    pub fn any_element(&self) -> Option<&State> {
        self.states.first()
    }

    /// New set with the states present in both sets.
    pub fn intersection(&self, other: &StateSet) -> StateSet {
        StateSet {
            states: self.states.intersection(&other.states).cloned().collect(),
        }
    }

    /// New set with the states of `self` not present in `other`.
    pub fn difference(&self, other: &StateSet) -> StateSet {
        StateSet {
            states: self.states.difference(&other.states).cloned().collect(),
        }
    }

    /// Check whether the two sets share at least one state.
    pub fn intersects(&self, other: &StateSet) -> bool {
        self.states.intersection(&other.states).next().is_some()
    }

    /// Collapse the set into a single synthetic state name: members sorted
    /// and joined with `+`, members already containing `+` parenthesized to
    /// avoid ambiguous concatenation. A singleton yields its element
    /// unchanged; the empty set yields the undefined state.
    pub fn composite_name(&self) -> State {
        if self.states.len() == 1 {
            return self.states.first().cloned().unwrap_or_default();
        }
        let mut name = String::new();
        for state in &self.states {
            if !name.is_empty() {
                name.push(COMPOSITE_DELIMITER);
            }
            if state.contains(COMPOSITE_DELIMITER) {
                name.push('(');
                name.push_str(state);
                name.push(')');
            } else {
                name.push_str(state);
            }
        }
        name
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, state) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{state}")?;
        }
        write!(f, "}}")
    }
}

impl<S: Into<State>> FromIterator<S> for StateSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StateSet {
            states: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = &'a State;
    type IntoIter = btree_set::Iter<'a, State>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

/// An ordered, duplicate-free family of state sets, used as the discovery
/// registry and work-list of the subset construction.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct SetOfStateSets {
    sets: BTreeSet<StateSet>,
}

impl SetOfStateSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a family containing a single state set.
    pub fn singleton(set: StateSet) -> Self {
        let mut family = Self::new();
        family.insert(set);
        family
    }

    /// Insert a state set. Returns true if it was not present before.
    pub fn insert(&mut self, set: StateSet) -> bool {
        self.sets.insert(set)
    }

    pub fn contains(&self, set: &StateSet) -> bool {
        self.sets.contains(set)
    }

    /// Remove and return the first set in order, for work-list loops.
    pub fn pop_first(&mut self) -> Option<StateSet> {
        self.sets.pop_first()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, StateSet> {
        self.sets.iter()
    }
}

impl fmt::Display for SetOfStateSets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, set) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{set}")?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_and_order() {
        let mut set = StateSet::new();
        assert!(set.is_empty());
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("a"));
        assert_eq!(set.len(), 2);
        assert!(set.contains("a"));
        assert!(!set.contains("c"));
        let names: Vec<_> = set.iter().cloned().collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn set_algebra() {
        let abc: StateSet = ["a", "b", "c"].into_iter().collect();
        let bcd: StateSet = ["b", "c", "d"].into_iter().collect();
        assert_eq!(abc.intersection(&bcd), ["b", "c"].into_iter().collect());
        assert_eq!(abc.difference(&bcd), StateSet::singleton("a"));
        assert!(abc.intersects(&bcd));
        assert!(!abc.intersects(&StateSet::singleton("x")));
    }

    #[test]
    fn composite_name_sorts_and_joins() {
        let set: StateSet = ["R", "B"].into_iter().collect();
        assert_eq!(set.composite_name(), "B+R");
    }

    #[test]
    fn composite_name_of_singleton_is_the_element() {
        assert_eq!(StateSet::singleton("S").composite_name(), "S");
    }

    #[test]
    fn composite_name_parenthesizes_delimiter() {
        let set: StateSet = ["a+b", "c"].into_iter().collect();
        assert_eq!(set.composite_name(), "(a+b)+c");
    }

    #[test]
    fn composite_name_of_empty_set_is_undefined() {
        assert!(!is_defined(&StateSet::new().composite_name()));
    }

    #[test]
    fn pop_first_drains_in_order() {
        let mut set: StateSet = ["y", "x"].into_iter().collect();
        assert_eq!(set.pop_first().as_deref(), Some("x"));
        assert_eq!(set.pop_first().as_deref(), Some("y"));
        assert_eq!(set.pop_first(), None);
    }

    #[test]
    fn family_of_sets() {
        let mut family = SetOfStateSets::new();
        let ab: StateSet = ["a", "b"].into_iter().collect();
        assert!(family.insert(ab.clone()));
        assert!(!family.insert(ab.clone()));
        assert!(family.contains(&ab));
        assert_eq!(family.len(), 1);
        assert_eq!(family.pop_first(), Some(ab));
        assert!(family.is_empty());
    }

    #[test]
    fn display_formats() {
        let set: StateSet = ["b", "a"].into_iter().collect();
        assert_eq!(set.to_string(), "{a, b}");
        let family = SetOfStateSets::singleton(set);
        assert_eq!(family.to_string(), "{ {a, b} }");
    }
}
