//! Service method names and method sets.
//!
//! Every service exposes some subset of six CRUD-style operations. [`Method`]
//! names one of them; [`MethodSet`] is a small copyable set used to describe
//! what a service implements and what a wrapper instruments.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Method
// ─────────────────────────────────────────────────────────────────────────────

/// A CRUD-style service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Fetch a single record by id.
    Get,
    /// Query a collection.
    Find,
    /// Create one record.
    Create,
    /// Replace a record.
    Update,
    /// Merge changes into one or more records.
    Patch,
    /// Delete one or more records.
    Remove,
}

impl Method {
    /// All methods in canonical order.
    pub const ALL: [Method; 6] = [
        Method::Get,
        Method::Find,
        Method::Create,
        Method::Update,
        Method::Patch,
        Method::Remove,
    ];

    /// Returns the lowercase method name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Find => "find",
            Method::Create => "create",
            Method::Update => "update",
            Method::Patch => "patch",
            Method::Remove => "remove",
        }
    }

    /// Returns `true` for operations that change state.
    #[must_use]
    pub fn is_mutating(self) -> bool {
        !matches!(self, Method::Get | Method::Find)
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service method '{0}'")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MethodSet
// ─────────────────────────────────────────────────────────────────────────────

/// A set of [`Method`]s.
///
/// Serializes as a list of method names, e.g. `["create", "remove"]`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Method>", into = "Vec<Method>")]
pub struct MethodSet(u8);

impl MethodSet {
    /// Every method.
    pub const ALL: MethodSet = MethodSet(0b11_1111);

    /// The state-changing methods: create, update, patch, remove.
    pub const MUTATING: MethodSet = MethodSet(0b11_1100);

    /// Creates an empty set.
    #[must_use]
    pub const fn empty() -> Self {
        MethodSet(0)
    }

    /// Returns `true` if the set contains `method`.
    #[must_use]
    pub fn contains(self, method: Method) -> bool {
        self.0 & method.bit() != 0
    }

    /// Adds `method` to the set.
    pub fn insert(&mut self, method: Method) {
        self.0 |= method.bit();
    }

    /// Returns a copy of the set with `method` added.
    #[must_use]
    pub fn with(mut self, method: Method) -> Self {
        self.insert(method);
        self
    }

    /// Returns the methods present in either set.
    #[must_use]
    pub fn union(self, other: MethodSet) -> Self {
        MethodSet(self.0 | other.0)
    }

    /// Returns the methods present in both sets.
    #[must_use]
    pub fn intersection(self, other: MethodSet) -> Self {
        MethodSet(self.0 & other.0)
    }

    /// Returns `true` if no method is present.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of methods in the set.
    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the set in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Method> {
        Method::ALL
            .into_iter()
            .filter(move |method| self.contains(*method))
    }
}

impl fmt::Debug for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut set = MethodSet::empty();
        for method in iter {
            set.insert(method);
        }
        set
    }
}

impl<const N: usize> From<[Method; N]> for MethodSet {
    fn from(methods: [Method; N]) -> Self {
        methods.into_iter().collect()
    }
}

impl From<Vec<Method>> for MethodSet {
    fn from(methods: Vec<Method>) -> Self {
        methods.into_iter().collect()
    }
}

impl From<MethodSet> for Vec<Method> {
    fn from(set: MethodSet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("patch".parse::<Method>(), Ok(Method::Patch));
        assert_eq!(
            "PATCH".parse::<Method>(),
            Err(UnknownMethod("PATCH".to_string()))
        );
    }

    #[test]
    fn only_reads_are_non_mutating() {
        let reads: Vec<_> = Method::ALL.into_iter().filter(|m| !m.is_mutating()).collect();
        assert_eq!(reads, vec![Method::Get, Method::Find]);
    }

    #[test]
    fn mutating_set_matches_predicate() {
        let expected: MethodSet = Method::ALL.into_iter().filter(|m| m.is_mutating()).collect();
        assert_eq!(MethodSet::MUTATING, expected);
        assert_eq!(MethodSet::ALL.len(), 6);
    }

    #[test]
    fn set_operations() {
        let a = MethodSet::from([Method::Create, Method::Get]);
        let b = MethodSet::from([Method::Create, Method::Remove]);

        assert_eq!(a.intersection(b), MethodSet::from([Method::Create]));
        assert_eq!(a.union(b).len(), 3);
        assert!(MethodSet::empty().is_empty());
        assert!(!a.contains(Method::Remove));
    }

    #[test]
    fn iterates_in_canonical_order() {
        let set = MethodSet::from([Method::Remove, Method::Get, Method::Patch]);
        let methods: Vec<_> = set.iter().collect();
        assert_eq!(methods, vec![Method::Get, Method::Patch, Method::Remove]);
    }

    #[test]
    fn serializes_as_name_list() {
        let set = MethodSet::from([Method::Create, Method::Remove]);
        let json = serde_json::to_value(set).unwrap();
        assert_eq!(json, serde_json::json!(["create", "remove"]));

        let back: MethodSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }
}
