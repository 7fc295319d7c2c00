//! Identifier newtypes and scenario sets
//!
//! All identifiers are plain integers on the wire. They are wrapped in
//! distinct types so a scenario id can never be passed where a quantity id
//! is expected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of an independently activatable scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub u64);

/// Identifier of a measurable quantity (observation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuantityId(pub u64);

/// Identifier of a requirement record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementId(pub u64);

/// Sequence-stable configuration identifier (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationId(pub u64);

impl Display for ScenarioId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for QuantityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for RequirementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ConfigurationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// Cost tables key scenarios and quantities by decimal strings.
impl FromStr for ScenarioId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl FromStr for QuantityId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl FromStr for RequirementId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Canonical, order-independent set of scenarios
///
/// Backed by a `BTreeSet` so iteration, equality and hashing never depend on
/// the order scenarios were listed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioSet(BTreeSet<ScenarioId>);

impl ScenarioSet {
    /// Create empty set (the idle configuration)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Number of scenarios
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the idle configuration
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Membership test
    #[inline]
    #[must_use]
    pub fn contains(&self, scenario: ScenarioId) -> bool {
        self.0.contains(&scenario)
    }

    /// Add a scenario, returning whether it was new
    #[inline]
    pub fn insert(&mut self, scenario: ScenarioId) -> bool {
        self.0.insert(scenario)
    }

    /// `self ⊆ other` (reflexive)
    #[inline]
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.is_subset(&other.0)
    }

    /// `self ⊂ other` (strict)
    #[inline]
    #[must_use]
    pub fn is_strict_subset(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.0.is_subset(&other.0)
    }

    /// Scenarios in `self` but not in `other`
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.difference(&other.0).copied().collect())
    }

    /// Union of both sets
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }

    /// True when the sets share a scenario
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    /// Ascending iteration
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = ScenarioId> + '_ {
        self.0.iter().copied()
    }

    /// Sorted ascending list, the persisted representation
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<ScenarioId> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<ScenarioId> for ScenarioSet {
    fn from_iter<I: IntoIterator<Item = ScenarioId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ScenarioSet {
    type Item = &'a ScenarioId;
    type IntoIter = std::collections::btree_set::Iter<'a, ScenarioId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for ScenarioSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, s) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{s}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u64]) -> ScenarioSet {
        ids.iter().copied().map(ScenarioId).collect()
    }

    #[test]
    fn scenario_set_is_order_independent() {
        assert_eq!(set(&[19, 3]), set(&[3, 19]));
        assert_eq!(set(&[3, 3, 19]).len(), 2);
    }

    #[test]
    fn subset_relations() {
        assert!(set(&[3]).is_subset(&set(&[3, 19])));
        assert!(set(&[3]).is_strict_subset(&set(&[3, 19])));
        assert!(set(&[3, 19]).is_subset(&set(&[3, 19])));
        assert!(!set(&[3, 19]).is_strict_subset(&set(&[3, 19])));
        assert!(ScenarioSet::new().is_subset(&set(&[1])));
    }

    #[test]
    fn difference_and_union() {
        let a = set(&[1, 2, 3]);
        let b = set(&[2, 4]);
        assert_eq!(a.difference(&b), set(&[1, 3]));
        assert_eq!(b.difference(&a), set(&[4]));
        assert_eq!(a.union(&b), set(&[1, 2, 3, 4]));
        assert!(a.intersects(&b));
    }

    #[test]
    fn display_is_sorted() {
        assert_eq!(set(&[19, 3]).to_string(), "{3,19}");
        assert_eq!(ScenarioSet::new().to_string(), "{}");
    }

    #[test]
    fn ids_parse_from_decimal_strings() {
        assert_eq!(" 42".parse::<ScenarioId>().unwrap(), ScenarioId(42));
        assert!("x1".parse::<QuantityId>().is_err());
    }
}
