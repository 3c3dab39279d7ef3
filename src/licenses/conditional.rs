//! Guarded values: data that only applies above a usage threshold.

use crate::domain::{Distribution, RelationType};

/// A threshold on one axis of how a dependency is used.
///
/// Each axis carries its own ordering: relations by coupling strength,
/// distributions by reach. A guard on one axis says nothing about the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Relation(RelationType),
    Distribution(Distribution),
}

impl Guard {
    /// True when `condition` is on the same axis and at least as far along.
    fn dominated_by(self, condition: Guard) -> bool {
        match (self, condition) {
            (Guard::Relation(floor), Guard::Relation(actual)) => {
                actual.coupling() >= floor.coupling()
            }
            (Guard::Distribution(floor), Guard::Distribution(actual)) => {
                actual.breadth() >= floor.breadth()
            }
            _ => false,
        }
    }
}

/// A value that only takes effect when every guard is met.
#[derive(Debug, Clone)]
pub struct Conditional<T> {
    value: T,
    guards: Vec<Guard>,
}

impl<T> Conditional<T> {
    pub fn new(value: T, guards: Vec<Guard>) -> Self {
        Conditional { value, guards }
    }

    /// Unconditional: applies in every situation.
    pub fn always(value: T) -> Self {
        Conditional {
            value,
            guards: Vec::new(),
        }
    }

    /// The value regardless of any guards.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The value, but only if every guard is dominated by one of the
    /// supplied conditions.
    pub fn evaluate(&self, conditions: &[Guard]) -> Option<&T> {
        let met = self
            .guards
            .iter()
            .all(|guard| conditions.iter().any(|&c| guard.dominated_by(c)));
        met.then_some(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUE: &str = "value";

    #[test]
    fn unguarded_value_always_applies() {
        let conditional = Conditional::always(VALUE);

        assert_eq!(conditional.evaluate(&[]), Some(&VALUE));
    }

    #[test]
    fn guard_requires_equal_or_stronger_condition() {
        let conditional = Conditional::new(VALUE, vec![Guard::Relation(RelationType::StaticLink)]);

        assert_eq!(
            conditional.evaluate(&[Guard::Relation(RelationType::DynamicLink)]),
            None
        );
        assert_eq!(
            conditional.evaluate(&[Guard::Relation(RelationType::StaticLink)]),
            Some(&VALUE)
        );
        assert_eq!(
            conditional.evaluate(&[Guard::Relation(RelationType::ModifiedCode)]),
            Some(&VALUE)
        );
    }

    #[test]
    fn condition_on_other_axis_does_not_satisfy_guard() {
        let conditional = Conditional::new(VALUE, vec![Guard::Relation(RelationType::DynamicLink)]);

        assert_eq!(
            conditional.evaluate(&[Guard::Distribution(Distribution::Standalone)]),
            None
        );
    }

    #[test]
    fn every_guard_must_be_met() {
        let conditional = Conditional::new(
            VALUE,
            vec![
                Guard::Relation(RelationType::StaticLink),
                Guard::Distribution(Distribution::Saas),
            ],
        );

        assert_eq!(
            conditional.evaluate(&[Guard::Relation(RelationType::StaticLink)]),
            None
        );
        assert_eq!(
            conditional.evaluate(&[
                Guard::Relation(RelationType::StaticLink),
                Guard::Distribution(Distribution::Saas),
            ]),
            Some(&VALUE)
        );
    }

    #[test]
    fn guard_at_the_bottom_of_an_axis_is_always_met() {
        let conditional =
            Conditional::new(VALUE, vec![Guard::Relation(RelationType::Independent)]);

        assert_eq!(
            conditional.evaluate(&[Guard::Relation(RelationType::Independent)]),
            Some(&VALUE)
        );
    }

    #[test]
    fn value_is_readable_without_conditions() {
        let conditional = Conditional::new(VALUE, vec![Guard::Relation(RelationType::StaticLink)]);

        assert_eq!(*conditional.value(), VALUE);
    }
}
