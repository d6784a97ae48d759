//! Player identities.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ConfigError;

/// A player, identified by name. Ordering is by name so every keyed
/// collection iterates in report order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Person(String);

impl Person {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Person {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A set of distinct players.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Persons(BTreeSet<Person>);

impl Persons {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Build a set from persons that must all be distinct.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicatePerson`] naming the first repeated person.
    pub fn from_distinct<I>(persons: I, context: impl Into<String>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = Person>,
    {
        let mut set = BTreeSet::new();
        for person in persons {
            if set.contains(&person) {
                return Err(ConfigError::DuplicatePerson {
                    person,
                    context: context.into(),
                });
            }
            set.insert(person);
        }
        Ok(Self(set))
    }

    #[must_use]
    pub fn contains(&self, person: &Person) -> bool {
        self.0.contains(person)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names joined with `", "`, in name order.
    #[must_use]
    pub fn joined_names(&self) -> String {
        self.0
            .iter()
            .map(Person::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<Person> for Persons {
    fn from_iter<T: IntoIterator<Item = Person>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Persons {
    type Item = &'a Person;
    type IntoIter = std::collections::btree_set::Iter<'a, Person>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persons_reject_duplicates() {
        let err = Persons::from_distinct(
            [Person::new("Aris"), Person::new("nix"), Person::new("Aris")],
            "co-authors",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicatePerson {
                person: Person::new("Aris"),
                context: "co-authors".to_string(),
            }
        );
    }

    #[test]
    fn names_join_in_sorted_order() {
        let persons: Persons = ["omd", "G.", "Aris"].into_iter().map(Person::new).collect();
        assert_eq!(persons.joined_names(), "Aris, G., omd");
        assert_eq!(persons.len(), 3);
    }
}
