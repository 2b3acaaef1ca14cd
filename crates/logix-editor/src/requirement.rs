//! Typed parameter slots collected before a command executes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::command::EditError;

static NON_NEG_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[0-9]+$").expect("pattern is valid"));
static POS_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[1-9][0-9]*$").expect("pattern is valid"));
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s]+$").expect("pattern is valid"));

/// The shape of a well-formed component name: nonempty, no whitespace.
///
/// Availability against the live graph is checked separately; the graph index
/// is the final authority on uniqueness.
pub(crate) fn name_pattern() -> &'static Regex {
    &NAME
}

/// The kind of value a requirement slot accepts.
#[derive(Debug, Clone)]
pub enum ReqKind {
    /// Any value, including the empty string.
    Any,
    /// A base-10 integer, zero or greater.
    NonNegInteger,
    /// A base-10 integer, one or greater.
    PosInteger,
    /// A value matching a caller-supplied pattern.
    Custom(Regex),
}

impl ReqKind {
    fn accepts(&self, value: &str) -> bool {
        match self {
            ReqKind::Any => true,
            ReqKind::NonNegInteger => NON_NEG_INTEGER.is_match(value),
            ReqKind::PosInteger => POS_INTEGER.is_match(value),
            ReqKind::Custom(pattern) => pattern.is_match(value),
        }
    }
}

/// A single named parameter slot.
#[derive(Debug, Clone)]
pub struct Requirement {
    key: &'static str,
    kind: ReqKind,
    value: Option<String>,
}

impl Requirement {
    /// Returns the key of the slot.
    pub fn key(&self) -> &str {
        self.key
    }

    /// Returns the kind of value the slot accepts.
    pub fn kind(&self) -> &ReqKind {
        &self.kind
    }

    /// Returns the validated value, if fulfilled.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns `true` once a validated value is stored.
    pub fn is_fulfilled(&self) -> bool {
        self.value.is_some()
    }
}

/// An ordered collection of parameter slots.
///
/// A command starts out unfilled; each slot is fulfilled with a validated
/// value before the command executes.
#[derive(Debug, Clone, Default)]
pub struct Requirements {
    slots: Vec<Requirement>,
}

impl Requirements {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, key: &'static str, kind: ReqKind) {
        self.slots.push(Requirement {
            key,
            kind,
            value: None,
        });
    }

    /// Validates `value` against the slot's kind and stores it.
    pub fn fulfil(&mut self, key: &str, value: impl Into<String>) -> Result<(), EditError> {
        let value = value.into();
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.key == key)
            .ok_or_else(|| EditError::UnknownRequirement(key.to_owned()))?;

        if !slot.kind.accepts(&value) {
            return Err(EditError::InvalidValue {
                key: key.to_owned(),
                value,
            });
        }

        slot.value = Some(value);
        Ok(())
    }

    /// Returns the fulfilled value of the slot with the given key.
    pub fn get(&self, key: &str) -> Result<&str, EditError> {
        self.slots
            .iter()
            .find(|slot| slot.key == key)
            .ok_or_else(|| EditError::UnknownRequirement(key.to_owned()))?
            .value()
            .ok_or_else(|| EditError::Unfilled(key.to_owned()))
    }

    /// Returns the fulfilled value of the slot with the given key, parsed as
    /// an index or count.
    pub fn get_usize(&self, key: &str) -> Result<usize, EditError> {
        let value = self.get(key)?;
        value.parse().map_err(|_| EditError::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }

    /// Returns `true` once every slot holds a validated value.
    pub fn is_fulfilled(&self) -> bool {
        self.slots.iter().all(Requirement::is_fulfilled)
    }

    /// Returns an iterator over the slots.
    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.slots.iter()
    }
}
