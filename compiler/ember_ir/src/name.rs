//! Interned identifiers.
//!
//! A [`Name`] is a dense 32-bit id handed out by an [`IdentifierTable`].
//! Identifier equality is id equality, so the rest of the compiler never
//! compares spellings.

use rustc_hash::FxHashMap;
use std::fmt;

/// Interned identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Create from a raw table index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// Identifier table for one compilation.
///
/// Populated once and never cleared: every rescan of the same source must map
/// a spelling to the id it received the first time.
#[derive(Default)]
pub struct IdentifierTable {
    map: FxHashMap<Box<str>, Name>,
    names: Vec<Box<str>>,
}

impl IdentifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a spelling, returning the existing id if it was seen before.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct identifiers are interned.
    pub fn intern(&mut self, spelling: &str) -> Name {
        if let Some(&name) = self.map.get(spelling) {
            return name;
        }
        let Ok(raw) = u32::try_from(self.names.len()) else {
            panic!("identifier table overflow: more than {} identifiers", u32::MAX);
        };
        let name = Name(raw);
        self.names.push(spelling.into());
        self.map.insert(spelling.into(), name);
        name
    }

    /// Look up an already interned spelling without inserting it.
    pub fn lookup(&self, spelling: &str) -> Option<Name> {
        self.map.get(spelling).copied()
    }

    /// Resolve an id back to its spelling.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this table.
    pub fn resolve(&self, name: Name) -> &str {
        match self.try_resolve(name) {
            Some(s) => s,
            None => panic!("{name:?} was never interned ({} identifiers known)", self.len()),
        }
    }

    pub fn try_resolve(&self, name: Name) -> Option<&str> {
        self.names.get(name.index()).map(|s| &**s)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Debug for IdentifierTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names.iter()).finish()
    }
}

#[cfg(test)]
mod tests;
