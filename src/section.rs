//! Arena entries backing a configuration tree.
//!
//! Every brace-delimited scope, including the implicit root, is stored as a
//! `SectionNode` in the owning tree's arena and addressed by a `SectionId`.
//! Parent and inheritance references are plain indices, so the structural
//! tree owns its children while inheritance links never own anything.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Stable handle of a section within one tree's arena.
pub(crate) struct SectionId(pub(crate) usize);

impl SectionId {
    pub(crate) const ROOT: Self = Self(0);
}

#[derive(Clone, Debug, Default)]
/// A named leaf holding one or more values.
pub(crate) struct OptionEntry {
    /// Values in assignment order: `=` first, then each `+=`.
    pub values: Vec<String>,
    /// Block comment written above the assignment.
    pub comment: String,
}

#[derive(Clone, Debug, Default)]
/// One scope of the tree with its direct options and subsections.
pub(crate) struct SectionNode {
    /// Name under the parent section; empty for the root.
    pub name: String,
    /// Block comment written above the opening line.
    pub comment: String,
    /// Index of the containing section in the arena.
    pub parent: Option<SectionId>,
    /// Section consulted when a lookup misses here.
    pub inheritance: Option<SectionId>,
    pub options: HashMap<String, OptionEntry>,
    pub sections: HashMap<String, SectionId>,
    /// Declaration order of every option and section name.
    pub order: Vec<String>,
}

impl SectionNode {
    pub(crate) fn child(name: &str, comment: String, parent: SectionId) -> Self {
        Self {
            name: name.to_string(),
            comment,
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Whether a section or option of this name is defined here, ignoring inheritance.
    pub(crate) fn defines(&self, name: &str) -> bool {
        self.sections.contains_key(name) || self.options.contains_key(name)
    }
}
