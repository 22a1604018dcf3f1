//! Handles addressing one section of a tree.
//!
//! A [`Section`] reads and follows inheritance. A [`SectionMut`] holds the
//! tree exclusively and writes to the concrete section it addresses.

use crate::error::Result;
use crate::list::{NameKind, Names};
use crate::path::split_path;
use crate::section::{OptionEntry, SectionId, SectionNode};
use crate::tree::{sections_equal, Cfg, Found};
use std::fmt;
use std::io::Read;

#[derive(Clone, Copy)]
/// Read handle on a section of a [`Cfg`].
pub struct Section<'a> {
    cfg: &'a Cfg,
    id: SectionId,
}

impl<'a> Section<'a> {
    pub(crate) fn new(cfg: &'a Cfg, id: SectionId) -> Self {
        Self { cfg, id }
    }

    pub(crate) fn id(&self) -> SectionId {
        self.id
    }

    pub(crate) fn node(&self) -> &'a SectionNode {
        self.cfg.node(self.id)
    }

    /// Another section of the same tree.
    pub(crate) fn at(&self, id: SectionId) -> Self {
        Self::new(self.cfg, id)
    }

    pub(crate) fn option_entry(&self, name: &str) -> Option<&'a OptionEntry> {
        self.cfg.lookup_option(self.id, name, true)
    }

    pub(crate) fn child(&self, name: &str) -> Option<Self> {
        self.cfg
            .lookup_section(self.id, name, true)
            .map(|id| self.at(id))
    }

    fn lookup(&self, path: &str) -> Option<Found<'a>> {
        self.cfg.resolve(self.id, &split_path(path), true, 0)
    }

    #[must_use]
    /// Name under the parent section; empty for the root.
    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    #[must_use]
    /// Slash-separated path from the root, or `/` for the root itself.
    pub fn path(&self) -> String {
        self.cfg.path_of(self.id)
    }

    #[must_use]
    /// Block comment attached above the section's opening line.
    pub fn comment(&self) -> &'a str {
        &self.node().comment
    }

    #[must_use]
    /// Whether this is the root section.
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    #[must_use]
    /// Enclosing section.
    pub fn parent(&self) -> Option<Self> {
        self.node().parent.map(|id| self.at(id))
    }

    #[must_use]
    /// Root section of the tree.
    pub fn root(&self) -> Self {
        self.at(SectionId::ROOT)
    }

    #[must_use]
    /// Section this one falls back to when a lookup misses.
    pub fn inheritance(&self) -> Option<Self> {
        self.node().inheritance.map(|id| self.at(id))
    }

    #[must_use]
    /// Whether a section or option is visible at `path`.
    pub fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    #[must_use]
    /// Whether a section is visible at `path`.
    pub fn exists_section(&self, path: &str) -> bool {
        matches!(self.lookup(path), Some(Found::Section(_)))
    }

    #[must_use]
    /// Whether an option is visible at `path`.
    pub fn exists_option(&self, path: &str) -> bool {
        matches!(self.lookup(path), Some(Found::Option(_)))
    }

    #[must_use]
    /// Section visible at `path`.
    pub fn get_section(&self, path: &str) -> Option<Self> {
        match self.lookup(path) {
            Some(Found::Section(id)) => Some(self.at(id)),
            _ => None,
        }
    }

    #[must_use]
    /// All values of the option visible at `path`.
    pub fn get_option_array(&self, path: &str) -> Option<&'a [String]> {
        match self.lookup(path) {
            Some(Found::Option(entry)) => Some(&entry.values),
            _ => None,
        }
    }

    #[must_use]
    /// Values of the option visible at `path`, joined with `/`.
    pub fn get_option(&self, path: &str) -> Option<String> {
        self.get_option_array(path).map(|values| values.join("/"))
    }

    #[must_use]
    /// Comment attached to the option visible at `path`.
    pub fn option_comment(&self, path: &str) -> Option<&'a str> {
        match self.lookup(path) {
            Some(Found::Option(entry)) => Some(&entry.comment),
            _ => None,
        }
    }

    #[must_use]
    /// Option value at `path`, or `default` when it cannot be found.
    pub fn get_value(&self, path: &str, default: &str) -> String {
        self.get_option(path).unwrap_or_else(|| default.to_string())
    }

    #[must_use]
    /// Option values at `path`, or `default` when they cannot be found.
    pub fn get_value_array(&self, path: &str, default: Vec<String>) -> Vec<String> {
        self.get_option_array(path).map_or(default, <[String]>::to_vec)
    }

    #[must_use]
    /// Option names visible here, own names first, then along the inheritance chain.
    pub fn list_options(&self) -> Names<'a> {
        Names::new(self.cfg, self.id, NameKind::Options)
    }

    #[must_use]
    /// Section names visible here, own names first, then along the inheritance chain.
    pub fn list_sections(&self) -> Names<'a> {
        Names::new(self.cfg, self.id, NameKind::Sections)
    }

    /// Standalone tree holding this section's contents and everything below it.
    ///
    /// Inheritance links between copied sections are carried over to their
    /// copies. The comment on this section itself is not part of its contents.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RootInheritance`] if this section inherits, since it
    /// becomes the root of the copy, and [`crate::Error::ExternalInheritance`] if a
    /// section below it inherits from one outside it.
    pub fn try_clone(&self) -> Result<Cfg> {
        self.cfg.copy_subtree(self.id)
    }

    #[must_use]
    /// Recursive equality with a section of any tree.
    ///
    /// Declaration order matters and inheritance targets are compared by path.
    pub fn equal(&self, other: &Section<'_>, with_comments: bool) -> bool {
        sections_equal(*self, *other, with_comments)
    }
}

impl fmt::Debug for Section<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Section").field(&self.path()).finish()
    }
}

/// Write handle on a section of a [`Cfg`].
///
/// Holding one borrows the whole tree exclusively.
pub struct SectionMut<'a> {
    cfg: &'a mut Cfg,
    id: SectionId,
}

impl<'a> SectionMut<'a> {
    pub(crate) fn new(cfg: &'a mut Cfg, id: SectionId) -> Self {
        Self { cfg, id }
    }

    #[must_use]
    /// Read view of the same section.
    pub fn as_section(&self) -> Section<'_> {
        Section::new(self.cfg, self.id)
    }

    #[must_use]
    /// Slash-separated path from the root.
    pub fn path(&self) -> String {
        self.cfg.path_of(self.id)
    }

    /// Creates a section below this one.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty, its parent does not exist, or
    /// the name is already taken there.
    pub fn create_section(&mut self, path: &str, comment: &str) -> Result<SectionMut<'_>> {
        let id = self.cfg.create_section_at(self.id, path, comment)?;
        Ok(SectionMut::new(self.cfg, id))
    }

    /// Sets a single-valued option below this section.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no name, its parent does not exist,
    /// or the name or value would not load back unchanged from a dump.
    pub fn set_option(&mut self, path: &str, value: &str, comment: &str) -> Result<()> {
        self.cfg.set_option_at(self.id, path, vec![value.to_string()], comment)
    }

    /// Sets every value of an option below this section.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no name, its parent does not exist,
    /// no values are given, or the name or a value would not load back
    /// unchanged from a dump.
    pub fn set_option_array<I, S>(&mut self, path: &str, values: I, comment: &str) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.cfg.set_option_at(self.id, path, values, comment)
    }

    /// Makes this section inherit from the section at `target`, a path from the root.
    ///
    /// # Errors
    ///
    /// Returns an error for the root section, a missing target, or a link
    /// that would loop back onto this section or its parents.
    pub fn set_inheritance(&mut self, target: &str) -> Result<()> {
        self.cfg.set_inheritance_at(self.id, target)
    }

    /// Copies everything visible in `src` into this section.
    ///
    /// # Errors
    ///
    /// Returns an error on an option/section name clash or a source that
    /// recurses into itself through inheritance.
    pub fn insert_contents(&mut self, src: Section<'_>) -> Result<()> {
        self.cfg.insert_contents_at(self.id, src)
    }

    /// Parses a stream into this section.
    ///
    /// Inheritance links below this section are rebuilt from the stream's
    /// declarations once it has been read completely.
    ///
    /// # Errors
    ///
    /// Returns the first syntax, structural, or inheritance error. The tree
    /// must be discarded after a failed load.
    pub fn load_from_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        self.cfg.load_into(self.id, reader)
    }
}

impl fmt::Debug for SectionMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SectionMut").field(&self.path()).finish()
    }
}

#[cfg(test)]
#[path = "tests/view.rs"]
mod tests;
