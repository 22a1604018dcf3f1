//! The configuration tree: an arena of sections rooted at index zero.
//!
//! Path queries walk the arena from a starting section and may fall back to
//! each section's inheritance chain. Creation and assignment always resolve
//! the containing section structurally, so they never write into a section
//! that is only visible through inheritance.
//!
//! # Locking
//!
//! All mutation goes through `&mut Cfg` (directly or via a [`SectionMut`]),
//! so the exclusive borrow is the tree-wide writer lock and two writers can
//! never interleave. Readers only hold `&Cfg`. A tree shared between threads
//! must be wrapped by the caller (`Mutex<Cfg>`, `RwLock<Cfg>`); the tree adds
//! no synchronisation of its own between readers and writers.

use crate::error::{Error, Result};
use crate::list::Names;
use crate::path::{check_name, check_value, join_path, normalize_comment, split_path, SEPARATOR};
use crate::section::{OptionEntry, SectionId, SectionNode};
use crate::view::{Section, SectionMut};
use std::collections::HashMap;

/// What a path resolved to.
pub(crate) enum Found<'a> {
    Section(SectionId),
    Option(&'a OptionEntry),
}

/// One step of a merge walk: copy a source section, or leave it again.
enum MergeStep<'s> {
    Enter(SectionId, Section<'s>),
    Leave,
}

#[derive(Debug)]
/// A parsed configuration file: nested sections holding multi-valued options.
pub struct Cfg {
    nodes: Vec<SectionNode>,
}

impl Default for Cfg {
    fn default() -> Self {
        Self::new()
    }
}

impl Cfg {
    #[must_use]
    /// Creates an empty tree holding only the root section.
    pub fn new() -> Self {
        Self {
            nodes: vec![SectionNode::default()],
        }
    }

    #[must_use]
    /// Read handle on the root section.
    pub fn root(&self) -> Section<'_> {
        Section::new(self, SectionId::ROOT)
    }

    /// Write handle on the root section.
    pub fn root_mut(&mut self) -> SectionMut<'_> {
        SectionMut::new(self, SectionId::ROOT)
    }

    #[must_use]
    /// Read handle on the section at `path`, found without following inheritance.
    pub fn section(&self, path: &str) -> Option<Section<'_>> {
        let id = self.resolve_section(SectionId::ROOT, path, false)?;
        Some(Section::new(self, id))
    }

    /// Write handle on the section at `path`, found without following inheritance.
    pub fn section_mut(&mut self, path: &str) -> Option<SectionMut<'_>> {
        let id = self.resolve_section(SectionId::ROOT, path, false)?;
        Some(SectionMut::new(self, id))
    }

    #[must_use]
    /// Whether a section or option is visible at `path`.
    pub fn exists(&self, path: &str) -> bool {
        self.root().exists(path)
    }

    #[must_use]
    /// Whether a section is visible at `path`.
    pub fn exists_section(&self, path: &str) -> bool {
        self.root().exists_section(path)
    }

    #[must_use]
    /// Whether an option is visible at `path`.
    pub fn exists_option(&self, path: &str) -> bool {
        self.root().exists_option(path)
    }

    #[must_use]
    /// Section visible at `path`, possibly reached through inheritance.
    pub fn get_section(&self, path: &str) -> Option<Section<'_>> {
        self.root().get_section(path)
    }

    #[must_use]
    /// Option values at `path` joined with `/`.
    pub fn get_option(&self, path: &str) -> Option<String> {
        self.root().get_option(path)
    }

    #[must_use]
    /// Option values at `path`.
    pub fn get_option_array(&self, path: &str) -> Option<&[String]> {
        self.root().get_option_array(path)
    }

    #[must_use]
    /// Option value at `path`, or `default` when it cannot be found.
    pub fn get_value(&self, path: &str, default: &str) -> String {
        self.root().get_value(path, default)
    }

    #[must_use]
    /// Option values at `path`, or `default` when they cannot be found.
    pub fn get_value_array(&self, path: &str, default: Vec<String>) -> Vec<String> {
        self.root().get_value_array(path, default)
    }

    #[must_use]
    /// Names of the options visible on the root section.
    pub fn list_options(&self) -> Names<'_> {
        self.root().list_options()
    }

    #[must_use]
    /// Names of the sections visible on the root section.
    pub fn list_sections(&self) -> Names<'_> {
        self.root().list_sections()
    }

    /// Creates the section at `path`. Intermediate sections must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty, its parent section does not
    /// exist, the name is already defined in the parent, or the name would
    /// not load back unchanged from a dump.
    pub fn create_section(&mut self, path: &str, comment: &str) -> Result<SectionMut<'_>> {
        let id = self.create_section_at(SectionId::ROOT, path, comment)?;
        Ok(SectionMut::new(self, id))
    }

    /// Sets a single-valued option, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no name, its parent section does not
    /// exist, or the name or value would not load back unchanged from a dump.
    pub fn set_option(&mut self, path: &str, value: &str, comment: &str) -> Result<()> {
        self.set_option_at(SectionId::ROOT, path, vec![value.to_string()], comment)
    }

    /// Sets every value of an option, overwriting any existing values.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no name, its parent section does not
    /// exist, `values` is empty, or the name or a value would not load back
    /// unchanged from a dump.
    pub fn set_option_array<I, S>(&mut self, path: &str, values: I, comment: &str) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.set_option_at(SectionId::ROOT, path, values, comment)
    }

    /// Makes the section at `section` inherit from the section at `target`.
    ///
    /// An empty `section` path names the root, which cannot inherit.
    ///
    /// # Errors
    ///
    /// Returns an error if either section is missing, or if the link would
    /// make the section inherit from itself, an enclosing section, or a
    /// chain that leads back to it.
    pub fn set_inheritance(&mut self, section: &str, target: &str) -> Result<()> {
        let id = self
            .resolve_section(SectionId::ROOT, section, false)
            .ok_or_else(|| Error::MissingParent(section.to_string()))?;
        self.set_inheritance_at(id, target)
    }

    /// Copies everything visible in `other` into this tree, flattening inheritance.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is an option on one side and a section on
    /// the other, or if `other` recurses into itself through inheritance.
    pub fn insert_contents(&mut self, other: &Cfg) -> Result<()> {
        self.insert_contents_at(SectionId::ROOT, other.root())
    }

    #[must_use]
    /// Structural equality ignoring comments.
    pub fn equal(&self, other: &Cfg) -> bool {
        self.root().equal(&other.root(), false)
    }

    #[must_use]
    /// Structural equality including comments.
    pub fn equal_with_comments(&self, other: &Cfg) -> bool {
        self.root().equal(&other.root(), true)
    }

    /// Duplicates the whole tree, inheritance links included.
    ///
    /// # Errors
    ///
    /// Never fails for a whole tree; see [`Section::try_clone`].
    pub fn try_clone(&self) -> Result<Self> {
        self.root().try_clone()
    }

    // --- Arena access ---

    pub(crate) fn node(&self, id: SectionId) -> &SectionNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: SectionId) -> &mut SectionNode {
        &mut self.nodes[id.0]
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Path of a section from the root; the root itself renders as `/`.
    pub(crate) fn path_of(&self, id: SectionId) -> String {
        let mut names = Vec::new();
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            names.push(self.node(current).name.as_str());
            current = parent;
        }
        if names.is_empty() {
            return SEPARATOR.to_string();
        }
        names.reverse();
        join_path(&names)
    }

    fn is_ancestor(&self, ancestor: SectionId, of: SectionId) -> bool {
        std::iter::successors(self.node(of).parent, |&id| self.node(id).parent)
            .any(|id| id == ancestor)
    }

    // --- Lookup ---

    pub(crate) fn lookup_section(
        &self,
        id: SectionId,
        name: &str,
        follow_inheritance: bool,
    ) -> Option<SectionId> {
        let mut current = Some(id);
        while let Some(section) = current {
            let node = self.node(section);
            if let Some(&child) = node.sections.get(name) {
                return Some(child);
            }
            if !follow_inheritance {
                return None;
            }
            current = node.inheritance;
        }
        None
    }

    pub(crate) fn lookup_option(
        &self,
        id: SectionId,
        name: &str,
        follow_inheritance: bool,
    ) -> Option<&OptionEntry> {
        let mut current = Some(id);
        while let Some(section) = current {
            let node = self.node(section);
            if let Some(entry) = node.options.get(name) {
                return Some(entry);
            }
            if !follow_inheritance {
                return None;
            }
            current = node.inheritance;
        }
        None
    }

    /// Walks `segments` from `id`, stopping `parent_level` segments short of the end.
    pub(crate) fn resolve(
        &self,
        id: SectionId,
        segments: &[&str],
        follow_inheritance: bool,
        parent_level: usize,
    ) -> Option<Found<'_>> {
        let mut current = id;
        let mut rest = segments;
        while rest.len() > 1 + parent_level {
            current = self.lookup_section(current, rest[0], follow_inheritance)?;
            rest = &rest[1..];
        }
        if rest.len() != 1 + parent_level {
            return None;
        }
        if let Some(section) = self.lookup_section(current, rest[0], follow_inheritance) {
            return Some(Found::Section(section));
        }
        self.lookup_option(current, rest[0], follow_inheritance)
            .map(Found::Option)
    }

    /// Section at `path` below `id`. An empty path names `id` itself.
    pub(crate) fn resolve_section(
        &self,
        id: SectionId,
        path: &str,
        follow_inheritance: bool,
    ) -> Option<SectionId> {
        let segments = split_path(path);
        if segments.is_empty() {
            return Some(id);
        }
        match self.resolve(id, &segments, follow_inheritance, 0) {
            Some(Found::Section(section)) => Some(section),
            _ => None,
        }
    }

    /// Section that directly holds the last segment of `segments`.
    fn owner_of(&self, id: SectionId, segments: &[&str]) -> Result<SectionId> {
        match segments.len() {
            0 => Err(Error::MissingName),
            1 => Ok(id),
            n => match self.resolve(id, segments, false, 1) {
                Some(Found::Section(owner)) => Ok(owner),
                _ => Err(Error::MissingParent(join_path(&segments[..n - 1]))),
            },
        }
    }

    // --- Mutation ---

    pub(crate) fn create_section_at(
        &mut self,
        id: SectionId,
        path: &str,
        comment: &str,
    ) -> Result<SectionId> {
        let segments = split_path(path);
        let owner = self.owner_of(id, &segments)?;
        let name = segments.last().ok_or(Error::MissingName)?;
        self.add_section(owner, name, comment.to_string())
    }

    /// Appends a new child section to `owner`.
    pub(crate) fn add_section(
        &mut self,
        owner: SectionId,
        name: &str,
        comment: String,
    ) -> Result<SectionId> {
        let name = check_name(name)?;
        if self.node(owner).defines(name) {
            return Err(Error::AlreadyExists {
                name: name.to_string(),
                parent: self.path_of(owner),
            });
        }
        let id = SectionId(self.nodes.len());
        self.nodes.push(SectionNode::child(name, normalize_comment(&comment), owner));
        let node = self.node_mut(owner);
        node.sections.insert(name.to_string(), id);
        node.order.push(name.to_string());
        Ok(id)
    }

    pub(crate) fn set_option_at(
        &mut self,
        id: SectionId,
        path: &str,
        values: Vec<String>,
        comment: &str,
    ) -> Result<()> {
        let segments = split_path(path);
        let owner = self.owner_of(id, &segments)?;
        let name = segments.last().ok_or(Error::MissingName)?;
        self.put_option(owner, name, values, comment.to_string())
    }

    /// Writes an option directly on `owner`, keeping its order slot if it already exists.
    pub(crate) fn put_option(
        &mut self,
        owner: SectionId,
        name: &str,
        values: Vec<String>,
        comment: String,
    ) -> Result<()> {
        let name = check_name(name)?;
        if values.is_empty() {
            return Err(Error::NoValues(name.to_string()));
        }
        for value in &values {
            check_value(name, value)?;
        }
        let comment = normalize_comment(&comment);
        if self.node(owner).sections.contains_key(name) {
            return Err(Error::AlreadyExists {
                name: name.to_string(),
                parent: self.path_of(owner),
            });
        }
        let node = self.node_mut(owner);
        if let Some(entry) = node.options.get_mut(name) {
            entry.values = values;
            entry.comment = comment;
        } else {
            node.order.push(name.to_string());
            node.options
                .insert(name.to_string(), OptionEntry { values, comment });
        }
        Ok(())
    }

    pub(crate) fn append_value(
        &mut self,
        owner: SectionId,
        name: &str,
        value: String,
    ) -> Result<()> {
        check_value(name, &value)?;
        let entry = self
            .node_mut(owner)
            .options
            .get_mut(name)
            .ok_or_else(|| Error::NotDefined(name.to_string()))?;
        entry.values.push(value);
        Ok(())
    }

    // --- Inheritance ---

    /// Links `id` to the section at `target`, resolved structurally from the root.
    ///
    /// The target's existing chain is walked before linking. Since every
    /// installed link passed this walk, chains stay acyclic.
    pub(crate) fn set_inheritance_at(&mut self, id: SectionId, target: &str) -> Result<()> {
        if self.node(id).parent.is_none() {
            return Err(Error::RootInheritance);
        }
        let section = self.path_of(id);
        let Some(resolved) = self.resolve_section(SectionId::ROOT, target, false) else {
            return Err(Error::MissingInheritanceTarget {
                target: target.to_string(),
                section,
            });
        };
        if resolved == id {
            return Err(Error::SelfInheritance(section));
        }

        let mut chain = vec![section.clone()];
        let mut current = Some(resolved);
        while let Some(link) = current {
            chain.push(self.path_of(link));
            if link == id {
                return Err(Error::InheritanceCycle(chain.join(" < ")));
            }
            if self.is_ancestor(link, id) {
                return Err(Error::ParentInheritance {
                    ancestor: self.path_of(link),
                    section,
                });
            }
            current = self.node(link).inheritance;
        }

        tracing::trace!("{section} inherits from {}", self.path_of(resolved));
        self.node_mut(id).inheritance = Some(resolved);
        Ok(())
    }

    /// Drops the inheritance links of `id` and every section below it.
    pub(crate) fn reset_inheritance(&mut self, id: SectionId) {
        let mut stack = vec![id];
        while let Some(section) = stack.pop() {
            let node = self.node_mut(section);
            node.inheritance = None;
            stack.extend(node.sections.values().copied());
        }
    }

    // --- Merge ---

    pub(crate) fn insert_contents_at(&mut self, dst: SectionId, src: Section<'_>) -> Result<()> {
        tracing::debug!("Merging {} into {}", src.path(), self.path_of(dst));
        let mut visiting = Vec::new();
        let mut steps = vec![MergeStep::Enter(dst, src)];
        while let Some(step) = steps.pop() {
            let MergeStep::Enter(dst, src) = step else {
                visiting.pop();
                continue;
            };
            // The same source section twice on the path can only repeat forever.
            if visiting.contains(&src.id()) {
                return Err(Error::RecursiveMerge(src.path()));
            }
            visiting.push(src.id());
            steps.push(MergeStep::Leave);

            for name in src.list_options() {
                if let Some(entry) = src.option_entry(name) {
                    self.put_option(dst, name, entry.values.clone(), entry.comment.clone())?;
                }
            }
            let mut children = Vec::new();
            for name in src.list_sections() {
                let Some(source) = src.child(name) else {
                    continue;
                };
                let existing = self.node(dst).sections.get(name).copied();
                let target = match existing {
                    Some(target) => target,
                    None => self.add_section(dst, name, source.comment().to_string())?,
                };
                children.push(MergeStep::Enter(target, source));
            }
            steps.extend(children.into_iter().rev());
        }
        Ok(())
    }

    // --- Copy ---

    /// Standalone tree holding the contents of `top` and everything below it.
    pub(crate) fn copy_subtree(&self, top: SectionId) -> Result<Cfg> {
        if self.node(top).inheritance.is_some() {
            return Err(Error::RootInheritance);
        }
        let mut copy = Cfg::new();
        let mut mapped = HashMap::from([(top, SectionId::ROOT)]);
        let mut links = Vec::new();
        let mut stack = vec![(top, SectionId::ROOT)];
        while let Some((old, new)) = stack.pop() {
            let node = self.node(old);
            let target = copy.node_mut(new);
            target.options.clone_from(&node.options);
            target.order.clone_from(&node.order);
            if let Some(inherited) = node.inheritance {
                links.push((old, new, inherited));
            }
            for (name, &child) in &node.sections {
                let id = SectionId(copy.nodes.len());
                let comment = self.node(child).comment.clone();
                copy.nodes.push(SectionNode::child(name, comment, new));
                copy.node_mut(new).sections.insert(name.clone(), id);
                mapped.insert(child, id);
                stack.push((child, id));
            }
        }
        for (old, new, inherited) in links {
            let Some(&target) = mapped.get(&inherited) else {
                return Err(Error::ExternalInheritance {
                    section: self.path_of(old),
                    target: self.path_of(inherited),
                });
            };
            copy.node_mut(new).inheritance = Some(target);
        }
        Ok(copy)
    }
}

/// Equality of two sections and everything below them, possibly from different trees.
///
/// Declaration order is significant. Inheritance is compared by the path of
/// each side's target rather than by identity.
pub(crate) fn sections_equal(a: Section<'_>, b: Section<'_>, with_comments: bool) -> bool {
    let mut pending = vec![(a, b)];
    while let Some((a, b)) = pending.pop() {
        let (left, right) = (a.node(), b.node());
        if with_comments && left.comment != right.comment {
            return false;
        }
        if left.order != right.order {
            return false;
        }
        if a.inheritance().map(|s| s.path()) != b.inheritance().map(|s| s.path()) {
            return false;
        }
        for name in &left.order {
            match (left.sections.get(name), right.sections.get(name)) {
                (Some(&l), Some(&r)) => {
                    pending.push((a.at(l), b.at(r)));
                    continue;
                }
                (None, None) => {}
                _ => return false,
            }
            let same = match (left.options.get(name), right.options.get(name)) {
                (Some(l), Some(r)) => {
                    l.values == r.values && (!with_comments || l.comment == r.comment)
                }
                (None, None) => true,
                _ => false,
            };
            if !same {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
#[path = "tests/tree.rs"]
mod tests;
