//! Lazy listing of the names visible on a section.

use crate::section::SectionId;
use crate::tree::Cfg;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NameKind {
    Options,
    Sections,
}

/// Iterator over the distinct option or section names visible on a section.
///
/// The section's own names come first in declaration order, then those of
/// each section along its inheritance chain. A name already yielded is
/// skipped when a less derived section defines it again.
#[derive(Debug, Clone)]
pub struct Names<'a> {
    cfg: &'a Cfg,
    kind: NameKind,
    current: Option<SectionId>,
    position: usize,
    seen: HashSet<&'a str>,
}

impl<'a> Names<'a> {
    pub(crate) fn new(cfg: &'a Cfg, id: SectionId, kind: NameKind) -> Self {
        Self {
            cfg,
            kind,
            current: Some(id),
            position: 0,
            seen: HashSet::new(),
        }
    }
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let cfg = self.cfg;
        loop {
            let node = cfg.node(self.current?);
            let Some(name) = node.order.get(self.position) else {
                self.current = node.inheritance;
                self.position = 0;
                continue;
            };
            self.position += 1;
            let wanted = match self.kind {
                NameKind::Options => node.options.contains_key(name),
                NameKind::Sections => node.sections.contains_key(name),
            };
            if wanted && self.seen.insert(name.as_str()) {
                return Some(name.as_str());
            }
        }
    }
}
