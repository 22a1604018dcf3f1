//! Loading the brace-delimited text format into a tree.
//!
//! ```text
//! # comment attached to `server`
//! server { < defaults
//!     host = example.org
//!     port = 80
//!     port += 8080
//! }
//! ```
//!
//! Loading happens in two passes. The structural pass builds sections and
//! options and records each `< target` declaration in a side table. Once the
//! stream is exhausted the links are cleared and every declaration is
//! installed in file order, so a section may inherit from one declared later.

use crate::error::{Error, Result};
use crate::path::{trim, SEPARATOR};
use crate::section::SectionId;
use crate::tree::Cfg;
use std::io::{BufRead, BufReader, Lines, Read};
use std::str::FromStr;

struct Loader<R> {
    lines: Lines<R>,
    line: usize,
    /// Inheritance declarations awaiting the end of the stream, in file order.
    pending: Vec<(SectionId, String)>,
}

impl<R: BufRead> Loader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            pending: Vec::new(),
        }
    }

    /// Reads the whole stream into `scope`.
    ///
    /// Open sections are kept on an explicit stack, so nesting depth is
    /// bounded by memory only. Sections still open at the end of the stream
    /// are closed implicitly.
    fn parse(&mut self, cfg: &mut Cfg, scope: SectionId) -> Result<()> {
        let mut current = scope;
        let mut enclosing: Vec<SectionId> = Vec::new();
        let mut comment: Vec<String> = Vec::new();

        for raw in self.lines.by_ref() {
            let raw = raw?;
            self.line += 1;
            let line = self.line;

            let mut text = raw.as_str();
            if let Some(hash) = text.find('#') {
                comment.push(trim(&text[hash + 1..]).to_string());
                text = &text[..hash];
            }
            let text = trim(text);
            if text.is_empty() {
                continue;
            }

            let Some(pos) = text.find(['{', '}', '=']) else {
                return Err(Error::Syntax(format!(
                    "expected '{{', '}}', '=' or '+=' but '{text}' found"
                ))
                .at_line(line));
            };
            let (head, tail) = (&text[..pos], &text[pos + 1..]);

            match &text[pos..=pos] {
                "{" => {
                    let child =
                        Self::open_section(cfg, current, head, tail, &comment, &mut self.pending)
                            .map_err(|e| e.at_line(line))?;
                    enclosing.push(current);
                    current = child;
                }
                "}" => {
                    if !trim(head).is_empty() {
                        return Err(Error::Syntax(format!(
                            "unexpected '{}' before '}}'",
                            trim(head)
                        ))
                        .at_line(line));
                    }
                    let Some(parent) = enclosing.pop() else {
                        return Err(Error::Syntax("unmatched '}'".to_string()).at_line(line));
                    };
                    current = parent;
                }
                _ => {
                    Self::assign(cfg, current, head, tail, &comment)
                        .map_err(|e| e.at_line(line))?;
                }
            }
            comment.clear();
        }
        Ok(())
    }

    fn open_section(
        cfg: &mut Cfg,
        scope: SectionId,
        head: &str,
        tail: &str,
        comment: &[String],
        pending: &mut Vec<(SectionId, String)>,
    ) -> Result<SectionId> {
        let name = checked_name(head)?;
        let child = cfg.add_section(scope, name, comment.join("\n"))?;
        let tail = trim(tail);
        if !tail.is_empty() {
            let Some(target) = tail.strip_prefix('<') else {
                return Err(Error::Syntax(format!(
                    "expected inheriting section defined with '< section_name' but '{tail}' found"
                )));
            };
            pending.push((child, trim(target).to_string()));
        }
        Ok(child)
    }

    fn assign(
        cfg: &mut Cfg,
        scope: SectionId,
        head: &str,
        value: &str,
        comment: &[String],
    ) -> Result<()> {
        let value = trim(value).to_string();
        if let Some(name) = trim(head).strip_suffix('+') {
            let name = checked_name(name)?;
            return cfg.append_value(scope, name, value);
        }
        let name = checked_name(head)?;
        if cfg.node(scope).defines(name) {
            return Err(Error::AlreadyExists {
                name: name.to_string(),
                parent: cfg.path_of(scope),
            });
        }
        cfg.put_option(scope, name, vec![value], comment.join("\n"))
    }
}

fn checked_name(token: &str) -> Result<&str> {
    let name = trim(token);
    if name.is_empty() {
        return Err(Error::MissingName);
    }
    if name.contains(SEPARATOR) {
        return Err(Error::Syntax(format!(
            "invalid name '{name}': names cannot contain '{SEPARATOR}'"
        )));
    }
    Ok(name)
}

impl Cfg {
    /// Builds a tree from a stream.
    ///
    /// # Errors
    ///
    /// Returns the first read, syntax, structural, or inheritance error.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut cfg = Self::new();
        cfg.load_from_reader(reader)?;
        Ok(cfg)
    }

    /// Adds the contents of a stream to the root section.
    ///
    /// Names already present in the tree may not be redefined. All
    /// inheritance links are rebuilt from the stream's declarations.
    ///
    /// # Errors
    ///
    /// Returns the first read, syntax, structural, or inheritance error. The
    /// tree must be discarded after a failed load.
    pub fn load_from_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        self.load_into(SectionId::ROOT, reader)
    }

    pub(crate) fn load_into<R: Read>(&mut self, scope: SectionId, reader: R) -> Result<()> {
        tracing::debug!("Loading configuration into {}", self.path_of(scope));
        let mut loader = Loader::new(BufReader::new(reader));
        loader.parse(self, scope)?;

        self.reset_inheritance(scope);
        for (section, target) in &loader.pending {
            self.set_inheritance_at(*section, target)?;
        }
        tracing::debug!(
            "Loaded {} lines: {} sections, {} inheritance declarations",
            loader.line,
            self.len() - 1,
            loader.pending.len()
        );
        Ok(())
    }
}

impl FromStr for Cfg {
    type Err = Error;

    fn from_str(data: &str) -> Result<Self> {
        Self::from_reader(data.as_bytes())
    }
}

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests;
