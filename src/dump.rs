//! Writing a tree back out in the text format.
//!
//! With the default [`Config`] the output is canonical: one tab per nesting
//! level, `=` for an option's first value and `+=` for each further one,
//! `name {< target` for an inheriting section, and every comment line
//! prefixed with `#`. Loading canonical text and dumping it gives back the
//! same bytes.

use crate::config::Config;
use crate::error::Result;
use crate::tree::Cfg;
use crate::view::Section;
use std::fmt;
use std::io::Write;

struct Dumper<'c, W> {
    out: W,
    config: &'c Config,
}

impl<W: Write> Dumper<'_, W> {
    fn comment(&mut self, comment: &str, indent: &str) -> Result<()> {
        if comment.is_empty() {
            return Ok(());
        }
        for line in comment.split('\n') {
            writeln!(self.out, "{indent}{}{line}", self.config.comment_prefix)?;
        }
        Ok(())
    }

    /// Writes the contents of `top`, walking nested sections with an explicit stack.
    fn section(&mut self, top: Section<'_>) -> Result<()> {
        // Each entry is an open section and the position of its next name in `order`.
        let mut open = vec![(top, 0)];
        while let Some((section, position)) = open.pop() {
            let depth = open.len();
            let node = section.node();
            let Some(name) = node.order.get(position) else {
                if depth > 0 {
                    writeln!(self.out, "{}}}", self.config.indent.repeat(depth - 1))?;
                }
                continue;
            };
            open.push((section, position + 1));

            let indent = self.config.indent.repeat(depth);
            if let Some(&id) = node.sections.get(name) {
                let child = section.at(id);
                self.comment(child.comment(), &indent)?;
                match child.inheritance() {
                    Some(target) => writeln!(self.out, "{indent}{name} {{< {}", target.path())?,
                    None => writeln!(self.out, "{indent}{name} {{")?,
                }
                open.push((child, 0));
            } else if let Some(entry) = node.options.get(name) {
                self.comment(&entry.comment, &indent)?;
                for (n, value) in entry.values.iter().enumerate() {
                    let op = if n == 0 { "=" } else { "+=" };
                    writeln!(self.out, "{indent}{name} {op} {value}")?;
                }
            }
        }
        Ok(())
    }
}

impl Section<'_> {
    /// Writes the contents of this section in canonical form.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn dump_to_writer<W: Write>(&self, out: W) -> Result<()> {
        self.dump_with(out, &Config::default())
    }

    /// Writes the contents of this section with the given formatting.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or writing fails.
    pub fn dump_with<W: Write>(&self, out: W, config: &Config) -> Result<()> {
        config.validate()?;
        Dumper { out, config }.section(*self)
    }
}

impl Cfg {
    /// Writes the whole tree in canonical form.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn dump_to_writer<W: Write>(&self, out: W) -> Result<()> {
        self.root().dump_to_writer(out)
    }

    /// Writes the whole tree with the given formatting.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or writing fails.
    pub fn dump_with<W: Write>(&self, out: W, config: &Config) -> Result<()> {
        self.root().dump_with(out, config)
    }
}

fn render(section: Section<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut buffer = Vec::new();
    section.dump_to_writer(&mut buffer).map_err(|_| fmt::Error)?;
    f.write_str(&String::from_utf8_lossy(&buffer))
}

impl fmt::Display for Section<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(*self, f)
    }
}

impl fmt::Display for Cfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.root(), f)
    }
}

#[cfg(test)]
#[path = "tests/dump.rs"]
mod tests;
