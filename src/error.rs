//! Errors raised while loading, editing, or dumping a configuration tree.
//!
//! Every failure is terminal for the operation that raised it. Lookups that
//! simply miss are not errors: they come back as `None` or `false`.

use std::io;
use thiserror::Error;

/// Failure of a tree operation.
#[derive(Debug, Error)]
pub enum Error {
    /// A line could not be understood by the parser.
    #[error("{0}")]
    Syntax(String),

    /// An option or section path had no name segment.
    #[error("no name given")]
    MissingName,

    /// The section that should contain the target does not exist.
    #[error("parent section `{0}` does not exist")]
    MissingParent(String),

    /// A section or option of that name is already defined in the section.
    #[error("`{name}` already exists in `{parent}`")]
    AlreadyExists {
        /// Name that was defined twice.
        name: String,
        /// Path of the section holding the existing definition.
        parent: String,
    },

    /// A name that would not read back as the same name once dumped.
    #[error("`{0}` cannot be used as a name: it holds a delimiter or edge whitespace")]
    InvalidName(String),

    /// A value that would not read back as the same value once dumped.
    #[error("value {value:?} of `{name}` holds '#', a line break, or edge whitespace")]
    InvalidValue {
        /// Option the value was assigned to.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// `+=` was used on an option that the section does not define itself.
    #[error("option `{0}` was not previously defined")]
    NotDefined(String),

    /// An option was assigned an empty value list.
    #[error("option `{0}` needs at least one value")]
    NoValues(String),

    /// The root section was asked to inherit.
    #[error("root section cannot inherit from anyone")]
    RootInheritance,

    /// The inheritance target path does not name a section.
    #[error("inheritance target `{target}` for `{section}` does not exist")]
    MissingInheritanceTarget {
        /// Path that failed to resolve.
        target: String,
        /// Path of the inheriting section.
        section: String,
    },

    /// A section named itself as inheritance target.
    #[error("section `{0}` cannot inherit from itself")]
    SelfInheritance(String),

    /// A section would inherit from one of its own enclosing sections.
    #[error(
        "`{ancestor}` is a parent of `{section}`: inheriting from it would create a parent/child inheritance loop"
    )]
    ParentInheritance {
        /// Path of the enclosing section found on the inheritance chain.
        ancestor: String,
        /// Path of the inheriting section.
        section: String,
    },

    /// The inheritance chain of the target leads back to the section.
    #[error("circular inheritance loop found: {0}")]
    InheritanceCycle(String),

    /// A copied section links to a section outside the copy.
    #[error("`{section}` inherits from `{target}`, which lies outside the copied section")]
    ExternalInheritance {
        /// Path of the inheriting section.
        section: String,
        /// Path of its inheritance target.
        target: String,
    },

    /// A merge source keeps exposing itself through inheritance.
    #[error("merging `{0}` would recurse forever through inheritance")]
    RecursiveMerge(String),

    /// Dump preferences could not be read or would produce unparsable output.
    #[error("invalid dump configuration: {0}")]
    Config(String),

    /// Reading from or writing to the underlying stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// An error raised while parsing, tagged with its 1-based line number.
    #[error("{source} (line {line})")]
    AtLine {
        /// Physical line on which the error occurred.
        line: usize,
        /// The error itself.
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }

    #[must_use]
    /// Line number the error was raised on, when it came from the parser.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    #[must_use]
    /// The underlying error with any line tag removed.
    pub fn root(&self) -> &Self {
        match self {
            Self::AtLine { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
