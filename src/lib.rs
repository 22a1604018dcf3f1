//! cfgtree: hierarchical configuration files with section inheritance.
//!
//! A file is a tree of brace-delimited sections holding multi-valued
//! options. A section may declare `< other/section` to fall back on another
//! section's options and subsections whenever it does not define them itself.
//!
//! ```
//! use cfgtree::Cfg;
//!
//! let cfg: Cfg = "base {\n\tport = 80\n}\nsite {< base\n\thost = example.org\n}\n"
//!     .parse()
//!     .unwrap();
//! assert_eq!(cfg.get_option("site/port").as_deref(), Some("80"));
//! assert_eq!(cfg.to_string().lines().count(), 6);
//! ```

pub mod config;
mod dump;
pub mod error;
pub mod list;
mod parser;
pub mod path;
mod section;
pub mod tree;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use list::Names;
pub use path::split_path;
pub use tree::Cfg;
pub use view::{Section, SectionMut};
