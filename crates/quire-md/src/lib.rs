//! Obsidian-flavoured markdown rewriting for quire.
//!
//! Notes go through a fixed pipeline of pattern-based rewrites (tags,
//! frontmatter, wiki links, code fences, tables, callouts) and are then
//! converted to HTML with admonition support.

pub mod callout;
pub mod codeblock;
pub mod frontmatter;
pub mod html;
pub mod links;
pub mod pipeline;
pub mod table;
pub mod tags;

pub use frontmatter::Frontmatter;
pub use html::{escape_html, to_html};
pub use pipeline::{transform, Transformed};
