//! seokit parser library
//!
//! Reads Markdown content files and derives content records from them.

pub mod markdown;

pub use markdown::{FileTimes, MarkdownError, MarkdownParser, ParserConfig, Result};
