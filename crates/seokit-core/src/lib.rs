//! seokit core library
//!
//! Content records, the language table, frontmatter reading, text helpers,
//! configuration, and error handling shared by the seokit crates.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod language;
pub mod text;

pub use config::Config;
pub use content::{AlternateLanguage, Author, ContentRecord, ContentType, ImageRef, Pricing, Status};
pub use error::{CoreError, Result};
pub use frontmatter::{Frontmatter, FrontmatterValue};
pub use language::{Language, LanguageMapper};
