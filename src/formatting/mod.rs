// src/formatting/mod.rs
//! Renders block trees into Markdown.

pub mod dispatcher;
pub mod fields;
pub mod registry;
pub mod rich_text;
mod walker;

pub use fields::FieldRecord;
pub use registry::Rendered;
pub use rich_text::RichTextRenderer;
pub use walker::{Converter, ConverterOptions, OverrunScope};
