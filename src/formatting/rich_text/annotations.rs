// src/formatting/rich_text/annotations.rs
//! Annotation styling for text runs.

use crate::types::{Annotations, Color};

/// Renderer for run annotations to Markdown (with inline HTML where
/// Markdown has no syntax).
pub struct MarkdownStyleRenderer;

impl MarkdownStyleRenderer {
    /// Wraps `content` in every set annotation, innermost first:
    /// bold, italic, strikethrough, underline, code. A non-default color
    /// wraps the whole result last.
    pub fn apply_styles(content: &str, annotations: &Annotations) -> String {
        let mut result = content.to_string();

        if annotations.bold {
            result = format!("**{}**", result);
        }

        if annotations.italic {
            result = format!("*{}*", result);
        }

        if annotations.strikethrough {
            result = format!("~~{}~~", result);
        }

        // Underline requires HTML
        if annotations.underline {
            result = format!("<u>{}</u>", result);
        }

        if annotations.code {
            result = format!("`{}`", result);
        }

        Self::apply_color(result, annotations.color)
    }

    fn apply_color(content: String, color: Color) -> String {
        if color.is_default() {
            content
        } else {
            format!("<span style='color:{}'>{}</span>", color.as_str(), content)
        }
    }
}
