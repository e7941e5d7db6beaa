//! SVG output.
//!
//! Shapes are serialised as they arrive and wrapped in the document
//! element on save, so memory stays proportional to the output size.

use std::path::{Path, PathBuf};

use crate::{CanvasError, DrawingSurface, Point, Rgb, Stroke};

pub struct SvgSurface {
    path: PathBuf,
    width: f64,
    height: f64,
    body: String,
}

impl SvgSurface {
    pub fn new(path: impl Into<PathBuf>, width: f64, height: f64) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            body: String::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The complete document as it would be saved.
    pub fn render(&self) -> String {
        let mut svg = format!(
            r#"<?xml version="1.0" encoding="utf-8" ?>
<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{}px" height="{}px" font-family="monospace" font-size="10">
  <rect width="100%" height="100%" fill="white"/>
"#,
            self.width, self.height
        );
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

impl DrawingSurface for SvgSurface {
    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Rgb) {
        self.body.push_str(&format!(
            "  <rect x=\"{x:.3}\" y=\"{y:.3}\" width=\"{width:.3}\" height=\"{height:.3}\" fill=\"{fill}\"/>\n"
        ));
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let dash = stroke
            .dash
            .as_deref()
            .map(|d| format!(" stroke-dasharray=\"{d}\""))
            .unwrap_or_default();
        self.body.push_str(&format!(
            "  <line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\" stroke=\"{}\" stroke-width=\"{}\"{}/>\n",
            from.x, from.y, to.x, to.y, stroke.colour, stroke.width, dash
        ));
    }

    fn text(&mut self, content: &str, at: Point) {
        self.body.push_str(&format!(
            "  <text x=\"{:.3}\" y=\"{:.3}\">{}</text>\n",
            at.x,
            at.y,
            escape(content)
        ));
    }

    fn save(&mut self) -> Result<(), CanvasError> {
        std::fs::write(&self.path, self.render()).map_err(|source| CanvasError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), bytes = self.body.len(), "Image written");
        Ok(())
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(escape("a<b & 'c'"), "a&lt;b &amp; &apos;c&apos;");
    }
}
