//! Text rasterization via SVG (usvg/resvg) with system fonts.

use kurbo::Point;
use photomark_core::strokes::Text;
use tiny_skia::{Pixmap, Transform};

/// Approximate ascent as a fraction of the font size, used to place the
/// first baseline so the label reads as top-aligned at its anchor.
const ASCENT_FACTOR: f64 = 0.8;

/// Rasterizes text labels into pixmaps.
///
/// Glyph shaping and rasterization go through usvg/resvg with the system
/// font list, which is loaded once per renderer. On hosts without any usable
/// font the label's backing rectangle still renders; only the glyphs are
/// skipped (and the miss logged).
pub(crate) struct TextRasterizer {
    options: usvg::Options<'static>,
}

impl TextRasterizer {
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if db.faces().next().is_none() {
            log::warn!("no system fonts available, text labels will render without glyphs");
        }

        let mut options = usvg::Options::default();
        options.fontdb = std::sync::Arc::new(db);
        Self { options }
    }

    /// Draw a text label with its top-left corner at `origin` (surface
    /// pixels), scaled by `scale`.
    pub fn draw(&self, pixmap: &mut Pixmap, text: &Text, origin: Point, scale: f64) {
        if text.content.trim().is_empty() {
            return;
        }

        let svg = self.label_svg(text, scale);
        let tree = match usvg::Tree::from_data(svg.as_bytes(), &self.options) {
            Ok(tree) => tree,
            Err(err) => {
                log::warn!("text label layout failed: {err}");
                return;
            }
        };

        let transform = Transform::from_translate(origin.x as f32, origin.y as f32);
        resvg::render(&tree, transform, &mut pixmap.as_mut());
    }

    /// Build a minimal SVG document holding the label's lines.
    fn label_svg(&self, text: &Text, scale: f64) -> String {
        use std::fmt::Write as _;

        let font_size = text.font_size * scale;
        let line_height = text.line_height() * scale;
        let layout = text.layout_size();

        // A canvas generously larger than the estimated layout, so glyphs
        // are never clipped by the SVG viewport; the surplus is transparent.
        let width = (layout.width * scale * 2.0 + font_size).ceil().max(1.0);
        let height = (layout.height * scale + font_size).ceil().max(1.0);

        let color = text.style.color;
        let fill = format!("rgb({},{},{})", color.r, color.g, color.b);
        let opacity = color.a as f64 / 255.0;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">",
        );
        for (i, line) in text.content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline = i as f64 * line_height + font_size * ASCENT_FACTOR;
            let _ = writeln!(
                svg,
                "  <text x=\"0\" y=\"{baseline:.2}\" font-family=\"sans-serif\" \
                 font-size=\"{font_size:.2}\" fill=\"{fill}\" fill-opacity=\"{opacity:.3}\">{}</text>",
                escape_xml(line),
            );
        }
        svg.push_str("</svg>\n");
        svg
    }
}

fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use photomark_core::strokes::StrokeStyle;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b&c>\"d'"), "a&lt;b&amp;c&gt;&quot;d&apos;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_label_svg_one_text_element_per_line() {
        let rasterizer = TextRasterizer::new();
        let text = Text::new(
            Point::new(0.0, 0.0),
            "first\nsecond".to_string(),
            StrokeStyle::default(),
        );

        let svg = rasterizer.label_svg(&text, 1.0);
        assert_eq!(svg.matches("<text").count(), 2);
        assert!(svg.contains("font-family=\"sans-serif\""));
    }

    #[test]
    fn test_label_svg_parses() {
        let rasterizer = TextRasterizer::new();
        let text = Text::new(
            Point::new(0.0, 0.0),
            "Cracked <tile> & grout".to_string(),
            StrokeStyle::default(),
        );

        let svg = rasterizer.label_svg(&text, 2.5);
        assert!(usvg::Tree::from_data(svg.as_bytes(), &rasterizer.options).is_ok());
    }

    #[test]
    fn test_draw_empty_content_is_noop() {
        let rasterizer = TextRasterizer::new();
        let mut pixmap = Pixmap::new(10, 10).unwrap();
        let text = Text::new(Point::new(0.0, 0.0), "  ".to_string(), StrokeStyle::default());

        rasterizer.draw(&mut pixmap, &text, Point::new(0.0, 0.0), 1.0);
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }
}
