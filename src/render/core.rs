use std::io::Write;

use crate::error::Result;
use crate::geometry::PixelRect;
use crate::registry::Section;

/// An editable region presenter.
///
/// `render` is called for every section that needs repainting with its stored
/// content; `finish` once per pass.
pub trait RichTextWidget {
    fn render(&mut self, section: &Section, placement: PixelRect) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Renderer parameters.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Prefix of the placeholder shown in empty sections, followed by the
    /// section name.
    pub placeholder_prefix: String,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            placeholder_prefix: "Enter content for".to_string(),
        }
    }
}

/// Writes each section as an absolutely placed `<section>` element.
pub struct MarkupRenderer<W: Write> {
    writer: W,
    settings: RendererSettings,
}

impl<W: Write> MarkupRenderer<W> {
    pub fn new(writer: W, settings: RendererSettings) -> Self {
        Self { writer, settings }
    }

    pub fn with_default(writer: W) -> Self {
        Self::new(writer, RendererSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RichTextWidget for MarkupRenderer<W> {
    fn render(&mut self, section: &Section, placement: PixelRect) -> Result<()> {
        let PixelRect {
            left,
            top,
            width,
            height,
        } = placement;

        writeln!(
            self.writer,
            "<section data-id=\"{id}\" data-grid=\"{x},{y},{w},{h}\" \
             style=\"left:{left}px;top:{top}px;width:{width}px;height:{height}px\" \
             data-placeholder=\"{prefix} {name}...\">{content}</section>",
            id = section.id,
            x = section.x,
            y = section.y,
            w = section.w,
            h = section.h,
            prefix = escape_attr(&self.settings.placeholder_prefix),
            name = escape_attr(&section.name),
            content = section.content,
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SectionStore;

    #[test]
    fn escape_attr_handles_markup() {
        assert_eq!(escape_attr("a \"b\" <c> & d"), "a &quot;b&quot; &lt;c&gt; &amp; d");
    }

    #[test]
    fn renderer_writes_positioned_sections() {
        let mut store = SectionStore::default();
        let id = store.add("Intro \"one\"").unwrap();
        store.update_content(id, "<p>hi</p>".to_string());
        let section = store.get(id).unwrap().clone();

        let mut renderer = MarkupRenderer::with_default(Vec::new());
        renderer
            .render(
                &section,
                PixelRect {
                    left: 5,
                    top: 5,
                    width: 294,
                    height: 195,
                },
            )
            .unwrap();
        renderer.finish().unwrap();

        let html = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(html.starts_with("<section data-id=\"section-1\" data-grid=\"0,0,6,8\""));
        assert!(html.contains("left:5px;top:5px;width:294px;height:195px"));
        assert!(html.contains("Enter content for Intro &quot;one&quot;..."));
        assert!(html.trim_end().ends_with("<p>hi</p></section>"));
    }
}
