//! Static-mode editor value.

/// Receiver of generated markup; the static editor's value setter.
pub trait ContentSink {
    fn set_value(&mut self, markup: String);
}

/// The single rich-text value edited in static mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StaticEditor {
    value: String,
}

impl StaticEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Mirror an edit reported by the widget.
    pub fn on_change(&mut self, content: impl Into<String>) {
        self.value = content.into();
    }
}

impl ContentSink for StaticEditor {
    fn set_value(&mut self, markup: String) {
        self.value = markup;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_markup_replaces_value() {
        let mut editor = StaticEditor::new();
        editor.on_change("<p>draft</p>");
        editor.set_value("<div>generated</div>".to_string());
        assert_eq!(editor.value(), "<div>generated</div>");
    }
}
