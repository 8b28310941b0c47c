use std::fmt;

/// Block heading level used by `formatBlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    H1,
    H2,
    H3,
}

impl Heading {
    pub fn tag(self) -> &'static str {
        match self {
            Heading::H1 => "h1",
            Heading::H2 => "h2",
            Heading::H3 => "h3",
        }
    }
}

/// Toolbar formatting command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    InsertOrderedList,
    InsertUnorderedList,
    FormatBlock(Heading),
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    /// Any other command understood by the host facility.
    Custom { name: String, value: Option<String> },
}

impl FormatCommand {
    /// Command name as understood by the host facility.
    pub fn name(&self) -> &str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::InsertOrderedList => "insertOrderedList",
            FormatCommand::InsertUnorderedList => "insertUnorderedList",
            FormatCommand::FormatBlock(_) => "formatBlock",
            FormatCommand::JustifyLeft => "justifyLeft",
            FormatCommand::JustifyCenter => "justifyCenter",
            FormatCommand::JustifyRight => "justifyRight",
            FormatCommand::Custom { name, .. } => name,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            FormatCommand::FormatBlock(heading) => Some(heading.tag()),
            FormatCommand::Custom { value, .. } => value.as_deref(),
            _ => None,
        }
    }

    /// Build a command from its host name and optional value.
    pub fn parse(name: &str, value: Option<&str>) -> Self {
        let heading = match value {
            Some("h1") => Some(Heading::H1),
            Some("h2") => Some(Heading::H2),
            Some("h3") => Some(Heading::H3),
            _ => None,
        };
        match (name, heading) {
            ("bold", _) => FormatCommand::Bold,
            ("italic", _) => FormatCommand::Italic,
            ("underline", _) => FormatCommand::Underline,
            ("insertOrderedList", _) => FormatCommand::InsertOrderedList,
            ("insertUnorderedList", _) => FormatCommand::InsertUnorderedList,
            ("formatBlock", Some(heading)) => FormatCommand::FormatBlock(heading),
            ("justifyLeft", _) => FormatCommand::JustifyLeft,
            ("justifyCenter", _) => FormatCommand::JustifyCenter,
            ("justifyRight", _) => FormatCommand::JustifyRight,
            _ => FormatCommand::Custom {
                name: name.to_string(),
                value: value.map(str::to_string),
            },
        }
    }
}

impl fmt::Display for FormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(value) => write!(f, "{}({})", self.name(), value),
            None => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_commands_carry_tag() {
        let cmd = FormatCommand::FormatBlock(Heading::H2);
        assert_eq!(cmd.name(), "formatBlock");
        assert_eq!(cmd.value(), Some("h2"));
        assert_eq!(cmd.to_string(), "formatBlock(h2)");
    }

    #[test]
    fn parse_known_and_custom() {
        assert_eq!(FormatCommand::parse("bold", None), FormatCommand::Bold);
        assert_eq!(
            FormatCommand::parse("formatBlock", Some("h3")),
            FormatCommand::FormatBlock(Heading::H3)
        );
        let custom = FormatCommand::parse("formatBlock", Some("pre"));
        assert_eq!(custom.name(), "formatBlock");
        assert_eq!(custom.value(), Some("pre"));
        assert!(matches!(custom, FormatCommand::Custom { .. }));
    }
}
