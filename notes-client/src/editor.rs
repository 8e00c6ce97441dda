/// Seam to the rich-text widget. The state layer only ever needs the
/// current markup, its plain-text extraction, and a way to load content;
/// rendering and editing belong to the widget.
pub trait EditorSurface {
    /// Current rich-text markup.
    fn value(&self) -> String;
    /// Current content with markup stripped.
    fn plain_text(&self) -> String;
    /// Replace the editor content.
    fn set_value(&mut self, content: &str);
}

/// In-memory stand-in for the widget, used headless and in tests.
#[derive(Debug, Default, Clone)]
pub struct TextBuffer {
    content: String,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

impl EditorSurface for TextBuffer {
    fn value(&self) -> String {
        self.content.clone()
    }

    fn plain_text(&self) -> String {
        let mut text = String::with_capacity(self.content.len());
        let mut in_tag = false;
        for c in self.content.chars() {
            match c {
                '<' => in_tag = true,
                '>' => {
                    in_tag = false;
                    text.push(' ');
                }
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn set_value(&mut self, content: &str) {
        self.content = content.to_string();
    }
}
