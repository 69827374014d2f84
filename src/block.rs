/// Inline text runs within a paragraph or list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    /// Bold text with its `**` markers removed
    Bold(String),
}

/// A single list item
pub type ListItem = Vec<Segment>;

/// Block-level elements parsed from a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading2 { text: String },
    Heading3 { text: String },
    Paragraph { segments: Vec<Segment> },
    List { items: Vec<ListItem> },
    /// Vertical space from a blank line
    Spacer,
}
