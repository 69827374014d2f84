use unicode_width::UnicodeWidthStr;

use crate::block::{Block, Segment};
use crate::config::TextConfig;

/// Convert blocks to plain text for a terminal.
///
/// Headings are underlined to their display width, list items get the
/// configured bullet and spacers become blank lines.
pub fn blocks_to_text(blocks: &[Block], config: &TextConfig) -> String {
    let mut out = String::new();

    for block in blocks {
        match block {
            Block::Heading2 { text } => underline(text, '=', &mut out),
            Block::Heading3 { text } => underline(text, '-', &mut out),
            Block::Paragraph { segments } => {
                segments_to_text(segments, config, &mut out);
                out.push('\n');
            }
            Block::List { items } => {
                for item in items {
                    out.push_str(&config.bullet);
                    segments_to_text(item, config, &mut out);
                    out.push('\n');
                }
            }
            Block::Spacer => out.push('\n'),
        }
    }

    out
}

fn underline(text: &str, rule: char, out: &mut String) {
    out.push_str(text);
    out.push('\n');
    out.extend(std::iter::repeat_n(rule, text.width()));
    out.push('\n');
}

fn segments_to_text(segments: &[Segment], config: &TextConfig, out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Plain(text) => out.push_str(text),
            Segment::Bold(text) => {
                out.push_str(&config.bold_marker);
                out.push_str(text);
                out.push_str(&config.bold_marker);
            }
        }
    }
}
