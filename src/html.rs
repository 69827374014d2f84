use crate::block::{Block, Segment};
use crate::config::HtmlConfig;

/// Convert blocks to an HTML fragment
pub fn blocks_to_html(blocks: &[Block], config: &HtmlConfig) -> String {
    let mut out = String::new();

    for block in blocks {
        emit_block(block, config, &mut out);
    }

    out
}

fn emit_block(block: &Block, config: &HtmlConfig, out: &mut String) {
    match block {
        Block::Heading2 { text } => {
            open_tag("h2", &config.heading2, out);
            escape_into(text, out);
            out.push_str("</h2>\n");
        }
        Block::Heading3 { text } => {
            open_tag("h3", &config.heading3, out);
            escape_into(text, out);
            out.push_str("</h3>\n");
        }
        Block::Paragraph { segments } => {
            open_tag("p", &config.paragraph, out);
            segments_to_html(segments, config, out);
            out.push_str("</p>\n");
        }
        Block::List { items } => {
            open_tag("ul", &config.list, out);
            out.push('\n');
            for item in items {
                open_tag("li", &config.item, out);
                segments_to_html(item, config, out);
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }
        Block::Spacer => {
            open_tag("div", &config.spacer, out);
            out.push_str("</div>\n");
        }
    }
}

fn segments_to_html(segments: &[Segment], config: &HtmlConfig, out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Plain(text) => escape_into(text, out),
            Segment::Bold(text) => {
                open_tag("strong", &config.bold, out);
                escape_into(text, out);
                out.push_str("</strong>");
            }
        }
    }
}

fn open_tag(tag: &str, class: &str, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    if !class.is_empty() {
        out.push_str(" class=\"");
        escape_into(class, out);
        out.push('"');
    }
    out.push('>');
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
