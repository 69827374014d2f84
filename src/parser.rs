use crate::block::{Block, ListItem, Segment};

const HEADING2_PREFIX: &str = "## ";
const LIST_PREFIX: &str = "* ";
const BOLD_MARKER: &str = "**";

/// Parse a chat message into a list of blocks
pub fn parse(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut state = ParseState::default();

    for line in text.split('\n') {
        process_line(trim_line(line), &mut state, &mut blocks);
    }
    state.close_list(&mut blocks);

    blocks
}

/// Strip surrounding whitespace, including the `\r` of CRLF endings and a
/// byte order mark.
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

#[derive(Default)]
struct ParseState {
    // Items of the list currently being built, if one is open
    list: Option<Vec<ListItem>>,
}

impl ParseState {
    fn close_list(&mut self, blocks: &mut Vec<Block>) {
        if let Some(items) = self.list.take() {
            blocks.push(Block::List { items });
        }
    }
}

fn process_line(line: &str, state: &mut ParseState, blocks: &mut Vec<Block>) {
    if let Some(rest) = line.strip_prefix(HEADING2_PREFIX) {
        state.close_list(blocks);
        blocks.push(Block::Heading2 {
            text: rest.to_string(),
        });
    } else if is_heading3(line) {
        state.close_list(blocks);
        let stripped = line.replace(BOLD_MARKER, "");
        let text = stripped.strip_suffix(':').unwrap_or(&stripped);
        blocks.push(Block::Heading3 {
            text: text.to_string(),
        });
    } else if line.contains(BOLD_MARKER) {
        // Takes precedence over list items, so "* **a** b" is a paragraph
        state.close_list(blocks);
        blocks.push(Block::Paragraph {
            segments: split_bold(line),
        });
    } else if let Some(rest) = line.strip_prefix(LIST_PREFIX) {
        state
            .list
            .get_or_insert_with(Vec::new)
            .push(vec![Segment::Plain(rest.to_string())]);
    } else if !line.is_empty() {
        state.close_list(blocks);
        blocks.push(Block::Paragraph {
            segments: vec![Segment::Plain(line.to_string())],
        });
    } else {
        state.close_list(blocks);
        // Leading blank lines produce nothing
        if !blocks.is_empty() {
            blocks.push(Block::Spacer);
        }
    }
}

/// A whole line of the form `**Title:**`.
fn is_heading3(line: &str) -> bool {
    line.starts_with(BOLD_MARKER) && line.ends_with(":**")
}

/// Split a line into plain and bold runs.
///
/// A bold run opens at `**` and closes at the next `**`. An opening marker
/// without a partner stays in the trailing plain text as written.
fn split_bold(line: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find(BOLD_MARKER) {
        let inner = &rest[open + BOLD_MARKER.len()..];
        let Some(close) = inner.find(BOLD_MARKER) else {
            break;
        };
        push_plain(&mut segments, &rest[..open]);
        segments.push(Segment::Bold(inner[..close].to_string()));
        rest = &inner[close + BOLD_MARKER.len()..];
    }
    push_plain(&mut segments, rest);

    segments
}

fn push_plain(segments: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        segments.push(Segment::Plain(text.to_string()));
    }
}
