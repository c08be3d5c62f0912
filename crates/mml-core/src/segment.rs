use crate::chain::{Chain, Node, NodeId, NodeKind};
use crate::emit::escape_attr;

pub const SECTION_BREAK: &str = "\n\n\n";

/// The node range of one paragraph plus the per-paragraph pass state.
#[derive(Clone, Debug)]
pub struct Paragraph {
    /// The `Paragraph` node; its source holds the separator before the text.
    pub head: NodeId,
    pub close: NodeId,
    pub lines: Vec<NodeId>,
    /// Source offset where `head`'s source begins.
    pub start: usize,
    /// 0-based source line of the first line.
    pub first_line: usize,
    pub formatted: bool,
}

pub struct Segmented {
    pub chain: Chain,
    pub paragraphs: Vec<Paragraph>,
    pub sections: usize,
}

pub fn segment(source: &str, section_class: &str) -> Segmented {
    let mut chain = Chain::new();
    let mut paragraphs = Vec::new();
    let mut sections = 0;
    let mut offset = 0;
    let mut line = 0;
    let class = escape_attr(section_class);

    for (idx, text) in source.split(SECTION_BREAK).enumerate() {
        sections += 1;
        let (separator, rendered) = if idx == 0 {
            ("", format!("<div class=\"{}\">", class))
        } else {
            (SECTION_BREAK, format!("</div>\n<div class=\"{}\">", class))
        };
        offset += separator.len();
        line += count_lines(separator);

        if is_empty_section(text) {
            chain.push(Node::new(NodeKind::Section, separator, rendered, text));
            offset += text.len();
            line += count_lines(text);
            continue;
        }

        let leading = text.bytes().take_while(|&b| b == b'\n').count();
        let mut section_source = separator.to_string();
        section_source.push_str(&text[..leading]);
        chain.push(Node::new(NodeKind::Section, section_source, rendered, ""));
        offset += leading;
        line += leading;

        for (para_idx, (break_text, body)) in split_paragraphs(&text[leading..])
            .into_iter()
            .enumerate()
        {
            let start = offset;
            let rendered = if para_idx == 0 { "" } else { "\n" };
            let head = chain.push(Node::new(NodeKind::Paragraph, break_text, rendered, ""));
            offset += break_text.len();
            line += count_lines(break_text);

            let first_line = line;
            let mut lines = Vec::new();
            for (line_idx, text) in body.split('\n').enumerate() {
                let line_break = if line_idx == 0 { "" } else { "\n" };
                lines.push(chain.push(Node::new(NodeKind::Line, line_break, line_break, text)));
            }
            let close = chain.push(Node::new(NodeKind::Close, "", "", ""));
            offset += body.len();
            line += count_lines(body);

            paragraphs.push(Paragraph {
                head,
                close,
                lines,
                start,
                first_line,
                formatted: false,
            });
        }
    }
    chain.push(Node::new(NodeKind::End, "", "</div>", ""));

    Segmented {
        chain,
        paragraphs,
        sections,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum BreakState {
    Outside,
    Inside,
}

/// Splits a section body into `(separator, paragraph)` pairs. A separator is
/// a newline, optional spaces/tabs, and a second newline; its exact bytes are
/// kept so the source can be rebuilt. The first separator is always empty.
pub(crate) fn split_paragraphs(text: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let mut state = BreakState::Outside;
    let mut break_start = 0;
    let mut last = 0;
    let mut separator = "";

    for (idx, byte) in text.bytes().enumerate() {
        match state {
            BreakState::Outside => {
                if byte == b'\n' {
                    state = BreakState::Inside;
                    break_start = idx;
                }
            }
            BreakState::Inside => match byte {
                b'\n' => {
                    out.push((separator, &text[last..break_start]));
                    separator = &text[break_start..=idx];
                    last = idx + 1;
                    state = BreakState::Outside;
                }
                b' ' | b'\t' => {}
                _ => state = BreakState::Outside,
            },
        }
    }
    out.push((separator, &text[last..]));
    out
}

pub(crate) fn is_empty_section(text: &str) -> bool {
    text.bytes().all(|b| b == b' ' || b == b'\t' || b == b'\n')
}

pub(crate) fn count_lines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}
