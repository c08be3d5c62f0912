use super::PassContext;
use crate::chain::{NodeId, NodeKind};
use crate::diagnostic::{Diagnostic, DiagnosticSeverity, W_CFMT_UNCLOSED};
use crate::dialect::TagFormat;
use crate::emit::{SOFT_HYPHEN_OPEN, SPAN_CLOSE, format_open};
use crate::segment::Paragraph;
use crate::span::Span;

pub(crate) fn apply(cx: &mut PassContext<'_>, para: &Paragraph, tags: &[TagFormat]) {
    let soft_hyphens = cx.dialect.softhyphens;
    let mut stack: Vec<(usize, NodeId)> = Vec::new();

    for (k, &line) in para.lines.iter().enumerate() {
        let next_line = para.lines.get(k + 1).copied();
        let mut cursor = Some(line);
        let mut pos = 0;

        while let Some(id) = cursor {
            if id != line && cx.chain[id].kind != NodeKind::Inline {
                break;
            }
            let rest = &cx.chain[id].literal[pos..];
            if rest.is_empty() {
                cursor = cx.chain.next(id);
                pos = 0;
                continue;
            }

            if let Some(index) = tags.iter().position(|tag| rest.starts_with(tag.tag.as_str())) {
                let tag = &tags[index];
                let node = cx.chain.split(id, pos);
                cx.chain[node].consume_prefix(tag.tag.len());
                if stack.last().map(|&(top, _)| top) == Some(index) {
                    stack.pop();
                    cx.chain[node].append_rendered(SPAN_CLOSE);
                } else {
                    stack.push((index, node));
                    cx.chain[node].append_rendered(&format_open(tag.class()));
                }
                cursor = Some(node);
                pos = 0;
                continue;
            }

            let joins_next = next_line.filter(|&next| cx.chain.next(id) == Some(next));
            if soft_hyphens && rest == "-" {
                if let Some(next_line) = joins_next {
                    let hyphen = cx.chain.split(id, pos);
                    let after = cx.chain.split(hyphen, 1);
                    cx.chain[hyphen].append_rendered(SOFT_HYPHEN_OPEN);
                    cx.chain[after].append_rendered(SPAN_CLOSE);
                    cx.chain[next_line].strip_line_break();
                    break;
                }
            }

            pos += rest.chars().next().map_or(1, char::len_utf8);
        }
    }

    for (index, node) in stack {
        let tag = &tags[index].tag;
        let Some(offset) = cx.chain.source_offset(para.head, para.start, node) else {
            continue;
        };
        cx.diagnostics.push(Diagnostic::new(
            cx.source_map.range(Span::with_len(offset, tag.len())),
            DiagnosticSeverity::Warning,
            W_CFMT_UNCLOSED,
            format!("character format `{}` is still open at the end of the paragraph", tag),
        ));
    }
}
