use super::PassContext;
use super::headings::match_milestone;
use crate::dialect::Format;
use crate::emit::{PRE_CLOSE, pre_open};
use crate::segment::Paragraph;

/// Tabs count one level each; spaces count one level per four, carried
/// across tabs.
pub(crate) fn indent_level(text: &str) -> usize {
    let mut level = 0;
    let mut spaces = 0;
    for byte in text.bytes() {
        match byte {
            b'\t' => level += 1,
            b' ' => {
                spaces += 1;
                if spaces == 4 {
                    level += 1;
                    spaces = 0;
                }
            }
            _ => break,
        }
    }
    level
}

/// Bytes of leading whitespace making up the first `depth` levels.
pub(crate) fn indent_prefix_len(text: &str, depth: usize) -> usize {
    if depth == 0 {
        return 0;
    }
    let mut level = 0;
    let mut spaces = 0;
    for (idx, byte) in text.bytes().enumerate() {
        match byte {
            b'\t' => level += 1,
            b' ' => {
                spaces += 1;
                if spaces == 4 {
                    level += 1;
                    spaces = 0;
                }
            }
            _ => return idx,
        }
        if level == depth {
            return idx + 1;
        }
    }
    text.len()
}

pub(crate) fn apply(cx: &mut PassContext<'_>, para: &mut Paragraph, levels: &[Format]) {
    let dialect = cx.dialect;
    let milestones = dialect.milestone_list();
    let mut depth = 0;

    for &line in &para.lines {
        let node = &cx.chain[line];
        if node.is_blank() || match_milestone(milestones, &node.literal).is_some() {
            continue;
        }
        let level = indent_level(&node.literal).min(levels.len());
        let node = &mut cx.chain[line];
        if level != depth {
            if depth > 0 {
                node.prepend_rendered(PRE_CLOSE);
            }
            if level > 0 {
                node.append_rendered(&pre_open(levels[level - 1].prop.as_deref()));
                para.formatted = true;
            }
            depth = level;
        }
        if depth > 0 {
            let len = indent_prefix_len(&node.literal, depth);
            node.consume_prefix(len);
        }
    }
    if depth > 0 {
        cx.chain[para.close].prepend_rendered(PRE_CLOSE);
    }
}
