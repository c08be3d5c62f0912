use crate::chain::{Chain, NodeId, NodeKind};
use crate::dialect::PairedFormat;
use crate::emit::{PARAGRAPH_CLOSE, paragraph_open};
use crate::segment::Paragraph;

/// Offset of `tag` when only spaces and tabs precede it.
fn start_pos(text: &str, tag: &str) -> Option<usize> {
    let lead = text.len() - text.trim_start_matches([' ', '\t']).len();
    text[lead..].starts_with(tag).then_some(lead)
}

/// Offset of `tag` when only whitespace follows it.
fn end_pos(text: &str, tag: &str) -> Option<usize> {
    let trimmed = text.trim_end();
    trimmed
        .ends_with(tag)
        .then(|| trimmed.len() - tag.len())
}

/// A line is blank only if its node and the fragments split off it are.
fn line_is_blank(chain: &Chain, line: NodeId) -> bool {
    let mut cursor = Some(line);
    while let Some(id) = cursor {
        if id != line && chain[id].kind != NodeKind::Inline {
            break;
        }
        if !chain[id].is_blank() {
            return false;
        }
        cursor = chain.next(id);
    }
    true
}

pub(crate) fn apply(chain: &mut Chain, para: &mut Paragraph, formats: &[PairedFormat]) {
    let mut text_lines = para
        .lines
        .iter()
        .copied()
        .filter(|&line| !line_is_blank(chain, line));
    let Some(first) = text_lines.next() else {
        return;
    };
    let last = text_lines.last().unwrap_or(first);

    for format in formats {
        let Some(start) = start_pos(&chain[first].literal, &format.left_tag) else {
            continue;
        };
        let Some(end) = end_pos(&chain[last].literal, &format.right_tag) else {
            continue;
        };
        let inner_start = start + format.left_tag.len();
        if first == last && inner_start > end {
            continue;
        }

        let tail = chain.split(last, end);
        chain[tail].consume_literal();
        let head = &mut chain[first];
        head.consume_prefix(inner_start);
        head.append_rendered(&paragraph_open(format.prop.as_deref()));
        chain[para.close].prepend_rendered(PARAGRAPH_CLOSE);
        para.formatted = true;
        break;
    }
}

#[cfg(test)]
mod tests {
    use super::{end_pos, start_pos};
    use crate::passes::test_support::{body, convert_chain, dialect};

    #[test]
    fn tags_may_only_be_padded_with_whitespace() {
        assert_eq!(start_pos("  ->x", "->"), Some(2));
        assert_eq!(start_pos("a->x", "->"), None);
        assert_eq!(end_pos("x<-  ", "<-"), Some(1));
        assert_eq!(end_pos("x<-a", "<-"), None);
    }

    #[test]
    fn centered_paragraph_drops_its_tags() {
        let dialect = dialect(
            r#"{"paraformats": [{"leftTag": "->", "rightTag": "<-", "prop": "centered"}]}"#,
        );
        let source = "->one\ntwo<- ";
        let (chain, _) = convert_chain(&dialect, source);
        assert_eq!(chain.to_source(), source);
        assert_eq!(
            body(&chain),
            "<p class=\"centered\" title=\"centered\">one\ntwo</p>"
        );
    }

    #[test]
    fn first_matching_format_wins() {
        let dialect = dialect(
            r#"{"paraformats": [
                {"leftTag": "[", "rightTag": "]", "prop": "a"},
                {"leftTag": "[", "rightTag": "]", "prop": "b"}
            ]}"#,
        );
        let (chain, _) = convert_chain(&dialect, "[x]");
        assert_eq!(body(&chain), "<p class=\"a\" title=\"a\">x</p>");
    }

    #[test]
    fn right_tag_must_end_the_paragraph_text() {
        let dialect = dialect(
            r#"{
                "paraformats": [{"leftTag": "->", "rightTag": "<-", "prop": "centered"}],
                "milestones": [{"leftTag": "[[", "rightTag": "]]", "prop": "page"}]
            }"#,
        );
        let source = "->Centered<-\n[[12]]";
        let (chain, milestones) = convert_chain(&dialect, source);
        assert_eq!(chain.to_source(), source);
        assert_eq!(milestones.len(), 1);
        assert_eq!(
            body(&chain),
            "<p>->Centered<-\n<span class=\"page\">12</span></p>"
        );
    }

    #[test]
    fn overlapping_tags_on_one_line_do_not_match() {
        let dialect = dialect(r#"{"paraformats": [{"leftTag": "::", "rightTag": "::"}]}"#);
        let (chain, _) = convert_chain(&dialect, ":::");
        assert_eq!(body(&chain), "<p>:::</p>");
    }
}
