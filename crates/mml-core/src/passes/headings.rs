use super::PassContext;
use super::quotations::quote_prefix;
use crate::dialect::{Dialect, PairedFormat};
use crate::emit::{SPAN_CLOSE, heading_close, heading_open, milestone_open};
use crate::milestone::Milestone;
use crate::segment::Paragraph;

/// Byte layout of a milestone line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MilestoneMatch<'d> {
    pub format: &'d PairedFormat,
    pub content_start: usize,
    pub content_end: usize,
}

/// Matches `text` against the milestone formats, in order. The trimmed text
/// must start with `leftTag`, end with `rightTag`, and hold something in
/// between.
pub(crate) fn match_milestone<'d>(
    formats: &'d [PairedFormat],
    text: &str,
) -> Option<MilestoneMatch<'d>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lead = text.len() - text.trim_start().len();
    formats.iter().find_map(|format| {
        let inner = trimmed
            .strip_prefix(format.left_tag.as_str())?
            .strip_suffix(format.right_tag.as_str())?;
        if inner.is_empty() {
            return None;
        }
        let content_start = lead + format.left_tag.len();
        Some(MilestoneMatch {
            format,
            content_start,
            content_end: content_start + inner.len(),
        })
    })
}

/// The heading level a marker line announces, if it is one.
fn marker_level<'d>(dialect: &'d Dialect, text: &str) -> Option<(usize, Option<&'d str>)> {
    let mut chars = text.chars();
    let first = chars.next()?;
    if !chars.all(|ch| ch == first) {
        return None;
    }
    dialect
        .heading_for(first)
        .map(|(level, heading)| (level, heading.prop.as_deref()))
}

/// Whether a line may become heading text. Quoted lines may not, since the
/// blockquote would end up inside the heading element.
fn heading_text(dialect: &Dialect, text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    dialect.quotations.is_none() || quote_prefix(text).0 == 0
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LineRole {
    Text,
    Marker,
    Milestone,
}

pub(crate) fn apply(cx: &mut PassContext<'_>, para: &mut Paragraph) {
    let dialect = cx.dialect;
    let milestones = dialect.milestone_list();
    let mut roles = Vec::with_capacity(para.lines.len());

    for (k, &line) in para.lines.iter().enumerate() {
        let literal = cx.chain[line].literal.as_str();

        let after_text = k > 0
            && roles[k - 1] == LineRole::Text
            && heading_text(dialect, &cx.chain[para.lines[k - 1]].literal);
        let heading = if after_text {
            marker_level(dialect, literal)
        } else {
            None
        };
        if let Some((level, prop)) = heading {
            cx.chain[para.lines[k - 1]].append_rendered(&heading_open(level, prop));
            let marker = &mut cx.chain[line];
            marker.consume_literal();
            marker.strip_line_break();
            marker.prepend_rendered(&heading_close(level));
            para.formatted = true;
            roles.push(LineRole::Marker);
            continue;
        }

        if let Some(found) = match_milestone(milestones, literal) {
            let reference = literal[found.content_start..found.content_end].to_string();
            cx.chain[line].consume_prefix(found.content_start);
            let content = cx.chain.split(line, 0);
            let closing = cx.chain.split(content, reference.len());
            cx.chain[content].append_rendered(&milestone_open(found.format.prop.as_deref()));
            let closing = &mut cx.chain[closing];
            closing.consume_literal();
            closing.append_rendered(SPAN_CLOSE);

            cx.milestones.push(Milestone {
                reference,
                line: para.first_line + k,
                prop: found.format.prop.clone(),
            });
            roles.push(LineRole::Milestone);
            continue;
        }

        roles.push(LineRole::Text);
    }
}
