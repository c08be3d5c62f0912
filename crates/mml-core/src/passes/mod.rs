//! The per-paragraph transformation pipeline.
//!
//! Passes run in a fixed order over one paragraph's node range. Each pass
//! appends opening markup to a node's rendered text and prepends closing
//! markup, so wrappers opened by an earlier pass enclose those of a later
//! one. Stacks and flags live in locals; nothing survives the paragraph.

mod char_formats;
mod code_blocks;
mod dividers;
mod escape;
mod headings;
mod para_formats;
mod quotations;
mod smart_quotes;

use crate::chain::Chain;
use crate::diagnostic::Diagnostic;
use crate::dialect::Dialect;
use crate::emit::{PARAGRAPH_CLOSE, paragraph_open};
use crate::milestone::Milestone;
use crate::segment::Paragraph;
use crate::source_map::SourceMap;

pub(crate) use escape::escape_literals;
pub use smart_quotes::curl_quotes;

pub(crate) struct PassContext<'a> {
    pub dialect: &'a Dialect,
    pub chain: &'a mut Chain,
    pub source_map: &'a SourceMap,
    pub milestones: &'a mut Vec<Milestone>,
    pub diagnostics: &'a mut Vec<Diagnostic>,
}

pub(crate) fn run(cx: &mut PassContext<'_>, paragraphs: &mut [Paragraph]) {
    for (index, para) in paragraphs.iter_mut().enumerate() {
        run_paragraph(cx, para);
        tracing::trace!(
            target: "mml::passes",
            index,
            lines = para.lines.len(),
            formatted = para.formatted,
            "paragraph converted"
        );
    }
}

fn run_paragraph(cx: &mut PassContext<'_>, para: &mut Paragraph) {
    let dialect = cx.dialect;

    let quotes = if dialect.smartquotes {
        smart_quotes::classify(cx.chain, para)
    } else {
        Vec::new()
    };
    if let Some(levels) = non_empty(dialect.codeblocks.as_deref()) {
        code_blocks::apply(cx, para, levels);
    }
    headings::apply(cx, para);
    if let Some(format) = &dialect.quotations {
        quotations::apply(cx.chain, para, format.prop.as_deref());
    }
    if let Some(formats) = non_empty(dialect.paraformats.as_deref()) {
        para_formats::apply(cx.chain, para, formats);
    }
    if let Some(dividers) = non_empty(dialect.dividers.as_deref()) {
        dividers::apply(cx.chain, para, dividers);
    }
    let charformats = dialect.charformats.as_deref().unwrap_or(&[]);
    if !charformats.is_empty() || dialect.softhyphens {
        char_formats::apply(cx, para, charformats);
    }
    wrap_default(cx, para);
    smart_quotes::apply(cx.chain, para, &quotes);
}

fn non_empty<T>(items: Option<&[T]>) -> Option<&[T]> {
    items.filter(|items| !items.is_empty())
}

/// Wraps an unformatted paragraph with text in the paragraph element. The
/// wrapper is placed outside everything the passes added.
fn wrap_default(cx: &mut PassContext<'_>, para: &Paragraph) {
    if para.formatted {
        return;
    }
    let has_text = cx
        .chain
        .walk(para.head, para.close)
        .any(|(_, node)| !node.is_blank());
    if !has_text {
        return;
    }
    let prop = cx
        .dialect
        .paragraph
        .as_ref()
        .and_then(|format| format.prop.as_deref());
    if let Some(&first) = para.lines.first() {
        cx.chain[first].prepend_rendered(&paragraph_open(prop));
        cx.chain[para.close].append_rendered(PARAGRAPH_CLOSE);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{body, convert_chain, dialect};

    #[test]
    fn plain_paragraphs_get_the_default_wrap() {
        let dialect = dialect(r#"{"paragraph": {"prop": "para"}}"#);
        let (chain, _) = convert_chain(&dialect, "one\ntwo\n\nthree");
        assert_eq!(
            body(&chain),
            "<p class=\"para\" title=\"para\">one\ntwo</p>\n<p class=\"para\" title=\"para\">three</p>"
        );
    }

    #[test]
    fn whitespace_only_paragraph_is_not_wrapped() {
        let dialect = dialect("{}");
        let (chain, _) = convert_chain(&dialect, "a\n\n  ");
        assert_eq!(body(&chain), "<p>a</p>\n  ");
        assert_eq!(chain.to_source(), "a\n\n  ");
    }

    #[test]
    fn default_wrap_encloses_a_partial_quotation() {
        let dialect = dialect(r#"{"quotations": {"prop": "q"}}"#);
        let (chain, _) = convert_chain(&dialect, "said\n> hi");
        assert_eq!(
            body(&chain),
            "<p>said\n<blockquote class=\"q\">hi</blockquote></p>"
        );
    }
}
