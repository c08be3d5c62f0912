use crate::chain::Chain;
use crate::dialect::TagFormat;
use crate::emit::divider_html;
use crate::segment::Paragraph;

/// Replaces lines that are exactly a divider tag with the table skeleton.
pub(crate) fn apply(chain: &mut Chain, para: &mut Paragraph, dividers: &[TagFormat]) {
    for &line in &para.lines {
        let trimmed = chain[line].literal.trim();
        let Some(divider) = dividers.iter().find(|divider| divider.tag == trimmed) else {
            continue;
        };
        let node = &mut chain[line];
        node.consume_literal();
        node.append_rendered(&divider_html(divider.class()));
        para.formatted = true;
    }
}
