use serde::Serialize;

use crate::chain::Chain;
use crate::span::Span;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct OffsetMapping {
    pub source: Span,
    pub html: Span,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct OffsetMap {
    mappings: Vec<OffsetMapping>,
    source_len: usize,
    html_len: usize,
}

impl OffsetMap {
    pub fn from_chain(chain: &Chain) -> Self {
        let mut mappings = Vec::new();
        let mut source = 0;
        let mut html = 0;
        for (_, node) in chain.iter() {
            source += node.source.len();
            html += node.rendered.len();
            let len = node.literal.len();
            if len > 0 {
                mappings.push(OffsetMapping {
                    source: Span::with_len(source, len),
                    html: Span::with_len(html, len),
                });
            }
            source += len;
            html += len;
        }
        Self {
            mappings,
            source_len: source,
            html_len: html,
        }
    }

    pub fn mappings(&self) -> &[OffsetMapping] {
        &self.mappings
    }

    /// HTML offset showing the source byte at `source_offset`.
    pub fn html_offset(&self, source_offset: usize) -> usize {
        let idx = self
            .mappings
            .partition_point(|mapping| mapping.source.end <= source_offset);
        match self.mappings.get(idx) {
            Some(mapping) if mapping.source.contains(source_offset) => {
                mapping.html.start + (source_offset - mapping.source.start)
            }
            Some(mapping) => mapping.html.start,
            None => self.html_len,
        }
    }

    /// Source offset behind the HTML byte at `html_offset`.
    pub fn source_offset(&self, html_offset: usize) -> usize {
        let idx = self
            .mappings
            .partition_point(|mapping| mapping.html.end <= html_offset);
        match self.mappings.get(idx) {
            Some(mapping) if mapping.html.contains(html_offset) => {
                mapping.source.start + (html_offset - mapping.html.start)
            }
            Some(mapping) => mapping.source.start,
            None => self.source_len,
        }
    }
}
