use serde::Serialize;
use web_time::Instant;

use crate::chain::Chain;
use crate::diagnostic::{Diagnostic, DiagnosticSeverity, E_ROUND_TRIP};
use crate::dialect::Dialect;
use crate::emit::sanitize_html;
use crate::milestone::{Milestone, page_table};
use crate::offset_map::OffsetMap;
use crate::passes::{self, PassContext};
use crate::segment::segment;
use crate::source_map::SourceMap;
use crate::span::Span;
use crate::sync::RefLoc;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConvertOptions {
    /// Escape `<`, `>` and `&` left in the text.
    pub escape_html: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { escape_html: true }
    }
}

/// Everything a conversion produces. Nothing here refers back to the dialect
/// or the input.
#[derive(Clone, Debug, Serialize)]
pub struct Conversion {
    pub html: String,
    /// The source rebuilt from the chain; equal to the input unless an
    /// `E_ROUND_TRIP` diagnostic is present.
    pub source: String,
    pub milestones: Vec<Milestone>,
    pub line_count: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub offsets: OffsetMap,
}

impl Conversion {
    /// `(reference, line)` for every page milestone.
    pub fn page_table(&self) -> Vec<RefLoc<usize>> {
        page_table(&self.milestones)
    }

    pub fn round_trip_ok(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.code == E_ROUND_TRIP)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity == DiagnosticSeverity::Error)
    }

    pub fn sanitized_html(&self) -> String {
        sanitize_html(&self.html)
    }
}

pub fn convert(dialect: &Dialect, source: &str) -> Conversion {
    convert_with_options(dialect, source, ConvertOptions::default())
}

pub fn convert_with_options(dialect: &Dialect, source: &str, options: ConvertOptions) -> Conversion {
    let started = Instant::now();
    let source_map = SourceMap::new(source);
    let built = run(dialect, source, &source_map, options);
    let chain = built.chain;
    let mut diagnostics = built.diagnostics;

    let html = chain.to_html();
    let rebuilt = chain.to_source();
    if rebuilt != source {
        let at = first_difference(&rebuilt, source);
        diagnostics.push(Diagnostic::new(
            source_map.range(Span::with_len(at, 0)),
            DiagnosticSeverity::Error,
            E_ROUND_TRIP,
            format!(
                "rebuilt source differs from the input at byte {} ({} vs {} bytes)",
                at,
                rebuilt.len(),
                source.len()
            ),
        ));
    }
    for diagnostic in &diagnostics {
        tracing::warn!(
            target: "mml::convert",
            code = diagnostic.code,
            line = diagnostic.range.start.line + 1,
            "{}",
            diagnostic.message
        );
    }

    let offsets = OffsetMap::from_chain(&chain);
    tracing::debug!(
        target: "mml::convert",
        sections = built.sections,
        paragraphs = built.paragraphs,
        milestones = built.milestones.len(),
        nodes = chain.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "conversion finished"
    );

    Conversion {
        html,
        source: rebuilt,
        milestones: built.milestones,
        line_count: source_map.line_count(),
        diagnostics,
        offsets,
    }
}

pub fn build_chain(dialect: &Dialect, source: &str, options: ConvertOptions) -> Chain {
    let source_map = SourceMap::new(source);
    run(dialect, source, &source_map, options).chain
}

struct Built {
    chain: Chain,
    milestones: Vec<Milestone>,
    diagnostics: Vec<Diagnostic>,
    sections: usize,
    paragraphs: usize,
}

fn run(dialect: &Dialect, source: &str, source_map: &SourceMap, options: ConvertOptions) -> Built {
    let mut segmented = segment(source, dialect.section_class());
    let mut milestones = Vec::new();
    let mut diagnostics = Vec::new();
    let mut cx = PassContext {
        dialect,
        chain: &mut segmented.chain,
        source_map,
        milestones: &mut milestones,
        diagnostics: &mut diagnostics,
    };
    passes::run(&mut cx, &mut segmented.paragraphs);
    if options.escape_html {
        passes::escape_literals(&mut segmented.chain);
    }
    Built {
        chain: segmented.chain,
        milestones,
        diagnostics,
        sections: segmented.sections,
        paragraphs: segmented.paragraphs.len(),
    }
}

fn first_difference(left: &str, right: &str) -> usize {
    left.bytes()
        .zip(right.bytes())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| left.len().min(right.len()))
}

#[cfg(test)]
mod tests {
    use super::{ConvertOptions, convert, convert_with_options, first_difference};
    use crate::dialect::Dialect;

    #[test]
    fn output_is_wrapped_in_a_section() {
        let dialect = Dialect::default();
        let conversion = convert(&dialect, "hello");
        assert_eq!(conversion.html, "<div class=\"section\"><p>hello</p></div>");
        assert!(conversion.round_trip_ok());
        assert_eq!(conversion.line_count, 1);
    }

    #[test]
    fn empty_input_still_yields_a_section() {
        let conversion = convert(&Dialect::default(), "");
        assert_eq!(conversion.html, "<div class=\"section\"></div>");
        assert_eq!(conversion.source, "");
        assert!(conversion.diagnostics.is_empty());
    }

    #[test]
    fn escaping_can_be_turned_off() {
        let dialect = Dialect::default();
        let raw = convert_with_options(&dialect, "<b>", ConvertOptions { escape_html: false });
        assert_eq!(raw.html, "<div class=\"section\"><p><b></p></div>");
        let escaped = convert(&dialect, "<b>");
        assert_eq!(escaped.html, "<div class=\"section\"><p>&lt;b&gt;</p></div>");
        assert_eq!(escaped.source, "<b>");
    }

    #[test]
    fn literal_spans_line_up_across_outputs() {
        let dialect = Dialect::from_json(
            r#"{"quotations": {"prop": "q"}, "charformats": [{"tag": "*"}], "smartquotes": true}"#,
        )
        .expect("dialect");
        let source = "> \"a\" *b* & c\n>> d";
        let conversion = convert(&dialect, source);
        assert!(!conversion.offsets.mappings().is_empty());
        for mapping in conversion.offsets.mappings() {
            assert_eq!(
                &source[mapping.source.start..mapping.source.end],
                &conversion.html[mapping.html.start..mapping.html.end]
            );
        }
    }

    #[test]
    fn first_difference_handles_prefixes() {
        assert_eq!(first_difference("abc", "abd"), 2);
        assert_eq!(first_difference("ab", "abc"), 2);
        assert_eq!(first_difference("", ""), 0);
    }
}
