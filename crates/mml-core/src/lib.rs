mod chain;
mod convert;
mod diagnostic;
mod dialect;
mod emit;
mod error;
mod milestone;
mod offset_map;
mod passes;
mod segment;
mod source_map;
mod span;
mod sync;

pub use chain::{Chain, Node, NodeId, NodeKind, Walk};
pub use convert::{Conversion, ConvertOptions, build_chain, convert, convert_with_options};
pub use diagnostic::{Diagnostic, DiagnosticSeverity, E_ROUND_TRIP, W_CFMT_UNCLOSED};
pub use dialect::{
    DEFAULT_SECTION_CLASS, Dialect, Format, HeadingFormat, PAGE_PROP, PairedFormat, TagFormat,
};
pub use emit::sanitize_html;
pub use error::ConfigError;
pub use milestone::{Milestone, page_table};
pub use offset_map::{OffsetMap, OffsetMapping};
pub use passes::curl_quotes;
pub use segment::SECTION_BREAK;
pub use source_map::{Position, Range, SourceMap};
pub use span::Span;
pub use sync::{PagePosition, RefLoc, find_highest_index, find_ref_index, page_position};
