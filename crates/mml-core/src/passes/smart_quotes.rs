use crate::chain::Chain;
use crate::segment::Paragraph;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct QuoteEdit {
    /// Absolute source offset of the quote glyph.
    pub offset: usize,
    pub original: char,
    pub replacement: char,
}

fn opens_after(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(ch) => ch.is_whitespace() || matches!(ch, '(' | '[' | '{' | '<' | '\u{201C}' | '\u{2018}'),
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum QuoteFamily {
    Double,
    Single,
}

fn family(ch: char) -> Option<QuoteFamily> {
    match ch {
        '"' | '\u{201C}' | '\u{201D}' => Some(QuoteFamily::Double),
        '\'' | '\u{2018}' | '\u{2019}' => Some(QuoteFamily::Single),
        _ => None,
    }
}

fn curl(family: QuoteFamily, opening: bool) -> char {
    match (family, opening) {
        (QuoteFamily::Double, true) => '\u{201C}',
        (QuoteFamily::Double, false) => '\u{201D}',
        (QuoteFamily::Single, true) => '\u{2018}',
        (QuoteFamily::Single, false) => '\u{2019}',
    }
}

/// Edits for `text`, with offsets relative to its start. Classification
/// looks at the glyph produced for the previous character. Quotes already
/// in their right form produce no edit.
fn edits_for(text: &str) -> Vec<QuoteEdit> {
    let mut edits = Vec::new();
    let mut prev = None;
    for (offset, ch) in text.char_indices() {
        let glyph = match family(ch) {
            Some(family) => {
                let replacement = curl(family, opens_after(prev));
                if replacement != ch {
                    edits.push(QuoteEdit {
                        offset,
                        original: ch,
                        replacement,
                    });
                }
                replacement
            }
            None => ch,
        };
        prev = Some(glyph);
    }
    edits
}

/// Replaces every quote glyph in `text` with its opening or closing curly
/// form.
pub fn curl_quotes(text: &str) -> String {
    let mut out = text.to_string();
    for edit in edits_for(text).iter().rev() {
        let end = edit.offset + edit.original.len_utf8();
        out.replace_range(edit.offset..end, edit.replacement.encode_utf8(&mut [0; 4]));
    }
    out
}

/// Classifies the paragraph's quotes while its lines are still raw.
pub(crate) fn classify(chain: &Chain, para: &Paragraph) -> Vec<QuoteEdit> {
    let base = para.start + chain[para.head].source.len();
    let text = para
        .lines
        .iter()
        .map(|&line| chain[line].literal.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let mut edits = edits_for(&text);
    for edit in &mut edits {
        edit.offset += base;
    }
    edits
}

/// Splits every quote that survived into a node of its own. Quotes that a
/// pass already moved into source markup are left alone.
pub(crate) fn apply(chain: &mut Chain, para: &Paragraph, edits: &[QuoteEdit]) {
    let stop = chain.next(para.close);
    let mut next_edit = 0;
    let mut cursor = Some(para.head);
    let mut offset = para.start;

    while let Some(id) = cursor {
        let Some(edit) = edits.get(next_edit).copied() else {
            break;
        };
        if Some(id) == stop {
            break;
        }
        let start = offset + chain[id].source.len();
        let end = start + chain[id].literal.len();
        if edit.offset < start {
            next_edit += 1;
            continue;
        }
        if edit.offset >= end {
            offset = end;
            cursor = chain.next(id);
            continue;
        }

        let width = edit.original.len_utf8();
        let quote = chain.split(id, edit.offset - start);
        let rest = chain.split(quote, width);
        let node = &mut chain[quote];
        node.consume_literal();
        node.append_rendered(edit.replacement.encode_utf8(&mut [0; 4]));

        next_edit += 1;
        offset = edit.offset + width;
        cursor = Some(rest);
    }
}

#[cfg(test)]
mod tests {
    use super::curl_quotes;
    use crate::passes::test_support::{body, convert_chain, dialect};

    #[test]
    fn double_quotes_open_and_close() {
        assert_eq!(curl_quotes("\"Hello\""), "\u{201C}Hello\u{201D}");
    }

    #[test]
    fn apostrophes_close() {
        assert_eq!(curl_quotes("don't 'go'"), "don\u{2019}t \u{2018}go\u{2019}");
    }

    #[test]
    fn brackets_and_curly_openers_precede_openings() {
        assert_eq!(curl_quotes("(\"a\")"), "(\u{201C}a\u{201D})");
        assert_eq!(curl_quotes("\"'a'\""), "\u{201C}\u{2018}a\u{2019}\u{201D}");
    }

    #[test]
    fn well_placed_curly_quotes_are_left_alone() {
        let curly = "\u{201C}x\u{201D} \u{2018}y\u{2019}";
        assert_eq!(curl_quotes(curly), curly);
    }

    #[test]
    fn misplaced_curly_quotes_are_turned_around() {
        assert_eq!(curl_quotes("\u{201D}Hello\u{201C}"), "\u{201C}Hello\u{201D}");
        assert_eq!(curl_quotes("it\u{2018}s \u{2019}x"), "it\u{2019}s \u{2018}x");
    }

    #[test]
    fn turned_curly_quotes_keep_the_round_trip() {
        let dialect = dialect(r#"{"smartquotes": true}"#);
        let source = "\u{201D}Hi\u{201C} \"ok\"";
        let (chain, _) = convert_chain(&dialect, source);
        assert_eq!(chain.to_source(), source);
        assert_eq!(
            body(&chain),
            "<p>\u{201C}Hi\u{201D} \u{201C}ok\u{201D}</p>"
        );
    }

    #[test]
    fn quotes_become_nodes_that_keep_the_round_trip() {
        let dialect = dialect(r#"{"smartquotes": true}"#);
        let source = "\"Hello\"\nit's\n\n'x'";
        let (chain, _) = convert_chain(&dialect, source);
        assert_eq!(chain.to_source(), source);
        assert_eq!(
            body(&chain),
            "<p>\u{201C}Hello\u{201D}\nit\u{2019}s</p>\n<p>\u{2018}x\u{2019}</p>"
        );
    }

    #[test]
    fn line_start_counts_as_whitespace() {
        let dialect = dialect(r#"{"smartquotes": true}"#);
        let (chain, _) = convert_chain(&dialect, "a\n\"b\"");
        assert_eq!(body(&chain), "<p>a\n\u{201C}b\u{201D}</p>");
    }
}
