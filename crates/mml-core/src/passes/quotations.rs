use crate::chain::Chain;
use crate::emit::{BLOCKQUOTE_CLOSE, blockquote_open};
use crate::segment::Paragraph;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum PrefixState {
    /// Before the first marker, or after whitespace.
    Lead,
    /// Inside a run of `>` markers.
    Marker,
}

/// Quote depth of a line and the byte length of its marker prefix.
///
/// A run of `>` counts once it is followed by whitespace or the end of the
/// line; a run followed by anything else stops the scan, keeping the depth
/// committed before it.
pub(crate) fn quote_prefix(text: &str) -> (usize, usize) {
    let mut state = PrefixState::Lead;
    let mut depth = 0;
    let mut prefix_len = 0;
    let mut run = 0;

    for (idx, byte) in text.bytes().enumerate() {
        match byte {
            b' ' | b'\t' => {
                if state == PrefixState::Marker {
                    depth += run;
                    run = 0;
                    state = PrefixState::Lead;
                }
                if depth > 0 {
                    prefix_len = idx + 1;
                }
            }
            b'>' => {
                state = PrefixState::Marker;
                run += 1;
            }
            _ => return (depth, prefix_len),
        }
    }
    if state == PrefixState::Marker {
        depth += run;
        prefix_len = text.len();
    }
    (depth, prefix_len)
}

pub(crate) fn apply(chain: &mut Chain, para: &mut Paragraph, prop: Option<&str>) {
    let mut depth = 0;
    let mut wraps_all = false;

    for (k, &line) in para.lines.iter().enumerate() {
        let (level, prefix_len) = quote_prefix(&chain[line].literal);
        let node = &mut chain[line];
        for _ in level..depth {
            node.prepend_rendered(BLOCKQUOTE_CLOSE);
        }
        for _ in depth..level {
            node.append_rendered(&blockquote_open(prop));
        }
        if k == 0 {
            wraps_all = level > 0;
        } else if level == 0 {
            wraps_all = false;
        }
        if level > 0 {
            node.consume_prefix(prefix_len);
        }
        depth = level;
    }
    for _ in 0..depth {
        chain[para.close].prepend_rendered(BLOCKQUOTE_CLOSE);
    }
    if wraps_all {
        para.formatted = true;
    }
}
