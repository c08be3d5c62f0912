use crate::chain::Chain;
use crate::emit::entity;

/// Turns every `<`, `>` and `&` left in a literal into a node of its own,
/// with the character as source and its entity as rendered markup.
pub(crate) fn escape_literals(chain: &mut Chain) {
    let mut cursor = chain.head();
    while let Some(id) = cursor {
        let found = chain[id]
            .literal
            .char_indices()
            .find_map(|(pos, ch)| entity(ch).map(|escaped| (pos, ch.len_utf8(), escaped)));
        let Some((pos, width, escaped)) = found else {
            cursor = chain.next(id);
            continue;
        };
        let special = chain.split(id, pos);
        let rest = chain.split(special, width);
        let node = &mut chain[special];
        node.consume_literal();
        node.append_rendered(escaped);
        cursor = Some(rest);
    }
}
