//! The dual-text chain.
//!
//! Every node carries three strings: `source` (MML bytes consumed by the
//! conversion and not rendered), `rendered` (HTML inserted in their place) and
//! `literal` (text shared by both sides). Walking the chain and concatenating
//! `source + literal` rebuilds the input; `rendered + literal` is the HTML.
//!
//! Nodes live in an arena and are linked by index, so splitting a node is an
//! index rewrite and no node is ever freed during a conversion.

use std::ops::{Index, IndexMut};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node stands for in the segmented document.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeKind {
    /// Opens a section (and closes the previous one).
    Section,
    /// Starts a paragraph; its source holds the blank-line separator.
    Paragraph,
    /// One source line of a paragraph.
    Line,
    /// A fragment split off a line by a pass.
    Inline,
    /// Collects closing markup at the end of a paragraph.
    Close,
    /// Closes the last section.
    End,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub source: String,
    pub rendered: String,
    pub literal: String,
    next: Option<NodeId>,
    prev: Option<NodeId>,
}

impl Node {
    pub fn new(
        kind: NodeKind,
        source: impl Into<String>,
        rendered: impl Into<String>,
        literal: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
            rendered: rendered.into(),
            literal: literal.into(),
            next: None,
            prev: None,
        }
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn append_rendered(&mut self, html: &str) {
        self.rendered.push_str(html);
    }

    pub fn prepend_rendered(&mut self, html: &str) {
        self.rendered.insert_str(0, html);
    }

    /// Moves the first `len` bytes of the literal into the source markup.
    pub fn consume_prefix(&mut self, len: usize) {
        let rest = self.literal.split_off(len);
        let taken = std::mem::replace(&mut self.literal, rest);
        self.source.push_str(&taken);
    }

    pub fn consume_literal(&mut self) {
        let taken = std::mem::take(&mut self.literal);
        self.source.push_str(&taken);
    }

    /// Drops the rendered line break, if any.
    pub fn strip_line_break(&mut self) {
        if let Some(pos) = self.rendered.find('\n') {
            self.rendered.remove(pos);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.literal.trim().is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Chain {
    nodes: Vec<Node>,
    head: Option<NodeId>,
    last: Option<NodeId>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self[id].next
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self[id].prev
    }

    pub fn push(&mut self, mut node: Node) -> NodeId {
        let id = self.alloc_id();
        node.prev = self.last;
        node.next = None;
        self.nodes.push(node);
        match self.last {
            Some(last) => self[last].next = Some(id),
            None => self.head = Some(id),
        }
        self.last = Some(id);
        id
    }

    pub fn insert_after(&mut self, at: NodeId, mut node: Node) -> NodeId {
        let id = self.alloc_id();
        let after = self[at].next;
        node.prev = Some(at);
        node.next = after;
        self.nodes.push(node);
        self[at].next = Some(id);
        match after {
            Some(after) => self[after].prev = Some(id),
            None => self.last = Some(id),
        }
        id
    }

    /// Splits the literal of `id` at byte `at`. The tail moves into a new
    /// `Inline` node with empty markup, linked right after `id`.
    pub fn split(&mut self, id: NodeId, at: usize) -> NodeId {
        let rest = self[id].literal.split_off(at);
        self.insert_after(id, Node::new(NodeKind::Inline, "", "", rest))
    }

    pub fn iter(&self) -> Walk<'_> {
        Walk {
            chain: self,
            cursor: self.head,
            until: None,
        }
    }

    /// Walks from `from` up to, but not including, `until`.
    pub fn walk(&self, from: NodeId, until: NodeId) -> Walk<'_> {
        Walk {
            chain: self,
            cursor: Some(from),
            until: Some(until),
        }
    }

    /// Source offset at which `target`'s source markup begins, counting from
    /// `from`, whose source starts at `base`.
    pub fn source_offset(&self, from: NodeId, base: usize, target: NodeId) -> Option<usize> {
        let mut offset = base;
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            if id == target {
                return Some(offset);
            }
            let node = &self[id];
            offset += node.source.len() + node.literal.len();
            cursor = node.next;
        }
        None
    }

    /// Concatenation of `rendered + literal` over the whole chain.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for (_, node) in self.iter() {
            out.push_str(&node.rendered);
            out.push_str(&node.literal);
        }
        out
    }

    /// Concatenation of `source + literal` over the whole chain.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for (_, node) in self.iter() {
            out.push_str(&node.source);
            out.push_str(&node.literal);
        }
        out
    }

    fn alloc_id(&self) -> NodeId {
        NodeId(self.nodes.len() as u32)
    }
}

impl Index<NodeId> for Chain {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for Chain {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

pub struct Walk<'a> {
    chain: &'a Chain,
    cursor: Option<NodeId>,
    until: Option<NodeId>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        if Some(id) == self.until {
            self.cursor = None;
            return None;
        }
        let node = &self.chain[id];
        self.cursor = node.next;
        Some((id, node))
    }
}
