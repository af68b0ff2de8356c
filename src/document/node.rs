use serde::Serialize;

/// Placeholder character used for inline atoms (mentions, hard breaks) when a
/// textblock is flattened to one char per offset.
pub const ATOM_CHAR: char = '\u{FFFC}';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Doc,
    Paragraph,
    Heading { level: u8 },
    BulletList,
    OrderedList { start: u64 },
    TaskList,
    ListItem,
    TaskItem { checked: bool },
    Blockquote,
    CodeBlock { language: Option<String> },
    HorizontalRule,
    Image { src: String, alt: Option<String> },
    Table,
    TableRow,
    TableCell { header: bool },
    HardBreak,
    Text { text: String },
    Mention { id: String, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mark {
    Bold,
    Italic,
    Strike,
    Code,
    Link { href: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            marks: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            marks: Vec::new(),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text { text: text.into() })
    }

    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self {
            kind: NodeKind::Text { text: text.into() },
            marks,
            children: Vec::new(),
        }
    }

    pub fn paragraph(text: &str) -> Self {
        if text.is_empty() {
            Self::new(NodeKind::Paragraph)
        } else {
            Self::with_children(NodeKind::Paragraph, vec![Self::text(text)])
        }
    }

    pub fn heading(level: u8, text: &str) -> Self {
        Self::with_children(NodeKind::Heading { level }, vec![Self::text(text)])
    }

    pub fn mention(id: &str, label: &str) -> Self {
        Self::new(NodeKind::Mention {
            id: id.to_string(),
            label: label.to_string(),
        })
    }

    /// Blocks whose children are inline content the cursor can sit in.
    pub fn is_textblock(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Paragraph
                | NodeKind::Heading { .. }
                | NodeKind::CodeBlock { .. }
                | NodeKind::TableCell { .. }
        )
    }

    pub fn is_inline(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Text { .. } | NodeKind::HardBreak | NodeKind::Mention { .. }
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::BulletList | NodeKind::OrderedList { .. } | NodeKind::TaskList
        )
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self.kind, NodeKind::ListItem | NodeKind::TaskItem { .. })
    }

    /// Length of this node in cursor offsets. Text counts chars, atoms count one.
    pub fn inline_len(&self) -> usize {
        match &self.kind {
            NodeKind::Text { text } => text.chars().count(),
            NodeKind::HardBreak | NodeKind::Mention { .. } => 1,
            _ => self.children.iter().map(Node::inline_len).sum(),
        }
    }

    /// Human-readable text of the subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text { text } => out.push_str(text),
            NodeKind::HardBreak => out.push('\n'),
            NodeKind::Mention { label, .. } => {
                out.push('@');
                out.push_str(label);
            }
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Inline content flattened to exactly one char per cursor offset.
    pub fn offset_chars(&self) -> Vec<char> {
        let mut chars = Vec::with_capacity(self.inline_len());
        for child in &self.children {
            match &child.kind {
                NodeKind::Text { text } => chars.extend(text.chars()),
                NodeKind::HardBreak | NodeKind::Mention { .. } => chars.push(ATOM_CHAR),
                _ => chars.extend(child.offset_chars()),
            }
        }
        chars
    }

    /// Returns `(child index, offset within child)`. An offset on a boundary
    /// resolves to the start of the following child.
    fn locate_inline(&self, offset: usize) -> (usize, usize) {
        let mut pos = 0;
        for (i, child) in self.children.iter().enumerate() {
            if offset == pos {
                return (i, 0);
            }
            let len = child.inline_len();
            if offset < pos + len {
                return (i, offset - pos);
            }
            pos += len;
        }
        (self.children.len(), 0)
    }

    /// Splits the inline children at `offset`, keeping the head and returning the tail.
    pub fn split_inline(&mut self, offset: usize) -> Vec<Node> {
        let (index, inner) = self.locate_inline(offset);
        if inner == 0 || index >= self.children.len() {
            return self.children.split_off(index.min(self.children.len()));
        }
        let mut rest = self.children.split_off(index + 1);
        if let Some(tail) = self.children[index].split_text(inner) {
            rest.insert(0, tail);
        }
        rest
    }

    fn split_text(&mut self, at: usize) -> Option<Node> {
        let marks = self.marks.clone();
        match &mut self.kind {
            NodeKind::Text { text } => {
                let byte = text
                    .char_indices()
                    .nth(at)
                    .map(|(i, _)| i)
                    .unwrap_or(text.len());
                let tail = text.split_off(byte);
                Some(Node::marked_text(tail, marks))
            }
            _ => None,
        }
    }

    /// Marks a character typed at `offset` inherits. Links do not extend.
    fn marks_at(&self, offset: usize) -> Vec<Mark> {
        let (index, inner) = self.locate_inline(offset);
        let source = if inner > 0 {
            self.children.get(index)
        } else if index > 0 {
            self.children.get(index - 1)
        } else {
            None
        };
        match source {
            Some(node) if matches!(node.kind, NodeKind::Text { .. }) => node
                .marks
                .iter()
                .filter(|m| !matches!(m, Mark::Link { .. }))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn insert_text(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let marks = self.marks_at(offset);
        let tail = self.split_inline(offset);
        self.children.push(Node::marked_text(text, marks));
        self.children.extend(tail);
        self.normalize_inline();
    }

    pub fn insert_inline(&mut self, offset: usize, nodes: Vec<Node>) {
        let tail = self.split_inline(offset);
        self.children.extend(nodes);
        self.children.extend(tail);
        self.normalize_inline();
    }

    pub fn delete_inline(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let tail = self.split_inline(end);
        self.split_inline(start);
        self.children.extend(tail);
        self.normalize_inline();
    }

    /// Drops empty text nodes and merges neighbours that carry the same marks.
    pub fn normalize_inline(&mut self) {
        let mut merged: Vec<Node> = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            if let NodeKind::Text { text } = &child.kind {
                if text.is_empty() {
                    continue;
                }
                if let Some(Node {
                    kind: NodeKind::Text { text: prev },
                    marks,
                    ..
                }) = merged.last_mut()
                {
                    if *marks == child.marks {
                        prev.push_str(text);
                        continue;
                    }
                }
            }
            merged.push(child);
        }
        self.children = merged;
    }
}

/// A sequence of top-level nodes produced by conversion and inserted into a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fragment(pub Vec<Node>);

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when any node in the fragment, at any depth, satisfies `pred`.
    pub fn contains(&self, pred: impl Fn(&NodeKind) -> bool + Copy) -> bool {
        fn walk(node: &Node, pred: impl Fn(&NodeKind) -> bool + Copy) -> bool {
            pred(&node.kind) || node.children.iter().any(|c| walk(c, pred))
        }
        self.0.iter().any(|n| walk(n, pred))
    }
}
