use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use tracing::debug;

use super::node::{Fragment, Node, NodeKind};

/// A selection inside a single textblock, addressed by its child-index path from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: Vec<usize>,
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn cursor(path: Vec<usize>, offset: usize) -> Self {
        Self {
            path,
            anchor: offset,
            head: offset,
        }
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Ordered,
    Task,
}

impl ListKind {
    fn node_kind(self) -> NodeKind {
        match self {
            Self::Bullet => NodeKind::BulletList,
            Self::Ordered => NodeKind::OrderedList { start: 1 },
            Self::Task => NodeKind::TaskList,
        }
    }

    fn item_kind(self) -> NodeKind {
        match self {
            Self::Task => NodeKind::TaskItem { checked: false },
            _ => NodeKind::ListItem,
        }
    }

    fn matches(self, kind: &NodeKind) -> bool {
        matches!(
            (self, kind),
            (Self::Bullet, NodeKind::BulletList)
                | (Self::Ordered, NodeKind::OrderedList { .. })
                | (Self::Task, NodeKind::TaskList)
        )
    }
}

/// Requests the editor leaves for its host to fulfil (e.g. asking the user for input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    ImageUrl,
}

pub type ImageUploadHook = Rc<dyn Fn()>;

pub struct Editor {
    doc: Node,
    selection: Selection,
    image_upload: Option<ImageUploadHook>,
    prompt: Option<Prompt>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("doc", &self.doc)
            .field("selection", &self.selection)
            .field("image_upload", &self.image_upload.is_some())
            .field("prompt", &self.prompt)
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            doc: Node::with_children(NodeKind::Doc, vec![Node::paragraph("")]),
            selection: Selection::cursor(vec![0], 0),
            image_upload: None,
            prompt: None,
        }
    }

    /// Builds a document from `fragment`, with the cursor at the end of its last textblock.
    pub fn from_fragment(fragment: Fragment) -> Self {
        let mut blocks = wrap_inline_runs(fragment.into_nodes());
        if last_textblock_path(&blocks).is_none() {
            blocks.push(Node::paragraph(""));
        }
        let mut editor = Self {
            doc: Node::with_children(NodeKind::Doc, blocks),
            ..Self::new()
        };
        if let Some(path) = last_textblock_path(&editor.doc.children) {
            let len = editor.node_at(&path).map(Node::inline_len).unwrap_or(0);
            editor.selection = Selection::cursor(path, len);
        }
        editor
    }

    pub fn doc(&self) -> &Node {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cursor_offset(&self) -> usize {
        self.selection.head
    }

    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let mut node = &self.doc;
        for &i in path {
            node = node.children.get(i)?;
        }
        Some(node)
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = &mut self.doc;
        for &i in path {
            node = node.children.get_mut(i)?;
        }
        Some(node)
    }

    pub fn current_block(&self) -> Option<&Node> {
        self.node_at(&self.selection.path)
    }

    /// Paths of every textblock in document order.
    pub fn textblock_paths(&self) -> Vec<Vec<usize>> {
        fn walk(node: &Node, path: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
            for (i, child) in node.children.iter().enumerate() {
                path.push(i);
                if child.is_textblock() {
                    out.push(path.clone());
                } else if !child.is_inline() {
                    walk(child, path, out);
                }
                path.pop();
            }
        }
        let mut out = Vec::new();
        walk(&self.doc, &mut Vec::new(), &mut out);
        out
    }

    /// Moves the cursor, clamping the offset into the target textblock.
    pub fn set_cursor(&mut self, path: Vec<usize>, offset: usize) {
        let len = self.node_at(&path).map(Node::inline_len).unwrap_or(0);
        self.selection = Selection::cursor(path, offset.min(len));
    }

    pub fn select(&mut self, path: Vec<usize>, anchor: usize, head: usize) {
        let len = self.node_at(&path).map(Node::inline_len).unwrap_or(0);
        self.selection = Selection {
            path,
            anchor: anchor.min(len),
            head: head.min(len),
        };
    }

    /// Chars of the current textblock before the cursor, one per offset.
    pub fn chars_before_cursor(&self) -> Vec<char> {
        match self.current_block() {
            Some(block) => {
                let mut chars = block.offset_chars();
                chars.truncate(self.selection.head);
                chars
            }
            None => Vec::new(),
        }
    }

    /// Chars of the textblock at `path` in `range`, if both still exist.
    pub fn chars_in(&self, path: &[usize], range: Range<usize>) -> Option<Vec<char>> {
        let block = self.node_at(path).filter(|n| n.is_textblock())?;
        let chars = block.offset_chars();
        chars.get(range).map(<[char]>::to_vec)
    }

    pub fn set_image_upload_hook(&mut self, hook: Option<ImageUploadHook>) {
        self.image_upload = hook;
    }

    pub fn image_upload_hook(&self) -> Option<ImageUploadHook> {
        self.image_upload.clone()
    }

    pub fn request_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
    }

    pub fn take_prompt(&mut self) -> Option<Prompt> {
        self.prompt.take()
    }

    // --- text editing ---

    pub fn insert_text(&mut self, text: &str) {
        self.delete_selection();
        let path = self.selection.path.clone();
        let offset = self.selection.head;
        let Some(block) = self.node_at_mut(&path) else {
            return;
        };
        block.insert_text(offset, text);
        self.set_cursor(path, offset + text.chars().count());
    }

    /// Deletes the selected range. Returns false when the selection is collapsed.
    pub fn delete_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let path = self.selection.path.clone();
        let (from, to) = (self.selection.from(), self.selection.to());
        if let Some(block) = self.node_at_mut(&path) {
            block.delete_inline(from, to);
        }
        self.set_cursor(path, from);
        true
    }

    /// Deletes `range` of the textblock at `path` and collapses the cursor at its start.
    pub fn delete_range(&mut self, path: &[usize], range: Range<usize>) -> bool {
        let Some(block) = self.node_at_mut(path).filter(|n| n.is_textblock()) else {
            return false;
        };
        if range.end > block.inline_len() {
            return false;
        }
        block.delete_inline(range.start, range.end);
        self.set_cursor(path.to_vec(), range.start);
        true
    }

    pub fn delete_backward(&mut self) {
        if self.delete_selection() {
            return;
        }
        let path = self.selection.path.clone();
        let offset = self.selection.head;
        if offset > 0 {
            if let Some(block) = self.node_at_mut(&path) {
                block.delete_inline(offset - 1, offset);
            }
            self.set_cursor(path, offset - 1);
            return;
        }
        self.join_backward();
    }

    fn join_backward(&mut self) {
        let path = self.selection.path.clone();
        let Some((&index, parent_path)) = path.split_last() else {
            return;
        };
        if index == 0 {
            return;
        }
        let mut prev_path = parent_path.to_vec();
        prev_path.push(index - 1);
        let Some(prev) = self.node_at(&prev_path) else {
            return;
        };
        if matches!(prev.kind, NodeKind::HorizontalRule | NodeKind::Image { .. }) {
            if let Some(parent) = self.node_at_mut(parent_path) {
                parent.children.remove(index - 1);
            }
            self.set_cursor(prev_path, 0);
            return;
        }
        if !prev.is_textblock() {
            return;
        }
        let Some(parent) = self.node_at_mut(parent_path) else {
            return;
        };
        let current = parent.children.remove(index);
        let target = &mut parent.children[index - 1];
        let join_at = target.inline_len();
        target.children.extend(current.children);
        target.normalize_inline();
        self.set_cursor(prev_path, join_at);
    }

    pub fn move_left(&mut self) {
        let offset = self.selection.head;
        if offset > 0 {
            self.set_cursor(self.selection.path.clone(), offset - 1);
        } else if let Some(prev) = self.neighbour_textblock(-1) {
            let len = self.node_at(&prev).map(Node::inline_len).unwrap_or(0);
            self.set_cursor(prev, len);
        }
    }

    pub fn move_right(&mut self) {
        let offset = self.selection.head;
        let len = self.current_block().map(Node::inline_len).unwrap_or(0);
        if offset < len {
            self.set_cursor(self.selection.path.clone(), offset + 1);
        } else if let Some(next) = self.neighbour_textblock(1) {
            self.set_cursor(next, 0);
        }
    }

    pub fn move_up(&mut self) {
        if let Some(prev) = self.neighbour_textblock(-1) {
            self.set_cursor(prev, self.selection.head);
        }
    }

    pub fn move_down(&mut self) {
        if let Some(next) = self.neighbour_textblock(1) {
            self.set_cursor(next, self.selection.head);
        }
    }

    pub fn move_home(&mut self) {
        self.set_cursor(self.selection.path.clone(), 0);
    }

    pub fn move_end(&mut self) {
        let len = self.current_block().map(Node::inline_len).unwrap_or(0);
        self.set_cursor(self.selection.path.clone(), len);
    }

    fn neighbour_textblock(&self, step: isize) -> Option<Vec<usize>> {
        let paths = self.textblock_paths();
        let current = paths.iter().position(|p| *p == self.selection.path)?;
        let target = current.checked_add_signed(step)?;
        paths.get(target).cloned()
    }

    /// Enter: splits the current textblock (or list item) at the cursor.
    pub fn split_block(&mut self) {
        self.delete_selection();
        let path = self.selection.path.clone();
        let offset = self.selection.head;
        let Some(block) = self.node_at(&path) else {
            return;
        };
        match block.kind {
            NodeKind::CodeBlock { .. } => {
                self.insert_text("\n");
                return;
            }
            NodeKind::TableCell { .. } => return,
            _ => {}
        }
        let Some((&index, parent_path)) = path.split_last() else {
            return;
        };
        let in_list_item = index == 0
            && self
                .node_at(parent_path)
                .is_some_and(|parent| parent.is_list_item());

        if in_list_item && block.inline_len() == 0 {
            self.lift_list_item(&parent_path[..parent_path.len() - 1]);
            return;
        }

        let Some(block) = self.node_at_mut(&path) else {
            return;
        };
        let tail = block.split_inline(offset);
        let kind = match block.kind {
            NodeKind::Heading { .. } if tail.is_empty() => NodeKind::Paragraph,
            ref other => other.clone(),
        };
        let new_block = Node::with_children(kind, tail);

        if in_list_item {
            let Some((&item_index, list_path)) = parent_path.split_last() else {
                return;
            };
            let Some(item) = self.node_at_mut(parent_path) else {
                return;
            };
            let item_kind = match item.kind {
                NodeKind::TaskItem { .. } => NodeKind::TaskItem { checked: false },
                _ => NodeKind::ListItem,
            };
            let mut children = vec![new_block];
            children.extend(item.children.split_off(1));
            let Some(list) = self.node_at_mut(list_path) else {
                return;
            };
            list.children
                .insert(item_index + 1, Node::with_children(item_kind, children));
            let mut cursor = list_path.to_vec();
            cursor.extend([item_index + 1, 0]);
            self.set_cursor(cursor, 0);
        } else {
            let Some(parent) = self.node_at_mut(parent_path) else {
                return;
            };
            parent.children.insert(index + 1, new_block);
            let mut cursor = parent_path.to_vec();
            cursor.push(index + 1);
            self.set_cursor(cursor, 0);
        }
    }

    // --- block commands ---

    pub fn set_heading(&mut self, level: u8) {
        let level = level.clamp(1, 6);
        self.retype_textblock(NodeKind::Heading { level });
    }

    pub fn set_paragraph(&mut self) {
        self.retype_textblock(NodeKind::Paragraph);
    }

    fn retype_textblock(&mut self, kind: NodeKind) {
        let path = self.selection.path.clone();
        if let Some(block) = self.node_at_mut(&path) {
            if matches!(block.kind, NodeKind::TableCell { .. }) {
                return;
            }
            block.kind = kind;
        }
    }

    pub fn toggle_code_block(&mut self) {
        let path = self.selection.path.clone();
        let offset = self.selection.head;
        let Some(block) = self.node_at_mut(&path) else {
            return;
        };
        match block.kind {
            NodeKind::CodeBlock { .. } => block.kind = NodeKind::Paragraph,
            NodeKind::TableCell { .. } => return,
            _ => {
                let text = block.text_content();
                block.kind = NodeKind::CodeBlock { language: None };
                block.children = if text.is_empty() {
                    Vec::new()
                } else {
                    vec![Node::text(text)]
                };
            }
        }
        self.set_cursor(path, offset);
    }

    pub fn toggle_list(&mut self, kind: ListKind) {
        let path = self.selection.path.clone();
        let list_depth = (0..path.len())
            .rev()
            .find(|&depth| self.node_at(&path[..depth]).is_some_and(Node::is_list));

        match list_depth {
            Some(depth) => {
                let list_path = path[..depth].to_vec();
                let same_kind = self
                    .node_at(&list_path)
                    .is_some_and(|list| kind.matches(&list.kind));
                if same_kind {
                    self.lift_list_item(&list_path);
                } else if let Some(list) = self.node_at_mut(&list_path) {
                    list.kind = kind.node_kind();
                    for item in &mut list.children {
                        if item.is_list_item() {
                            item.kind = kind.item_kind();
                        }
                    }
                }
            }
            None => {
                self.wrap_textblock(vec![kind.node_kind(), kind.item_kind()], 2);
            }
        }
    }

    pub fn toggle_blockquote(&mut self) {
        let path = self.selection.path.clone();
        let quote_depth = (0..path.len()).rev().find(|&depth| {
            self.node_at(&path[..depth])
                .is_some_and(|n| n.kind == NodeKind::Blockquote)
        });
        match quote_depth {
            Some(depth) => self.lift_out_of(&path[..depth].to_vec()),
            None => self.wrap_textblock(vec![NodeKind::Blockquote], 1),
        }
    }

    /// Replaces the current textblock with `wrappers[0] > wrappers[1] > ... > textblock`.
    fn wrap_textblock(&mut self, wrappers: Vec<NodeKind>, depth: usize) {
        let path = self.selection.path.clone();
        let offset = self.selection.head;
        let Some((&index, parent_path)) = path.split_last() else {
            return;
        };
        let Some(parent) = self.node_at_mut(parent_path) else {
            return;
        };
        if parent.kind == NodeKind::TableRow {
            return;
        }
        let block = parent.children.remove(index);
        let wrapped = wrappers
            .into_iter()
            .rev()
            .fold(block, |inner, kind| Node::with_children(kind, vec![inner]));
        parent.children.insert(index, wrapped);
        let mut cursor = path;
        cursor.extend(std::iter::repeat(0).take(depth));
        self.set_cursor(cursor, offset);
    }

    /// Moves the list item containing the cursor out of the list at `list_path`,
    /// splitting the list around it.
    fn lift_list_item(&mut self, list_path: &[usize]) {
        let path = self.selection.path.clone();
        let offset = self.selection.head;
        let Some((&list_index, parent_path)) = list_path.split_last() else {
            return;
        };
        let item_index = path[list_path.len()];
        let rel = path[list_path.len() + 1..].to_vec();

        let Some(list) = self.node_at_mut(list_path) else {
            return;
        };
        let list_kind = list.kind.clone();
        let item = list.children.remove(item_index);
        let after = list.children.split_off(item_index);
        let before_empty = list.children.is_empty();

        let Some(parent) = self.node_at_mut(parent_path) else {
            return;
        };
        let insert_at = if before_empty {
            parent.children.remove(list_index);
            list_index
        } else {
            list_index + 1
        };
        let lifted = item.children.len();
        parent
            .children
            .splice(insert_at..insert_at, item.children);
        if !after.is_empty() {
            let after_kind = match list_kind {
                NodeKind::OrderedList { start } => NodeKind::OrderedList {
                    start: start + (item_index as u64) + 1,
                },
                other => other,
            };
            parent
                .children
                .insert(insert_at + lifted, Node::with_children(after_kind, after));
        }

        let mut cursor = parent_path.to_vec();
        if let Some((&first, rest)) = rel.split_first() {
            cursor.push(insert_at + first);
            cursor.extend_from_slice(rest);
        }
        self.set_cursor(cursor, offset);
    }

    /// Moves the child of the wrapper at `wrapper_path` that holds the cursor out of it.
    fn lift_out_of(&mut self, wrapper_path: &[usize]) {
        let path = self.selection.path.clone();
        let offset = self.selection.head;
        let Some((&wrapper_index, parent_path)) = wrapper_path.split_last() else {
            return;
        };
        let child_index = path[wrapper_path.len()];
        let rel = path[wrapper_path.len() + 1..].to_vec();

        let Some(wrapper) = self.node_at_mut(wrapper_path) else {
            return;
        };
        let wrapper_kind = wrapper.kind.clone();
        let after = wrapper.children.split_off(child_index + 1);
        let Some(child) = wrapper.children.pop() else {
            return;
        };
        let before_empty = wrapper.children.is_empty();

        let Some(parent) = self.node_at_mut(parent_path) else {
            return;
        };
        let insert_at = if before_empty {
            parent.children.remove(wrapper_index);
            wrapper_index
        } else {
            wrapper_index + 1
        };
        parent.children.insert(insert_at, child);
        if !after.is_empty() {
            parent
                .children
                .insert(insert_at + 1, Node::with_children(wrapper_kind, after));
        }

        let mut cursor = parent_path.to_vec();
        cursor.push(insert_at);
        cursor.extend(rel);
        self.set_cursor(cursor, offset);
    }

    pub fn insert_horizontal_rule(&mut self) {
        self.insert_leaf_block(Node::new(NodeKind::HorizontalRule));
    }

    pub fn set_image(&mut self, src: &str, alt: Option<&str>) {
        self.insert_leaf_block(Node::new(NodeKind::Image {
            src: src.to_string(),
            alt: alt.map(str::to_string),
        }));
    }

    /// Splits the current textblock at the cursor and puts `leaf` between the halves,
    /// leaving the cursor in the textblock after it.
    fn insert_leaf_block(&mut self, leaf: Node) {
        self.delete_selection();
        let path = self.selection.path.clone();
        let offset = self.selection.head;
        let Some((&index, parent_path)) = path.split_last() else {
            return;
        };
        let Some(block) = self.node_at_mut(&path) else {
            return;
        };
        if matches!(block.kind, NodeKind::TableCell { .. }) {
            return;
        }
        let tail = block.split_inline(offset);
        let head_empty = block.inline_len() == 0;
        let Some(parent) = self.node_at_mut(parent_path) else {
            return;
        };
        let insert_at = if head_empty {
            parent.children.remove(index);
            index
        } else {
            index + 1
        };
        parent.children.insert(insert_at, leaf);
        parent
            .children
            .insert(insert_at + 1, Node::with_children(NodeKind::Paragraph, tail));
        let mut cursor = parent_path.to_vec();
        cursor.push(insert_at + 1);
        self.set_cursor(cursor, 0);
    }

    /// Replaces `range` of the textblock at `path` with a mention atom and a trailing space.
    pub fn insert_mention(&mut self, path: &[usize], range: Range<usize>, id: &str, label: &str) {
        if !self.delete_range(path, range.clone()) {
            return;
        }
        if let Some(block) = self.node_at_mut(path) {
            block.insert_inline(range.start, vec![Node::mention(id, label), Node::text(" ")]);
        }
        self.set_cursor(path.to_vec(), range.start + 2);
    }

    /// Shift-Enter: leave the enclosing block for a fresh top-level paragraph.
    /// Returns false when the cursor already sits in a top-level paragraph.
    pub fn exit_block(&mut self) -> bool {
        let Some(&top) = self.selection.path.first() else {
            return false;
        };
        let top_is_paragraph = self
            .doc
            .children
            .get(top)
            .is_some_and(|n| n.kind == NodeKind::Paragraph);
        if self.selection.path.len() == 1 && top_is_paragraph {
            return false;
        }
        self.doc.children.insert(top + 1, Node::paragraph(""));
        self.set_cursor(vec![top + 1], 0);
        true
    }

    /// Replaces the selection with `fragment`. A lone paragraph is spliced inline;
    /// block content splits the current textblock around it.
    pub fn replace_selection(&mut self, fragment: Fragment) {
        self.delete_selection();
        let mut nodes = wrap_inline_runs(fragment.into_nodes());
        if nodes.is_empty() {
            return;
        }
        let path = self.selection.path.clone();
        let offset = self.selection.head;
        let Some(block) = self.node_at(&path) else {
            return;
        };

        let single_paragraph = nodes.len() == 1 && nodes[0].kind == NodeKind::Paragraph;
        let plain_target = matches!(
            block.kind,
            NodeKind::CodeBlock { .. } | NodeKind::TableCell { .. }
        );
        if single_paragraph || plain_target {
            let inline = if single_paragraph {
                nodes.remove(0).children
            } else {
                let text = nodes
                    .iter()
                    .map(Node::text_content)
                    .collect::<Vec<_>>()
                    .join("\n");
                vec![Node::text(text)]
            };
            let len: usize = inline.iter().map(Node::inline_len).sum();
            if let Some(block) = self.node_at_mut(&path) {
                block.insert_inline(offset, inline);
            }
            self.set_cursor(path, offset + len);
            return;
        }

        let Some((&index, parent_path)) = path.split_last() else {
            return;
        };
        let Some(block) = self.node_at_mut(&path) else {
            return;
        };
        let tail = block.split_inline(offset);
        let head_empty = block.inline_len() == 0;
        let tail_kind = match block.kind {
            NodeKind::Heading { .. } => NodeKind::Paragraph,
            ref other => other.clone(),
        };

        let Some(parent) = self.node_at_mut(parent_path) else {
            return;
        };
        let insert_at = if head_empty {
            parent.children.remove(index);
            index
        } else {
            index + 1
        };
        let count = nodes.len();
        let last_textblock = nodes
            .last()
            .and_then(|last| last_textblock_path(std::slice::from_ref(last)));
        parent.children.splice(insert_at..insert_at, nodes);
        let after = insert_at + count;

        let mut cursor = parent_path.to_vec();
        match last_textblock {
            Some(rel) if tail.is_empty() => {
                cursor.push(after - 1);
                cursor.extend_from_slice(&rel[1..]);
                let len = self.node_at(&cursor).map(Node::inline_len).unwrap_or(0);
                self.set_cursor(cursor, len);
            }
            _ => {
                if let Some(parent) = self.node_at_mut(parent_path) {
                    parent
                        .children
                        .insert(after, Node::with_children(tail_kind, tail));
                }
                cursor.push(after);
                self.set_cursor(cursor, 0);
            }
        }
        debug!(inserted = count, "replaced selection with fragment");
    }
}

/// Wraps consecutive inline nodes into paragraphs so every top-level node is a block.
fn wrap_inline_runs(nodes: Vec<Node>) -> Vec<Node> {
    let mut blocks = Vec::with_capacity(nodes.len());
    let mut run: Vec<Node> = Vec::new();
    for node in nodes {
        if node.is_inline() {
            run.push(node);
            continue;
        }
        if !run.is_empty() {
            blocks.push(Node::with_children(
                NodeKind::Paragraph,
                std::mem::take(&mut run),
            ));
        }
        blocks.push(node);
    }
    if !run.is_empty() {
        blocks.push(Node::with_children(NodeKind::Paragraph, run));
    }
    blocks
}

/// Path (relative to `nodes`) of the last textblock, searching depth-first from the end.
fn last_textblock_path(nodes: &[Node]) -> Option<Vec<usize>> {
    for (i, node) in nodes.iter().enumerate().rev() {
        if node.is_textblock() {
            return Some(vec![i]);
        }
        if let Some(mut rest) = last_textblock_path(&node.children) {
            rest.insert(0, i);
            return Some(rest);
        }
    }
    None
}
