//! Sanitized HTML → structural fragment.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::document::{Fragment, Mark, Node, NodeKind};

/// Parses `html` and maps the body content onto document nodes. Unknown
/// elements contribute their children; whitespace-only paragraphs are dropped.
pub fn html_to_fragment(html: &str) -> Fragment {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    match find_element(&dom.document, "body") {
        Some(body) => Fragment::new(blocks(&body)),
        None => Fragment::default(),
    }
}

fn element_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn attr(handle: &Handle, key: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == key)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if element_name(handle) == Some(tag) {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "ul"
            | "ol"
            | "li"
            | "blockquote"
            | "pre"
            | "hr"
            | "img"
            | "table"
            | "div"
            | "section"
            | "article"
    )
}

/// Block content of `handle`. Runs of inline children become paragraphs.
fn blocks(handle: &Handle) -> Vec<Node> {
    let mut out = Vec::new();
    let mut run = Vec::new();
    for child in handle.children.borrow().iter() {
        match element_name(child) {
            Some(tag) if is_block_tag(tag) => {
                flush_paragraph(&mut run, &mut out);
                block(tag, child, &mut out);
            }
            _ => inlines(child, &[], &mut run),
        }
    }
    flush_paragraph(&mut run, &mut out);
    out
}

fn flush_paragraph(run: &mut Vec<Node>, out: &mut Vec<Node>) {
    let children = trim_inline(std::mem::take(run));
    if !children.is_empty() {
        out.push(Node::with_children(NodeKind::Paragraph, children));
    }
}

fn block(tag: &str, handle: &Handle, out: &mut Vec<Node>) {
    match tag {
        "p" | "div" | "section" | "article" | "li" => out.extend(blocks(handle)),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse().unwrap_or(1);
            out.push(Node::with_children(
                NodeKind::Heading { level },
                inline_content(handle),
            ));
        }
        "ul" | "ol" => out.push(list(tag, handle)),
        "blockquote" => {
            let children = blocks(handle);
            if !children.is_empty() {
                out.push(Node::with_children(NodeKind::Blockquote, children));
            }
        }
        "pre" => out.push(code_block(handle)),
        "hr" => out.push(Node::new(NodeKind::HorizontalRule)),
        "img" => {
            if let Some(src) = attr(handle, "src").filter(|s| !s.is_empty()) {
                let alt = attr(handle, "alt").filter(|a| !a.is_empty());
                out.push(Node::new(NodeKind::Image { src, alt }));
            }
        }
        "table" => out.push(table(handle)),
        _ => {}
    }
}

fn list(tag: &str, handle: &Handle) -> Node {
    let items: Vec<Handle> = handle
        .children
        .borrow()
        .iter()
        .filter(|c| element_name(c) == Some("li"))
        .cloned()
        .collect();
    let checkboxes: Vec<Option<bool>> = items.iter().map(task_checkbox).collect();
    let is_task = !items.is_empty() && checkboxes.iter().all(Option::is_some);

    let kind = if is_task {
        NodeKind::TaskList
    } else if tag == "ol" {
        let start = attr(handle, "start")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        NodeKind::OrderedList { start }
    } else {
        NodeKind::BulletList
    };

    let children = items
        .iter()
        .zip(checkboxes)
        .map(|(item, checked)| {
            let mut content = blocks(item);
            if content.is_empty() {
                content.push(Node::paragraph(""));
            }
            let kind = match checked {
                Some(checked) if is_task => NodeKind::TaskItem { checked },
                _ => NodeKind::ListItem,
            };
            Node::with_children(kind, content)
        })
        .collect();
    Node::with_children(kind, children)
}

/// `Some(checked)` when the item carries a checkbox before any text.
fn task_checkbox(item: &Handle) -> Option<bool> {
    fn first_input(handle: &Handle) -> Option<Handle> {
        for child in handle.children.borrow().iter() {
            match &child.data {
                NodeData::Text { contents } if !contents.borrow().trim().is_empty() => {
                    return None
                }
                NodeData::Element { .. } if element_name(child) == Some("input") => {
                    return Some(child.clone())
                }
                NodeData::Element { .. } => {
                    if let Some(found) = first_input(child) {
                        return Some(found);
                    }
                }
                _ => {}
            }
        }
        None
    }
    let input = first_input(item)?;
    if attr(&input, "type").as_deref() != Some("checkbox") {
        return None;
    }
    Some(attr(&input, "checked").is_some())
}

fn code_block(pre: &Handle) -> Node {
    let code = find_element(pre, "code");
    let language = code
        .as_ref()
        .and_then(|c| attr(c, "class"))
        .and_then(|class| {
            class
                .split_whitespace()
                .find_map(|c| c.strip_prefix("language-").map(str::to_string))
        });
    let mut text = String::new();
    collect_text(code.as_ref().unwrap_or(pre), &mut text);
    if text.ends_with('\n') {
        text.pop();
    }
    let children = if text.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(text)]
    };
    Node::with_children(NodeKind::CodeBlock { language }, children)
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}

fn table(handle: &Handle) -> Node {
    let mut rows = Vec::new();
    collect_rows(handle, &mut rows);
    Node::with_children(NodeKind::Table, rows)
}

fn collect_rows(handle: &Handle, rows: &mut Vec<Node>) {
    for child in handle.children.borrow().iter() {
        match element_name(child) {
            Some("tr") => {
                let cells = child
                    .children
                    .borrow()
                    .iter()
                    .filter_map(|cell| {
                        let header = match element_name(cell)? {
                            "th" => true,
                            "td" => false,
                            _ => return None,
                        };
                        Some(Node::with_children(
                            NodeKind::TableCell { header },
                            inline_content(cell),
                        ))
                    })
                    .collect();
                rows.push(Node::with_children(NodeKind::TableRow, cells));
            }
            Some("thead" | "tbody" | "tfoot") => collect_rows(child, rows),
            _ => {}
        }
    }
}

/// Trimmed inline content of `handle`, ignoring nested blocks' structure.
fn inline_content(handle: &Handle) -> Vec<Node> {
    let mut run = Vec::new();
    for child in handle.children.borrow().iter() {
        inlines(child, &[], &mut run);
    }
    trim_inline(run)
}

fn inlines(handle: &Handle, marks: &[Mark], out: &mut Vec<Node>) {
    let tag = match &handle.data {
        NodeData::Text { contents } => {
            let text = collapse_whitespace(&contents.borrow());
            if !text.is_empty() {
                out.push(Node::marked_text(text, marks.to_vec()));
            }
            return;
        }
        NodeData::Element { .. } => element_name(handle).unwrap_or_default(),
        _ => return,
    };
    let mark = match tag {
        "br" => {
            out.push(Node::new(NodeKind::HardBreak));
            return;
        }
        "input" | "img" | "script" | "style" => return,
        "strong" | "b" => Some(Mark::Bold),
        "em" | "i" => Some(Mark::Italic),
        "del" | "s" | "strike" => Some(Mark::Strike),
        "code" => Some(Mark::Code),
        "a" => attr(handle, "href").map(|href| Mark::Link { href }),
        _ => None,
    };
    let mut marks = marks.to_vec();
    if let Some(mark) = mark {
        if !marks.contains(&mark) {
            marks.push(mark);
        }
    }
    for child in handle.children.borrow().iter() {
        inlines(child, &marks, out);
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Drops whitespace at the edges of the run and around hard breaks, then merges
/// adjacent text with identical marks.
fn trim_inline(nodes: Vec<Node>) -> Vec<Node> {
    let mut nodes: Vec<Node> = nodes;
    let len = nodes.len();
    for i in 0..len {
        let at_start = i == 0 || matches!(nodes[i - 1].kind, NodeKind::HardBreak);
        let at_end = i + 1 == len || matches!(nodes[i + 1].kind, NodeKind::HardBreak);
        if let NodeKind::Text { text } = &mut nodes[i].kind {
            if at_start {
                *text = text.trim_start().to_string();
            }
            if at_end {
                *text = text.trim_end().to_string();
            }
        }
    }
    // Whitespace carried over from a previous text node.
    for i in 1..len {
        let prev_ends_space = match &nodes[i - 1].kind {
            NodeKind::Text { text } => text.ends_with(' '),
            _ => false,
        };
        if prev_ends_space {
            if let NodeKind::Text { text } = &mut nodes[i].kind {
                *text = text.trim_start().to_string();
            }
        }
    }
    nodes.retain(|n| !matches!(&n.kind, NodeKind::Text { text } if text.is_empty()));
    while nodes
        .last()
        .is_some_and(|n| matches!(n.kind, NodeKind::HardBreak))
    {
        nodes.pop();
    }
    let mut holder = Node::with_children(NodeKind::Paragraph, nodes);
    holder.normalize_inline();
    holder.children
}
