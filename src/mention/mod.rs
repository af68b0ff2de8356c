//! The `@` mention menu.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::suggest::{InsertionContext, MenuEntry, QueryContext, SuggestionAdapter, TriggerConfig};

pub const MAX_SUGGESTIONS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub label: String,
}

impl Member {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl MenuEntry for Member {
    fn title(&self) -> &str {
        &self.label
    }
}

/// Mention suggestions over a member list that can be replaced while the editor runs.
#[derive(Debug)]
pub struct MentionMenu {
    members: RefCell<Vec<Member>>,
    max_suggestions: usize,
}

impl Default for MentionMenu {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MentionMenu {
    pub fn new(members: Vec<Member>) -> Self {
        Self {
            members: RefCell::new(members),
            max_suggestions: MAX_SUGGESTIONS,
        }
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn set_members(&self, members: Vec<Member>) {
        *self.members.borrow_mut() = members;
    }

    pub fn members(&self) -> Vec<Member> {
        self.members.borrow().clone()
    }

    /// Members whose label contains `query` (ignoring case), capped at the suggestion limit.
    pub fn filter(&self, query: &str) -> Vec<Member> {
        let q = query.to_lowercase();
        self.members
            .borrow()
            .iter()
            .filter(|m| m.label.to_lowercase().contains(&q))
            .take(self.max_suggestions)
            .cloned()
            .collect()
    }
}

impl SuggestionAdapter for MentionMenu {
    type Item = Member;

    fn trigger(&self) -> TriggerConfig {
        TriggerConfig::new('@')
    }

    fn items(&self, ctx: &QueryContext<'_>) -> Vec<Member> {
        self.filter(ctx.query)
    }

    fn command(&self, item: &Member, ctx: &InsertionContext) {
        ctx.apply(|editor, range| {
            editor.insert_mention(&range.path, range.range.clone(), &item.id, &item.label)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Editor, EditorHandle, Fragment, Node, NodeKind};
    use crate::suggest::TriggerRange;

    fn team(n: usize) -> Vec<Member> {
        (0..n)
            .map(|i| Member::new(format!("u{i}"), format!("Member {i}")))
            .collect()
    }

    #[test]
    fn filter_matches_label_case_insensitively() {
        let menu = MentionMenu::new(vec![
            Member::new("1", "Ana Lima"),
            Member::new("2", "Bruno"),
            Member::new("3", "Luana"),
        ]);
        let labels: Vec<String> = menu.filter("AN").into_iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["Ana Lima", "Luana"]);
    }

    #[test]
    fn filter_caps_suggestions() {
        let menu = MentionMenu::new(team(20));
        assert_eq!(menu.filter("").len(), MAX_SUGGESTIONS);
        let menu = MentionMenu::new(team(20)).with_max_suggestions(3);
        assert_eq!(menu.filter("member").len(), 3);
    }

    #[test]
    fn members_can_be_replaced() {
        let menu = MentionMenu::default();
        assert!(menu.filter("").is_empty());
        menu.set_members(team(2));
        assert_eq!(menu.members().len(), 2);
        assert_eq!(menu.filter("1")[0].id, "u1");
    }

    #[test]
    fn command_inserts_mention_and_space() {
        let handle = EditorHandle::new(Editor::from_fragment(Fragment::new(vec![
            Node::paragraph("hi @an"),
        ])));
        let ctx = InsertionContext {
            editor: handle.downgrade(),
            range: TriggerRange {
                path: vec![0],
                range: 3..6,
            },
            trigger: '@',
        };
        MentionMenu::default().command(&Member::new("u1", "ana"), &ctx);
        let editor = handle.borrow();
        let paragraph = &editor.doc().children[0];
        assert!(paragraph.children.iter().any(|n| n.kind
            == NodeKind::Mention {
                id: "u1".into(),
                label: "ana".into()
            }));
        assert_eq!(paragraph.text_content(), "hi @ana ");
    }
}
