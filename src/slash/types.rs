use crate::suggest::MenuEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct SlashCommand {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub action: SlashAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashAction {
    SetHeading(u8),
    ToggleBulletList,
    ToggleOrderedList,
    ToggleTaskList,
    ToggleBlockquote,
    ToggleCodeBlock,
    HorizontalRule,
    Image,
}

impl MenuEntry for SlashCommand {
    fn title(&self) -> &str {
        self.title
    }

    fn detail(&self) -> Option<&str> {
        Some(self.description)
    }

    fn icon(&self) -> Option<&str> {
        Some(self.icon)
    }
}
