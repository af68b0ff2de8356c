use super::types::{SlashAction, SlashCommand};

pub(super) const CMD: SlashCommand = SlashCommand {
    title: "Horizontal Rule",
    description: "Visual divider",
    icon: "―",
    action: SlashAction::HorizontalRule,
};
