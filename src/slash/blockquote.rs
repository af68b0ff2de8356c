use super::types::{SlashAction, SlashCommand};

pub(super) const CMD: SlashCommand = SlashCommand {
    title: "Blockquote",
    description: "Quoted text block",
    icon: "❝",
    action: SlashAction::ToggleBlockquote,
};
