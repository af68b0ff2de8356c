use super::types::{SlashAction, SlashCommand};

pub(super) const CMD: SlashCommand = SlashCommand {
    title: "Code Block",
    description: "Fenced code snippet",
    icon: "{}",
    action: SlashAction::ToggleCodeBlock,
};
