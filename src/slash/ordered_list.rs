use super::types::{SlashAction, SlashCommand};

pub(super) const CMD: SlashCommand = SlashCommand {
    title: "Ordered List",
    description: "Numbered list of items",
    icon: "1.",
    action: SlashAction::ToggleOrderedList,
};
