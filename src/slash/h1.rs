use super::types::{SlashAction, SlashCommand};

pub(super) const CMD: SlashCommand = SlashCommand {
    title: "Heading 1",
    description: "Large section heading",
    icon: "H1",
    action: SlashAction::SetHeading(1),
};
