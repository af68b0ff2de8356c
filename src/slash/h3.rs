use super::types::{SlashAction, SlashCommand};

pub(super) const CMD: SlashCommand = SlashCommand {
    title: "Heading 3",
    description: "Small section heading",
    icon: "H3",
    action: SlashAction::SetHeading(3),
};
