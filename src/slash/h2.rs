use super::types::{SlashAction, SlashCommand};

pub(super) const CMD: SlashCommand = SlashCommand {
    title: "Heading 2",
    description: "Medium section heading",
    icon: "H2",
    action: SlashAction::SetHeading(2),
};
