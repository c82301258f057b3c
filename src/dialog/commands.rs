//! Slash-command parsing.

/// Commands available in every state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Cancel,
    Profile,
    UpdateWeight,
    NewPlan,
    Exercises,
    /// Anything else starting with `/`. Holds the normalized name.
    Unknown(String),
}

/// Parses inbound text into a [`Command`].
pub struct CommandParser;

impl CommandParser {
    /// Parse message content. Returns `None` when the text is not a command.
    ///
    /// Matching is case-insensitive; a `@botname` suffix and trailing
    /// arguments are ignored (`/Start@FitBot now` is `/start`).
    pub fn parse(content: &str) -> Option<Command> {
        let trimmed = content.trim();
        if !trimmed.starts_with('/') {
            return None;
        }

        let head = trimmed.split_whitespace().next().unwrap_or(trimmed);
        let name = head.split('@').next().unwrap_or(head).to_lowercase();

        Some(match name.as_str() {
            "/start" => Command::Start,
            "/cancel" => Command::Cancel,
            "/profile" => Command::Profile,
            "/update_weight" => Command::UpdateWeight,
            "/new_plan" => Command::NewPlan,
            "/exercises" => Command::Exercises,
            _ => Command::Unknown(name),
        })
    }
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Self::Start => "/start",
            Self::Cancel => "/cancel",
            Self::Profile => "/profile",
            Self::UpdateWeight => "/update_weight",
            Self::NewPlan => "/new_plan",
            Self::Exercises => "/exercises",
            Self::Unknown(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_commands() {
        assert_eq!(CommandParser::parse("/start"), Some(Command::Start));
        assert_eq!(CommandParser::parse("/cancel"), Some(Command::Cancel));
        assert_eq!(CommandParser::parse("/profile"), Some(Command::Profile));
        assert_eq!(
            CommandParser::parse("/update_weight"),
            Some(Command::UpdateWeight)
        );
        assert_eq!(CommandParser::parse("/new_plan"), Some(Command::NewPlan));
        assert_eq!(CommandParser::parse("/exercises"), Some(Command::Exercises));
    }

    #[test]
    fn parse_is_case_insensitive_and_trimmed() {
        assert_eq!(CommandParser::parse("  /START  "), Some(Command::Start));
        assert_eq!(CommandParser::parse("/New_Plan"), Some(Command::NewPlan));
    }

    #[test]
    fn parse_strips_bot_suffix_and_args() {
        assert_eq!(
            CommandParser::parse("/start@FitnessHelperBot"),
            Some(Command::Start)
        );
        assert_eq!(CommandParser::parse("/profile please"), Some(Command::Profile));
    }

    #[test]
    fn parse_unknown_command() {
        assert_eq!(
            CommandParser::parse("/Help"),
            Some(Command::Unknown("/help".into()))
        );
        assert_eq!(CommandParser::parse("/"), Some(Command::Unknown("/".into())));
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(CommandParser::parse("Мужской"), None);
        assert_eq!(CommandParser::parse("30"), None);
        assert_eq!(CommandParser::parse("start"), None);
        assert_eq!(CommandParser::parse(""), None);
    }

    #[test]
    fn name_roundtrips_through_parse() {
        for cmd in [
            Command::Start,
            Command::Cancel,
            Command::Profile,
            Command::UpdateWeight,
            Command::NewPlan,
            Command::Exercises,
        ] {
            assert_eq!(CommandParser::parse(cmd.name()), Some(cmd));
        }
    }
}
