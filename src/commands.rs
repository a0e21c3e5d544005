//! Slash command parsing and handling
//!
//! Parses commands like /tag, /untag, /clear from the discover prompt.
//! Anything that is not a command is search text.

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a tag filter: /tag <name>
    Tag { name: String },
    /// Remove a tag filter: /untag <name>
    Untag { name: String },
    /// Clear prompt, tag filters and results: /clear
    Clear,
    /// Show the tag catalogue: /tags
    Tags,
    /// Show help: /help
    Help,
    /// Usage error or unknown command, shown to the user
    Invalid { message: String },
    /// Not a command: free search text (may be empty)
    Search { text: String },
}

impl Command {
    /// Parse user input into a command
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if !input.starts_with('/') {
            return Command::Search { text: input.to_string() };
        }

        let parts: Vec<&str> = input.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match cmd.as_str() {
            "/tag" | "/t" => {
                if args.is_empty() {
                    Command::Invalid {
                        message: "Usage: /tag <name>".to_string(),
                    }
                } else {
                    // Tags are case-sensitive; keep the argument as typed
                    Command::Tag { name: args.to_string() }
                }
            }
            "/untag" | "/u" => {
                if args.is_empty() {
                    Command::Invalid {
                        message: "Usage: /untag <name>".to_string(),
                    }
                } else {
                    Command::Untag { name: args.to_string() }
                }
            }
            "/clear" | "/cl" => Command::Clear,
            "/tags" => Command::Tags,
            "/help" | "/h" | "/?" => Command::Help,
            _ => Command::Invalid {
                message: format!("Unknown command: {}. Type /help for available commands.", cmd),
            },
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r#"Available Commands:
/tag <name>      - Add a tag filter
/untag <name>    - Remove a tag filter
/clear           - Clear search text, tags and results
/tags            - Show available tags
/help            - Show this help

Tip: Type search text and press Enter. Selected tags narrow the results."#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        match Command::parse("/tag Synthwave") {
            Command::Tag { name } => assert_eq!(name, "Synthwave"),
            other => panic!("Expected Tag command, got {:?}", other),
        }
        assert_eq!(
            Command::parse("/t lofi"),
            Command::Tag { name: "lofi".to_string() }
        );
    }

    #[test]
    fn test_parse_untag() {
        assert_eq!(
            Command::parse("/untag retro"),
            Command::Untag { name: "retro".to_string() }
        );
    }

    #[test]
    fn test_parse_usage_errors() {
        assert!(matches!(Command::parse("/tag"), Command::Invalid { .. }));
        assert!(matches!(Command::parse("/untag   "), Command::Invalid { .. }));
        assert!(matches!(Command::parse("/nope"), Command::Invalid { .. }));
    }

    #[test]
    fn test_parse_clear() {
        match Command::parse("/clear") {
            Command::Clear => {}
            _ => panic!("Expected Clear command"),
        }
        assert_eq!(Command::parse("/TAGS"), Command::Tags);
    }

    #[test]
    fn test_parse_search() {
        match Command::parse("  night drive ") {
            Command::Search { text } => assert_eq!(text, "night drive"),
            _ => panic!("Expected Search"),
        }
        assert_eq!(Command::parse(""), Command::Search { text: String::new() });
    }
}
