// Chat command parsing

/// A chat line, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// `/<name> <args>`; `args` is the trimmed remainder and may be empty
    Invoke {
        name: String,
        args: String,
    },
    /// Ordinary chat text, not addressed to the bot
    NotCommand,
}

pub fn parse_chat_line(line: &str) -> ChatCommand {
    let line = line.trim();

    let Some(body) = line.strip_prefix('/') else {
        return ChatCommand::NotCommand;
    };

    let (name, args) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    if name.is_empty() {
        return ChatCommand::NotCommand;
    }

    ChatCommand::Invoke {
        name: name.to_string(),
        args: args.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoke(name: &str, args: &str) -> ChatCommand {
        ChatCommand::Invoke { name: name.to_string(), args: args.to_string() }
    }

    #[test]
    fn test_price_command_keeps_full_argument() {
        assert_eq!(
            parse_chat_line("/查价格 AK-47 | 红线 (久经沙场)"),
            invoke("查价格", "AK-47 | 红线 (久经沙场)")
        );
        assert_eq!(parse_chat_line("  /price   ak-47  \r\n"), invoke("price", "ak-47"));
    }

    #[test]
    fn test_command_without_argument() {
        assert_eq!(parse_chat_line("/查价格"), invoke("查价格", ""));
        assert_eq!(parse_chat_line("/help"), invoke("help", ""));
        assert_eq!(parse_chat_line("/price \t "), invoke("price", ""));
    }

    #[test]
    fn test_plain_chat_is_not_a_command() {
        assert_eq!(parse_chat_line("hello there"), ChatCommand::NotCommand);
        assert_eq!(parse_chat_line(""), ChatCommand::NotCommand);
        assert_eq!(parse_chat_line("/"), ChatCommand::NotCommand);
        assert_eq!(parse_chat_line("/ price"), ChatCommand::NotCommand);
    }
}
