use crate::config::{ HELP_COMMAND, HELP_COMMAND_ALIAS };
use crate::plugins::CommandRegistry;

pub fn generate_help_response(registry: &CommandRegistry) -> String {
    let mut output = String::new();

    output.push_str("Buff163 价格查询机器人 - 命令列表\n");
    output.push_str("-".repeat(20).as_str());
    output.push('\n');

    for plugin in registry.plugins() {
        output.push_str(&plugin.usage());
        output.push('\n');
    }

    output.push_str(&format!("/{}   显示本帮助 (别名 /{})\n", HELP_COMMAND, HELP_COMMAND_ALIAS));
    output
}

pub fn unknown_command_response(name: &str) -> String {
    format!("未知命令 /{}，发送 /{} 查看可用命令。", name, HELP_COMMAND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::price::PricePlugin;
    use std::sync::Arc;

    #[test]
    fn test_help_lists_registered_plugins() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(PricePlugin::disabled())).unwrap();

        let help = generate_help_response(&registry);
        assert!(help.contains("/查价格 <饰品名称>"));
        assert!(help.ends_with("/help   显示本帮助 (别名 /帮助)\n"));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(unknown_command_response("foo"), "未知命令 /foo，发送 /help 查看可用命令。");
    }
}
