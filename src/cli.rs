use anyhow::{Context, Result};

use reedline::{DefaultHinter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

use crate::agent::prompt::EXAMPLE_REQUEST;
use crate::agent::{Agent, LlmClient};
use crate::config::{Config, Credentials};
use crate::tools::{ToolRegistry, Workspace};

/// 交互模式下的斜杠命令
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Clear,
    Tools,
    Help,
    Unknown(String),
}

fn parse_command(input: &str) -> Option<Command> {
    if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
        return Some(Command::Quit);
    }
    if !input.starts_with('/') {
        return None;
    }

    let cmd = input
        .split_whitespace()
        .next()
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    Some(match cmd.as_str() {
        "/quit" | "/exit" | "/q" => Command::Quit,
        "/clear" => Command::Clear,
        "/tools" => Command::Tools,
        "/help" | "/h" => Command::Help,
        _ => Command::Unknown(input.to_string()),
    })
}

fn print_help() {
    println!("Commands:");
    println!("  /clear  - reset the conversation");
    println!("  /tools  - list registered tools");
    println!("  /help   - show this help");
    println!("  /quit   - exit (or Ctrl-D)");
    println!();
}

fn print_banner(agent: &Agent, workspace: &Workspace) {
    println!("Registered tools: {:?}", agent.tools().names());
    println!("🚀 Infra-Architect is online.");
    println!("📂 Project directory: {}", workspace.root().display());
    println!("🤖 Model: {}", agent.config().model);
    println!("Try: '{}'", EXAMPLE_REQUEST);
    println!("Type /help for commands.\n");
}

/// 构造 agent：工作目录在这里一次性确定，然后显式传给工具
fn build_agent(credentials: Credentials) -> Result<(Agent, Workspace)> {
    let config = Config::load_default()?;
    let agent_config = config.agent.with_env_overrides();

    let workspace = Workspace::current_dir().context("failed to resolve working directory")?;
    let tools = ToolRegistry::with_builtins(workspace.clone())?;
    let client = LlmClient::new(agent_config.clone(), credentials)?;

    Ok((Agent::new(agent_config, Box::new(client), tools), workspace))
}

/// 主入口函数：交互式对话，直到用户退出
pub async fn run_cli(credentials: Credentials) -> Result<()> {
    let (mut agent, workspace) = build_agent(credentials)?;
    print_banner(&agent, &workspace);

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("infra".to_string()),
        DefaultPromptSegment::Empty,
    );
    let mut line_editor = Reedline::create().with_hinter(Box::new(DefaultHinter::default()));

    loop {
        let sig = line_editor
            .read_line(&prompt)
            .context("failed to read from terminal")?;

        match sig {
            Signal::Success(buffer) => {
                let input = buffer.trim();

                if input.is_empty() {
                    continue;
                }

                match parse_command(input) {
                    Some(Command::Quit) => {
                        println!("👋 Bye!");
                        break;
                    }
                    Some(Command::Clear) => {
                        agent.clear_history();
                        println!("✅ Conversation cleared\n");
                    }
                    Some(Command::Tools) => {
                        for tool in agent.tools().definitions() {
                            println!("  {} - {}", tool.function.name, tool.function.description);
                        }
                        println!();
                    }
                    Some(Command::Help) => print_help(),
                    Some(Command::Unknown(cmd)) => {
                        println!("❌ Unknown command: {}", cmd);
                        println!("Type /help for commands\n");
                    }
                    None => {
                        let reply = agent.chat(input).await;
                        println!("🤖 {}\n", reply);
                    }
                }
            }
            Signal::CtrlD => {
                println!("\n👋 Bye!");
                break;
            }
            Signal::CtrlC => {
                println!("\nType /quit to exit, or keep asking");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_command("Create a Dockerfile"), None);
        assert_eq!(parse_command("exit the container on failure"), None);
    }

    #[test]
    fn recognises_commands() {
        assert_eq!(parse_command("/quit"), Some(Command::Quit));
        assert_eq!(parse_command("EXIT"), Some(Command::Quit));
        assert_eq!(parse_command("/Clear"), Some(Command::Clear));
        assert_eq!(parse_command("/tools"), Some(Command::Tools));
        assert_eq!(parse_command("/h"), Some(Command::Help));
        assert_eq!(
            parse_command("/deploy prod"),
            Some(Command::Unknown("/deploy prod".to_string()))
        );
    }
}
