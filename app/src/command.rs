//! Terminal commands.
//!
//! One line of input is one command. The first word selects the command,
//! the rest are its arguments; titles keep their inner spacing.

use crate::error::CommandError;
use crate::types::{TaskAction, TaskId};
use std::str::FromStr;

/// A parsed terminal command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `add <title>`
    Add(String),
    /// `toggle <id>` / `done <id>`
    Toggle(TaskId),
    /// `edit <id> <title>`
    Edit(TaskId, String),
    /// `rm <id>` / `remove <id>`
    Remove(TaskId),
    /// `dismiss`
    Dismiss,
    /// `ls`
    List,
    /// `json`
    Json,
    /// `help`
    Help,
    /// `quit` / `exit`
    Quit,
}

/// Usage text for `help`
pub const HELP: &str = "\
commands:
  add <title>         add a task
  toggle <id>         mark a task done or not done (alias: done)
  edit <id> <title>   change a task's title
  rm <id>             remove a task (alias: remove)
  dismiss             clear the current notice
  ls                  show the list
  json                print the list as JSON
  help                show this text
  quit                leave (alias: exit)";

impl Command {
    /// The store action this command maps to, if it changes anything
    #[must_use]
    pub fn into_action(self) -> Option<TaskAction> {
        match self {
            Self::Add(title) => Some(TaskAction::AddTask { title }),
            Self::Toggle(id) => Some(TaskAction::ToggleTaskDone { id }),
            Self::Edit(id, title) => Some(TaskAction::EditTask { id, title }),
            Self::Remove(id) => Some(TaskAction::RemoveTask { id }),
            Self::Dismiss => Some(TaskAction::DismissNotice),
            Self::List | Self::Json | Self::Help | Self::Quit => None,
        }
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    input
        .split_once(char::is_whitespace)
        .map_or((input, ""), |(head, rest)| (head, rest.trim()))
}

fn parse_id(command: &'static str, arg: &str) -> Result<TaskId, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            what: "a task id",
        });
    }
    arg.parse()
        .map_err(|_| CommandError::InvalidId(arg.to_string()))
}

fn require_title(command: &'static str, title: &str) -> Result<String, CommandError> {
    if title.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            what: "a title",
        });
    }
    Ok(title.to_string())
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (word, rest) = split_word(line);
        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "add" => require_title("add", rest).map(Self::Add),
            "toggle" | "done" => parse_id("toggle", rest).map(Self::Toggle),
            "edit" => {
                let (id, title) = split_word(rest);
                let id = parse_id("edit", id)?;
                Ok(Self::Edit(id, require_title("edit", title)?))
            }
            "rm" | "remove" => parse_id("rm", rest).map(Self::Remove),
            "dismiss" => Ok(Self::Dismiss),
            "ls" | "list" => Ok(Self::List),
            "json" => Ok(Self::Json),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}
