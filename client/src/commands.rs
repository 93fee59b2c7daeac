// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use thiserror::Error;

pub const HELP: &str = "\
commands:
  title <text>                        set the form title
  desc <text>                         set the form description
  submit                              add the task, or save the one being edited
  edit <n>                            load task n into the form
  cancel                              leave edit mode
  delete <n>                          delete task n
  alert <n> <date> <time> <phone>     set a local reminder on task n
  dismiss                             close the status message
  reload                              fetch the list again
  help                                show this text
  quit                                exit";

/// One line of user input. Tasks are addressed by their 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Title(String),
    Description(String),
    Submit,
    Edit(usize),
    Cancel,
    Delete(usize),
    Alert {
        position: usize,
        date: String,
        time: String,
        phone: String,
    },
    Dismiss,
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match word {
            "title" => Ok(Command::Title(rest.to_string())),
            "desc" => Ok(Command::Description(rest.to_string())),
            "submit" => Ok(Command::Submit),
            "edit" => position(rest)
                .map(Command::Edit)
                .ok_or(ParseError::Usage("edit <n>")),
            "cancel" => Ok(Command::Cancel),
            "delete" => position(rest)
                .map(Command::Delete)
                .ok_or(ParseError::Usage("delete <n>")),
            "alert" => {
                // Missing fields are passed through; the view rejects them.
                let mut parts = rest.split_whitespace();
                let position = parts
                    .next()
                    .and_then(position)
                    .ok_or(ParseError::Usage("alert <n> <date> <time> <phone>"))?;
                let mut field = || parts.next().unwrap_or_default().to_string();
                Ok(Command::Alert {
                    position,
                    date: field(),
                    time: field(),
                    phone: field(),
                })
            }
            "dismiss" => Ok(Command::Dismiss),
            "reload" => Ok(Command::Reload),
            "help" | "" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

fn position(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
