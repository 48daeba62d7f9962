//! Command Parsing
//!
//! Turns one line of input into a [`Command`] for the interactive host.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Errors produced while parsing a command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("{command} requires <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("too many arguments for {0}")]
    TooManyArguments(&'static str),

    #[error("invalid ttl '{0}': expected milliseconds")]
    InvalidTtl(String),

    #[error("unexpected argument '{argument}', usage: {usage}")]
    UnexpectedArgument {
        argument: String,
        usage: &'static str,
    },
}

const ADD_USAGE: &str = "ADD <key> <value> [ttl_ms] (values cannot contain whitespace)";

/// A parsed host command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `ADD <key> <value> [ttl_ms]`
    Add {
        key: String,
        value: String,
        ttl: Option<Duration>,
    },
    /// `GET <key>`
    Get { key: String },
    /// `DEL <key>`
    Del { key: String },
    /// `TTL <key>`
    Ttl { key: String },
    Clear,
    Clean,
    Len,
    Stats,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let name = parts.next().ok_or(CommandError::Empty)?;
        let args: Vec<&str> = parts.collect();

        match name.to_ascii_uppercase().as_str() {
            "ADD" | "SET" => {
                let key = required(&args, 0, "ADD", "key")?;
                let value = required(&args, 1, "ADD", "value")?;
                if let Some(extra) = args.get(3) {
                    return Err(CommandError::UnexpectedArgument {
                        argument: extra.to_string(),
                        usage: ADD_USAGE,
                    });
                }
                let ttl = args.get(2).map(|raw| parse_ttl(raw)).transpose()?;
                Ok(Command::Add { key, value, ttl })
            }
            "GET" => {
                let key = single(&args, "GET")?;
                Ok(Command::Get { key })
            }
            "DEL" | "REMOVE" => {
                let key = single(&args, "DEL")?;
                Ok(Command::Del { key })
            }
            "TTL" => {
                let key = single(&args, "TTL")?;
                Ok(Command::Ttl { key })
            }
            "CLEAR" => no_args(&args, "CLEAR", Command::Clear),
            "CLEAN" => no_args(&args, "CLEAN", Command::Clean),
            "LEN" => no_args(&args, "LEN", Command::Len),
            "STATS" => no_args(&args, "STATS", Command::Stats),
            "HELP" => Ok(Command::Help),
            "QUIT" | "EXIT" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(name.to_string())),
        }
    }
}

fn required(
    args: &[&str],
    index: usize,
    command: &'static str,
    argument: &'static str,
) -> Result<String, CommandError> {
    args.get(index)
        .map(|s| s.to_string())
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn single(args: &[&str], command: &'static str) -> Result<String, CommandError> {
    if args.len() > 1 {
        return Err(CommandError::TooManyArguments(command));
    }
    required(args, 0, command, "key")
}

fn no_args(args: &[&str], command: &'static str, parsed: Command) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(parsed)
    } else {
        Err(CommandError::TooManyArguments(command))
    }
}

/// A trailing word with no digits is a second value word, not a bad TTL.
fn parse_ttl(raw: &str) -> Result<Duration, CommandError> {
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return Err(CommandError::UnexpectedArgument {
            argument: raw.to_string(),
            usage: ADD_USAGE,
        });
    }

    raw.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| CommandError::InvalidTtl(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_without_ttl() {
        let cmd: Command = "ADD user:1 alice".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                key: "user:1".to_string(),
                value: "alice".to_string(),
                ttl: None,
            }
        );
    }

    #[test]
    fn test_parse_add_with_ttl() {
        let cmd: Command = "add k v 500".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                key: "k".to_string(),
                value: "v".to_string(),
                ttl: Some(Duration::from_millis(500)),
            }
        );
    }

    #[test]
    fn test_parse_add_invalid_ttl() {
        let err = "ADD k v 5s".parse::<Command>().unwrap_err();
        assert_eq!(err, CommandError::InvalidTtl("5s".to_string()));
    }

    #[test]
    fn test_parse_add_value_with_whitespace() {
        let err = "ADD k hello world".parse::<Command>().unwrap_err();
        assert_eq!(
            err,
            CommandError::UnexpectedArgument {
                argument: "world".to_string(),
                usage: ADD_USAGE,
            }
        );
        assert!(err.to_string().contains("values cannot contain whitespace"));

        let err = "ADD k hello big world".parse::<Command>().unwrap_err();
        assert!(matches!(err, CommandError::UnexpectedArgument { argument, .. } if argument == "world"));
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!(
            "ttl k".parse::<Command>().unwrap(),
            Command::Ttl { key: "k".to_string() }
        );
        assert_eq!(
            "TTL".parse::<Command>().unwrap_err(),
            CommandError::MissingArgument {
                command: "TTL",
                argument: "key"
            }
        );
    }

    #[test]
    fn test_parse_add_missing_value() {
        let err = "ADD k".parse::<Command>().unwrap_err();
        assert_eq!(
            err,
            CommandError::MissingArgument {
                command: "ADD",
                argument: "value"
            }
        );
    }

    #[test]
    fn test_parse_get_and_del() {
        assert_eq!(
            "GET k".parse::<Command>().unwrap(),
            Command::Get { key: "k".to_string() }
        );
        assert_eq!(
            "  del   k ".parse::<Command>().unwrap(),
            Command::Del { key: "k".to_string() }
        );
        assert_eq!(
            "GET a b".parse::<Command>().unwrap_err(),
            CommandError::TooManyArguments("GET")
        );
    }

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!("clear".parse::<Command>().unwrap(), Command::Clear);
        assert_eq!("CLEAN".parse::<Command>().unwrap(), Command::Clean);
        assert_eq!("len".parse::<Command>().unwrap(), Command::Len);
        assert_eq!("Stats".parse::<Command>().unwrap(), Command::Stats);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!(
            "LEN now".parse::<Command>().unwrap_err(),
            CommandError::TooManyArguments("LEN")
        );
    }

    #[test]
    fn test_parse_empty_and_unknown() {
        assert_eq!("   ".parse::<Command>().unwrap_err(), CommandError::Empty);
        assert_eq!(
            "FLUSHALL".parse::<Command>().unwrap_err(),
            CommandError::Unknown("FLUSHALL".to_string())
        );
    }
}
