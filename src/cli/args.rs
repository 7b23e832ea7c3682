//! Command-line argument parsing for chzzk-bridge-tail.
//!
//! ```text
//! chzzk-bridge-tail <base-url> <uuid> [--last-event-id N] [--unsubscribe]
//! ```

use uuid::Uuid;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Subscribe and print messages until interrupted (default)
    Tail {
        base_url: String,
        channel: Uuid,
        last_event_id: Option<i64>,
    },
    /// Drop the subscription and exit
    Unsubscribe { base_url: String, channel: Uuid },
}

/// Why the arguments could not be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgsError {
    #[error("missing argument: {0}")]
    Missing(&'static str),

    #[error("invalid channel id '{0}'")]
    InvalidChannel(String),

    #[error("invalid value for --last-event-id: '{0}'")]
    InvalidEventId(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("unexpected argument '{0}'")]
    Unexpected(String),
}

pub const USAGE: &str =
    "usage: chzzk-bridge-tail <base-url> <uuid> [--last-event-id N] [--unsubscribe]";

/// Parse command-line arguments and return the command to run.
///
/// # Examples
///
/// ```
/// use chzzk_bridge_client::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chzzk-bridge-tail".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut last_event_id = None;
    let mut unsubscribe = false;

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--unsubscribe" => unsubscribe = true,
            "--last-event-id" => {
                let value = args.next().ok_or(ArgsError::Missing("--last-event-id value"))?;
                last_event_id = Some(parse_event_id(&value)?);
            }
            _ => {
                if let Some(value) = arg.strip_prefix("--last-event-id=") {
                    last_event_id = Some(parse_event_id(value)?);
                } else if arg.starts_with('-') {
                    return Err(ArgsError::UnknownOption(arg));
                } else {
                    positional.push(arg);
                }
            }
        }
    }

    let mut positional = positional.into_iter();
    let base_url = positional.next().ok_or(ArgsError::Missing("<base-url>"))?;
    let channel = positional.next().ok_or(ArgsError::Missing("<uuid>"))?;
    let channel = Uuid::parse_str(&channel).map_err(|_| ArgsError::InvalidChannel(channel))?;
    if let Some(extra) = positional.next() {
        return Err(ArgsError::Unexpected(extra));
    }

    if unsubscribe {
        Ok(CliCommand::Unsubscribe { base_url, channel })
    } else {
        Ok(CliCommand::Tail {
            base_url,
            channel,
            last_event_id,
        })
    }
}

fn parse_event_id(value: &str) -> Result<i64, ArgsError> {
    value
        .parse()
        .map_err(|_| ArgsError::InvalidEventId(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANNEL: &str = "6e0e5c6b-2f6b-4b1e-9c43-0c8a3f1d2e7a";

    fn parse(args: &[&str]) -> Result<CliCommand, ArgsError> {
        let args: Vec<String> = std::iter::once("chzzk-bridge-tail")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    fn channel() -> Uuid {
        Uuid::parse_str(CHANNEL).unwrap()
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), Ok(CliCommand::Version));
        assert_eq!(parse(&["-V"]), Ok(CliCommand::Version));
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(parse(&["-h"]), Ok(CliCommand::Help));
        assert_eq!(parse(&["http://x", "--help"]), Ok(CliCommand::Help));
    }

    #[test]
    fn test_parse_tail() {
        assert_eq!(
            parse(&["http://localhost:8080", CHANNEL]),
            Ok(CliCommand::Tail {
                base_url: "http://localhost:8080".to_string(),
                channel: channel(),
                last_event_id: None,
            })
        );
    }

    #[test]
    fn test_parse_last_event_id() {
        let expected = Ok(CliCommand::Tail {
            base_url: "http://b".to_string(),
            channel: channel(),
            last_event_id: Some(42),
        });
        assert_eq!(parse(&["http://b", CHANNEL, "--last-event-id", "42"]), expected);
        assert_eq!(parse(&["--last-event-id=42", "http://b", CHANNEL]), expected);
    }

    #[test]
    fn test_parse_unsubscribe() {
        assert_eq!(
            parse(&["--unsubscribe", "http://b", CHANNEL]),
            Ok(CliCommand::Unsubscribe {
                base_url: "http://b".to_string(),
                channel: channel(),
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(&[]), Err(ArgsError::Missing("<base-url>")));
        assert_eq!(parse(&["http://b"]), Err(ArgsError::Missing("<uuid>")));
        assert_eq!(
            parse(&["http://b", "not-a-uuid"]),
            Err(ArgsError::InvalidChannel("not-a-uuid".to_string()))
        );
        assert_eq!(
            parse(&["http://b", CHANNEL, "--last-event-id", "x"]),
            Err(ArgsError::InvalidEventId("x".to_string()))
        );
        assert_eq!(
            parse(&["http://b", CHANNEL, "--last-event-id"]),
            Err(ArgsError::Missing("--last-event-id value"))
        );
        assert_eq!(
            parse(&["http://b", CHANNEL, "--follow"]),
            Err(ArgsError::UnknownOption("--follow".to_string()))
        );
        assert_eq!(
            parse(&["http://b", CHANNEL, "extra"]),
            Err(ArgsError::Unexpected("extra".to_string()))
        );
    }
}
