//! Console host: a line-oriented stand-in for the game client.
//!
//! Each stdin line is one host signal:
//!
//! ```text
//! connect [address]          connection completed (address may be unknown)
//! disconnect                 left the server
//! server [address]           address reported on subsequent ticks; none = unknown
//! scoreboard [line|line|..]  scoreboard shown on subsequent ticks; none = hidden
//! chat <text>                chat message received
//! debug                      debug key: toggle debug mode and fire the sample drop
//! drop <id> <tier> <quantity> <headline..>
//! quit
//! ```
//!
//! `&` may be typed in place of `§` in scoreboard, chat and headline text.
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::event::AddonEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Connect(Option<String>),
    Disconnect,
    Server(Option<String>),
    Scoreboard(Option<Vec<String>>),
    Chat(String),
    DebugKey,
    Drop {
        id: String,
        tier: u32,
        quantity: u32,
        headline: String,
    },
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostParseError {
    #[error("empty line")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

const DROP_USAGE: &str = "drop <id> <tier> <quantity> <headline..>";

/// Parses one line of console input.
pub fn parse_line(line: &str) -> Result<HostCommand, HostParseError> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    match command {
        "" => Err(HostParseError::Empty),
        "connect" => Ok(HostCommand::Connect(arg)),
        "disconnect" => Ok(HostCommand::Disconnect),
        "server" => Ok(HostCommand::Server(arg)),
        "scoreboard" => Ok(HostCommand::Scoreboard(
            arg.map(|a| a.split('|').map(style_codes).collect()),
        )),
        "chat" => match arg {
            Some(text) => Ok(HostCommand::Chat(style_codes(&text))),
            None => Err(HostParseError::Usage("chat <text>")),
        },
        "debug" => Ok(HostCommand::DebugKey),
        "drop" => parse_drop(rest),
        "quit" | "exit" => Ok(HostCommand::Quit),
        other => Err(HostParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_drop(args: &str) -> Result<HostCommand, HostParseError> {
    let mut parts = args.splitn(4, char::is_whitespace);
    let (Some(id), Some(tier), Some(quantity), Some(headline)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(HostParseError::Usage(DROP_USAGE));
    };
    let headline = headline.trim();
    if id.is_empty() || headline.is_empty() {
        return Err(HostParseError::Usage(DROP_USAGE));
    }
    Ok(HostCommand::Drop {
        id: id.to_string(),
        tier: parse_number("tier", tier)?,
        quantity: parse_number("quantity", quantity)?,
        headline: style_codes(headline),
    })
}

fn parse_number(field: &'static str, value: &str) -> Result<u32, HostParseError> {
    value.parse().map_err(|_| HostParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Converts `&` style codes to the game's `§` form.
fn style_codes(text: &str) -> String {
    text.replace('&', "§")
}

/// Reads commands from stdin and forwards them to the event loop.
/// Sends `Shutdown` on `quit` or end of input.
pub async fn read_stdin(tx: mpsc::Sender<AddonEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(target: "host", "Failed to read input: {e}");
                break;
            }
        };

        match parse_line(&line) {
            Ok(HostCommand::Quit) => break,
            Ok(command) => {
                if tx.send(AddonEvent::Host(command)).await.is_err() {
                    return;
                }
            }
            Err(HostParseError::Empty) => {}
            Err(e) => tracing::warn!(target: "host", "{e}"),
        }
    }

    let _ = tx.send(AddonEvent::Shutdown).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── connection ────────────────────────────────────────────────────────────

    #[test]
    fn connect_with_and_without_address() {
        assert_eq!(
            parse_line("connect mc.hypixel.net"),
            Ok(HostCommand::Connect(Some("mc.hypixel.net".to_string())))
        );
        assert_eq!(parse_line("connect"), Ok(HostCommand::Connect(None)));
        assert_eq!(parse_line("  disconnect  "), Ok(HostCommand::Disconnect));
    }

    #[test]
    fn server_without_address_is_unknown() {
        assert_eq!(parse_line("server"), Ok(HostCommand::Server(None)));
        assert_eq!(
            parse_line("server play.example.org"),
            Ok(HostCommand::Server(Some("play.example.org".to_string())))
        );
    }

    #[test]
    fn address_keeps_ampersand() {
        assert_eq!(
            parse_line("server a&b.hypixel.net"),
            Ok(HostCommand::Server(Some("a&b.hypixel.net".to_string())))
        );
    }

    // ── scoreboard / chat ─────────────────────────────────────────────────────

    #[test]
    fn scoreboard_lines_split_on_pipe_with_style_codes() {
        assert_eq!(
            parse_line("scoreboard &lSKYBLOCK|Purse: 12"),
            Ok(HostCommand::Scoreboard(Some(vec![
                "§lSKYBLOCK".to_string(),
                "Purse: 12".to_string(),
            ])))
        );
    }

    #[test]
    fn bare_scoreboard_hides_it() {
        assert_eq!(parse_line("scoreboard"), Ok(HostCommand::Scoreboard(None)));
    }

    #[test]
    fn chat_requires_text() {
        assert_eq!(
            parse_line("chat &6Hello"),
            Ok(HostCommand::Chat("§6Hello".to_string()))
        );
        assert!(matches!(parse_line("chat"), Err(HostParseError::Usage(_))));
    }

    // ── drop ──────────────────────────────────────────────────────────────────

    #[test]
    fn drop_parses_all_fields() {
        assert_eq!(
            parse_line("drop pet 3 2 &d&lCRAZY RARE DROP!"),
            Ok(HostCommand::Drop {
                id: "pet".to_string(),
                tier: 3,
                quantity: 2,
                headline: "§d§lCRAZY RARE DROP!".to_string(),
            })
        );
    }

    #[test]
    fn drop_with_zero_quantity_still_parses() {
        // Validation belongs to the banner engine.
        assert!(matches!(
            parse_line("drop pet 1 0 RARE DROP!"),
            Ok(HostCommand::Drop { quantity: 0, .. })
        ));
    }

    #[test]
    fn drop_with_missing_fields_is_usage_error() {
        assert_eq!(parse_line("drop pet 1"), Err(HostParseError::Usage(DROP_USAGE)));
        assert_eq!(parse_line("drop"), Err(HostParseError::Usage(DROP_USAGE)));
    }

    #[test]
    fn drop_with_bad_number() {
        assert_eq!(
            parse_line("drop pet high 1 RARE DROP!"),
            Err(HostParseError::InvalidNumber {
                field: "tier",
                value: "high".to_string(),
            })
        );
        assert!(matches!(
            parse_line("drop pet 1 -1 RARE DROP!"),
            Err(HostParseError::InvalidNumber { field: "quantity", .. })
        ));
    }

    // ── misc ──────────────────────────────────────────────────────────────────

    #[test]
    fn debug_and_quit() {
        assert_eq!(parse_line("debug"), Ok(HostCommand::DebugKey));
        assert_eq!(parse_line("quit"), Ok(HostCommand::Quit));
        assert_eq!(parse_line("exit"), Ok(HostCommand::Quit));
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_line("   "), Err(HostParseError::Empty));
        assert_eq!(
            parse_line("warp hub"),
            Err(HostParseError::UnknownCommand("warp".to_string()))
        );
    }
}
