//! Command-line modes.
//!
//! Without arguments the binary starts the interactive desk. The flags
//! below run one job and exit.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use eventdesk_core::auth::Access;
use eventdesk_core::seating::CandidateFilter;

pub const USAGE: &str = "\
Usage: eventdesk [MODE]

Without a mode, starts the interactive desk.

Modes:
  --assign role=<Role>|class=<Class> [--start <Bus>] [--seed <n>] [--stop-when-full]
                                   Seat unassigned attendees on buses
  --manifest <path> [--signature]  Write the bus manifest as HTML ('-' prints text)
  --import <path>                  Append roster rows from a JSON file
  --stock [--json]                 Print the T-shirt stock report
  --set-passcode staff|admin       Set a desk passcode
  --pass <ticket>                  Show an attendee's pass
  --report-fault <ticket> <text>   Record a complaint for a ticket
  --help                           Show this message
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tui,
    Assign {
        filter: CandidateFilter,
        start: Option<String>,
        seed: Option<u64>,
        stop_when_full: bool,
    },
    Manifest {
        path: PathBuf,
        signature: bool,
    },
    Import {
        path: PathBuf,
    },
    Stock {
        json: bool,
    },
    SetPasscode {
        access: Access,
    },
    Pass {
        ticket: String,
    },
    ReportFault {
        ticket: String,
        text: String,
    },
    Help,
}

impl Command {
    /// True for the full-screen desk, which logs to a file instead of stderr
    pub fn is_interactive(&self) -> bool {
        matches!(self, Command::Tui)
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(|s| s.as_str())
        .filter(|s| !s.starts_with("--"))
        .ok_or_else(|| anyhow!("{} needs a value", flag))
}

/// Parse arguments, excluding the program name
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some(mode) = args.first() else {
        return Ok(Command::Tui);
    };

    let command = match mode.as_str() {
        "--assign" => {
            let raw = value(args, 1, "--assign")?;
            let filter = CandidateFilter::parse(raw)
                .ok_or_else(|| anyhow!("Expected role=<Role> or class=<Class>, got '{}'", raw))?;
            let mut start = None;
            let mut seed = None;
            let mut stop_when_full = false;
            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--start" => {
                        start = Some(value(args, i + 1, "--start")?.to_string());
                        i += 1;
                    }
                    "--seed" => {
                        let raw = value(args, i + 1, "--seed")?;
                        let invalid = || format!("Invalid seed: {}", raw);
                        seed = Some(raw.parse().with_context(invalid)?);
                        i += 1;
                    }
                    "--stop-when-full" => stop_when_full = true,
                    other => bail!("Unknown option for --assign: {}", other),
                }
                i += 1;
            }
            Command::Assign {
                filter,
                start,
                seed,
                stop_when_full,
            }
        }
        "--manifest" => {
            let path = PathBuf::from(value(args, 1, "--manifest")?);
            let signature = match args.get(2).map(|s| s.as_str()) {
                None => false,
                Some("--signature") => true,
                Some(other) => bail!("Unknown option for --manifest: {}", other),
            };
            Command::Manifest { path, signature }
        }
        "--import" => Command::Import {
            path: PathBuf::from(value(args, 1, "--import")?),
        },
        "--stock" => Command::Stock {
            json: args.get(1).is_some_and(|s| s == "--json"),
        },
        "--set-passcode" => {
            let raw = value(args, 1, "--set-passcode")?;
            let access = Access::parse(raw)
                .ok_or_else(|| anyhow!("Expected staff or admin, got '{}'", raw))?;
            Command::SetPasscode { access }
        }
        "--pass" => Command::Pass {
            ticket: value(args, 1, "--pass")?.to_string(),
        },
        "--report-fault" => {
            let ticket = value(args, 1, "--report-fault")?.to_string();
            let text = args[2.min(args.len())..].join(" ");
            if text.trim().is_empty() {
                bail!("--report-fault needs a description");
            }
            Command::ReportFault { ticket, text }
        }
        "--help" | "-h" => Command::Help,
        other => bail!("Unknown mode: {}\n\n{}", other, USAGE),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_core::models::Role;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_no_args_is_tui() {
        assert_eq!(parse_args(&[]).unwrap(), Command::Tui);
        assert!(Command::Tui.is_interactive());
    }

    #[test]
    fn test_parse_assign() {
        let cmd = parse_args(&args(&[
            "--assign",
            "role=Student",
            "--start",
            "Bus 2",
            "--seed",
            "42",
            "--stop-when-full",
        ]))
        .unwrap();
        assert_eq!(
            cmd,
            Command::Assign {
                filter: CandidateFilter::Role(Role::Student),
                start: Some("Bus 2".to_string()),
                seed: Some(42),
                stop_when_full: true,
            }
        );
        assert!(!cmd.is_interactive());
    }

    #[test]
    fn test_parse_assign_errors() {
        assert!(parse_args(&args(&["--assign"])).is_err());
        assert!(parse_args(&args(&["--assign", "bus=1"])).is_err());
        assert!(parse_args(&args(&["--assign", "class=9", "--seed", "x"])).is_err());
        assert!(parse_args(&args(&["--assign", "class=9", "--start"])).is_err());
        assert!(parse_args(&args(&["--assign", "class=9", "--fast"])).is_err());
    }

    #[test]
    fn test_parse_manifest_and_stock() {
        assert_eq!(
            parse_args(&args(&["--manifest", "out.html", "--signature"])).unwrap(),
            Command::Manifest {
                path: PathBuf::from("out.html"),
                signature: true
            }
        );
        assert_eq!(
            parse_args(&args(&["--stock"])).unwrap(),
            Command::Stock { json: false }
        );
        assert_eq!(
            parse_args(&args(&["--stock", "--json"])).unwrap(),
            Command::Stock { json: true }
        );
    }

    #[test]
    fn test_parse_portal_modes() {
        assert_eq!(
            parse_args(&args(&["--report-fault", "1001", "Bus", "left", "early"])).unwrap(),
            Command::ReportFault {
                ticket: "1001".to_string(),
                text: "Bus left early".to_string()
            }
        );
        assert!(parse_args(&args(&["--report-fault", "1001"])).is_err());
        assert_eq!(
            parse_args(&args(&["--pass", "1001"])).unwrap(),
            Command::Pass {
                ticket: "1001".to_string()
            }
        );
    }

    #[test]
    fn test_parse_set_passcode() {
        assert_eq!(
            parse_args(&args(&["--set-passcode", "admin"])).unwrap(),
            Command::SetPasscode {
                access: Access::Admin
            }
        );
        assert!(parse_args(&args(&["--set-passcode", "root"])).is_err());
    }

    #[test]
    fn test_unknown_mode() {
        let err = parse_args(&args(&["--launch"])).unwrap_err();
        assert!(err.to_string().starts_with("Unknown mode: --launch"));
    }
}
