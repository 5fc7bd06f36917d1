//! Command definitions and handlers

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use roster_console::ConsoleConfig;
use roster_filter::FilterState;
use std::path::PathBuf;

pub(crate) fn command() -> Command {
    Command::new("roster")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect user search filters and directory query inputs")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Console configuration file (TOML)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("decode")
                .about("Split a search string into its filters")
                .arg(Arg::new("search").required(true).help("Encoded search string")),
        )
        .subcommand(
            Command::new("encode")
                .about("Build a search string from filters")
                .arg(Arg::new("label-key").long("label-key").default_value(""))
                .arg(Arg::new("label-value").long("label-value").default_value(""))
                .arg(Arg::new("phone").long("phone").default_value(""))
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail when the filters would not read back unchanged"),
                ),
        )
        .subcommand(
            Command::new("query")
                .about("Print the users query variables for a search string")
                .arg(Arg::new("search").default_value("").help("Encoded search string"))
                .arg(
                    Arg::new("cursor")
                        .long("cursor")
                        .default_value("")
                        .help("Page cursor, empty for the first page"),
                ),
        )
        .subcommand(Command::new("config").about("Print the effective configuration"))
}

/// Configuration from `--config`, or defaults
pub(crate) fn load_config(matches: &ArgMatches) -> Result<ConsoleConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => ConsoleConfig::load(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(ConsoleConfig::default()),
    }
}

fn string_arg<'a>(args: &'a ArgMatches, name: &str) -> &'a str {
    args.get_one::<String>(name).map_or("", String::as_str)
}

/// Run a subcommand, returning what to print
pub(crate) fn run(matches: &ArgMatches, config: &ConsoleConfig) -> Result<String> {
    match matches.subcommand() {
        Some(("decode", args)) => {
            let state = roster_filter::decode(string_arg(args, "search"));
            Ok(serde_json::to_string_pretty(&state)?)
        }
        Some(("encode", args)) => {
            let state = FilterState::new(
                string_arg(args, "label-key"),
                string_arg(args, "label-value"),
                string_arg(args, "phone"),
            );
            if let Err(reason) = state.check_round_trip() {
                if args.get_flag("strict") {
                    bail!("filters would not read back unchanged: {reason}");
                }
                tracing::warn!(%reason, "filters would not read back unchanged");
            }
            Ok(roster_filter::encode(&state))
        }
        Some(("query", args)) => {
            let state = roster_filter::decode(string_arg(args, "search"));
            let input = config
                .list_params()
                .search_options(&state, string_arg(args, "cursor"));
            Ok(serde_json::to_string_pretty(&input.variables())?)
        }
        Some(("config", _)) => Ok(serde_json::to_string_pretty(config)?),
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("no command given"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn run_args(args: &[&str]) -> Result<String> {
        let matches = command().try_get_matches_from(args)?;
        let config = load_config(&matches)?;
        run(&matches, &config)
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn decode_prints_fields() {
        let out = run_args(&["roster", "decode", "team=ops phone=555"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["labelKey"], "team");
        assert_eq!(value["labelValue"], "ops");
        assert_eq!(value["phoneNumber"], "555");
    }

    #[test]
    fn encode_joins_segments() {
        let out = run_args(&[
            "roster",
            "encode",
            "--label-key",
            "team",
            "--label-value",
            "ops",
            "--phone",
            "555",
        ])
        .unwrap();
        assert_eq!(out, "team=ops phone=555");
    }

    #[test]
    fn strict_encode_rejects_lossy_filters() {
        let err = run_args(&["roster", "encode", "--phone", "555 123", "--strict"]).unwrap_err();
        assert!(err.to_string().contains("read back"));
    }

    #[test]
    fn query_uses_config_page_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = 25\nfavorites_first = false").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let out = run_args(&["roster", "--config", &path, "query", "a/b=c", "--cursor", "X"])
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["input"]["search"], "a/b=c");
        assert_eq!(value["input"]["after"], "X");
        assert_eq!(value["input"]["first"], 25);
        assert_eq!(value["input"]["favoritesFirst"], false);
    }

    #[test]
    fn query_matches_list_controller_input() {
        use roster_query::{QueryClient, UserListController};
        use roster_test_utils::MemoryDirectory;

        let search = "team/dept=ops phone=555";
        let out = run_args(&["roster", "query", search, "--cursor", "c1"]).unwrap();
        let printed: serde_json::Value = serde_json::from_str(&out).unwrap();

        let mut list = UserListController::new(
            QueryClient::new(std::sync::Arc::new(MemoryDirectory::default())),
            search,
            ConsoleConfig::default().list_params(),
        );
        list.on_cursor_change("c1");
        assert_eq!(printed, list.primary_input().variables());
    }

    #[test]
    fn missing_config_is_an_error() {
        assert!(run_args(&["roster", "--config", "/nonexistent.toml", "config"]).is_err());
    }
}
