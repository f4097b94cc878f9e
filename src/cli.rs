// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::env;

use crate::cli::commands::run::RunOptions;
use crate::core::config::DEFAULT_CONFIG;
use crate::core::planner::DEFAULT_FILTER;
use crate::infra::t;
use crate::infra::vagrant::DEFAULT_PROGRAM;

pub mod commands {
    pub mod run;
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(lang) = args.iter().find_map(|arg| arg.strip_prefix("--lang=")) {
        return Some(lang.to_string());
    }
    args.iter()
        .position(|arg| arg == "--lang")
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

/// Parses a `NAME=VALUE` definition. The value may be empty and may contain `=`.
/// 解析 `NAME=VALUE` 定义。值可以为空，也可以包含 `=`。
pub fn parse_definition(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((name, _)) if name.is_empty() => Err(format!("missing name in '{text}'")),
        Some((name, value)) => Ok((name.to_string(), value.to_string())),
        None => Err(format!("expected NAME=VALUE, got '{text}'")),
    }
}

fn build_cli(locale: &str) -> Command {
    Command::new("box-matrix")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .arg(
            Arg::new("config")
                .help(t!("arg_config", locale = locale).to_string())
                .value_name("CONFIG")
                .default_value(DEFAULT_CONFIG)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .help(t!("arg_filter", locale = locale).to_string())
                .value_name("REGEXP")
                .default_value(DEFAULT_FILTER)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("define")
                .short('D')
                .long("define")
                .help(t!("arg_define", locale = locale).to_string())
                .value_name("NAME=VALUE")
                .value_parser(parse_definition)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("keep")
                .short('k')
                .long("keep")
                .help(t!("arg_keep", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("vagrant-file")
                .long("vagrant-file")
                .help(t!("arg_vagrant_file", locale = locale).to_string())
                .value_name("FILE")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("workdir")
                .long("workdir")
                .help(t!("arg_workdir", locale = locale).to_string())
                .value_name("DIR")
                .default_value(".")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("vagrant")
                .long("vagrant")
                .help(t!("arg_vagrant", locale = locale).to_string())
                .value_name("PROGRAM")
                .env("BOX_MATRIX_VAGRANT")
                .default_value(DEFAULT_PROGRAM)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .help(t!("arg_html", locale = locale).to_string())
                .value_name("FILE")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("arg_verbose", locale = locale).to_string())
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help(t!("arg_quiet", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
}

/// Initializes diagnostic logging from the verbosity flags.
fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // A second initialization (e.g. from tests) is harmless.
    let _ = env_logger::Builder::new()
        .filter_level(if quiet { log::LevelFilter::Error } else { log_level })
        .format_timestamp(None)
        .try_init();
}

/// Parses the command line and runs the matrix.
/// Returns the process exit status: the number of failed runs, at most 255.
pub async fn run() -> Result<u8> {
    // Pre-parse language and initialize i18n first.
    let language = crate::select_locale(pre_parse_language().as_deref());
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();
    init_logging(matches.get_count("verbose"), matches.get_flag("quiet"));
    log::debug!("using locale {language}");

    let options = RunOptions {
        config: matches
            .get_one::<String>("config")
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONFIG.to_string()),
        filter: matches
            .get_one::<String>("filter")
            .cloned()
            .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        definitions: matches
            .get_many::<(String, String)>("define")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        keep: matches.get_flag("keep"),
        vagrant_file: matches.get_one::<String>("vagrant-file").cloned(),
        workdir: matches
            .get_one::<String>("workdir")
            .cloned()
            .unwrap_or_else(|| ".".to_string()),
        vagrant: matches
            .get_one::<String>("vagrant")
            .cloned()
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
        html: matches.get_one::<String>("html").cloned(),
        quiet: matches.get_flag("quiet"),
    };

    commands::run::execute(options, &language).await
}
