use std::io::stdout;

use anyhow::Result;
use clap::{builder::EnumValueParser, crate_version, Arg, Command};
use clap_complete::Shell;

pub mod doc_proc;

pub mod io;

pub mod progress;

mod subcommands;

pub mod traits;
use traits::EmoCauseApp;

fn main() -> Result<()> {
    // Known subapplications.
    let apps = vec![
        subcommands::ExtractApp::app(),
        subcommands::PatternsApp::app(),
    ];

    env_logger::init();

    let cli = Command::new("emocause")
        .about("Emotion holder and cause extraction")
        .version(crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(apps)
        .subcommand(
            Command::new("completions")
                .about("Generate completion scripts for your shell")
                .arg_required_else_help(true)
                .arg(Arg::new("shell").value_parser(EnumValueParser::<Shell>::new())),
        );
    let matches = cli.clone().get_matches();

    match matches.subcommand() {
        Some(("completions", completion_matches)) => {
            if let Some(&shell) = completion_matches.get_one::<Shell>("shell") {
                write_completion_script(cli, shell);
            }
            Ok(())
        }
        Some(("extract", extract_matches)) => {
            subcommands::ExtractApp::parse(extract_matches)?.run()
        }
        Some(("patterns", patterns_matches)) => {
            subcommands::PatternsApp::parse(patterns_matches)?.run()
        }
        _unknown => unreachable!(),
    }
}

fn write_completion_script(mut cli: Command, shell: Shell) {
    clap_complete::generate(shell, &mut cli, "emocause", &mut stdout());
}
