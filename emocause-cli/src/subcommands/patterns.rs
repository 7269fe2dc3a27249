use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use stdinout::Output;

use crate::io::load_patterns;
use crate::traits::EmoCauseApp;

const TRIGGERS: &str = "TRIGGERS";
const OUTPUT: &str = "OUTPUT";

/// Print the trigger patterns, including generated passive forms.
pub struct PatternsApp {
    output: Option<String>,
    triggers: String,
}

impl EmoCauseApp for PatternsApp {
    fn app() -> Command {
        Command::new("patterns")
            .arg_required_else_help(true)
            .about("Print trigger patterns with their passive forms")
            .arg(
                Arg::new(TRIGGERS)
                    .help("Trigger pattern file")
                    .index(1)
                    .required(true),
            )
            .arg(Arg::new(OUTPUT).help("Patterns (TSV)").index(2))
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        let triggers = matches
            .get_one::<String>(TRIGGERS)
            .context("Missing trigger pattern file")?
            .into();
        let output = matches.get_one::<String>(OUTPUT).map(ToOwned::to_owned);

        Ok(PatternsApp { output, triggers })
    }

    fn run(&self) -> Result<()> {
        let patterns = load_patterns(&self.triggers)?;

        let output = Output::from(self.output.as_ref());
        let mut writer = BufWriter::new(output.write().context("Cannot open output for writing")?);

        for pattern in patterns.iter() {
            writeln!(writer, "{}", pattern).context("Cannot write pattern")?;
        }

        writer.flush().context("Cannot flush output")?;

        Ok(())
    }
}
