use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use emocause::document::Document;
use stdinout::{Input, Output};

use crate::doc_proc::DocumentProcessor;
use crate::io::{load_config, load_patterns};
use crate::progress::ReadProgress;
use crate::traits::EmoCauseApp;

const CONFIG: &str = "CONFIG";
const INPUT: &str = "INPUT";
const NUM_THREADS: &str = "NUM_THREADS";
const OUTPUT: &str = "OUTPUT";
const READ_AHEAD: &str = "READ_AHEAD";

pub struct ExtractApp {
    config: String,
    input: Option<String>,
    num_threads: usize,
    output: Option<String>,
    read_ahead: usize,
}

/// Read JSON-lines documents and queue them for extraction.
///
/// Documents that cannot be read are logged and skipped.
fn process_documents<R, W>(processor: &mut DocumentProcessor<W>, read: R) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    for (idx, line) in read.lines().enumerate() {
        let line = line.context("Cannot read document")?;
        if line.trim().is_empty() {
            continue;
        }

        match Document::from_json(&line) {
            Ok(document) => processor
                .process(document)
                .context("Error processing document")?,
            Err(err) => {
                log::warn!("Skipping document on line {}: {}", idx + 1, err);
                processor.skip();
            }
        }
    }

    Ok(())
}

impl EmoCauseApp for ExtractApp {
    fn app() -> Command {
        Command::new("extract")
            .arg_required_else_help(true)
            .about("Extract emotion holders and causes")
            .arg(
                Arg::new(CONFIG)
                    .help("Extraction configuration file")
                    .index(1)
                    .required(true),
            )
            .arg(
                Arg::new(INPUT)
                    .help("Annotated documents (JSON lines)")
                    .index(2),
            )
            .arg(Arg::new(OUTPUT).help("Extractions (TSV)").index(3))
            .arg(
                Arg::new(NUM_THREADS)
                    .help("Extraction threads")
                    .long("threads")
                    .value_name("N")
                    .default_value("4"),
            )
            .arg(
                Arg::new(READ_AHEAD)
                    .help("Readahead (number of documents)")
                    .long("readahead")
                    .value_name("N")
                    .default_value("1000"),
            )
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        let config = matches
            .get_one::<String>(CONFIG)
            .context("Missing configuration file")?
            .into();
        let input = matches.get_one::<String>(INPUT).map(ToOwned::to_owned);
        let output = matches.get_one::<String>(OUTPUT).map(ToOwned::to_owned);
        let num_threads = matches
            .get_one::<String>(NUM_THREADS)
            .context("Missing number of threads")?
            .parse()
            .context("Cannot parse number of threads")?;
        let read_ahead: usize = matches
            .get_one::<String>(READ_AHEAD)
            .context("Missing readahead")?
            .parse()
            .context("Cannot parse number of documents to read ahead")?;
        anyhow::ensure!(read_ahead > 0, "Readahead should at least be 1");

        Ok(ExtractApp {
            config,
            input,
            num_threads,
            output,
            read_ahead,
        })
    }

    fn run(&self) -> Result<()> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build_global()
            .context("Cannot construct thread pool")?;

        let config = load_config(&self.config)?;
        let patterns = load_patterns(&config.patterns)?;

        let output = Output::from(self.output.as_ref());
        let writer = BufWriter::new(output.write().context("Cannot open output for writing")?);

        let mut processor =
            DocumentProcessor::new(&patterns, &config.extraction, writer, self.read_ahead);

        match &self.input {
            Some(path) => {
                let f = File::open(path).context(format!("Cannot open input: {}", path))?;
                let read = ReadProgress::new(f).context("Cannot create progress bar")?;
                process_documents(&mut processor, BufReader::new(read))
            }
            None => {
                let input = Input::from(self.input.as_ref());
                let read = input.buf_read().context("Cannot open input for reading")?;
                process_documents(&mut processor, read)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use emocause::config::ExtractionConfig;
    use emocause::pattern::PatternSet;

    use super::process_documents;
    use crate::doc_proc::DocumentProcessor;

    static DOCUMENT: &str = include_str!("../../../emocause/testdata/document.json");
    static TRIGGERS: &[u8] = include_bytes!("../../../emocause/testdata/triggers.txt");

    fn document_line(id: &str) -> String {
        let mut document: serde_json::Value = serde_json::from_str(DOCUMENT).unwrap();
        document["id"] = serde_json::Value::String(id.to_string());
        document.to_string()
    }

    #[test]
    fn skips_unreadable_documents() {
        let patterns = PatternSet::from_read(TRIGGERS).unwrap();
        let config = ExtractionConfig::default();

        let input = [
            document_line("first"),
            "this is not JSON".to_string(),
            String::new(),
            r#"{"id": "unbalanced", "sentences": [{"tokens": [{"word": "Hi"}], "tree": "(S (UH Hi)"}]}"#
                .to_string(),
            r#"{"id": "leaves", "sentences": [{"tokens": [{"word": "Hi"}, {"word": "!"}], "tree": "(S (UH Hi))"}]}"#
                .to_string(),
            document_line("second"),
        ]
        .join("\n");

        let mut output = Vec::new();
        {
            let mut processor = DocumentProcessor::new(&patterns, &config, &mut output, 1);
            process_documents(&mut processor, input.as_bytes()).unwrap();
        }

        let output = String::from_utf8(output).unwrap();
        let ids: Vec<_> = output
            .lines()
            .map(|line| line.split('\t').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["first/1", "second/1"]);
    }
}
