use std::io::Write;

use anyhow::Result;
use emocause::config::ExtractionConfig;
use emocause::document::Document;
use emocause::error::EmoCauseError;
use emocause::extract::{Extraction, Extractor};
use emocause::pattern::PatternSet;
use rayon::prelude::*;

use crate::progress::ExtractionSpeed;

pub struct DocumentProcessor<'a, W>
where
    W: Write,
{
    patterns: &'a PatternSet,
    config: &'a ExtractionConfig,
    writer: W,
    read_ahead: usize,
    buffer: Vec<Document>,
    speed: ExtractionSpeed,
}

impl<'a, W> DocumentProcessor<'a, W>
where
    W: Write,
{
    /// Construct a new document processor.
    ///
    /// Extractions are found with `patterns` and written to `writer`
    /// as tab-separated lines. The processor reads ahead `read_ahead`
    /// documents, which are then processed in parallel. The output
    /// preserves the order of the input.
    pub fn new(
        patterns: &'a PatternSet,
        config: &'a ExtractionConfig,
        writer: W,
        read_ahead: usize,
    ) -> Self {
        assert!(read_ahead > 0, "Read ahead should at least be 1.");

        DocumentProcessor {
            patterns,
            config,
            writer,
            read_ahead,
            buffer: Vec::with_capacity(read_ahead),
            speed: ExtractionSpeed::new(),
        }
    }

    /// Process a document.
    ///
    /// Documents are not processed until `read_ahead` documents are
    /// queued or the processor is dropped.
    ///
    /// Extraction is parallelized using Rayon's global thread pool.
    pub fn process(&mut self, document: Document) -> Result<()> {
        self.buffer.push(document);

        if self.buffer.len() == self.read_ahead {
            self.extract_buffered_documents()?;
        }

        Ok(())
    }

    /// Count a document that was skipped before processing.
    pub fn skip(&mut self) {
        self.speed.count_skipped();
    }

    fn extract_buffered_documents(&mut self) -> Result<()> {
        let patterns = self.patterns;
        let config = self.config;

        let results: Vec<Result<Vec<Extraction>, EmoCauseError>> = self
            .buffer
            .par_iter()
            .map(|document| {
                let mentions = document.mention_index();
                Extractor::new(document, &mentions, config).extract_document(patterns)
            })
            .collect();

        let documents = std::mem::take(&mut self.buffer);
        for (document, result) in documents.iter().zip(results) {
            match result {
                Ok(extractions) => {
                    self.speed.count_document(extractions.len());
                    for extraction in extractions {
                        writeln!(self.writer, "{}", extraction)?;
                    }
                }
                Err(err) => {
                    log::warn!("Skipping document {}: {}", document.id(), err);
                    self.speed.count_skipped();
                }
            }
        }

        self.writer.flush()?;

        Ok(())
    }
}

impl<'a, W> Drop for DocumentProcessor<'a, W>
where
    W: Write,
{
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            if let Err(err) = self.extract_buffered_documents() {
                log::error!("Error extracting from documents: {}", err);
            }
        }
    }
}
