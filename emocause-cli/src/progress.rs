use std::io::{self, Read, Seek, SeekFrom};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

pub struct ReadProgress<R> {
    inner: R,
    progress_bar: ProgressBar,
}

/// A progress bar that implements the `Read` and `Seek` traits.
///
/// This wrapper of `indicatif`'s `ProgressBar` updates progress based on the
/// current offset within the file.
impl<R> ReadProgress<R>
where
    R: Seek,
{
    pub fn new(mut read: R) -> io::Result<Self> {
        let len = read.seek(SeekFrom::End(0))?;
        read.seek(SeekFrom::Start(0))?;

        let style = ProgressStyle::default_bar()
            .template("{bar} {bytes}/{total_bytes} ({eta})")
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let progress_bar = ProgressBar::new(len);
        progress_bar.set_style(style);

        Ok(ReadProgress {
            inner: read,
            progress_bar,
        })
    }
}

impl<R> Read for ReadProgress<R>
where
    R: Read + Seek,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n_read = self.inner.read(buf)?;
        let pos = self.inner.stream_position()?;
        self.progress_bar.set_position(pos);
        Ok(n_read)
    }
}

impl<R> Drop for ReadProgress<R> {
    fn drop(&mut self) {
        self.progress_bar.finish();
    }
}

/// Measure the number of documents processed per second.
///
/// The processing speed and the number of extractions are logged when
/// an `ExtractionSpeed` instance is dropped.
pub struct ExtractionSpeed {
    start: Instant,
    n_documents: usize,
    n_skipped: usize,
    n_extractions: usize,
}

impl ExtractionSpeed {
    pub fn new() -> Self {
        ExtractionSpeed {
            start: Instant::now(),
            n_documents: 0,
            n_skipped: 0,
            n_extractions: 0,
        }
    }

    /// Count a processed document and its extractions.
    pub fn count_document(&mut self, n_extractions: usize) {
        self.n_documents += 1;
        self.n_extractions += n_extractions;
    }

    /// Count a document that could not be processed.
    pub fn count_skipped(&mut self) {
        self.n_skipped += 1;
    }
}

impl Default for ExtractionSpeed {
    fn default() -> Self {
        ExtractionSpeed::new()
    }
}

impl Drop for ExtractionSpeed {
    fn drop(&mut self) {
        let elapsed_secs = self.start.elapsed().as_secs_f32();
        log::info!(
            "Processed {} documents in {:.1}s ({:.1} docs/s), {} extractions, {} skipped",
            self.n_documents,
            elapsed_secs,
            self.n_documents as f32 / elapsed_secs,
            self.n_extractions,
            self.n_skipped
        );
    }
}
