//! Crawl data streams.
//!
//! A stream yields [`CrawlData`] records in crawl order; the first record of a
//! well-formed stream is the domain header. Streams are pulled synchronously.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use model::CrawlData;

use crate::error::StreamError;

pub trait CrawlDataStream: Iterator<Item = Result<CrawlData, StreamError>> + Send {
    /// Size of the underlying data, when known. Used to pick the processing
    /// mode.
    fn size_bytes(&self) -> Option<u64> {
        None
    }

    /// Release the underlying resources. Further calls to `next` yield `None`.
    fn close(&mut self) {}
}

/// Records held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCrawlDataStream {
    records: VecDeque<CrawlData>,
    size_bytes: Option<u64>,
}

impl InMemoryCrawlDataStream {
    pub fn new(records: impl IntoIterator<Item = CrawlData>) -> Self {
        Self {
            records: records.into_iter().collect(),
            size_bytes: None,
        }
    }

    /// Report `size` from [`CrawlDataStream::size_bytes`].
    pub fn with_size_bytes(mut self, size: u64) -> Self {
        self.size_bytes = Some(size);
        self
    }
}

impl Iterator for InMemoryCrawlDataStream {
    type Item = Result<CrawlData, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.pop_front().map(Ok)
    }
}

impl CrawlDataStream for InMemoryCrawlDataStream {
    fn size_bytes(&self) -> Option<u64> {
        self.size_bytes
    }

    fn close(&mut self) {
        self.records.clear();
    }
}

/// One JSON record per line. Blank lines are skipped.
#[derive(Debug)]
pub struct JsonlCrawlDataStream {
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
    line: usize,
    size_bytes: u64,
}

impl JsonlCrawlDataStream {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let path = path.as_ref().to_path_buf();
        let io_err = |source| StreamError::Io {
            path: path.clone(),
            source,
        };

        let file = File::open(&path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        Ok(Self {
            lines: Some(BufReader::new(file).lines()),
            path,
            line: 0,
            size_bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for JsonlCrawlDataStream {
    type Item = Result<CrawlData, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        let lines = self.lines.as_mut()?;
        loop {
            let raw = match lines.next()? {
                Ok(raw) => raw,
                Err(source) => {
                    return Some(Err(StreamError::Io {
                        path: self.path.clone(),
                        source,
                    }));
                }
            };
            self.line += 1;

            if raw.trim().is_empty() {
                continue;
            }
            let line = self.line;
            return Some(
                serde_json::from_str(&raw).map_err(|source| StreamError::Parse { line, source }),
            );
        }
    }
}

impl CrawlDataStream for JsonlCrawlDataStream {
    fn size_bytes(&self) -> Option<u64> {
        Some(self.size_bytes)
    }

    fn close(&mut self) {
        self.lines = None;
    }
}
