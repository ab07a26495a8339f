use std::path::{Path, PathBuf};
use std::time::Instant;

use model::ProcessedDomain;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::domain::DomainProcessor;
use crate::error::ConvertError;
use crate::stream::{CrawlDataStream, JsonlCrawlDataStream};

/// Convert many domains in parallel, one worker per domain.
///
/// Results come back in input order. A domain that fails yields its error in
/// its own slot and leaves the others untouched. Oversized streams are still
/// converted through sideload mode but materialized before returning.
pub fn convert_batch<S: CrawlDataStream>(
    processor: &DomainProcessor,
    streams: Vec<S>,
) -> Vec<Result<ProcessedDomain, ConvertError>> {
    let started = Instant::now();
    let total = streams.len();

    let results: Vec<Result<ProcessedDomain, ConvertError>> = streams
        .into_par_iter()
        .enumerate()
        .map(|(index, stream)| {
            let result = processor
                .create_writable(stream)
                .map(|converted| converted.into_processed_domain());
            if let Err(err) = &result {
                warn!(index, error = %err, "domain_conversion_failure");
            }
            result
        })
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(
        domains = total,
        failed,
        elapsed_micros = started.elapsed().as_micros() as u64,
        "batch_converted"
    );
    results
}

/// [`convert_batch`] over JSON Lines crawl files. A file that cannot be
/// opened fails only its own domain.
pub fn convert_files<P: AsRef<Path>>(
    processor: &DomainProcessor,
    paths: &[P],
) -> Vec<(PathBuf, Result<ProcessedDomain, ConvertError>)> {
    let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();

    paths
        .into_par_iter()
        .map(|path| {
            let result = JsonlCrawlDataStream::open(&path)
                .map_err(ConvertError::from)
                .and_then(|stream| processor.create_writable(stream))
                .map(|converted| converted.into_processed_domain());
            if let Err(err) = &result {
                warn!(path = %path.display(), error = %err, "domain_conversion_failure");
            }
            (path, result)
        })
        .collect()
}
