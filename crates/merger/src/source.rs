//! Source: resolves each argument to something readable and opens it.

use std::path::PathBuf;
use std::sync::Arc;

use crate::alias::SourceSpec;
use crate::error::SourceError;
use crate::logs::{EntryStream, SourceId};
use crate::parser::{build_parser, FormatDetector, LogFormat, ParserContext};

/// Turns a source identifier into a local readable path.
///
/// Remote retrieval lives behind this seam so the merge pipeline only
/// ever deals with files.
pub trait Fetch {
    fn local_path(&self, spec: &SourceSpec) -> Result<PathBuf, SourceError>;
}

/// Local files only. URLs are refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFiles;

impl Fetch for LocalFiles {
    fn local_path(&self, spec: &SourceSpec) -> Result<PathBuf, SourceError> {
        if spec.is_remote {
            return Err(SourceError::RemoteUnsupported(spec.path.clone()));
        }
        Ok(spec.as_path().to_path_buf())
    }
}

/// One input: where it is, what it is called and how to read it.
#[derive(Debug, Clone)]
pub struct Source {
    pub id: SourceId,
    pub spec: SourceSpec,
    pub alias: Arc<str>,
    /// Explicit format; detected from content when absent
    pub format: Option<LogFormat>,
}

impl Source {
    /// Fetch, pick a recognizer and open the entry stream.
    pub fn open(
        &self,
        fetcher: &dyn Fetch,
        default_tz: chrono::FixedOffset,
    ) -> Result<EntryStream<std::io::BufReader<std::fs::File>>, SourceError> {
        let path = fetcher.local_path(&self.spec)?;
        let ctx = ParserContext::new(&path, default_tz);

        let parser = match self.format {
            Some(format) => build_parser(format, &ctx)?,
            None => FormatDetector::detect(&ctx)?,
        };

        EntryStream::open(&path, self.id, Arc::clone(&self.alias), parser).map_err(|source| {
            SourceError::Open {
                path: self.spec.path.clone(),
                source,
            }
        })
    }
}
