use std::fs::File;
use std::io::BufReader;

use super::formats::build_parser;
use super::model::{DetectError, ParserContext};
use super::traits::*;
use super::DETECTION_SAMPLE_SIZE;
use crate::logs::lines::LineReader;

/// Format detector for one source
///
/// 1. Construct every recognizer that can be built for the source
///    (construction failure silently drops the candidate)
/// 2. Walk the first `DETECTION_SAMPLE_SIZE` lines, trying candidates in
///    priority order on each
/// 3. The first candidate to recognize a line wins
pub struct FormatDetector {
    candidates: Vec<Box<dyn TimestampParser>>,
}

impl FormatDetector {
    pub fn for_source(ctx: &ParserContext) -> Self {
        let candidates = LogFormat::DETECTION_ORDER
            .iter()
            .filter_map(|&format| match build_parser(format, ctx) {
                Ok(parser) => Some(parser),
                Err(e) => {
                    tracing::debug!(
                        source = %ctx.display_path(),
                        format = %format,
                        error = %e,
                        "detection candidate unavailable"
                    );
                    None
                }
            })
            .collect();

        Self::with_candidates(candidates)
    }

    /// Candidates are tried in the order given.
    pub fn with_candidates(candidates: Vec<Box<dyn TimestampParser>>) -> Self {
        Self { candidates }
    }

    pub fn candidate_formats(&self) -> Vec<LogFormat> {
        self.candidates.iter().map(|parser| parser.format()).collect()
    }

    /// Pick the recognizer for a sample of lines, or `None` if no
    /// candidate recognizes any of the first `DETECTION_SAMPLE_SIZE`.
    pub fn select<I, S>(mut self, samples: I) -> Option<Box<dyn TimestampParser>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in samples.into_iter().take(DETECTION_SAMPLE_SIZE) {
            let line = line.as_ref();
            if let Some(pos) = self
                .candidates
                .iter()
                .position(|parser| parser.parse(line).is_recognized())
            {
                return Some(self.candidates.swap_remove(pos));
            }
        }
        None
    }

    /// Detect the format of a file on disk.
    pub fn detect(ctx: &ParserContext) -> Result<Box<dyn TimestampParser>, DetectError> {
        let io_error = |source: std::io::Error| DetectError::Io {
            path: ctx.display_path(),
            source,
        };

        let detector = Self::for_source(ctx);
        let file = File::open(ctx.path()).map_err(io_error)?;

        let mut samples = Vec::with_capacity(DETECTION_SAMPLE_SIZE);
        for line in LineReader::new(BufReader::new(file)).take(DETECTION_SAMPLE_SIZE) {
            samples.push(line.map_err(io_error)?);
        }

        let parser = detector
            .select(&samples)
            .ok_or_else(|| DetectError::Undetected(ctx.display_path()))?;

        tracing::info!("Detected {} as {}", ctx.display_path(), parser.format());
        Ok(parser)
    }
}
