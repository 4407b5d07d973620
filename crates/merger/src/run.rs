use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

use crate::alias::{resolve_aliases, SourceSpec};
use crate::conf::MergeConfig;
use crate::error::{MergeError, SourceError};
use crate::logs::{write_entries, SourceId};
use crate::merge::merge;
use crate::parser::{DetectError, LogFormat};
use crate::source::{Fetch, Source};

/// A source argument as given by the user, `path[:alias]`, with the
/// format it was declared as, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArg {
    pub arg: String,
    pub format: Option<LogFormat>,
}

impl SourceArg {
    pub fn detect(arg: impl Into<String>) -> Self {
        Self {
            arg: arg.into(),
            format: None,
        }
    }

    pub fn with_format(arg: impl Into<String>, format: LogFormat) -> Self {
        Self {
            arg: arg.into(),
            format: Some(format),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sources_merged: usize,
    pub sources_skipped: usize,
    pub entries_written: u64,
}

/// Resolve, label and order the sources of a run. The same path given
/// twice is only read once.
pub fn plan_sources(config: &MergeConfig, args: &[SourceArg]) -> Vec<Source> {
    let mut seen = HashSet::new();
    let mut planned: Vec<(SourceSpec, Option<LogFormat>)> = Vec::with_capacity(args.len());
    for arg in args {
        let spec = SourceSpec::parse(&arg.arg, &config.log_base, &config.log_postfix);
        if !seen.insert(spec.path.clone()) {
            tracing::warn!("{} given more than once, using the first occurrence", spec.path);
            continue;
        }
        planned.push((spec, arg.format));
    }

    let specs: Vec<SourceSpec> = planned.iter().map(|(spec, _)| spec.clone()).collect();
    let aliases = resolve_aliases(&specs, config.alias_level, !config.log_postfix.is_empty());

    planned
        .into_iter()
        .zip(aliases)
        .enumerate()
        .map(|(index, ((spec, format), alias))| Source {
            id: SourceId(index),
            spec,
            alias: Arc::from(alias),
            format,
        })
        .collect()
}

/// Merge every usable source into `out`.
///
/// Configuration problems abort the run before anything is read. A
/// source that cannot be fetched, recognized or opened is reported and
/// left out.
pub fn run<W: Write>(
    config: &MergeConfig,
    args: &[SourceArg],
    fetcher: &dyn Fetch,
    out: W,
) -> Result<RunSummary, MergeError> {
    let default_tz = config.validate()?;
    let sources = plan_sources(config, args);

    let mut streams = Vec::with_capacity(sources.len());
    let mut skipped = 0;
    for source in &sources {
        match source.open(fetcher, default_tz) {
            Ok(stream) => {
                tracing::debug!(source = %source.spec.path, id = %source.id, alias = %source.alias, "source opened");
                streams.push(stream);
            }
            Err(SourceError::Detect(DetectError::Undetected(path))) => {
                tracing::warn!("{} unable to determine format, ignoring", path);
                skipped += 1;
            }
            Err(e) => {
                tracing::warn!("{} ignored: {}", source.spec.path, e);
                skipped += 1;
            }
        }
    }

    let sources_merged = streams.len();
    let entries_written = write_entries(merge(streams, config.merge_mode), out).map_err(MergeError::Output)?;

    tracing::info!(
        sources = sources_merged,
        skipped,
        entries = entries_written,
        mode = %config.merge_mode,
        "merge complete"
    );

    Ok(RunSummary {
        sources_merged,
        sources_skipped: skipped,
        entries_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::source::LocalFiles;

    #[test]
    fn test_plan_dedups_paths() {
        let config = MergeConfig {
            log_base: "/var/log/".to_string(),
            alias_level: 1,
            ..MergeConfig::default()
        };
        let args = [
            SourceArg::detect("nova/api.log:API"),
            SourceArg::with_format("nova/api.log", LogFormat::OpenStack),
            SourceArg::detect("cinder/volume.log"),
        ];

        let sources = plan_sources(&config, &args);

        assert_eq!(sources.len(), 2);
        assert_eq!(&*sources[0].alias, "API");
        assert_eq!(sources[0].format, None);
        assert_eq!(sources[1].spec.path, "/var/log/cinder/volume.log");
        assert_eq!(&*sources[1].alias, "cinder/volume.log");
        assert_eq!(sources[1].id, SourceId(1));
    }

    #[test]
    fn test_invalid_timezone_aborts_before_reading() {
        let config = MergeConfig {
            default_tz: "UTC".to_string(),
            ..MergeConfig::default()
        };
        let mut out = Vec::new();
        let err = run(&config, &[SourceArg::detect("/nonexistent")], &LocalFiles, &mut out).unwrap_err();

        assert!(matches!(err, MergeError::Config(ConfigError::Timezone(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_unreadable_sources_are_skipped() {
        let mut out = Vec::new();
        let summary = run(
            &MergeConfig::default(),
            &[SourceArg::detect("/nonexistent/a.log"), SourceArg::detect("http://server/b.log")],
            &LocalFiles,
            &mut out,
        )
        .unwrap();

        assert_eq!(summary.sources_merged, 0);
        assert_eq!(summary.sources_skipped, 2);
        assert_eq!(summary.entries_written, 0);
    }
}
