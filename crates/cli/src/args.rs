use std::path::PathBuf;

use clap::Parser;
use merger::{LogFormat, MergeConfig, MergeMode, SourceArg};

const ABOUT: &str = "Merge log files from many sources into one chronological stream";

const LONG_ABOUT: &str = "\
Reads every log file, orders entries by timestamp and writes them to
stdout. Each line gets a column after its timestamp naming the file it
came from, or its alias. Diagnostics go to stderr.

Formats are detected from the first lines of each file. Use the
per-format options to skip detection:

  --os-logs         2016-02-01 10:22:59.239 ...
  --msg-logs        Oct 15 14:11:19 ...         (year from file mtime)
  --msg-logs-ms     Mar 13 15:19:08.525234 ...  (year from file mtime)
  --timestamp-logs  [    0.003036] ...          (start time inferred from
                                                 file mtime and last entry)

The older two-letter spellings are accepted with a double dash:
--ol, --ml, --ms, --tl and --tz.

Lines without a timestamp are attached to the entry above them.";

const AFTER_HELP: &str = "\
An alias given as FILE:ALIAS always wins over generated ones.

Alias levels, for files without an explicit alias:
  0  full path
       $ logmerge -b /var/log/cinder/ -p .log api scheduler
         2016-02-01 10:23:34.680 [/var/log/cinder/api.log] ...
  1  file name as given, without base or postfix
       $ logmerge -a1 -b /var/log/cinder/ -p .log api scheduler
         2016-02-01 10:23:34.680 [api] ...
  2  level 1, plus: extension dropped unless given via --log-postfix,
     known service logs shortened (volume=VOL, scheduler=SCH, ...),
     project directories shortened (cinder=C, nova=N, neutron=Q, ...),
     directories that tell nothing apart removed
       $ logmerge -a2 node?/var/log/{cinder,nova}/*.log
         2016-02-01 10:23:34.680 [node1/C-SCH] ...
         2016-02-01 10:27:34.680 [node2/N-CPU] ...
  3  level 2, plus directory names cut to their shortest distinct ending
       $ logmerge -a3 node?/var/log/{cinder,nova}/*.log
         2016-02-01 10:23:34.680 [1/C-SCH] ...
         2016-02-01 10:27:34.680 [2/N-CPU] ...";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "logmerge", version, about = ABOUT, long_about = LONG_ABOUT, after_help = AFTER_HELP)]
#[command(arg_required_else_help = true)]
pub struct CliArgs {
    /// Log files, format detected from content
    #[arg(value_name = "LOG_FILE[:ALIAS]")]
    pub logfiles: Vec<String>,

    /// Base path prepended to every local log file
    #[arg(short = 'b', long = "log-base")]
    pub log_base: Option<String>,

    /// Appended to every local log file path
    #[arg(short = 'p', long = "log-postfix")]
    pub log_postfix: Option<String>,

    /// Alias generation level (0-3)
    #[arg(short = 'a', long = "alias-level", value_parser = clap::value_parser!(u8).range(0..=3))]
    pub alias_level: Option<u8>,

    /// OpenStack log files
    #[arg(long = "os-logs", visible_alias = "ol", num_args = 1.., value_name = "FILE[:ALIAS]")]
    pub os_logs: Vec<String>,

    /// Message log files, `Oct 15 14:11:19`
    #[arg(long = "msg-logs", visible_alias = "ml", num_args = 1.., value_name = "FILE[:ALIAS]")]
    pub msg_logs: Vec<String>,

    /// Message log files with microseconds, `Mar 13 15:19:08.525234`
    #[arg(long = "msg-logs-ms", visible_alias = "ms", num_args = 1.., value_name = "FILE[:ALIAS]")]
    pub msg_logs_ms: Vec<String>,

    /// Kernel-style logs with relative timestamps, `[    0.003036]`
    #[arg(long = "timestamp-logs", visible_alias = "tl", num_args = 1.., value_name = "FILE[:ALIAS]")]
    pub timestamp_logs: Vec<String>,

    /// UTC offset for timestamps without a zone [default: +0000]
    #[arg(short = 'z', long = "default-tz", visible_alias = "tz", value_name = "+HHMM", allow_hyphen_values = true)]
    pub default_tz: Option<String>,

    /// Stream the merge with one buffered entry per file (the default)
    #[arg(short = 'm', long = "min-memory", conflicts_with = "buffered")]
    pub min_memory: bool,

    /// Read all files fully before sorting
    #[arg(long)]
    pub buffered: bool,

    /// Config file [default: ./logmerge.toml if present]
    #[arg(short = 'c', long, env = "LOGMERGE_CONFIG_FILE", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// Command-line values override everything loaded before them.
    pub fn apply(&self, config: &mut MergeConfig) {
        if let Some(base) = &self.log_base {
            config.log_base = base.clone();
        }
        if let Some(postfix) = &self.log_postfix {
            config.log_postfix = postfix.clone();
        }
        if let Some(level) = self.alias_level {
            config.alias_level = level;
        }
        if let Some(tz) = &self.default_tz {
            config.default_tz = tz.clone();
        }
        if self.buffered {
            config.merge_mode = MergeMode::Buffered;
        } else if self.min_memory {
            config.merge_mode = MergeMode::Streaming;
        }
    }

    /// Every source argument, detected ones first.
    pub fn sources(&self) -> Vec<SourceArg> {
        let declared = [
            (&self.os_logs, LogFormat::OpenStack),
            (&self.msg_logs, LogFormat::Messages),
            (&self.msg_logs_ms, LogFormat::MessagesMicros),
            (&self.timestamp_logs, LogFormat::Kernel),
        ];

        self.logfiles
            .iter()
            .map(SourceArg::detect)
            .chain(declared.into_iter().flat_map(|(files, format)| {
                files.iter().map(move |file| SourceArg::with_format(file, format))
            }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("logmerge").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_definition() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_sources_keep_declared_formats() {
        let args = parse(&["a.log", "--os-logs", "n.log:N", "c.log", "--timestamp-logs", "dmesg"]);
        assert_eq!(
            args.sources(),
            vec![
                SourceArg::detect("a.log"),
                SourceArg::with_format("n.log:N", LogFormat::OpenStack),
                SourceArg::with_format("c.log", LogFormat::OpenStack),
                SourceArg::with_format("dmesg", LogFormat::Kernel),
            ]
        );
    }

    #[test]
    fn test_two_letter_spellings() {
        let args = parse(&["--ol", "n.log", "--ml", "m", "--ms", "mm", "--tl", "k", "--tz", "+0100"]);
        assert_eq!(
            args.sources(),
            vec![
                SourceArg::with_format("n.log", LogFormat::OpenStack),
                SourceArg::with_format("m", LogFormat::Messages),
                SourceArg::with_format("mm", LogFormat::MessagesMicros),
                SourceArg::with_format("k", LogFormat::Kernel),
            ]
        );
        assert_eq!(args.default_tz.as_deref(), Some("+0100"));
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&["-a", "2", "-b", "/var/log/", "-z", "-0500", "--buffered", "x"]);
        let mut config = MergeConfig::default();
        args.apply(&mut config);

        assert_eq!(config.alias_level, 2);
        assert_eq!(config.log_base, "/var/log/");
        assert_eq!(config.default_tz, "-0500");
        assert_eq!(config.merge_mode, MergeMode::Buffered);
    }

    #[test]
    fn test_unset_flags_leave_config_alone() {
        let args = parse(&["x"]);
        let mut config = MergeConfig {
            alias_level: 3,
            merge_mode: MergeMode::Buffered,
            ..MergeConfig::default()
        };
        args.apply(&mut config);

        assert_eq!(config.alias_level, 3);
        assert_eq!(config.merge_mode, MergeMode::Buffered);
    }

    #[test]
    fn test_alias_level_range() {
        let result = CliArgs::try_parse_from(["logmerge", "-a", "4", "x"]);
        assert!(result.is_err());
    }
}
