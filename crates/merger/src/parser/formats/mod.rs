pub mod strptime;
pub mod libvirt;
pub mod syslog;
pub mod kernel;
pub mod fuzzy;

pub use strptime::StrptimeParser;
pub use libvirt::LibvirtParser;
pub use syslog::RawSyslogParser;
pub use kernel::KernelParser;
pub use fuzzy::FuzzyParser;

use super::{LogFormat, ParseError, ParserContext, TimestampParser};

/// Construct the recognizer for `format` against one source.
///
/// Some recognizers need the file itself (mtime, tail scan) and fail to
/// construct when it is unusable.
pub fn build_parser(
    format: LogFormat,
    ctx: &ParserContext,
) -> Result<Box<dyn TimestampParser>, ParseError> {
    let parser: Box<dyn TimestampParser> = match format {
        LogFormat::OpenStack => Box::new(StrptimeParser::openstack(ctx)),
        LogFormat::Messages => Box::new(StrptimeParser::messages(ctx)?),
        LogFormat::MessagesMicros => Box::new(StrptimeParser::messages_micros(ctx)?),
        LogFormat::Libvirt => Box::new(LibvirtParser),
        LogFormat::RawSyslog => Box::new(RawSyslogParser),
        LogFormat::Kernel => Box::new(KernelParser::new(ctx)?),
        LogFormat::Fuzzy => Box::new(FuzzyParser::new(ctx.default_tz)),
    };
    Ok(parser)
}
