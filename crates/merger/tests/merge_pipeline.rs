use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use merger::{run, LocalFiles, LogFormat, MergeConfig, MergeMode, SourceArg};

fn write_log(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn arg(path: &Path, alias: &str) -> SourceArg {
    SourceArg::detect(format!("{}:{}", path.display(), alias))
}

/// Log sink shared with a test subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn merged_output(config: &MergeConfig, args: &[SourceArg]) -> String {
    let mut out = Vec::new();
    run(config, args, &LocalFiles, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_two_sources_interleave() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_log(
        dir.path(),
        "a.log",
        "2020-01-01 00:00:00.100 one\n2020-01-01 00:00:00.200 two\n",
    );
    let b = write_log(dir.path(), "b.log", "2020-01-01 00:00:00.150 mid\n");

    let output = merged_output(&MergeConfig::default(), &[arg(&a, "A"), arg(&b, "B")]);

    assert_eq!(
        output,
        "2020-01-01 00:00:00.100 [A] one\n\
         2020-01-01 00:00:00.150 [B] mid\n\
         2020-01-01 00:00:00.200 [A] two\n"
    );
}

#[test]
fn test_modes_write_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_log(
        dir.path(),
        "a.log",
        "2020-01-01 00:00:00.100 a1\n  trace\n2020-01-01 00:00:00.300 a2\n2020-01-01 00:00:00.300 a3\n",
    );
    let b = write_log(
        dir.path(),
        "b.log",
        "2020-01-01 00:00:00.300 b1\n2020-01-01 00:00:00.400 b2\n",
    );
    let args = [arg(&a, "A"), arg(&b, "B")];

    let buffered = MergeConfig {
        merge_mode: MergeMode::Buffered,
        ..MergeConfig::default()
    };
    let streaming = MergeConfig {
        merge_mode: MergeMode::Streaming,
        ..MergeConfig::default()
    };

    let output = merged_output(&streaming, &args);
    assert_eq!(merged_output(&buffered, &args), output);

    let payloads: Vec<&str> = output
        .lines()
        .filter_map(|line| line.split("] ").nth(1))
        .collect();
    assert_eq!(payloads, vec!["a1", "a2", "a3", "b1", "b2"]);
}

#[test]
fn test_continuation_lines_are_padded_in_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_log(
        dir.path(),
        "a.log",
        "2020-01-01 00:00:00.100 data1\nextra1\n2020-01-01 00:00:00.200 data2\n",
    );

    let output = merged_output(&MergeConfig::default(), &[arg(&a, "A")]);
    let padding = " ".repeat(40);

    assert_eq!(
        output,
        format!(
            "2020-01-01 00:00:00.100 [A] data1\n{padding}extra1\n2020-01-01 00:00:00.200 [A] data2\n"
        )
    );
}

#[test]
fn test_undetectable_source_is_left_out() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_log(dir.path(), "good.log", "2020-01-01 00:00:00.100 kept\n");
    let bad = write_log(dir.path(), "bad.log", "no\ntimestamps\nin\nthe\nfirst five\n");

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let mut out = Vec::new();
    let summary = tracing::subscriber::with_default(subscriber, || {
        run(
            &MergeConfig::default(),
            &[arg(&good, "G"), arg(&bad, "X")],
            &LocalFiles,
            &mut out,
        )
    })
    .unwrap();

    let warnings = logs.contents();
    assert!(warnings.contains("WARN"));
    assert!(warnings.contains(&format!("{} unable to determine format, ignoring", bad.display())));

    assert_eq!(summary.sources_merged, 1);
    assert_eq!(summary.sources_skipped, 1);
    assert_eq!(summary.entries_written, 1);
    assert_eq!(String::from_utf8(out).unwrap(), "2020-01-01 00:00:00.100 [G] kept\n");
}

#[test]
fn test_mixed_formats_compare_on_absolute_time() {
    let dir = tempfile::tempdir().unwrap();
    // 10:00:00.500 at +02:00 is 08:00:00.500 UTC
    let libvirt = write_log(
        dir.path(),
        "libvirtd.log",
        "2020-06-01 10:00:00.500+0200: 1234: info : started\n",
    );
    let qemu = write_log(
        dir.path(),
        "qemu.log",
        "2020-06-01T08:00:00.250000Z qemu-kvm: boot\n",
    );
    let nova = write_log(dir.path(), "nova.log", "2020-06-01 08:00:01.000 INFO nova\n");

    let output = merged_output(
        &MergeConfig::default(),
        &[arg(&libvirt, "L"), arg(&qemu, "Q"), arg(&nova, "N")],
    );
    let aliases: Vec<&str> = output
        .lines()
        .filter_map(|line| line.split(" [").nth(1))
        .filter_map(|rest| rest.split(']').next())
        .collect();

    assert_eq!(aliases, vec!["Q", "L", "N"]);
}

#[test]
fn test_declared_messages_format_takes_year_from_mtime() {
    let dir = tempfile::tempdir().unwrap();
    let messages = write_log(dir.path(), "messages", "Oct 15 14:11:19 host sshd: accepted\n");
    // 2021-01-01T00:00:00Z
    File::options()
        .write(true)
        .open(&messages)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_609_459_200))
        .unwrap();
    let nova = write_log(dir.path(), "nova.log", "2021-10-15 14:11:20.000 INFO later\n");

    let args = [
        SourceArg::with_format(format!("{}:M", messages.display()), LogFormat::Messages),
        arg(&nova, "N"),
    ];
    let output = merged_output(&MergeConfig::default(), &args);

    assert_eq!(
        output,
        "Oct 15 14:11:19 [M] host sshd: accepted\n2021-10-15 14:11:20.000 [N] INFO later\n"
    );
}

#[test]
fn test_alias_level_two_labels() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("node1/cinder")).unwrap();
    std::fs::create_dir_all(dir.path().join("node1/nova")).unwrap();
    write_log(dir.path(), "node1/cinder/volume.log", "2020-01-01 00:00:00.100 vol\n");
    write_log(dir.path(), "node1/nova/nova-compute.log", "2020-01-01 00:00:00.200 cpu\n");

    let config = MergeConfig {
        alias_level: 2,
        log_base: format!("{}/", dir.path().display()),
        ..MergeConfig::default()
    };
    let args = [
        SourceArg::detect("node1/cinder/volume.log"),
        SourceArg::detect("node1/nova/nova-compute.log"),
    ];

    assert_eq!(
        merged_output(&config, &args),
        "2020-01-01 00:00:00.100 [C-VOL] vol\n2020-01-01 00:00:00.200 [N-CPU] cpu\n"
    );
}
