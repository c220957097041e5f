//! Parsing of resource usage reports printed by `time`

use crate::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Flavour of the `time` report on stderr
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TimeFormat {
    /// BSD/macOS `time -l`: `<secs> real` and `<bytes>  maximum resident set size`
    #[default]
    Bsd,
    /// GNU `time -v`: `Elapsed (wall clock) time` and `Maximum resident set size (kbytes)`
    Gnu,
}

/// Wall time and peak memory of one run
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ResourceUsage {
    pub real_secs: f64,
    /// Peak resident set size in bytes
    pub max_rss: u64,
}

const BSD_REAL: &str = " real";
const BSD_RSS: &str = "  maximum resident set size";
const GNU_ELAPSED: &str = "Elapsed (wall clock) time";
const GNU_RSS: &str = "Maximum resident set size (kbytes):";

/// Extract wall time and peak RSS from a `time` report
pub fn parse_usage(stderr: &str, format: TimeFormat) -> Result<ResourceUsage> {
    match format {
        TimeFormat::Bsd => {
            let real_secs = bsd_real(stderr)
                .ok_or_else(|| Error::PatternNotFound("<float> real".into()))?;
            let max_rss = bsd_rss(stderr).ok_or_else(|| {
                Error::PatternNotFound("<integer>  maximum resident set size".into())
            })?;
            Ok(ResourceUsage { real_secs, max_rss })
        }
        TimeFormat::Gnu => {
            let real_secs = gnu_elapsed(stderr)
                .ok_or_else(|| Error::PatternNotFound(format!("{GNU_ELAPSED}: [h:]m:ss")))?;
            let max_rss = gnu_rss(stderr)
                .ok_or_else(|| Error::PatternNotFound(format!("{GNU_RSS} <integer>")))?;
            Ok(ResourceUsage { real_secs, max_rss })
        }
    }
}

fn bsd_real(text: &str) -> Option<f64> {
    text.match_indices(BSD_REAL)
        .find_map(|(idx, _)| decimal_before(&text[..idx]))
        .and_then(|s| s.parse().ok())
}

fn bsd_rss(text: &str) -> Option<u64> {
    text.match_indices(BSD_RSS)
        .find_map(|(idx, _)| integer_before(&text[..idx]))
        .and_then(|s| s.parse().ok())
}

fn gnu_elapsed(text: &str) -> Option<f64> {
    let line = text.lines().find(|l| l.contains(GNU_ELAPSED))?;
    let (_, value) = line.rsplit_once(": ")?;
    // [h:]m:ss[.ff]
    let mut secs = 0.0;
    for part in value.trim().split(':') {
        secs = secs * 60.0 + part.parse::<f64>().ok()?;
    }
    Some(secs)
}

fn gnu_rss(text: &str) -> Option<u64> {
    let line = text.lines().find(|l| l.contains(GNU_RSS))?;
    let (_, value) = line.split_once(GNU_RSS)?;
    value.trim().parse::<u64>().ok()?.checked_mul(1024)
}

/// Start of the run of ASCII digits ending at `end`
fn digits_start(bytes: &[u8], end: usize) -> usize {
    let mut start = end;
    while start > 0 && bytes[start - 1].is_ascii_digit() {
        start -= 1;
    }
    start
}

/// Trailing `\d+` of `s`
fn integer_before(s: &str) -> Option<&str> {
    let start = digits_start(s.as_bytes(), s.len());
    (start < s.len()).then(|| &s[start..])
}

/// Trailing `\d+\.\d+` of `s`
fn decimal_before(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let frac_start = digits_start(bytes, bytes.len());
    if frac_start == bytes.len() || frac_start == 0 || bytes[frac_start - 1] != b'.' {
        return None;
    }
    let dot = frac_start - 1;
    let int_start = digits_start(bytes, dot);
    (int_start < dot).then(|| &s[int_start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    const BSD_REPORT: &str = "\
        0.42 real         0.30 user         0.10 sys
  12345678  maximum resident set size
         0  average shared memory size
";

    const GNU_REPORT: &str = "\
\tCommand being timed: \"llvm-undname\"
\tElapsed (wall clock) time (h:mm:ss or m:ss): 1:02.50
\tMaximum resident set size (kbytes): 2048
\tExit status: 0
";

    #[test]
    fn test_parse_bsd() {
        let usage = parse_usage(BSD_REPORT, TimeFormat::Bsd).unwrap();
        assert!((usage.real_secs - 0.42).abs() < 1e-9);
        assert_eq!(usage.max_rss, 12_345_678);
    }

    #[test]
    fn test_parse_bsd_skips_non_decimal_real() {
        let report = "real 7 real\n  3.5 real\n10  maximum resident set size\n";
        let usage = parse_usage(report, TimeFormat::Bsd).unwrap();
        assert!((usage.real_secs - 3.5).abs() < 1e-9);
        assert_eq!(usage.max_rss, 10);
    }

    #[test]
    fn test_parse_bsd_missing_real() {
        let err = parse_usage("  100  maximum resident set size\n", TimeFormat::Bsd).unwrap_err();
        assert!(matches!(err, Error::PatternNotFound(p) if p.contains("real")));
    }

    #[test]
    fn test_parse_bsd_missing_rss() {
        // One space is not enough.
        let err = parse_usage("1.0 real\n100 maximum resident set size\n", TimeFormat::Bsd)
            .unwrap_err();
        assert!(matches!(err, Error::PatternNotFound(p) if p.contains("resident")));
    }

    #[test]
    fn test_parse_gnu() {
        let usage = parse_usage(GNU_REPORT, TimeFormat::Gnu).unwrap();
        assert!((usage.real_secs - 62.5).abs() < 1e-9);
        assert_eq!(usage.max_rss, 2048 * 1024);
    }

    #[test]
    fn test_parse_gnu_with_hours() {
        let report = "Elapsed (wall clock) time (h:mm:ss or m:ss): 1:00:01\n\
                      Maximum resident set size (kbytes): 1\n";
        let usage = parse_usage(report, TimeFormat::Gnu).unwrap();
        assert!((usage.real_secs - 3601.0).abs() < 1e-9);
        assert_eq!(usage.max_rss, 1024);
    }

    #[test]
    fn test_parse_gnu_rejects_bsd_report() {
        assert!(parse_usage(BSD_REPORT, TimeFormat::Gnu).is_err());
    }

    #[test]
    fn test_decimal_before() {
        assert_eq!(decimal_before("  12.05"), Some("12.05"));
        assert_eq!(decimal_before("1.2.34"), Some("2.34"));
        assert_eq!(decimal_before("12."), None);
        assert_eq!(decimal_before(".5"), None);
        assert_eq!(decimal_before("42"), None);
    }
}
