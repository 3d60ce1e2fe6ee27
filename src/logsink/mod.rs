//! Append-only probe log
//!
//! One line per completed probe, in the format
//! `[HH:MM:SS] <url> STATUS` with ` (Nms)` appended when the site was up:
//!
//! ```text
//! [14:02:10] https://example.com UP (123ms)
//! [14:02:20] https://example.com DOWN
//! ```
//!
//! Appends are best-effort; the dispatcher logs a warning on failure and
//! moves on.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::models::ProbeReport;

/// Append-only text sink for probe outcomes
pub struct ProbeLog {
    path: PathBuf,
}

impl ProbeLog {
    /// Create a log sink writing to the given path
    ///
    /// The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this sink appends to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format one report as a log line (without trailing newline)
    pub fn format_line(report: &ProbeReport) -> String {
        let time = report.completed_at.format("%H:%M:%S");
        match report.outcome.latency_ms {
            Some(ms) if report.outcome.ok => {
                format!("[{time}] {} {} ({ms}ms)", report.url, report.status)
            }
            _ => format!("[{time}] {} {}", report.url, report.status),
        }
    }

    /// Append one report to the log file
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be opened or
    /// written.
    pub fn append(&self, report: &ProbeReport) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(file, "{}", Self::format_line(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProbeOutcome, SiteStatus};
    use chrono::Local;

    fn report(ok: bool, latency_ms: Option<u64>) -> ProbeReport {
        ProbeReport {
            url: "https://example.com".to_string(),
            outcome: if ok {
                ProbeOutcome::up(latency_ms.unwrap_or(0), 200)
            } else {
                ProbeOutcome::down()
            },
            status: if ok { SiteStatus::Up } else { SiteStatus::Down },
            transition: None,
            completed_at: Local::now(),
        }
    }

    #[test]
    fn test_format_up_line_includes_latency() {
        let line = ProbeLog::format_line(&report(true, Some(123)));
        assert!(line.contains("https://example.com UP (123ms)"));
        assert!(line.starts_with('['));
    }

    #[test]
    fn test_format_down_line_has_no_latency() {
        let line = ProbeLog::format_line(&report(false, None));
        assert!(line.ends_with("https://example.com DOWN"));
        assert!(!line.contains("ms)"));
    }

    #[test]
    fn test_append_creates_and_extends_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.txt");
        let log = ProbeLog::new(&path);

        log.append(&report(true, Some(10))).unwrap();
        log.append(&report(false, None)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("UP (10ms)"));
        assert!(lines[1].contains("DOWN"));
    }
}
