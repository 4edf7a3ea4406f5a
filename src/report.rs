//! Rendering of scan progress and probe results.

use std::io::{self, Write};

use console::style;
use serde::Serialize;

use crate::check::{CheckResult, Status};
use crate::platform::Platform;
use crate::scan::ScanSummary;

const RULE: &str = "======================================";

/// Width the platform column is padded to in text output.
const PLATFORM_COLUMN: usize = 15;

/// How results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable lines with `[+]`, `[-]` and `[!]` markers.
    #[default]
    Text,
    /// One JSON object per result, nothing else.
    Json,
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    platform: &'a str,
    variant: &'a str,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Writes scan output to `W` as it happens.
#[derive(Debug)]
pub struct Reporter<W> {
    out: W,
    format: OutputFormat,
    found_only: bool,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter. With `found_only`, only found results are printed.
    pub fn new(out: W, format: OutputFormat, found_only: bool) -> Self {
        Self {
            out,
            format,
            found_only,
        }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Banner printed once per base username.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the output fails.
    pub fn begin_scan(&mut self, base: &str) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        writeln!(self.out, "Processing scan, please wait...")?;
        writeln!(self.out)?;
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "     OSINT RESULTS FOR BASE: {base}")?;
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    /// Section header for one variant.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the output fails.
    pub fn begin_variant(&mut self, variant: &str) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        writeln!(self.out, "--- Username variant: {variant} ---")?;
        self.out.flush()
    }

    /// One probe result.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the output fails.
    pub fn result(&mut self, platform: &Platform, result: &CheckResult) -> io::Result<()> {
        if self.found_only && result.status() != Status::Found {
            return Ok(());
        }

        match self.format {
            OutputFormat::Json => {
                let record = ResultRecord {
                    platform: result.platform,
                    variant: &result.variant,
                    status: result.status(),
                    url: result.url(),
                    error: result.error().map(ToString::to_string),
                };
                serde_json::to_writer(&mut self.out, &record)?;
                writeln!(self.out)?;
            }
            OutputFormat::Text => {
                let name = format!("{:<width$}", platform.display_name, width = PLATFORM_COLUMN);
                let line = match (result.url(), result.error()) {
                    (Some(url), _) => style(format!("[+] {name} FOUND  -> {url}")).green(),
                    (None, Some(e)) => style(format!("[!] {name} error: {e}")).yellow(),
                    (None, None) => style(format!("[-] {name} not found")).red(),
                };
                writeln!(self.out, "{line}")?;
            }
        }
        self.out.flush()
    }

    /// Closes a variant section.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the output fails.
    pub fn end_variant(&mut self, found_any: bool) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        if !found_any {
            writeln!(
                self.out,
                "{}",
                style("No profiles found for this variant.").red()
            )?;
        }
        writeln!(self.out)
    }

    /// Closing line of a scan.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the output fails.
    pub fn end_scan(&mut self, summary: &ScanSummary) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.out.flush();
        }
        writeln!(
            self.out,
            "Scan complete: {} profile(s) found across {} variant(s).",
            summary.found, summary.variants
        )?;
        if summary.errors > 0 {
            writeln!(
                self.out,
                "{}",
                style(format!("{} probe(s) failed.", summary.errors)).yellow()
            )?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckError, Verdict};
    use crate::platform;

    fn rendered(format: OutputFormat, found_only: bool, results: &[CheckResult]) -> String {
        let github = platform::find("github").unwrap();
        let mut reporter = Reporter::new(Vec::new(), format, found_only);
        for r in results {
            reporter.result(github, r).unwrap();
        }
        console::strip_ansi_codes(&String::from_utf8(reporter.into_inner()).unwrap()).into_owned()
    }

    fn results() -> Vec<CheckResult> {
        vec![
            CheckResult {
                platform: "github",
                variant: "john.doe".into(),
                verdict: Verdict::Found {
                    url: "https://github.com/john.doe".into(),
                },
            },
            CheckResult {
                platform: "github",
                variant: "john.doe".into(),
                verdict: Verdict::NotFound,
            },
            CheckResult {
                platform: "github",
                variant: "john.doe".into(),
                verdict: Verdict::Error(CheckError::UnexpectedStatus(500)),
            },
        ]
    }

    #[test]
    fn text_lines_use_markers_and_padding() {
        let out = rendered(OutputFormat::Text, false, &results());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "[+] GitHub          FOUND  -> https://github.com/john.doe",
                "[-] GitHub          not found",
                "[!] GitHub          error: unexpected HTTP status 500",
            ]
        );
    }

    #[test]
    fn found_only_hides_misses_and_errors() {
        let out = rendered(OutputFormat::Text, true, &results());
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("[+] GitHub"));
    }

    #[test]
    fn json_lines_carry_url_only_when_found() {
        let out = rendered(OutputFormat::Json, false, &results());
        let records: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0]["status"], "found");
        assert_eq!(records[0]["url"], "https://github.com/john.doe");
        assert_eq!(records[0]["variant"], "john.doe");

        assert_eq!(records[1]["status"], "not_found");
        assert!(records[1].get("url").is_none());

        assert_eq!(records[2]["status"], "error");
        assert!(records[2].get("url").is_none());
        assert_eq!(records[2]["error"], "unexpected HTTP status 500");
    }

    #[test]
    fn text_scan_frame() {
        let mut reporter = Reporter::new(Vec::new(), OutputFormat::Text, false);
        reporter.begin_scan("john_doe").unwrap();
        reporter.begin_variant("john_doe").unwrap();
        reporter.end_variant(false).unwrap();
        reporter
            .end_scan(&ScanSummary {
                variants: 1,
                probes: 10,
                found: 0,
                errors: 2,
            })
            .unwrap();
        let out = console::strip_ansi_codes(&String::from_utf8(reporter.into_inner()).unwrap())
            .into_owned();

        assert!(out.contains("OSINT RESULTS FOR BASE: john_doe"));
        assert!(out.contains("--- Username variant: john_doe ---"));
        assert!(out.contains("No profiles found for this variant."));
        assert!(out.contains("Scan complete: 0 profile(s) found across 1 variant(s)."));
        assert!(out.contains("2 probe(s) failed."));
    }

    #[test]
    fn end_scan_reports_flush_failures() {
        struct Unflushable(Vec<u8>);
        impl Write for Unflushable {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
        }

        for format in [OutputFormat::Text, OutputFormat::Json] {
            let mut reporter = Reporter::new(Unflushable(Vec::new()), format, false);
            let err = reporter.end_scan(&ScanSummary::default()).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        }
    }

    #[test]
    fn json_mode_prints_no_frame() {
        let mut reporter = Reporter::new(Vec::new(), OutputFormat::Json, false);
        reporter.begin_scan("x").unwrap();
        reporter.begin_variant("x").unwrap();
        reporter.end_variant(false).unwrap();
        reporter.end_scan(&ScanSummary::default()).unwrap();
        assert!(reporter.into_inner().is_empty());
    }
}
