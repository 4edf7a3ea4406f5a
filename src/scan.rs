//! The scan driver: variants outer, platforms inner, results streamed to a
//! [`Reporter`] as they complete.

use std::io::{self, Write};
use std::thread;

use tracing::{debug, info};

use crate::check::{CheckError, CheckResult, Client, Status, Verdict};
use crate::platform::{PLATFORMS, Platform};
use crate::report::Reporter;
use crate::variants::generate_variants;

/// Counters for one scan of a base username.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Variants probed.
    pub variants: usize,
    /// Probes run (variants times platforms).
    pub probes: usize,
    /// Probes that found a profile.
    pub found: usize,
    /// Probes that ended in an error.
    pub errors: usize,
}

impl ScanSummary {
    fn record(&mut self, status: Status) {
        self.probes += 1;
        match status {
            Status::Found => self.found += 1,
            Status::NotFound => {}
            Status::Error => self.errors += 1,
        }
    }
}

/// Probes every variant of a username against a fixed list of platforms.
#[derive(Debug, Clone)]
pub struct Scanner {
    client: Client,
    platforms: Vec<Platform>,
    parallel: bool,
}

impl Scanner {
    /// Scanner over all registered platforms.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_platforms(client, PLATFORMS.to_vec())
    }

    /// Scanner over an explicit platform list, probed in the given order.
    #[must_use]
    pub fn with_platforms(client: Client, platforms: Vec<Platform>) -> Self {
        Self {
            client,
            platforms,
            parallel: false,
        }
    }

    /// Probe the platforms of one variant concurrently. Output order is
    /// unchanged; results are buffered until the whole variant is done.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Platforms this scanner probes, in order.
    #[must_use]
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Generate the variants of `base` and probe each against every
    /// platform, reporting as it goes.
    ///
    /// Probe failures are reported, never returned.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the reporter's output fails.
    pub fn scan<W: Write>(
        &self,
        base: &str,
        reporter: &mut Reporter<W>,
    ) -> io::Result<ScanSummary> {
        let variants = generate_variants(base);
        info!(base, variants = variants.len(), platforms = self.platforms.len(), "starting scan");

        let mut summary = ScanSummary::default();
        reporter.begin_scan(base)?;

        for variant in &variants {
            reporter.begin_variant(variant)?;
            let mut found_any = false;
            self.scan_variant(variant, |platform, result| {
                let status = result.status();
                found_any |= status == Status::Found;
                summary.record(status);
                reporter.result(platform, &result)
            })?;
            reporter.end_variant(found_any)?;
            summary.variants += 1;
        }

        reporter.end_scan(&summary)?;
        info!(
            base,
            found = summary.found,
            errors = summary.errors,
            "scan complete"
        );
        Ok(summary)
    }

    /// Probe one variant against every platform, handing each result to
    /// `on_result` in platform order.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `on_result`.
    pub fn scan_variant<F>(&self, variant: &str, mut on_result: F) -> io::Result<()>
    where
        F: FnMut(&Platform, CheckResult) -> io::Result<()>,
    {
        if !self.parallel {
            for platform in &self.platforms {
                on_result(platform, platform.check(&self.client, variant))?;
            }
            return Ok(());
        }

        debug!(variant, "probing platforms in parallel");
        let client = &self.client;
        let results: Vec<CheckResult> = thread::scope(|s| {
            let handles: Vec<_> = self
                .platforms
                .iter()
                .map(|platform| (platform, s.spawn(move || platform.check(client, variant))))
                .collect();
            handles
                .into_iter()
                .map(|(platform, h)| {
                    h.join().unwrap_or_else(|_| CheckResult {
                        platform: platform.name,
                        variant: variant.to_string(),
                        verdict: Verdict::Error(CheckError::Internal(
                            "checker thread panicked".into(),
                        )),
                    })
                })
                .collect()
        });

        for (platform, result) in self.platforms.iter().zip(results) {
            on_result(platform, result)?;
        }
        Ok(())
    }
}
