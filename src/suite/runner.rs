//! Sequential suite execution.

use std::io::Write;
use std::time::Duration;

use super::report::Reporter;
use super::{ProbeCase, Suite};
use crate::client::{ProbeOutcome, RouterClient};
use crate::config::{Config, RunConfig};
use crate::error::Result;
use crate::fixtures::Fixtures;

/// Tallies for one suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteSummary {
    pub suite: Suite,
    pub routed: usize,
    pub rejected: usize,
    pub errored: usize,
}

impl SuiteSummary {
    fn new(suite: Suite) -> Self {
        Self {
            suite,
            routed: 0,
            rejected: 0,
            errored: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.routed + self.rejected + self.errored
    }
}

/// Tallies for a whole run, in suite order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub suites: Vec<SuiteSummary>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.suites.iter().map(SuiteSummary::total).sum()
    }

    pub fn routed(&self) -> usize {
        self.suites.iter().map(|s| s.routed).sum()
    }
}

/// Runs suites one probe at a time against a single router.
pub struct Runner<W: Write> {
    client: RouterClient,
    fixtures: Fixtures,
    run: RunConfig,
    delay: Duration,
    reporter: Reporter<W>,
}

impl<W: Write> Runner<W> {
    pub fn new(config: &Config, out: W) -> Result<Self> {
        Ok(Self {
            client: RouterClient::new(&config.router)?,
            fixtures: config.fixtures.clone(),
            run: config.run.clone(),
            delay: config.run.delay(),
            reporter: Reporter::new(out),
        })
    }

    /// Override the pause between probes.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Recover the output sink.
    pub fn into_output(self) -> W {
        self.reporter.into_inner()
    }

    /// Run `suites` in order and print the summary.
    ///
    /// A rejected or failed probe never stops the run; only a failure to
    /// write the report does.
    pub async fn run(&mut self, suites: &[Suite]) -> Result<RunSummary> {
        tracing::info!(
            url = %self.client.url(),
            suites = ?suites,
            delay = ?self.delay,
            "Starting smoke run"
        );

        self.reporter.banner(self.client.url())?;

        let mut summary = RunSummary::default();
        for suite in suites {
            let tally = self.run_suite(*suite).await?;
            summary.suites.push(tally);
        }

        self.reporter.summary(&summary)?;

        tracing::info!(
            total = summary.total(),
            routed = summary.routed(),
            "Smoke run complete"
        );
        Ok(summary)
    }

    async fn run_suite(&mut self, suite: Suite) -> Result<SuiteSummary> {
        self.reporter.suite_header(suite)?;

        let cases = suite.cases(&self.fixtures, &self.run);
        let mut tally = SuiteSummary::new(suite);
        if cases.is_empty() {
            tracing::warn!(suite = %suite, "No fixtures configured for suite");
        }

        for case in &cases {
            self.reporter.case_header(case)?;

            match self.probe(case).await {
                Ok(outcome) => {
                    if outcome.is_routed() {
                        tally.routed += 1;
                    } else {
                        tally.rejected += 1;
                    }
                    self.reporter.outcome(suite, &outcome)?;
                }
                Err(e) => {
                    tracing::warn!(suite = %suite, case = %case.label, error = %e, "Probe failed");
                    tally.errored += 1;
                    self.reporter.exception(&e)?;
                }
            }

            tokio::time::sleep(self.delay).await;
        }

        Ok(tally)
    }

    async fn probe(&self, case: &ProbeCase) -> Result<ProbeOutcome> {
        let request = case.request(self.run.max_tokens);
        self.client.send(&request).await
    }
}
