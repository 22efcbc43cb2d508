//! Human-readable run output.
//!
//! The reporter writes plain lines to any `io::Write` sink: stdout for the
//! binary, an in-memory buffer for tests.

use std::io::{self, Write};

use super::runner::RunSummary;
use super::{ProbeCase, Suite};
use crate::client::ProbeOutcome;

const RULE: &str = "======================================";
const THIN_RULE: &str = "--------------------------------------";

/// Writes run progress and results to `W`.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the sink, e.g. to inspect a buffer in tests.
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self, target: &str) -> io::Result<()> {
        writeln!(self.out, "{}", RULE)?;
        writeln!(self.out, "  LLM ROUTER MODEL TESTING SCRIPT")?;
        writeln!(self.out, "{}", RULE)?;
        writeln!(self.out, "Testing routing against {}", target)?;
        writeln!(self.out, "{}", THIN_RULE)
    }

    pub fn suite_header(&mut self, suite: Suite) -> io::Result<()> {
        writeln!(self.out, "\n=== Testing {} ===\n", suite.title())
    }

    pub fn case_header(&mut self, case: &ProbeCase) -> io::Result<()> {
        match case.suite {
            Suite::TaskRouter => {
                writeln!(self.out, "\nTesting task: {}", case.label)?;
                writeln!(self.out, "Prompt: {}", case.prompt)
            }
            Suite::AgenticRouter => {
                writeln!(self.out, "\nTesting task with agentic router: {}", case.label)?;
                writeln!(self.out, "Prompt: {}", case.prompt)
            }
            Suite::Manual => writeln!(self.out, "\nTesting manual routing to: {}", case.label),
        }
    }

    pub fn outcome(&mut self, suite: Suite, outcome: &ProbeOutcome) -> io::Result<()> {
        match outcome {
            ProbeOutcome::Routed { model, preview } => {
                let verb = match suite {
                    Suite::TaskRouter => "Routed to",
                    Suite::AgenticRouter => "Agentic router selected",
                    Suite::Manual => "Manually routed to",
                };
                writeln!(self.out, "✅ Success! {} model: {}", verb, model)?;
                writeln!(self.out, "Response preview: {}...", preview)
            }
            ProbeOutcome::Rejected { status, body } => {
                writeln!(self.out, "❌ Failed with status code: {}", status)?;
                writeln!(self.out, "Error: {}", body)
            }
        }
    }

    pub fn exception(&mut self, error: &crate::Error) -> io::Result<()> {
        writeln!(self.out, "❌ Exception occurred: {}", error)
    }

    /// Per-suite tallies followed by the closing banner.
    pub fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(self.out, "\n{}", THIN_RULE)?;
        writeln!(
            self.out,
            "{:<16} {:>7} {:>9} {:>8}",
            "suite", "routed", "rejected", "errored"
        )?;
        for suite in &summary.suites {
            writeln!(
                self.out,
                "{:<16} {:>7} {:>9} {:>8}",
                suite.suite.title(),
                suite.routed,
                suite.rejected,
                suite.errored
            )?;
        }
        writeln!(self.out, "\n{}", RULE)?;
        writeln!(self.out, "  TESTING COMPLETE")?;
        writeln!(self.out, "{}", RULE)?;
        self.out.flush()
    }

    /// Fixture listing for the `fixtures` subcommand.
    pub fn fixtures(&mut self, fixtures: &crate::fixtures::Fixtures) -> io::Result<()> {
        writeln!(self.out, "Tasks:")?;
        for task in &fixtures.tasks {
            writeln!(self.out, "  {:<20} {}", task.name, task.prompt)?;
        }
        writeln!(self.out, "Manual routing models:")?;
        for model in &fixtures.models {
            writeln!(self.out, "  {}", model)?;
        }
        writeln!(self.out, "Manual routing prompt:")?;
        writeln!(self.out, "  {}", fixtures.manual_prompt)
    }
}
