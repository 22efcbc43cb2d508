//! Routing suites and the probe cases they generate.
//!
//! A suite pairs a fixture list with one way of filling in the routing
//! object:
//! - `TaskRouter`: every task, automatic routing under `task_router`
//! - `AgenticRouter`: leading tasks, automatic routing under `agentic_router`
//! - `Manual`: every fixture model, named explicitly

pub mod report;
mod runner;

use crate::client::{ChatCompletionRequest, RoutingParams, RoutingPolicy};
use crate::config::RunConfig;
use crate::fixtures::Fixtures;

pub use report::Reporter;
pub use runner::{RunSummary, Runner, SuiteSummary};

/// One of the router's routing modes under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Suite {
    #[value(name = "task")]
    TaskRouter,
    #[value(name = "agentic")]
    AgenticRouter,
    #[value(name = "manual")]
    Manual,
}

impl Suite {
    /// All suites in run order.
    pub const ALL: [Suite; 3] = [Suite::TaskRouter, Suite::AgenticRouter, Suite::Manual];

    pub fn title(&self) -> &'static str {
        match self {
            Suite::TaskRouter => "Task Router",
            Suite::AgenticRouter => "Agentic Router",
            Suite::Manual => "Manual Routing",
        }
    }

    /// Build this suite's cases from `fixtures`.
    pub fn cases(&self, fixtures: &Fixtures, run: &RunConfig) -> Vec<ProbeCase> {
        match self {
            Suite::TaskRouter => fixtures
                .tasks
                .iter()
                .map(|task| ProbeCase {
                    suite: *self,
                    label: task.name.clone(),
                    prompt: task.prompt.clone(),
                    routing: RoutingParams::automatic(RoutingPolicy::TaskRouter),
                })
                .collect(),
            Suite::AgenticRouter => fixtures
                .tasks
                .iter()
                .take(run.agentic_task_limit)
                .map(|task| ProbeCase {
                    suite: *self,
                    label: task.name.clone(),
                    prompt: task.prompt.clone(),
                    routing: RoutingParams::automatic(RoutingPolicy::AgenticRouter),
                })
                .collect(),
            Suite::Manual => fixtures
                .models
                .iter()
                .map(|model| ProbeCase {
                    suite: *self,
                    label: model.clone(),
                    prompt: fixtures.manual_prompt.clone(),
                    routing: RoutingParams::manual(model),
                })
                .collect(),
        }
    }
}

impl std::fmt::Display for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// A single fixture turned into something the runner can send.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeCase {
    pub suite: Suite,
    /// Task name, or model id for manual routing.
    pub label: String,
    pub prompt: String,
    pub routing: RoutingParams,
}

impl ProbeCase {
    pub fn request(&self, max_tokens: u32) -> ChatCompletionRequest {
        ChatCompletionRequest::single_turn(&self.prompt, max_tokens, self.routing.clone())
    }
}
