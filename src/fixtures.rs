//! Static test data for the routing suites.
//!
//! Kept apart from the HTTP code so new cases only touch these lists (or the
//! `[fixtures]` table of the config file).

use serde::Deserialize;

/// A named prompt used to exercise automatic routing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskFixture {
    pub name: String,
    pub prompt: String,
}

/// Built-in task prompts, one per task category the router classifies.
pub const TASKS: &[(&str, &str)] = &[
    (
        "Chatbot",
        "Hello! How are you today? Tell me about yourself.",
    ),
    (
        "Code Generation",
        "Write a Python function to sort a list of dictionaries by a specific key.",
    ),
    (
        "Text Generation",
        "Write a short story about a robot who becomes self-aware.",
    ),
    (
        "Question Answering",
        "What is the capital of France and why is it historically significant?",
    ),
    (
        "Summarization",
        "Summarize the key benefits of using containerization for application deployment.",
    ),
    (
        "Classification",
        "Categorize this text into a genre: 'The spaceship landed on the alien planet as the crew prepared for first contact.'",
    ),
    (
        "Extraction",
        "Extract the names, dates, and locations from this text: 'John Smith met with Sarah Johnson on March 15, 2023 in New York City to discuss the new project launch in Tokyo scheduled for December 5.'",
    ),
];

/// Models targeted by the manual routing suite.
pub const MANUAL_MODELS: &[&str] = &[
    "nvidia/llama-3.3-nemotron-super-49b-v1",
    "nvidia/nv-embedqa-mistral-7b-v2",
    "meta/llama-3.1-8b-instruct",
];

/// Prompt sent with every manual routing request.
pub const MANUAL_PROMPT: &str =
    "Hello, this is a test for manual routing. Please identify which model you are.";

/// The fixture set a run iterates over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixtures {
    pub tasks: Vec<TaskFixture>,
    pub models: Vec<String>,
    pub manual_prompt: String,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            tasks: default_tasks(),
            models: default_models(),
            manual_prompt: default_manual_prompt(),
        }
    }
}

pub fn default_tasks() -> Vec<TaskFixture> {
    TASKS
        .iter()
        .map(|(name, prompt)| TaskFixture {
            name: name.to_string(),
            prompt: prompt.to_string(),
        })
        .collect()
}

pub fn default_models() -> Vec<String> {
    MANUAL_MODELS.iter().map(|m| m.to_string()).collect()
}

pub fn default_manual_prompt() -> String {
    MANUAL_PROMPT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tasks_preserve_order() {
        let names: Vec<String> = default_tasks().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "Chatbot",
                "Code Generation",
                "Text Generation",
                "Question Answering",
                "Summarization",
                "Classification",
                "Extraction",
            ]
        );
    }

    #[test]
    fn default_fixtures_use_static_lists() {
        let fixtures = Fixtures::default();
        assert_eq!(fixtures.tasks.len(), TASKS.len());
        assert_eq!(fixtures.models, MANUAL_MODELS);
        assert_eq!(fixtures.manual_prompt, MANUAL_PROMPT);
    }
}
