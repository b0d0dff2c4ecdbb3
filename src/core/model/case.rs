use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A single test case as produced by the XMind converter.
/// Unknown fields in the converter output are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Name of the (sub) suite the case belongs to.
    #[serde(default)]
    pub suite: String,

    /// Case title.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub preconditions: String,

    /// Priority; 1 is the highest.
    #[serde(default)]
    pub importance: u8,

    #[serde(default)]
    pub steps: Vec<TestStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    pub step_number: u32,

    #[serde(default)]
    pub actions: String,

    #[serde(default)]
    pub expectedresults: Option<String>,
}

impl TestCase {
    /// The composed summary cell; priority, preconditions and summary on separate lines.
    pub fn summary_text(&self) -> String {
        format!(
            "Priority: {}\nPreconditions: {}\nSummary: {}",
            self.importance, self.preconditions, self.summary
        )
    }

    /// The steps cell. Each step is followed by its expected result, if it has one.
    pub fn steps_text(&self) -> String {
        let mut text = String::new();
        for step in self.steps.iter() {
            let _ = writeln!(text, "Step {}: {}", step.step_number, step.actions);
            if let Some(expected) = step.expected() {
                let _ = writeln!(text, "Expected Results: {expected}");
            }
        }
        text.trim().to_string()
    }
}

impl TestStep {
    /// The expected result, treating empty strings as absent.
    pub fn expected(&self) -> Option<&str> {
        self.expectedresults.as_deref().filter(|e| !e.is_empty())
    }
}
