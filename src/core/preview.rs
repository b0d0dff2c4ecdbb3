//! Tabular preview of converted test cases.

use crate::core::model::case::TestCase;
use serde::Serialize;
use std::{collections::BTreeSet, fmt};

/// The test cases of a single uploaded file, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    /// Name of the file the cases were converted from.
    pub file: String,

    pub cases: Vec<TestCase>,
}

/// One table row of the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub suite: String,
    pub name: String,
    pub summary: String,
    pub steps: String,
}

impl Preview {
    pub fn new(file: impl Into<String>, cases: Vec<TestCase>) -> Self {
        Self {
            file: file.into(),
            cases,
        }
    }

    /// Number of distinct suites the cases belong to.
    ///
    /// Only suites holding at least one case are visible in the converter output,
    /// so empty sub-suites are not counted and equally named suites on different
    /// sheets count once.
    pub fn suite_count(&self) -> usize {
        self.cases
            .iter()
            .map(|case| case.suite.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    pub fn rows(&self) -> Vec<PreviewRow> {
        self.cases
            .iter()
            .map(|case| PreviewRow {
                suite: case.suite.clone(),
                name: case.name.clone(),
                summary: case.summary_text(),
                steps: case.steps_text(),
            })
            .collect()
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Preview: {}", self.file)?;
        writeln!(
            f,
            "TestSuites: {}  TestCases: {}",
            self.suite_count(),
            self.case_count()
        )?;

        for (i, row) in self.rows().into_iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "#{} {}", i + 1, "-".repeat(40))?;
            writeln!(f, "Suite: {}", row.suite)?;
            writeln!(f, "Title: {}", row.name)?;
            writeln!(f, "{}", row.summary)?;
            if !row.steps.is_empty() {
                writeln!(f, "{}", row.steps)?;
            }
        }

        Ok(())
    }
}
