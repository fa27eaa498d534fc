//! Conformance report types: per-fixture results and their aggregation.

use serde::Serialize;

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The check passed.
    Pass,
    /// The check passed with recoverable diagnostics.
    Warning,
    /// The check failed.
    Failure,
}

impl Severity {
    /// Fixed-width label for text output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        }
    }
}

/// A single check against one fixture.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Validator that produced the result, e.g. `round-trip/turtle`.
    pub validator: String,
    /// Fixture file stem.
    pub fixture: String,
    /// One-line outcome.
    pub message: String,
    /// Outcome class.
    pub severity: Severity,
    /// Differences, diagnostics or parser messages.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl TestResult {
    fn new(
        severity: Severity,
        validator: impl Into<String>,
        fixture: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            validator: validator.into(),
            fixture: fixture.into(),
            message: message.into(),
            severity,
            details: Vec::new(),
        }
    }

    /// A passing result.
    pub fn pass(validator: impl Into<String>, fixture: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Pass, validator, fixture, message)
    }

    /// A failing result.
    pub fn fail(validator: impl Into<String>, fixture: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Failure, validator, fixture, message)
    }

    /// A warning.
    pub fn warn(validator: impl Into<String>, fixture: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, validator, fixture, message)
    }

    /// Attaches detail lines.
    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Returns true if this result is a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Passed checks.
    pub passed: usize,
    /// Warnings.
    pub warned: usize,
    /// Failed checks.
    pub failed: usize,
}

/// Aggregated results from every validator.
#[derive(Debug, Default, Serialize)]
pub struct ConformanceReport {
    /// Results in the order the validators ran.
    pub results: Vec<TestResult>,
}

impl ConformanceReport {
    /// An empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Appends every result of `other`.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Counts per severity.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.results.iter().fold(Summary::default(), |mut acc, r| {
            match r.severity {
                Severity::Pass => acc.passed += 1,
                Severity::Warning => acc.warned += 1,
                Severity::Failure => acc.failed += 1,
            }
            acc
        })
    }

    /// Results for one fixture.
    pub fn for_fixture<'a>(&'a self, fixture: &'a str) -> impl Iterator<Item = &'a TestResult> + 'a {
        self.results.iter().filter(move |r| r.fixture == fixture)
    }

    /// Returns true if nothing failed. Warnings do not count.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.summary().failed == 0
    }

    /// The report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
