//! Scenario runner: per-scenario outcome accounting and the
//! failure-screenshot hook.
//!
//! Pass/fail reporting stays with the test harness; this module only keeps
//! per-scenario attribution inside a module of scenarios and captures a
//! screenshot named after the failing scenario as a diagnostic side effect.

use crate::browser::Page;
use crate::result::{IngresoError, IngresoResult};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// Whether the scenario passed
    pub passed: bool,
    /// Error message if it failed
    pub error: Option<String>,
    /// Wall-clock duration
    pub duration: Duration,
}

impl ScenarioResult {
    /// Create a passing result
    #[must_use]
    pub fn pass(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            duration,
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            duration,
        }
    }
}

/// Outcomes from one module of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name
    pub suite: String,
    /// Individual scenario outcomes
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    /// Check if every scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Get the failing scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    /// One-line-per-failure summary for the harness assert
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{}: {}/{} scenarios passed",
            self.suite,
            self.passed_count(),
            self.results.len()
        );
        for failure in self.failures() {
            out.push_str(&format!(
                "\n  {} FAILED: {}",
                failure.name,
                failure.error.as_deref().unwrap_or("unknown error")
            ));
        }
        out
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> IngresoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs scenarios sequentially against one session, capturing a screenshot
/// whenever a scenario fails
#[derive(Debug)]
pub struct ScenarioRunner {
    suite: String,
    screenshot_dir: PathBuf,
    results: Vec<ScenarioResult>,
}

impl ScenarioRunner {
    /// Create a runner writing failure screenshots under `screenshot_dir`
    #[must_use]
    pub fn new(suite: impl Into<String>, screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            suite: suite.into(),
            screenshot_dir: screenshot_dir.into(),
            results: Vec::new(),
        }
    }

    /// Path the screenshot for `scenario` would be written to
    #[must_use]
    pub fn screenshot_path(&self, scenario: &str) -> PathBuf {
        self.screenshot_dir.join(format!("{}.png", file_stem(scenario)))
    }

    /// Record one scenario's outcome.
    ///
    /// On failure, captures a screenshot of the current session state
    /// before recording; a screenshot error is logged but never masks the
    /// scenario's own failure.
    pub async fn record(
        &mut self,
        page: &Page,
        scenario: &str,
        duration: Duration,
        outcome: IngresoResult<()>,
    ) {
        match outcome {
            Ok(()) => {
                info!(scenario, ?duration, "scenario passed");
                self.results.push(ScenarioResult::pass(scenario, duration));
            }
            Err(error) => {
                match self.capture(page, scenario).await {
                    Ok(path) => info!(scenario, path = %path.display(), "failure screenshot written"),
                    Err(e) => warn!(scenario, "failure screenshot could not be written: {e}"),
                }
                self.results
                    .push(ScenarioResult::fail(scenario, error.to_string(), duration));
            }
        }
    }

    /// Consume the runner and produce the suite report
    #[must_use]
    pub fn finish(self) -> SuiteReport {
        SuiteReport {
            suite: self.suite,
            results: self.results,
        }
    }

    async fn capture(&self, page: &Page, scenario: &str) -> IngresoResult<PathBuf> {
        std::fs::create_dir_all(&self.screenshot_dir)?;
        let bytes = page.screenshot().await?;
        let path = self.screenshot_path(scenario);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Reduce a scenario name to a safe file stem
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Fail the scenario with an assertion error unless `condition` holds
pub fn ensure(condition: bool, message: impl Into<String>) -> IngresoResult<()> {
    if condition {
        Ok(())
    } else {
        Err(IngresoError::Assertion {
            message: message.into(),
        })
    }
}

/// Fail the scenario unless `actual` equals `expected`
pub fn ensure_eq<T: PartialEq + Debug>(actual: &T, expected: &T, what: &str) -> IngresoResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(IngresoError::Assertion {
            message: format!("{what}: expected {expected:?}, got {actual:?}"),
        })
    }
}

/// True when a directory exists and is writable for screenshots
pub fn screenshot_dir_ready(dir: &Path) -> bool {
    dir.is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod assertion_tests {
        use super::*;

        #[test]
        fn test_ensure_passes_on_true() {
            assert!(ensure(true, "never shown").is_ok());
        }

        #[test]
        fn test_ensure_fails_with_message() {
            let err = ensure(false, "error banner not displayed").unwrap_err();
            assert!(err.is_assertion());
            assert!(err.to_string().contains("error banner not displayed"));
        }

        #[test]
        fn test_ensure_eq_reports_both_values() {
            let err = ensure_eq(&"Trang chủ", &"Login Page", "document title").unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("document title"));
            assert!(msg.contains("Login Page"));
            assert!(msg.contains("Trang chủ"));
        }
    }

    mod report_tests {
        use super::*;

        fn sample_report() -> SuiteReport {
            SuiteReport {
                suite: "login".to_string(),
                results: vec![
                    ScenarioResult::pass("test_open_login_page", Duration::from_millis(120)),
                    ScenarioResult::fail(
                        "test_failed_login",
                        "Assertion failed: wrong banner text",
                        Duration::from_millis(450),
                    ),
                ],
            }
        }

        #[test]
        fn test_counts() {
            let report = sample_report();
            assert!(!report.all_passed());
            assert_eq!(report.passed_count(), 1);
            assert_eq!(report.failed_count(), 1);
            assert_eq!(report.failures().len(), 1);
        }

        #[test]
        fn test_summary_names_failures() {
            let summary = sample_report().summary();
            assert!(summary.contains("1/2 scenarios passed"));
            assert!(summary.contains("test_failed_login FAILED"));
            assert!(!summary.contains("test_open_login_page FAILED"));
        }

        #[test]
        fn test_json_round_trip() {
            let json = sample_report().to_json().unwrap();
            let parsed: SuiteReport = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed.results.len(), 2);
            assert_eq!(parsed.suite, "login");
        }
    }

    mod file_stem_tests {
        use super::*;

        #[test]
        fn test_plain_names_unchanged() {
            assert_eq!(file_stem("test_empty_fields"), "test_empty_fields");
        }

        #[test]
        fn test_separators_are_replaced() {
            assert_eq!(file_stem("login/../escape attempt"), "login____escape_attempt");
        }
    }

    #[cfg(not(feature = "browser"))]
    mod runner_tests {
        use super::*;
        use crate::browser::Page;
        use crate::result::IngresoError;

        #[tokio::test]
        async fn test_pass_records_no_screenshot() {
            let dir = tempfile::tempdir().unwrap();
            let mut runner = ScenarioRunner::new("login", dir.path());
            let page = Page::default();

            runner
                .record(&page, "test_open_login_page", Duration::from_millis(10), Ok(()))
                .await;

            let report = runner.finish();
            assert!(report.all_passed());
            assert!(!dir
                .path()
                .join("test_open_login_page.png")
                .exists());
        }

        #[tokio::test]
        async fn test_failure_writes_screenshot_named_after_scenario() {
            let dir = tempfile::tempdir().unwrap();
            let screenshots = dir.path().join("screenshots");
            let mut runner = ScenarioRunner::new("login", &screenshots);
            let page = Page::default();

            let outcome = Err(IngresoError::Assertion {
                message: "banner text mismatch".to_string(),
            });
            runner
                .record(&page, "test_failed_login", Duration::from_millis(10), outcome)
                .await;

            let report = runner.finish();
            assert_eq!(report.failed_count(), 1);
            // Directory is created on demand and the file carries the
            // scenario's name
            assert!(screenshot_dir_ready(&screenshots));
            assert!(screenshots.join("test_failed_login.png").exists());
        }
    }
}
