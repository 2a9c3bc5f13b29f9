use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Verdict for one scenario execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub detail: String,
    pub timestamp: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,
}

impl TestResult {
    pub fn new(name: &str, passed: bool, detail: &str, raw_response: Option<Value>) -> Self {
        Self {
            name: name.to_string(),
            passed,
            detail: detail.to_string(),
            timestamp: Local::now(),
            raw_response,
        }
    }
}

/// Ordered run log of one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    pub run_id: String,
    pub base_url: String,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub results: Vec<TestResult>,
}

impl TestRun {
    pub fn new(run_id: &str, base_url: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            base_url: base_url.to_string(),
            started_at: Local::now(),
            finished_at: None,
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// True iff no recorded result failed
    pub fn all_passed(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn summary(&self) -> RunSummary {
        let total = self.results.len() as u32;
        let passed = self.results.iter().filter(|r| r.passed).count() as u32;

        let duration_ms = self.finished_at.map(|end| {
            (end - self.started_at).num_milliseconds().max(0) as u64
        });

        RunSummary {
            total,
            passed,
            failed: total - passed,
            duration_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub duration_ms: Option<u64>,
}

impl RunSummary {
    /// Percentage of passed results; 0 for an empty run
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.passed as f64 / self.total as f64 * 100.0
    }
}
