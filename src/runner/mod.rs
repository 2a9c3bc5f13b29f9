pub mod console;
pub mod state;

use uuid::Uuid;

use crate::client::{ApiResponse, CallError, HttpTransport, RequestSpec};
use crate::scenario::{Check, Plan, Probe, ProbeMode, Scenario, Verdict};

pub use state::*;

/// Process exit status for a run: 0 when every scenario passed, 1 otherwise
pub fn exit_code(passed: bool) -> i32 {
    if passed {
        0
    } else {
        1
    }
}

/// Executes scenarios one at a time against a transport and keeps the run log
pub struct ContractVerifier {
    transport: Box<dyn HttpTransport>,
    scenarios: Vec<Scenario>,
    run: TestRun,
    quiet: bool,
}

impl ContractVerifier {
    pub fn new(transport: Box<dyn HttpTransport>, scenarios: Vec<Scenario>) -> Self {
        let run = TestRun::new(&Uuid::new_v4().to_string(), transport.base_url());
        Self {
            transport,
            scenarios,
            run,
            quiet: false,
        }
    }

    /// Suppress stdout output (results are still recorded)
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn log(&self) -> &TestRun {
        &self.run
    }

    /// Execute one scenario. Always yields a result, which is also appended to the log.
    pub async fn run(&mut self, scenario: &Scenario) -> TestResult {
        let verdict = match &scenario.plan {
            Plan::Single { request, check } => self.probe(request, check).await,
            Plan::Sweep {
                param,
                values,
                request,
                check,
            } => self.sweep(param, values, request, check).await,
            Plan::Probes { probes, mode } => self.probes(probes, *mode).await,
        };

        let result = TestResult::new(&scenario.name, verdict.passed, &verdict.detail, verdict.raw);
        if !self.quiet {
            console::print_result(&result);
        }
        self.run.record(result.clone());
        result
    }

    /// Execute every registered scenario in order. Returns true iff all passed.
    pub async fn run_all(&mut self) -> bool {
        if !self.quiet {
            console::print_banner(&self.run);
        }

        let scenarios = std::mem::take(&mut self.scenarios);
        for scenario in &scenarios {
            self.run(scenario).await;
        }
        self.scenarios = scenarios;

        self.run.finish();
        if !self.quiet {
            console::print_summary(&self.run);
        }
        self.run.all_passed()
    }

    /// Hand back the run log
    pub fn finish(mut self) -> TestRun {
        if self.run.finished_at.is_none() {
            self.run.finish();
        }
        self.run
    }

    async fn send(&self, request: &RequestSpec) -> Result<ApiResponse, CallError> {
        self.transport.send(request).await
    }

    async fn probe(&self, request: &RequestSpec, check: &Check) -> Verdict {
        let outcome = self.send(request).await;
        check.evaluate(&outcome)
    }

    async fn sweep(
        &self,
        param: &str,
        values: &[String],
        request: &RequestSpec,
        check: &Check,
    ) -> Verdict {
        let mut parts = Vec::new();
        let mut raw = None;

        for value in values {
            let req = request.clone().with_query(param, value);
            let verdict = self.probe(&req, check).await;
            raw = verdict.raw;
            if !verdict.passed {
                parts.push(format!("{}={}: ✗ ({})", param, value, verdict.detail));
                return Verdict {
                    passed: false,
                    detail: format!(
                        "Failed at {}={}: {}",
                        param,
                        value,
                        parts.join(", ")
                    ),
                    raw,
                };
            }
            parts.push(format!("{}={}: ✓", param, value));
        }

        Verdict {
            passed: true,
            detail: format!("All {} values conform: {}", param, parts.join(", ")),
            raw,
        }
    }

    async fn probes(&self, probes: &[Probe], mode: ProbeMode) -> Verdict {
        let mut parts = Vec::new();
        let mut passed = true;
        let mut raw = None;

        for probe in probes {
            let verdict = self.probe(&probe.request, &probe.check).await;
            if verdict.raw.is_some() {
                raw = verdict.raw;
            }

            if verdict.passed {
                parts.push(format!("{}: ✓ ({})", probe.label, verdict.detail));
                continue;
            }

            if probe.advisory {
                log::warn!("advisory check '{}' not met: {}", probe.label, verdict.detail);
                parts.push(format!("{}: ✗ ({}, advisory)", probe.label, verdict.detail));
                continue;
            }

            passed = false;
            parts.push(format!("{}: ✗ ({})", probe.label, verdict.detail));
            if mode == ProbeMode::StopAtFirstFailure {
                break;
            }
        }

        let detail = if passed {
            format!("Verified: {}", parts.join(", "))
        } else {
            format!("Issues: {}", parts.join(", "))
        };
        Verdict {
            passed,
            detail,
            raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Shape;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Canned responses keyed by "METHOD target"; unknown targets return 404
    struct ScriptedTransport {
        responses: HashMap<String, Result<ApiResponse, CallError>>,
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedTransport {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn sent_log(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.sent)
        }

        fn json(mut self, key: &str, status: u16, body: Value) -> Self {
            self.responses
                .insert(key.to_string(), Ok(ApiResponse::json_body(status, &body)));
            self
        }

        fn error(mut self, key: &str, err: CallError) -> Self {
            self.responses.insert(key.to_string(), Err(err));
            self
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: &RequestSpec) -> Result<ApiResponse, CallError> {
            let key = request.to_string();
            self.sent.lock().unwrap().push(key.clone());
            self.responses
                .get(&key)
                .cloned()
                .unwrap_or_else(|| {
                    Ok(ApiResponse::json_body(404, &json!({"error": "Endpoint not found"})))
                })
        }

        fn base_url(&self) -> &str {
            "http://scripted/api"
        }
    }

    fn posts_check() -> Check {
        Check::Entity {
            container: "posts".to_string(),
            shape: Shape::List { non_empty: false },
            required: vec![],
            report: vec![],
        }
    }

    fn analytics_check() -> Check {
        Check::Entity {
            container: "analytics".to_string(),
            shape: Shape::Object,
            required: vec!["overview".to_string()],
            report: vec![],
        }
    }

    fn verifier(transport: ScriptedTransport, scenarios: Vec<Scenario>) -> ContractVerifier {
        ContractVerifier::new(Box::new(transport), scenarios).quiet(true)
    }

    #[tokio::test]
    async fn test_run_converts_transport_failure() {
        let transport = ScriptedTransport::new().error("GET /posts", CallError::Timeout(10_000));
        let scenario = Scenario::single("Posts GET All", RequestSpec::get("/posts"), posts_check());
        let mut v = verifier(transport, vec![]);

        let result = v.run(&scenario).await;
        assert!(!result.passed);
        assert!(result.detail.contains("timed out after 10000ms"));
        assert_eq!(v.log().results.len(), 1);
    }

    #[tokio::test]
    async fn test_run_all_continues_after_failure() {
        let transport = ScriptedTransport::new()
            .error("GET /", CallError::Connect("refused".into()))
            .json("GET /posts", 200, json!({"success": true, "posts": [1, 2]}));
        let scenarios = vec![
            Scenario::single("Root", RequestSpec::get("/"), Check::Reachable),
            Scenario::single("Posts", RequestSpec::get("/posts"), posts_check()),
        ];
        let mut v = verifier(transport, scenarios);

        assert!(!v.run_all().await);
        let run = v.finish();
        assert_eq!(run.results.len(), 2);
        assert!(!run.results[0].passed);
        assert!(run.results[1].passed);
        assert_eq!(run.results[1].detail, "Retrieved 2 posts");
        assert!(run.finished_at.is_some());
    }

    #[tokio::test]
    async fn test_run_all_true_iff_no_failures() {
        let transport =
            ScriptedTransport::new().json("GET /posts", 200, json!({"success": true, "posts": []}));
        let scenarios = vec![Scenario::single("Posts", RequestSpec::get("/posts"), posts_check())];
        let mut v = verifier(transport, scenarios);
        assert!(v.run_all().await);

        let mut empty = verifier(ScriptedTransport::new(), vec![]);
        assert!(empty.run_all().await);
    }

    #[tokio::test]
    async fn test_run_all_is_repeatable() {
        let transport = ScriptedTransport::new()
            .json("GET /", 200, json!({"message": "SocialFlow Pro API is running!"}));
        let scenarios = vec![Scenario::single(
            "Root",
            RequestSpec::get("/"),
            Check::Marker {
                field: "message".to_string(),
                marker: "SocialFlow Pro API".to_string(),
                report: None,
            },
        )];
        let mut v = verifier(transport, scenarios);
        let first = v.run_all().await;
        let second = v.run_all().await;
        assert_eq!(first, second);
        let run = v.finish();
        assert_eq!(run.results[0].passed, run.results[1].passed);
    }

    #[tokio::test]
    async fn test_sweep_stops_and_names_failing_value() {
        let ok = json!({"success": true, "analytics": {"overview": {}}});
        let transport = ScriptedTransport::new()
            .json("GET /analytics?timeframe=7", 200, ok.clone())
            .json("GET /analytics?timeframe=30", 500, json!({"error": "boom"}))
            .json("GET /analytics?timeframe=90", 200, ok);
        let scenario = Scenario::sweep(
            "Analytics Timeframes",
            "timeframe",
            &["7", "30", "90"],
            RequestSpec::get("/analytics"),
            analytics_check(),
        );

        let mut v = verifier(transport, vec![]);
        let result = v.run(&scenario).await;
        assert!(!result.passed);
        assert!(result.detail.starts_with("Failed at timeframe=30"));
        assert!(result.detail.contains("timeframe=7: ✓"));
        assert!(!result.detail.contains("timeframe=90"));
    }

    #[tokio::test]
    async fn test_sweep_all_conform() {
        let ok = json!({"success": true, "analytics": {"overview": {}}});
        let transport = ScriptedTransport::new()
            .json("GET /analytics?timeframe=7", 200, ok.clone())
            .json("GET /analytics?timeframe=30", 200, ok.clone())
            .json("GET /analytics?timeframe=90", 200, ok);
        let scenario = Scenario::sweep(
            "Analytics Timeframes",
            "timeframe",
            &["7", "30", "90"],
            RequestSpec::get("/analytics"),
            analytics_check(),
        );

        let mut v = verifier(transport, vec![]);
        let result = v.run(&scenario).await;
        assert!(result.passed, "{}", result.detail);
        assert!(result.raw_response.is_some());
    }

    #[tokio::test]
    async fn test_probes_stop_at_first_failure() {
        let transport = ScriptedTransport::new();
        let scenario = Scenario::probes(
            "Filtered",
            ProbeMode::StopAtFirstFailure,
            vec![
                Probe::new(
                    "Published",
                    RequestSpec::get("/posts").with_query("status", "published"),
                    posts_check(),
                ),
                Probe::new(
                    "Scheduled",
                    RequestSpec::get("/posts").with_query("status", "scheduled"),
                    posts_check(),
                ),
            ],
        );
        let sent = transport.sent_log();
        let mut v = verifier(transport, vec![]);
        let result = v.run(&scenario).await;
        assert!(!result.passed);
        assert!(result.detail.contains("Published: ✗"));
        assert!(!result.detail.contains("Scheduled"));
        assert_eq!(
            *sent.lock().unwrap(),
            vec!["GET /posts?status=published".to_string()]
        );
    }

    #[tokio::test]
    async fn test_negative_path_exact_404_and_advisory_body() {
        // Unknown path -> 404 (default), malformed post -> 500 HTML
        let mut transport = ScriptedTransport::new();
        transport.responses.insert(
            "POST /posts".to_string(),
            Ok(ApiResponse::new(500, Some("text/html"), "<h1>Server Error</h1>")),
        );
        let scenario = Scenario::probes(
            "Error Handling",
            ProbeMode::EvaluateAll,
            vec![
                Probe::new(
                    "404 for invalid endpoint",
                    RequestSpec::get("/invalid-endpoint"),
                    Check::Status(404),
                ),
                Probe::new(
                    "JSON error response",
                    RequestSpec::post("/posts", json!({"invalid": "data"})),
                    Check::ErrorResponse,
                )
                .advisory(),
            ],
        );

        let mut v = verifier(transport, vec![]);
        let result = v.run(&scenario).await;
        assert!(result.passed, "{}", result.detail);
        assert!(result.detail.contains("JSON error response: ✗"));
        assert!(result.detail.contains("advisory"));
    }

    #[tokio::test]
    async fn test_negative_path_fails_when_not_404() {
        let transport = ScriptedTransport::new()
            .json("GET /invalid-endpoint", 200, json!({"success": true}));
        let scenario = Scenario::probes(
            "Error Handling",
            ProbeMode::EvaluateAll,
            vec![Probe::new(
                "404 for invalid endpoint",
                RequestSpec::get("/invalid-endpoint"),
                Check::Status(404),
            )],
        );
        let mut v = verifier(transport, vec![]);
        let result = v.run(&scenario).await;
        assert!(!result.passed);
        assert!(result.detail.contains("expected HTTP 404, got 200"));
    }

    #[tokio::test]
    async fn test_evaluate_all_reports_every_probe() {
        let transport = ScriptedTransport::new()
            .json("GET /posts", 200, json!({"success": true, "posts": []}));
        let scenario = Scenario::probes(
            "Database Connection",
            ProbeMode::EvaluateAll,
            vec![
                Probe::new("Profile DB Connection", RequestSpec::get("/profile"), Check::Reachable),
                Probe::new("Posts DB Connection", RequestSpec::get("/posts"), Check::Reachable),
            ],
        );
        let mut v = verifier(transport, vec![]);
        let result = v.run(&scenario).await;
        assert!(!result.passed);
        assert!(result.detail.contains("Profile DB Connection: ✗ (HTTP 404"));
        assert!(result.detail.contains("Posts DB Connection: ✓"));
    }

    #[test]
    fn test_exit_code_branches() {
        assert_eq!(exit_code(true), 0);
        assert_eq!(exit_code(false), 1);
    }

    #[tokio::test]
    async fn test_failing_run_exits_nonzero() {
        let transport = ScriptedTransport::new()
            .json("GET /posts", 200, json!({"success": true, "posts": []}));
        let scenarios = vec![
            Scenario::single("Posts", RequestSpec::get("/posts"), posts_check()),
            Scenario::single("Profile", RequestSpec::get("/profile"), Check::Reachable),
        ];
        let mut v = verifier(transport, scenarios);
        assert_eq!(exit_code(v.run_all().await), 1);

        let transport = ScriptedTransport::new()
            .json("GET /posts", 200, json!({"success": true, "posts": []}));
        let scenarios = vec![Scenario::single("Posts", RequestSpec::get("/posts"), posts_check())];
        let mut v = verifier(transport, scenarios);
        assert_eq!(exit_code(v.run_all().await), 0);
    }
}
