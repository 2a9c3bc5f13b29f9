pub mod json;
pub mod junit;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::runner::TestRun;

/// Generate report from a saved JSON run log
pub async fn generate_report(
    results_path: &Path,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let results = std::fs::read_to_string(results_path)
        .with_context(|| format!("Failed to read results: {}", results_path.display()))?;
    let run: TestRun = serde_json::from_str(&results)
        .with_context(|| format!("Invalid results file: {}", results_path.display()))?;

    match format {
        "json" => json::generate(&run, output).await,
        "junit" => junit::generate(&run, output).await,
        _ => anyhow::bail!("Unknown format: {} (expected json or junit)", format),
    }
}

/// Write every report for a finished run into `output_dir`
pub async fn write_reports(run: &TestRun, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    let json_path = output_dir.join("test-results.json");
    json::generate(run, Some(&json_path)).await?;

    let junit_path = output_dir.join("junit.xml");
    junit::generate(run, Some(&junit_path)).await?;

    println!(
        "\n{} Reports saved to: {}",
        "📄".to_string().blue(),
        output_dir.display().to_string().cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::TestResult;

    fn scratch_dir() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("socialflow-tester-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_write_reports_round_trip() {
        let dir = scratch_dir();
        let mut run = TestRun::new("report-run", "http://localhost:3000/api");
        run.record(TestResult::new("Posts GET All", true, "Retrieved 2 posts", None));
        run.finish();

        write_reports(&run, &dir).await.unwrap();

        let saved = dir.join("test-results.json");
        let back: TestRun =
            serde_json::from_str(&std::fs::read_to_string(&saved).unwrap()).unwrap();
        assert_eq!(back.run_id, "report-run");
        assert_eq!(back.results.len(), 1);
        assert!(dir.join("junit.xml").exists());

        let junit_out = dir.join("regenerated.xml");
        generate_report(&saved, "junit", Some(&junit_out)).await.unwrap();
        assert!(std::fs::read_to_string(&junit_out)
            .unwrap()
            .contains("Posts GET All"));

        let err = generate_report(&saved, "html", None).await.unwrap_err();
        assert!(err.to_string().contains("Unknown format"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
