use anyhow::Result;
use std::path::Path;

use crate::runner::TestRun;

/// Generate JSON report
pub async fn generate(run: &TestRun, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(run)?;

    if let Some(path) = output {
        std::fs::write(path, json)?;
        println!("JSON report saved to: {}", path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}
