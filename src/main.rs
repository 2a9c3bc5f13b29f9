use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use socialflow_tester::utils::config::Config;
use socialflow_tester::{exit_code, report, scenario, ApiClient, ContractVerifier};

#[derive(Parser)]
#[command(name = "socialflow-tester")]
#[command(version)]
#[command(about = "Black-box contract checks for the SocialFlow Pro API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario suite against a base URL
    Run {
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Base URL of the API (overrides config and SOCIALFLOW_BASE_URL)
        #[arg(short, long)]
        base_url: Option<String>,

        /// Per-request timeout in milliseconds
        #[arg(short, long)]
        timeout_ms: Option<u64>,

        /// Output directory for reports
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate reports (JSON, JUnit)
        #[arg(long, default_value = "false")]
        report: bool,

        /// Run only the named scenario(s). Can be specified multiple times.
        #[arg(long)]
        only: Vec<String>,
    },

    /// List the scenarios in execution order
    List,

    /// Generate report from saved results
    Report {
        /// Path to test results JSON
        results: PathBuf,

        /// Output format (json, junit)
        #[arg(short, long, default_value = "junit")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            base_url,
            timeout_ms,
            output,
            report: write_report,
            only,
        } => {
            let mut cfg = match config {
                Some(path) => Config::from_file(&path)?,
                None => Config::default(),
            };
            cfg.apply_env()?;
            if let Some(url) = base_url {
                cfg.base_url = url;
            }
            if let Some(ms) = timeout_ms {
                cfg.timeout_ms = ms;
            }
            if let Some(dir) = output {
                cfg.output_dir = dir;
            }
            cfg.report |= write_report;
            let cfg = cfg.validate()?;

            log::info!("configuration: {:?}", cfg);

            let scenarios = scenario::select(
                scenario::socialflow_suite(&cfg, chrono::Local::now()),
                &only,
            )?;
            let client = ApiClient::new(&cfg.base_url, cfg.timeout())?;

            let mut verifier = ContractVerifier::new(Box::new(client), scenarios);
            let passed = verifier.run_all().await;
            let run = verifier.finish();

            if cfg.report {
                report::write_reports(&run, &cfg.output_dir).await?;
            }

            std::process::exit(exit_code(passed));
        }

        Commands::List => {
            let scenarios = scenario::socialflow_suite(&Config::default(), chrono::Local::now());
            for (i, s) in scenarios.iter().enumerate() {
                println!(
                    "{:>3}. {} {}",
                    i + 1,
                    s.name.white().bold(),
                    format!("({} request(s))", s.request_count()).dimmed()
                );
            }
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "📊".to_string().blue(),
                format.cyan(),
                results.display()
            );
            report::generate_report(&results, &format, output.as_deref()).await?;
        }
    }

    Ok(())
}
