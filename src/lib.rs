pub mod client;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod utils;

// Re-export common items
pub use client::{ApiClient, HttpTransport};
pub use report::generate_report;
pub use runner::{exit_code, ContractVerifier, TestResult, TestRun};
pub use scenario::socialflow_suite;
