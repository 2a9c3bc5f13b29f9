//! Scenario model
//!
//! A scenario is a named request plan plus the validation policy applied to
//! each response. Scenarios are independent of one another.

pub mod check;
pub mod suite;

use anyhow::Result;

use crate::client::RequestSpec;

pub use check::{Check, Shape, Verdict};
pub use suite::socialflow_suite;

/// One named request plan
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub plan: Plan,
}

/// How a scenario turns into requests
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// One request, one check
    Single { request: RequestSpec, check: Check },

    /// The same request once per value of a query parameter.
    /// Stops at the first non-conforming value.
    Sweep {
        param: String,
        values: Vec<String>,
        request: RequestSpec,
        check: Check,
    },

    /// Several distinct requests
    Probes { probes: Vec<Probe>, mode: ProbeMode },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    pub label: String,
    pub request: RequestSpec,
    pub check: Check,
    /// A failing advisory probe is noted in the detail but never fails the scenario
    pub advisory: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMode {
    StopAtFirstFailure,
    EvaluateAll,
}

impl Scenario {
    pub fn single(name: &str, request: RequestSpec, check: Check) -> Self {
        Self {
            name: name.to_string(),
            plan: Plan::Single { request, check },
        }
    }

    pub fn sweep(
        name: &str,
        param: &str,
        values: &[&str],
        request: RequestSpec,
        check: Check,
    ) -> Self {
        Self {
            name: name.to_string(),
            plan: Plan::Sweep {
                param: param.to_string(),
                values: values.iter().map(|v| v.to_string()).collect(),
                request,
                check,
            },
        }
    }

    pub fn probes(name: &str, mode: ProbeMode, probes: Vec<Probe>) -> Self {
        Self {
            name: name.to_string(),
            plan: Plan::Probes { probes, mode },
        }
    }

    /// Number of requests the plan issues when everything conforms
    pub fn request_count(&self) -> usize {
        match &self.plan {
            Plan::Single { .. } => 1,
            Plan::Sweep { values, .. } => values.len(),
            Plan::Probes { probes, .. } => probes.len(),
        }
    }
}

impl Probe {
    pub fn new(label: &str, request: RequestSpec, check: Check) -> Self {
        Self {
            label: label.to_string(),
            request,
            check,
            advisory: false,
        }
    }

    pub fn advisory(mut self) -> Self {
        self.advisory = true;
        self
    }
}

/// Keep only the named scenarios (case-insensitive), preserving suite order
pub fn select(scenarios: Vec<Scenario>, names: &[String]) -> Result<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(scenarios);
    }

    for name in names {
        let known = scenarios
            .iter()
            .any(|s| s.name.eq_ignore_ascii_case(name));
        if !known {
            anyhow::bail!(
                "Scenario '{}' not found. Available scenarios: {}",
                name,
                scenarios
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    Ok(scenarios
        .into_iter()
        .filter(|s| names.iter().any(|n| s.name.eq_ignore_ascii_case(n)))
        .collect())
}
