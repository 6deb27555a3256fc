//! Prometheus metrics describing validator selections.

use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;

use stakepick_core_types::Exclusion;

mod registry;
pub use registry::{Registry, SharedRegistry};

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ExclusionLabel {
    reason: &'static str,
}

impl From<Exclusion> for ExclusionLabel {
    fn from(reason: Exclusion) -> Self {
        Self {
            reason: reason.as_str(),
        }
    }
}

/// Selection metrics, registered under the `stakepick` prefix.
#[derive(Clone, Debug, Default)]
pub struct Metrics {
    /// Number of completed selection runs
    pub runs: Counter,

    /// Validators registered at the snapshot block
    pub validators_total: Gauge,

    /// Validators active in the snapshot era
    pub validators_active: Gauge,

    /// Validators selected by the last run
    pub validators_selected: Gauge,

    /// Validators excluded by the last run, per reason
    pub validators_excluded: Family<ExclusionLabel, Gauge>,
}

impl Metrics {
    pub fn register(registry: &SharedRegistry) -> Self {
        let metrics = Self::default();

        registry.with_prefix("stakepick", |registry| {
            registry.register("runs", "Number of completed selection runs", metrics.runs.clone());

            registry.register(
                "validators_total",
                "Validators registered at the snapshot block",
                metrics.validators_total.clone(),
            );

            registry.register(
                "validators_active",
                "Validators active in the snapshot era",
                metrics.validators_active.clone(),
            );

            registry.register(
                "validators_selected",
                "Validators selected by the last run",
                metrics.validators_selected.clone(),
            );

            registry.register(
                "validators_excluded",
                "Validators excluded by the last run, per reason",
                metrics.validators_excluded.clone(),
            );
        });

        metrics
    }

    /// Record the outcome of one selection.
    ///
    /// `excluded` yields the number of validators each rule excluded; rules
    /// that excluded nobody are reset to zero.
    pub fn observe(
        &self,
        total: usize,
        active: usize,
        selected: usize,
        excluded: impl Fn(Exclusion) -> usize,
    ) {
        self.runs.inc();
        self.validators_total.set(total as i64);
        self.validators_active.set(active as i64);
        self.validators_selected.set(selected as i64);

        for reason in Exclusion::ALL {
            self.validators_excluded
                .get_or_create(&ExclusionLabel::from(reason))
                .set(excluded(reason) as i64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_and_export() {
        let registry = SharedRegistry::default();
        let metrics = Metrics::register(&registry);

        metrics.observe(10, 8, 3, |reason| match reason {
            Exclusion::NotActive => 2,
            Exclusion::UnhealthyCommission => 5,
            _ => 0,
        });

        let mut out = String::new();
        registry.export(&mut out).unwrap();

        assert!(out.contains("stakepick_runs_total 1"));
        assert!(out.contains("stakepick_validators_selected 3"));
        assert!(out.contains(r#"stakepick_validators_excluded{reason="unhealthy_commission"} 5"#));
        assert!(out.contains(r#"stakepick_validators_excluded{reason="slashed_before"} 0"#));
    }
}
