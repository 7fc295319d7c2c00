//! Planning run facade
//!
//! Wires the pipeline together: aggregate → close → baseline and optimized
//! orderings → cost comparison. A run is one synchronous unit of work; the
//! cost model and the store are shared read-only, orderings belong to the run.

use crate::aggregate::{aggregate, RequirementRecord};
use crate::closure::close;
use crate::config::PlannerConfig;
use crate::cost::CostModel;
use crate::delta::Sequence;
use crate::error::PlanResult;
use crate::report::{CostComparison, CostReporter};
use crate::sequencer::{BaselineSequencer, Sequencer};
use crate::store::ConfigurationStore;
use std::sync::Arc;

/// Planning entry point
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    costs: Arc<CostModel>,
}

impl Planner {
    /// Create planner with default configuration
    #[inline]
    #[must_use]
    pub fn new(costs: Arc<CostModel>) -> Self {
        Self {
            config: PlannerConfig::default(),
            costs,
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Shared cost model
    #[inline]
    #[must_use]
    pub fn costs(&self) -> &Arc<CostModel> {
        &self.costs
    }

    /// Reporter honouring the configured closing-retract accounting
    #[inline]
    #[must_use]
    pub fn reporter(&self) -> CostReporter<'_> {
        CostReporter::new(&self.costs).with_closing_retract(self.config.include_closing_retract)
    }

    /// Aggregate and close raw requirements into a store
    ///
    /// # Errors
    /// Returns [`crate::PlanError::MalformedRequirement`] for bad records
    pub fn build_store<'a, I>(records: I) -> PlanResult<ConfigurationStore>
    where
        I: IntoIterator<Item = &'a RequirementRecord>,
    {
        Ok(close(aggregate(records)?))
    }

    /// Full run from raw requirements
    ///
    /// # Errors
    /// Returns [`crate::PlanError::MalformedRequirement`] for bad records
    pub fn plan<'a, I>(&self, records: I) -> PlanResult<PlanRun>
    where
        I: IntoIterator<Item = &'a RequirementRecord>,
    {
        let store = Self::build_store(records)?;
        Ok(self.plan_store(Arc::new(store)))
    }

    /// Run over an existing store
    #[must_use]
    pub fn plan_store(&self, store: Arc<ConfigurationStore>) -> PlanRun {
        let sequencer = self.config.sequencer.build();
        let baseline = BaselineSequencer::new().sequence(&store, &self.costs);
        let optimized = sequencer.sequence(&store, &self.costs);
        let comparison = self
            .reporter()
            .compare(&baseline, &optimized, self.config.cost_mode);

        tracing::info!(
            "Planned {} configurations with {}: {} → {} ({})",
            store.len(),
            sequencer.name(),
            comparison.baseline.combined_cost,
            comparison.optimized.combined_cost,
            self.config.cost_mode
        );

        PlanRun {
            store,
            baseline,
            optimized,
            comparison,
        }
    }
}

/// Output of one planning run
#[derive(Debug, Clone)]
pub struct PlanRun {
    store: Arc<ConfigurationStore>,
    baseline: Sequence,
    optimized: Sequence,
    comparison: CostComparison,
}

impl PlanRun {
    /// Closed configuration store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<ConfigurationStore> {
        &self.store
    }

    /// Store-order sequence
    #[inline]
    #[must_use]
    pub fn baseline(&self) -> &Sequence {
        &self.baseline
    }

    /// Sequencer-order sequence
    #[inline]
    #[must_use]
    pub fn optimized(&self) -> &Sequence {
        &self.optimized
    }

    /// Totals in the configured mode
    #[inline]
    #[must_use]
    pub fn comparison(&self) -> &CostComparison {
        &self.comparison
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CostMode;
    use crate::sequencer::SequencerKind;
    use crate::types::{QuantityId, RequirementId, ScenarioId};

    fn record(id: u64, scenarios: &[u64], quantity: u64) -> RequirementRecord {
        RequirementRecord::new(
            RequirementId(id),
            scenarios.iter().copied().map(ScenarioId),
            QuantityId(quantity),
        )
    }

    fn costs() -> Arc<CostModel> {
        Arc::new(
            CostModel::new()
                .with_scenario_cost(ScenarioId(1), 10)
                .with_scenario_cost(ScenarioId(2), 1),
        )
    }

    #[test]
    fn plan_produces_both_orderings() {
        let records = vec![record(1, &[1, 2], 10), record(2, &[2], 11), record(3, &[1], 12)];
        let run = Planner::new(costs()).plan(&records).unwrap();

        assert_eq!(run.store().len(), 3);
        assert_eq!(run.baseline().len(), 3);
        assert_eq!(run.optimized().len(), 3);
        assert!(run.comparison().optimized.combined_cost <= run.comparison().baseline.combined_cost);
    }

    #[test]
    fn baseline_sequencer_config_matches_baseline() {
        let records = vec![record(1, &[1], 10), record(2, &[2], 11)];
        let planner = Planner::new(costs())
            .with_config(PlannerConfig::new().with_sequencer(SequencerKind::Baseline));
        let run = planner.plan(&records).unwrap();
        assert_eq!(run.baseline().ids(), run.optimized().ids());
        assert_eq!(run.comparison().combined_savings(), 0);
    }

    #[test]
    fn malformed_input_aborts_run() {
        let mut bad = record(9, &[1], 0);
        bad.quantity = None;
        assert!(Planner::new(costs()).plan(std::iter::once(&bad)).is_err());
    }

    #[test]
    fn shared_store_is_not_mutated_by_runs() {
        let records = vec![record(1, &[1], 10), record(2, &[1, 2], 11)];
        let store = Arc::new(Planner::build_store(&records).unwrap());
        let planner = Planner::new(costs());

        let first = planner.plan_store(Arc::clone(&store));
        let second = planner
            .clone()
            .with_config(PlannerConfig::new().with_cost_mode(CostMode::Absolute))
            .plan_store(Arc::clone(&store));

        assert_eq!(first.optimized().ids(), second.optimized().ids());
        assert_eq!(second.comparison().baseline.mode, CostMode::Absolute);
        assert_eq!(store.len(), 2);
    }
}
