use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::args::ComponentSpec;
use crate::error::AppResult;
use crate::stats::{ComponentId, LatencyBand, SlaClassifier, TimeBucket};

/// One pipeline stage and the distribution its simulated cost is drawn from.
#[derive(Debug, Clone)]
pub struct Stage {
    id: ComponentId,
    cost: Uniform<u64>,
}

impl Stage {
    #[must_use]
    pub fn new(spec: &ComponentSpec) -> Self {
        Self {
            id: ComponentId::new(&spec.name),
            cost: Uniform::new_inclusive(spec.min_ns, spec.max_ns.max(spec.min_ns)),
        }
    }
}

/// Stages in registration order. A packet visits each once.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    #[must_use]
    pub fn new(components: &[ComponentSpec]) -> Self {
        Self {
            stages: components.iter().map(Stage::new).collect(),
        }
    }

    #[must_use]
    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.stages.iter().map(|stage| stage.id.clone())
    }

    /// Pushes one packet through every stage, recording each stage duration
    /// and classifying the end-to-end time.
    ///
    /// # Errors
    ///
    /// Returns an error when a stage is not registered with `bucket`.
    pub fn process_packet<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        bucket: &TimeBucket,
        classifier: &SlaClassifier,
    ) -> AppResult<(u64, LatencyBand)> {
        let mut total_ns = 0_u64;
        for stage in &self.stages {
            let duration_ns = stage.cost.sample(rng);
            bucket.record_for_component(stage.id.as_str(), duration_ns)?;
            total_ns = total_ns.saturating_add(duration_ns);
        }
        Ok((total_ns, classifier.classify(total_ns)))
    }
}
