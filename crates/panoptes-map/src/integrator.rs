use crate::layer::BlockKey;
use crate::submap::Submap;

use log::debug;
use serde::{Deserialize, Serialize};

/// One judged voxel observation produced by perception.
///
/// `voxel_index` is a linearized index and must lie inside the target block.
#[derive(Clone, Copy, Debug)]
pub struct ClassObservation {
    pub block: BlockKey,
    pub voxel_index: usize,
    pub class_index: usize,
    pub is_ground_truth: bool,
}

/// Raw perception input reduced to per-voxel class observations.
#[derive(Clone, Debug, Default)]
pub struct PerceptionInput {
    pub observations: Vec<ClassObservation>,
}

/// Writes belief updates into a submap.
///
/// Implementations are interchangeable behind [`build_integrator`]; the map
/// engine only depends on this entry point.
pub trait BeliefIntegrator {
    fn integrate(&mut self, submap: &mut Submap, input: &PerceptionInput);
}

/// Selects which integration strategy [`build_integrator`] constructs.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum IntegratorConfig {
    /// Apply every observation.
    Naive,
    /// Apply only ground-truth observations.
    GroundTruthOnly,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self::Naive
    }
}

pub fn build_integrator(config: &IntegratorConfig) -> Box<dyn BeliefIntegrator> {
    match config {
        IntegratorConfig::Naive => Box::new(NaiveIntegrator),
        IntegratorConfig::GroundTruthOnly => Box::new(GroundTruthIntegrator),
    }
}

/// Applies every observation as-is.
pub struct NaiveIntegrator;

impl BeliefIntegrator for NaiveIntegrator {
    fn integrate(&mut self, submap: &mut Submap, input: &PerceptionInput) {
        debug!(
            "integrating {} observations into submap {:?}",
            input.observations.len(),
            submap.id()
        );
        for observation in &input.observations {
            let block = submap.layer_mut().block_or_insert(observation.block);
            let voxel = block.voxel_mut(observation.voxel_index);
            if observation.is_ground_truth {
                voxel.belief.assign_ground_truth(observation.class_index);
            }
            voxel.belief.observe(observation.class_index);
        }
    }
}

/// Ignores everything perception inferred on its own.
pub struct GroundTruthIntegrator;

impl BeliefIntegrator for GroundTruthIntegrator {
    fn integrate(&mut self, submap: &mut Submap, input: &PerceptionInput) {
        for observation in &input.observations {
            if !observation.is_ground_truth {
                continue;
            }
            let block = submap.layer_mut().block_or_insert(observation.block);
            let voxel = block.voxel_mut(observation.voxel_index);
            voxel.belief.assign_ground_truth(observation.class_index);
            voxel.belief.observe(observation.class_index);
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
