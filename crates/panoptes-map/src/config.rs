use crate::integrator::IntegratorConfig;
use crate::submap::SubmapConfig;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct MapConfig {
    pub submap: SubmapConfig,
    pub integrator: IntegratorConfig,
}
