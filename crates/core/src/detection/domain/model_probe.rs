use std::path::Path;

/// Shape of a loaded detector model, as far as a liveness probe cares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelSummary {
    pub inputs: usize,
    pub outputs: usize,
}

impl ModelSummary {
    /// A model without inputs or outputs cannot run inference.
    pub fn is_empty(&self) -> bool {
        self.inputs == 0 || self.outputs == 0
    }
}

/// Loads a detector resource without running it.
pub trait ModelProbe {
    fn probe(&self, model_path: &Path) -> Result<ModelSummary, Box<dyn std::error::Error>>;
}
