//! Step tracking for a running crop prediction
//!
//! A prediction walks six fixed steps in order. Each step moves
//! Pending -> Processing -> Completed, or ends in Failed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display metadata for one prediction step
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StepInfo {
    pub id: u8,
    pub name: &'static str,
    pub description: &'static str,
}

pub const PREDICTION_STEPS: [StepInfo; 6] = [
    StepInfo {
        id: 1,
        name: "Fetching Satellite Image",
        description: "Retrieving satellite imagery for your location",
    },
    StepInfo {
        id: 2,
        name: "Data Validation",
        description: "Validating soil and weather parameters",
    },
    StepInfo {
        id: 3,
        name: "Image Analysis",
        description: "Processing satellite image through CNN",
    },
    StepInfo {
        id: 4,
        name: "Feature Extraction",
        description: "Extracting features from image and tabular data",
    },
    StepInfo {
        id: 5,
        name: "Model Inference",
        description: "Running LiteGeoNet prediction model",
    },
    StepInfo {
        id: 6,
        name: "Generating Results",
        description: "Creating recommendations and yield estimates",
    },
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    Processing,
    Completed {
        detail: Option<String>,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("Unknown prediction step {0}")]
    UnknownStep(u8),

    #[error("Step {step} cannot start before step {blocking} completes")]
    OutOfOrder { step: u8, blocking: u8 },

    #[error("Step {0} is not in progress")]
    NotStarted(u8),

    #[error("Prediction already failed at step {0}")]
    AlreadyFailed(u8),
}

/// Status of every step of one prediction run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionProgress {
    statuses: [StepStatus; 6],
}

impl PredictionProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, step: u8) -> Option<&StepStatus> {
        Self::index(step).ok().map(|i| &self.statuses[i])
    }

    /// Move `step` to Processing; every earlier step must be completed
    pub fn start(&mut self, step: u8) -> Result<(), ProgressError> {
        let index = Self::index(step)?;
        self.ensure_not_failed()?;
        if let Some(blocking) = self.statuses[..index]
            .iter()
            .position(|s| !matches!(s, StepStatus::Completed { .. }))
        {
            return Err(ProgressError::OutOfOrder {
                step,
                blocking: blocking as u8 + 1,
            });
        }
        self.statuses[index] = StepStatus::Processing;
        Ok(())
    }

    pub fn complete(&mut self, step: u8, detail: Option<String>) -> Result<(), ProgressError> {
        let index = Self::index(step)?;
        if self.statuses[index] != StepStatus::Processing {
            return Err(ProgressError::NotStarted(step));
        }
        self.statuses[index] = StepStatus::Completed { detail };
        Ok(())
    }

    pub fn fail(&mut self, step: u8, reason: impl Into<String>) -> Result<(), ProgressError> {
        let index = Self::index(step)?;
        self.ensure_not_failed()?;
        self.statuses[index] = StepStatus::Failed {
            reason: reason.into(),
        };
        Ok(())
    }

    /// Id of the last completed step in sequence, 0 before any completes
    pub fn current_step(&self) -> u8 {
        self.statuses
            .iter()
            .take_while(|s| matches!(s, StepStatus::Completed { .. }))
            .count() as u8
    }

    pub fn is_finished(&self) -> bool {
        self.current_step() as usize == PREDICTION_STEPS.len()
    }

    pub fn failed_step(&self) -> Option<u8> {
        self.statuses
            .iter()
            .position(|s| matches!(s, StepStatus::Failed { .. }))
            .map(|i| i as u8 + 1)
    }

    /// Completed share of all steps, 0-100
    pub fn percent(&self) -> u8 {
        (self.current_step() as usize * 100 / PREDICTION_STEPS.len()) as u8
    }

    fn ensure_not_failed(&self) -> Result<(), ProgressError> {
        match self.failed_step() {
            Some(step) => Err(ProgressError::AlreadyFailed(step)),
            None => Ok(()),
        }
    }

    fn index(step: u8) -> Result<usize, ProgressError> {
        match step {
            1..=6 => Ok(step as usize - 1),
            _ => Err(ProgressError::UnknownStep(step)),
        }
    }
}
