use serde::{Deserialize, Serialize};

use crate::types::*;

/// Application Model - the complete state
/// Also serves as the ViewModel when serialized
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Model {
    // Link state, written by every request completion
    pub connectivity: Connectivity,

    // Command state
    pub is_sending: bool,

    // Camera state
    pub image: Option<CameraImage>,
    pub image_error: bool,
    pub is_fetching_image: bool,

    // Action toggles
    pub spray_active: bool,
    pub seed_active: bool,
    pub auto_mode: bool,

    // Alerts raised but not yet acknowledged, oldest first
    pub alerts: Vec<AlertMessage>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub title: String,
    pub message: String,
}

impl Model {
    /// Record the outcome of a finished request.
    ///
    /// Completions may arrive in any order; whichever lands last wins.
    pub fn record_link<T, E>(&mut self, outcome: &Result<T, E>) {
        self.connectivity = Connectivity::from_outcome(outcome);
    }

    /// Alert the shell is currently showing.
    pub fn alert(&self) -> Option<&AlertMessage> {
        self.alerts.first()
    }

    /// Image to display, if the last fetch did not fail.
    pub fn displayable_image(&self) -> Option<&CameraImage> {
        if self.image_error {
            None
        } else {
            self.image.as_ref()
        }
    }

    pub fn spray_label(&self) -> &'static str {
        if self.spray_active {
            "Stop Spray"
        } else {
            "Start Spray"
        }
    }

    pub fn seed_label(&self) -> &'static str {
        if self.seed_active {
            "Stop Seeding"
        } else {
            "Start Seeding"
        }
    }

    pub fn auto_mode_label(&self) -> &'static str {
        if self.auto_mode {
            "Stop Weeding"
        } else {
            "Start Weeding"
        }
    }
}
