use serde::{Deserialize, Serialize};

use crate::types::*;

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    // Initialization (screen mounted)
    Initialize,

    // Control pad
    Send(Intent),
    ToggleSpray,
    ToggleSeed,
    ToggleAutoMode,

    // Camera
    FetchImage,

    // UI actions
    AlertDismissed,

    // HTTP responses (internal events, skipped from serialization)
    #[serde(skip)]
    SendResponse(Intent, Result<(), String>),
    #[serde(skip)]
    ImageResponse(Result<CameraImage, String>),
}
