mod camera;
mod controls;
mod ui;

use crux_core::Command;

use crate::events::Event;
use crate::model::Model;
use crate::Effect;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        // Initialization: the screen fetches one frame on mount
        Event::Initialize => camera::handle(Event::FetchImage, model),

        // Control pad domain
        Event::Send(_)
        | Event::SendResponse(..)
        | Event::ToggleSpray
        | Event::ToggleSeed
        | Event::ToggleAutoMode => controls::handle(event, model),

        // Camera domain
        Event::FetchImage | Event::ImageResponse(_) => camera::handle(event, model),

        // UI actions domain
        Event::AlertDismissed => ui::handle(event, model),
    }
}
