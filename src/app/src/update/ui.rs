use crux_core::Command;

use crate::events::Event;
use crate::model::Model;
use crate::update_field;
use crate::Effect;

/// Handle UI-related events (alert acknowledgement)
pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        // Acknowledgements resolve alerts in the order they were raised
        Event::AlertDismissed => update_field!(
            model.alerts,
            model.alerts.iter().skip(1).cloned().collect::<Vec<_>>()
        ),
        _ => unreachable!("Non-UI event passed to UI handler"),
    }
}
