use crux_core::{render::render, Command};

use crate::events::Event;
use crate::http_helpers::COMMAND_ENDPOINT;
use crate::json_post;
use crate::model::{AlertMessage, Model};
use crate::types::{CommandRequest, Intent};
use crate::{AlertCmd, Effect};

const ALERT_TITLE: &str = "Connection Error";
const ALERT_MESSAGE: &str = "Failed to send command to AgriBot";

/// Handle control pad events (movement, actions, command responses)
pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Send(intent) => send(intent, model),

        Event::SendResponse(intent, result) => {
            model.is_sending = false;
            model.record_link(&result);

            match result {
                Ok(()) => {
                    log::debug!("command {intent} acknowledged");
                    render()
                }
                Err(e) => {
                    log::warn!("command {intent} failed: {e}");
                    model.alerts.push(AlertMessage {
                        title: ALERT_TITLE.to_string(),
                        message: ALERT_MESSAGE.to_string(),
                    });
                    Command::all([
                        render(),
                        AlertCmd::show(ALERT_TITLE, ALERT_MESSAGE)
                            .build()
                            .then_send(|()| Event::AlertDismissed),
                    ])
                }
            }
        }

        // Toggles flip immediately; the outcome of the send does not roll them back
        Event::ToggleSpray => {
            model.spray_active = !model.spray_active;
            let intent = if model.spray_active {
                Intent::SprayOn
            } else {
                Intent::SprayOff
            };
            send(intent, model)
        }

        Event::ToggleSeed => {
            model.seed_active = !model.seed_active;
            let intent = if model.seed_active {
                Intent::SeedOn
            } else {
                Intent::SeedOff
            };
            send(intent, model)
        }

        // Leaving auto mode halts the drive rather than sending a dedicated "off"
        Event::ToggleAutoMode => {
            model.auto_mode = !model.auto_mode;
            let intent = if model.auto_mode {
                Intent::Auto
            } else {
                Intent::Stop
            };
            send(intent, model)
        }

        _ => unreachable!("Non-control event passed to control handler"),
    }
}

fn send(intent: Intent, model: &mut Model) -> Command<Effect, Event> {
    log::debug!("sending command {intent}");
    model.is_sending = true;

    let request = CommandRequest::from(intent);
    json_post!(model, COMMAND_ENDPOINT, &request, "Send command", |result| {
        Event::SendResponse(intent, result)
    })
}
