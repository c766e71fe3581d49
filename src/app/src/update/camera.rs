use crux_core::{render::render, Command};

use crate::events::Event;
use crate::http_helpers::{process_image_response, IMAGE_URL};
use crate::model::Model;
use crate::{Effect, HttpCmd};

/// Handle camera events (fetch and its response)
pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        // Overlapping fetches are not cancelled; the later completion wins
        Event::FetchImage => {
            model.image_error = false;
            model.is_fetching_image = true;

            Command::all([
                render(),
                HttpCmd::get(IMAGE_URL).build().then_send(|result| {
                    Event::ImageResponse(process_image_response("Fetch image", result))
                }),
            ])
        }

        Event::ImageResponse(result) => {
            model.is_fetching_image = false;
            model.record_link(&result);

            match result {
                Ok(image) => {
                    log::debug!("received {} byte {} frame", image.size_bytes, image.mime);
                    model.image_error = false;
                    model.image = Some(image);
                }
                Err(e) => {
                    log::warn!("{e}");
                    model.image_error = true;
                }
            }

            render()
        }

        _ => unreachable!("Non-camera event passed to camera handler"),
    }
}
