/// Macro for model field updates with automatic rendering.
/// Supports both single and multiple field updates.
///
/// # Examples
///
/// Single field update:
/// ```ignore
/// update_field!(model.is_sending, false)
/// ```
///
/// Multiple field updates:
/// ```ignore
/// update_field!(
///     model.image_error, false;
///     model.is_fetching_image, true
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multiple field updates (must come first to match the pattern)
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single field update
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

/// Macro for a JSON POST whose response only matters by status.
///
/// ```ignore
/// json_post!(model, COMMAND_ENDPOINT, &request, "Send command", |result| {
///     Event::SendResponse(intent, result)
/// })
/// ```
#[macro_export]
macro_rules! json_post {
    ($model:expr, $endpoint:expr, $body:expr, $action:expr, |$result:ident| $event:expr) => {{
        match $crate::HttpCmd::post($crate::build_url($endpoint))
            .header("Content-Type", "application/json")
            .body_json($body)
        {
            Ok(builder) => crux_core::Command::all([
                crux_core::render::render(),
                builder.build().then_send(move |response| {
                    let $result = $crate::process_status_response($action, response);
                    $event
                }),
            ]),
            Err(e) => {
                log::error!("failed to create {} request: {e}", $action);
                $model.is_sending = false;
                crux_core::render::render()
            }
        }
    }};
}
