//! Alert command definitions.
//!
//! A blocking, user-facing notice. The Shell shows it and resolves the
//! request once the user has acknowledged it.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertOperation {
    pub title: String,
    pub message: String,
}

impl Operation for AlertOperation {
    type Output = ();
}

/// Command-based Alert API
pub struct Alert<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Alert<Effect, Event>
where
    Effect: Send + From<crux_core::Request<AlertOperation>> + 'static,
    Event: Send + 'static,
{
    pub fn show(title: impl Into<String>, message: impl Into<String>) -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(AlertOperation {
            title: title.into(),
            message: message.into(),
        })
    }
}

#[must_use]
pub struct RequestBuilder<Effect, Event> {
    operation: AlertOperation,
    _effect: PhantomData<Effect>,
    _event: PhantomData<fn() -> Event>,
}

impl<Effect, Event> RequestBuilder<Effect, Event>
where
    Effect: Send + From<crux_core::Request<AlertOperation>> + 'static,
    Event: Send + 'static,
{
    fn new(operation: AlertOperation) -> Self {
        Self {
            operation,
            _effect: PhantomData,
            _event: PhantomData,
        }
    }

    /// Build the request into a Command RequestBuilder; resolves on acknowledge
    pub fn build(
        self,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = ()>> {
        command::RequestBuilder::new(move |ctx| async move {
            Command::request_from_shell(self.operation)
                .into_future(ctx)
                .await
        })
    }
}
