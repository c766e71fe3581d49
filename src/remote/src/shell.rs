use crate::http_client::DeviceClient;
use agribot_core::{AlertOperation, App, Effect, Event, Model};
use anyhow::{Context, Result};
use crux_core::{Core, Request};
use crux_http::protocol::{HttpRequest, HttpResult};
use log::{debug, error, warn};
use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::sync::mpsc;

/// A finished HTTP request waiting to be handed back to the core
pub struct Completion {
    id: u64,
    result: HttpResult,
}

/// Runs the core and carries out its effects.
///
/// HTTP requests run on their own tasks, so presses are not serialized; each
/// result comes back through the completion channel returned by [`Shell::new`]
/// and must be passed to [`Shell::complete`] by the event loop.
pub struct Shell<C> {
    core: Core<App>,
    client: Arc<C>,
    completions: mpsc::UnboundedSender<Completion>,
    in_flight: HashMap<u64, Request<HttpRequest>>,
    next_id: u64,
    alerts: VecDeque<Request<AlertOperation>>,
}

impl<C> Shell<C>
where
    C: DeviceClient + Send + Sync + 'static,
{
    pub fn new(client: C) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let shell = Self {
            core: Core::new(),
            client: Arc::new(client),
            completions: tx,
            in_flight: HashMap::new(),
            next_id: 0,
            alerts: VecDeque::new(),
        };

        (shell, rx)
    }

    pub fn dispatch(&mut self, event: Event) {
        debug!("dispatch {event:?}");
        let effects = self.core.process_event(event);
        self.process_effects(effects);
    }

    pub fn complete(&mut self, completion: Completion) {
        let Some(mut request) = self.in_flight.remove(&completion.id) else {
            warn!("dropping completion for unknown request {}", completion.id);
            return;
        };

        match self.core.resolve(&mut request, completion.result) {
            Ok(effects) => self.process_effects(effects),
            Err(e) => error!("failed to resolve http request: {e}"),
        }
    }

    /// Dismiss the oldest alert. Returns `false` if none was showing.
    pub fn acknowledge_alert(&mut self) -> bool {
        let Some(mut request) = self.alerts.pop_front() else {
            return false;
        };

        match self.core.resolve(&mut request, ()) {
            Ok(effects) => self.process_effects(effects),
            Err(e) => error!("failed to resolve alert: {e}"),
        }

        if let Some(next) = self.alerts.front() {
            print_alert(&next.operation);
        }

        true
    }

    pub fn view(&self) -> Model {
        self.core.view()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn pending_alerts(&self) -> usize {
        self.alerts.len()
    }

    fn process_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Render(_) => println!("{}", status_line(&self.core.view())),
                Effect::Http(request) => self.spawn_request(request),
                Effect::Alert(request) => {
                    if self.alerts.is_empty() {
                        print_alert(&request.operation);
                    }
                    self.alerts.push_back(request);
                }
            }
        }
    }

    fn spawn_request(&mut self, request: Request<HttpRequest>) {
        let id = self.next_id;
        self.next_id += 1;

        let operation = request.operation.clone();
        self.in_flight.insert(id, request);

        let client = Arc::clone(&self.client);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = client.execute(operation).await;
            // the receiver is gone once the event loop has stopped
            let _ = tx.send(Completion { id, result });
        });
    }
}

fn print_alert(alert: &AlertOperation) {
    println!("!! {}: {} (type 'ok' to dismiss)", alert.title, alert.message);
}

/// One-line rendering of the control screen.
pub fn status_line(model: &Model) -> String {
    let camera = if model.image_error {
        "Camera Unavailable (type 'refresh' to retry)".to_string()
    } else if let Some(image) = &model.image {
        format!("{} byte {} frame", image.size_bytes, image.mime)
    } else if model.is_fetching_image {
        "Loading Camera...".to_string()
    } else {
        "no frame".to_string()
    };

    let mut line = format!(
        "[{}] {} | {} | {} | camera: {camera}",
        model.connectivity.label(),
        model.auto_mode_label(),
        model.spray_label(),
        model.seed_label(),
    );

    if model.is_sending {
        line.push_str(" | sending...");
    }

    line
}

/// Write the displayed camera frame into `dir`.
pub async fn write_snapshot(model: &Model, dir: &Path) -> Result<PathBuf> {
    let image = model
        .displayable_image()
        .context("failed to save snapshot: no camera frame available")?;

    let bytes = image
        .to_bytes()
        .map_err(anyhow::Error::msg)
        .context("failed to decode camera frame")?;

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("failed to read system time")?
        .as_millis();
    let path = dir.join(format!("agribot-{stamp}.{}", image.extension()));

    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::MockDeviceClient;
    use agribot_core::{Connectivity, IMAGE_URL, Intent};
    use crux_http::{HttpError, protocol::HttpResponse};
    use std::sync::Mutex;

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

    async fn settle<C>(shell: &mut Shell<C>, completions: &mut mpsc::UnboundedReceiver<Completion>)
    where
        C: DeviceClient + Send + Sync + 'static,
    {
        while shell.in_flight() > 0 {
            let completion = completions.recv().await.expect("completion channel closed");
            shell.complete(completion);
        }
    }

    #[tokio::test]
    async fn send_success_connects_without_alert() {
        let mut client = MockDeviceClient::new();
        client
            .expect_execute()
            .times(1)
            .returning(|_| Box::pin(async { HttpResult::Ok(HttpResponse::ok().build()) }));

        let (mut shell, mut completions) = Shell::new(client);
        shell.dispatch(Event::Send(Intent::Up));
        assert_eq!(shell.in_flight(), 1);
        assert!(shell.view().is_sending);

        settle(&mut shell, &mut completions).await;

        let view = shell.view();
        assert_eq!(view.connectivity, Connectivity::Connected);
        assert!(!view.is_sending);
        assert_eq!(shell.pending_alerts(), 0);
    }

    #[tokio::test]
    async fn send_server_error_raises_one_alert() {
        let mut client = MockDeviceClient::new();
        client
            .expect_execute()
            .times(1)
            .returning(|_| Box::pin(async { HttpResult::Ok(HttpResponse::status(502).build()) }));

        let (mut shell, mut completions) = Shell::new(client);
        shell.dispatch(Event::Send(Intent::Stop));
        settle(&mut shell, &mut completions).await;

        assert_eq!(shell.view().connectivity, Connectivity::Disconnected);
        assert_eq!(shell.pending_alerts(), 1);
        assert!(shell.view().alert().is_some());

        assert!(shell.acknowledge_alert());
        assert_eq!(shell.pending_alerts(), 0);
        assert_eq!(shell.view().alert(), None);
        assert!(!shell.acknowledge_alert());
    }

    #[tokio::test]
    async fn send_transport_error_raises_one_alert() {
        let mut client = MockDeviceClient::new();
        client.expect_execute().times(1).returning(|_| {
            Box::pin(async { HttpResult::Err(HttpError::Io("connection refused".to_string())) })
        });

        let (mut shell, mut completions) = Shell::new(client);
        shell.dispatch(Event::Send(Intent::Stop));
        settle(&mut shell, &mut completions).await;

        assert_eq!(shell.view().connectivity, Connectivity::Disconnected);
        assert_eq!(shell.pending_alerts(), 1);
    }

    #[tokio::test]
    async fn each_acknowledgement_dismisses_one_queued_alert() {
        let mut client = MockDeviceClient::new();
        client.expect_execute().times(2).returning(|_| {
            Box::pin(async { HttpResult::Err(HttpError::Io("connection refused".to_string())) })
        });

        let (mut shell, mut completions) = Shell::new(client);
        shell.dispatch(Event::Send(Intent::Up));
        shell.dispatch(Event::Send(Intent::Down));
        settle(&mut shell, &mut completions).await;
        assert_eq!(shell.pending_alerts(), 2);
        assert_eq!(shell.view().alerts.len(), 2);

        assert!(shell.acknowledge_alert());
        assert_eq!(shell.pending_alerts(), 1);
        assert!(shell.view().alert().is_some());

        assert!(shell.acknowledge_alert());
        assert_eq!(shell.pending_alerts(), 0);
        assert_eq!(shell.view().alert(), None);
    }

    #[tokio::test]
    async fn toggles_send_on_then_off_even_when_offline() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&sent);

        let mut client = MockDeviceClient::new();
        client.expect_execute().times(4).returning(move |request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            recorded.lock().unwrap().push(body["cmd"].clone());
            Box::pin(async { HttpResult::Err(HttpError::Io("offline".to_string())) })
        });

        let (mut shell, mut completions) = Shell::new(client);
        for event in [Event::ToggleSpray, Event::ToggleSpray] {
            shell.dispatch(event);
            settle(&mut shell, &mut completions).await;
        }
        for event in [Event::ToggleSeed, Event::ToggleSeed] {
            shell.dispatch(event);
            settle(&mut shell, &mut completions).await;
        }

        let sent = sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![
                serde_json::json!({ "2": "ON" }),
                serde_json::json!({ "2": "OFF" }),
                serde_json::json!({ "1": "ON" }),
                serde_json::json!({ "1": "OFF" }),
            ]
        );
        assert_eq!(shell.pending_alerts(), 4);
    }

    #[tokio::test]
    async fn image_fetch_failure_then_retry_succeeds() {
        let attempts = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&attempts);

        let mut client = MockDeviceClient::new();
        client
            .expect_execute()
            .withf(|request| request.url == IMAGE_URL)
            .times(2)
            .returning(move |_| {
                let mut attempts = counter.lock().unwrap();
                *attempts += 1;
                let result = if *attempts == 1 {
                    HttpResult::Err(HttpError::Io("no route".to_string()))
                } else {
                    HttpResult::Ok(HttpResponse::ok().body(JPEG.to_vec()).build())
                };
                Box::pin(async move { result })
            });

        let (mut shell, mut completions) = Shell::new(client);
        shell.dispatch(Event::Initialize);
        settle(&mut shell, &mut completions).await;

        let view = shell.view();
        assert!(view.image_error);
        assert_eq!(view.connectivity, Connectivity::Disconnected);
        assert!(status_line(&view).contains("Camera Unavailable"));

        shell.dispatch(Event::FetchImage);
        settle(&mut shell, &mut completions).await;

        let view = shell.view();
        assert!(!view.image_error);
        assert_eq!(view.connectivity, Connectivity::Connected);
        assert!(view.displayable_image().is_some());
        // image fetch failures never raise alerts
        assert_eq!(shell.pending_alerts(), 0);
    }

    #[tokio::test]
    async fn snapshot_writes_decoded_frame() {
        let mut client = MockDeviceClient::new();
        client.expect_execute().times(1).returning(|_| {
            Box::pin(async { HttpResult::Ok(HttpResponse::ok().body(JPEG.to_vec()).build()) })
        });

        let (mut shell, mut completions) = Shell::new(client);
        shell.dispatch(Event::FetchImage);
        settle(&mut shell, &mut completions).await;

        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(&shell.view(), dir.path()).await.unwrap();

        assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), JPEG);
    }

    #[tokio::test]
    async fn snapshot_without_frame_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_snapshot(&Model::default(), dir.path()).await;

        assert!(result.unwrap_err().to_string().contains("no camera frame"));
    }

    #[test]
    fn status_line_shows_header_and_toggles() {
        let model = Model {
            connectivity: Connectivity::Connected,
            spray_active: true,
            is_sending: true,
            is_fetching_image: true,
            ..Default::default()
        };

        let line = status_line(&model);
        assert!(line.starts_with("[Connected]"));
        assert!(line.contains("Stop Spray"));
        assert!(line.contains("Start Seeding"));
        assert!(line.contains("Start Weeding"));
        assert!(line.contains("Loading Camera..."));
        assert!(line.ends_with("sending..."));
    }
}
