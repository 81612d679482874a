//! Gateway and cache lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the gateway and the
//! paginated cache over real HTTP using ureq. Validates that request
//! building, pagination headers and response parsing work end-to-end with
//! the actual server.

use todo_core::{
    ApiError, FetchStatus, Gateway, HttpMethod, HttpRequest, HttpResponse, Operation, PaginatedCache, Resolution,
    TodoClient, Transport, TransportError,
};

/// Executes `HttpRequest`s with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (req.method, req.body) {
            (HttpMethod::Get, _) => self.agent.get(&req.path).call(),
            (HttpMethod::Delete, _) => self.agent.delete(&req.path).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&req.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(&req.path).send_empty(),
            (HttpMethod::Patch, Some(body)) => self
                .agent
                .patch(&req.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Patch, None) => self.agent.patch(&req.path).send_empty(),
        };
        let mut response = result.map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpResponse { status, headers, body })
    }
}

/// Start the mock server on a random port with `seed` todos and return its
/// base URL.
fn spawn_server(seed: u64) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, mock_server::seed_todos(seed)).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn gateway(base_url: &str) -> Gateway<UreqTransport> {
    Gateway::new(TodoClient::new(base_url), UreqTransport::new())
}

/// Run the ticket through the gateway and resolve it.
fn drive(cache: &mut PaginatedCache, gateway: &Gateway<UreqTransport>, fetch: todo_core::PageFetch) -> Resolution {
    let result = gateway.list_page(fetch.page_param());
    cache.resolve(fetch, result)
}

#[test]
fn infinite_scroll_over_twenty_five_todos() {
    let gateway = gateway(&spawn_server(25));
    let mut cache = PaginatedCache::default();

    let fetch = cache.initial_load().unwrap();
    assert_eq!(drive(&mut cache, &gateway, fetch), Resolution::Applied);
    assert!(cache.has_next_page());
    assert_eq!(cache.item_count(), 10);

    let fetch = cache.fetch_next_page().unwrap();
    assert!(cache.fetch_next_page().is_none(), "second request while pending");
    drive(&mut cache, &gateway, fetch);
    assert!(cache.has_next_page());
    assert_eq!(cache.item_count(), 20);

    let fetch = cache.fetch_next_page().unwrap();
    drive(&mut cache, &gateway, fetch);
    assert!(!cache.has_next_page());
    assert_eq!(cache.item_count(), 25);
    assert!(cache.fetch_next_page().is_none());

    let ids: Vec<u64> = cache.items().map(|t| t.id).collect();
    assert_eq!(ids, (1..=25).collect::<Vec<_>>());
}

#[test]
fn create_then_invalidate_shows_new_todo() {
    let gateway = gateway(&spawn_server(3));
    let mut cache = PaginatedCache::default();
    let fetch = cache.initial_load().unwrap();
    drive(&mut cache, &gateway, fetch);
    assert_eq!(cache.item_count(), 3);

    let created = gateway.create("Buy milk", 1).unwrap();
    assert!(!created.completed);

    let fetch = cache.invalidate();
    drive(&mut cache, &gateway, fetch);
    let found = cache.find(created.id).expect("created todo on page 1");
    assert_eq!(found.title, "Buy milk");
    assert!(!found.completed);
    assert_eq!(cache.item_count(), 4);
}

#[test]
fn toggle_then_invalidate_flips_completed() {
    let gateway = gateway(&spawn_server(5));
    let mut cache = PaginatedCache::default();
    let fetch = cache.initial_load().unwrap();
    drive(&mut cache, &gateway, fetch);

    let target = cache.find(2).unwrap().clone();
    assert!(!target.completed);
    let updated = gateway.toggle(&target).unwrap();
    assert!(updated.completed);

    let fetch = cache.invalidate();
    drive(&mut cache, &gateway, fetch);
    assert!(cache.find(2).unwrap().completed);
}

#[test]
fn delete_then_invalidate_removes_todo() {
    let gateway = gateway(&spawn_server(5));
    let mut cache = PaginatedCache::default();
    let fetch = cache.initial_load().unwrap();
    drive(&mut cache, &gateway, fetch);

    gateway.remove(4).unwrap();
    let fetch = cache.invalidate();
    drive(&mut cache, &gateway, fetch);
    assert!(cache.find(4).is_none());
    assert_eq!(cache.item_count(), 4);

    let err = gateway.remove(4).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Fetch {
            operation: Operation::DeleteTodo,
            status: Some(404),
            ..
        }
    ));
}

#[test]
fn failed_first_page_surfaces_error() {
    // Wrong base path: every list request is a 404.
    let base = spawn_server(25);
    let gateway = gateway(&format!("{base}/missing"));
    let mut cache = PaginatedCache::default();

    let fetch = cache.initial_load().unwrap();
    assert_eq!(drive(&mut cache, &gateway, fetch), Resolution::Failed);
    assert_eq!(cache.status(), FetchStatus::Error);
    assert_eq!(cache.item_count(), 0);
    assert_eq!(cache.error().unwrap().to_string(), "Failed to fetch todos");
}

#[test]
fn unreachable_server_is_a_fetch_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let gateway = gateway(&format!("http://{addr}"));

    let err = gateway.create("Nope", 1).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Fetch {
            operation: Operation::CreateTodo,
            status: None,
            ..
        }
    ));
}
