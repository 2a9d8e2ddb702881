use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::bridge::{Bridge, Outcome, Trigger};
use crate::config::BridgeConfig;
use crate::dom::{self, Dom, MemoryDom, RESULT_OUTPUT};
use crate::output::{GENERIC_ERROR, LOADING_HTML};

#[derive(Clone, Debug)]
struct Recorded {
    method: Method,
    path: String,
    query: Option<String>,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone, Debug)]
struct Canned {
    status: StatusCode,
    body: String,
    delay: Duration,
}

/// Inventory API stand-in: answers canned bodies by path and records every
/// request it sees.
#[derive(Clone, Default)]
struct MockBackend {
    requests: Arc<Mutex<Vec<Recorded>>>,
    routes: Arc<Mutex<HashMap<String, Canned>>>,
}

impl MockBackend {
    fn respond(&self, path: &str, status: u16, body: &str) {
        self.respond_after(path, status, body, Duration::ZERO);
    }

    fn respond_after(&self, path: &str, status: u16, body: &str, delay: Duration) {
        self.routes.lock().unwrap().insert(
            path.to_string(),
            Canned {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.to_string(),
                delay,
            },
        );
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    backend.requests.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    let canned = backend
        .routes
        .lock()
        .unwrap()
        .get(uri.path())
        .cloned()
        .unwrap_or(Canned {
            status: StatusCode::OK,
            body: "[]".to_string(),
            delay: Duration::ZERO,
        });
    if !canned.delay.is_zero() {
        tokio::time::sleep(canned.delay).await;
    }
    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
        .into_response()
}

async fn spawn(backend: &MockBackend) -> BridgeConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test port");
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(record).with_state(backend.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    BridgeConfig::with_base_url(format!("http://{addr}/api/products"))
}

async fn bridge_for(backend: &MockBackend, page: MemoryDom) -> Bridge<MemoryDom> {
    let config = spawn(backend).await;
    Bridge::new(page, &config).unwrap()
}

/// Page whose writes of a marked result block for a while, widening the
/// window between the staleness check and the write.
#[derive(Default)]
struct SlowWriteDom {
    inner: MemoryDom,
    marker: &'static str,
    delay: Duration,
}

impl Dom for SlowWriteDom {
    fn value(&self, id: &str) -> Option<String> {
        self.inner.value(id)
    }

    fn set_html(&self, id: &str, html: &str) {
        if html.contains(self.marker) {
            std::thread::sleep(self.delay);
        }
        self.inner.set_html(id, html);
    }
}

fn output(bridge: &Bridge<MemoryDom>) -> String {
    bridge.dom().html(RESULT_OUTPUT).unwrap_or_default()
}

#[tokio::test]
async fn view_all_issues_plain_get_and_renders_array() {
    let backend = MockBackend::default();
    backend.respond(
        "/api/products",
        200,
        r#"[{"name":"Widget","category":"Tools","stock":10}]"#,
    );
    let bridge = bridge_for(&backend, MemoryDom::new()).await;

    assert_eq!(bridge.dispatch(Trigger::ViewAll).await, Outcome::Rendered);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].path, "/api/products");
    assert_eq!(requests[0].query, None);

    let html = output(&bridge);
    assert!(html.starts_with("<pre>["));
    assert!(html.ends_with("]</pre>"));
    assert!(html.contains(r#"<span class="text-primary">"name": "Widget"</span>"#));
    assert!(html.contains(r#"<span class="text-primary">"category": "Tools"</span>"#));
    assert!(html.contains(r#""stock": 10"#));
}

#[tokio::test]
async fn loading_marker_precedes_the_result() {
    let backend = MockBackend::default();
    let bridge = bridge_for(&backend, MemoryDom::new()).await;

    bridge.view_all().await;

    assert_eq!(
        bridge.dom().history(RESULT_OUTPUT),
        vec![LOADING_HTML.to_string(), "<pre>[]</pre>".to_string()]
    );
}

#[tokio::test]
async fn trigger_resolves_from_element_id() {
    let backend = MockBackend::default();
    let bridge = bridge_for(&backend, MemoryDom::new()).await;

    let trigger = Trigger::from_element_id("viewAllProductsBtn").unwrap();
    assert_eq!(bridge.dispatch(trigger).await, Outcome::Rendered);
    assert_eq!(backend.requests()[0].path, "/api/products");
}

#[tokio::test]
async fn category_becomes_a_path_segment() {
    let backend = MockBackend::default();
    let bridge = bridge_for(&backend, MemoryDom::new().with_value(dom::CATEGORY, "Electronics")).await;

    assert_eq!(bridge.dispatch(Trigger::Category).await, Outcome::Rendered);

    let requests = backend.requests();
    assert_eq!(requests[0].path, "/api/products/category/Electronics");
    assert_eq!(requests[0].query, None);
}

#[tokio::test]
async fn category_is_trimmed_and_encoded() {
    let backend = MockBackend::default();
    let bridge = bridge_for(&backend, MemoryDom::new().with_value(dom::CATEGORY, "  Home Garden ")).await;

    bridge.dispatch(Trigger::Category).await;

    assert_eq!(
        backend.requests()[0].path,
        "/api/products/category/Home%20Garden"
    );
}

#[tokio::test]
async fn search_sends_trimmed_keyword_as_query() {
    let backend = MockBackend::default();
    let bridge = bridge_for(&backend, MemoryDom::new().with_value(dom::KEYWORD, " lap top ")).await;

    assert_eq!(bridge.dispatch(Trigger::Search).await, Outcome::Rendered);

    let requests = backend.requests();
    assert_eq!(requests[0].path, "/api/products/search");
    assert_eq!(requests[0].query.as_deref(), Some("keyword=lap+top"));
}

#[tokio::test]
async fn blank_keyword_issues_no_request() {
    let backend = MockBackend::default();
    let bridge = bridge_for(&backend, MemoryDom::new().with_value(dom::KEYWORD, "   ")).await;

    assert_eq!(bridge.dispatch(Trigger::Search).await, Outcome::Skipped);
    assert_eq!(bridge.dispatch(Trigger::Category).await, Outcome::Skipped);

    assert!(backend.requests().is_empty());
    assert_eq!(bridge.dom().html(RESULT_OUTPUT), None);
}

#[tokio::test]
async fn non_numeric_stock_issues_no_request() {
    let backend = MockBackend::default();
    let page = MemoryDom::new().with_value(dom::STOCK, "ten");
    let bridge = bridge_for(&backend, page).await;

    assert_eq!(bridge.dispatch(Trigger::Stock).await, Outcome::Skipped);
    assert!(backend.requests().is_empty());

    bridge.dom().set_value(dom::STOCK, " 5 ");
    assert_eq!(bridge.dispatch(Trigger::Stock).await, Outcome::Rendered);
    assert_eq!(backend.requests()[0].path, "/api/products/stock/5");
}

#[tokio::test]
async fn price_range_requires_two_numbers() {
    let backend = MockBackend::default();
    let bridge = bridge_for(&backend, MemoryDom::new()).await;

    for (min, max) in [("abc", "20"), ("10", "NaN"), ("", "5"), ("10", "")] {
        bridge.dom().set_value(dom::MIN_PRICE, min);
        bridge.dom().set_value(dom::MAX_PRICE, max);
        assert_eq!(bridge.dispatch(Trigger::PriceRange).await, Outcome::Skipped);
    }
    assert!(backend.requests().is_empty());

    bridge.dom().set_value(dom::MIN_PRICE, "10");
    bridge.dom().set_value(dom::MAX_PRICE, "20.5");
    assert_eq!(bridge.dispatch(Trigger::PriceRange).await, Outcome::Rendered);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/products/price");
    assert_eq!(requests[0].query.as_deref(), Some("minPrice=10&maxPrice=20.5"));
}

#[tokio::test]
async fn add_product_posts_json_body() {
    let backend = MockBackend::default();
    backend.respond(
        "/api/products",
        201,
        r#"{"id":1,"name":"Widget","category":"Tools","quantity":5,"stock":10,"price":9.99}"#,
    );
    let page = MemoryDom::new()
        .with_value(dom::PRODUCT_NAME, "Widget")
        .with_value(dom::PRODUCT_CATEGORY, "Tools")
        .with_value(dom::PRODUCT_QUANTITY, "5")
        .with_value(dom::PRODUCT_STOCK, "10")
        .with_value(dom::PRODUCT_PRICE, "9.99");
    let bridge = bridge_for(&backend, page).await;

    assert_eq!(bridge.dispatch(Trigger::AddProduct).await, Outcome::Rendered);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, "/api/products");
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(
        requests[0].body,
        r#"{"name":"Widget","category":"Tools","quantity":5,"stock":10,"price":9.99}"#
    );
    assert!(output(&bridge).contains(r#""id": 1"#));
}

#[tokio::test]
async fn add_product_with_bad_quantity_issues_no_request() {
    let backend = MockBackend::default();
    let page = MemoryDom::new()
        .with_value(dom::PRODUCT_NAME, "Widget")
        .with_value(dom::PRODUCT_CATEGORY, "Tools")
        .with_value(dom::PRODUCT_QUANTITY, "five")
        .with_value(dom::PRODUCT_STOCK, "10")
        .with_value(dom::PRODUCT_PRICE, "9.99");
    let bridge = bridge_for(&backend, page).await;

    assert_eq!(bridge.dispatch(Trigger::AddProduct).await, Outcome::Skipped);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn lookup_update_and_delete_use_id_paths() {
    let backend = MockBackend::default();
    backend.respond("/api/products/name/Widget", 200, r#"{"id":7,"name":"Widget"}"#);
    backend.respond("/api/products/7", 200, r#"{"id":7,"name":"Gadget"}"#);
    backend.respond("/api/products/8", 204, "");
    let page = MemoryDom::new()
        .with_value(dom::LOOKUP_NAME, "Widget")
        .with_value(dom::UPDATE_ID, "7")
        .with_value(dom::UPDATE_NAME, "Gadget")
        .with_value(dom::UPDATE_CATEGORY, "Tools")
        .with_value(dom::UPDATE_QUANTITY, "1")
        .with_value(dom::UPDATE_STOCK, "2")
        .with_value(dom::UPDATE_PRICE, "3.5")
        .with_value(dom::DELETE_ID, "8");
    let bridge = bridge_for(&backend, page).await;

    assert_eq!(bridge.dispatch(Trigger::ByName).await, Outcome::Rendered);
    assert_eq!(bridge.dispatch(Trigger::UpdateProduct).await, Outcome::Rendered);
    assert!(output(&bridge).contains(r#""name": "Gadget""#));
    assert_eq!(bridge.dispatch(Trigger::DeleteProduct).await, Outcome::Rendered);
    assert_eq!(output(&bridge), "<pre>null</pre>");

    let requests = backend.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        (requests[0].method.clone(), requests[0].path.as_str()),
        (Method::GET, "/api/products/name/Widget")
    );
    assert_eq!(
        (requests[1].method.clone(), requests[1].path.as_str()),
        (Method::PUT, "/api/products/7")
    );
    assert_eq!(
        requests[1].body,
        r#"{"name":"Gadget","category":"Tools","quantity":1,"stock":2,"price":3.5}"#
    );
    assert_eq!(
        (requests[2].method.clone(), requests[2].path.as_str()),
        (Method::DELETE, "/api/products/8")
    );
}

#[tokio::test]
async fn non_numeric_id_issues_no_request() {
    let backend = MockBackend::default();
    let bridge = bridge_for(&backend, MemoryDom::new().with_value(dom::DELETE_ID, "seven")).await;

    assert_eq!(bridge.dispatch(Trigger::DeleteProduct).await, Outcome::Skipped);
    assert_eq!(bridge.dispatch(Trigger::UpdateProduct).await, Outcome::Skipped);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn http_failure_shows_status_and_backend_message() {
    let backend = MockBackend::default();
    backend.respond(
        "/api/products/name/Nothing",
        404,
        r#"{"status":404,"error":"Not Found","message":"Product not found","path":"/api/products/name/Nothing"}"#,
    );
    let bridge = bridge_for(&backend, MemoryDom::new().with_value(dom::LOOKUP_NAME, "Nothing")).await;

    assert_eq!(bridge.dispatch(Trigger::ByName).await, Outcome::Failed);

    let html = output(&bridge);
    assert_eq!(
        html,
        r#"<div class="alert alert-danger">404 - Product not found</div>"#
    );
    assert!(!html.contains("<pre>"));
}

#[tokio::test]
async fn http_failure_without_body_uses_reason_phrase() {
    let backend = MockBackend::default();
    backend.respond("/api/products", 500, "");
    let bridge = bridge_for(&backend, MemoryDom::new()).await;

    assert_eq!(bridge.dispatch(Trigger::ViewAll).await, Outcome::Failed);
    assert_eq!(
        output(&bridge),
        r#"<div class="alert alert-danger">500 - Internal Server Error</div>"#
    );
}

#[tokio::test]
async fn invalid_json_is_an_unexpected_error() {
    let backend = MockBackend::default();
    backend.respond("/api/products", 200, "Welcome to the Inventory Management System");
    let bridge = bridge_for(&backend, MemoryDom::new()).await;

    assert_eq!(bridge.dispatch(Trigger::ViewAll).await, Outcome::Failed);
    assert_eq!(
        output(&bridge),
        format!(r#"<div class="alert alert-danger">{GENERIC_ERROR}</div>"#)
    );
}

#[tokio::test]
async fn unreachable_backend_is_an_unexpected_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = BridgeConfig::with_base_url(format!("http://{addr}/api/products"));
    let bridge = Bridge::new(MemoryDom::new(), &config).unwrap();

    assert_eq!(bridge.dispatch(Trigger::ViewAll).await, Outcome::Failed);
    assert!(output(&bridge).contains(GENERIC_ERROR));
}

#[tokio::test]
async fn slow_earlier_response_is_dropped() {
    let backend = MockBackend::default();
    backend.respond_after(
        "/api/products/category/Slow",
        200,
        r#"["slow"]"#,
        Duration::from_millis(300),
    );
    backend.respond("/api/products/category/Fast", 200, r#"["fast"]"#);
    let bridge = bridge_for(&backend, MemoryDom::new()).await;

    let (slow, fast) = tokio::join!(bridge.get(&["category", "Slow"], &[]), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        bridge.get(&["category", "Fast"], &[]).await
    });

    assert_eq!(slow, Outcome::Superseded);
    assert_eq!(fast, Outcome::Rendered);
    let html = output(&bridge);
    assert!(html.contains("fast"));
    assert!(!html.contains("slow"));
}

#[tokio::test]
async fn later_request_wins_even_when_it_finishes_last() {
    let backend = MockBackend::default();
    backend.respond_after(
        "/api/products/category/First",
        200,
        r#"["first"]"#,
        Duration::from_millis(100),
    );
    backend.respond_after(
        "/api/products/category/Second",
        200,
        r#"["second"]"#,
        Duration::from_millis(300),
    );
    let bridge = bridge_for(&backend, MemoryDom::new()).await;

    let (first, second) = tokio::join!(bridge.get(&["category", "First"], &[]), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        bridge.get(&["category", "Second"], &[]).await
    });

    assert_eq!(first, Outcome::Superseded);
    assert_eq!(second, Outcome::Rendered);
    assert!(bridge
        .dom()
        .history(RESULT_OUTPUT)
        .iter()
        .all(|html| !html.contains("first")));
    assert!(output(&bridge).contains("second"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slow_write_of_older_result_cannot_cover_newer_one() {
    let backend = MockBackend::default();
    backend.respond("/api/products/category/Old", 200, r#"["stale"]"#);
    backend.respond("/api/products/category/New", 200, r#"["fresh"]"#);
    let config = spawn(&backend).await;
    let page = SlowWriteDom {
        marker: "stale",
        delay: Duration::from_millis(400),
        ..SlowWriteDom::default()
    };
    let bridge = Arc::new(Bridge::new(page, &config).unwrap());

    let older = tokio::spawn({
        let bridge = bridge.clone();
        async move { bridge.get(&["category", "Old"], &[]).await }
    });
    let newer = tokio::spawn({
        let bridge = bridge.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            bridge.get(&["category", "New"], &[]).await
        }
    });
    let older = older.await.unwrap();
    let newer = newer.await.unwrap();

    assert_eq!(newer, Outcome::Rendered);
    assert_ne!(older, Outcome::Failed);
    let history = bridge.dom().inner.history(RESULT_OUTPUT);
    let last = history.last().cloned().unwrap_or_default();
    assert!(last.contains("fresh"), "final output was {last}");
    assert!(
        history.iter().skip_while(|h| !h.contains("fresh")).all(|h| !h.contains("stale")),
        "stale result written after the fresh one: {history:?}"
    );
}

#[tokio::test]
async fn dot_segments_issue_no_request() {
    let backend = MockBackend::default();
    let page = MemoryDom::new()
        .with_value(dom::CATEGORY, " .. ")
        .with_value(dom::LOOKUP_NAME, ".");
    let bridge = bridge_for(&backend, page).await;

    assert_eq!(bridge.dispatch(Trigger::Category).await, Outcome::Skipped);
    assert_eq!(bridge.dispatch(Trigger::ByName).await, Outcome::Skipped);
    assert!(backend.requests().is_empty());
    assert_eq!(bridge.dom().html(RESULT_OUTPUT), None);
}
