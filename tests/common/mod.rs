#![allow(dead_code)]

// ---------------------------------------------------------------------------
// Shared fixtures: a sink that records every update, and an in-process backend.
// ---------------------------------------------------------------------------

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use spread_dashboard::models::{DashboardConfig, QuoteSlot};
use spread_dashboard::services::normalizer::{FiveDayChart, IntradayChart, StockTrendChart};
use spread_dashboard::services::panels::{IndexPanelView, QuotePanelView, StatsPanel};
use spread_dashboard::services::sink::{ChartSink, PanelSink};

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Quote(QuoteSlot, QuotePanelView),
    Index(String, Option<IndexPanelView>),
    StockChart(QuoteSlot, StockTrendChart),
    Intraday(IntradayChart),
    FiveDay(FiveDayChart),
    IntradayStats(StatsPanel),
    FiveDayStats(StatsPanel),
    ConfigForm(DashboardConfig),
    Clock(String),
    Notice(String),
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn quote_panels(&self) -> Vec<(QuoteSlot, QuotePanelView)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Quote(slot, view) => Some((slot, view)),
                _ => None,
            })
            .collect()
    }

    pub fn count_where(&self, pred: impl Fn(&SinkEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().push(event);
    }
}

impl ChartSink for RecordingSink {
    fn update_stock_chart(&self, slot: QuoteSlot, chart: StockTrendChart) {
        self.push(SinkEvent::StockChart(slot, chart));
    }

    fn update_intraday_chart(&self, chart: IntradayChart) {
        self.push(SinkEvent::Intraday(chart));
    }

    fn update_five_day_chart(&self, chart: FiveDayChart) {
        self.push(SinkEvent::FiveDay(chart));
    }
}

impl PanelSink for RecordingSink {
    fn update_quote_panel(&self, slot: QuoteSlot, view: QuotePanelView) {
        self.push(SinkEvent::Quote(slot, view));
    }

    fn update_index_panel(&self, code: &str, view: Option<IndexPanelView>) {
        self.push(SinkEvent::Index(code.to_string(), view));
    }

    fn update_intraday_stats(&self, panel: StatsPanel) {
        self.push(SinkEvent::IntradayStats(panel));
    }

    fn update_five_day_stats(&self, panel: StatsPanel) {
        self.push(SinkEvent::FiveDayStats(panel));
    }

    fn update_config_form(&self, config: &DashboardConfig) {
        self.push(SinkEvent::ConfigForm(config.clone()));
    }

    fn update_clock(&self, now: &str) {
        self.push(SinkEvent::Clock(now.to_string()));
    }

    fn notify(&self, message: &str) {
        self.push(SinkEvent::Notice(message.to_string()));
    }
}

/// Polls `check` every 10ms for up to 2s.
pub async fn wait_until(check: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

// ---------------------------------------------------------------------------
// Payload fixtures
// ---------------------------------------------------------------------------

pub fn sample_payload(stock1: &str, stock2: &str) -> Value {
    json!({
        "stock1": {"code": stock1, "name": "浦发银行", "price": 8.12, "changePercent": 0.0123},
        "stock2": {"code": stock2, "name": "平安银行", "price": 11.5, "changePercent": -0.004},
        "index1": {"name": "上证指数", "price": 3050.12, "changePercent": 0.0042},
        "index2": {"name": "深证成指", "price": 9800.0, "changePercent": -0.0031},
        "index3": {"name": "创业板指", "price": 1900.5, "changePercent": 0.0},
        "index4": {"name": "科创50", "price": 850.2, "changePercent": 0.011},
        "index5": {"name": "上证50", "price": 2400.0, "changePercent": 0.001},
        "index6": {"name": "沪深300", "price": 3500.0, "changePercent": 0.002},
        "index7": {"name": "中证500", "price": 5400.0, "changePercent": -0.002},
        "index8": {"name": "中证1000", "price": 5800.0, "changePercent": -0.005},
        "stock1ChartData": {
            "times": ["09:30", "09:31", "09:32"],
            "prices": [8.0, 8.1, 8.12],
            "change_percent": [0.0, 0.0111, 0.0123]
        },
        "stock2ChartData": {
            "times": ["09:30", "09:31", "09:32"],
            "prices": [100.0, 110.0, 90.0]
        },
        "intraday": {
            "data": [
                {"time": "09:25", "value": 0.001},
                {"time": "09:30", "value": 0.002},
                {"time": "11:30", "value": 0.004},
                {"time": "13:01", "value": -0.001}
            ],
            "stats": {
                "current": -0.001, "max": 0.004, "min": -0.001,
                "current_time": "13:01", "max_time": "11:30", "min_time": "13:01"
            }
        },
        "fiveDay": {
            "data": [
                {"datetime": "2024-01-01 09:30", "value": 0.001},
                {"datetime": "2024-01-01 15:00", "value": 0.002},
                {"datetime": "2024-01-02 09:30", "value": 0.003}
            ],
            "stats": {
                "current": "0.003", "max": 0.003, "min": 0.001,
                "current_date": "2024-01-02", "max_date": "2024-01-02", "min_date": "2024-01-01"
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Mock backend
// ---------------------------------------------------------------------------

pub const TEST_USER: &str = "admin";
pub const TEST_PASSWORD: &str = "password";
pub const TEST_TOKEN: &str = "token-123";

#[derive(Default)]
pub struct MockBackendState {
    pub config: Mutex<(String, String)>,
    pub data_requests: AtomicUsize,
    pub update_requests: AtomicUsize,
    /// When set every authenticated route answers 401.
    pub expire_sessions: AtomicBool,
    /// Number of upcoming `/api/config` calls answered with a plain-text 503.
    pub config_outages: AtomicUsize,
    pub login_requests: AtomicUsize,
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockBackendState>,
}

fn authorized(headers: &HeaderMap, state: &MockBackendState) -> bool {
    let expected = format!("Bearer {}", TEST_TOKEN);
    !state.expire_sessions.load(Ordering::SeqCst)
        && headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"})))
}

async fn login(
    State(state): State<Arc<MockBackendState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.login_requests.fetch_add(1, Ordering::SeqCst);
    if body["username"] == TEST_USER && body["password"] == TEST_PASSWORD {
        (StatusCode::OK, Json(json!({"token": TEST_TOKEN})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid credentials"})))
    }
}

async fn get_config(
    State(state): State<Arc<MockBackendState>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers, &state) {
        return unauthorized().into_response();
    }
    let outage = state
        .config_outages
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if outage {
        return (StatusCode::SERVICE_UNAVAILABLE, "backend restarting").into_response();
    }
    let (stock1, stock2) = state.config.lock().clone();
    (StatusCode::OK, Json(json!({"stock1": stock1, "stock2": stock2}))).into_response()
}

async fn update_stocks(
    State(state): State<Arc<MockBackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers, &state) {
        return unauthorized();
    }
    state.update_requests.fetch_add(1, Ordering::SeqCst);
    let stock1 = body["stock1"].as_str().unwrap_or_default().to_string();
    let stock2 = body["stock2"].as_str().unwrap_or_default().to_string();
    if stock1.is_empty() || stock2.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "股票代码不能为空"})));
    }
    *state.config.lock() = (stock1, stock2);
    (StatusCode::OK, Json(json!({"status": "success"})))
}

async fn get_data(
    State(state): State<Arc<MockBackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers, &state) {
        return unauthorized();
    }
    state.data_requests.fetch_add(1, Ordering::SeqCst);
    let (stock1, stock2) = state.config.lock().clone();
    (StatusCode::OK, Json(sample_payload(&stock1, &stock2)))
}

pub async fn spawn_backend(stock1: &str, stock2: &str) -> MockBackend {
    let state = Arc::new(MockBackendState {
        config: Mutex::new((stock1.to_string(), stock2.to_string())),
        ..MockBackendState::default()
    });

    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/api/config", get(get_config))
        .route("/api/update-stocks", post(update_stocks))
        .route("/api/get-data", get(get_data))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{}", addr),
        state,
    }
}
