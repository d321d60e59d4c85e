// In-process stand-in for the chat backend, served on an ephemeral port.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub raw_query: Option<String>,
    pub session_param: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
struct Backend {
    log: Arc<Mutex<Vec<Recorded>>>,
    sessions: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    next_id: Arc<AtomicUsize>,
    fixed: Option<(StatusCode, String)>,
}

pub struct FakeBackend {
    pub base_url: String,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeBackend {
    /// A backend that assigns sessions and stores history like the real one.
    pub async fn start() -> Self {
        Self::serve(Backend::default()).await
    }

    /// A backend that answers every request with the same status and body.
    pub async fn fixed(status: StatusCode, body: &str) -> Self {
        Self::serve(Backend {
            fixed: Some((status, body.to_string())),
            ..Backend::default()
        })
        .await
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    async fn serve(backend: Backend) -> Self {
        let log = backend.log.clone();
        let app = Router::new()
            .route("/chat/message", post(message_handler))
            .route("/chat/history", get(history_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(backend);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{addr}"), log }
    }
}

/// An address nothing listens on.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn message_handler(State(backend): State<Backend>, body: Bytes) -> Response {
    let parsed: Option<Value> = serde_json::from_slice(&body).ok();
    backend.log.lock().unwrap().push(Recorded {
        path: "/chat/message".to_string(),
        raw_query: None,
        session_param: None,
        body: parsed.clone(),
    });

    if let Some((status, body)) = &backend.fixed {
        return (*status, body.clone()).into_response();
    }

    let Some(req) = parsed else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid JSON" }))).into_response();
    };

    let text = req["message"].as_str().unwrap_or_default().trim().to_string();
    if text.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Message cannot be empty" })),
        )
            .into_response();
    }

    let session_id = match req.get("sessionId").and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => format!("session-{}", backend.next_id.fetch_add(1, Ordering::SeqCst) + 1),
    };
    let reply = if text == "hello" {
        "hi there".to_string()
    } else {
        format!("echo: {text}")
    };

    let mut sessions = backend.sessions.lock().unwrap();
    let history = sessions.entry(session_id.clone()).or_default();
    for (sender, content) in [("user", &text), ("ai", &reply)] {
        let n = history.len() as i64 + 1;
        history.push(json!({
            "id": format!("{session_id}-{n}"),
            "text": content,
            "sender": sender,
            "timestamp": 1_700_000_000_000i64 + n,
        }));
    }

    Json(json!({ "reply": reply, "sessionId": session_id })).into_response()
}

async fn history_handler(
    State(backend): State<Backend>,
    RawQuery(raw_query): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let session = params.get("sessionId").cloned();
    backend.log.lock().unwrap().push(Recorded {
        path: "/chat/history".to_string(),
        raw_query,
        session_param: session.clone(),
        body: None,
    });

    if let Some((status, body)) = &backend.fixed {
        return (*status, body.clone()).into_response();
    }

    let sessions = backend.sessions.lock().unwrap();
    match session.and_then(|id| sessions.get(&id).cloned()) {
        Some(history) => Json(Value::Array(history)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Session not found" })),
        )
            .into_response(),
    }
}
