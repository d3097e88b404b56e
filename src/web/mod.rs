//! HTTP status page and JSON control endpoints
//!
//! [`WebApi::handle`] maps method, path and body to a [`Response`] without
//! touching the network. The `server` module binds it to the ESP-IDF HTTP
//! server.

use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::input::{CommandSender, InputCommand};
use crate::pomodoro::{ConfigError, PomodoroConfig};
use crate::status::{DeskState, StatusSnapshot};

#[cfg(target_os = "espidf")]
pub mod server;

/// Largest request body accepted
pub const MAX_BODY_LEN: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Every path the server registers
pub const ROUTES: &[(&str, Method)] = &[
    ("/", Method::Get),
    ("/api/status", Method::Get),
    ("/api/start_stop", Method::Post),
    ("/api/reset", Method::Post),
    ("/api/durations", Method::Post),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body,
        }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status,
                content_type: "application/json",
                body,
            },
            Err(e) => Self::error(500, &format!("serialization failed: {}", e)),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }
}

/// Body of `POST /api/durations`, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DurationsRequest {
    pub work: u16,
    pub short_break: u16,
    pub long_break: u16,
}

pub struct WebApi {
    state: Arc<DeskState>,
    commands: CommandSender,
}

impl WebApi {
    pub fn new(state: Arc<DeskState>, commands: CommandSender) -> Self {
        Self { state, commands }
    }

    pub fn handle(&self, method: Method, path: &str, body: &[u8]) -> Response {
        let path = path.split('?').next().unwrap_or(path);
        match (method, path) {
            (Method::Get, "/") => Response::html(render_index(&self.state.snapshot())),
            (Method::Get, "/api/status") => Response::json(200, &self.state.snapshot()),
            (Method::Post, "/api/start_stop") => self.command(InputCommand::StartStop),
            (Method::Post, "/api/reset") => self.command(InputCommand::Reset),
            (Method::Post, "/api/durations") => self.durations(body),
            (_, path) if ROUTES.iter().any(|(p, _)| *p == path) => {
                Response::error(405, "method not allowed")
            }
            _ => Response::error(404, "not found"),
        }
    }

    fn command(&self, command: InputCommand) -> Response {
        if !self.commands.send(command) {
            return Response::error(503, "input arbiter stopped");
        }
        Response::json(200, &self.state.snapshot())
    }

    fn durations(&self, body: &[u8]) -> Response {
        if body.len() > MAX_BODY_LEN {
            return Response::error(413, "body too large");
        }
        let request: DurationsRequest = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected durations body: {}", e);
                return Response::error(400, &format!("invalid JSON: {}", e));
            }
        };

        let result = self.state.with_engine(|engine| -> Result<(), ConfigError> {
            let every = engine.config().sessions_before_long_break();
            let config = PomodoroConfig::new(request.work, request.short_break, request.long_break)?
                .with_long_break_every(every)?;
            engine.set_config(config);
            Ok(())
        });
        match result {
            Ok(()) => {
                info!("Durations updated from web: {:?}", request);
                Response::json(200, &self.state.snapshot())
            }
            Err(e) => Response::error(400, &e.to_string()),
        }
    }
}

/// Status page, refreshed by the browser once a second
pub fn render_index(status: &StatusSnapshot) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="1">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>pomodesk</title>
<style>body{{font-family:sans-serif;text-align:center}} .big{{font-size:3em}}</style>
</head>
<body>
<div class="big">{time}</div>
<div>{date}</div>
<h2>{state} {timer}</h2>
<p>{running} &middot; {count} sessions</p>
<button onclick="fetch('/api/start_stop',{{method:'POST'}})">Start/Stop</button>
<button onclick="fetch('/api/reset',{{method:'POST'}})">Reset</button>
</body>
</html>
"#,
        time = status.time,
        date = status.date,
        state = status.state_label,
        timer = status.timer_remaining,
        running = if status.running { "Running" } else { "Stopped" },
        count = status.completed_count,
    )
}
