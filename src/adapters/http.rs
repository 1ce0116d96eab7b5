//! Provisioning HTTP server adapter (ESP-IDF only).
//!
//! Bridges the ESP-IDF HTTP server onto the event bus: each handler posts
//! an owned [`WebRequest`] and blocks its server thread on the reply
//! channel until the provisioning loop has produced a [`WebReply`]. Route
//! logic lives in `provision::http`, not here.

use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use esp_idf_svc::http::Method;
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use esp_idf_svc::io::{Read, Write};
use log::{info, warn};

use crate::events::{EventBus, EventCode, Payload};
use crate::provision::{WebReply, WebRequest};

/// How long a server thread waits for the main loop to answer.
const REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest accepted request body (a config script with certificates).
const MAX_BODY: usize = 16 * 1024;

/// The running server; requests stop when this is dropped.
pub struct ProvisioningServer {
    _server: EspHttpServer<'static>,
}

/// Stand the server up on port 80.
pub fn start(bus: Arc<EventBus>) -> Result<ProvisioningServer, crate::error::Error> {
    let mut server = EspHttpServer::new(&Configuration { http_port: 80, ..Configuration::default() })
        .map_err(|_| crate::error::Error::Init("http server"))?;

    for (path, method) in [
        ("/", Method::Get),
        ("/", Method::Post),
        ("/show", Method::Get),
        ("/config", Method::Post),
    ] {
        let bus = Arc::clone(&bus);
        server
            .fn_handler::<anyhow::Error, _>(path, method, move |mut request| {
                let method_name = match method {
                    Method::Post => "POST",
                    _ => "GET",
                };
                // Reconstruct the request line the router matches on.
                let request_line = format!("{method_name} {} HTTP/1.1", request.uri());

                let mut body = Vec::new();
                let mut chunk = [0u8; 512];
                loop {
                    let n = request.read(&mut chunk)?;
                    if n == 0 {
                        break;
                    }
                    if body.len() + n > MAX_BODY {
                        request.into_status_response(413)?;
                        return Ok(());
                    }
                    body.extend_from_slice(&chunk[..n]);
                }

                let (tx, rx) = mpsc::channel();
                bus.post_owned(
                    EventCode::WebRequest,
                    Payload::Web(Box::new(WebRequest {
                        request_line,
                        body: String::from_utf8_lossy(&body).into_owned(),
                        reply_to: tx,
                    })),
                );

                let reply: WebReply = match rx.recv_timeout(REPLY_TIMEOUT) {
                    Ok(reply) => reply,
                    Err(_) => {
                        warn!("http: main loop did not answer in time");
                        request.into_status_response(503)?;
                        return Ok(());
                    }
                };

                let status: u16 = reply
                    .status
                    .split_whitespace()
                    .next()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(500);
                let headers: Vec<(&str, &str)> = match reply.content_type {
                    Some(ct) => vec![("Content-Type", ct)],
                    None => Vec::new(),
                };
                let mut response = request.into_response(status, None, &headers)?;
                response.write_all(reply.body.as_bytes())?;
                Ok(())
            })
            .map_err(|_| crate::error::Error::Init("http route"))?;
    }

    info!("http: provisioning server on port 80");
    Ok(ProvisioningServer { _server: server })
}
