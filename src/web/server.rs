//! ESP-IDF HTTP server binding for [`WebApi`]

use std::sync::Arc;

use anyhow::{Context, Result};
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use esp_idf_svc::io::{Read, Write};
use log::{info, warn};

use super::{Method, WebApi, MAX_BODY_LEN, ROUTES};

impl From<Method> for esp_idf_svc::http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => esp_idf_svc::http::Method::Get,
            Method::Post => esp_idf_svc::http::Method::Post,
        }
    }
}

/// Register every route. The server stops when the returned value is dropped.
pub fn start(api: Arc<WebApi>) -> Result<EspHttpServer<'static>> {
    let config = Configuration {
        stack_size: 8192,
        ..Default::default()
    };
    let mut server = EspHttpServer::new(&config).context("starting HTTP server")?;

    for &(uri, method) in ROUTES {
        let api = api.clone();
        server.fn_handler::<anyhow::Error, _>(uri, method.into(), move |mut req| {
            let mut body = Vec::new();
            if method == Method::Post {
                let mut buf = [0u8; 64];
                loop {
                    let n = req.read(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    body.extend_from_slice(&buf[..n]);
                    // One byte past the limit is enough for the handler to reject it
                    if body.len() > MAX_BODY_LEN {
                        break;
                    }
                }
            }

            let response = api.handle(method, uri, &body);
            if response.status >= 400 {
                warn!("{:?} {} -> {}", method, uri, response.status);
            }
            let mut resp = req.into_response(
                response.status,
                None,
                &[("Content-Type", response.content_type)],
            )?;
            resp.write_all(response.body.as_bytes())?;
            Ok(())
        })?;
    }

    info!("HTTP server listening on port {}", config.http_port);
    Ok(server)
}
