//! Bundled HTTP server
//!
//! Runs the API handlers behind `tiny_http`, one thread per request.

use std::io;
use std::sync::Arc;
use std::thread;

use onair_app::api::{self, ApiContext, ApiRequest, ApiResponse};
use tiny_http::{Header, Request, Response, Server};
use tracing::{debug, info, warn};

/// Convert an envelope into a `tiny_http` response
fn to_http(resp: ApiResponse) -> Response<io::Cursor<Vec<u8>>> {
    let mut response = Response::from_string(resp.body).with_status_code(resp.status_code);
    for (key, value) in &resp.headers {
        match Header::from_bytes(key.as_bytes(), value.as_bytes()) {
            Ok(header) => response.add_header(header),
            Err(()) => warn!(header = %key, "Dropping invalid response header"),
        }
    }
    response
}

fn handle_request(ctx: &ApiContext, req: Request) -> io::Result<()> {
    let method = req.method().to_string();
    let (path, api_req) = ApiRequest::from_target(method.as_str(), req.url());
    let resp = api::route(ctx, &path, &api_req);
    debug!(%method, %path, status = resp.status_code, "Handled request");
    req.respond(to_http(resp))
}

/// Serve until the listener fails
pub fn run(ctx: ApiContext, listen: &str) -> Result<(), String> {
    let server = Server::http(listen).map_err(|e| format!("Cannot listen on {}: {}", listen, e))?;
    info!(%listen, "Listening");

    let ctx = Arc::new(ctx);
    for request in server.incoming_requests() {
        let ctx = ctx.clone();
        thread::spawn(move || {
            if let Err(e) = handle_request(&ctx, request) {
                warn!(error = %e, "Failed to send response");
            }
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_http_copies_status_and_headers() {
        let response = to_http(ApiResponse::error(400, "Invalid endpoint"));
        assert_eq!(response.status_code().0, 400);
        assert!(response
            .headers()
            .iter()
            .any(|h| h.field.equiv("Access-Control-Allow-Origin") && h.value.as_str() == "*"));
        assert!(response
            .headers()
            .iter()
            .any(|h| h.field.equiv("Content-Type") && h.value.as_str() == "application/json"));
    }
}
