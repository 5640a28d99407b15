//! HTTP surface of the launcher.
//!
//! `GET /weasis` and `POST /weasis` answer with a `302` to the `weasis://` URI.

use crate::constants::{LAUNCH_ROUTE, MAX_FORM_BODY_BYTES};
use crate::error::{LaunchError, LaunchResult};
use crate::launch::{LaunchOutcome, Launcher};
use crate::request::{LaunchRequest, RequestParameters};
use axum::{
    Router,
    body::{Body, to_bytes},
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::net::SocketAddr;
use std::sync::Arc;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Header carrying the original scheme behind a proxy.
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Header carrying the original host behind a proxy.
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Media type of a form body.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Host/address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Build the launcher router.
pub fn router(launcher: Launcher) -> Router {
    Router::new()
        .route(LAUNCH_ROUTE, get(launch_handler).post(launch_handler))
        .with_state(Arc::new(launcher))
}

/// Serve the launcher until the process is stopped.
pub async fn serve(launcher: Launcher, config: ServeConfig) -> LaunchResult<()> {
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Weasis launcher listening on http://{}{}", addr, LAUNCH_ROUTE);

    axum::serve(
        listener,
        router(launcher).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

/// Handle a launch request.
async fn launch_handler(State(launcher): State<Arc<Launcher>>, request: Request) -> Response {
    let result = match into_launch_request(request).await {
        Ok(request) => launcher.launch(&request).await,
        Err(e) => Err(e),
    };

    match result.and_then(outcome_response) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Redirect to weasis scheme failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Map a launch outcome to its HTTP response.
fn outcome_response(outcome: LaunchOutcome) -> LaunchResult<Response> {
    match outcome {
        LaunchOutcome::Redirect(uri) => {
            let location = HeaderValue::from_str(uri.as_str())
                .map_err(|e| LaunchError::InvalidHeader(e.to_string()))?;
            Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
        }
        LaunchOutcome::Denied => Ok(StatusCode::FORBIDDEN.into_response()),
        LaunchOutcome::NoManifest => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Extract the launch inputs from the HTTP request.
async fn into_launch_request(request: Request) -> LaunchResult<LaunchRequest> {
    let (parts, body) = request.into_parts();

    let mut params = RequestParameters::from_urlencoded(parts.uri.query().unwrap_or_default());
    if parts.method == Method::POST {
        if is_form(&parts.headers) {
            params.extend_urlencoded(&read_body(body).await?);
        } else {
            tracing::debug!(
                "Ignoring POST body with content type {}",
                header_str(&parts.headers, header::CONTENT_TYPE.as_str())
                    .as_deref()
                    .unwrap_or("unknown")
            );
        }
    }

    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    Ok(LaunchRequest {
        params,
        authorization: header_str(&parts.headers, header::AUTHORIZATION.as_str()),
        peer,
        base_url: base_url(&parts.headers),
    })
}

async fn read_body(body: Body) -> LaunchResult<String> {
    let bytes = to_bytes(body, MAX_FORM_BODY_BYTES)
        .await
        .map_err(|e| LaunchError::Body(e.to_string()))?;
    String::from_utf8(bytes.to_vec()).map_err(|e| LaunchError::Body(e.to_string()))
}

/// Whether the body is `application/x-www-form-urlencoded`, parameters and case ignored.
fn is_form(headers: &HeaderMap) -> bool {
    header_str(headers, header::CONTENT_TYPE.as_str()).is_some_and(|value| {
        value
            .split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
    })
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// `scheme://host[:port]` as seen by the client.
fn base_url(headers: &HeaderMap) -> Option<String> {
    let host = header_str(headers, FORWARDED_HOST)
        .or_else(|| header_str(headers, header::HOST.as_str()))?;
    let scheme = header_str(headers, FORWARDED_PROTO).unwrap_or_else(|| "http".to_string());
    Some(format!("{}://{}", scheme, host))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
