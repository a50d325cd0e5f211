//! HTTP viewer for an atlas package.
//!
//! The package loads completely before the listener comes up, so a
//! controller never exists over partial data; the server refuses to
//! start when any dataset fails. One session-wide [`MapController`]
//! sits behind a mutex, and every event route (`/click`, `/reset`,
//! `/pan`, `/zoom`) applies its gesture, runs the zoom transition to
//! completion, and responds with the settled frame.
//!
//! The map itself is server-rendered interactive SVG: country shapes
//! are plain links carrying their click coordinates, so the browser
//! needs no script of its own.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use formats::atlas_loader::load_atlas_from_package;
use formats::package::AtlasPackage;
use interact::{MapController, MapOptions};
use render::{FrameSnapshot, MapTheme, render_interactive_svg, render_svg};

/// Screen-space step for the pan control links.
const PAN_STEP: f64 = 80.0;
/// Wheel delta for one zoom control link; negative zooms in.
const ZOOM_STEP: f64 = 240.0;

#[derive(Clone)]
struct AppState {
    controller: Arc<Mutex<MapController>>,
    theme: Arc<MapTheme>,
    title: Arc<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = env::var("WORLDMAP_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8600".to_string())
        .parse()
        .expect("invalid WORLDMAP_ADDR");
    let data_root = PathBuf::from(
        env::var("WORLDMAP_DATA")
            .unwrap_or_else(|_| concat!(env!("CARGO_MANIFEST_DIR"), "/assets/demo").to_string()),
    );

    let defaults = MapOptions::default();
    let options = MapOptions {
        max_scale: env_var_f64("WORLDMAP_MAX_SCALE", defaults.max_scale),
        max_selected: env_var_usize("WORLDMAP_MAX_SELECTED", defaults.max_selected),
        ..defaults
    };

    // Ready barrier: every dataset the manifest lists is read and
    // decoded here, before any route can observe the controller.
    let package = match AtlasPackage::load(&data_root) {
        Ok(package) => package,
        Err(err) => {
            error!("failed to open atlas package {}: {err}", data_root.display());
            std::process::exit(1);
        }
    };
    let manifest = package.manifest();
    let title = manifest
        .name
        .clone()
        .unwrap_or_else(|| manifest.package_id.clone());
    let data = match load_atlas_from_package(&package) {
        Ok(data) => data,
        Err(err) => {
            error!("failed to load atlas package {}: {err}", data_root.display());
            std::process::exit(1);
        }
    };
    info!(
        "loaded atlas package {} ({} countries, {} border lines, trade={}, energy={})",
        data_root.display(),
        data.countries.len(),
        data.borders.len(),
        data.trade.is_some(),
        data.energy.is_some()
    );

    let state = AppState {
        controller: Arc::new(Mutex::new(MapController::new(data, options))),
        theme: Arc::new(MapTheme::default()),
        title: Arc::new(title),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    let app = Router::new()
        .route("/", get(index))
        .route("/map.svg", get(map_svg))
        .route("/click", get(click))
        .route("/reset", get(reset))
        .route("/pan", get(pan))
        .route("/zoom", get(zoom))
        .route("/api/countries", get(countries))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("worldmap viewer listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn index(State(state): State<AppState>) -> Response {
    let page = {
        let controller = state.controller.lock();
        build_page(&controller, &state.theme, &state.title)
    };
    html_response(page)
}

/// The current frame as a plain SVG document, without the page chrome.
async fn map_svg(State(state): State<AppState>) -> Response {
    let svg = {
        let controller = state.controller.lock();
        render_svg(&FrameSnapshot::capture(&controller), &state.theme)
    };
    svg_response(svg)
}

#[derive(Deserialize)]
struct ClickParams {
    x: f64,
    y: f64,
}

async fn click(State(state): State<AppState>, Query(params): Query<ClickParams>) -> Response {
    let page = {
        let mut controller = state.controller.lock();
        controller.click(params.x, params.y);
        controller.settle();
        build_page(&controller, &state.theme, &state.title)
    };
    html_response(page)
}

/// The double-click gesture: clear the selection and glide back to the
/// full view.
async fn reset(State(state): State<AppState>) -> Response {
    let page = {
        let mut controller = state.controller.lock();
        controller.double_click();
        controller.settle();
        build_page(&controller, &state.theme, &state.title)
    };
    html_response(page)
}

#[derive(Deserialize)]
struct PanParams {
    dx: f64,
    dy: f64,
}

async fn pan(State(state): State<AppState>, Query(params): Query<PanParams>) -> Response {
    let page = {
        let mut controller = state.controller.lock();
        controller.drag(params.dx, params.dy);
        controller.settle();
        build_page(&controller, &state.theme, &state.title)
    };
    html_response(page)
}

#[derive(Deserialize)]
struct ZoomParams {
    delta: f64,
    x: Option<f64>,
    y: Option<f64>,
}

async fn zoom(State(state): State<AppState>, Query(params): Query<ZoomParams>) -> Response {
    let page = {
        let mut controller = state.controller.lock();
        let center = controller.options().viewport().center();
        let x = params.x.unwrap_or(center.x);
        let y = params.y.unwrap_or(center.y);
        controller.wheel(params.delta, x, y);
        controller.settle();
        build_page(&controller, &state.theme, &state.title)
    };
    html_response(page)
}

#[derive(Serialize)]
struct CountryInfo {
    id: String,
    name: String,
}

async fn countries(State(state): State<AppState>) -> Response {
    let list: Vec<CountryInfo> = {
        let controller = state.controller.lock();
        controller
            .world()
            .countries()
            .iter()
            .map(|shape| CountryInfo {
                id: shape.id.clone(),
                name: shape.name.clone(),
            })
            .collect()
    };

    let body = match serde_json::to_string(&list) {
        Ok(v) => v,
        Err(err) => {
            error!("country list serialization failed: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "countries error").into_response();
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    (StatusCode::OK, headers, Body::from(body)).into_response()
}

/// Wraps the interactive SVG in a minimal HTML shell with pan/zoom/reset
/// links. Every control is a plain anchor, so the whole viewer works
/// without client-side script.
fn build_page(controller: &MapController, theme: &MapTheme, title: &str) -> String {
    let snapshot = FrameSnapshot::capture(controller);
    let svg = render_interactive_svg(&snapshot, theme, "/click");
    let center = snapshot.viewport.center();

    let mut page = String::new();
    page.push_str("<!doctype html>\n<html>\n<head>\n");
    page.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    page.push_str("  <style>body{font-family:sans-serif;margin:16px} nav a{margin-right:8px}</style>\n");
    page.push_str("</head>\n<body>\n");
    page.push_str(&format!("  <h1>{}</h1>\n", escape_html(title)));
    page.push_str("  <nav>\n");
    page.push_str(&format!(
        "    <a href=\"/zoom?delta={}&amp;x={:.0}&amp;y={:.0}\">zoom in</a>\n",
        -ZOOM_STEP, center.x, center.y
    ));
    page.push_str(&format!(
        "    <a href=\"/zoom?delta={}&amp;x={:.0}&amp;y={:.0}\">zoom out</a>\n",
        ZOOM_STEP, center.x, center.y
    ));
    page.push_str(&format!(
        "    <a href=\"/pan?dx={PAN_STEP}&amp;dy=0\">west</a>\n"
    ));
    page.push_str(&format!(
        "    <a href=\"/pan?dx=-{PAN_STEP}&amp;dy=0\">east</a>\n"
    ));
    page.push_str(&format!(
        "    <a href=\"/pan?dx=0&amp;dy={PAN_STEP}\">north</a>\n"
    ));
    page.push_str(&format!(
        "    <a href=\"/pan?dx=0&amp;dy=-{PAN_STEP}\">south</a>\n"
    ));
    page.push_str("    <a href=\"/reset\">reset</a>\n");
    page.push_str("  </nav>\n  ");
    page.push_str(&svg);
    page.push_str("</body>\n</html>\n");
    page
}

fn html_response(body: String) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    (StatusCode::OK, headers, Body::from(body)).into_response()
}

fn svg_response(body: String) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("image/svg+xml"),
    );
    (StatusCode::OK, headers, Body::from(body)).into_response()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn env_var_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::{build_page, escape_html};
    use formats::atlas_loader::load_atlas_from_package_dir;
    use interact::{MapController, MapOptions};
    use render::MapTheme;
    use std::path::PathBuf;

    fn demo_controller() -> MapController {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/demo");
        let data = load_atlas_from_package_dir(root).expect("load demo atlas");
        MapController::new(data, MapOptions::default())
    }

    #[test]
    fn page_embeds_the_interactive_map_and_controls() {
        let controller = demo_controller();
        let page = build_page(&controller, &MapTheme::default(), "Demo");

        assert!(page.starts_with("<!doctype html>"));
        assert!(page.contains("<title>Demo</title>"));
        assert!(page.contains("<svg "));
        assert!(page.contains(r#"<a href="/click?x="#));
        assert!(page.contains(r#"href="/reset""#));
        assert!(page.contains("zoom?delta=-240"));
    }

    #[test]
    fn event_round_trip_produces_a_settled_highlighted_page() {
        let mut controller = demo_controller();
        assert!(controller.select_by_name("France"));
        controller.settle();

        let page = build_page(&controller, &MapTheme::default(), "Demo");
        assert!(page.contains(r#"fill="red""#));
        assert!(!controller.is_animating());
    }

    #[test]
    fn titles_with_markup_are_escaped() {
        assert_eq!(escape_html("Fish & <Chips>"), "Fish &amp; &lt;Chips&gt;");
    }
}
