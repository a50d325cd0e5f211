//! SVG writer over a [`FrameSnapshot`].
//!
//! Document layout mirrors the interactive page: one transformed group
//! holds the country fills and the white border mesh; the screen-space
//! overlays (connector line, popup box) come after the group so pan and
//! zoom do not move them.

use scene::popup::Popup;
use view::Viewport;

use crate::frame::{CountryPath, FrameSnapshot};
use crate::theme::MapTheme;

const POPUP_PADDING: f64 = 8.0;
const POPUP_LINE_HEIGHT: f64 = 16.0;
/// Rough glyph advance for the default 12px sans font; only used to
/// size the popup box.
const POPUP_CHAR_WIDTH: f64 = 7.2;

/// Writes a standalone SVG document for one frame.
pub fn render_svg(snapshot: &FrameSnapshot, theme: &MapTheme) -> String {
    render_document(snapshot, theme, None)
}

/// Like [`render_svg`], but wraps every country in a link so a served
/// page can round-trip clicks without any client script. `click_href`
/// is the route prefix; the country's screen-space anchor is appended
/// as `?x=..&y=..`.
pub fn render_interactive_svg(
    snapshot: &FrameSnapshot,
    theme: &MapTheme,
    click_href: &str,
) -> String {
    render_document(snapshot, theme, Some(click_href))
}

fn render_document(snapshot: &FrameSnapshot, theme: &MapTheme, click_href: Option<&str>) -> String {
    let viewport = snapshot.viewport;
    let transform = snapshot.transform;
    let mut out = String::new();

    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        viewport.width, viewport.height, viewport.width, viewport.height
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"  <rect width="{}" height="{}" fill="{}"/>"#,
        viewport.width, viewport.height, theme.background
    ));
    out.push('\n');

    out.push_str(&format!(
        r#"  <g transform="translate({:.3},{:.3}) scale({:.3})" stroke-width="{:.3}">"#,
        transform.x, transform.y, transform.k, snapshot.stroke_width
    ));
    out.push('\n');

    for country in &snapshot.countries {
        let shape = country_element(country, theme);
        match click_href {
            Some(prefix) => out.push_str(&format!(
                "    <a href=\"{}?x={:.1}&amp;y={:.1}\">{}</a>\n",
                prefix, country.anchor.x, country.anchor.y, shape
            )),
            None => {
                out.push_str("    ");
                out.push_str(&shape);
                out.push('\n');
            }
        }
    }

    if !snapshot.borders.is_empty() {
        out.push_str(&format!(
            r#"    <path d="{}" fill="none" stroke="{}" stroke-linejoin="round"/>"#,
            snapshot.borders, theme.border_stroke
        ));
        out.push('\n');
    }

    out.push_str("  </g>\n");

    if let Some(connector) = snapshot.connector {
        out.push_str(&format!(
            r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}"/>"#,
            connector.from.x,
            connector.from.y,
            connector.to.x,
            connector.to.y,
            theme.connector_stroke,
            theme.connector_width
        ));
        out.push('\n');
    }

    if let Some(popup) = &snapshot.popup {
        append_popup(&mut out, popup, viewport, theme);
    }

    out.push_str("</svg>\n");
    out
}

fn country_element(country: &CountryPath, theme: &MapTheme) -> String {
    format!(
        r#"<path d="{}" fill="{}" cursor="pointer"><title>{}</title></path>"#,
        country.path,
        theme.fill_for(country.highlight),
        escape_text(&country.name)
    )
}

/// Popup box above and to the right of its anchor, nudged back inside
/// the viewport when the anchor sits near an edge.
fn append_popup(out: &mut String, popup: &Popup, viewport: Viewport, theme: &MapTheme) {
    let lines = popup.lines();
    if lines.is_empty() {
        return;
    }

    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_w = widest as f64 * POPUP_CHAR_WIDTH + 2.0 * POPUP_PADDING;
    let box_h = lines.len() as f64 * POPUP_LINE_HEIGHT + 2.0 * POPUP_PADDING;
    let x = (popup.anchor.x + 12.0)
        .min(viewport.width - box_w - 4.0)
        .max(4.0);
    let y = (popup.anchor.y - box_h - 12.0).max(4.0);

    out.push_str(&format!(
        r#"  <g font-family="{}" font-size="{}">"#,
        theme.font_family, theme.font_size
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"    <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="4" fill="{}" fill-opacity="0.9" stroke="{}"/>"#,
        x, y, box_w, box_h, theme.popup_fill, theme.popup_stroke
    ));
    out.push('\n');
    for (i, line) in lines.iter().enumerate() {
        let baseline = y + POPUP_PADDING + (i as f64 + 1.0) * POPUP_LINE_HEIGHT - 4.0;
        out.push_str(&format!(
            r#"    <text x="{:.2}" y="{:.2}" fill="{}">{}</text>"#,
            x + POPUP_PADDING,
            baseline,
            theme.popup_text,
            escape_text(line)
        ));
        out.push('\n');
    }
    out.push_str("  </g>\n");
}

fn escape_text(raw: &str) -> String {
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
