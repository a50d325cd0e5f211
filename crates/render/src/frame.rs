use foundation::math::Vec2;
use interact::MapController;
use scene::overlay::Connector;
use scene::popup::Popup;
use scene::selection::Highlight;
use view::{ViewTransform, Viewport};

/// Border stroke width at scale 1. The rendered width is this over the
/// current scale so borders stay visually constant under zoom.
pub const BORDER_WIDTH_BASE: f64 = 1.0;

/// One country ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryPath {
    pub id: String,
    pub name: String,
    /// `M`/`L`/`Z` path data in base scene space, coordinates rounded
    /// to 2 decimals.
    pub path: String,
    pub highlight: Highlight,
    /// Centroid mapped through the snapshot transform. The interactive
    /// page uses it as the click coordinate for the shape.
    pub anchor: Vec2,
}

/// One drawable frame, precomputed into plain data.
///
/// Country and mesh path data are in base scene space and rely on the
/// group transform; connector and popup are in final screen space and
/// must be drawn outside the transformed group.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub viewport: Viewport,
    pub transform: ViewTransform,
    /// `BORDER_WIDTH_BASE / k`.
    pub stroke_width: f64,
    pub countries: Vec<CountryPath>,
    /// Mesh path data; empty when the dataset has no interior borders.
    pub borders: String,
    pub connector: Option<Connector>,
    pub popup: Option<Popup>,
}

impl FrameSnapshot {
    /// Extracts the current frame. Countries keep their scene build
    /// order so paint order matches the hit-tester's overlap rule.
    pub fn capture(controller: &MapController) -> Self {
        let transform = controller.transform();
        let selection = controller.selection();
        let world = controller.world();

        let countries = world
            .countries()
            .iter()
            .enumerate()
            .map(|(index, shape)| CountryPath {
                id: shape.id.clone(),
                name: shape.name.clone(),
                path: rings_path_data(&shape.rings),
                highlight: selection.highlight(index),
                anchor: transform.apply(shape.centroid),
            })
            .collect();

        Self {
            viewport: controller.options().viewport(),
            transform,
            stroke_width: transform.stroke_width(BORDER_WIDTH_BASE),
            countries,
            borders: lines_path_data(&world.borders().lines),
            connector: controller.connector(),
            popup: controller.popup().cloned(),
        }
    }
}

/// Path data for closed fill rings. A closing duplicate point is
/// dropped; `Z` closes the ring instead.
pub fn rings_path_data(rings: &[Vec<Vec2>]) -> String {
    let mut out = String::new();
    for ring in rings {
        let mut points = ring.as_slice();
        if points.len() > 1 {
            let first = points[0];
            let last = points[points.len() - 1];
            if nearly_equal(first, last) {
                points = &points[..points.len() - 1];
            }
        }
        if points.len() < 3 {
            continue;
        }
        append_polyline(&mut out, points);
        out.push('Z');
    }
    out
}

/// Path data for open border polylines.
pub fn lines_path_data(lines: &[Vec<Vec2>]) -> String {
    let mut out = String::new();
    for line in lines {
        if line.len() < 2 {
            continue;
        }
        append_polyline(&mut out, line);
    }
    out
}

fn append_polyline(out: &mut String, points: &[Vec2]) {
    for (i, p) in points.iter().enumerate() {
        out.push(if i == 0 { 'M' } else { 'L' });
        out.push_str(&format!("{:.2},{:.2}", p.x, p.y));
    }
}

fn nearly_equal(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::{BORDER_WIDTH_BASE, FrameSnapshot, lines_path_data, rings_path_data};
    use foundation::math::{GeoPoint, Vec2};
    use formats::atlas_loader::AtlasData;
    use interact::{MapController, MapOptions};
    use scene::feature::Country;
    use scene::selection::Highlight;

    fn square(lon0: f64, lat0: f64, size: f64) -> Vec<Vec<GeoPoint>> {
        vec![vec![
            GeoPoint::new(lon0, lat0),
            GeoPoint::new(lon0 + size, lat0),
            GeoPoint::new(lon0 + size, lat0 + size),
            GeoPoint::new(lon0, lat0 + size),
            GeoPoint::new(lon0, lat0),
        ]]
    }

    fn demo_controller() -> MapController {
        let data = AtlasData {
            countries: vec![
                Country::new("4", "Afghanistan", vec![square(0.0, 0.0, 10.0)]),
                Country::new("250", "France", vec![square(20.0, 0.0, 10.0)]),
            ],
            borders: vec![vec![GeoPoint::new(10.0, 0.0), GeoPoint::new(10.0, 10.0)]],
            trade: None,
            energy: None,
        };
        MapController::new(data, MapOptions::default())
    }

    fn click_on(controller: &mut MapController, index: usize) {
        let centroid = controller.world().country(index).expect("shape").centroid;
        let screen = controller.transform().apply(centroid);
        controller.click(screen.x, screen.y);
    }

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} != {b} (eps {eps})");
    }

    #[test]
    fn capture_keeps_scene_order() {
        let ctrl = demo_controller();
        let snap = FrameSnapshot::capture(&ctrl);

        let ids: Vec<&str> = snap.countries.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["4", "250"]);
        for country in &snap.countries {
            assert!(country.path.starts_with('M'));
            assert!(country.path.ends_with('Z'));
        }
        assert!(snap.borders.starts_with('M'));
        assert!(!snap.borders.contains('Z'));
    }

    #[test]
    fn path_data_rounds_to_two_decimals_and_drops_the_closing_point() {
        let ring = vec![
            Vec2::new(1.234, 5.678),
            Vec2::new(2.0, 3.0),
            Vec2::new(0.5, 0.25),
            Vec2::new(1.234, 5.678),
        ];
        assert_eq!(
            rings_path_data(&[ring]),
            "M1.23,5.68L2.00,3.00L0.50,0.25Z"
        );
    }

    #[test]
    fn degenerate_rings_and_lines_are_skipped() {
        let stub = vec![Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)];
        assert_eq!(rings_path_data(&[stub]), "");
        assert_eq!(lines_path_data(&[vec![Vec2::new(4.0, 4.0)]]), "");
    }

    #[test]
    fn highlights_follow_the_selection() {
        let mut ctrl = demo_controller();
        click_on(&mut ctrl, 0);
        click_on(&mut ctrl, 1);

        let snap = FrameSnapshot::capture(&ctrl);
        assert_eq!(snap.countries[0].highlight, Highlight::Primary);
        assert_eq!(snap.countries[1].highlight, Highlight::Secondary);
    }

    #[test]
    fn stroke_width_compensates_for_the_settled_zoom() {
        let mut ctrl = demo_controller();
        click_on(&mut ctrl, 0);
        ctrl.settle();

        let snap = FrameSnapshot::capture(&ctrl);
        assert_close(snap.transform.k, 2.67, 1e-12);
        assert_close(snap.stroke_width, BORDER_WIDTH_BASE / 2.67, 1e-12);
    }

    #[test]
    fn anchors_track_the_current_transform() {
        let mut ctrl = demo_controller();
        let centroid = ctrl.world().country(0).expect("shape").centroid;

        let before = FrameSnapshot::capture(&ctrl);
        assert_eq!(before.countries[0].anchor, centroid);

        click_on(&mut ctrl, 0);
        ctrl.settle();
        let after = FrameSnapshot::capture(&ctrl);
        assert_eq!(after.countries[0].anchor, ctrl.transform().apply(centroid));
    }
}
