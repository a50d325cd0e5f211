//! Pointer-event controller over a built scene.
//!
//! Owns the projected world, the side datasets, the camera, and the
//! selection, and consumes the standard pointer gestures of an
//! interactive map:
//! - click: pick the country under the pointer, update the selection,
//!   refresh connector and popup, re-frame the view;
//! - double-click: clear everything and glide back to the full map;
//! - drag/wheel: free-form pan and pointer-anchored zoom;
//! - advance: drive the transition clock.
//!
//! All handlers are synchronous and run to completion. The only
//! asynchrony in the system is dataset loading, which happens before a
//! controller exists.

use foundation::math::{Mercator, Vec2};
use formats::atlas_loader::AtlasData;
use formats::energy::EnergyTable;
use formats::trade::TradeTable;
use scene::World;
use scene::hit::pick_point;
use scene::overlay::Connector;
use scene::popup::{Popup, PopupContent};
use scene::selection::{Selection, SelectionChange};
use view::{ViewCamera, ViewTransform};

use crate::event::InputEvent;
use crate::options::MapOptions;

/// Frame step used when settling transitions without a real clock.
const SETTLE_FRAME_MS: f64 = 16.0;

#[derive(Debug, Clone)]
pub struct MapController {
    world: World,
    trade: Option<TradeTable>,
    energy: Option<EnergyTable>,
    options: MapOptions,
    camera: ViewCamera,
    selection: Selection,
    connector: Option<Connector>,
    popup: Option<Popup>,
}

impl MapController {
    /// Builds the scene from fully loaded data. The load step is the
    /// ready barrier: a controller never exists over partial data, so
    /// an early click cannot observe a half-populated lookup table.
    pub fn new(data: AtlasData, options: MapOptions) -> Self {
        let projection = Mercator::fit_width(options.width, options.height);
        let world = World::build(&data.countries, &data.borders, &projection);
        let camera = ViewCamera::new(options.viewport(), options.scale_extent());
        let selection = Selection::new(options.max_selected);
        Self {
            world,
            trade: data.trade,
            energy: data.energy,
            options,
            camera,
            selection,
            connector: None,
            popup: None,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn connector(&self) -> Option<Connector> {
        self.connector
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn transform(&self) -> ViewTransform {
        self.camera.transform()
    }

    pub fn is_animating(&self) -> bool {
        self.camera.is_animating()
    }

    /// Click at screen coordinates. Open-water clicks (no feature hit)
    /// leave every piece of state unchanged.
    pub fn click(&mut self, x: f64, y: f64) {
        let scene_point = self.camera.transform().invert(Vec2::new(x, y));
        let Some(feature) = pick_point(&self.world, scene_point) else {
            return;
        };
        self.select_feature(feature);
    }

    /// Programmatic selection by display name (exact match first, then
    /// case-insensitive). Follows the same path as a pointer click on
    /// the feature. Returns false when no feature matches.
    pub fn select_by_name(&mut self, name: &str) -> bool {
        let Some(feature) = self.world.index_of_name(name) else {
            return false;
        };
        self.select_feature(feature);
        true
    }

    /// Double-click reset: selection, connector, and popup are cleared
    /// and the view glides back to the identity transform.
    pub fn double_click(&mut self) {
        self.selection.clear();
        self.connector = None;
        self.popup = None;
        self.camera.reset_view(self.options.transition_ms);
    }

    /// Pan by a screen-space pointer delta. Interrupts any transition.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.camera.pan_by(dx, dy);
    }

    /// Wheel zoom anchored at the pointer, clamped to the scale extent.
    pub fn wheel(&mut self, delta: f64, x: f64, y: f64) {
        let factor = self.options.wheel_factor(delta);
        self.camera.zoom_by_at(factor, Vec2::new(x, y));
    }

    /// Advances the transition clock. Returns true while more frames
    /// are needed.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        self.camera.advance(dt_ms)
    }

    /// Runs the transition clock until the camera settles.
    pub fn settle(&mut self) {
        while self.camera.advance(SETTLE_FRAME_MS) {}
    }

    /// Applies one scripted event. Feeding the same event sequence to a
    /// fresh controller reproduces the same state.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Click { x, y } => self.click(x, y),
            InputEvent::DoubleClick => self.double_click(),
            InputEvent::Drag { dx, dy } => self.drag(dx, dy),
            InputEvent::Wheel { delta, x, y } => self.wheel(delta, x, y),
            InputEvent::Tick { ms } => {
                self.advance(ms);
            }
        }
    }

    fn select_feature(&mut self, feature: usize) {
        let change = self.selection.click(feature);
        if change == SelectionChange::Restarted {
            self.connector = None;
        }

        // Overlays capture the transform as of the click, before the
        // re-framing transition starts.
        self.update_connector();
        self.update_popup(feature);
        self.frame_selection(feature);
    }

    /// On reaching exactly two picks, captures the connector between
    /// the two centroids in final screen space.
    fn update_connector(&mut self) {
        let picks = self.selection.picks();
        if picks.len() != 2 {
            return;
        }
        let (Some(a), Some(b)) = (self.world.country(picks[0]), self.world.country(picks[1]))
        else {
            return;
        };
        let transform = self.camera.transform();
        self.connector = Some(Connector::new(
            transform.apply(a.centroid),
            transform.apply(b.centroid),
        ));
    }

    /// Popup lookup for the clicked feature. Trade data is keyed by
    /// feature id and falls back to an "unknown" placeholder; energy
    /// data is keyed by display name and hides the popup entirely on a
    /// miss. When a package carries both datasets the trade popup wins.
    fn update_popup(&mut self, clicked: usize) {
        let Some(shape) = self.world.country(clicked) else {
            return;
        };
        let anchor = self.camera.transform().apply(shape.centroid);

        if let Some(trade) = &self.trade {
            let content = match trade.get(&shape.id) {
                Some(row) => PopupContent::Trade {
                    name: row.name.clone(),
                    import: row.import.clone(),
                    export: row.export.clone(),
                },
                None => PopupContent::TradeUnknown {
                    id: shape.id.clone(),
                },
            };
            self.popup = Some(Popup::new(content, anchor));
            return;
        }

        if let Some(energy) = &self.energy {
            self.popup = energy.get(&shape.name).map(|profile| {
                Popup::new(
                    PopupContent::Energy {
                        country: shape.name.clone(),
                        imports: profile.imports.clone(),
                        exports: profile.exports.clone(),
                    },
                    anchor,
                )
            });
            return;
        }

        self.popup = None;
    }

    /// Animated re-framing per the click-to-zoom rule: the scale fits
    /// the clicked feature's bbox into 90% of the viewport (clamped to
    /// the extent); the view centers on that bbox with one pick, or on
    /// the midpoint of the two selected centroids with two.
    fn frame_selection(&mut self, clicked: usize) {
        let Some(shape) = self.world.country(clicked) else {
            return;
        };
        let picks = self.selection.picks();
        if picks.len() != 2 {
            self.camera
                .frame_bounds(&shape.bounds, self.options.transition_ms);
            return;
        }

        let (Some(a), Some(b)) = (self.world.country(picks[0]), self.world.country(picks[1]))
        else {
            return;
        };
        let viewport = self.camera.viewport();
        let fitted = view::fit_bounds(viewport, &shape.bounds, self.camera.extent());
        let mid = a.centroid.midpoint(b.centroid);
        let target = ViewTransform::new(
            fitted.k,
            viewport.width / 2.0 - fitted.k * mid.x,
            viewport.height / 2.0 - fitted.k * mid.y,
        );
        self.camera.animate_to(target, self.options.transition_ms);
    }
}
