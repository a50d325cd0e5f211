/// One pointer or clock event, as consumed by
/// [`MapController::apply`](crate::controller::MapController::apply).
///
/// The HTTP app and the scripted replay tool both feed the controller
/// through this enum, so any session can be reproduced exactly from its
/// event list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Click { x: f64, y: f64 },
    DoubleClick,
    Drag { dx: f64, dy: f64 },
    Wheel { delta: f64, x: f64, y: f64 },
    Tick { ms: f64 },
}
