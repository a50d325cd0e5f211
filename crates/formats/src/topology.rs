use std::collections::BTreeMap;

use serde_json::Value;

use foundation::math::GeoPoint;
use scene::feature::{Country, Polygon, Ring};

/// A decoded boundary topology: one shared pool of arcs plus named
/// geometry collections that reference arcs by index. Encoding countries
/// this way stores every shared border exactly once, which is also what
/// lets [`Topology::inner_borders`] pick out the borders between two
/// countries without double-drawing coastlines.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    arcs: Vec<Vec<GeoPoint>>,
    objects: BTreeMap<String, Vec<TopoGeometry>>,
}

#[derive(Debug, Clone, PartialEq)]
struct TopoGeometry {
    id: Option<String>,
    name: Option<String>,
    shape: TopoShape,
}

#[derive(Debug, Clone, PartialEq)]
enum TopoShape {
    Polygon(Vec<Vec<i64>>),
    MultiPolygon(Vec<Vec<Vec<i64>>>),
}

impl TopoGeometry {
    fn each_arc_ref(&self, mut visit: impl FnMut(i64)) {
        match &self.shape {
            TopoShape::Polygon(rings) => {
                for ring in rings {
                    for &signed in ring {
                        visit(signed);
                    }
                }
            }
            TopoShape::MultiPolygon(polygons) => {
                for rings in polygons {
                    for ring in rings {
                        for &signed in ring {
                            visit(signed);
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug)]
pub enum TopologyError {
    NotATopology,
    Parse { reason: String },
    InvalidTransform { reason: String },
    InvalidArc { index: usize, reason: String },
    InvalidGeometry { object: String, index: usize, reason: String },
    MissingObject { name: String },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::NotATopology => write!(f, "expected a Topology object"),
            TopologyError::Parse { reason } => write!(f, "JSON parse error: {reason}"),
            TopologyError::InvalidTransform { reason } => {
                write!(f, "invalid transform: {reason}")
            }
            TopologyError::InvalidArc { index, reason } => {
                write!(f, "invalid arc at index {index}: {reason}")
            }
            TopologyError::InvalidGeometry {
                object,
                index,
                reason,
            } => {
                write!(f, "invalid geometry {index} in object {object}: {reason}")
            }
            TopologyError::MissingObject { name } => {
                write!(f, "topology has no object named {name}")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

struct QuantizedTransform {
    scale: [f64; 2],
    translate: [f64; 2],
}

impl Topology {
    pub fn from_json_str(payload: &str) -> Result<Self, TopologyError> {
        let value: Value = serde_json::from_str(payload).map_err(|e| TopologyError::Parse {
            reason: e.to_string(),
        })?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, TopologyError> {
        let obj = value.as_object().ok_or(TopologyError::NotATopology)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(TopologyError::NotATopology)?;
        if ty != "Topology" {
            return Err(TopologyError::NotATopology);
        }

        let transform = match obj.get("transform") {
            Some(t) => Some(parse_transform(t)?),
            None => None,
        };

        let raw_arcs = obj
            .get("arcs")
            .and_then(|v| v.as_array())
            .ok_or(TopologyError::NotATopology)?;
        let mut arcs = Vec::with_capacity(raw_arcs.len());
        for (index, arc_val) in raw_arcs.iter().enumerate() {
            let arc = decode_arc(arc_val, transform.as_ref())
                .map_err(|reason| TopologyError::InvalidArc { index, reason })?;
            arcs.push(arc);
        }

        let objects_val = obj
            .get("objects")
            .and_then(|v| v.as_object())
            .ok_or(TopologyError::NotATopology)?;
        let mut objects = BTreeMap::new();
        for (name, object_val) in objects_val {
            let geometries = parse_object(name, object_val)?;
            validate_arc_refs(arcs.len(), name, &geometries)?;
            objects.insert(name.clone(), geometries);
        }

        Ok(Self { arcs, objects })
    }

    /// Expands the geometries of `object` into standalone countries with
    /// absolute ring coordinates. Geometry order is preserved.
    pub fn features(&self, object: &str) -> Result<Vec<Country>, TopologyError> {
        let geometries = self
            .objects
            .get(object)
            .ok_or_else(|| TopologyError::MissingObject {
                name: object.to_string(),
            })?;

        let mut out = Vec::with_capacity(geometries.len());
        for geometry in geometries {
            let polygons = match &geometry.shape {
                TopoShape::Polygon(rings) => vec![self.expand_polygon(rings)],
                TopoShape::MultiPolygon(polygons) => polygons
                    .iter()
                    .map(|rings| self.expand_polygon(rings))
                    .collect(),
            };

            let id = geometry.id.clone().unwrap_or_default();
            let name = match (&geometry.name, &geometry.id) {
                (Some(name), _) => name.clone(),
                (None, Some(id)) => id.clone(),
                (None, None) => String::new(),
            };
            out.push(Country::new(id, name, polygons));
        }
        Ok(out)
    }

    /// Interior borders of `object`: every arc whose first and last
    /// referencing geometries differ. Arcs used by a single country
    /// (coastlines, island outlines) are left out.
    pub fn inner_borders(&self, object: &str) -> Result<Vec<Vec<GeoPoint>>, TopologyError> {
        self.mesh(object, |a, b| a != b)
    }

    /// Emits the arcs of `object` whose first and last referencing
    /// geometries satisfy `filter`, in arc order. `filter` receives the
    /// geometry indices within the object, in reference order.
    pub fn mesh<F>(&self, object: &str, filter: F) -> Result<Vec<Vec<GeoPoint>>, TopologyError>
    where
        F: Fn(usize, usize) -> bool,
    {
        let geometries = self
            .objects
            .get(object)
            .ok_or_else(|| TopologyError::MissingObject {
                name: object.to_string(),
            })?;

        // First and last geometry referencing each arc, in traversal order.
        let mut uses: Vec<Option<(usize, usize)>> = vec![None; self.arcs.len()];
        for (geometry_ix, geometry) in geometries.iter().enumerate() {
            geometry.each_arc_ref(|signed| {
                let slot = &mut uses[decode_arc_index(signed)];
                match slot {
                    Some((_, last)) => *last = geometry_ix,
                    None => *slot = Some((geometry_ix, geometry_ix)),
                }
            });
        }

        let mut lines = Vec::new();
        for (arc_ix, slot) in uses.iter().enumerate() {
            if let Some((first, last)) = slot
                && filter(*first, *last)
            {
                lines.push(self.arcs[arc_ix].clone());
            }
        }
        Ok(lines)
    }

    fn expand_polygon(&self, rings: &[Vec<i64>]) -> Polygon {
        rings.iter().map(|ring| self.expand_ring(ring)).collect()
    }

    /// Stitches referenced arcs into one ring. A negative reference `~i`
    /// walks arc `i` back to front, and the junction point shared by
    /// consecutive arcs is emitted once.
    fn expand_ring(&self, arc_refs: &[i64]) -> Ring {
        let mut out: Vec<GeoPoint> = Vec::new();
        for &signed in arc_refs {
            let arc = &self.arcs[decode_arc_index(signed)];
            if !out.is_empty() {
                out.pop();
            }
            let start = out.len();
            out.extend(arc.iter().cloned());
            if signed < 0 {
                out[start..].reverse();
            }
        }
        out
    }
}

fn decode_arc_index(signed: i64) -> usize {
    (if signed < 0 { !signed } else { signed }) as usize
}

fn validate_arc_refs(
    arc_count: usize,
    object: &str,
    geometries: &[TopoGeometry],
) -> Result<(), TopologyError> {
    for (index, geometry) in geometries.iter().enumerate() {
        let mut bad = None;
        geometry.each_arc_ref(|signed| {
            if decode_arc_index(signed) >= arc_count && bad.is_none() {
                bad = Some(signed);
            }
        });
        if let Some(signed) = bad {
            return Err(TopologyError::InvalidGeometry {
                object: object.to_string(),
                index,
                reason: format!("arc reference {signed} out of range"),
            });
        }
    }
    Ok(())
}

fn parse_transform(value: &Value) -> Result<QuantizedTransform, TopologyError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TopologyError::InvalidTransform {
            reason: "transform must be an object".to_string(),
        })?;
    let scale = parse_transform_pair(obj.get("scale"), "scale")?;
    let translate = parse_transform_pair(obj.get("translate"), "translate")?;
    Ok(QuantizedTransform { scale, translate })
}

fn parse_transform_pair(value: Option<&Value>, field: &str) -> Result<[f64; 2], TopologyError> {
    let invalid = || TopologyError::InvalidTransform {
        reason: format!("{field} must be a two-element number array"),
    };
    let arr = value.and_then(|v| v.as_array()).ok_or_else(invalid)?;
    if arr.len() < 2 {
        return Err(invalid());
    }
    let a = arr[0].as_f64().ok_or_else(invalid)?;
    let b = arr[1].as_f64().ok_or_else(invalid)?;
    Ok([a, b])
}

fn decode_arc(value: &Value, transform: Option<&QuantizedTransform>) -> Result<Vec<GeoPoint>, String> {
    let raw = value
        .as_array()
        .ok_or("arc must be an array of positions".to_string())?;
    let mut points = Vec::with_capacity(raw.len());
    let mut x = 0.0;
    let mut y = 0.0;
    for position in raw {
        let pair = position
            .as_array()
            .ok_or("position must be an array".to_string())?;
        if pair.len() < 2 {
            return Err("position must have [x, y]".to_string());
        }
        let px = pair[0].as_f64().ok_or("x must be a number".to_string())?;
        let py = pair[1].as_f64().ok_or("y must be a number".to_string())?;
        match transform {
            // Quantized arcs delta-encode positions; accumulate, then scale.
            Some(t) => {
                x += px;
                y += py;
                points.push(GeoPoint::new(
                    x * t.scale[0] + t.translate[0],
                    y * t.scale[1] + t.translate[1],
                ));
            }
            None => points.push(GeoPoint::new(px, py)),
        }
    }
    Ok(points)
}

fn parse_object(name: &str, value: &Value) -> Result<Vec<TopoGeometry>, TopologyError> {
    let invalid = |index: usize, reason: String| TopologyError::InvalidGeometry {
        object: name.to_string(),
        index,
        reason,
    };

    let obj = value
        .as_object()
        .ok_or_else(|| invalid(0, "object must be a geometry".to_string()))?;

    if obj.get("type").and_then(|v| v.as_str()) == Some("GeometryCollection") {
        let geometries = obj
            .get("geometries")
            .and_then(|v| v.as_array())
            .ok_or_else(|| invalid(0, "GeometryCollection missing geometries".to_string()))?;
        let mut out = Vec::with_capacity(geometries.len());
        for (index, geometry_val) in geometries.iter().enumerate() {
            if let Some(geometry) =
                parse_geometry(geometry_val).map_err(|reason| invalid(index, reason))?
            {
                out.push(geometry);
            }
        }
        return Ok(out);
    }

    match parse_geometry(value).map_err(|reason| invalid(0, reason))? {
        Some(geometry) => Ok(vec![geometry]),
        None => Ok(Vec::new()),
    }
}

/// Parses one geometry. Null geometries decode to `None`; they reference
/// no arcs and draw nothing, so dropping them keeps the rest simple.
fn parse_geometry(value: &Value) -> Result<Option<TopoGeometry>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;

    let ty = match obj.get("type") {
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Null) | None => return Ok(None),
        Some(_) => return Err("geometry type must be a string".to_string()),
    };

    let id = match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let name = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .and_then(|props| props.get("name"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let arcs_val = obj.get("arcs").ok_or("geometry missing arcs".to_string())?;
    let shape = match ty {
        "Polygon" => TopoShape::Polygon(parse_ring_refs(arcs_val)?),
        "MultiPolygon" => TopoShape::MultiPolygon(parse_polygon_refs(arcs_val)?),
        other => return Err(format!("unsupported geometry type: {other}")),
    };

    Ok(Some(TopoGeometry { id, name, shape }))
}

fn parse_arc_refs(value: &Value) -> Result<Vec<i64>, String> {
    let arr = value
        .as_array()
        .ok_or("ring must be an array of arc references".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(
            item.as_i64()
                .ok_or("arc reference must be an integer".to_string())?,
        );
    }
    Ok(out)
}

fn parse_ring_refs(value: &Value) -> Result<Vec<Vec<i64>>, String> {
    let arr = value
        .as_array()
        .ok_or("Polygon arcs must be an array of rings".to_string())?;
    arr.iter().map(parse_arc_refs).collect()
}

fn parse_polygon_refs(value: &Value) -> Result<Vec<Vec<Vec<i64>>>, String> {
    let arr = value
        .as_array()
        .ok_or("MultiPolygon arcs must be an array of polygons".to_string())?;
    arr.iter().map(parse_ring_refs).collect()
}
