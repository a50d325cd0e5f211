use foundation::math::Vec2;

/// Popup content for the clicked country.
///
/// Figures are display strings taken verbatim from the side dataset;
/// the engine never does arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupContent {
    /// Trade dataset hit: structured name/import/export fields.
    Trade {
        name: String,
        import: String,
        export: String,
    },
    /// Trade dataset present but the id has no row.
    TradeUnknown { id: String },
    /// Energy dataset hit: electricity units bucketed by direction.
    Energy {
        country: String,
        imports: Vec<String>,
        exports: Vec<String>,
    },
}

/// A popup anchored in final screen space (the selected feature's
/// centroid mapped through the transform current at click time).
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub content: PopupContent,
    pub anchor: Vec2,
}

impl Popup {
    pub fn new(content: PopupContent, anchor: Vec2) -> Self {
        Self { content, anchor }
    }

    /// Text lines in display order, used by both the SVG writer and the
    /// popup assertions in tests.
    pub fn lines(&self) -> Vec<String> {
        match &self.content {
            PopupContent::Trade {
                name,
                import,
                export,
            } => vec![
                name.clone(),
                format!("Import: {import}"),
                format!("Export: {export}"),
            ],
            PopupContent::TradeUnknown { id } => {
                vec![format!("Unknown country (id {id})")]
            }
            PopupContent::Energy {
                country,
                imports,
                exports,
            } => {
                let mut lines = vec![country.clone(), "Imports:".to_string()];
                lines.extend(imports.iter().map(|u| format!("  {u}")));
                lines.push("Exports:".to_string());
                lines.extend(exports.iter().map(|u| format!("  {u}")));
                lines
            }
        }
    }
}
