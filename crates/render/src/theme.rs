use scene::selection::Highlight;

/// Colours and stroke settings for the rendered map. Defaults: dark
/// country fills, white interior borders, red first pick and blue
/// second pick.
#[derive(Debug, Clone, PartialEq)]
pub struct MapTheme {
    pub background: String,
    pub country_fill: String,
    pub primary_fill: String,
    pub secondary_fill: String,
    pub border_stroke: String,
    pub connector_stroke: String,
    pub connector_width: f64,
    pub popup_fill: String,
    pub popup_stroke: String,
    pub popup_text: String,
    pub font_family: String,
    pub font_size: u32,
}

impl Default for MapTheme {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            country_fill: "#444".to_string(),
            primary_fill: "red".to_string(),
            secondary_fill: "blue".to_string(),
            border_stroke: "white".to_string(),
            connector_stroke: "orange".to_string(),
            connector_width: 2.0,
            popup_fill: "white".to_string(),
            popup_stroke: "#444".to_string(),
            popup_text: "#111".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 12,
        }
    }
}

impl MapTheme {
    pub fn fill_for(&self, highlight: Highlight) -> &str {
        match highlight {
            Highlight::Primary => &self.primary_fill,
            Highlight::Secondary => &self.secondary_fill,
            Highlight::None => &self.country_fill,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MapTheme;
    use scene::selection::Highlight;

    #[test]
    fn fills_follow_the_highlight_role() {
        let theme = MapTheme::default();
        assert_eq!(theme.fill_for(Highlight::Primary), "red");
        assert_eq!(theme.fill_for(Highlight::Secondary), "blue");
        assert_eq!(theme.fill_for(Highlight::None), "#444");
    }
}
