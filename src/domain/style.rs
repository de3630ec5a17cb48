//! The fixed "political" style table handed to the map provider as-is.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_type: Option<&'static str>,
    pub stylers: Vec<Styler>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Styler {
    Color(&'static str),
    Visibility(&'static str),
    Weight(f32),
}

fn rule(
    feature_type: Option<&'static str>,
    element_type: Option<&'static str>,
    stylers: Vec<Styler>,
) -> StyleRule {
    StyleRule {
        feature_type,
        element_type,
        stylers,
    }
}

pub fn political_style() -> Vec<StyleRule> {
    use Styler::{Color, Visibility, Weight};

    vec![
        rule(None, Some("geometry"), vec![Color("#f5f5f5")]),
        rule(None, Some("labels.icon"), vec![Visibility("off")]),
        rule(None, Some("labels.text.fill"), vec![Color("#616161")]),
        rule(None, Some("labels.text.stroke"), vec![Color("#f5f5f5")]),
        rule(Some("administrative.neighborhood"), Some("labels"), vec![Visibility("on")]),
        rule(Some("administrative.land_parcel"), Some("labels"), vec![Visibility("on")]),
        rule(Some("administrative.locality"), Some("labels"), vec![Visibility("on")]),
        rule(Some("administrative"), Some("geometry"), vec![Visibility("on")]),
        rule(Some("administrative.country"), Some("geometry.fill"), vec![Visibility("on")]),
        rule(Some("administrative.land_parcel"), Some("labels.text.fill"), vec![Color("#bdbdbd")]),
        rule(
            Some("administrative.province"),
            Some("geometry.stroke"),
            vec![Color("#8d8d8d"), Visibility("on"), Weight(1.5)],
        ),
        rule(Some("poi"), None, vec![Visibility("off")]),
        rule(Some("poi"), Some("geometry"), vec![Color("#eeeeee")]),
        rule(Some("poi"), Some("labels.text.fill"), vec![Color("#757575")]),
        rule(Some("poi.park"), Some("geometry"), vec![Color("#e5e5e5")]),
        rule(Some("poi.park"), Some("labels.text.fill"), vec![Color("#9e9e9e")]),
        rule(Some("road"), Some("geometry"), vec![Color("#ffffff")]),
        rule(Some("road"), Some("labels.icon"), vec![Visibility("off")]),
        rule(Some("road.arterial"), Some("labels.text.fill"), vec![Color("#757575")]),
        rule(Some("road.highway"), Some("geometry"), vec![Color("#dadada")]),
        rule(Some("road.highway"), Some("labels.text.fill"), vec![Color("#616161")]),
        rule(Some("road.local"), Some("labels.text.fill"), vec![Color("#9e9e9e")]),
        rule(Some("transit"), None, vec![Visibility("off")]),
        rule(Some("transit.line"), Some("geometry"), vec![Color("#e5e5e5")]),
        rule(Some("transit.station"), Some("geometry"), vec![Color("#eeeeee")]),
        rule(Some("water"), Some("geometry"), vec![Color("#c9c9c9")]),
        rule(Some("water"), Some("labels.text.fill"), vec![Color("#9e9e9e")]),
    ]
}
