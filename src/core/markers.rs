use crate::core::bounds::{BoundingBox, CONTINENTAL_US};
use crate::domain::model::{Marker, RawEvent};

/// Counts from one build pass, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub events: usize,
    pub kept: usize,
    pub discarded: usize,
}

/// Flattens events into markers, dropping points outside the continental US.
///
/// Output follows event order, then location order within each event.
pub fn build(events: &[RawEvent]) -> Vec<Marker> {
    build_within(events, &CONTINENTAL_US).0
}

pub fn build_within(events: &[RawEvent], region: &BoundingBox) -> (Vec<Marker>, BuildSummary) {
    let mut markers = Vec::new();
    let mut summary = BuildSummary {
        events: events.len(),
        ..BuildSummary::default()
    };

    for event in events {
        for location in &event.locations {
            match location.to_geo().filter(|p| region.contains(p)) {
                Some(position) => {
                    markers.push(Marker {
                        address: event.address.clone(),
                        title: event.title.clone(),
                        id: event.id.clone(),
                        position,
                    });
                    summary.kept += 1;
                }
                None => summary.discarded += 1,
            }
        }
    }

    if summary.discarded > 0 {
        tracing::debug!(
            "Discarded {} of {} locations outside the map region",
            summary.discarded,
            summary.kept + summary.discarded
        );
    }

    (markers, summary)
}
