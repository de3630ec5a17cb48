use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::core::bounds::BoundingBox;
use crate::core::markers::{build_within, BuildSummary};
use crate::core::session::MapSession;
use crate::core::{DataSource, MapSurface};
use crate::domain::model::{Marker, RenderMode, RenderReport};
use crate::utils::error::Result;

/// Fetches the event dataset and hands the built markers to a shared session.
///
/// Calls for the same mode are sequenced behind a per-mode lock: a second
/// call waits until the first has rendered, so the last call to start is
/// also the last to write. Calls for different modes run independently.
pub struct FetchOrchestrator<D, S: MapSurface> {
    source: Arc<D>,
    session: Arc<Mutex<MapSession<S>>>,
    in_flight: Arc<[Mutex<()>; 2]>,
    region: BoundingBox,
}

impl<D, S: MapSurface> Clone for FetchOrchestrator<D, S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            session: Arc::clone(&self.session),
            in_flight: Arc::clone(&self.in_flight),
            region: self.region,
        }
    }
}

impl<D: DataSource, S: MapSurface> FetchOrchestrator<D, S> {
    pub fn new(source: D, session: MapSession<S>) -> Self {
        Self {
            source: Arc::new(source),
            session: Arc::new(Mutex::new(session)),
            in_flight: Arc::new([Mutex::new(()), Mutex::new(())]),
            region: BoundingBox::default(),
        }
    }

    pub fn with_region(mut self, region: BoundingBox) -> Self {
        self.region = region;
        self
    }

    pub fn session(&self) -> Arc<Mutex<MapSession<S>>> {
        Arc::clone(&self.session)
    }

    /// One fetch, one build, one replace. A failed fetch or decode leaves
    /// whatever was rendered before untouched.
    pub async fn load_and_render(&self, mode: RenderMode) -> Result<RenderReport> {
        let _in_flight = self.in_flight[mode.index()].lock().await;

        let (markers, summary) = self.fetch_markers(mode).await?;

        let mut session = self.session.lock().await;
        Self::dispatch(&mut session, mode, markers, summary)
    }

    /// Serves every requested mode from a single fetch.
    ///
    /// The outer error is the fetch itself, in which case no mode was
    /// touched. Each mode's render outcome is reported separately.
    pub async fn render(
        &self,
        modes: &[RenderMode],
    ) -> Result<Vec<(RenderMode, Result<RenderReport>)>> {
        let mut wanted: Vec<RenderMode> = modes.to_vec();
        wanted.sort_by_key(|m| m.index());
        wanted.dedup();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        // Always acquired in index order.
        let mut guards = Vec::with_capacity(wanted.len());
        for mode in &wanted {
            guards.push(self.in_flight[mode.index()].lock().await);
        }

        let label = wanted
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join("+");
        tracing::debug!("Fetching events once for {}", label);
        let (markers, summary) = self.fetch_markers_labeled(&label).await?;

        let mut session = self.session.lock().await;
        let mut outcomes = Vec::with_capacity(wanted.len());
        for mode in wanted {
            let result = Self::dispatch(&mut session, mode, markers.clone(), summary);
            outcomes.push((mode, result));
        }
        Ok(outcomes)
    }

    async fn fetch_markers(&self, mode: RenderMode) -> Result<(Vec<Marker>, BuildSummary)> {
        self.fetch_markers_labeled(&mode.to_string()).await
    }

    async fn fetch_markers_labeled(&self, label: &str) -> Result<(Vec<Marker>, BuildSummary)> {
        let events = match self.source.fetch_events().await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("Fetch for {} failed, keeping current map state: {}", label, e);
                return Err(e);
            }
        };

        let (markers, summary) = build_within(&events, &self.region);
        tracing::debug!(
            "Built {} markers from {} events for {}",
            summary.kept,
            summary.events,
            label
        );
        Ok((markers, summary))
    }

    fn dispatch(
        session: &mut MapSession<S>,
        mode: RenderMode,
        markers: Vec<Marker>,
        summary: BuildSummary,
    ) -> Result<RenderReport> {
        let count = markers.len();
        match mode {
            RenderMode::Markers => session.replace_markers(markers)?,
            RenderMode::Heatmap => session.replace_heatmap(&markers)?,
        }

        tracing::info!("Rendered {} with {} points", mode, count);
        Ok(RenderReport {
            mode,
            events: summary.events,
            markers: count,
            discarded: summary.discarded,
            completed_at: Utc::now(),
        })
    }
}

impl<D, S> FetchOrchestrator<D, S>
where
    D: DataSource + 'static,
    S: MapSurface + 'static,
{
    /// Starts `load_and_render` on its own task. The handle is the
    /// completion signal; dropping it does not cancel the fetch.
    pub fn spawn(&self, mode: RenderMode) -> JoinHandle<Result<RenderReport>> {
        let this = self.clone();
        tokio::spawn(async move { this.load_and_render(mode).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::snapshot::SnapshotProvider;
    use crate::domain::model::{GeoPoint, MapOptions, RawEvent, RawPoint};
    use crate::utils::error::MapError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Serves queued responses in call order, optionally slowly.
    struct QueuedSource {
        responses: std::sync::Mutex<VecDeque<Result<Vec<RawEvent>>>>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl QueuedSource {
        fn new(responses: Vec<Result<Vec<RawEvent>>>, delay: Duration) -> Self {
            Self {
                responses: std::sync::Mutex::new(responses.into()),
                delay,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl DataSource for QueuedSource {
        async fn fetch_events(&self) -> Result<Vec<RawEvent>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.responses.lock().unwrap().pop_front();
            tokio::time::sleep(self.delay).await;
            next.unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn dataset(points: usize) -> Vec<RawEvent> {
        vec![RawEvent {
            id: format!("set-{}", points),
            title: "Rally".to_string(),
            address: "Town Square".to_string(),
            locations: (0..points)
                .map(|i| RawPoint::new(35.0 + i as f64 * 0.01, -95.0))
                .collect(),
        }]
    }

    fn status_error() -> MapError {
        MapError::StatusError {
            url: "http://localhost/events".to_string(),
            status: 500,
        }
    }

    fn orchestrator(source: QueuedSource) -> FetchOrchestrator<QueuedSource, crate::adapters::snapshot::SnapshotSurface> {
        let options = MapOptions {
            container_id: "map".to_string(),
            center: GeoPoint::new(39.50, -98.35),
            zoom: 5,
            scrollwheel: true,
            styles: None,
        };
        let session = MapSession::open(&SnapshotProvider, options).unwrap();
        FetchOrchestrator::new(source, session)
    }

    #[tokio::test]
    async fn test_load_and_render_markers() {
        let orch = orchestrator(QueuedSource::new(vec![Ok(dataset(3))], Duration::ZERO));

        let report = orch.load_and_render(RenderMode::Markers).await.unwrap();

        assert_eq!(report.mode, RenderMode::Markers);
        assert_eq!(report.markers, 3);
        assert_eq!(report.events, 1);
        let session = orch.session();
        let session = session.lock().await;
        assert_eq!(session.marker_count(), 3);
        assert!(!session.has_heatmap());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_markers() {
        let orch = orchestrator(QueuedSource::new(
            vec![Ok(dataset(4)), Err(status_error())],
            Duration::ZERO,
        ));

        orch.load_and_render(RenderMode::Markers).await.unwrap();
        let err = orch.load_and_render(RenderMode::Markers).await.unwrap_err();

        assert!(err.is_fetch_failure());
        let session = orch.session();
        assert_eq!(session.lock().await.marker_count(), 4);
    }

    #[tokio::test]
    async fn test_same_mode_calls_last_finisher_wins() {
        let orch = orchestrator(QueuedSource::new(
            vec![Ok(dataset(2)), Ok(dataset(6))],
            Duration::from_millis(30),
        ));

        let first = orch.spawn(RenderMode::Markers);
        let second = orch.spawn(RenderMode::Markers);
        let a = first.await.unwrap().unwrap();
        let b = second.await.unwrap().unwrap();

        let last = if a.completed_at >= b.completed_at { a } else { b };
        let session = orch.session();
        let session = session.lock().await;
        assert_eq!(session.marker_count(), last.markers);
        assert_eq!(session.surface().pin_count(), last.markers);
    }

    #[tokio::test]
    async fn test_modes_fail_independently() {
        let orch = orchestrator(QueuedSource::new(
            vec![Err(status_error()), Ok(dataset(5))],
            Duration::ZERO,
        ));

        let first = orch.load_and_render(RenderMode::Heatmap).await;
        let second = orch.load_and_render(RenderMode::Markers).await;

        assert!(first.is_err());
        assert_eq!(second.unwrap().markers, 5);
        let session = orch.session();
        let session = session.lock().await;
        assert!(!session.has_heatmap());
        assert_eq!(session.marker_count(), 5);
    }

    #[tokio::test]
    async fn test_concurrent_modes_fail_independently() {
        // The heatmap task starts first and takes the failing response while
        // the markers task is still in flight.
        let orch = orchestrator(QueuedSource::new(
            vec![Err(status_error()), Ok(dataset(5))],
            Duration::from_millis(20),
        ));

        let heatmap = orch.spawn(RenderMode::Heatmap);
        let markers = orch.spawn(RenderMode::Markers);
        let heatmap = heatmap.await.unwrap();
        let markers = markers.await.unwrap();

        assert!(heatmap.unwrap_err().is_fetch_failure());
        assert_eq!(markers.unwrap().markers, 5);
        assert_eq!(orch.source.calls.load(Ordering::SeqCst), 2);
        let session = orch.session();
        let session = session.lock().await;
        assert!(!session.has_heatmap());
        assert_eq!(session.marker_count(), 5);
        assert_eq!(session.surface().pin_count(), 5);
    }

    #[tokio::test]
    async fn test_render_uses_one_fetch_for_both_modes() {
        let source = QueuedSource::new(vec![Ok(dataset(3))], Duration::ZERO);
        let orch = orchestrator(source);

        let outcomes = orch
            .render(&[RenderMode::Heatmap, RenderMode::Markers, RenderMode::Heatmap])
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, RenderMode::Markers);
        assert_eq!(outcomes[1].0, RenderMode::Heatmap);
        assert!(outcomes.iter().all(|(_, r)| r.is_ok()));
        assert_eq!(orch.source.calls.load(Ordering::SeqCst), 1);

        let session = orch.session();
        let session = session.lock().await;
        assert_eq!(session.marker_count(), 3);
        assert_eq!(session.heatmap_points(), Some(3));
    }

    #[tokio::test]
    async fn test_render_fetch_failure_touches_nothing() {
        let orch = orchestrator(QueuedSource::new(vec![Err(status_error())], Duration::ZERO));

        let result = orch.render(&RenderMode::ALL).await;

        assert!(result.is_err());
        let session = orch.session();
        let session = session.lock().await;
        assert_eq!(session.marker_count(), 0);
        assert!(!session.has_heatmap());
    }
}
