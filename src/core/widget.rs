use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::orchestrator::FetchOrchestrator;
use crate::core::session::MapSession;
use crate::core::{ConfigProvider, DataSource, MapProvider, MapSurface};
use crate::domain::model::{MapOptions, RenderMode, RenderReport};
use crate::domain::style::political_style;
use crate::utils::error::{MapError, Result};

pub fn map_options<C: ConfigProvider>(config: &C) -> MapOptions {
    MapOptions {
        container_id: config.container_id().to_string(),
        center: config.initial_region(),
        zoom: 5,
        scrollwheel: true,
        styles: config.is_political().then(political_style),
    }
}

/// Per-mode outcome of one widget render.
#[derive(Debug)]
pub struct RenderOutcome {
    pub mode: RenderMode,
    pub result: Result<RenderReport>,
}

/// The embeddable map: one session, the enabled render modes and the
/// orchestrator that feeds them.
pub struct MapWidget<D, S: MapSurface> {
    orchestrator: FetchOrchestrator<D, S>,
    modes: Vec<RenderMode>,
}

impl<D, S> MapWidget<D, S>
where
    D: DataSource + 'static,
    S: MapSurface + 'static,
{
    pub fn start<C, P>(config: &C, provider: &P, source: D) -> Result<Self>
    where
        C: ConfigProvider,
        P: MapProvider<Surface = S>,
    {
        let session = MapSession::open(provider, map_options(config))?;
        let modes = config.enabled_modes();

        tracing::info!(
            "Map widget started in '{}' for {}",
            config.container_id(),
            config.api_path()
        );
        Ok(Self {
            orchestrator: FetchOrchestrator::new(source, session),
            modes,
        })
    }

    pub fn modes(&self) -> &[RenderMode] {
        &self.modes
    }

    pub fn session(&self) -> Arc<Mutex<MapSession<S>>> {
        self.orchestrator.session()
    }

    pub fn orchestrator(&self) -> &FetchOrchestrator<D, S> {
        &self.orchestrator
    }

    /// Renders every enabled mode from one shared fetch. Failures are logged
    /// and returned per mode; nothing here panics.
    pub async fn render(&self) -> Vec<RenderOutcome> {
        if self.modes.is_empty() {
            return Vec::new();
        }

        match self.orchestrator.render(&self.modes).await {
            Ok(outcomes) => outcomes
                .into_iter()
                .map(|(mode, result)| {
                    if let Err(e) = &result {
                        tracing::error!("❌ Rendering {} failed: {}", mode, e);
                    }
                    RenderOutcome { mode, result }
                })
                .collect(),
            Err(e) => {
                tracing::error!("❌ Fetch failed, map left unchanged: {}", e);
                let mut outcomes: Vec<RenderOutcome> = self.modes[1..]
                    .iter()
                    .map(|mode| RenderOutcome {
                        mode: *mode,
                        result: Err(e.shared()),
                    })
                    .collect();
                outcomes.insert(
                    0,
                    RenderOutcome {
                        mode: self.modes[0],
                        result: Err(e),
                    },
                );
                outcomes
            }
        }
    }

    /// Fetches once per enabled mode, concurrently. A failure in one mode
    /// never affects the other.
    pub async fn render_separately(&self) -> Vec<RenderOutcome> {
        let handles: Vec<_> = self
            .modes
            .iter()
            .map(|mode| (*mode, self.orchestrator.spawn(*mode)))
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (mode, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(MapError::TaskError {
                    message: format!("{} render task: {}", mode, e),
                }),
            };
            if let Err(e) = &result {
                tracing::error!("❌ Rendering {} failed: {}", mode, e);
            }
            outcomes.push(RenderOutcome { mode, result });
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::snapshot::SnapshotProvider;
    use crate::config::SessionConfig;
    use crate::domain::model::{RawEvent, RawPoint};
    use crate::utils::error::{ErrorCategory, ErrorSeverity};

    struct FixedSource(Vec<RawEvent>);

    #[async_trait::async_trait]
    impl DataSource for FixedSource {
        async fn fetch_events(&self) -> Result<Vec<RawEvent>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    #[async_trait::async_trait]
    impl DataSource for BrokenSource {
        async fn fetch_events(&self) -> Result<Vec<RawEvent>> {
            Err(MapError::StatusError {
                url: "http://localhost/events".to_string(),
                status: 503,
            })
        }
    }

    fn events() -> Vec<RawEvent> {
        vec![RawEvent {
            id: "1".to_string(),
            title: "A".to_string(),
            address: "x".to_string(),
            locations: vec![RawPoint::new(40.0, -100.0), RawPoint::new(10.0, -100.0)],
        }]
    }

    #[test]
    fn test_map_options_style_follows_political_flag() {
        let mut config = SessionConfig::new("https://example.com", "map");
        assert_eq!(map_options(&config).styles.map(|s| s.len()), Some(27));

        config.is_political = false;
        let options = map_options(&config);
        assert!(options.styles.is_none());
        assert_eq!(options.zoom, 5);
    }

    #[tokio::test]
    async fn test_render_enabled_modes() {
        let config = SessionConfig::new("https://example.com", "map");
        let widget = MapWidget::start(&config, &SnapshotProvider, FixedSource(events())).unwrap();

        let outcomes = widget.render().await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
        let session = widget.session();
        let session = session.lock().await;
        assert_eq!(session.marker_count(), 1);
        assert_eq!(session.heatmap_points(), Some(1));
    }

    #[tokio::test]
    async fn test_render_only_markers() {
        let mut config = SessionConfig::new("https://example.com", "map");
        config.show_heatmap = false;
        let widget = MapWidget::start(&config, &SnapshotProvider, FixedSource(events())).unwrap();

        assert_eq!(widget.modes(), config.enabled_modes().as_slice());
        let outcomes = widget.render_separately().await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].mode, RenderMode::Markers);
        let session = widget.session();
        assert!(!session.lock().await.has_heatmap());
    }

    #[tokio::test]
    async fn test_fetch_failure_reported_for_every_mode() {
        let config = SessionConfig::new("https://example.com", "map");
        let widget = MapWidget::start(&config, &SnapshotProvider, BrokenSource).unwrap();

        let outcomes = widget.render().await;

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0].result, Err(MapError::StatusError { status: 503, .. })));
        for outcome in &outcomes {
            let err = outcome.result.as_ref().unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Network);
            assert_eq!(err.severity(), ErrorSeverity::Medium);
            assert!(err.is_fetch_failure());
        }

        let separate = widget.render_separately().await;
        assert!(separate.iter().all(|o| o.result.is_err()));
        assert_eq!(widget.session().lock().await.marker_count(), 0);
    }
}
