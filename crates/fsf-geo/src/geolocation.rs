//! One-shot acquisition of the user's current position.
//!
//! A [`GeolocationProvider`] wraps an injectable [`PositionSource`] (the
//! host's positioning capability, or a fake in tests) and exposes the
//! outcome as a tri-state [`GeoLocationResult`]. Each activation issues
//! exactly one request; nothing is polled, cached, or retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fsf_core::Coordinate;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::GeolocationError;

/// Request parameters handed to the positioning capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the source may return. Zero demands a fresh reading.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

impl PositionOptions {
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

/// The host's positioning capability.
pub trait PositionSource: Send + Sync {
    /// Whether the host offers positioning at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Obtain a single fix.
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send;
}

/// Outcome of one acquisition attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GeoLocationResult {
    #[default]
    Pending,
    Resolved(Coordinate),
    Failed(String),
}

impl GeoLocationResult {
    #[must_use]
    pub fn user_location(&self) -> Option<Coordinate> {
        match self {
            GeoLocationResult::Resolved(c) => Some(*c),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            GeoLocationResult::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, GeoLocationResult::Pending)
    }

    fn failed(err: &GeolocationError) -> Self {
        GeoLocationResult::Failed(err.to_string())
    }
}

/// What happened to an activation's result once it arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The consumer was torn down first; the result was dropped.
    Discarded,
}

/// Owns the position source and the request options.
#[derive(Debug)]
pub struct GeolocationProvider<S> {
    source: Arc<S>,
    options: PositionOptions,
}

impl<S> Clone for GeolocationProvider<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            options: self.options.clone(),
        }
    }
}

impl<S: PositionSource + 'static> GeolocationProvider<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            options: PositionOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Run one acquisition to completion on the current task.
    pub async fn acquire(&self) -> GeoLocationResult {
        acquire_with(self.source.as_ref(), &self.options).await
    }

    /// Start one acquisition in the background.
    ///
    /// The returned watch reads `Pending` until the request settles. Dropping
    /// or [unmounting](LocationWatch::unmount) it before then makes the
    /// background task discard the result instead of publishing it.
    #[must_use]
    pub fn activate(&self) -> LocationWatch {
        let (tx, rx) = watch::channel(GeoLocationResult::Pending);
        let source = Arc::clone(&self.source);
        let options = self.options.clone();

        let task = tokio::spawn(async move {
            let result = acquire_with(source.as_ref(), &options).await;
            if tx.send(result).is_err() {
                tracing::debug!("location consumer torn down; discarding result");
                Delivery::Discarded
            } else {
                Delivery::Delivered
            }
        });

        LocationWatch { rx, task }
    }
}

async fn acquire_with<S: PositionSource>(
    source: &S,
    options: &PositionOptions,
) -> GeoLocationResult {
    if !source.is_supported() {
        tracing::warn!("positioning capability absent");
        return GeoLocationResult::failed(&GeolocationError::Unsupported);
    }

    tracing::debug!(
        high_accuracy = options.high_accuracy,
        timeout_ms = u64::try_from(options.timeout.as_millis()).unwrap_or(u64::MAX),
        "requesting current position"
    );

    let outcome = match tokio::time::timeout(options.timeout, source.current_position(options))
        .await
    {
        Ok(Ok(reported)) => Coordinate::new(reported.latitude, reported.longitude)
            .map_err(|e| GeolocationError::PositionUnavailable(e.to_string())),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(GeolocationError::Timeout),
    };

    match outcome {
        Ok(coordinate) => {
            tracing::info!(%coordinate, "position resolved");
            GeoLocationResult::Resolved(coordinate)
        }
        Err(err) => {
            tracing::warn!(error = %err, "position acquisition failed");
            GeoLocationResult::failed(&err)
        }
    }
}

/// Consumer side of one activation.
#[derive(Debug)]
pub struct LocationWatch {
    rx: watch::Receiver<GeoLocationResult>,
    task: JoinHandle<Delivery>,
}

impl LocationWatch {
    /// Snapshot of the current state.
    #[must_use]
    pub fn current(&self) -> GeoLocationResult {
        self.rx.borrow().clone()
    }

    /// Wait until the activation leaves `Pending`.
    pub async fn settled(&mut self) -> GeoLocationResult {
        match self.rx.wait_for(|r| !r.is_loading()).await {
            Ok(result) => result.clone(),
            Err(_) => GeoLocationResult::failed(&GeolocationError::Aborted),
        }
    }

    /// Tear down the consumer before the result arrives.
    ///
    /// The returned handle reports whether the result was discarded.
    pub fn unmount(self) -> JoinHandle<Delivery> {
        drop(self.rx);
        self.task
    }
}

/// A source that always reports the same coordinate.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinate);

impl PositionSource for FixedPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinate, GeolocationError> {
        Ok(self.0)
    }
}

/// A host without any positioning capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl PositionSource for Unsupported {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinate, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_demand_fresh_high_accuracy_fix() {
        let options = PositionOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::ZERO);
    }

    #[test]
    fn with_timeout_keeps_other_defaults() {
        let options = PositionOptions::with_timeout(Duration::from_millis(2500));
        assert_eq!(options.timeout, Duration::from_millis(2500));
        assert!(options.high_accuracy);
        assert_eq!(options.maximum_age, Duration::ZERO);
    }

    #[test]
    fn result_accessors_match_state() {
        let c = Coordinate {
            latitude: 1.0,
            longitude: 2.0,
        };

        let pending = GeoLocationResult::default();
        assert!(pending.is_loading());
        assert_eq!(pending.user_location(), None);
        assert_eq!(pending.error(), None);

        let resolved = GeoLocationResult::Resolved(c);
        assert!(!resolved.is_loading());
        assert_eq!(resolved.user_location(), Some(c));
        assert_eq!(resolved.error(), None);

        let failed = GeoLocationResult::Failed("nope".to_string());
        assert!(!failed.is_loading());
        assert_eq!(failed.user_location(), None);
        assert_eq!(failed.error(), Some("nope"));
    }

    #[tokio::test]
    async fn fixed_position_resolves() {
        let c = Coordinate {
            latitude: 12.9716,
            longitude: 77.5946,
        };
        let provider = GeolocationProvider::new(FixedPosition(c));
        assert_eq!(provider.acquire().await, GeoLocationResult::Resolved(c));
    }

    #[tokio::test]
    async fn unsupported_host_fails_with_not_supported_message() {
        let provider = GeolocationProvider::new(Unsupported);
        assert_eq!(
            provider.acquire().await,
            GeoLocationResult::Failed("Geolocation is not supported by this browser.".to_string())
        );
    }

    #[tokio::test]
    async fn invalid_reported_fix_is_unavailable() {
        let provider = GeolocationProvider::new(FixedPosition(Coordinate {
            latitude: 91.0,
            longitude: 0.0,
        }));
        let result = provider.acquire().await;
        let reason = result.error().expect("should fail");
        assert!(reason.starts_with("Position unavailable"), "got {reason}");
    }
}
