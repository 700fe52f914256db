//! Body name to sky position, with per-body failure isolation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use thiserror::Error;

use crate::core::{HorizontalPosition, Observer};
use crate::ephemeris::{AstronomyEngine, EphemerisError};

/// Why a body could not be placed this frame
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("{body}: {source}")]
    Engine {
        body: String,
        #[source]
        source: EphemerisError,
    },

    #[error("{body}: engine returned non-finite position (az {azimuth}, alt {altitude})")]
    NonFinite { body: String, azimuth: f64, altitude: f64 },
}

impl ResolveError {
    pub fn body(&self) -> &str {
        match self {
            ResolveError::Engine { body, .. } | ResolveError::NonFinite { body, .. } => body,
        }
    }
}

/// Adapter over an [`AstronomyEngine`] that keeps count of consecutive
/// failures per body.
pub struct CelestialResolver {
    engine: Box<dyn AstronomyEngine>,
    consecutive_failures: HashMap<String, u32>,
    unresolvable_after: u32,
    newly_unresolvable: Vec<String>,
}

impl CelestialResolver {
    pub fn new(engine: Box<dyn AstronomyEngine>) -> Self {
        Self::with_threshold(engine, 30)
    }

    /// `unresolvable_after` consecutive failures mark a body as unresolvable;
    /// 0 disables the check
    pub fn with_threshold(engine: Box<dyn AstronomyEngine>, unresolvable_after: u32) -> Self {
        Self {
            engine,
            consecutive_failures: HashMap::new(),
            unresolvable_after,
            newly_unresolvable: Vec::new(),
        }
    }

    pub fn set_threshold(&mut self, unresolvable_after: u32) {
        self.unresolvable_after = unresolvable_after;
    }

    pub fn supported_bodies(&self) -> Vec<String> {
        self.engine.supported_bodies()
    }

    /// Position of `body` for `observer` at `time`, without bookkeeping
    pub fn resolve(
        &self,
        body: &str,
        time: DateTime<Utc>,
        observer: &Observer,
    ) -> Result<HorizontalPosition, ResolveError> {
        let position = self
            .engine
            .horizontal_position(body, time, observer)
            .map_err(|source| ResolveError::Engine {
                body: body.to_string(),
                source,
            })?;

        if !position.is_finite() {
            return Err(ResolveError::NonFinite {
                body: body.to_string(),
                azimuth: position.azimuth,
                altitude: position.altitude,
            });
        }
        Ok(position)
    }

    /// Resolve and update the failure counters
    pub fn resolve_tracked(
        &mut self,
        body: &str,
        time: DateTime<Utc>,
        observer: &Observer,
    ) -> Result<HorizontalPosition, ResolveError> {
        let result = self.resolve(body, time, observer);
        match &result {
            Ok(_) => self.record_success(body),
            Err(err) => self.record_failure(body, err),
        }
        result
    }

    fn record_success(&mut self, body: &str) {
        if let Some(failures) = self.consecutive_failures.remove(body) {
            if self.unresolvable_after > 0 && failures >= self.unresolvable_after {
                info!("{} resolved again after {} failed frames", body, failures);
            }
        }
    }

    fn record_failure(&mut self, body: &str, err: &ResolveError) {
        let count = self.consecutive_failures.entry(body.to_string()).or_insert(0);
        *count += 1;

        if *count == 1 {
            debug!("Skipping {} this frame: {}", body, err);
        }
        if self.unresolvable_after > 0 && *count == self.unresolvable_after {
            warn!("{} has failed {} frames in a row: {}", body, count, err);
            self.newly_unresolvable.push(body.to_string());
        }
    }

    /// Consecutive failed frames for `body`
    pub fn failure_count(&self, body: &str) -> u32 {
        self.consecutive_failures.get(body).copied().unwrap_or(0)
    }

    /// Bodies that crossed the failure threshold since the last call
    pub fn take_newly_unresolvable(&mut self) -> Vec<String> {
        std::mem::take(&mut self.newly_unresolvable)
    }

    /// Forget the failure history of a body, e.g. when it is untracked
    pub fn forget(&mut self, body: &str) {
        self.consecutive_failures.remove(body);
    }
}

impl std::fmt::Debug for CelestialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CelestialResolver")
            .field("consecutive_failures", &self.consecutive_failures)
            .field("unresolvable_after", &self.unresolvable_after)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::StaticSkyEngine;

    fn resolver(threshold: u32) -> CelestialResolver {
        let engine = StaticSkyEngine::new()
            .with_body("Moon", 120.0, 30.0)
            .with_body("Glitch", f64::NAN, 10.0)
            .with_failure("Mars", EphemerisError::CalculationError("no data".to_string()));
        CelestialResolver::with_threshold(Box::new(engine), threshold)
    }

    #[test]
    fn test_resolve_success_and_failure() {
        let resolver = resolver(3);
        let now = Utc::now();
        let observer = Observer::default();

        let moon = resolver.resolve("Moon", now, &observer).unwrap();
        assert_eq!(moon, HorizontalPosition::new(120.0, 30.0));

        let err = resolver.resolve("Mars", now, &observer).unwrap_err();
        assert_eq!(err.body(), "Mars");
        assert!(matches!(err, ResolveError::Engine { .. }));
    }

    #[test]
    fn test_non_finite_output_is_an_error() {
        let resolver = resolver(3);
        let err = resolver.resolve("Glitch", Utc::now(), &Observer::default()).unwrap_err();
        assert!(matches!(err, ResolveError::NonFinite { .. }));
    }

    #[test]
    fn test_threshold_reported_once() {
        let mut resolver = resolver(3);
        let now = Utc::now();
        let observer = Observer::default();

        for _ in 0..5 {
            let _ = resolver.resolve_tracked("Mars", now, &observer);
            let _ = resolver.resolve_tracked("Moon", now, &observer);
        }
        assert_eq!(resolver.failure_count("Mars"), 5);
        assert_eq!(resolver.failure_count("Moon"), 0);
        assert_eq!(resolver.take_newly_unresolvable(), vec!["Mars".to_string()]);
        assert!(resolver.take_newly_unresolvable().is_empty());

        resolver.forget("Mars");
        assert_eq!(resolver.failure_count("Mars"), 0);
    }

    #[test]
    fn test_zero_threshold_disables_reporting() {
        let mut resolver = resolver(0);
        for _ in 0..40 {
            let _ = resolver.resolve_tracked("Mars", Utc::now(), &Observer::default());
        }
        assert!(resolver.take_newly_unresolvable().is_empty());
    }
}
