//! Scroll-into-view convergence controller.
//!
//! Given a scrollable container and a target element that is not currently
//! fully visible, [`GestureExecutor::bring_fully_into_view`] repeatedly
//! issues directional scrolls until the target sits entirely within the
//! container's vertical bounds, or the deadline elapses.
//!
//! The loop is a bounded-time poll. Each tick re-reads live geometry (the
//! UI may re-layout between ticks, so rectangles are never cached) and runs
//! one step of a small state machine:
//!
//! 1. **Search**: the target is not displayed: scroll the container down
//!    by half its extent and try again next tick.
//! 2. **Containment**: the target's top and bottom both lie within the
//!    container: done.
//! 3. **Adjustment**: the target overflows the top or bottom edge: scroll
//!    toward it by the overflow fraction plus a small margin, clamped so a
//!    correction can neither stall on sub-pixel steps nor throw the target
//!    out the opposite side.
//!
//! Between ticks the task suspends via [`tokio::time::sleep`]; nothing
//! spins. The only failure mode is [`ScrollError::Timeout`].

use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, info_span, trace, Instrument};

use crate::config::GestrelConfig;
use crate::element::ElementHandle;
use crate::geometry::Rect;
use crate::gestures::{Direction, GestureError, GestureExecutor, GestureTarget};

/// Default overall deadline for one convergence attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// Default pause between poll ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Fraction of the container scrolled per search-phase step.
const SEARCH_PERCENT: f64 = 0.5;

/// Margin added on top of the exact overflow fraction so an adjustment
/// always makes visible progress.
const ADJUST_MARGIN: f64 = 0.1;

/// Bounds on the adjustment percent. The lower bound prevents looping
/// forever on sub-pixel corrections; the upper bound prevents scrolling the
/// target back out of view on the opposite side.
const MIN_ADJUST_PERCENT: f64 = 0.15;
const MAX_ADJUST_PERCENT: f64 = 0.85;

/// Errors from the convergence controller.
#[derive(Error, Debug)]
pub enum ScrollError {
    /// The target did not become fully visible before the deadline.
    #[error("target not fully visible after {elapsed:?}")]
    Timeout {
        /// Wall time spent polling before giving up.
        elapsed: Duration,
    },

    /// A gesture could not be issued.
    #[error(transparent)]
    Gesture(#[from] GestureError),
}

/// Timing parameters for one convergence attempt.
#[derive(Debug, Clone, Copy)]
pub struct ScrollOptions {
    /// Overall deadline.
    pub timeout: Duration,
    /// Pause between poll ticks.
    pub poll_interval: Duration,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ScrollOptions {
    /// Options taken from persistent configuration.
    pub fn from_config(config: &GestrelConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.scroll_timeout_ms),
            poll_interval: Duration::from_millis(config.scroll_poll_interval_ms),
        }
    }
}

/// What one poll tick concluded.
enum Tick {
    /// The target is fully inside the container.
    Converged,
    /// A gesture was issued (or geometry was unreadable); poll again.
    Pending,
}

/// Adjustment percent for a given pixel overflow against the container
/// height: the overflow fraction plus [`ADJUST_MARGIN`], clamped to
/// `[MIN_ADJUST_PERCENT, MAX_ADJUST_PERCENT]`.
///
/// A degenerate zero-height container yields the maximum, since no finite
/// fraction of it is meaningful.
pub(crate) fn adjust_percent(overflow_px: i32, container_height: i32) -> f64 {
    let ratio = if container_height > 0 {
        overflow_px as f64 / container_height as f64
    } else {
        1.0
    };
    (ratio + ADJUST_MARGIN).clamp(MIN_ADJUST_PERCENT, MAX_ADJUST_PERCENT)
}

async fn safe_displayed(element: &dyn ElementHandle) -> bool {
    match element.is_displayed().await {
        Ok(displayed) => displayed,
        Err(e) => {
            // Mid-relayout staleness counts as "not displayed" for this tick.
            trace!(element = element.element_id(), error = %e, "displayed query failed");
            false
        }
    }
}

async fn safe_rect(element: &dyn ElementHandle) -> Option<Rect> {
    match element.bounding_rect().await {
        Ok(rect) => Some(rect),
        Err(e) => {
            trace!(element = element.element_id(), error = %e, "bounds query failed");
            None
        }
    }
}

impl GestureExecutor {
    /// Scrolls `container` until `target` is displayed and entirely within
    /// the container's vertical bounds, using default timing.
    pub async fn scroll_into_view(
        &self,
        container: &dyn ElementHandle,
        target: &dyn ElementHandle,
    ) -> Result<(), ScrollError> {
        self.bring_fully_into_view(container, target, &ScrollOptions::default())
            .await
    }

    /// Scrolls `container` until `target` is displayed and entirely within
    /// the container's vertical bounds.
    ///
    /// Blocks (asynchronously) until convergence or the deadline. The first
    /// tick runs before any waiting, so a target that is already fully
    /// visible returns immediately without issuing a single gesture.
    ///
    /// # Errors
    ///
    /// [`ScrollError::Timeout`] when the deadline elapses without
    /// convergence. Known limitation: when the container has exhausted its
    /// scrollable extent and the target never appears, the search phase
    /// keeps issuing no-op scrolls until the deadline; the "did not move"
    /// result is not treated as a fast-fail signal.
    pub async fn bring_fully_into_view(
        &self,
        container: &dyn ElementHandle,
        target: &dyn ElementHandle,
        options: &ScrollOptions,
    ) -> Result<(), ScrollError> {
        let span = info_span!(
            "bring_fully_into_view",
            container = container.element_id(),
            target = target.element_id(),
            timeout_ms = options.timeout.as_millis() as u64,
        );
        async move {
            let started = Instant::now();
            let deadline = started + options.timeout;
            loop {
                if let Tick::Converged = self.convergence_tick(container, target).await? {
                    debug!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "target fully visible in container"
                    );
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    return Err(ScrollError::Timeout {
                        elapsed: started.elapsed(),
                    });
                }
                sleep(options.poll_interval).await;
            }
        }
        .instrument(span)
        .await
    }

    /// One evaluation of the convergence state machine.
    async fn convergence_tick(
        &self,
        container: &dyn ElementHandle,
        target: &dyn ElementHandle,
    ) -> Result<Tick, ScrollError> {
        // Search phase: target not visible yet, take a big step down. The
        // "did it move" result is logged but not acted on.
        if !safe_displayed(target).await {
            let outcome = self
                .scroll(GestureTarget::Element(container), Direction::Down, SEARCH_PERCENT, None)
                .await?;
            debug!(moved = outcome.moved, "search: target not displayed, scrolled down");
            return Ok(Tick::Pending);
        }

        // Fresh geometry every tick.
        let (container_rect, target_rect) =
            match (safe_rect(container).await, safe_rect(target).await) {
                (Some(c), Some(t)) => (c, t),
                _ => {
                    // Bounds went stale between the displayed check and the
                    // read; same treatment as "not displayed".
                    let outcome = self
                        .scroll(
                            GestureTarget::Element(container),
                            Direction::Down,
                            SEARCH_PERCENT,
                            None,
                        )
                        .await?;
                    debug!(moved = outcome.moved, "search: geometry unreadable, scrolled down");
                    return Ok(Tick::Pending);
                }
            };

        let container_top = container_rect.top();
        let container_bottom = container_rect.bottom();
        let target_top = target_rect.top();
        let target_bottom = target_rect.bottom();

        if target_top >= container_top && target_bottom <= container_bottom {
            return Ok(Tick::Converged);
        }

        if target_top < container_top {
            let percent = adjust_percent(container_top - target_top, container_rect.height);
            let outcome = self
                .scroll(GestureTarget::Element(container), Direction::Up, percent, None)
                .await?;
            debug!(
                overflow = container_top - target_top,
                percent,
                moved = outcome.moved,
                "adjust: top overflow, scrolled up"
            );
            return Ok(Tick::Pending);
        }

        // target_bottom > container_bottom
        let percent = adjust_percent(target_bottom - container_bottom, container_rect.height);
        let outcome = self
            .scroll(GestureTarget::Element(container), Direction::Down, percent, None)
            .await?;
        debug!(
            overflow = target_bottom - container_bottom,
            percent,
            moved = outcome.moved,
            "adjust: bottom overflow, scrolled down"
        );
        Ok(Tick::Pending)
    }
}
