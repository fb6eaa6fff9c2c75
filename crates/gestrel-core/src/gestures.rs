//! Gesture executor for Android UiAutomator2 `mobile: *Gesture` commands.
//!
//! This module provides [`GestureExecutor`], a typed wrapper over the
//! session's generic "execute named platform command" primitive. Every
//! gesture is addressed either at an element (by `elementId`) or at a
//! screen region (by `left/top/width/height`), expressed via
//! [`GestureTarget`].
//!
//! Gestures are Android-specific: the executor refuses to construct against
//! a session negotiated for any other platform, so a capability mismatch
//! surfaces once, up front, rather than on every call.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gestrel_core::gestures::{Direction, GestureExecutor, GestureTarget};
//! # use gestrel_core::element::ElementHandle;
//! # use gestrel_core::session::MobileSession;
//!
//! # async fn example(
//! #     session: Arc<dyn MobileSession>,
//! #     feed: &dyn ElementHandle,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let gestures = GestureExecutor::new(session)?;
//!
//! gestures.tap(GestureTarget::Element(feed)).await?;
//! let outcome = gestures
//!     .scroll(GestureTarget::Element(feed), Direction::Down, 0.5, None)
//!     .await?;
//! if outcome.reached_edge {
//!     println!("feed is scrolled to the end");
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::element::ElementHandle;
use crate::geometry::Rect;
use crate::journal::{GestureJournal, GestureKind, GestureRecord};
use crate::session::{MobileSession, PlatformKind, SessionError};

const CMD_CLICK: &str = "mobile: clickGesture";
const CMD_DOUBLE_CLICK: &str = "mobile: doubleClickGesture";
const CMD_LONG_CLICK: &str = "mobile: longClickGesture";
const CMD_SWIPE: &str = "mobile: swipeGesture";
const CMD_SCROLL: &str = "mobile: scrollGesture";
const CMD_FLING: &str = "mobile: flingGesture";
const CMD_DRAG: &str = "mobile: dragGesture";
const CMD_PINCH_OPEN: &str = "mobile: pinchOpenGesture";
const CMD_PINCH_CLOSE: &str = "mobile: pinchCloseGesture";

/// Errors from the gesture layer.
#[derive(Error, Debug)]
pub enum GestureError {
    /// The session was negotiated for a different platform. Fatal; gestures
    /// are platform-specific and never fall back to a generic path.
    #[error("session platform is '{actual}', but mobile gestures require '{expected}'")]
    PlatformMismatch {
        /// The platform the gesture layer supports.
        expected: PlatformKind,
        /// The platform the session was actually created for.
        actual: PlatformKind,
    },

    /// The session failed to execute the command.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Cardinal scroll/swipe direction.
///
/// [`wire_value`](Direction::wire_value) yields the lowercase token the
/// `mobile: *Gesture` commands require in their `direction` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward the top of the screen.
    Up,
    /// Toward the bottom of the screen.
    Down,
    /// Toward the left edge.
    Left,
    /// Toward the right edge.
    Right,
}

impl Direction {
    /// The lowercase wire token: `"up"`, `"down"`, `"left"`, or `"right"`.
    pub fn wire_value(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// What a gesture is aimed at: a live element or a fixed screen region.
#[derive(Clone, Copy)]
pub enum GestureTarget<'a> {
    /// A live element handle; addressed on the wire by `elementId`.
    Element(&'a dyn ElementHandle),
    /// A fixed region; addressed on the wire by `left/top/width/height`.
    Region(Rect),
}

impl<'a> From<&'a dyn ElementHandle> for GestureTarget<'a> {
    fn from(element: &'a dyn ElementHandle) -> Self {
        GestureTarget::Element(element)
    }
}

impl From<Rect> for GestureTarget<'_> {
    fn from(region: Rect) -> Self {
        GestureTarget::Region(region)
    }
}

impl GestureTarget<'_> {
    /// Wire parameters for area-addressed gestures (swipe/scroll/fling/pinch).
    fn area_args(&self) -> Map<String, Value> {
        match self {
            GestureTarget::Element(el) => {
                let mut args = Map::new();
                args.insert("elementId".to_string(), json!(el.element_id()));
                args
            }
            GestureTarget::Region(rect) => rect.region_args(),
        }
    }

    /// Wire parameters for point-addressed gestures (tap/long-press/drag).
    ///
    /// A region target resolves to its center point.
    fn point_args(&self) -> Map<String, Value> {
        match self {
            GestureTarget::Element(el) => {
                let mut args = Map::new();
                args.insert("elementId".to_string(), json!(el.element_id()));
                args
            }
            GestureTarget::Region(rect) => {
                let mut args = Map::new();
                args.insert("x".to_string(), json!(rect.center_x()));
                args.insert("y".to_string(), json!(rect.center_y()));
                args
            }
        }
    }

    /// Short description for logs and journal records.
    fn describe(&self) -> String {
        match self {
            GestureTarget::Element(el) => format!("element:{}", el.element_id()),
            GestureTarget::Region(rect) => {
                format!("region:{}x{}+{}+{}", rect.width, rect.height, rect.x, rect.y)
            }
        }
    }
}

/// Outcome of a scroll or fling gesture.
///
/// The driver reports a single boolean; it is widened here so callers can
/// distinguish "moved but not far enough" from "cannot move further" without
/// re-deriving the negation at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Whether content actually moved (scroll), or whether more content
    /// remains scrollable in that direction (fling).
    pub moved: bool,
    /// Whether the container's scrollable extent is exhausted in the
    /// gesture's direction.
    pub reached_edge: bool,
}

impl ScrollOutcome {
    fn from_wire(moved: bool) -> Self {
        Self {
            moved,
            reached_edge: !moved,
        }
    }
}

/// Issues `mobile: *Gesture` commands against an Android session.
///
/// Holds the session handle it was constructed with; nothing is read from
/// ambient global state. Cheap to clone via the inner [`Arc`].
#[derive(Clone)]
pub struct GestureExecutor {
    session: Arc<dyn MobileSession>,
    journal: Option<GestureJournal>,
    default_speed: Option<u32>,
}

impl GestureExecutor {
    /// Creates an executor for the given session.
    ///
    /// Fails with [`GestureError::PlatformMismatch`] if the session is not
    /// an Android session. The check happens once, here, never per call.
    pub fn new(session: Arc<dyn MobileSession>) -> Result<Self, GestureError> {
        let actual = session.platform();
        if actual != PlatformKind::Android {
            return Err(GestureError::PlatformMismatch {
                expected: PlatformKind::Android,
                actual,
            });
        }
        Ok(Self {
            session,
            journal: None,
            default_speed: None,
        })
    }

    /// Attaches a journal that receives a record of every issued gesture.
    pub fn with_journal(mut self, journal: GestureJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Sets a default speed (px/s) applied when a call passes `speed: None`.
    pub fn with_default_speed(mut self, speed: u32) -> Self {
        self.default_speed = Some(speed);
        self
    }

    /// Returns the session this executor was constructed with.
    pub fn session(&self) -> &Arc<dyn MobileSession> {
        &self.session
    }

    fn record(&self, kind: GestureKind, outcome: Option<bool>) {
        if let Some(journal) = &self.journal {
            journal.record(GestureRecord::new(kind, outcome));
        }
    }

    fn effective_speed(&self, speed: Option<u32>) -> Option<u32> {
        speed.or(self.default_speed)
    }

    async fn dispatch(
        &self,
        command: &str,
        args: Map<String, Value>,
    ) -> Result<Value, GestureError> {
        let result = self.session.execute_mobile(command, Value::Object(args)).await?;
        debug!(command, result = %result, "gesture dispatched");
        Ok(result)
    }

    /// Warns when an element fails the interactivity invariant
    /// (displayed, enabled, `clickable == "true"`). The gesture proceeds
    /// regardless; the platform may still accept it.
    async fn warn_if_not_interactive(&self, target: &GestureTarget<'_>) {
        let GestureTarget::Element(el) = target else {
            return;
        };
        let displayed = el.is_displayed().await.unwrap_or(false);
        let enabled = attr_is_true(*el, "enabled").await;
        let clickable = attr_is_true(*el, "clickable").await;
        if !(displayed && enabled && clickable) {
            warn!(
                element = el.element_id(),
                displayed,
                enabled,
                clickable,
                "element may not be interactive, gesture may not land"
            );
        }
    }

    /// Single tap at the target.
    pub async fn tap(&self, target: GestureTarget<'_>) -> Result<(), GestureError> {
        self.warn_if_not_interactive(&target).await;
        self.dispatch(CMD_CLICK, target.point_args()).await?;
        self.record(
            GestureKind::Tap {
                target: target.describe(),
            },
            None,
        );
        Ok(())
    }

    /// Double tap at the target.
    pub async fn double_tap(&self, target: GestureTarget<'_>) -> Result<(), GestureError> {
        self.warn_if_not_interactive(&target).await;
        self.dispatch(CMD_DOUBLE_CLICK, target.point_args()).await?;
        self.record(
            GestureKind::DoubleTap {
                target: target.describe(),
            },
            None,
        );
        Ok(())
    }

    /// Long press at the target for `duration_ms` milliseconds.
    pub async fn long_press(
        &self,
        target: GestureTarget<'_>,
        duration_ms: u64,
    ) -> Result<(), GestureError> {
        self.warn_if_not_interactive(&target).await;
        let mut args = target.point_args();
        args.insert("duration".to_string(), json!(duration_ms));
        self.dispatch(CMD_LONG_CLICK, args).await?;
        self.record(
            GestureKind::LongPress {
                target: target.describe(),
                duration_ms,
            },
            None,
        );
        Ok(())
    }

    /// Directional swipe over the target area.
    ///
    /// `percent` is the travel distance as a fraction of the area's extent,
    /// in `[0, 1]`.
    pub async fn swipe(
        &self,
        target: GestureTarget<'_>,
        direction: Direction,
        percent: f64,
        speed: Option<u32>,
    ) -> Result<(), GestureError> {
        let speed = self.effective_speed(speed);
        let mut args = target.area_args();
        args.insert("direction".to_string(), json!(direction.wire_value()));
        args.insert("percent".to_string(), json!(percent));
        if let Some(speed) = speed {
            args.insert("speed".to_string(), json!(speed));
        }
        self.dispatch(CMD_SWIPE, args).await?;
        self.record(
            GestureKind::Swipe {
                target: target.describe(),
                direction,
                percent,
                speed,
            },
            None,
        );
        Ok(())
    }

    /// Directional scroll over the target area.
    ///
    /// The outcome's `moved` reflects whether content actually moved; this
    /// boolean is the only feedback the scroll-into-view controller has
    /// about whether further scrolling is possible.
    pub async fn scroll(
        &self,
        target: GestureTarget<'_>,
        direction: Direction,
        percent: f64,
        speed: Option<u32>,
    ) -> Result<ScrollOutcome, GestureError> {
        let speed = self.effective_speed(speed);
        let mut args = target.area_args();
        args.insert("direction".to_string(), json!(direction.wire_value()));
        args.insert("percent".to_string(), json!(percent));
        if let Some(speed) = speed {
            args.insert("speed".to_string(), json!(speed));
        }
        let result = self.dispatch(CMD_SCROLL, args).await?;
        let outcome = ScrollOutcome::from_wire(result.as_bool().unwrap_or(false));
        self.record(
            GestureKind::Scroll {
                target: target.describe(),
                direction,
                percent,
                speed,
            },
            Some(outcome.moved),
        );
        Ok(outcome)
    }

    /// Fast directional fling over the target area.
    ///
    /// The driver's boolean means "more content remains scrollable in that
    /// direction"; it is surfaced the same way as [`scroll`](Self::scroll).
    pub async fn fling(
        &self,
        target: GestureTarget<'_>,
        direction: Direction,
        speed: Option<u32>,
    ) -> Result<ScrollOutcome, GestureError> {
        let speed = self.effective_speed(speed);
        let mut args = target.area_args();
        args.insert("direction".to_string(), json!(direction.wire_value()));
        if let Some(speed) = speed {
            args.insert("speed".to_string(), json!(speed));
        }
        let result = self.dispatch(CMD_FLING, args).await?;
        let outcome = ScrollOutcome::from_wire(result.as_bool().unwrap_or(false));
        self.record(
            GestureKind::Fling {
                target: target.describe(),
                direction,
                speed,
            },
            Some(outcome.moved),
        );
        Ok(outcome)
    }

    /// Drag from the target to absolute screen coordinates.
    pub async fn drag(
        &self,
        target: GestureTarget<'_>,
        end_x: i32,
        end_y: i32,
        speed: Option<u32>,
    ) -> Result<(), GestureError> {
        let speed = self.effective_speed(speed);
        let mut args = match target {
            GestureTarget::Element(el) => {
                let mut args = Map::new();
                args.insert("elementId".to_string(), json!(el.element_id()));
                args
            }
            GestureTarget::Region(rect) => {
                let mut args = Map::new();
                args.insert("startX".to_string(), json!(rect.center_x()));
                args.insert("startY".to_string(), json!(rect.center_y()));
                args
            }
        };
        args.insert("endX".to_string(), json!(end_x));
        args.insert("endY".to_string(), json!(end_y));
        if let Some(speed) = speed {
            args.insert("speed".to_string(), json!(speed));
        }
        self.dispatch(CMD_DRAG, args).await?;
        self.record(
            GestureKind::Drag {
                target: target.describe(),
                end_x,
                end_y,
                speed,
            },
            None,
        );
        Ok(())
    }

    /// Pinch-open (zoom in) over the target area. `percent` in `[0, 1]`.
    pub async fn pinch_open(
        &self,
        target: GestureTarget<'_>,
        percent: f64,
        speed: Option<u32>,
    ) -> Result<(), GestureError> {
        self.pinch(CMD_PINCH_OPEN, target, percent, speed, true).await
    }

    /// Pinch-close (zoom out) over the target area. `percent` in `[0, 1]`.
    pub async fn pinch_close(
        &self,
        target: GestureTarget<'_>,
        percent: f64,
        speed: Option<u32>,
    ) -> Result<(), GestureError> {
        self.pinch(CMD_PINCH_CLOSE, target, percent, speed, false).await
    }

    async fn pinch(
        &self,
        command: &str,
        target: GestureTarget<'_>,
        percent: f64,
        speed: Option<u32>,
        open: bool,
    ) -> Result<(), GestureError> {
        let speed = self.effective_speed(speed);
        let mut args = target.area_args();
        args.insert("percent".to_string(), json!(percent));
        if let Some(speed) = speed {
            args.insert("speed".to_string(), json!(speed));
        }
        self.dispatch(command, args).await?;
        let kind = if open {
            GestureKind::PinchOpen {
                target: target.describe(),
                percent,
                speed,
            }
        } else {
            GestureKind::PinchClose {
                target: target.describe(),
                percent,
                speed,
            }
        };
        self.record(kind, None);
        Ok(())
    }

    /// Scrolls the container all the way to the bottom: flings down until
    /// the edge is reached, then issues one closing full-percent scroll.
    pub async fn scroll_to_bottom(
        &self,
        container: &dyn ElementHandle,
    ) -> Result<(), GestureError> {
        loop {
            let outcome = self
                .fling(GestureTarget::Element(container), Direction::Down, None)
                .await?;
            if outcome.reached_edge {
                break;
            }
        }
        self.scroll(GestureTarget::Element(container), Direction::Down, 1.0, None)
            .await?;
        Ok(())
    }

    /// Scrolls up to `steps` times in `direction`, `percent_per_step` of the
    /// container per step. Stops early when content stops moving.
    ///
    /// Returns the number of steps that actually moved content.
    pub async fn scroll_n_steps(
        &self,
        container: &dyn ElementHandle,
        direction: Direction,
        steps: u32,
        percent_per_step: f64,
    ) -> Result<u32, GestureError> {
        let mut performed = 0;
        for _ in 0..steps {
            let outcome = self
                .scroll(
                    GestureTarget::Element(container),
                    direction,
                    percent_per_step,
                    None,
                )
                .await?;
            if !outcome.moved {
                break;
            }
            performed += 1;
        }
        Ok(performed)
    }
}

/// True when the attribute exists and equals `"true"` (case-insensitive).
async fn attr_is_true(el: &dyn ElementHandle, name: &str) -> bool {
    match el.attribute(name).await {
        Ok(Some(value)) => value.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
