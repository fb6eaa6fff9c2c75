//! Gesture journal for report attachment.
//!
//! Every gesture the executor issues can be recorded as a [`GestureRecord`]
//! in a shared [`GestureJournal`]. The reporting layer (out of scope for
//! this crate) drains the journal at the end of a test and attaches it to
//! the report.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gestures::Direction;

/// A gesture that was issued, with its parameters.
///
/// Serialized with a `type` tag so the reporting layer can render entries
/// without knowing the variant set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GestureKind {
    /// Single tap.
    Tap {
        /// Target description (`element:<id>` or `region:<w>x<h>+<x>+<y>`).
        target: String,
    },
    /// Double tap.
    DoubleTap {
        /// Target description.
        target: String,
    },
    /// Long press.
    LongPress {
        /// Target description.
        target: String,
        /// Hold duration in milliseconds.
        duration_ms: u64,
    },
    /// Directional swipe.
    Swipe {
        /// Target description.
        target: String,
        /// Swipe direction.
        direction: Direction,
        /// Travel distance as a fraction of the area.
        percent: f64,
        /// Speed in px/s, if one was set.
        speed: Option<u32>,
    },
    /// Directional scroll.
    Scroll {
        /// Target description.
        target: String,
        /// Scroll direction.
        direction: Direction,
        /// Travel distance as a fraction of the area.
        percent: f64,
        /// Speed in px/s, if one was set.
        speed: Option<u32>,
    },
    /// Directional fling.
    Fling {
        /// Target description.
        target: String,
        /// Fling direction.
        direction: Direction,
        /// Speed in px/s, if one was set.
        speed: Option<u32>,
    },
    /// Drag to absolute coordinates.
    Drag {
        /// Target description.
        target: String,
        /// Destination x.
        end_x: i32,
        /// Destination y.
        end_y: i32,
        /// Speed in px/s, if one was set.
        speed: Option<u32>,
    },
    /// Pinch-open (zoom in).
    PinchOpen {
        /// Target description.
        target: String,
        /// Pinch magnitude as a fraction of the area.
        percent: f64,
        /// Speed in px/s, if one was set.
        speed: Option<u32>,
    },
    /// Pinch-close (zoom out).
    PinchClose {
        /// Target description.
        target: String,
        /// Pinch magnitude as a fraction of the area.
        percent: f64,
        /// Speed in px/s, if one was set.
        speed: Option<u32>,
    },
}

/// One journal entry: a gesture, when it happened, and its wire outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureRecord {
    /// Unique id of this record.
    pub id: Uuid,
    /// When the gesture was issued.
    pub at: DateTime<Utc>,
    /// The gesture and its parameters.
    pub kind: GestureKind,
    /// The driver's boolean result for scroll/fling; `None` for gestures
    /// that return nothing.
    pub outcome: Option<bool>,
}

impl GestureRecord {
    /// Creates a record stamped with a fresh id and the current time.
    pub fn new(kind: GestureKind, outcome: Option<bool>) -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
            kind,
            outcome,
        }
    }
}

/// Shared, append-only sink of gesture records.
///
/// Cloning is cheap; clones share the same underlying buffer.
#[derive(Clone, Default)]
pub struct GestureJournal {
    records: Arc<Mutex<Vec<GestureRecord>>>,
}

impl GestureJournal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn record(&self, record: GestureRecord) {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(record);
    }

    /// Removes and returns all records accumulated so far.
    pub fn drain(&self) -> Vec<GestureRecord> {
        std::mem::take(
            &mut *self
                .records
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// True when no records are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
