//! Shared test helpers for gestrel-core integration tests.
//!
//! Provides a scripted [`MockSession`] that records every platform command
//! it receives, and a [`MockElement`] whose displayed-state and bounds
//! answers can be scripted per query to simulate a UI that moves and
//! re-lays-out between polls.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use gestrel_core::element::{ElementError, ElementHandle};
use gestrel_core::geometry::Rect;
use gestrel_core::session::{MobileSession, PlatformKind, SessionError};

/// One platform command the mock session received.
#[derive(Debug, Clone)]
pub struct RecordedCommand {
    pub command: String,
    pub args: Value,
}

/// Scripted automation session.
///
/// Scroll and fling commands answer from a scripted queue of booleans,
/// falling back to a default once the queue is exhausted. All other
/// commands answer null. Every command is recorded for assertions.
pub struct MockSession {
    platform: PlatformKind,
    commands: Mutex<Vec<RecordedCommand>>,
    move_results: Mutex<VecDeque<bool>>,
    default_move_result: bool,
    window: (i32, i32),
}

impl MockSession {
    /// An Android session whose scrolls always report movement.
    pub fn android() -> Self {
        Self {
            platform: PlatformKind::Android,
            commands: Mutex::new(Vec::new()),
            move_results: Mutex::new(VecDeque::new()),
            default_move_result: true,
            window: (360, 640),
        }
    }

    /// An iOS session, for platform-mismatch tests.
    pub fn ios() -> Self {
        Self {
            platform: PlatformKind::Ios,
            ..Self::android()
        }
    }

    /// An Android session whose scrolls and flings never move content.
    pub fn exhausted() -> Self {
        Self {
            default_move_result: false,
            ..Self::android()
        }
    }

    /// Scripts the next scroll/fling boolean results, in order.
    pub fn with_move_results(self, results: Vec<bool>) -> Self {
        *self.move_results.lock().unwrap() = results.into();
        self
    }

    /// All commands received so far.
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// The `(direction, percent)` of every `mobile: scrollGesture` received.
    pub fn scroll_calls(&self) -> Vec<(String, f64)> {
        self.commands()
            .iter()
            .filter(|c| c.command == "mobile: scrollGesture")
            .map(|c| {
                (
                    c.args["direction"].as_str().unwrap_or_default().to_string(),
                    c.args["percent"].as_f64().unwrap_or(f64::NAN),
                )
            })
            .collect()
    }

    /// Number of commands received with the given name.
    pub fn count(&self, command: &str) -> usize {
        self.commands()
            .iter()
            .filter(|c| c.command == command)
            .count()
    }
}

#[async_trait]
impl MobileSession for MockSession {
    fn platform(&self) -> PlatformKind {
        self.platform
    }

    async fn execute_mobile(&self, command: &str, args: Value) -> Result<Value, SessionError> {
        self.commands.lock().unwrap().push(RecordedCommand {
            command: command.to_string(),
            args,
        });
        match command {
            "mobile: scrollGesture" | "mobile: flingGesture" => {
                let moved = self
                    .move_results
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or(self.default_move_result);
                Ok(Value::Bool(moved))
            }
            _ => Ok(Value::Null),
        }
    }

    async fn window_size(&self) -> Result<(i32, i32), SessionError> {
        Ok(self.window)
    }
}

/// Scripted displayed-state answer.
#[derive(Debug, Clone, Copy)]
pub enum Shown {
    /// `is_displayed` returns `Ok(true)`.
    Yes,
    /// `is_displayed` returns `Ok(false)`.
    No,
    /// `is_displayed` fails with a stale-reference error.
    Stale,
}

/// Scripted bounds answer.
#[derive(Debug, Clone, Copy)]
pub enum Bounds {
    /// `bounding_rect` returns this rect.
    At(Rect),
    /// `bounding_rect` fails with a stale-reference error.
    Stale,
}

/// Scripted element handle.
///
/// Displayed-state and bounds queries consume scripted queues; once a queue
/// is exhausted, the element answers with its default. This models a UI that
/// settles into a final layout after some scripted churn.
pub struct MockElement {
    id: String,
    displayed: Mutex<VecDeque<Shown>>,
    default_displayed: Shown,
    rects: Mutex<VecDeque<Bounds>>,
    default_rect: Rect,
    attributes: HashMap<String, String>,
}

impl MockElement {
    /// A displayed element with a 100x100 rect at the origin.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            displayed: Mutex::new(VecDeque::new()),
            default_displayed: Shown::Yes,
            rects: Mutex::new(VecDeque::new()),
            default_rect: Rect::new(0, 0, 100, 100),
            attributes: HashMap::new(),
        }
    }

    /// Sets the rect answered once scripted bounds run out.
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.default_rect = rect;
        self
    }

    /// Makes the element report "not displayed" once scripts run out.
    pub fn never_displayed(mut self) -> Self {
        self.default_displayed = Shown::No;
        self
    }

    /// Scripts the next displayed-state answers, in order.
    pub fn displayed_sequence(self, seq: Vec<Shown>) -> Self {
        *self.displayed.lock().unwrap() = seq.into();
        self
    }

    /// Scripts the next bounds answers, in order.
    pub fn rect_sequence(self, seq: Vec<Bounds>) -> Self {
        *self.rects.lock().unwrap() = seq.into();
        self
    }

    /// Sets an attribute value.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    fn element_id(&self) -> &str {
        &self.id
    }

    async fn is_displayed(&self) -> Result<bool, ElementError> {
        let answer = self
            .displayed
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default_displayed);
        match answer {
            Shown::Yes => Ok(true),
            Shown::No => Ok(false),
            Shown::Stale => Err(ElementError::Stale("element recycled during relayout".into())),
        }
    }

    async fn bounding_rect(&self) -> Result<Rect, ElementError> {
        let answer = self
            .rects
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Bounds::At(self.default_rect));
        match answer {
            Bounds::At(rect) => Ok(rect),
            Bounds::Stale => Err(ElementError::Stale("bounds read during relayout".into())),
        }
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, ElementError> {
        Ok(self.attributes.get(name).cloned())
    }
}
