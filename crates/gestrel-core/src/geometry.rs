//! Rectangle value type for gesture regions and containment checks.
//!
//! A [`Rect`] describes either an element's bounding box or the viewport,
//! in integer screen pixels with the origin at the top-left and y increasing
//! downward. Rects are derived fresh from a live query on every read; they
//! are plain values and must not be cached across polling iterations.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::element::{ElementError, ElementHandle};
use crate::session::{MobileSession, SessionError};

/// A rectangle in screen pixels, origin top-left.
///
/// Invariant: `width` and `height` are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// X of the top-left corner.
    pub x: i32,
    /// Y of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Creates a rect from raw components.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Reads the element's bounding box live.
    pub async fn from_element(element: &dyn ElementHandle) -> Result<Self, ElementError> {
        element.bounding_rect().await
    }

    /// The full viewport of the session's current window.
    pub async fn from_viewport(session: &dyn MobileSession) -> Result<Self, SessionError> {
        let (width, height) = session.window_size().await?;
        Ok(Self::new(0, 0, width, height))
    }

    /// Y of the top edge.
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Y of the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// X of the horizontal center.
    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Y of the vertical center.
    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// A rect shrunk inward by `dx` on the left/right and `dy` on the
    /// top/bottom. Sizes clamp at zero.
    pub fn inset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: (self.width - 2 * dx).max(0),
            height: (self.height - 2 * dy).max(0),
        }
    }

    /// The `left/top/width/height` parameter map used by region-addressed
    /// `mobile: *Gesture` commands.
    pub fn region_args(&self) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert("left".to_string(), json!(self.x));
        args.insert("top".to_string(), json!(self.y));
        args.insert("width".to_string(), json!(self.width));
        args.insert("height".to_string(), json!(self.height));
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_and_centers() {
        let r = Rect::new(10, 20, 100, 40);
        assert_eq!(r.top(), 20);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.center_x(), 60);
        assert_eq!(r.center_y(), 40);
    }

    #[test]
    fn new_clamps_negative_sizes() {
        let r = Rect::new(0, 0, -5, -1);
        assert_eq!(r.width, 0);
        assert_eq!(r.height, 0);
    }

    #[test]
    fn inset_shrinks_and_clamps() {
        let r = Rect::new(0, 0, 100, 50);
        let inner = r.inset(16, 10);
        assert_eq!(inner, Rect::new(16, 10, 68, 30));

        // Over-inset collapses to a zero-size rect rather than going negative.
        let collapsed = r.inset(60, 30);
        assert_eq!(collapsed.width, 0);
        assert_eq!(collapsed.height, 0);
    }

    #[test]
    fn region_args_shape() {
        let args = Rect::new(5, 6, 7, 8).region_args();
        assert_eq!(args.get("left"), Some(&json!(5)));
        assert_eq!(args.get("top"), Some(&json!(6)));
        assert_eq!(args.get("width"), Some(&json!(7)));
        assert_eq!(args.get("height"), Some(&json!(8)));
        assert_eq!(args.len(), 4);
    }
}
