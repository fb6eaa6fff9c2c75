//! Element handle boundary for live UI queries.
//!
//! An [`ElementHandle`] is an opaque reference into the automation session,
//! owned by the Page Object layer. The core never creates or destroys
//! handles; it only queries them for displayed-state, bounds, and
//! attributes. All queries hit the device live; nothing is cached, because
//! the UI may re-layout between reads.

use async_trait::async_trait;
use thiserror::Error;

use crate::geometry::Rect;
use crate::session::SessionError;

/// Errors from element queries.
#[derive(Error, Debug)]
pub enum ElementError {
    /// The element reference went stale mid-query, typically because the
    /// view was recycled or re-laid-out between polls. Transient: callers
    /// in a polling loop treat this as "not currently displayed" for the
    /// tick on which it occurred.
    #[error("stale element reference: {0}")]
    Stale(String),

    /// The underlying session failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Opaque handle to a UI element inside an automation session.
///
/// Supplied by the Page Object layer; the gesture core only reads from it.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// The wire identity of this element, used as the `elementId` parameter
    /// of `mobile: *Gesture` commands.
    fn element_id(&self) -> &str;

    /// Whether the element is currently displayed.
    ///
    /// May fail with [`ElementError::Stale`] during a re-layout.
    async fn is_displayed(&self) -> Result<bool, ElementError>;

    /// The element's bounding rectangle in screen pixels, read live.
    async fn bounding_rect(&self) -> Result<Rect, ElementError>;

    /// An element attribute by name (e.g. `"enabled"`, `"clickable"`),
    /// or `None` if the attribute is not present.
    async fn attribute(&self, name: &str) -> Result<Option<String>, ElementError>;
}
