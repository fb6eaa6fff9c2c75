//! # gestrel-core
//!
//! Core library for Android UI test automation over UiAutomator2.
//!
//! This crate provides the gesture layer for driving an Android application
//! through a device-automation session: typed wrappers around the
//! `mobile: *Gesture` platform commands, live element geometry, and a
//! scroll-into-view convergence controller that brings a target element
//! fully inside a scrollable container's visible bounds.
//!
//! ## Modules
//!
//! - [`session`] - Session boundary trait and platform kind checking
//! - [`element`] - Element handle trait for live geometry and attribute queries
//! - [`geometry`] - Rectangle value type derived from elements or the viewport
//! - [`gestures`] - Gesture executor issuing `mobile: *Gesture` commands
//! - [`scroll`] - Bounded-time polling loop that converges a target into view
//! - [`journal`] - Record of issued gestures for report attachment
//! - [`config`] - Persistent user configuration
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gestrel_core::gestures::{Direction, GestureExecutor, GestureTarget};
//! use gestrel_core::scroll::ScrollOptions;
//! # use gestrel_core::element::ElementHandle;
//! # use gestrel_core::session::MobileSession;
//!
//! # async fn example(
//! #     session: Arc<dyn MobileSession>,
//! #     feed: &dyn ElementHandle,
//! #     footer: &dyn ElementHandle,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let gestures = GestureExecutor::new(session)?;
//!
//! // Fling the feed downward; the outcome says whether more content remains.
//! let outcome = gestures
//!     .fling(GestureTarget::Element(feed), Direction::Down, None)
//!     .await?;
//! if outcome.reached_edge {
//!     println!("feed is already scrolled to the end");
//! }
//!
//! // Bring the footer fully inside the feed's visible bounds.
//! gestures
//!     .bring_fully_into_view(feed, footer, &ScrollOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod element;
pub mod geometry;
pub mod gestures;
pub mod journal;
pub mod scroll;
pub mod session;
