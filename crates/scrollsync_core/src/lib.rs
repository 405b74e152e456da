//! Scrollsync Core
//!
//! Custom scrollbars kept in sync with the native scroll offset of a
//! surface:
//!
//! - **Wheel Normalizer**: folds pixel/line/page wheel payloads into one unit
//! - **Scrollbar**: per-axis position, drag, track click, resize correction
//! - **Container**: surface metrics, reflow, input routing, events
//! - **Registry**: every live container, bulk operations, event pumping
//!
//! Positions are inverted: 100 is the start of the content, 0 the end.
//! Public accessors report percent scrolled from the start instead.
//!
//! # Example
//!
//! ```rust
//! use scrollsync_core::{Registry, ScrollbarConfig};
//! use scrollsync_platform::headless::HeadlessPlatform;
//! use scrollsync_platform::{Axis, ElementHost, Size};
//!
//! let mut platform = HeadlessPlatform::default();
//! let node = platform.add_surface(Size::new(400.0, 300.0), Size::new(800.0, 900.0));
//! platform.set_scroll_axes(node, "x,y");
//!
//! let mut registry = Registry::new(ScrollbarConfig::default());
//! registry.create_one(&mut platform, node);
//!
//! // Internal position 25 is three quarters of the way down
//! let offset = registry.scroll_to(&mut platform, node, Axis::Y, 25.0).unwrap();
//! assert_eq!(offset, 450.0);
//! assert_eq!(registry.position_of(node, Axis::Y).unwrap(), 75.0);
//! ```

mod autoscroll;
pub mod config;
pub mod container;
pub mod error;
pub mod events;
pub mod registry;
pub mod resize;
pub mod scrollbar;
pub mod state;
pub mod wheel;

pub use scrollsync_platform as platform;

pub use config::{ResizeSource, ScrollbarConfig};
pub use container::{parse_axes, Container, Metrics, DUO_CLASS};
pub use error::{Result, ScrollError};
pub use events::{EventDispatcher, EventHandler, EventKind, ScrollEvent};
pub use registry::{ContainerId, Registry};
pub use resize::ResizeWatcher;
pub use scrollbar::{ScrollInput, Scrollbar, POSITION_END, POSITION_START};
pub use state::{ContainerState, DragPhase, StateTransitions};
pub use wheel::{normalize, NormalizedWheel};
