//! Anchored controls
//!
//! Each control owns a [`Control`](crate::Control) and one or two
//! [`Anchor`](crate::Anchor)s. Derived geometry is only recomputed once the
//! anchors resolve; until then the previous values or a placeholder stand.

mod bridge_line;
mod callout;
mod dimension;
mod line;
mod marker;

pub use bridge_line::{BridgeLine, HalfSegment};
pub use callout::Callout;
pub use dimension::{DimensionLabel, PLACEHOLDER};
pub use line::Line2D;
pub use marker::{Marker, MarkerKind};
