//! Tether Animation
//!
//! Ratio-based convergence toward a moving goal. Every tick a value closes a
//! fixed fraction of the remaining distance; once a step would be smaller than
//! epsilon the value snaps onto the goal and the goal is cleared.
//!
//! ```rust
//! use tether_animation::{ApproachConfig, Channel, Convergence};
//!
//! let config = ApproachConfig::default();
//! let mut x = Channel::new(0.0f32);
//! x.set_goal(10.0);
//!
//! let mut ticks = 0;
//! while x.step(&config) == Convergence::Converging {
//!     ticks += 1;
//! }
//! assert_eq!(x.value(), 10.0);
//! assert!(ticks < 200);
//! ```

pub mod approach;

pub use approach::{step, Approach, ApproachConfig, Channel, Convergence};
