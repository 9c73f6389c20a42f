//! Quill Tool - freehand curve drawing on selected surfaces
//!
//! A drawing gesture is press, drag, release:
//! - press picks the closest selected surface under the pointer
//! - drag projects the pointer onto a camera-facing plane through the picked
//!   point and emits an edit point every `length` world units, rebuilding the
//!   in-progress curve each time
//! - release appends the final point and commits the curve as one undoable
//!   [`DrawCurveCommand`]

pub mod builder;
pub mod command;
pub mod config;
pub mod context;
pub mod projection;
pub mod query;
pub mod registry;
pub mod sampler;
pub mod view_tracking;

#[cfg(test)]
mod testing;

pub use builder::CurveBuilder;
pub use command::{CommandState, DrawCurveCommand};
pub use config::ToolConfig;
pub use context::{DrawCurveContext, GestureState, PointerEvent};
pub use projection::{camera_facing_normal, plane_line_intersection, ProjectionPlane};
pub use query::{intersect, SurfaceIntersection};
pub use registry::{register_draw_curve, ToolRegistry};
pub use sampler::Sampler;
pub use view_tracking::ViewTracker;

/// Class name the drawing context registers under
pub const CONTEXT_CLASS: &str = "drawCurveContext";

/// Command name recorded for every committed stroke
pub const TOOL_COMMAND: &str = "drawCurveTool";
