//! eventcut Segmenter
//!
//! Turns an ordered list of events into a partition of the host timeline:
//! - **Cut:** split every track at each event's start and end frame
//! - **Label:** rename the strips between the two cuts to the event name
//! - **Silence:** mute every strip that still carries a default name
//!
//! The segmenter only talks to the host through
//! [`TimelineContext`](eventcut_project_model::TimelineContext).

pub mod guard;
pub mod segmenter;

pub use guard::EditorAreaGuard;
pub use segmenter::*;
