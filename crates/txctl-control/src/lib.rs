//! Channel control for an RC transmitter on a serial link.
//!
//! This is the "just works" layer. Open a link, set channel positions with
//! send-on-change de-duplication, drive it from text commands, or turn
//! head-tracker orientation into those commands.

pub mod command;
pub mod connector;
pub mod controller;
pub mod error;
pub mod repl;
pub mod tracking;

pub use command::{parse_line, percent_to_value, Assignment, Command, ParseError};
pub use connector::{open, open_with_config};
pub use controller::{ChannelController, ControllerConfig, SetOutcome};
pub use error::{ControlError, Result};
pub use repl::{CommandLoop, LoopState};
pub use tracking::{
    axis_to_value, HeadTracker, LineOrientationSource, Orientation, OrientationSource,
    TrackerConfig,
};
