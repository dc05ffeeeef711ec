//! newtonian-cmd: Turning what was said into where to point
//!
//! The parser tries, in order: named presets, explicit azimuth/elevation angles,
//! catalog objects, and finally an optional AI classifier. The first rule that
//! matches decides the [`Command`].

pub mod command;
pub mod error;
pub mod parser;
pub mod presets;

pub use command::{Command, CommandKind};
pub use error::{CommandError, ParseUnresolved};
pub use parser::CommandParser;
pub use presets::{Preset, PresetTable};
