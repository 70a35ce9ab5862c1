//! Waveform options: the style/behaviour record hosts pass to a `WaveView`,
//! plus TOML persistence in the application directory.

mod color;
mod defaults;
mod errors;
mod io;
mod types;

/// Default filename used to store waveform options.
pub const OPTIONS_FILE_NAME: &str = "wavelane.toml";

pub use crate::waveform::BarAlign;
pub use color::{Color, ColorParseError};
pub use errors::{ConfigError, OptionsIoError};
pub use io::{load_from, load_or_default, options_path, save, save_to_path};
pub use types::{ChannelOverrides, NormalizeReference, WaveOptions};
