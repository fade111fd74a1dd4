pub mod catalog;
#[cfg(target_os = "macos")]
pub mod coregraphics;

use crate::model::{Display, DisplayId, DisplayMode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to list active displays (CGError {0})")]
    Enumerate(i32),
    #[error("display {0} reported no modes")]
    NoModes(DisplayId),
    #[error("mode {mode} is not offered by display {display}")]
    ModeNotFound { display: DisplayId, mode: String },
    #[error("display configuration for {display} failed (CGError {code})")]
    Configure { display: DisplayId, code: i32 },
}

/// Window-server capability the catalog and the app consume.
pub trait DisplayApi {
    fn connected_displays(&self) -> Result<Vec<Display>, DisplayError>;

    /// Every mode the display supports, HiDPI duplicates included, in the
    /// order the OS reports them.
    fn modes(&self, display: DisplayId) -> Result<Vec<DisplayMode>, DisplayError>;

    fn current_mode(&self, display: DisplayId) -> Option<DisplayMode>;

    fn set_mode(&self, display: DisplayId, mode: &DisplayMode) -> Result<(), DisplayError>;
}
