use super::{DisplayApi, DisplayError};
use crate::model::{Display, DisplayId, DisplayMode};
use core_foundation::base::TCFType;
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::CFString;
use core_graphics::display::{CGConfigureOption, CGDisplay, CGDisplayMode};

// IOGraphicsTypes.h
const IO_MODE_VALID: u32 = 0x0000_0001;
const IO_MODE_SAFE: u32 = 0x0000_0002;
const IO_MODE_INTERLACED: u32 = 0x0000_0040;
const IO_MODE_STRETCHED: u32 = 0x0000_0800;

const SHOW_DUPLICATE_LOW_RESOLUTION_MODES: &str = "kCGDisplayShowDuplicateLowResolutionModes";

/// CoreGraphics-backed display access. Holds nothing; every call asks the
/// window server again.
pub struct CoreGraphicsDisplays;

impl CoreGraphicsDisplays {
    pub fn new() -> Self {
        Self
    }

    fn live_modes(&self, display: DisplayId) -> Vec<CGDisplayMode> {
        // Without this option the HiDPI variants are folded into their
        // low-resolution twins.
        let options = CFDictionary::from_CFType_pairs(&[(
            CFString::from_static_string(SHOW_DUPLICATE_LOW_RESOLUTION_MODES),
            CFBoolean::true_value(),
        )]);
        CGDisplayMode::all_display_modes(display, options.as_concrete_TypeRef())
            .unwrap_or_default()
    }
}

fn snapshot(mode: &CGDisplayMode) -> DisplayMode {
    let flags = mode.io_flags();
    let usable = flags & IO_MODE_VALID != 0
        && flags & IO_MODE_SAFE != 0
        && flags & (IO_MODE_INTERLACED | IO_MODE_STRETCHED) == 0;
    DisplayMode {
        width: mode.width() as u32,
        height: mode.height() as u32,
        pixel_width: mode.pixel_width() as u32,
        pixel_height: mode.pixel_height() as u32,
        refresh_rate: mode.refresh_rate(),
        usable,
        mode_id: mode.mode_id(),
    }
}

impl DisplayApi for CoreGraphicsDisplays {
    fn connected_displays(&self) -> Result<Vec<Display>, DisplayError> {
        let ids = CGDisplay::active_displays().map_err(DisplayError::Enumerate)?;
        Ok(ids
            .into_iter()
            .map(|id| {
                let display = CGDisplay::new(id);
                Display {
                    id,
                    builtin: display.is_builtin(),
                    main: display.is_main(),
                }
            })
            .collect())
    }

    fn modes(&self, display: DisplayId) -> Result<Vec<DisplayMode>, DisplayError> {
        let modes: Vec<DisplayMode> = self.live_modes(display).iter().map(snapshot).collect();
        if modes.is_empty() {
            return Err(DisplayError::NoModes(display));
        }
        Ok(modes)
    }

    fn current_mode(&self, display: DisplayId) -> Option<DisplayMode> {
        CGDisplay::new(display).display_mode().as_ref().map(snapshot)
    }

    fn set_mode(&self, display: DisplayId, mode: &DisplayMode) -> Result<(), DisplayError> {
        let live = self.live_modes(display);
        let target = live
            .iter()
            .find(|m| m.mode_id() == mode.mode_id && snapshot(m).same_resolution(mode))
            .or_else(|| live.iter().find(|m| snapshot(m).same_resolution(mode)))
            .ok_or_else(|| DisplayError::ModeNotFound {
                display,
                mode: mode.to_string(),
            })?;

        let cg_display = CGDisplay::new(display);
        let configure = |code| DisplayError::Configure { display, code };
        let config = cg_display.begin_configuration().map_err(configure)?;
        if let Err(code) = cg_display.configure_display_with_display_mode(&config, target) {
            let _ = cg_display.cancel_configuration(&config);
            return Err(configure(code));
        }
        cg_display
            .complete_configuration(&config, CGConfigureOption::ConfigurePermanently)
            .map_err(configure)?;

        log::info!("display {} switched to {}", display, mode);
        Ok(())
    }
}
