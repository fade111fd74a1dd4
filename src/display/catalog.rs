use super::DisplayApi;
use crate::model::{Display, DisplayMenu, DisplayMode, DisplaySection, MenuEntry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Keep modes the OS flags as unsafe, interlaced or stretched.
    pub show_all_modes: bool,
    pub show_hidpi_modes: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            show_all_modes: false,
            show_hidpi_modes: true,
        }
    }
}

/// Stateless mapping from a display to its presentable mode entries.
pub struct DisplayModeCatalog<'a, D: DisplayApi + ?Sized> {
    displays: &'a D,
    options: CatalogOptions,
}

impl<'a, D: DisplayApi + ?Sized> DisplayModeCatalog<'a, D> {
    pub fn new(displays: &'a D, options: CatalogOptions) -> Self {
        Self { displays, options }
    }

    pub fn entries_for_display(&self, display: &Display) -> Vec<MenuEntry> {
        let modes = match self.displays.modes(display.id) {
            Ok(modes) => modes,
            Err(e) => {
                log::debug!("no modes for display {}: {}", display.id, e);
                return Vec::new();
            }
        };
        let current = self.displays.current_mode(display.id);

        arrange_modes(modes, current.as_ref(), self.options)
            .into_iter()
            .map(|mode| MenuEntry {
                label: mode.label(),
                is_current: current.as_ref().is_some_and(|c| c.same_resolution(&mode)),
                display: display.id,
                mode,
            })
            .collect()
    }

    /// Entries for every connected display, grouped. Displays without entries
    /// get no section but still count as connected, so grouping follows the
    /// number of attached displays. An enumeration failure yields an empty menu.
    pub fn display_menu(&self) -> DisplayMenu {
        let displays = match self.displays.connected_displays() {
            Ok(displays) => displays,
            Err(e) => {
                log::warn!("{}", e);
                return DisplayMenu::default();
            }
        };

        let sections = displays
            .iter()
            .enumerate()
            .filter_map(|(index, display)| {
                let entries = self.entries_for_display(display);
                if entries.is_empty() {
                    return None;
                }
                Some(DisplaySection {
                    display: *display,
                    title: display_title(display, index),
                    entries,
                })
            })
            .collect();

        DisplayMenu {
            connected: displays.len(),
            sections,
        }
    }
}

/// Filter, dedupe and sort raw OS modes into menu order.
///
/// The active mode survives filtering so the menu can always check it. Among
/// duplicates the one sharing the active mode's id wins, otherwise the first
/// reported.
pub fn arrange_modes(
    modes: Vec<DisplayMode>,
    current: Option<&DisplayMode>,
    options: CatalogOptions,
) -> Vec<DisplayMode> {
    let is_active = |mode: &DisplayMode| current.is_some_and(|c| c.same_resolution(mode));

    let mut kept: Vec<DisplayMode> = Vec::with_capacity(modes.len());
    for mode in modes {
        let wanted = (options.show_all_modes || mode.usable)
            && (options.show_hidpi_modes || !mode.is_hidpi());
        if !wanted && !is_active(&mode) {
            continue;
        }
        match kept.iter_mut().find(|k| k.same_resolution(&mode)) {
            Some(existing) => {
                let authoritative = current.is_some_and(|c| c.mode_id == mode.mode_id);
                if authoritative {
                    *existing = mode;
                }
            }
            None => kept.push(mode),
        }
    }

    kept.sort_by(|a, b| a.display_order(b));
    kept
}

fn display_title(display: &Display, index: usize) -> String {
    if display.builtin {
        "Built-in Display".to_string()
    } else if display.main {
        "Main Display".to_string()
    } else {
        format!("Display {}", index + 1)
    }
}
