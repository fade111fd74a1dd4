use std::cmp::Ordering;
use std::fmt;

pub type DisplayId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Display {
    pub id: DisplayId,
    pub builtin: bool,
    pub main: bool,
}

/// Snapshot of one mode a display can be driven at.
///
/// `width`/`height` are the logical (point) size, `pixel_width`/`pixel_height`
/// the backing store. `mode_id` is the OS identifier used to look the live
/// mode up again when it is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub refresh_rate: f64,
    pub usable: bool,
    pub mode_id: i32,
}

impl DisplayMode {
    pub fn scale(&self) -> f64 {
        if self.width == 0 {
            return 1.0;
        }
        self.pixel_width as f64 / self.width as f64
    }

    pub fn is_hidpi(&self) -> bool {
        self.pixel_width > self.width
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Same logical size and density. With equal widths, equal pixel widths
    /// means equal scale, so no float comparison is needed.
    pub fn same_resolution(&self, other: &DisplayMode) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.pixel_width == other.pixel_width
    }

    /// Biggest first, then sharpest first.
    pub fn display_order(&self, other: &DisplayMode) -> Ordering {
        other
            .pixel_count()
            .cmp(&self.pixel_count())
            .then_with(|| other.scale_cmp(self))
    }

    /// Compares `pixel_width / width` by cross-multiplying, so no float
    /// comparison is involved.
    fn scale_cmp(&self, other: &DisplayMode) -> Ordering {
        let lhs = self.pixel_width as u64 * other.width.max(1) as u64;
        let rhs = other.pixel_width as u64 * self.width.max(1) as u64;
        lhs.cmp(&rhs)
    }

    pub fn label(&self) -> String {
        if self.is_hidpi() {
            format!("{} \u{d7} {} (HiDPI)", self.width, self.height)
        } else {
            format!("{} \u{d7} {}", self.width, self.height)
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} @{}x ({:.0} Hz)",
            self.width,
            self.height,
            self.scale(),
            self.refresh_rate
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuEntry {
    pub label: String,
    pub mode: DisplayMode,
    pub display: DisplayId,
    pub is_current: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplaySection {
    pub display: Display,
    pub title: String,
    pub entries: Vec<MenuEntry>,
}

/// Per-display sections for one menu open. `connected` counts every
/// attached display, including ones that produced no section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayMenu {
    pub connected: usize,
    pub sections: Vec<DisplaySection>,
}

impl DisplayMenu {
    /// Headers are shown whenever more than one display is attached.
    pub fn grouped(&self) -> bool {
        self.connected > 1
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MenuAction {
    SelectMode(MenuEntry),
    OpenDisplayPreferences,
    ToggleShowAllModes,
    ToggleShowHidpiModes,
    ToggleLaunchAtLogin,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(width: u32, height: u32, scale: u32) -> DisplayMode {
        DisplayMode {
            width,
            height,
            pixel_width: width * scale,
            pixel_height: height * scale,
            refresh_rate: 60.0,
            usable: true,
            mode_id: 0,
        }
    }

    #[test]
    fn labels_mark_hidpi_modes() {
        assert_eq!(mode(2560, 1600, 1).label(), "2560 × 1600");
        assert_eq!(mode(1440, 900, 2).label(), "1440 × 900 (HiDPI)");
    }

    #[test]
    fn same_resolution_ignores_refresh_and_id() {
        let a = mode(1920, 1080, 1);
        let mut b = mode(1920, 1080, 1);
        b.refresh_rate = 30.0;
        b.mode_id = 42;
        assert!(a.same_resolution(&b));
        assert!(!a.same_resolution(&mode(1920, 1080, 2)));
    }

    #[test]
    fn order_prefers_pixels_then_scale() {
        let big = mode(2560, 1600, 1);
        let sharp = mode(1920, 1080, 2);
        let plain = mode(1920, 1080, 1);
        assert_eq!(big.display_order(&sharp), Ordering::Less);
        assert_eq!(sharp.display_order(&plain), Ordering::Less);
        assert_eq!(plain.display_order(&plain.clone()), Ordering::Equal);
    }

    #[test]
    fn equal_pixels_with_different_widths_order_by_scale() {
        let wide = mode(4000, 360, 1);
        let square = mode(1200, 1200, 2);
        assert_eq!(wide.pixel_count(), square.pixel_count());
        assert_eq!(square.display_order(&wide), Ordering::Less);
        assert_eq!(wide.display_order(&square), Ordering::Greater);
    }

    #[test]
    fn display_format_shows_scale_and_refresh() {
        assert_eq!(mode(1440, 900, 2).to_string(), "1440x900 @2x (60 Hz)");
    }

    #[test]
    fn zero_width_mode_has_unit_scale() {
        assert_eq!(mode(0, 0, 1).scale(), 1.0);
        assert_eq!(mode(1440, 900, 2).scale(), 2.0);
    }
}
