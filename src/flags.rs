//! UI Feature Toggles
//!
//! Decides which page behaviors the web adapter wires up at load time.
//! Row navigation is opt-in: scroll-by-row feels wrong on a trackpad, so the
//! keyboard and wheel bindings stay off unless asked for.

/// UI feature flags for controlling page behaviors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiFlags {
    /// ArrowUp/ArrowDown jump between grid rows.
    ///
    /// Default: `false`
    pub keyboard_rows: bool,

    /// Mouse wheel ticks jump between grid rows (ctrl+wheel still zooms).
    ///
    /// Default: `false`
    pub wheel_rows: bool,

    /// Preview videos load and play when scrolled into view.
    ///
    /// Default: `true`
    pub lazy_previews: bool,

    /// Pause every preview when the window loses focus.
    ///
    /// Default: `true`
    pub pause_on_blur: bool,
}

impl Default for UiFlags {
    fn default() -> Self {
        UiFlags {
            keyboard_rows: false,
            wheel_rows: false,
            lazy_previews: true,
            pause_on_blur: true,
        }
    }
}

impl UiFlags {
    /// Create flags with all features enabled
    pub fn all_enabled() -> Self {
        UiFlags {
            keyboard_rows: true,
            wheel_rows: true,
            lazy_previews: true,
            pause_on_blur: true,
        }
    }

    /// Create flags with all features disabled
    pub fn all_disabled() -> Self {
        UiFlags {
            keyboard_rows: false,
            wheel_rows: false,
            lazy_previews: false,
            pause_on_blur: false,
        }
    }

    /// Build flags from a comma list applied on top of the defaults.
    ///
    /// `keys`, `wheel` and `rows` turn row navigation on; `-keys`, `-wheel`,
    /// `-previews` and `-blur` turn a behavior off. `all` and `none` reset
    /// every flag. Unknown names are ignored.
    pub fn from_list(list: &str) -> Self {
        let mut flags = UiFlags::default();
        for tok in list.split(',').map(|s| s.trim().to_ascii_lowercase()) {
            match tok.as_str() {
                "all" => flags = UiFlags::all_enabled(),
                "none" => flags = UiFlags::all_disabled(),
                "rows" => {
                    flags.keyboard_rows = true;
                    flags.wheel_rows = true;
                }
                "keys" => flags.keyboard_rows = true,
                "-keys" => flags.keyboard_rows = false,
                "wheel" => flags.wheel_rows = true,
                "-wheel" => flags.wheel_rows = false,
                "previews" => flags.lazy_previews = true,
                "-previews" => flags.lazy_previews = false,
                "blur" => flags.pause_on_blur = true,
                "-blur" => flags.pause_on_blur = false,
                _ => {}
            }
        }
        flags
    }

    /// Any row navigation binding enabled.
    pub fn any_rows(&self) -> bool {
        self.keyboard_rows || self.wheel_rows
    }
}
