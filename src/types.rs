//! Monitor descriptors shared by the parser and the command builder

use serde::{Deserialize, Serialize};

use crate::constants::xrandr::AUTO;

/// One mode line of an output: a resolution and the refresh rates listed for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeLine {
    /// Resolution identifier, e.g. "1920x1080"
    pub mode: String,
    /// Refresh rates with decorations stripped, in source order
    pub rates: Vec<String>,
}

impl ModeLine {
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            rates: Vec::new(),
        }
    }
}

/// Screen area an active output occupies, from the header's `WxH+X+Y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    fn overlaps_horizontally(&self, other: &Geometry) -> bool {
        self.left() < other.right() && other.left() < self.right()
    }

    fn overlaps_vertically(&self, other: &Geometry) -> bool {
        self.top() < other.bottom() && other.top() < self.bottom()
    }
}

/// Parsed state of a connected output
///
/// Marker fields hold an empty string when xrandr marked nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub name: String,
    /// Mode lines in order of appearance (duplicates kept)
    pub mode_lines: Vec<ModeLine>,
    pub current_mode: String,
    pub current_rate: String,
    pub preferred_mode: String,
    pub preferred_rate: String,
    /// A current mode/rate was found, i.e. the output is driving a display
    pub enabled: bool,
    /// Header line carried the `primary` keyword
    #[serde(default)]
    pub primary: bool,
    /// Position and size on the screen, absent for inactive outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl MonitorInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Mode identifiers in source order
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.mode_lines.iter().map(|line| line.mode.as_str())
    }

    /// Rates listed for `mode`
    ///
    /// When the same mode appears on several lines the last one wins, earlier
    /// rates for that identifier are not merged in.
    pub fn rates(&self, mode: &str) -> Option<&[String]> {
        self.mode_lines
            .iter()
            .rev()
            .find(|line| line.mode == mode)
            .map(|line| line.rates.as_slice())
    }
}

/// Placement of an output relative to another one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    None,
    Left,
    Right,
    Above,
    Bellow,
}

impl Position {
    /// xrandr option name (without the leading dashes)
    pub fn token(self) -> Option<&'static str> {
        match self {
            Position::None => None,
            Position::Left => Some("left-of"),
            Position::Right => Some("right-of"),
            Position::Above => Some("above"),
            // xrandr itself spells this option "below"; the label is kept as
            // the settings dialog has always emitted it.
            Position::Bellow => Some("bellow"),
        }
    }
}

/// Desired state of one output, consumed by the command builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSettings {
    pub name: String,
    pub enabled: bool,
    /// Mode identifier, or `Auto`
    pub current_mode: String,
    /// Refresh rate, or `Auto`
    pub current_rate: String,
    #[serde(default)]
    pub position: Position,
    /// Output `position` is relative to; ignored when position is `None`
    #[serde(default)]
    pub position_relative_to: String,
    #[serde(default)]
    pub primary: bool,
}

impl MonitorSettings {
    /// Settings that let xrandr pick mode and rate for `name`
    pub fn auto(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            current_mode: AUTO.to_string(),
            current_rate: AUTO.to_string(),
            position: Position::None,
            position_relative_to: String::new(),
            primary: false,
        }
    }

    /// Settings that switch `name` off
    pub fn off(name: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::auto(name)
        }
    }

    /// Derive settings that reproduce a parsed output's state
    ///
    /// Falls back to the preferred mode/rate for outputs that are not active,
    /// and to `Auto` when neither is marked.
    pub fn from_info(info: &MonitorInfo) -> Self {
        let (mode, rate) = if !info.current_mode.is_empty() {
            (&info.current_mode, &info.current_rate)
        } else if !info.preferred_mode.is_empty() {
            (&info.preferred_mode, &info.preferred_rate)
        } else {
            return Self {
                enabled: info.enabled,
                primary: info.primary,
                ..Self::auto(info.name.clone())
            };
        };

        Self {
            name: info.name.clone(),
            enabled: info.enabled,
            current_mode: mode.clone(),
            current_rate: if rate.is_empty() { AUTO.to_string() } else { rate.clone() },
            position: Position::None,
            position_relative_to: String::new(),
            primary: info.primary,
        }
    }

    /// Settings for every output, with placement derived from header geometry
    ///
    /// Active outputs are ordered left to right, then top to bottom. Each one
    /// is placed right of or below an earlier output whose edge it touches;
    /// outputs touching nothing keep `Position::None`.
    pub fn layout(monitors: &[MonitorInfo]) -> Vec<Self> {
        let mut placed: Vec<(&str, Geometry)> = monitors
            .iter()
            .filter(|m| m.enabled)
            .filter_map(|m| m.geometry.map(|g| (m.name.as_str(), g)))
            .collect();
        placed.sort_by_key(|(_, g)| (g.x, g.y));

        monitors
            .iter()
            .map(|info| {
                let settings = Self::from_info(info);
                let Some(geometry) = info.geometry.filter(|_| info.enabled) else {
                    return settings;
                };

                let earlier = placed.iter().take_while(|(name, _)| *name != info.name);
                for (name, other) in earlier {
                    if geometry.left() == other.right() && geometry.overlaps_vertically(other) {
                        return settings.placed(Position::Right, *name);
                    }
                    if geometry.top() == other.bottom() && geometry.overlaps_horizontally(other) {
                        return settings.placed(Position::Bellow, *name);
                    }
                }
                settings
            })
            .collect()
    }

    /// Place this output relative to `other`
    pub fn placed(mut self, position: Position, other: impl Into<String>) -> Self {
        self.position = position;
        self.position_relative_to = other.into();
        self
    }
}
