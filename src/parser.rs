//! Parser for the text printed by a plain `xrandr` query
//!
//! The output is scanned line by line. A header line such as
//! `HDMI1 connected primary 1920x1080+0+0 ...` opens a block, and the indented
//! mode lines directly below it (`   1920x1080     60.00*+  50.00`) fill it in.
//! The first line that is not a mode line closes the block; anything outside a
//! block (disconnected outputs, the `Screen 0:` banner, stray text) is skipped.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::constants::query::{ACTIVE_MARKER, CONNECTED, PREFERRED_MARKER, PRIMARY};
use crate::types::{Geometry, ModeLine, MonitorInfo};

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(\S+)\s+{CONNECTED}(?:\s|$)")).expect("header pattern is valid")
});

static MODE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]+\d+x\d+").expect("mode line pattern is valid"));

static GEOMETRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)x(\d+)\+(-?\d+)\+(-?\d+)$").expect("geometry pattern is valid")
});

static RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("rate pattern is valid"));

enum ScanState {
    Outside,
    InBlock(MonitorInfo),
}

/// Parse captured `xrandr` output into one `MonitorInfo` per connected output
///
/// Never fails: empty or unrecognised input yields an empty list.
pub fn parse_monitors(text: &str) -> Vec<MonitorInfo> {
    let mut monitors = Vec::new();
    let mut state = ScanState::Outside;

    for line in text.lines() {
        state = match state {
            ScanState::InBlock(mut monitor) if MODE_LINE.is_match(line) => {
                parse_mode_line(&mut monitor, line);
                ScanState::InBlock(monitor)
            }
            ScanState::InBlock(monitor) => {
                monitors.push(monitor);
                start_block(line)
            }
            ScanState::Outside => start_block(line),
        };
    }

    if let ScanState::InBlock(monitor) = state {
        monitors.push(monitor);
    }

    debug!(count = monitors.len(), "parsed xrandr output");
    monitors
}

fn start_block(line: &str) -> ScanState {
    if !HEADER.is_match(line) {
        trace!(line, "skipping line outside an output block");
        return ScanState::Outside;
    }

    let name = HEADER
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or_default();
    let mut monitor = MonitorInfo::new(name);
    monitor.primary = line.split_whitespace().nth(2) == Some(PRIMARY);
    monitor.geometry = line.split_whitespace().skip(2).find_map(parse_geometry);
    debug!(name = %monitor.name, primary = monitor.primary, geometry = ?monitor.geometry, "found connected output");
    ScanState::InBlock(monitor)
}

/// `1920x1080+1920+0` as printed after `connected` for active outputs
fn parse_geometry(token: &str) -> Option<Geometry> {
    let caps = GEOMETRY.captures(token)?;
    Some(Geometry {
        width: caps[1].parse().ok()?,
        height: caps[2].parse().ok()?,
        x: caps[3].parse().ok()?,
        y: caps[4].parse().ok()?,
    })
}

fn parse_mode_line(monitor: &mut MonitorInfo, line: &str) {
    let mut tokens = line.split_whitespace();
    let Some(mode) = tokens.next() else {
        return;
    };
    debug!(output = %monitor.name, mode, "mode found");

    let mut mode_line = ModeLine::new(mode);
    for token in tokens {
        if RATE.is_match(token) {
            let rate = token.trim_end_matches([ACTIVE_MARKER, PREFERRED_MARKER]);
            debug!(mode, rate, "rate found");
            mode_line.rates.push(rate.to_string());
        }

        let active = token.contains(ACTIVE_MARKER);
        let preferred = token.contains(PREFERRED_MARKER);
        if !active && !preferred {
            continue;
        }

        // A lone marker token belongs to the rate just before it
        let Some(rate) = mode_line.rates.last() else {
            debug!(mode, token, "marker without a preceding rate, ignoring");
            continue;
        };
        if active {
            monitor.current_mode = mode.to_string();
            monitor.current_rate = rate.clone();
            monitor.enabled = true;
        }
        if preferred {
            monitor.preferred_mode = mode.to_string();
            monitor.preferred_rate = rate.clone();
        }
    }

    monitor.mode_lines.push(mode_line);
}
