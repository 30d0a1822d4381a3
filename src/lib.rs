//! Query connected monitors through xrandr and build the command that applies
//! a desired layout.
//!
//! - [`parser`]: xrandr query output → [`MonitorInfo`] list
//! - [`command`]: [`MonitorSettings`] list → one xrandr invocation
//! - [`backend`]: runs xrandr (locale pinned) and ties the two together
//! - [`config`]: saved layout profiles

#![forbid(unsafe_code)]

pub mod backend;
pub mod command;
pub mod config;
pub mod constants;
pub mod parser;
pub mod types;

pub use backend::{CommandRunner, ProcessOutput, SystemRunner, XRandR};
pub use command::{synthesize, XrandrCommand};
pub use config::{Config, GlobalSettings, Profile};
pub use parser::parse_monitors;
pub use types::{ModeLine, MonitorInfo, MonitorSettings, Position};
