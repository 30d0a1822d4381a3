//! Application-wide constants
//!
//! Command-line tokens and fixed strings shared by the parser, the command
//! builder and the process backend.

/// xrandr invocation and option tokens
pub mod xrandr {
    /// Default program name, resolved through PATH
    pub const PROGRAM: &str = "xrandr";

    /// Sentinel mode/rate value meaning "let xrandr choose"
    pub const AUTO: &str = "Auto";

    pub const OUTPUT: &str = "--output";
    pub const OFF: &str = "--off";
    pub const AUTO_FLAG: &str = "--auto";
    pub const MODE: &str = "--mode";
    pub const RATE: &str = "--rate";
    pub const PRIMARY: &str = "--primary";
}

/// Tokens recognised in `xrandr` query output
pub mod query {
    /// Second token of a header line for an output with a display attached
    pub const CONNECTED: &str = "connected";

    /// Header keyword marking the primary output
    pub const PRIMARY: &str = "primary";

    /// Rate decoration for the active mode
    pub const ACTIVE_MARKER: char = '*';

    /// Rate decoration for the preferred mode
    pub const PREFERRED_MARKER: char = '+';
}

/// Child process environment
pub mod locale {
    /// Variable overriding every locale category
    pub const ENV_VAR: &str = "LC_ALL";

    /// Neutral locale so keywords like "connected" stay in English
    pub const DEFAULT: &str = "C";
}

/// Configuration file location
pub mod config {
    /// Directory name under the user config dir
    pub const APP_DIR: &str = "randr-layout";

    /// Config filename
    pub const FILENAME: &str = "config.json";

    /// Log level used when neither LOG_LEVEL nor the config sets one
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}
