use clap::{Parser, Subcommand};
use std::path::PathBuf;

use randr_layout::constants::query::{ACTIVE_MARKER, PREFERRED_MARKER};
use randr_layout::{MonitorInfo, Profile};

/// Inspect connected monitors and apply saved xrandr layouts
#[derive(Parser, Debug)]
#[command(name = "randr-layout", version)]
pub struct Cli {
    /// Config file to use instead of the one in the user config dir
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Show connected outputs with their modes and rates
    List {
        /// Parse captured xrandr output from a file instead of running xrandr
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Store the current modes and relative placement as a profile
    Save {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Parse captured xrandr output from a file instead of running xrandr
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// List saved profiles
    Profiles,
    /// Delete a saved profile
    Remove { name: String },
    /// Print the xrandr command for a profile
    Command { name: String },
    /// Apply a profile
    Apply {
        name: String,
        /// Print the command without running it
        #[arg(long)]
        dry_run: bool,
    },
}

/// Text rendering of one output, rates decorated the way xrandr prints them
pub fn format_monitor(monitor: &MonitorInfo) -> String {
    let mut out = monitor.name.clone();
    if monitor.primary {
        out.push_str(" (primary)");
    }
    if monitor.enabled {
        out.push_str(&format!(" {}@{}", monitor.current_mode, monitor.current_rate));
    } else {
        out.push_str(" off");
    }

    for line in &monitor.mode_lines {
        out.push_str(&format!("\n  {:<12}", line.mode));
        for rate in &line.rates {
            let active = line.mode == monitor.current_mode && *rate == monitor.current_rate;
            let preferred = line.mode == monitor.preferred_mode && *rate == monitor.preferred_rate;
            out.push(' ');
            out.push_str(rate);
            out.push(if active { ACTIVE_MARKER } else { ' ' });
            out.push(if preferred { PREFERRED_MARKER } else { ' ' });
        }
    }
    out
}

/// One-line summary of a profile
pub fn format_profile(profile: &Profile) -> String {
    let outputs: Vec<&str> = profile.outputs.iter().map(|o| o.name.as_str()).collect();
    let mut out = format!("{} [{}]", profile.name, outputs.join(", "));
    if !profile.description.is_empty() {
        out.push_str(&format!(" - {}", profile.description));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use randr_layout::{parse_monitors, MonitorSettings};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_args() {
        let cli = Cli::try_parse_from(["randr-layout", "list", "--json", "--input", "dump.txt"]).unwrap();
        assert_eq!(cli.config, None);
        assert_eq!(
            cli.command,
            Commands::List { input: Some(PathBuf::from("dump.txt")), json: true }
        );
    }

    #[test]
    fn test_parse_apply_with_global_config() {
        let cli = Cli::try_parse_from(["randr-layout", "apply", "docked", "--dry-run", "--config", "/tmp/c.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
        assert_eq!(cli.command, Commands::Apply { name: "docked".to_string(), dry_run: true });
    }

    #[test]
    fn test_missing_profile_name_is_rejected() {
        assert!(Cli::try_parse_from(["randr-layout", "command"]).is_err());
    }

    #[test]
    fn test_format_monitor() {
        let text = "HDMI1 connected primary 1920x1080+0+0\n   1920x1080     60.00*+  50.00\n   1280x720      59.94\n";
        let monitors = parse_monitors(text);

        let rendered = format_monitor(&monitors[0]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "HDMI1 (primary) 1920x1080@60.00");
        assert!(lines[1].contains("60.00*+"));
        assert!(lines[1].contains("50.00"));
        assert!(lines[2].starts_with("  1280x720"));
    }

    #[test]
    fn test_format_disabled_monitor() {
        assert_eq!(format_monitor(&MonitorInfo::new("VGA1")), "VGA1 off");
    }

    #[test]
    fn test_format_profile() {
        let profile = Profile {
            name: "docked".to_string(),
            description: "external only".to_string(),
            outputs: vec![MonitorSettings::off("eDP-1"), MonitorSettings::auto("DP-1")],
        };
        assert_eq!(format_profile(&profile), "docked [eDP-1, DP-1] - external only");
    }
}
