//! Builds the single xrandr invocation that applies a set of monitor settings

use std::fmt;

use crate::constants::xrandr;
use crate::types::MonitorSettings;

/// A synthesized xrandr invocation
///
/// Kept as an argument vector so it can be spawned without shell splitting;
/// `Display` renders the one-line command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrandrCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl XrandrCommand {
    /// Command for `settings` using the default `xrandr` program
    pub fn from_settings(settings: &[MonitorSettings]) -> Self {
        Self::with_program(xrandr::PROGRAM, settings)
    }

    /// Command for `settings` invoking `program`
    ///
    /// Entries are emitted in order with no deduplication or name checks;
    /// xrandr applies all outputs in one call.
    pub fn with_program(program: impl Into<String>, settings: &[MonitorSettings]) -> Self {
        let mut args = Vec::new();
        for monitor in settings {
            push_output(&mut args, monitor);
        }
        Self {
            program: program.into(),
            args,
        }
    }
}

fn push_output(args: &mut Vec<String>, monitor: &MonitorSettings) {
    args.push(xrandr::OUTPUT.to_string());
    args.push(monitor.name.clone());

    if !monitor.enabled {
        args.push(xrandr::OFF.to_string());
        return;
    }

    // An automatic mode lets xrandr pick everything else too: rate, position
    // and primary are not emitted for this output.
    if monitor.current_mode == xrandr::AUTO {
        args.push(xrandr::AUTO_FLAG.to_string());
        return;
    }

    args.push(xrandr::MODE.to_string());
    args.push(monitor.current_mode.clone());

    if monitor.current_rate != xrandr::AUTO {
        args.push(xrandr::RATE.to_string());
        args.push(monitor.current_rate.clone());
    }

    if let Some(token) = monitor.position.token() {
        args.push(format!("--{token}"));
        args.push(monitor.position_relative_to.clone());
    }

    if monitor.primary {
        args.push(xrandr::PRIMARY.to_string());
    }
}

impl fmt::Display for XrandrCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Render the xrandr command line applying `settings`
pub fn synthesize(settings: &[MonitorSettings]) -> String {
    XrandrCommand::from_settings(settings).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn settings(name: &str, mode: &str, rate: &str) -> MonitorSettings {
        MonitorSettings {
            name: name.to_string(),
            enabled: true,
            current_mode: mode.to_string(),
            current_rate: rate.to_string(),
            position: Position::None,
            position_relative_to: String::new(),
            primary: false,
        }
    }

    #[test]
    fn test_synthesize_two_outputs() {
        let list = vec![
            MonitorSettings {
                primary: true,
                ..settings("HDMI1", "1920x1080", "60.00").placed(Position::Right, "VGA1")
            },
            MonitorSettings::off("VGA1"),
        ];

        assert_eq!(
            synthesize(&list),
            "xrandr --output HDMI1 --mode 1920x1080 --rate 60.00 --right-of VGA1 --primary --output VGA1 --off"
        );
    }

    #[test]
    fn test_disabled_output_ignores_other_fields() {
        let monitor = MonitorSettings {
            enabled: false,
            primary: true,
            ..settings("DP-1", "2560x1440", "144.00").placed(Position::Left, "HDMI-1")
        };

        assert_eq!(synthesize(&[monitor]), "xrandr --output DP-1 --off");
    }

    #[test]
    fn test_auto_mode_skips_rate_position_primary() {
        let monitor = MonitorSettings {
            primary: true,
            ..settings("eDP-1", xrandr::AUTO, "60.00").placed(Position::Above, "HDMI-1")
        };

        assert_eq!(synthesize(&[monitor]), "xrandr --output eDP-1 --auto");
    }

    #[test]
    fn test_auto_rate_omits_rate_clause() {
        let monitor = settings("HDMI-1", "1280x720", xrandr::AUTO).placed(Position::Bellow, "eDP-1");

        assert_eq!(
            synthesize(&[monitor]),
            "xrandr --output HDMI-1 --mode 1280x720 --bellow eDP-1"
        );
    }

    #[test]
    fn test_all_position_clauses() {
        let cases = [
            (Position::Left, "--left-of"),
            (Position::Right, "--right-of"),
            (Position::Above, "--above"),
            (Position::Bellow, "--bellow"),
        ];

        for (position, flag) in cases {
            let cmd = XrandrCommand::from_settings(&[settings("A", "800x600", xrandr::AUTO).placed(position, "B")]);
            assert_eq!(cmd.args, vec!["--output", "A", "--mode", "800x600", flag, "B"]);
        }
    }

    #[test]
    fn test_duplicate_names_are_kept_in_order() {
        let list = vec![settings("HDMI1", "1920x1080", "60.00"), MonitorSettings::off("HDMI1")];

        assert_eq!(
            synthesize(&list),
            "xrandr --output HDMI1 --mode 1920x1080 --rate 60.00 --output HDMI1 --off"
        );
    }

    #[test]
    fn test_empty_settings_is_bare_program() {
        assert_eq!(synthesize(&[]), "xrandr");
    }

    #[test]
    fn test_custom_program() {
        let cmd = XrandrCommand::with_program("/usr/bin/xrandr", &[MonitorSettings::auto("VGA1")]);
        assert_eq!(cmd.program, "/usr/bin/xrandr");
        assert_eq!(cmd.to_string(), "/usr/bin/xrandr --output VGA1 --auto");
    }
}
