#![forbid(unsafe_code)]

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, Level as TraceLevel, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::FmtSubscriber;

use cli::{format_monitor, format_profile, Cli, Commands};
use randr_layout::{parse_monitors, Config, MonitorInfo, MonitorSettings, Profile, SystemRunner, XRandR};

fn parse_log_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn build_subscriber<W>(level: TraceLevel, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(writer)
        .finish()
}

/// Parsed outputs from a captured dump, or from a live xrandr query
fn current_monitors(backend: &XRandR<SystemRunner>, input: Option<&Path>) -> Result<Vec<MonitorInfo>> {
    match input {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read xrandr output from {:?}", path))?;
            Ok(parse_monitors(&text))
        }
        None => backend.monitors_info(),
    }
}

fn find_profile<'a>(config: &'a Config, name: &str) -> Result<&'a Profile> {
    match config.profile(name) {
        Some(profile) => Ok(profile),
        None => bail!("No profile named '{name}' (see `randr-layout profiles`)"),
    }
}

fn run(cli: Cli, mut config: Config, config_path: &Path) -> Result<ExitCode> {
    let backend = XRandR::system(config.global.xrandr_program.clone(), config.global.locale.clone());

    match cli.command {
        Commands::List { input, json } => {
            let monitors = current_monitors(&backend, input.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&monitors).context("Failed to serialize monitors")?);
            } else {
                for monitor in &monitors {
                    println!("{}", format_monitor(monitor));
                }
            }
        }
        Commands::Save { name, description, input } => {
            let monitors = current_monitors(&backend, input.as_deref())?;
            if monitors.is_empty() {
                bail!("No connected outputs found, nothing to save");
            }

            let outputs = MonitorSettings::layout(&monitors);
            info!(profile = %name, outputs = outputs.len(), "Saving profile");
            config.upsert_profile(Profile { name, description, outputs });
            config.save_to(config_path)?;
        }
        Commands::Profiles => {
            for profile in &config.profiles {
                println!("{}", format_profile(profile));
            }
        }
        Commands::Remove { name } => {
            if !config.remove_profile(&name) {
                bail!("No profile named '{name}'");
            }
            config.save_to(config_path)?;
        }
        Commands::Command { name } => {
            let profile = find_profile(&config, &name)?;
            println!("{}", backend.command_for(&profile.outputs));
        }
        Commands::Apply { name, dry_run } => {
            let profile = find_profile(&config, &name)?;
            if dry_run {
                println!("{}", backend.command_for(&profile.outputs));
            } else if !backend.apply(&profile.outputs)? {
                error!(profile = %name, "xrandr failed to apply profile");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::path);
    // Read before logging is up so the configured level can be used;
    // corrections are applied once warnings have somewhere to go
    let mut config = Config::read_from(&config_path)?;

    // LOG_LEVEL overrides the configured level
    let log_level = parse_log_level(
        &std::env::var("LOG_LEVEL").unwrap_or_else(|_| config.global.log_level.clone()),
    );
    tracing::subscriber::set_global_default(build_subscriber(log_level, std::io::stderr))?;

    config.validate();
    info!(path = %config_path.display(), profiles = config.profiles.len(), "Loaded config");

    run(cli, config, &config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use randr_layout::Position;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("TRACE"), TraceLevel::TRACE);
        assert_eq!(parse_log_level("debug"), TraceLevel::DEBUG);
        assert_eq!(parse_log_level("warn"), TraceLevel::WARN);
        assert_eq!(parse_log_level("error"), TraceLevel::ERROR);
        assert_eq!(parse_log_level("verbose"), TraceLevel::INFO);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_corrections_are_logged() {
        let mut config: Config = serde_json::from_str(
            r#"{"profiles":[{"name":"side","outputs":[
                {"name":"HDMI-1","enabled":true,"current_mode":"1920x1080","current_rate":"60.00",
                 "position":"left","position_relative_to":""}]}]}"#,
        )
        .unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = build_subscriber(TraceLevel::INFO, move || writer.clone());
        tracing::subscriber::with_default(subscriber, || config.validate());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "no warning in: {output}");
        assert!(output.contains("position has no relative output"));
        assert!(output.contains("HDMI-1"));
        assert_eq!(config.profile("side").unwrap().outputs[0].position, Position::None);
    }

    #[test]
    fn test_find_profile() {
        let mut config = Config::default();
        config.upsert_profile(Profile {
            name: "laptop".to_string(),
            description: String::new(),
            outputs: vec![MonitorSettings::auto("eDP-1")],
        });

        assert_eq!(find_profile(&config, "laptop").unwrap().outputs.len(), 1);
        assert!(find_profile(&config, "docked").is_err());
    }

    #[test]
    fn test_saved_layout_restores_placement() {
        let path = std::env::temp_dir().join(format!("randr-layout-dual-{}.txt", std::process::id()));
        fs::write(
            &path,
            "eDP-1 connected primary 1920x1080+0+0 (normal) 344mm x 193mm\n   1920x1080     60.02*+\n\
HDMI-1 connected 2560x1440+1920+0 (normal) 597mm x 336mm\n   2560x1440     59.95*+\n",
        )
        .unwrap();

        let backend = XRandR::system("xrandr", "C");
        let monitors = current_monitors(&backend, Some(&path)).unwrap();
        let outputs = MonitorSettings::layout(&monitors);

        assert_eq!(
            backend.command_for(&outputs).to_string(),
            "xrandr --output eDP-1 --mode 1920x1080 --rate 60.02 --primary \
--output HDMI-1 --mode 2560x1440 --rate 59.95 --right-of eDP-1"
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_current_monitors_from_file() {
        let path = std::env::temp_dir().join(format!("randr-layout-dump-{}.txt", std::process::id()));
        fs::write(&path, "DP-1 connected 2560x1440+0+0\n   2560x1440     59.95*+\n").unwrap();

        let backend = XRandR::system("xrandr", "C");
        let monitors = current_monitors(&backend, Some(&path)).unwrap();
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].current_mode, "2560x1440");

        let _ = fs::remove_file(&path);
    }
}
