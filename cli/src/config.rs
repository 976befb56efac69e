use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::info;
use simplelog::LevelFilter;

use crate::logging;

/// Periodically lowers the volume of a Chromecast / Google TV, then restores
/// it and puts the device into standby.
#[derive(Parser, Debug, Clone)]
#[command(name = "nemucast", version, about, long_about = None)]
pub struct Args {
    /// Seconds between volume steps
    #[arg(short, long, env = "INTERVAL_SEC", default_value_t = 1200,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Friendly name of the Chromecast
    #[arg(short, long, env = "CHROMECAST_NAME", default_value = "Dell")]
    pub name: String,

    /// Volume change per step (negative)
    #[arg(short, long, env = "STEP", default_value_t = -0.04,
          allow_negative_numbers = true, value_parser = parse_step)]
    pub step: f32,

    /// Volume floor; reaching it ends the ramp
    #[arg(short, long, env = "MIN_LEVEL", default_value_t = 0.3, value_parser = parse_min_level)]
    pub min_level: f32,

    /// Volume restored when the startup volume cannot be read
    #[arg(short, long, env = "DEFAULT_VOLUME", default_value_t = 0.5, value_parser = parse_volume)]
    pub default_volume: f32,

    /// Log level (ERROR, WARNING, INFO, DEBUG)
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Log file, appended to
    #[arg(long, env = "NEMUCAST_LOG_FILE", default_value = "logs/nemucast.log")]
    pub log_file: PathBuf,

    /// Seconds to listen for mDNS answers
    #[arg(long, env = "DISCOVERY_TIMEOUT_SEC", default_value_t = 5,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub discovery_timeout: u64,
}

impl Args {
    pub fn ramp_config(&self) -> RampConfig {
        RampConfig {
            device_name: self.name.clone(),
            interval: Duration::from_secs(self.interval),
            step: self.step,
            min_level: self.min_level,
            default_volume: self.default_volume,
        }
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        logging::parse_level(&self.log_level)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout)
    }
}

/// Settings of one ramp run, fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct RampConfig {
    pub device_name: String,
    pub interval: Duration,
    pub step: f32,
    pub min_level: f32,
    pub default_volume: f32,
}

impl RampConfig {
    pub fn log_summary(&self) {
        info!("Volume step interval: {}s", self.interval.as_secs());
        info!("Chromecast name: {}", self.device_name);
        info!("Volume step: {}", self.step);
        info!("Minimum volume level: {}", self.min_level);
        info!("Default volume: {}", self.default_volume);
    }
}

fn parse_level_value(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number", s))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("`{}` is not a finite number", s))
    }
}

/// Smallest step that still moves a volume rounded to hundredths
const MIN_STEP_MAGNITUDE: f32 = 0.01;

fn parse_step(s: &str) -> Result<f32, String> {
    let step = parse_level_value(s)?;
    if step > -1.0 && step <= -MIN_STEP_MAGNITUDE {
        Ok(step)
    } else {
        Err(format!(
            "step must be between -1 and -{}, got {}",
            MIN_STEP_MAGNITUDE, step
        ))
    }
}

fn parse_min_level(s: &str) -> Result<f32, String> {
    let level = parse_level_value(s)?;
    if level > 0.0 && level < 1.0 {
        Ok(level)
    } else {
        Err(format!("min level must be between 0 and 1, got {}", level))
    }
}

fn parse_volume(s: &str) -> Result<f32, String> {
    let volume = parse_level_value(s)?;
    if (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(format!("volume must be between 0 and 1, got {}", volume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("nemucast").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_args_default() {
        let args = parse(&[]);
        assert_eq!(args.interval, 1200);
        assert_eq!(args.name, "Dell");
        assert_eq!(args.step, -0.04);
        assert_eq!(args.min_level, 0.3);
        assert_eq!(args.default_volume, 0.5);
    }

    #[test]
    fn test_parse_args_custom() {
        let args = parse(&[
            "--interval",
            "600",
            "--name",
            "Living Room",
            "--step",
            "-0.05",
            "--min-level",
            "0.2",
            "--default-volume",
            "0.6",
        ]);
        assert_eq!(args.interval, 600);
        assert_eq!(args.name, "Living Room");
        assert_eq!(args.step, -0.05);
        assert_eq!(args.min_level, 0.2);
        assert_eq!(args.default_volume, 0.6);
    }

    #[test]
    fn test_parse_args_short() {
        let args = parse(&["-i", "300", "-n", "Bedroom", "-s", "-0.03", "-m", "0.25", "-d", "0.4"]);
        assert_eq!(args.interval, 300);
        assert_eq!(args.name, "Bedroom");
        assert_eq!(args.step, -0.03);
        assert_eq!(args.min_level, 0.25);
        assert_eq!(args.default_volume, 0.4);
    }

    #[test]
    fn test_parse_args_mixed() {
        let args = parse(&["--interval", "900", "-n", "Kitchen", "--step", "-0.02"]);
        assert_eq!(args.interval, 900);
        assert_eq!(args.name, "Kitchen");
        assert_eq!(args.step, -0.02);
        assert_eq!(args.min_level, 0.3);
    }

    #[test]
    fn test_parse_args_rejects_out_of_range_values() {
        let invalid: [&[&str]; 7] = [
            &["--interval", "0"],
            &["--step", "0.04"],
            &["--step", "-1.5"],
            &["--step", "-0.004"],
            &["--step", "-0.005"],
            &["--min-level", "1.2"],
            &["--default-volume", "-0.1"],
        ];

        for args in invalid {
            let result =
                Args::try_parse_from(std::iter::once("nemucast").chain(args.iter().copied()));
            assert!(result.is_err(), "{:?} should be rejected", args);
        }
    }

    #[test]
    fn test_smallest_step_still_lowers_the_volume() {
        let step = parse(&["--step", "-0.01"]).step;
        for hundredths in 31..=100 {
            let current = hundredths as f32 / 100.0;
            assert!(crate::ramp::next_level(current, step, 0.3) < current);
        }
    }

    #[test]
    fn test_flags_read_their_environment_variables() {
        let command = Args::command();
        let expected = [
            ("interval", "INTERVAL_SEC"),
            ("name", "CHROMECAST_NAME"),
            ("step", "STEP"),
            ("min_level", "MIN_LEVEL"),
            ("default_volume", "DEFAULT_VOLUME"),
            ("log_level", "LOG_LEVEL"),
            ("log_file", "NEMUCAST_LOG_FILE"),
            ("discovery_timeout", "DISCOVERY_TIMEOUT_SEC"),
        ];

        for (id, env) in expected {
            let arg = command
                .get_arguments()
                .find(|arg| arg.get_id().as_str() == id)
                .unwrap_or_else(|| panic!("no argument {}", id));
            assert_eq!(
                arg.get_env().and_then(|value| value.to_str()),
                Some(env),
                "{} should read {}",
                id,
                env
            );
        }
    }

    #[test]
    fn test_ramp_config_from_args() {
        let config = parse(&["-i", "60", "-n", "Bedroom"]).ramp_config();
        assert_eq!(
            config,
            RampConfig {
                device_name: "Bedroom".to_string(),
                interval: Duration::from_secs(60),
                step: -0.04,
                min_level: 0.3,
                default_volume: 0.5,
            }
        );
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(parse(&["--log-level", "DEBUG"]).log_level_filter(), LevelFilter::Debug);
        assert_eq!(parse(&["--log-level", "WARNING"]).log_level_filter(), LevelFilter::Warn);
    }
}
