use crate::config::{Config, HoursDial};
use clap::Parser;
use dialkit::format::Hms;

#[derive(Parser, Debug, Clone)]
#[command(name = "dialtimer", version, about, long_about = None)]
/// A small always-on-top countdown timer set with circular dials.
pub struct Cli {
    /// Initial duration: HH:MM:SS, MM:SS or a number of seconds
    #[arg(short = 'd', long)]
    pub duration: Option<Hms>,

    /// Start pinned above other windows
    #[arg(short = 'p', long)]
    pub pinned: bool,

    /// Positions on the hours dial (12 or 24), overrides the config file
    #[arg(long)]
    pub hours_dial: Option<HoursDial>,

    /// Write the default config file if none exists, print its path and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Cli {
    pub fn apply(&self, config: &mut Config) {
        if self.pinned {
            config.always_on_top = true;
        }
        if let Some(dial) = self.hours_dial {
            config.hours_dial = dial;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from(["dialtimer", "-p", "--hours-dial", "24", "-d", "1:30:00"]);
        assert_eq!(cli.duration, Some(Hms::new(1, 30, 0)));

        let mut config = Config::default();
        cli.apply(&mut config);
        assert!(config.always_on_top);
        assert_eq!(config.hours_dial, HoursDial::TwentyFour);
    }

    #[test]
    fn test_rejects_bad_duration() {
        assert!(Cli::try_parse_from(["dialtimer", "--duration", "5:75"]).is_err());
    }
}
