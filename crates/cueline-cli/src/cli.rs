use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use cueline_core::{Ball, CuelineSettings, Rect, Table, Vector2};

use crate::commands::{mock::run_mock, replay::replay, shot::print_shot};

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run a recording of detections through the frame loop and print a report per
    /// frame as JSON.
    #[clap(name = "replay")]
    Replay {
        #[clap(short, long)]
        input: PathBuf,
        /// Write the reports to this file instead of stdout.
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the real-time loop on a synthetic table until ctrl-c.
    #[clap(name = "mock")]
    Mock {
        /// Stop after this many frames.
        #[clap(long)]
        frames: Option<u64>,
        #[clap(long, default_value = "1280")]
        width: u32,
        #[clap(long, default_value = "720")]
        height: u32,
        #[clap(long, default_value = "0")]
        seed: u64,
    },

    /// Compute the segments for a single shot given in reference frame pixels.
    #[clap(name = "shot")]
    Shot {
        /// Cue ball as X,Y,RADIUS
        #[clap(long, value_parser = parse_ball, allow_hyphen_values = true)]
        cue: [f64; 3],
        /// Target ball as X,Y,RADIUS
        #[clap(long, value_parser = parse_ball, allow_hyphen_values = true)]
        target: [f64; 3],
        /// Pocket center as X,Y. May be repeated.
        #[clap(long = "pocket", value_parser = parse_point, allow_hyphen_values = true)]
        pockets: Vec<[f64; 2]>,
        /// Table bounds as X,Y,WIDTH,HEIGHT
        #[clap(long, value_parser = parse_rect, allow_hyphen_values = true)]
        bounds: Option<[f64; 4]>,
        /// Print the predicted path instead of the guideline.
        #[clap(long, default_value = "false", action)]
        predict: bool,
    },
}

#[derive(Debug, Parser)]
#[command(name = "cueline")]
pub struct Cli {
    #[clap(subcommand)]
    command: Command,

    #[clap(long, short = 'f', default_value = "cueline-settings.json")]
    pub settings_file: PathBuf,

    #[clap(long, default_value = "info")]
    pub log_level: String,

    #[clap(long, default_value = "auto")]
    pub log_file: String,
}

impl Cli {
    pub async fn start(self) -> ExitCode {
        let settings = match CuelineSettings::load_or_insert(&self.settings_file) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("Error loading settings: {:#}", err);
                return ExitCode::FAILURE;
            }
        };

        match self.command {
            Command::Replay { input, output } => match replay(settings, &input, output.as_deref())
            {
                Ok(_) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("Error replaying {}: {:#}", input.display(), err);
                    ExitCode::FAILURE
                }
            },
            Command::Mock {
                frames,
                width,
                height,
                seed,
            } => match run_mock(settings, width, height, frames, seed).await {
                Ok(_) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("Error in mock loop: {:#}", err);
                    ExitCode::FAILURE
                }
            },
            Command::Shot {
                cue,
                target,
                pockets,
                bounds,
                predict,
            } => {
                let [cx, cy, cr] = cue;
                let [tx, ty, tr] = target;
                let bounds = bounds
                    .map(|[x, y, w, h]| Rect::new(x, y, w, h))
                    .unwrap_or_default();
                let table = Table::new(
                    bounds,
                    pockets.iter().map(|[x, y]| Vector2::new(*x, *y)).collect(),
                );
                match print_shot(
                    &settings,
                    &Ball::cue(cx, cy, cr),
                    &Ball::target(tx, ty, tr),
                    &table,
                    predict,
                ) {
                    Ok(_) => ExitCode::SUCCESS,
                    Err(err) => {
                        eprintln!("Error computing shot: {:#}", err);
                        ExitCode::FAILURE
                    }
                }
            }
        }
    }
}

/// Parse exactly `N` comma separated numbers.
fn parse_numbers<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|err| format!("invalid number '{}': {}", part.trim(), err))
        })
        .collect::<Result<Vec<_>, _>>()?;
    values
        .try_into()
        .map_err(|values: Vec<f64>| format!("expected {} values, got {}", N, values.len()))
}

fn parse_ball(s: &str) -> Result<[f64; 3], String> {
    parse_numbers(s)
}

fn parse_point(s: &str) -> Result<[f64; 2], String> {
    parse_numbers(s)
}

fn parse_rect(s: &str) -> Result<[f64; 4], String> {
    parse_numbers(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_ball("100, 100,10").unwrap(), [100.0, 100.0, 10.0]);
        assert_eq!(parse_point("-5.5,3").unwrap(), [-5.5, 3.0]);
        assert!(parse_point("1,2,3").is_err());
        assert!(parse_rect("1,2,x,4").is_err());
        assert!(parse_ball("").is_err());
    }

    #[test]
    fn test_parse_shot_command() {
        let cli = Cli::try_parse_from([
            "cueline",
            "shot",
            "--cue",
            "100,100,10",
            "--target",
            "200,100,10",
            "--pocket",
            "400,100",
            "--pocket",
            "0,0",
            "--bounds",
            "0,0,400,200",
            "--predict",
        ])
        .unwrap();

        assert_eq!(cli.settings_file, PathBuf::from("cueline-settings.json"));
        assert_eq!(cli.log_level, "info");
        match cli.command {
            Command::Shot {
                cue,
                target,
                pockets,
                bounds,
                predict,
            } => {
                assert_eq!(cue, [100.0, 100.0, 10.0]);
                assert_eq!(target, [200.0, 100.0, 10.0]);
                assert_eq!(pockets, vec![[400.0, 100.0], [0.0, 0.0]]);
                assert_eq!(bounds, Some([0.0, 0.0, 400.0, 200.0]));
                assert!(predict);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_replay_command() {
        let cli = Cli::try_parse_from([
            "cueline",
            "--log-level",
            "debug",
            "replay",
            "--input",
            "frames.json",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(
            cli.command,
            Command::Replay { ref input, output: None } if input == &PathBuf::from("frames.json")
        ));
    }

    #[test]
    fn test_shot_requires_balls() {
        assert!(Cli::try_parse_from(["cueline", "shot", "--cue", "1,2,3"]).is_err());
    }
}
