//! Minimal CLI parsing for file path overrides.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, bail};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub profiles_path: Option<PathBuf>,
    pub formats_path: Option<PathBuf>,
    pub request_path: Option<PathBuf>,
    pub pretty: bool,
    pub show_help: bool,
}

/// What the binary should do with the parsed flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Decide { request_path: PathBuf },
}

pub const USAGE: &str = "\
Usage: librarian-decisions --request <path> [--profiles <path>] [--formats <path>] [--pretty]

  --request   JSON file with releases, held files and profile assignments
  --profiles  JSON file with quality profiles (default: $PROFILES_PATH)
  --formats   JSON file with custom formats (default: $CUSTOM_FORMATS_PATH)
  --pretty    human-readable logs instead of JSON";

impl CliOptions {
    pub fn from_args() -> Self {
        Self::parse(env::args().skip(1))
    }

    pub fn parse<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = CliOptions::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--pretty" => options.pretty = true,
                "-h" | "--help" => options.show_help = true,
                "--profiles" => options.profiles_path = args.next().map(PathBuf::from),
                "--formats" => options.formats_path = args.next().map(PathBuf::from),
                "--request" => options.request_path = args.next().map(PathBuf::from),
                _ => {
                    if let Some((flag, value)) = arg.split_once('=') {
                        let value = Some(PathBuf::from(value));
                        match flag {
                            "--profiles" => options.profiles_path = value,
                            "--formats" => options.formats_path = value,
                            "--request" => options.request_path = value,
                            _ => {}
                        }
                    }
                }
            }
        }
        options
    }

    /// `--help` wins; otherwise `--request` is required.
    pub fn command(&self) -> Result<Command> {
        if self.show_help {
            return Ok(Command::Help);
        }
        match &self.request_path {
            Some(path) => Ok(Command::Decide {
                request_path: path.clone(),
            }),
            None => bail!("missing required --request <path>\n\n{}", USAGE),
        }
    }
}
