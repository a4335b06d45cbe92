//! YAML configuration files.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{ArgumentSpec, FunctionSpec, SpecError};
use crate::float::LayoutErrorKind;
use crate::format::{Format, FormatError, Kind};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    vivado_project_directory: Option<PathBuf>,
    function: Option<RawFunction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawFunction {
    name: String,
    arguments: Vec<RawArgument>,
    output_type: String,
    output_width: u32,
    output_precision: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArgument {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    width: u32,
    precision: Option<u32>,
}

/// A validated configuration.
#[derive(Debug)]
pub struct Config {
    /// Vivado project the generated IP is added to.
    pub project_dir: PathBuf,
    pub function: FunctionSpec,
}

impl Config {
    /// Parses and validates a configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// # use memgen::config::Config;
    /// #
    /// let config = Config::from_yaml(
    ///     "vivado-project-directory: build/vivado_builder
    /// function:
    ///   name: mult
    ///   arguments:
    ///     - { name: x, type: uint, width: 4 }
    ///     - { name: y, type: uint, width: 4 }
    ///   output-type: uint
    ///   output-width: 8
    /// ",
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(config.function.memory_name(), "mult_8b_8b");
    /// ```
    pub fn from_yaml(src: &str) -> Result<Config, ConfigError> {
        let raw: RawConfig =
            serde_yaml::from_str(src).map_err(ConfigError::Yaml)?;

        let project_dir = raw
            .vivado_project_directory
            .ok_or(ConfigError::MissingEntry("vivado-project-directory"))?;
        let function = raw
            .function
            .ok_or(ConfigError::MissingEntry("function"))?;

        if function.arguments.is_empty() {
            return Err(ConfigError::NoArguments);
        }

        let output = parse_format(
            Entry::Output,
            &function.output_type,
            function.output_width,
            function.output_precision,
        )?;

        let arguments = function
            .arguments
            .into_iter()
            .enumerate()
            .map(|(i, arg)| {
                let format = parse_format(
                    Entry::Argument(i),
                    &arg.kind,
                    arg.width,
                    arg.precision,
                )?;

                Ok(ArgumentSpec::new(arg.name, format))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let function = FunctionSpec::new(function.name, arguments, output)
            .map_err(ConfigError::Spec)?;

        Ok(Config {
            project_dir,
            function,
        })
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        log::info!("Parsing config file...");

        let src = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        let config = Config::from_yaml(&src)?;

        log::info!("Config file parsed okay");

        Ok(config)
    }
}

fn parse_format(
    entry: Entry,
    kind: &str,
    width: u32,
    precision: Option<u32>,
) -> Result<Format, ConfigError> {
    let kind: Kind = kind.parse().map_err(|_| ConfigError::UnsupportedType {
        entry,
        found: kind.to_owned(),
    })?;

    Format::new(kind, width, precision)
        .map_err(|source| ConfigError::InvalidFormat { entry, source })
}

/// The configuration entry an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entry {
    Output,
    /// Zero-based argument position.
    Argument(usize),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Entry::Output => write!(f, "output"),
            Entry::Argument(i) => {
                write!(f, "{} argument", ordinal(i + 1))
            }
        }
    }
}

/// Formats `1` as `1st`, `12` as `12th`, `22` as `22nd` and so on.
///
/// # Examples
///
/// ```
/// # use memgen::config::ordinal;
/// #
/// assert_eq!(ordinal(3), "3rd");
/// assert_eq!(ordinal(11), "11th");
/// assert_eq!(ordinal(101), "101st");
/// ```
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };

    format!("{n}{suffix}")
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Yaml(serde_yaml::Error),
    MissingEntry(&'static str),
    NoArguments,
    UnsupportedType { entry: Entry, found: String },
    InvalidFormat { entry: Entry, source: FormatError },
    Spec(SpecError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read `{}`: {source}", path.display())
            }
            ConfigError::Yaml(err) => {
                write!(f, "could not parse the YAML file: {err}")
            }
            ConfigError::MissingEntry(name) => {
                write!(f, "no entry in config file for {name}")
            }
            ConfigError::NoArguments => {
                write!(f, "function must have at least 1 argument")
            }
            ConfigError::UnsupportedType { entry, found } => {
                let kinds: Vec<_> =
                    Kind::ALL.iter().map(|kind| kind.name()).collect();

                write!(
                    f,
                    "{entry}'s type must be one of {}, found `{found}`",
                    kinds.join(", ")
                )
            }
            ConfigError::InvalidFormat { entry, source } => match source {
                FormatError::ZeroWidth => {
                    write!(f, "{entry}'s width must be a positive integer")
                }
                FormatError::MissingPrecision => {
                    write!(f, "{entry} is missing the 'precision' entry")
                }
                FormatError::UnexpectedPrecision => {
                    write!(f, "{entry} is not a float and takes no precision")
                }
                FormatError::Layout(err) => match err.kind {
                    LayoutErrorKind::NoPrecision => write!(
                        f,
                        "{entry}'s precision must be a positive integer"
                    ),
                    LayoutErrorKind::NoExponent => write!(
                        f,
                        "{entry}'s precision must be less than its width"
                    ),
                    LayoutErrorKind::ExponentTooWide => {
                        write!(f, "{entry}: {err}")
                    }
                },
            },
            ConfigError::Spec(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Yaml(err) => Some(err),
            ConfigError::Spec(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = "vivado-project-directory: vivado_builder\n";

    fn load(function: &str) -> Result<Config, ConfigError> {
        Config::from_yaml(&format!("{PROJECT}function:\n{function}"))
    }

    fn message(function: &str) -> String {
        load(function).unwrap_err().to_string()
    }

    #[test]
    fn full_configuration() {
        let config = load(
            "  name: scale
  arguments:
    - { name: x, type: float, width: 8, precision: 4 }
    - { name: n, type: int, width: 3 }
  output-type: float
  output-width: 16
  output-precision: 11
",
        )
        .unwrap();

        let function = &config.function;

        assert_eq!(config.project_dir, Path::new("vivado_builder"));
        assert_eq!(function.name(), "scale");
        assert_eq!(function.arguments()[0].format, Format::float(8, 4));
        assert_eq!(function.arguments()[1].name, "n");
        assert_eq!(*function.output(), Format::float(16, 11));
        assert_eq!(function.memory_name(), "scale_11b_16b");
    }

    #[test]
    fn missing_top_level_entries() {
        let err = Config::from_yaml("function: null\n").unwrap_err();

        assert_eq!(
            err.to_string(),
            "no entry in config file for vivado-project-directory"
        );

        let err = Config::from_yaml(PROJECT).unwrap_err();

        assert_eq!(err.to_string(), "no entry in config file for function");
    }

    #[test]
    fn unknown_entries_are_rejected() {
        let err = Config::from_yaml(&format!("{PROJECT}colour: blue\n"));

        assert!(matches!(err, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn at_least_one_argument() {
        let msg = message(
            "  name: f\n  arguments: []\n  output-type: uint\n  \
             output-width: 8\n",
        );

        assert_eq!(msg, "function must have at least 1 argument");
    }

    #[test]
    fn argument_errors_name_the_argument() {
        let function = |second: &str| {
            format!(
                "  name: f
  arguments:
    - {{ name: a, type: uint, width: 2 }}
    - {second}
  output-type: uint
  output-width: 8
"
            )
        };

        assert_eq!(
            message(&function("{ name: b, type: fixed, width: 2 }")),
            "2nd argument's type must be one of uint, int, float, found \
             `fixed`"
        );
        assert_eq!(
            message(&function("{ name: b, type: int, width: 0 }")),
            "2nd argument's width must be a positive integer"
        );
        assert_eq!(
            message(&function("{ name: b, type: float, width: 8 }")),
            "2nd argument is missing the 'precision' entry"
        );
        assert_eq!(
            message(&function(
                "{ name: b, type: float, width: 8, precision: 8 }"
            )),
            "2nd argument's precision must be less than its width"
        );
        assert_eq!(
            message(&function(
                "{ name: b, type: float, width: 40, precision: 8 }"
            )),
            "2nd argument: exponent field of 32 bits exceeds the supported \
             maximum of 16"
        );
        assert_eq!(
            message(&function("{ name: a, type: uint, width: 2 }")),
            "argument `a` is declared more than once"
        );
    }

    #[test]
    fn output_errors() {
        let msg = message(
            "  name: f
  arguments:
    - { name: a, type: uint, width: 2 }
  output-type: float
  output-width: 8
  output-precision: 0
",
        );

        assert_eq!(msg, "output's precision must be a positive integer");
    }

    #[test]
    fn address_width_is_bounded() {
        let msg = message(
            "  name: f
  arguments:
    - { name: a, type: uint, width: 32 }
    - { name: b, type: uint, width: 32 }
  output-type: uint
  output-width: 8
",
        );

        assert_eq!(msg, "combined argument width exceeds 63 bits");
    }

    #[test]
    fn ordinals() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (4, "4th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (112, "112th"),
        ];

        for (n, expected) in cases {
            assert_eq!(ordinal(n), expected);
        }
    }
}
