use std::fmt;

use crate::format::{Format, FormatError};

/// The widest address space whose size and indices fit a `u64`.
pub const MAX_ADDRESS_WIDTH: u32 = 63;

/// A named, typed function argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: String,
    pub format: Format,
}

impl ArgumentSpec {
    pub fn new<S: Into<String>>(name: S, format: Format) -> ArgumentSpec {
        ArgumentSpec {
            name: name.into(),
            format,
        }
    }
}

/// The signature of a tabulated function.
///
/// Argument order defines digit significance in the address: the first
/// argument occupies the most significant address bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSpec {
    name: String,
    arguments: Vec<ArgumentSpec>,
    output: Format,
}

impl FunctionSpec {
    /// Checks every format, that argument names are unique and that the
    /// combined address width stays within [`MAX_ADDRESS_WIDTH`].
    ///
    /// An empty argument list is accepted here and rejected when the domain
    /// is enumerated.
    pub fn new<S: Into<String>>(
        name: S,
        arguments: Vec<ArgumentSpec>,
        output: Format,
    ) -> Result<FunctionSpec, SpecError> {
        output.check().map_err(SpecError::InvalidOutput)?;

        for (i, arg) in arguments.iter().enumerate() {
            arg.format.check().map_err(|source| {
                SpecError::InvalidArgument {
                    name: arg.name.clone(),
                    source,
                }
            })?;

            if arguments[..i].iter().any(|prev| prev.name == arg.name) {
                return Err(SpecError::DuplicateArgument(arg.name.clone()));
            }
        }

        let width = arguments
            .iter()
            .try_fold(0u32, |acc, arg| acc.checked_add(arg.format.width));

        match width {
            Some(width) if width <= MAX_ADDRESS_WIDTH => Ok(FunctionSpec {
                name: name.into(),
                arguments,
                output,
            }),
            _ => Err(SpecError::AddressTooWide),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn output(&self) -> &Format {
        &self.output
    }

    /// Total width of the input address, the sum of argument widths.
    pub fn address_width(&self) -> u32 {
        self.arguments.iter().map(|arg| arg.format.width).sum()
    }

    pub fn data_width(&self) -> u32 {
        self.output.width
    }

    /// Name of the generated memory, `{name}_{address}b_{data}b`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use memgen::domain::{ArgumentSpec, FunctionSpec};
    /// # use memgen::format::Format;
    /// #
    /// let spec = FunctionSpec::new(
    ///     "mult",
    ///     vec![
    ///         ArgumentSpec::new("x", Format::uint(4)),
    ///         ArgumentSpec::new("y", Format::uint(4)),
    ///     ],
    ///     Format::uint(8),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(spec.memory_name(), "mult_8b_8b");
    /// ```
    pub fn memory_name(&self) -> String {
        format!(
            "{}_{}b_{}b",
            self.name,
            self.address_width(),
            self.data_width()
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecError {
    InvalidArgument { name: String, source: FormatError },
    InvalidOutput(FormatError),
    DuplicateArgument(String),
    AddressTooWide,
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpecError::InvalidArgument { name, source } => {
                write!(f, "argument `{name}`: {source}")
            }
            SpecError::InvalidOutput(source) => write!(f, "output: {source}"),
            SpecError::DuplicateArgument(name) => {
                write!(f, "argument `{name}` is declared more than once")
            }
            SpecError::AddressTooWide => write!(
                f,
                "combined argument width exceeds {MAX_ADDRESS_WIDTH} bits"
            ),
        }
    }
}

impl std::error::Error for SpecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_names() {
        let args = vec![
            ArgumentSpec::new("x", Format::uint(4)),
            ArgumentSpec::new("x", Format::int(4)),
        ];

        assert_eq!(
            FunctionSpec::new("f", args, Format::uint(8)),
            Err(SpecError::DuplicateArgument("x".into()))
        );
    }

    #[test]
    fn rejects_invalid_formats() {
        let args = vec![ArgumentSpec::new("x", Format::uint(0))];

        assert_eq!(
            FunctionSpec::new("f", args, Format::uint(8)),
            Err(SpecError::InvalidArgument {
                name: "x".into(),
                source: FormatError::ZeroWidth,
            })
        );

        let args = vec![ArgumentSpec::new("x", Format::uint(4))];

        assert_eq!(
            FunctionSpec::new("f", args, Format::int(0)),
            Err(SpecError::InvalidOutput(FormatError::ZeroWidth))
        );
    }

    #[test]
    fn rejects_wide_addresses() {
        let args = vec![
            ArgumentSpec::new("x", Format::uint(32)),
            ArgumentSpec::new("y", Format::uint(32)),
        ];

        assert_eq!(
            FunctionSpec::new("f", args, Format::uint(8)),
            Err(SpecError::AddressTooWide)
        );
    }
}
