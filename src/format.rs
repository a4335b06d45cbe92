//! Numeric formats.

use std::fmt;

use strum_macros::{EnumString, IntoStaticStr};

use crate::float::{FloatLayout, LayoutError};

/// Interpretation of a bit pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    UInt,
    Int,
    Float,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::UInt, Kind::Int, Kind::Float];

    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numeric format with `width` total bits.
///
/// `precision` counts the significant bits of a floating-point format and
/// is absent for integer kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Format {
    pub kind: Kind,
    pub width: u32,
    pub precision: Option<u32>,
}

impl Format {
    /// Constructs a validated format.
    ///
    /// # Examples
    ///
    /// ```
    /// # use memgen::format::{Format, Kind};
    /// #
    /// assert!(Format::new(Kind::Float, 8, Some(4)).is_ok());
    /// assert!(Format::new(Kind::Float, 8, None).is_err());
    /// assert!(Format::new(Kind::UInt, 8, Some(4)).is_err());
    /// assert!(Format::new(Kind::Int, 0, None).is_err());
    /// ```
    pub fn new(
        kind: Kind,
        width: u32,
        precision: Option<u32>,
    ) -> Result<Format, FormatError> {
        if width == 0 {
            return Err(FormatError::ZeroWidth);
        }

        match (kind, precision) {
            (Kind::Float, None) => Err(FormatError::MissingPrecision),
            (Kind::Float, Some(precision)) => {
                FloatLayout::new(width, precision)?;

                Ok(Format {
                    kind,
                    width,
                    precision: Some(precision),
                })
            }
            (_, Some(_)) => Err(FormatError::UnexpectedPrecision),
            (_, None) => Ok(Format {
                kind,
                width,
                precision: None,
            }),
        }
    }

    /// Re-checks a format built without [`Format::new`].
    pub fn check(&self) -> Result<(), FormatError> {
        Format::new(self.kind, self.width, self.precision).map(drop)
    }

    pub fn uint(width: u32) -> Format {
        Format {
            kind: Kind::UInt,
            width,
            precision: None,
        }
    }

    pub fn int(width: u32) -> Format {
        Format {
            kind: Kind::Int,
            width,
            precision: None,
        }
    }

    pub fn float(width: u32, precision: u32) -> Format {
        Format {
            kind: Kind::Float,
            width,
            precision: Some(precision),
        }
    }

    /// Builds the floating-point layout of a float format, or `None` for
    /// integer kinds.
    pub fn layout(&self) -> Result<Option<FloatLayout>, LayoutError> {
        match self.kind {
            Kind::Float => {
                let precision = self.precision.unwrap_or(0);

                FloatLayout::new(self.width, precision).map(Some)
            }
            Kind::UInt | Kind::Int => Ok(None),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.precision {
            Some(precision) => {
                write!(f, "{}<{},{}>", self.kind, self.width, precision)
            }
            None => write!(f, "{}<{}>", self.kind, self.width),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatError {
    ZeroWidth,
    MissingPrecision,
    UnexpectedPrecision,
    Layout(LayoutError),
}

impl From<LayoutError> for FormatError {
    fn from(err: LayoutError) -> Self {
        FormatError::Layout(err)
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormatError::ZeroWidth => write!(f, "width must be positive"),
            FormatError::MissingPrecision => {
                write!(f, "floating-point formats require a precision")
            }
            FormatError::UnexpectedPrecision => {
                write!(f, "precision only applies to floating-point formats")
            }
            FormatError::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FormatError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!("uint".parse(), Ok(Kind::UInt));
        assert_eq!("float".parse(), Ok(Kind::Float));
        assert!("double".parse::<Kind>().is_err());
        assert_eq!(Kind::Int.to_string(), "int");
    }

    #[test]
    fn display() {
        assert_eq!(Format::float(8, 4).to_string(), "float<8,4>");
        assert_eq!(Format::uint(12).to_string(), "uint<12>");
    }

    #[test]
    fn unchecked_constructors_can_be_checked() {
        assert_eq!(Format::uint(8).check(), Ok(()));
        assert_eq!(Format::int(0).check(), Err(FormatError::ZeroWidth));
        assert!(matches!(
            Format::float(4, 4).check(),
            Err(FormatError::Layout(_))
        ));
    }

    #[test]
    fn float_layout_errors_surface() {
        let err = Format::new(Kind::Float, 8, Some(8)).unwrap_err();

        assert!(matches!(err, FormatError::Layout(_)));
        assert_eq!(
            err.to_string(),
            "precision (8) must be less than width (8)"
        );
    }
}
