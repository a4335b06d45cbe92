use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;
use std::rc::Rc;

use smallvec::{smallvec, SmallVec};

use super::{ArgumentDomain, ArgumentSpec, FunctionSpec, Value};
use super::MAX_ADDRESS_WIDTH;
use crate::float::LayoutError;

/// Argument values for one point of the domain, accessible by name or by
/// position.
#[derive(Clone, Debug, PartialEq)]
pub struct Arguments {
    names: Rc<[String]>,
    values: SmallVec<[Value; 4]>,
}

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.values[i])
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Index<usize> for Arguments {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        let (names, values): (Vec<String>, _) = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .unzip();

        Arguments {
            names: names.into(),
            values,
        }
    }
}

/// Enumerates every point of a function's input domain in address order.
///
/// The first argument is the most significant digit of the address and
/// changes slowest. The enumerator is an odometer over the raw digits: each
/// step increments the last digit and carries leftwards, decoding only the
/// digits that changed.
#[derive(Clone, Debug)]
pub struct DomainEnumerator {
    names: Rc<[String]>,
    domains: SmallVec<[ArgumentDomain; 4]>,
    digits: SmallVec<[u64; 4]>,
    current: SmallVec<[Value; 4]>,
    address_width: u32,
    next_index: u64,
    size: u64,
}

impl DomainEnumerator {
    /// # Examples
    ///
    /// ```
    /// # use memgen::domain::{ArgumentSpec, DomainEnumerator, Value};
    /// # use memgen::format::Format;
    /// #
    /// let args = [
    ///     ArgumentSpec::new("x", Format::uint(1)),
    ///     ArgumentSpec::new("y", Format::int(2)),
    /// ];
    ///
    /// let points: Vec<_> = DomainEnumerator::new(&args)
    ///     .unwrap()
    ///     .map(|args| (args[0].clone(), args[1].clone()))
    ///     .collect();
    ///
    /// assert_eq!(points.len(), 8);
    /// assert_eq!(points[0], (Value::from(0u64), Value::from(0i64)));
    /// assert_eq!(points[2], (Value::from(0u64), Value::from(-2i64)));
    /// assert_eq!(points[7], (Value::from(1u64), Value::from(-1i64)));
    /// ```
    pub fn new(
        arguments: &[ArgumentSpec],
    ) -> Result<DomainEnumerator, DomainError> {
        if arguments.is_empty() {
            return Err(DomainError::Empty);
        }

        let domains = arguments
            .iter()
            .map(|arg| {
                ArgumentDomain::new(&arg.format).map_err(|source| {
                    DomainError::Layout {
                        argument: arg.name.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<SmallVec<[_; 4]>, _>>()?;

        let address_width = domains
            .iter()
            .try_fold(0u32, |acc, domain| acc.checked_add(domain.width()))
            .filter(|&width| width <= MAX_ADDRESS_WIDTH)
            .ok_or(DomainError::AddressTooWide)?;

        let names: Vec<String> =
            arguments.iter().map(|arg| arg.name.clone()).collect();
        let current = domains.iter().map(|domain| domain.value(0)).collect();

        Ok(DomainEnumerator {
            names: names.into(),
            digits: smallvec![0; domains.len()],
            domains,
            current,
            address_width,
            next_index: 0,
            size: 1 << address_width,
        })
    }

    pub fn for_function(
        spec: &FunctionSpec,
    ) -> Result<DomainEnumerator, DomainError> {
        DomainEnumerator::new(spec.arguments())
    }

    pub fn address_width(&self) -> u32 {
        self.address_width
    }

    /// Total number of points, `2^address_width`.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Index of the next point to be produced.
    pub fn position(&self) -> u64 {
        self.next_index
    }

    /// Splits an address into the raw digits of each argument, most
    /// significant first.
    ///
    /// # Examples
    ///
    /// ```
    /// # use memgen::domain::{ArgumentSpec, DomainEnumerator};
    /// # use memgen::format::Format;
    /// #
    /// let args = [
    ///     ArgumentSpec::new("x", Format::uint(4)),
    ///     ArgumentSpec::new("y", Format::uint(2)),
    /// ];
    /// let domain = DomainEnumerator::new(&args).unwrap();
    ///
    /// assert_eq!(domain.digits(0b1011_10).as_slice(), &[0b1011, 0b10]);
    /// ```
    pub fn digits(&self, index: u64) -> SmallVec<[u64; 4]> {
        let mut digits: SmallVec<[u64; 4]> =
            smallvec![0; self.domains.len()];
        let mut rest = index;

        for (digit, domain) in digits.iter_mut().zip(&self.domains).rev() {
            *digit = rest & domain.max_raw();
            rest = rest.checked_shr(domain.width()).unwrap_or(0);
        }

        digits
    }

    fn advance(&mut self) {
        for k in (0..self.domains.len()).rev() {
            let domain = &self.domains[k];

            if self.digits[k] == domain.max_raw() {
                self.digits[k] = 0;
                self.current[k] = domain.value(0);
            } else {
                self.digits[k] += 1;
                self.current[k] = domain.value(self.digits[k]);

                break;
            }
        }
    }
}

impl Iterator for DomainEnumerator {
    type Item = Arguments;

    fn next(&mut self) -> Option<Arguments> {
        if self.next_index == self.size {
            return None;
        }

        if self.next_index > 0 {
            self.advance();
        }

        self.next_index += 1;

        Some(Arguments {
            names: Rc::clone(&self.names),
            values: self.current.clone(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.size - self.next_index);

        (remaining.unwrap_or(usize::MAX), remaining.ok())
    }
}

impl ExactSizeIterator for DomainEnumerator {}

impl FusedIterator for DomainEnumerator {}

#[derive(Debug)]
pub enum DomainError {
    Empty,
    AddressTooWide,
    Layout {
        argument: String,
        source: LayoutError,
    },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DomainError::Empty => write!(f, "function has no arguments"),
            DomainError::AddressTooWide => write!(
                f,
                "combined argument width exceeds {MAX_ADDRESS_WIDTH} bits"
            ),
            DomainError::Layout { argument, source } => {
                write!(f, "argument `{argument}`: {source}")
            }
        }
    }
}

impl std::error::Error for DomainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DomainError::Layout { source, .. } => Some(source),
            _ => None,
        }
    }
}
