use std::fmt;
use std::iter::FusedIterator;

use malachite::{Integer, Natural};

use super::{CapacityError, EncodeError, MemoryGeometry, OutputEncoder};
use crate::domain::{DomainEnumerator, DomainError, FunctionSpec, Value};
use crate::float::LayoutError;
use crate::function::TableFunction;

/// The contents of one memory bank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryBank {
    index: u64,
    values: Vec<Natural>,
    max_value: Natural,
    requested_depth: u64,
}

impl MemoryBank {
    /// Bank number, the value of the address selector bits.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Words in address order.
    pub fn values(&self) -> &[Natural] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Natural> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The largest word stored in the bank.
    pub fn max_value(&self) -> &Natural {
        &self.max_value
    }

    /// The planned bank depth, which a final partial bank falls short of.
    pub fn requested_depth(&self) -> u64 {
        self.requested_depth
    }
}

/// A result that did not fit the output width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overflow {
    /// Address of the offending point.
    pub index: u64,
    pub result: Value,
    pub raw: Integer,
    pub mask: Natural,
}

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Output {} overflowed (max = {}) at address {}",
            self.raw, self.mask, self.index
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Accumulating,
    Full,
    Emitted,
    Exhausted,
}

/// Evaluates a function over its whole domain and splits the encoded
/// results into banks.
///
/// Yields one [`MemoryBank`] per filled bank, in bank order, followed by a
/// final partial bank when the domain is smaller than a single bank.
/// Overflowing results are logged and recorded without interrupting the
/// stream. An evaluation error ends it.
pub struct BankDistributor<F> {
    function: F,
    geometry: MemoryGeometry,
    enumerator: DomainEnumerator,
    encoder: OutputEncoder,
    state: State,
    buffer: Vec<Natural>,
    max_value: Natural,
    next_bank: u64,
    overflows: Vec<Overflow>,
}

impl<F: TableFunction> BankDistributor<F> {
    /// Validates the function's formats and plans its banks.
    ///
    /// Layouts are checked first, then the domain, then the bank capacity.
    pub fn new(
        spec: &FunctionSpec,
        function: F,
        bank_capacity: u64,
    ) -> Result<BankDistributor<F>, PlanError> {
        let encoder =
            OutputEncoder::new(spec.output()).map_err(PlanError::Output)?;
        let enumerator = DomainEnumerator::for_function(spec)?;

        let geometry = MemoryGeometry::plan(
            enumerator.address_width(),
            encoder.width(),
            bank_capacity,
        )?;

        let depth = usize::try_from(
            geometry.sub_memory_depth().min(geometry.total_words()),
        )
        .unwrap_or(usize::MAX);

        Ok(BankDistributor {
            function,
            geometry,
            enumerator,
            encoder,
            state: State::Accumulating,
            buffer: Vec::with_capacity(depth),
            max_value: Natural::from(0u32),
            next_bank: 0,
            overflows: Vec::new(),
        })
    }

    pub fn geometry(&self) -> &MemoryGeometry {
        &self.geometry
    }

    /// Overflows encountered so far.
    pub fn overflows(&self) -> &[Overflow] {
        &self.overflows
    }

    fn push(&mut self) -> Option<Result<(), EvaluationError<F::Error>>> {
        let index = self.enumerator.position();
        let args = self.enumerator.next()?;

        let result = match self.function.evaluate(&args) {
            Ok(result) => result,
            Err(source) => {
                return Some(Err(EvaluationError::Function { index, source }));
            }
        };

        let encoded = match self.encoder.encode(&result) {
            Ok(encoded) => encoded,
            Err(source) => {
                return Some(Err(EvaluationError::Encode { index, source }));
            }
        };

        if let Some(raw) = encoded.overflow {
            let overflow = Overflow {
                index,
                result,
                raw,
                mask: self.encoder.max_word(),
            };

            log::warn!("{overflow}");

            self.overflows.push(overflow);
        }

        if encoded.bits > self.max_value {
            self.max_value = encoded.bits.clone();
        }

        self.buffer.push(encoded.bits);

        Some(Ok(()))
    }

    fn emit(&mut self) -> MemoryBank {
        let capacity = self.buffer.capacity();

        let bank = MemoryBank {
            index: self.next_bank,
            values: std::mem::replace(
                &mut self.buffer,
                Vec::with_capacity(capacity),
            ),
            max_value: std::mem::replace(
                &mut self.max_value,
                Natural::from(0u32),
            ),
            requested_depth: self.geometry.sub_memory_depth(),
        };

        log::debug!(
            "Bank {} complete ({} words, max {:#x})",
            bank.index,
            bank.values.len(),
            bank.max_value
        );

        self.next_bank += 1;

        bank
    }
}

impl<F: TableFunction> Iterator for BankDistributor<F> {
    type Item = Result<MemoryBank, EvaluationError<F::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Accumulating => match self.push() {
                    Some(Ok(())) => {
                        let depth = self.geometry.sub_memory_depth();

                        if self.buffer.len() as u64 == depth {
                            self.state = State::Full;
                        }
                    }
                    Some(Err(err)) => {
                        self.state = State::Exhausted;

                        return Some(Err(err));
                    }
                    None if self.buffer.is_empty() => {
                        self.state = State::Exhausted;
                    }
                    None => self.state = State::Full,
                },
                State::Full => {
                    self.state = State::Emitted;

                    return Some(Ok(self.emit()));
                }
                State::Emitted => self.state = State::Accumulating,
                State::Exhausted => return None,
            }
        }
    }
}

impl<F: TableFunction> FusedIterator for BankDistributor<F> {}

/// Failure to set up a distribution.
#[derive(Debug)]
pub enum PlanError {
    Output(LayoutError),
    Domain(DomainError),
    Capacity(CapacityError),
}

impl From<DomainError> for PlanError {
    fn from(err: DomainError) -> Self {
        PlanError::Domain(err)
    }
}

impl From<CapacityError> for PlanError {
    fn from(err: CapacityError) -> Self {
        PlanError::Capacity(err)
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlanError::Output(err) => write!(f, "output format: {err}"),
            PlanError::Domain(err) => write!(f, "{err}"),
            PlanError::Capacity(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PlanError {}

/// Failure while filling the banks, at the address `index`.
#[derive(Debug, PartialEq, Eq)]
pub enum EvaluationError<E> {
    Function { index: u64, source: E },
    Encode { index: u64, source: EncodeError },
}

impl<E> EvaluationError<E> {
    pub fn index(&self) -> u64 {
        match self {
            EvaluationError::Function { index, .. }
            | EvaluationError::Encode { index, .. } => *index,
        }
    }
}

impl<E: fmt::Display> fmt::Display for EvaluationError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvaluationError::Function { index, source } => {
                write!(f, "evaluation failed at address {index}: {source}")
            }
            EvaluationError::Encode { index, source } => {
                write!(f, "at address {index}: {source}")
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for EvaluationError<E> {}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    use crate::domain::{ArgumentSpec, Arguments};
    use crate::format::Format;
    use crate::memory::DEFAULT_BANK_CAPACITY;

    fn spec(widths: &[u32], output: Format) -> FunctionSpec {
        let args = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| ArgumentSpec::new(format!("x{i}"), Format::uint(w)))
            .collect();

        FunctionSpec::new("f", args, output).unwrap()
    }

    fn identity(args: &Arguments) -> Result<Value, Infallible> {
        Ok(args[0].clone())
    }

    fn sum(args: &Arguments) -> Result<Value, Infallible> {
        let total = args
            .values()
            .iter()
            .filter_map(Value::as_integer)
            .fold(Integer::from(0), |acc, x| acc + x);

        Ok(Value::Integer(total))
    }

    // Rebuilds the address of a two-argument point.
    fn address(args: &Arguments) -> Result<Value, Infallible> {
        match (args[0].as_integer(), args[1].as_integer()) {
            (Some(hi), Some(lo)) => {
                Ok(Value::Integer(hi * Integer::from(8) + lo))
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn banks_cover_the_domain_in_order() {
        // 8-bit words in 256-bit banks hold 32 words each.
        let spec = spec(&[4, 3], Format::uint(8));
        let banks: Vec<_> = BankDistributor::new(&spec, address, 256)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(banks.len(), 4);

        for (i, bank) in banks.iter().enumerate() {
            assert_eq!(bank.index(), i as u64);
            assert_eq!(bank.len(), 32);
            assert_eq!(bank.requested_depth(), 32);
        }

        let words: Vec<_> =
            banks.into_iter().flat_map(MemoryBank::into_values).collect();
        let expected: Vec<_> = (0u32..128).map(Natural::from).collect();

        assert_eq!(words, expected);
    }

    #[test]
    fn small_domain_yields_one_partial_bank() {
        let spec = spec(&[3], Format::uint(8));
        let mut banks =
            BankDistributor::new(&spec, identity, DEFAULT_BANK_CAPACITY)
                .unwrap();

        assert_eq!(banks.geometry().num_sub_memories(), 1);

        let bank = banks.next().unwrap().unwrap();

        assert_eq!(bank.len(), 8);
        assert_eq!(bank.requested_depth(), 2048);
        assert_eq!(*bank.max_value(), 7u32);
        assert!(banks.next().is_none());
        assert!(banks.next().is_none());
    }

    #[test]
    fn overflow_is_recorded_and_masked() {
        let spec = spec(&[2, 2], Format::uint(2));
        let mut banks = BankDistributor::new(&spec, sum, 8).unwrap();

        let words: Vec<_> = banks
            .by_ref()
            .flat_map(|bank| bank.unwrap().into_values())
            .collect();

        assert_eq!(words.len(), 16);
        assert_eq!(words[15], 2u32);

        // Sums of 4 and above.
        let overflows: Vec<_> =
            banks.overflows().iter().map(|o| o.index).collect();

        assert_eq!(overflows, [7, 10, 11, 13, 14, 15]);
        assert_eq!(banks.overflows()[0].raw, Integer::from(4));
        assert_eq!(banks.overflows()[0].mask, 3u32);
    }

    #[test]
    fn function_errors_stop_the_stream() {
        let spec = spec(&[4], Format::uint(8));
        let failing = |args: &Arguments| match args[0].as_integer() {
            Some(x) if *x == 9 => Err("unsupported"),
            _ => Ok(Value::from(0u64)),
        };

        let mut banks = BankDistributor::new(&spec, failing, 64).unwrap();

        assert!(banks.next().unwrap().is_ok());
        assert_eq!(
            banks.next().unwrap(),
            Err(EvaluationError::Function {
                index: 9,
                source: "unsupported"
            })
        );
        assert!(banks.next().is_none());
    }

    #[test]
    fn fractional_results_abort() {
        let spec = spec(&[2], Format::uint(8));
        let half = |_: &Arguments| Ok::<_, Infallible>(Value::from(0.5));

        let err = BankDistributor::new(&spec, half, 64)
            .unwrap()
            .next()
            .unwrap()
            .unwrap_err();

        assert_eq!(err.index(), 0);
        assert!(matches!(err, EvaluationError::Encode { .. }));
    }

    #[test]
    fn setup_errors_come_in_order() {
        let empty = spec(&[], Format::uint(8));
        let result = BankDistributor::new(&empty, identity, 64);

        assert!(matches!(result, Err(PlanError::Domain(DomainError::Empty))));

        let wide = spec(&[4], Format::uint(128));
        let result = BankDistributor::new(&wide, identity, 64);

        assert!(matches!(result, Err(PlanError::Capacity(_))));
    }
}
