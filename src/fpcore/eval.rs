//! Evaluation of bound FPCore definitions.

use std::cmp::Ordering;
use std::fmt;

use malachite::num::arithmetic::traits::Abs;
use malachite::num::conversion::traits::RoundingFrom;
use malachite::rounding_modes::RoundingMode;
use malachite::Integer;
use smallvec::SmallVec;

use super::ast::{MathOp, TestOp};
use crate::domain::{Arguments, Value};
use crate::function::TableFunction;

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub(super) enum Datum {
    Int(Integer),
    Float(f64),
    Bool(bool),
}

impl Datum {
    fn to_float(&self, op: &'static str) -> Result<f64, EvalError> {
        match self {
            Datum::Int(value) => Ok(int_to_f64(value)),
            Datum::Float(value) => Ok(*value),
            Datum::Bool(_) => Err(EvalError::ExpectedNumber { op }),
        }
    }

    fn to_bool(&self, context: &'static str) -> Result<bool, EvalError> {
        match self {
            Datum::Bool(value) => Ok(*value),
            _ => Err(EvalError::ExpectedBoolean { context }),
        }
    }
}

impl From<&Value> for Datum {
    fn from(value: &Value) -> Self {
        match value {
            Value::Integer(value) => Datum::Int(value.clone()),
            Value::Real(value) => Datum::Float(value.to_f64()),
        }
    }
}

/// Lowered expression. Variables are resolved to slots of the evaluation
/// stack, which holds the parameters followed by the live let bindings.
#[derive(Debug)]
pub(super) enum Expr {
    Lit(Datum),
    Var(usize),
    Math(MathOp, Vec<Expr>),
    Test(TestOp, Vec<Expr>),
    If(Box<[Expr; 3]>),
    Let {
        values: Vec<Expr>,
        body: Box<Expr>,
        sequential: bool,
    },
}

/// An FPCore definition bound to the arguments of a table.
#[derive(Debug)]
pub struct CompiledFunction {
    /// For each FPCore parameter, its position in [`Arguments`].
    pub(super) params: Vec<usize>,
    pub(super) body: Expr,
}

impl CompiledFunction {
    pub fn call(&self, args: &Arguments) -> Result<Value, EvalError> {
        let mut stack: Vec<Datum> = self
            .params
            .iter()
            .map(|&index| Datum::from(&args[index]))
            .collect();

        match eval(&self.body, &mut stack)? {
            Datum::Int(value) => Ok(Value::Integer(value)),
            Datum::Float(value) => Ok(Value::from(value)),
            Datum::Bool(_) => Err(EvalError::BooleanResult),
        }
    }
}

impl TableFunction for CompiledFunction {
    type Error = EvalError;

    fn evaluate(&self, args: &Arguments) -> Result<Value, EvalError> {
        self.call(args)
    }
}

fn eval(expr: &Expr, stack: &mut Vec<Datum>) -> Result<Datum, EvalError> {
    match expr {
        Expr::Lit(value) => Ok(value.clone()),
        Expr::Var(slot) => Ok(stack[*slot].clone()),
        Expr::Math(op, args) => {
            let args = args
                .iter()
                .map(|arg| eval(arg, stack))
                .collect::<Result<SmallVec<[Datum; 3]>, _>>()?;

            apply_math(*op, &args)
        }
        Expr::Test(op, args) => eval_test(*op, args, stack).map(Datum::Bool),
        Expr::If(branches) => {
            let [cond, if_true, if_false] = &**branches;

            if eval(cond, stack)?.to_bool("if")? {
                eval(if_true, stack)
            } else {
                eval(if_false, stack)
            }
        }
        Expr::Let {
            values,
            body,
            sequential,
        } => {
            let depth = stack.len();

            if *sequential {
                for value in values {
                    let value = eval(value, stack)?;

                    stack.push(value);
                }
            } else {
                let values = values
                    .iter()
                    .map(|value| eval(value, stack))
                    .collect::<Result<Vec<_>, _>>()?;

                stack.extend(values);
            }

            let result = eval(body, stack);

            stack.truncate(depth);

            result
        }
    }
}

fn eval_test(
    op: TestOp,
    args: &[Expr],
    stack: &mut Vec<Datum>,
) -> Result<bool, EvalError> {
    let name = op.name();

    match op {
        TestOp::And => {
            for arg in args {
                if !eval(arg, stack)?.to_bool(name)? {
                    return Ok(false);
                }
            }

            Ok(true)
        }
        TestOp::Or => {
            for arg in args {
                if eval(arg, stack)?.to_bool(name)? {
                    return Ok(true);
                }
            }

            Ok(false)
        }
        TestOp::Not => Ok(!eval(&args[0], stack)?.to_bool(name)?),
        TestOp::IsFinite | TestOp::IsInf | TestOp::IsNan | TestOp::SignBit => {
            let value = eval(&args[0], stack)?;

            if let Datum::Int(value) = &value {
                return Ok(match op {
                    TestOp::IsFinite => true,
                    TestOp::SignBit => *value < 0,
                    _ => false,
                });
            }

            let value = value.to_float(name)?;

            Ok(match op {
                TestOp::IsFinite => value.is_finite(),
                TestOp::IsInf => value.is_infinite(),
                TestOp::IsNan => value.is_nan(),
                _ => value.is_sign_negative(),
            })
        }
        TestOp::Lt
        | TestOp::Gt
        | TestOp::Leq
        | TestOp::Geq
        | TestOp::Eq
        | TestOp::Neq => {
            let values = args
                .iter()
                .map(|arg| eval(arg, stack))
                .collect::<Result<SmallVec<[Datum; 3]>, _>>()?;

            if op == TestOp::Neq {
                for (i, lhs) in values.iter().enumerate() {
                    for rhs in &values[i + 1..] {
                        if compare(lhs, rhs, name)? == Some(Ordering::Equal) {
                            return Ok(false);
                        }
                    }
                }

                return Ok(true);
            }

            for pair in values.windows(2) {
                let holds = match compare(&pair[0], &pair[1], name)? {
                    None => false,
                    Some(ord) => match op {
                        TestOp::Lt => ord.is_lt(),
                        TestOp::Gt => ord.is_gt(),
                        TestOp::Leq => ord.is_le(),
                        TestOp::Geq => ord.is_ge(),
                        _ => ord.is_eq(),
                    },
                };

                if !holds {
                    return Ok(false);
                }
            }

            Ok(true)
        }
    }
}

/// Integers compare exactly; anything involving a float compares in `f64`,
/// where NaN is unordered.
fn compare(
    lhs: &Datum,
    rhs: &Datum,
    op: &'static str,
) -> Result<Option<Ordering>, EvalError> {
    if let (Datum::Int(lhs), Datum::Int(rhs)) = (lhs, rhs) {
        return Ok(Some(lhs.cmp(rhs)));
    }

    let lhs = lhs.to_float(op)?;
    let rhs = rhs.to_float(op)?;

    Ok(lhs.partial_cmp(&rhs))
}

fn apply_math(op: MathOp, args: &[Datum]) -> Result<Datum, EvalError> {
    match (op, args) {
        (MathOp::Add, [Datum::Int(x), Datum::Int(y)]) => Ok(Datum::Int(x + y)),
        (MathOp::Sub, [Datum::Int(x), Datum::Int(y)]) => Ok(Datum::Int(x - y)),
        (MathOp::Mul, [Datum::Int(x), Datum::Int(y)]) => Ok(Datum::Int(x * y)),
        (MathOp::Neg, [Datum::Int(x)]) => Ok(Datum::Int(-x)),
        (MathOp::FAbs, [Datum::Int(x)]) => Ok(Datum::Int(x.abs())),
        _ => {
            let x = args
                .iter()
                .map(|arg| arg.to_float(op.name()))
                .collect::<Result<SmallVec<[f64; 3]>, _>>()?;

            Ok(Datum::Float(apply_float(op, &x)))
        }
    }
}

fn apply_float(op: MathOp, x: &[f64]) -> f64 {
    match op {
        MathOp::Add => x[0] + x[1],
        MathOp::Sub => x[0] - x[1],
        MathOp::Mul => x[0] * x[1],
        MathOp::Div => x[0] / x[1],
        MathOp::Neg => -x[0],
        MathOp::FAbs => x[0].abs(),
        MathOp::FMA => x[0].mul_add(x[1], x[2]),
        MathOp::Exp => x[0].exp(),
        MathOp::Exp2 => x[0].exp2(),
        MathOp::ExpM1 => x[0].exp_m1(),
        MathOp::Log => x[0].ln(),
        MathOp::Log10 => x[0].log10(),
        MathOp::Log2 => x[0].log2(),
        MathOp::Log1P => x[0].ln_1p(),
        MathOp::Pow => x[0].powf(x[1]),
        MathOp::Sqrt => x[0].sqrt(),
        MathOp::Cbrt => x[0].cbrt(),
        MathOp::Hypot => x[0].hypot(x[1]),
        MathOp::Sin => x[0].sin(),
        MathOp::Cos => x[0].cos(),
        MathOp::Tan => x[0].tan(),
        MathOp::ASin => x[0].asin(),
        MathOp::ACos => x[0].acos(),
        MathOp::ATan => x[0].atan(),
        MathOp::ATan2 => x[0].atan2(x[1]),
        MathOp::Sinh => x[0].sinh(),
        MathOp::Cosh => x[0].cosh(),
        MathOp::Tanh => x[0].tanh(),
        MathOp::ASinh => x[0].asinh(),
        MathOp::ACosh => x[0].acosh(),
        MathOp::ATanh => x[0].atanh(),
        MathOp::Ceil => x[0].ceil(),
        MathOp::Floor => x[0].floor(),
        MathOp::FMod => x[0] % x[1],
        MathOp::Remainder => {
            x[0] - round_half_even(x[0] / x[1]) * x[1]
        }
        MathOp::FMax => x[0].max(x[1]),
        MathOp::FMin => x[0].min(x[1]),
        MathOp::FDim => {
            if x[0].is_nan() || x[1].is_nan() {
                f64::NAN
            } else if x[0] > x[1] {
                x[0] - x[1]
            } else {
                0.0
            }
        }
        MathOp::CopySign => x[0].copysign(x[1]),
        MathOp::Trunc => x[0].trunc(),
        MathOp::Round => x[0].round(),
        MathOp::NearbyInt => round_half_even(x[0]),
    }
}

fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();

    if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        rounded
    }
}

fn int_to_f64(value: &Integer) -> f64 {
    f64::rounding_from(value, RoundingMode::Nearest).0
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalError {
    /// A boolean was passed to a numeric operation.
    ExpectedNumber { op: &'static str },
    /// A number was used as a condition or logical operand.
    ExpectedBoolean { context: &'static str },
    /// The function produced a boolean instead of a number.
    BooleanResult,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::ExpectedNumber { op } => {
                write!(f, "operator `{op}` expects numeric operands")
            }
            EvalError::ExpectedBoolean { context } => {
                write!(f, "`{context}` expects boolean operands")
            }
            EvalError::BooleanResult => {
                write!(f, "function returned a boolean")
            }
        }
    }
}

impl std::error::Error for EvalError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> Expr {
        Expr::Lit(Datum::Int(Integer::from(value)))
    }

    fn float(value: f64) -> Expr {
        Expr::Lit(Datum::Float(value))
    }

    fn run(expr: &Expr) -> Result<Datum, EvalError> {
        eval(expr, &mut Vec::new())
    }

    #[test]
    fn integer_arithmetic_is_exact() {
        let big = Integer::from(1u64 << 62);
        let expr = Expr::Math(
            MathOp::Mul,
            vec![Expr::Lit(Datum::Int(big.clone())), int(8)],
        );

        assert_eq!(run(&expr), Ok(Datum::Int(big * Integer::from(8))));

        let expr = Expr::Math(MathOp::FAbs, vec![int(-3)]);

        assert_eq!(run(&expr), Ok(Datum::Int(Integer::from(3))));
    }

    #[test]
    fn division_is_floating() {
        let expr = Expr::Math(MathOp::Div, vec![int(1), int(4)]);

        assert_eq!(run(&expr), Ok(Datum::Float(0.25)));
    }

    #[test]
    fn mixed_operands_promote() {
        let expr = Expr::Math(MathOp::Add, vec![int(1), float(0.5)]);

        assert_eq!(run(&expr), Ok(Datum::Float(1.5)));
    }

    #[test]
    fn rounding_operations() {
        let cases = [
            (MathOp::Round, 2.5, 3.0),
            (MathOp::Round, -2.5, -3.0),
            (MathOp::NearbyInt, 2.5, 2.0),
            (MathOp::NearbyInt, 3.5, 4.0),
            (MathOp::NearbyInt, -0.4, -0.0),
            (MathOp::Trunc, -1.7, -1.0),
        ];

        for (op, x, expected) in cases {
            assert_eq!(apply_float(op, &[x]), expected, "{op:?}({x})");
        }

        assert_eq!(apply_float(MathOp::Remainder, &[5.0, 2.0]), 1.0);
        assert_eq!(apply_float(MathOp::Remainder, &[7.0, 2.0]), -1.0);
        assert_eq!(apply_float(MathOp::FMod, &[7.0, 2.0]), 1.0);
        assert_eq!(apply_float(MathOp::FDim, &[1.0, 3.0]), 0.0);
    }

    #[test]
    fn comparisons_chain() {
        let chain = |op, args| run(&Expr::Test(op, args));

        assert_eq!(
            chain(TestOp::Lt, vec![int(1), float(1.5), int(2)]),
            Ok(Datum::Bool(true))
        );
        assert_eq!(
            chain(TestOp::Lt, vec![int(1), int(3), int(2)]),
            Ok(Datum::Bool(false))
        );
        assert_eq!(
            chain(TestOp::Neq, vec![int(1), int(2), int(1)]),
            Ok(Datum::Bool(false))
        );
        assert_eq!(
            chain(TestOp::Eq, vec![float(f64::NAN), float(f64::NAN)]),
            Ok(Datum::Bool(false))
        );
        assert_eq!(
            chain(TestOp::Neq, vec![float(f64::NAN), float(f64::NAN)]),
            Ok(Datum::Bool(true))
        );
    }

    #[test]
    fn let_bindings_use_the_stack() {
        // (let* ([a 2] [b (* a 3)]) (- b a)) with one parameter below
        let expr = Expr::Let {
            values: vec![
                int(2),
                Expr::Math(MathOp::Mul, vec![Expr::Var(1), int(3)]),
            ],
            body: Box::new(Expr::Math(
                MathOp::Sub,
                vec![Expr::Var(2), Expr::Var(1)],
            )),
            sequential: true,
        };

        let mut stack = vec![Datum::Int(Integer::from(100))];

        assert_eq!(eval(&expr, &mut stack), Ok(Datum::Int(Integer::from(4))));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn conditions_must_be_boolean() {
        let expr = Expr::If(Box::new([int(1), int(2), int(3)]));

        assert_eq!(
            run(&expr),
            Err(EvalError::ExpectedBoolean { context: "if" })
        );

        let expr =
            Expr::Math(MathOp::Sqrt, vec![Expr::Lit(Datum::Bool(true))]);

        assert_eq!(
            run(&expr),
            Err(EvalError::ExpectedNumber { op: "sqrt" })
        );
    }

    #[test]
    fn boolean_results_are_rejected() {
        let function = CompiledFunction {
            params: vec![],
            body: Expr::Lit(Datum::Bool(false)),
        };

        let args: Arguments =
            std::iter::empty::<(&str, Value)>().collect();

        assert_eq!(function.call(&args), Err(EvalError::BooleanResult));
    }

    #[test]
    fn parameters_map_to_arguments() {
        let function = CompiledFunction {
            params: vec![1, 0],
            body: Expr::Math(MathOp::Sub, vec![Expr::Var(0), Expr::Var(1)]),
        };

        let args: Arguments =
            [("x", Value::from(10i64)), ("y", Value::from(3i64))]
                .into_iter()
                .collect();

        assert_eq!(function.evaluate(&args), Ok(Value::from(-7i64)));
    }
}
