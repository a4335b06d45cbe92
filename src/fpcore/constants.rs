//! Built-in operations and constants.

use std::f64::consts;
use std::ops::RangeInclusive;
use std::str::FromStr;

use strum_macros::IntoStaticStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[rustfmt::skip]
pub enum MathOp {
    #[strum(to_string = "+")] Add,
    #[strum(to_string = "-")] Sub,
    #[strum(to_string = "*")] Mul,
    #[strum(to_string = "/")] Div,
    #[strum(to_string = "-")] Neg,
    FAbs,  FMA,      Exp,       Exp2,   ExpM1,
    Log,   Log10,    Log2,      Log1P,  Pow,
    Sqrt,  Cbrt,     Hypot,     Sin,    Cos,
    Tan,   ASin,     ACos,      ATan,   ATan2,
    Sinh,  Cosh,     Tanh,      ASinh,  ACosh,
    ATanh, Ceil,     Floor,     FMod,   Remainder,
    FMax,  FMin,     FDim,      CopySign, Trunc,
    Round, NearbyInt,
}

impl FromStr for MathOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(MathOp::Add),
            "-" => Ok(MathOp::Sub),
            "*" => Ok(MathOp::Mul),
            "/" => Ok(MathOp::Div),
            "fabs" => Ok(MathOp::FAbs),
            "fma" => Ok(MathOp::FMA),
            "exp" => Ok(MathOp::Exp),
            "exp2" => Ok(MathOp::Exp2),
            "expm1" => Ok(MathOp::ExpM1),
            "log" => Ok(MathOp::Log),
            "log10" => Ok(MathOp::Log10),
            "log2" => Ok(MathOp::Log2),
            "log1p" => Ok(MathOp::Log1P),
            "pow" => Ok(MathOp::Pow),
            "sqrt" => Ok(MathOp::Sqrt),
            "cbrt" => Ok(MathOp::Cbrt),
            "hypot" => Ok(MathOp::Hypot),
            "sin" => Ok(MathOp::Sin),
            "cos" => Ok(MathOp::Cos),
            "tan" => Ok(MathOp::Tan),
            "asin" => Ok(MathOp::ASin),
            "acos" => Ok(MathOp::ACos),
            "atan" => Ok(MathOp::ATan),
            "atan2" => Ok(MathOp::ATan2),
            "sinh" => Ok(MathOp::Sinh),
            "cosh" => Ok(MathOp::Cosh),
            "tanh" => Ok(MathOp::Tanh),
            "asinh" => Ok(MathOp::ASinh),
            "acosh" => Ok(MathOp::ACosh),
            "atanh" => Ok(MathOp::ATanh),
            "ceil" => Ok(MathOp::Ceil),
            "floor" => Ok(MathOp::Floor),
            "fmod" => Ok(MathOp::FMod),
            "remainder" => Ok(MathOp::Remainder),
            "fmax" => Ok(MathOp::FMax),
            "fmin" => Ok(MathOp::FMin),
            "fdim" => Ok(MathOp::FDim),
            "copysign" => Ok(MathOp::CopySign),
            "trunc" => Ok(MathOp::Trunc),
            "round" => Ok(MathOp::Round),
            "nearbyint" => Ok(MathOp::NearbyInt),
            _ => Err(()),
        }
    }
}

impl MathOp {
    pub fn arity(&self) -> usize {
        match self {
            MathOp::Neg
            | MathOp::FAbs
            | MathOp::Exp
            | MathOp::Exp2
            | MathOp::ExpM1
            | MathOp::Log
            | MathOp::Log10
            | MathOp::Log2
            | MathOp::Log1P
            | MathOp::Sqrt
            | MathOp::Cbrt
            | MathOp::Sin
            | MathOp::Cos
            | MathOp::Tan
            | MathOp::ASin
            | MathOp::ACos
            | MathOp::ATan
            | MathOp::Sinh
            | MathOp::Cosh
            | MathOp::Tanh
            | MathOp::ASinh
            | MathOp::ACosh
            | MathOp::ATanh
            | MathOp::Ceil
            | MathOp::Floor
            | MathOp::Trunc
            | MathOp::Round
            | MathOp::NearbyInt => 1,
            MathOp::FMA => 3,
            _ => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
#[rustfmt::skip]
pub enum TestOp {
    #[strum(to_string = "<")] Lt,
    #[strum(to_string = ">")] Gt,
    #[strum(to_string = "<=")] Leq,
    #[strum(to_string = ">=")] Geq,
    #[strum(to_string = "==")] Eq,
    #[strum(to_string = "!=")] Neq,
    #[strum(to_string = "and")] And,
    #[strum(to_string = "or")] Or,
    #[strum(to_string = "not")] Not,
    #[strum(to_string = "isfinite")] IsFinite,
    #[strum(to_string = "isinf")] IsInf,
    #[strum(to_string = "isnan")] IsNan,
    #[strum(to_string = "signbit")] SignBit,
}

impl FromStr for TestOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(TestOp::Lt),
            ">" => Ok(TestOp::Gt),
            "<=" => Ok(TestOp::Leq),
            ">=" => Ok(TestOp::Geq),
            "==" => Ok(TestOp::Eq),
            "!=" => Ok(TestOp::Neq),
            "and" => Ok(TestOp::And),
            "or" => Ok(TestOp::Or),
            "not" => Ok(TestOp::Not),
            "isfinite" => Ok(TestOp::IsFinite),
            "isinf" => Ok(TestOp::IsInf),
            "isnan" => Ok(TestOp::IsNan),
            "signbit" => Ok(TestOp::SignBit),
            _ => Err(()),
        }
    }
}

impl TestOp {
    /// Accepted argument counts. Comparisons chain over any number of
    /// operands.
    pub fn arity(&self) -> RangeInclusive<usize> {
        match self {
            TestOp::Lt
            | TestOp::Gt
            | TestOp::Leq
            | TestOp::Geq
            | TestOp::Eq
            | TestOp::Neq => 2..=usize::MAX,
            TestOp::And | TestOp::Or => 1..=usize::MAX,
            TestOp::Not
            | TestOp::IsFinite
            | TestOp::IsInf
            | TestOp::IsNan
            | TestOp::SignBit => 1..=1,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Whether the operands are booleans rather than numbers.
    pub fn is_logical(&self) -> bool {
        matches!(self, TestOp::And | TestOp::Or | TestOp::Not)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(non_camel_case_types)]
#[rustfmt::skip]
pub enum MathConst {
    E,          LOG2E, LOG10E,  LN2,      LN10,
    PI,         PI_2,  PI_4,    M_1_PI,   M_2_PI,
    M_2_SQRTPI, SQRT2, SQRT1_2, INFINITY, NAN,
}

impl FromStr for MathConst {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "E" => Ok(MathConst::E),
            "LOG2E" => Ok(MathConst::LOG2E),
            "LOG10E" => Ok(MathConst::LOG10E),
            "LN2" => Ok(MathConst::LN2),
            "LN10" => Ok(MathConst::LN10),
            "PI" => Ok(MathConst::PI),
            "PI_2" => Ok(MathConst::PI_2),
            "PI_4" => Ok(MathConst::PI_4),
            "M_1_PI" => Ok(MathConst::M_1_PI),
            "M_2_PI" => Ok(MathConst::M_2_PI),
            "M_2_SQRTPI" => Ok(MathConst::M_2_SQRTPI),
            "SQRT2" => Ok(MathConst::SQRT2),
            "SQRT1_2" => Ok(MathConst::SQRT1_2),
            "INFINITY" => Ok(MathConst::INFINITY),
            "NAN" => Ok(MathConst::NAN),
            _ => Err(()),
        }
    }
}

impl MathConst {
    pub fn value(&self) -> f64 {
        match self {
            MathConst::E => consts::E,
            MathConst::LOG2E => consts::LOG2_E,
            MathConst::LOG10E => consts::LOG10_E,
            MathConst::LN2 => consts::LN_2,
            MathConst::LN10 => consts::LN_10,
            MathConst::PI => consts::PI,
            MathConst::PI_2 => consts::FRAC_PI_2,
            MathConst::PI_4 => consts::FRAC_PI_4,
            MathConst::M_1_PI => consts::FRAC_1_PI,
            MathConst::M_2_PI => consts::FRAC_2_PI,
            MathConst::M_2_SQRTPI => consts::FRAC_2_SQRT_PI,
            MathConst::SQRT2 => consts::SQRT_2,
            MathConst::SQRT1_2 => consts::FRAC_1_SQRT_2,
            MathConst::INFINITY => f64::INFINITY,
            MathConst::NAN => f64::NAN,
        }
    }
}
