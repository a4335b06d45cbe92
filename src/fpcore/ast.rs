//! Abstract syntax for FPCore.

use std::ops::Range;

use malachite::Integer;
use pest::error::InputLocation;

pub use super::constants::{MathConst, MathOp, TestOp};

/// An FPCore benchmark.
#[derive(Debug)]
pub struct FPCore {
    /// Benchmark name.
    pub name: Option<Symbol>,
    /// List of free variables.
    pub args: Vec<Symbol>,
    /// List of metadata properties.
    pub props: Vec<Property>,
    /// Benchmark expression.
    pub body: Expression,
}

/// A metadata property. None affect evaluation.
#[derive(Debug)]
pub struct Property {
    pub name: Symbol,
    pub data: Data,
}

#[derive(Debug)]
pub enum Data {
    Symbol(Symbol),
    Num(Number),
    Str(String),
    List(Vec<Data>),
}

#[derive(Debug)]
pub struct Binder {
    pub var: Symbol,
    pub expr: Expression,
}

#[derive(Debug)]
pub enum ExprKind {
    Num(Number),
    Const(Constant),
    Id(Symbol),
    Op(Operation, Vec<Expression>),
    If {
        cond: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },
    Let {
        binders: Vec<Binder>,
        body: Box<Expression>,
        sequential: bool,
    },
}

#[derive(Debug)]
pub struct Expression {
    pub kind: ExprKind,
    pub span: Span,
}

/// A numeric literal.
#[derive(Debug)]
pub struct Number {
    pub value: Literal,
    pub span: Span,
}

/// Integers are kept exact; everything else is a machine float.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(Integer),
    Float(f64),
}

#[derive(Debug)]
pub struct Symbol {
    pub id: String,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Math(MathOp),
    Test(TestOp),
}

#[derive(Debug)]
pub struct Operation {
    pub kind: OpKind,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Constant {
    Math(MathConst),
    Bool(bool),
}

/// A byte range in the source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span) -> Self {
        Span {
            start: span.start(),
            end: span.end(),
        }
    }
}

impl From<InputLocation> for Span {
    fn from(location: InputLocation) -> Self {
        match location {
            InputLocation::Pos(pos) => Span {
                start: pos,
                end: pos,
            },
            InputLocation::Span((start, end)) => Span { start, end },
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}
