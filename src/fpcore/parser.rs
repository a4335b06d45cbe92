//! Parser for FPCore.

use std::str::FromStr;

use malachite::num::conversion::traits::{FromStringBase, RoundingFrom};
use malachite::rounding_modes::RoundingMode;
use malachite::{Integer, Natural, Rational};
use pest::error::{Error, ErrorVariant};
use pest_consume::{match_nodes, Parser};

use super::ast;

#[derive(Parser)]
#[grammar = "fpcore/syntax.pest"]
pub struct FPCoreParser;

impl FPCoreParser {
    pub fn parse_file(
        src: &str,
    ) -> Result<Vec<ast::FPCore>, Box<Error<Rule>>> {
        let nodes = FPCoreParser::parse(Rule::file, src)?;

        FPCoreParser::file(nodes.single()?).map_err(Box::new)
    }
}

type ParseResult<T> = Result<T, Error<Rule>>;
type Node<'i> = pest_consume::Node<'i, Rule, ()>;

#[pest_consume::parser]
impl FPCoreParser {
    fn EOI(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn file(input: Node) -> ParseResult<Vec<ast::FPCore>> {
        Ok(match_nodes!(input.into_children();
            [fpcore(defs).., EOI(_)] => defs.collect(),
        ))
    }

    fn fpcore(input: Node) -> ParseResult<ast::FPCore> {
        Ok(match_nodes!(input.into_children();
            [
                fpcore_kwd(_),
                symbol_opt(name),
                argument_list(args),
                property(props)..,
                expr(body)
            ] => {
                ast::FPCore {
                    name,
                    args,
                    props: props.collect(),
                    body,
                }
            },
        ))
    }

    fn symbol_opt(input: Node) -> ParseResult<Option<ast::Symbol>> {
        Ok(match_nodes!(input.into_children();
            [symbol(sym)] => Some(sym),
            [] => None,
        ))
    }

    fn argument_list(input: Node) -> ParseResult<Vec<ast::Symbol>> {
        Ok(match_nodes!(input.into_children();
            [symbol(args)..] => args.collect(),
        ))
    }

    fn binding(input: Node) -> ParseResult<ast::Binder> {
        Ok(match_nodes!(input.into_children();
            [symbol(var), expr(expr)] => ast::Binder { var, expr },
        ))
    }

    fn fpcore_kwd(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn if_kwd(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn let_kwd(input: Node) -> ParseResult<bool> {
        Ok(input.as_str().starts_with("let*"))
    }

    fn expr(input: Node) -> ParseResult<ast::Expression> {
        let span = ast::Span::from(input.as_span());

        let kind = match_nodes!(input.into_children();
            [number(num)] => ast::ExprKind::Num(num),
            [constant(constant)] => ast::ExprKind::Const(constant),
            [symbol(sym)] => ast::ExprKind::Id(sym),
            [operation(op)] => op,
            [if_kwd(_), expr(cond), expr(if_true), expr(if_false)] => {
                ast::ExprKind::If {
                    cond: Box::new(cond),
                    if_true: Box::new(if_true),
                    if_false: Box::new(if_false),
                }
            },
            [let_kwd(sequential), binding(binders).., expr(body)] => {
                ast::ExprKind::Let {
                    binders: binders.collect(),
                    body: Box::new(body),
                    sequential,
                }
            },
        );

        Ok(ast::Expression { kind, span })
    }

    fn operation(input: Node) -> ParseResult<ast::ExprKind> {
        Ok(match_nodes!(input.into_children();
            [minus(span), expr(arg)] => {
                let kind = ast::OpKind::Math(ast::MathOp::Neg);

                ast::ExprKind::Op(ast::Operation { kind, span }, vec![arg])
            },
            [minus(span), expr(minuend), expr(subtrahend)] => {
                let kind = ast::OpKind::Math(ast::MathOp::Sub);
                let args = vec![minuend, subtrahend];

                ast::ExprKind::Op(ast::Operation { kind, span }, args)
            },
            [operator(op), expr(args)..] => {
                ast::ExprKind::Op(op, args.collect())
            },
        ))
    }

    fn minus(input: Node) -> ParseResult<ast::Span> {
        Ok(ast::Span::from(input.as_span()))
    }

    fn mathematical_op(input: Node) -> ParseResult<ast::MathOp> {
        parse_node(&input)
    }

    fn testing_op(input: Node) -> ParseResult<ast::TestOp> {
        parse_node(&input)
    }

    fn operator(input: Node) -> ParseResult<ast::Operation> {
        let span = ast::Span::from(input.as_span());

        let kind = match_nodes!(input.into_children();
            [mathematical_op(op)] => ast::OpKind::Math(op),
            [testing_op(op)] => ast::OpKind::Test(op),
        );

        Ok(ast::Operation { kind, span })
    }

    fn mathematical_const(input: Node) -> ParseResult<ast::MathConst> {
        parse_node(&input)
    }

    fn boolean_const(input: Node) -> ParseResult<bool> {
        Ok(input.as_str() == "TRUE")
    }

    fn constant(input: Node) -> ParseResult<ast::Constant> {
        Ok(match_nodes!(input.into_children();
            [mathematical_const(constant)] => ast::Constant::Math(constant),
            [boolean_const(value)] => ast::Constant::Bool(value),
        ))
    }

    fn number(input: Node) -> ParseResult<ast::Number> {
        let span = ast::Span::from(input.as_span());

        let value = match_nodes!(input.into_children();
            [rational(value)] => value,
            [decnum(value)] => value,
        );

        Ok(ast::Number { value, span })
    }

    /// `n/d` literals are exact; integral ones stay integers.
    fn rational(input: Node) -> ParseResult<ast::Literal> {
        let text = input.as_str();

        let (positive, text) = match text.strip_prefix('-') {
            Some(rest) => (false, rest),
            None => (true, text.trim_start_matches('+')),
        };

        let value = text.split_once('/').and_then(|(num, den)| {
            let num = Natural::from_string_base(10, num)?;
            let den = Natural::from_string_base(10, den)?;

            Some(Rational::from_sign_and_naturals(positive, num, den))
        });

        let Some(value) = value else {
            return Err(custom_error(&input, "malformed rational literal"));
        };

        Ok(match Integer::try_from(&value) {
            Ok(value) => ast::Literal::Integer(value),
            Err(_) => ast::Literal::Float(
                f64::rounding_from(&value, RoundingMode::Nearest).0,
            ),
        })
    }

    fn decnum(input: Node) -> ParseResult<ast::Literal> {
        let text = input.as_str().trim_start_matches('+');

        if let Ok(value) = Integer::from_str(text) {
            return Ok(ast::Literal::Integer(value));
        }

        parse_node::<f64>(&input).map(ast::Literal::Float)
    }

    fn symbol(input: Node) -> ParseResult<ast::Symbol> {
        Ok(ast::Symbol {
            id: input.as_str().into(),
            span: ast::Span::from(input.as_span()),
        })
    }

    fn printable(input: Node) -> ParseResult<&str> {
        Ok(match input.as_str() {
            "\\\\" => "\\",
            "\\\"" => "\"",
            s => s,
        })
    }

    fn string(input: Node) -> ParseResult<String> {
        Ok(match_nodes!(input.into_children();
            [printable(c)..] => c.collect(),
        ))
    }

    fn property_name(input: Node) -> ParseResult<ast::Symbol> {
        Ok(match_nodes!(input.into_children();
            [symbol(name)] => name,
        ))
    }

    fn property(input: Node) -> ParseResult<ast::Property> {
        Ok(match_nodes!(input.into_children();
            [property_name(name), data(data)] => ast::Property { name, data },
        ))
    }

    fn data(input: Node) -> ParseResult<ast::Data> {
        Ok(match_nodes!(input.into_children();
            [symbol(sym)] => ast::Data::Symbol(sym),
            [number(num)] => ast::Data::Num(num),
            [string(s)] => ast::Data::Str(s),
            [data(data)..] => ast::Data::List(data.collect()),
        ))
    }
}

#[allow(clippy::result_large_err)]
fn parse_node<T: FromStr>(input: &Node) -> ParseResult<T> {
    input.as_str().parse().map_err(|_| {
        custom_error(input, format!("invalid token `{}`", input.as_str()))
    })
}

fn custom_error<M: Into<String>>(input: &Node, message: M) -> Error<Rule> {
    Error::new_from_span(
        ErrorVariant::CustomError {
            message: message.into(),
        },
        input.as_span(),
    )
}
