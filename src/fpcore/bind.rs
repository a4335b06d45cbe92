//! Binding of FPCore definitions to the arguments of a table.

use super::ast;
use super::eval::{CompiledFunction, Datum, Expr};
use crate::domain::FunctionSpec;
use crate::utils::Diagnostic;

/// Selects the definition implementing `spec` and resolves it against the
/// declared arguments.
///
/// The definition named after the function is preferred; otherwise a sole
/// anonymous definition is used.
pub fn bind(
    defs: &[ast::FPCore],
    spec: &FunctionSpec,
) -> Result<CompiledFunction, Vec<Diagnostic>> {
    let def = select_definition(defs, spec.name()).map_err(|err| vec![err])?;

    for prop in &def.props {
        log::warn!("Ignoring property `:{}`", prop.name.id);
    }

    let params = bind_parameters(def, spec)?;

    let mut lowering = Lowering {
        scope: def.args.iter().map(|arg| arg.id.as_str()).collect(),
    };

    let body = lowering.lower(&def.body).map_err(|err| vec![err])?;

    Ok(CompiledFunction { params, body })
}

fn select_definition<'ast>(
    defs: &'ast [ast::FPCore],
    name: &str,
) -> Result<&'ast ast::FPCore, Diagnostic> {
    let mut named = defs.iter().filter_map(|def| match &def.name {
        Some(sym) if sym.id == name => Some((def, sym)),
        _ => None,
    });

    if let Some((def, first)) = named.next() {
        if let Some((_, second)) = named.next() {
            return Err(Diagnostic::error()
                .with_message(format!("redefinition of `{name}`"))
                .with_secondary(first.span, "name first defined here")
                .with_primary(second.span, "name already defined"));
        }

        return Ok(def);
    }

    let mut anonymous = defs.iter().filter(|def| def.name.is_none());

    match (anonymous.next(), anonymous.next()) {
        (Some(def), None) => Ok(def),
        (Some(_), Some(_)) => Err(Diagnostic::error()
            .with_message(format!("no definition named `{name}`"))
            .with_note("anonymous definitions are ambiguous")),
        (None, _) => Err(Diagnostic::error()
            .with_message(format!("no definition named `{name}`"))),
    }
}

/// Maps each FPCore parameter to its position in the table arguments.
fn bind_parameters(
    def: &ast::FPCore,
    spec: &FunctionSpec,
) -> Result<Vec<usize>, Vec<Diagnostic>> {
    let mut errors = Vec::new();
    let mut params = Vec::with_capacity(def.args.len());

    for (i, arg) in def.args.iter().enumerate() {
        if let Some(prev) = def.args[..i].iter().find(|prev| prev.id == arg.id)
        {
            errors.push(
                Diagnostic::error()
                    .with_message(format!("duplicate argument `{}`", arg.id))
                    .with_secondary(prev.span, "first declared here")
                    .with_primary(arg.span, "declared again"),
            );

            continue;
        }

        match spec.arguments().iter().position(|decl| decl.name == arg.id) {
            Some(index) => params.push(index),
            None => errors.push(
                Diagnostic::error()
                    .with_message(format!("unknown argument `{}`", arg.id))
                    .with_primary(arg.span, "not a configured argument"),
            ),
        }
    }

    for decl in spec.arguments() {
        if !def.args.iter().any(|arg| arg.id == decl.name) {
            let mut err = Diagnostic::error().with_message(format!(
                "argument `{}` is missing from the definition",
                decl.name,
            ));

            if let Some(sym) = &def.name {
                err = err.with_primary(sym.span, "definition used here");
            }

            errors.push(err);
        }
    }

    if errors.is_empty() {
        Ok(params)
    } else {
        Err(errors)
    }
}

struct Lowering<'ast> {
    /// Names in evaluation stack order.
    scope: Vec<&'ast str>,
}

impl<'ast> Lowering<'ast> {
    fn lower(
        &mut self,
        expr: &'ast ast::Expression,
    ) -> Result<Expr, Diagnostic> {
        match &expr.kind {
            ast::ExprKind::Num(num) => Ok(Expr::Lit(match &num.value {
                ast::Literal::Integer(value) => Datum::Int(value.clone()),
                ast::Literal::Float(value) => Datum::Float(*value),
            })),
            ast::ExprKind::Const(ast::Constant::Math(constant)) => {
                Ok(Expr::Lit(Datum::Float(constant.value())))
            }
            ast::ExprKind::Const(ast::Constant::Bool(value)) => {
                Ok(Expr::Lit(Datum::Bool(*value)))
            }
            ast::ExprKind::Id(sym) => {
                match self.scope.iter().rposition(|&name| name == sym.id) {
                    Some(slot) => Ok(Expr::Var(slot)),
                    None => Err(Diagnostic::error()
                        .with_message(format!("undefined name `{}`", sym.id))
                        .with_primary(sym.span, "undefined name")),
                }
            }
            ast::ExprKind::Op(op, args) => {
                check_arity(op, args.len())?;

                let args = args
                    .iter()
                    .map(|arg| self.lower(arg))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(match op.kind {
                    ast::OpKind::Math(op) => Expr::Math(op, args),
                    ast::OpKind::Test(op) => Expr::Test(op, args),
                })
            }
            ast::ExprKind::If {
                cond,
                if_true,
                if_false,
            } => Ok(Expr::If(Box::new([
                self.lower(cond)?,
                self.lower(if_true)?,
                self.lower(if_false)?,
            ]))),
            ast::ExprKind::Let {
                binders,
                body,
                sequential,
            } => {
                let depth = self.scope.len();
                let mut values = Vec::with_capacity(binders.len());

                for binder in binders {
                    values.push(self.lower(&binder.expr)?);

                    if *sequential {
                        self.scope.push(&binder.var.id);
                    }
                }

                if !*sequential {
                    self.scope
                        .extend(binders.iter().map(|binder| &*binder.var.id));
                }

                let body = self.lower(body);

                self.scope.truncate(depth);

                Ok(Expr::Let {
                    values,
                    body: Box::new(body?),
                    sequential: *sequential,
                })
            }
        }
    }
}

fn check_arity(op: &ast::Operation, found: usize) -> Result<(), Diagnostic> {
    let (name, expected) = match op.kind {
        ast::OpKind::Math(op) => (op.name(), op.arity()..=op.arity()),
        ast::OpKind::Test(op) => (op.name(), op.arity()),
    };

    if expected.contains(&found) {
        return Ok(());
    }

    let expected = if expected.start() == expected.end() {
        format!("{}", expected.start())
    } else {
        format!("at least {}", expected.start())
    };

    Err(Diagnostic::error()
        .with_message(format!(
            "operator `{name}` expects {expected} argument(s), found {found}"
        ))
        .with_primary(op.span, "wrong number of arguments"))
}
