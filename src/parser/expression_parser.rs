use crate::parser::helpers::{
    braces, brackets, bws, comma_list0, comma_list1, keyword, parens, parse_identifier, sym, ws,
};
use crate::parser::literal_parser::{parse_interpolated_string, parse_literal};
use crate::parser::statement_parser::parse_block;
use crate::parser::type_parser::parse_type_expression;
use crate::parser::{Input, PResult};
use crate::span::TextSpan;
use crate::syntax::expressions::{
    AnonymousObjectCreationExpression, AnonymousObjectMember, Argument, ArgumentModifier,
    ArrayCreationExpression, BinaryOperator, Expr, ExprKind, InvocationExpression, LambdaBody,
    LambdaExpression, LambdaParameter, MemberAccessExpression, NewExpression,
    ObjectInitializerEntry, UnaryOperator,
};
use crate::syntax::identifier::Identifier;
use crate::syntax::types::Type;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{one_of, satisfy};
use nom::combinator::{not, opt, peek, value};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::Parser as NomParser;
use nom_supreme::ParserExt;

/// Top-level expression entry point (assignment level).
pub fn parse_expression(input: Input) -> PResult<Expr> {
    parse_assignment(input)
}

/// `=` not followed by `=` (so `==` is left for the equality level).
fn assign_eq(input: Input) -> PResult<Input> {
    terminated(sym("="), peek(not(tag("="))))(input)
}

fn parse_assignment(input: Input) -> PResult<Expr> {
    let (input, target) = parse_conditional(input)?;
    let (input, value) = opt(preceded(assign_eq, parse_assignment))(input)?;
    Ok(match value {
        Some(value) => {
            let span = target.span.join(value.span);
            (
                input,
                Expr::new(
                    ExprKind::Assignment {
                        target: Box::new(target),
                        value: Box::new(value),
                    },
                    span,
                ),
            )
        }
        None => (input, target),
    })
}

fn parse_conditional(input: Input) -> PResult<Expr> {
    let (input, condition) = parse_coalesce(input)?;
    let (input, branches) = opt(tuple((
        terminated(sym("?"), peek(not(one_of("?.")))),
        parse_expression,
        sym(":"),
        parse_expression,
    )))(input)?;
    Ok(match branches {
        Some((_, when_true, _, when_false)) => {
            let span = condition.span.join(when_false.span);
            (
                input,
                Expr::new(
                    ExprKind::Conditional {
                        condition: Box::new(condition),
                        when_true: Box::new(when_true),
                        when_false: Box::new(when_false),
                    },
                    span,
                ),
            )
        }
        None => (input, condition),
    })
}

/// Binary operator token, optionally excluding following characters.
fn op<'a>(s: &'static str, excl: &'static str) -> impl FnMut(Input<'a>) -> PResult<'a, Input<'a>> {
    move |input| {
        let (rest, t) = sym(s)(input)?;
        if excl.is_empty() {
            Ok((rest, t))
        } else {
            let (rest, _) = peek(not(one_of(excl)))(rest)?;
            Ok((rest, t))
        }
    }
}

macro_rules! binary_level {
    ($name:ident, $next:ident, $(($tok:expr, $excl:expr, $bop:expr)),+ $(,)?) => {
        fn $name(input: Input) -> PResult<Expr> {
            let (mut input, mut left) = $next(input)?;
            loop {
                let mut found: Option<(Input, BinaryOperator)> = None;
                $(
                    if found.is_none() {
                        if let Ok((rest, _)) = op($tok, $excl)(input) {
                            found = Some((rest, $bop));
                        }
                    }
                )+
                let Some((rest, bop)) = found else { break };
                let (rest, right) = $next(rest)?;
                let span = left.span.join(right.span);
                left = Expr::new(
                    ExprKind::Binary {
                        left: Box::new(left),
                        op: bop,
                        right: Box::new(right),
                    },
                    span,
                );
                input = rest;
            }
            Ok((input, left))
        }
    };
}

binary_level!(parse_coalesce, parse_logical_or, ("??", "=", BinaryOperator::Coalesce));
binary_level!(parse_logical_or, parse_logical_and, ("||", "", BinaryOperator::Or));
binary_level!(parse_logical_and, parse_equality, ("&&", "", BinaryOperator::And));
binary_level!(
    parse_equality,
    parse_relational,
    ("==", "", BinaryOperator::Equal),
    ("!=", "", BinaryOperator::NotEqual),
);
binary_level!(
    parse_relational,
    parse_additive,
    ("<=", "", BinaryOperator::LessEqual),
    (">=", "", BinaryOperator::GreaterEqual),
    ("<", "<=", BinaryOperator::Less),
    (">", ">=", BinaryOperator::Greater),
);
binary_level!(
    parse_additive,
    parse_multiplicative,
    ("+", "+=", BinaryOperator::Add),
    ("-", "-=", BinaryOperator::Subtract),
);
binary_level!(
    parse_multiplicative,
    parse_unary,
    ("*", "=", BinaryOperator::Multiply),
    ("/", "=/*", BinaryOperator::Divide),
    ("%", "=", BinaryOperator::Modulo),
);

fn parse_unary(input: Input) -> PResult<Expr> {
    let (input, _) = ws(input)?;
    let start = input.location_offset();
    if let Ok((rest, _)) = op("!", "=")(input) {
        let (rest, inner) = parse_unary(rest)?;
        let span = TextSpan::new(start, inner.span.end);
        return Ok((
            rest,
            Expr::new(
                ExprKind::Unary {
                    op: UnaryOperator::Not,
                    expr: Box::new(inner),
                },
                span,
            ),
        ));
    }
    if let Ok((rest, _)) = op("-", "-=")(input) {
        let (rest, inner) = parse_unary(rest)?;
        let span = TextSpan::new(start, inner.span.end);
        return Ok((
            rest,
            Expr::new(
                ExprKind::Unary {
                    op: UnaryOperator::Negate,
                    expr: Box::new(inner),
                },
                span,
            ),
        ));
    }
    if let Ok((rest, _)) = op("+", "+=")(input) {
        let (rest, inner) = parse_unary(rest)?;
        let span = TextSpan::new(start, inner.span.end);
        return Ok((
            rest,
            Expr::new(
                ExprKind::Unary {
                    op: UnaryOperator::Plus,
                    expr: Box::new(inner),
                },
                span,
            ),
        ));
    }
    if let Ok((rest, _)) = keyword("await")(input) {
        let (rest, inner) = parse_unary(rest)?;
        let span = TextSpan::new(start, inner.span.end);
        return Ok((rest, Expr::new(ExprKind::Await(Box::new(inner)), span)));
    }
    parse_postfix(input)
}

/// `.name` / `?.name`, returning the null-conditional flag.
fn member_dot(input: Input) -> PResult<bool> {
    alt((value(true, sym("?.")), value(false, sym("."))))(input)
}

/// Explicit type arguments on a member are only committed when a call
/// follows, so `a.b < c` still parses as a comparison.
fn member_type_args(input: Input) -> PResult<Vec<Type>> {
    terminated(
        delimited(sym("<"), comma_list1(parse_type_expression), sym(">")),
        peek(sym("(")),
    )(input)
}

fn parse_argument(input: Input) -> PResult<Argument> {
    let (input, name) = opt(terminated(
        parse_identifier,
        terminated(sym(":"), peek(not(tag(":")))),
    ))(input)?;
    let (input, modifier) = opt(alt((
        value(ArgumentModifier::Ref, keyword("ref")),
        value(ArgumentModifier::Out, keyword("out")),
        value(ArgumentModifier::In, keyword("in")),
    )))(input)?;
    let (input, expr) = parse_expression(input)?;
    Ok((
        input,
        Argument {
            name,
            modifier,
            expr,
        },
    ))
}

pub fn parse_argument_list(input: Input) -> PResult<Vec<Argument>> {
    parens(comma_list0(parse_argument))(input)
}

fn parse_postfix(input: Input) -> PResult<Expr> {
    let (mut input, mut expr) = parse_primary(input)?;
    loop {
        if let Ok((rest, null_conditional)) = member_dot(input) {
            let (rest, member) = parse_identifier(rest)?;
            let (rest, type_args) = opt(member_type_args)(rest)?;
            let span = TextSpan::new(expr.span.start, rest.location_offset());
            expr = Expr::new(
                ExprKind::MemberAccess(Box::new(MemberAccessExpression {
                    object: expr,
                    member,
                    type_args: type_args.unwrap_or_default(),
                    null_conditional,
                })),
                span,
            );
            input = rest;
            continue;
        }
        if let Ok((rest, arguments)) = parse_argument_list(input) {
            let span = TextSpan::new(expr.span.start, rest.location_offset());
            expr = Expr::new(
                ExprKind::Invocation(Box::new(InvocationExpression {
                    callee: expr,
                    arguments,
                })),
                span,
            );
            input = rest;
            continue;
        }
        if let Ok((rest, indices)) = brackets(comma_list1(parse_expression))(input) {
            let span = TextSpan::new(expr.span.start, rest.location_offset());
            expr = Expr::new(
                ExprKind::Indexing {
                    target: Box::new(expr),
                    indices,
                },
                span,
            );
            input = rest;
            continue;
        }
        if let Ok((rest, _)) = terminated(sym("!"), peek(not(tag("="))))(input) {
            let span = TextSpan::new(expr.span.start, rest.location_offset());
            expr = Expr::new(ExprKind::NullForgiving(Box::new(expr)), span);
            input = rest;
            continue;
        }
        break;
    }
    Ok((input, expr))
}

fn parse_primary(input: Input) -> PResult<Expr> {
    let (input, _) = ws(input)?;
    let start = input.location_offset();
    let (rest, kind) = alt((
        parse_lambda_kind,
        parse_literal.map(ExprKind::Literal),
        bws(parse_interpolated_string).map(ExprKind::InterpolatedString),
        parse_new_kind,
        parse_default_kind,
        parse_typeof_kind,
        parse_nameof_kind,
        value(ExprKind::This, keyword("this")),
        value(ExprKind::Base, keyword("base")),
        parse_paren_or_cast_kind,
        parse_generic_name_kind,
        parse_identifier.map(|n| ExprKind::Variable(Identifier::Simple(n))),
    ))
    .context("expression")
    .parse(input)?;
    Ok((
        rest,
        Expr::new(kind, TextSpan::new(start, rest.location_offset())),
    ))
}

fn lambda_parameter(input: Input) -> PResult<LambdaParameter> {
    alt((
        pair(parse_type_expression, parse_identifier).map(|(t, n)| LambdaParameter {
            parameter_type: Some(t),
            name: n,
        }),
        parse_identifier.map(|n| LambdaParameter {
            parameter_type: None,
            name: n,
        }),
    ))(input)
}

fn parse_lambda_kind(input: Input) -> PResult<ExprKind> {
    let (input, parameters) = alt((
        parse_identifier.map(|n| {
            vec![LambdaParameter {
                parameter_type: None,
                name: n,
            }]
        }),
        parens(comma_list0(lambda_parameter)),
    ))(input)?;
    let (input, _) = sym("=>")(input)?;
    let (input, body) = alt((
        parse_block.map(|b| LambdaBody::Block(Box::new(b))),
        parse_expression.map(|e| LambdaBody::Expression(Box::new(e))),
    ))(input)?;
    Ok((
        input,
        ExprKind::Lambda(Box::new(LambdaExpression { parameters, body })),
    ))
}

fn anonymous_member(input: Input) -> PResult<AnonymousObjectMember> {
    alt((
        pair(terminated(parse_identifier, assign_eq), parse_expression).map(|(name, value)| {
            AnonymousObjectMember {
                name: Some(name),
                value,
            }
        }),
        parse_expression.map(|value| AnonymousObjectMember { name: None, value }),
    ))(input)
}

pub fn parse_initializer_entry(input: Input) -> PResult<ObjectInitializerEntry> {
    alt((
        pair(
            brackets(comma_list1(parse_expression)),
            preceded(assign_eq, parse_expression),
        )
        .map(|(indices, value)| ObjectInitializerEntry::Indexer { indices, value }),
        pair(terminated(parse_identifier, assign_eq), parse_expression)
            .map(|(name, value)| ObjectInitializerEntry::Property { name, value }),
        braces(comma_list0(parse_expression)).map(ObjectInitializerEntry::Element),
        parse_expression.map(ObjectInitializerEntry::Expression),
    ))(input)
}

fn object_initializer(input: Input) -> PResult<Vec<ObjectInitializerEntry>> {
    braces(comma_list0(parse_initializer_entry))(input)
}

fn parse_new_kind(input: Input) -> PResult<ExprKind> {
    let (input, _) = keyword("new")(input)?;

    // Anonymous object: `new { ... }`
    if let Ok((rest, initializers)) = braces(comma_list0(anonymous_member))(input) {
        return Ok((
            rest,
            ExprKind::AnonymousObject(AnonymousObjectCreationExpression { initializers }),
        ));
    }

    // Implicitly typed array: `new[] { ... }`
    if let Ok((rest, _)) = pair(sym("["), sym("]"))(input) {
        let (rest, elements) = braces(comma_list0(parse_expression))(rest)?;
        return Ok((
            rest,
            ExprKind::ArrayCreation(Box::new(ArrayCreationExpression {
                element_type: None,
                length: None,
                initializer: Some(elements),
            })),
        ));
    }

    // Target-typed: `new(args)` with optional initializer.
    if let Ok((rest, arguments)) = parse_argument_list(input) {
        let (rest, initializer) = opt(object_initializer)(rest)?;
        return Ok((
            rest,
            ExprKind::New(Box::new(NewExpression {
                target_type: None,
                arguments,
                initializer,
            })),
        ));
    }

    let (input, ty) = parse_type_expression(input)?;

    // `new T[] { ... }`; the type parser consumed the rank specifier.
    if let Type::Array { element_type, .. } = &ty {
        let (rest, elements) = opt(braces(comma_list0(parse_expression)))(input)?;
        return Ok((
            rest,
            ExprKind::ArrayCreation(Box::new(ArrayCreationExpression {
                element_type: Some((**element_type).clone()),
                length: None,
                initializer: elements,
            })),
        ));
    }

    // `new T[len]` sized form.
    if let Ok((rest, length)) = brackets(parse_expression)(input) {
        let (rest, elements) = opt(braces(comma_list0(parse_expression)))(rest)?;
        return Ok((
            rest,
            ExprKind::ArrayCreation(Box::new(ArrayCreationExpression {
                element_type: Some(ty),
                length: Some(length),
                initializer: elements,
            })),
        ));
    }

    // `new T(args) { inits }` or `new T { inits }`.
    let (input, arguments) = opt(parse_argument_list)(input)?;
    let (input, initializer) = opt(object_initializer)(input)?;
    Ok((
        input,
        ExprKind::New(Box::new(NewExpression {
            target_type: Some(ty),
            arguments: arguments.unwrap_or_default(),
            initializer,
        })),
    ))
}

fn parse_default_kind(input: Input) -> PResult<ExprKind> {
    let (input, _) = keyword("default")(input)?;
    let (input, ty) = opt(parens(parse_type_expression))(input)?;
    Ok((input, ExprKind::Default(ty)))
}

fn parse_typeof_kind(input: Input) -> PResult<ExprKind> {
    let (input, _) = keyword("typeof")(input)?;
    let (input, ty) = parens(parse_type_expression)(input)?;
    Ok((input, ExprKind::Typeof(ty)))
}

fn parse_nameof_kind(input: Input) -> PResult<ExprKind> {
    let (input, _) = keyword("nameof")(input)?;
    let (input, inner) = parens(parse_expression)(input)?;
    Ok((input, ExprKind::Nameof(Box::new(inner))))
}

/// Starts an expression after a cast: letters, digits, quotes, `(`, `_`,
/// `@`, `$`.
fn cast_operand_start(c: char) -> bool {
    c.is_alphanumeric() || "\"'(_@$".contains(c)
}

fn parse_paren_or_cast_kind(input: Input) -> PResult<ExprKind> {
    let cast = tuple((
        delimited(sym("("), parse_type_expression, sym(")")),
        preceded(ws, peek(satisfy(cast_operand_start))),
    ));
    let mut cast_attempt = cast;
    if let Ok((rest, (ty, _))) = cast_attempt.parse(input) {
        if !matches!(ty, Type::Var | Type::Void) {
            let (rest, inner) = parse_unary(rest)?;
            return Ok((
                rest,
                ExprKind::Cast {
                    target_type: ty,
                    expr: Box::new(inner),
                },
            ));
        }
    }
    parens(parse_expression)
        .map(|e| ExprKind::Parenthesized(Box::new(e)))
        .parse(input)
}

/// `Name<T1, T2>` committed only when an argument list follows.
fn parse_generic_name_kind(input: Input) -> PResult<ExprKind> {
    let (input, name) = parse_identifier(input)?;
    let (input, type_args) = member_type_args(input)?;
    Ok((
        input,
        ExprKind::GenericName {
            name: Identifier::Simple(name),
            type_args,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(src: &str) -> Expr {
        let (rest, e) = parse_expression(Input::new(src)).unwrap();
        assert!(
            rest.fragment().trim().is_empty(),
            "unparsed: {:?}",
            rest.fragment()
        );
        e
    }

    #[test]
    fn invocation_with_member_chain() {
        let e = expr(r#"logger.LogInformation("User {UserId} logged in", 42)"#);
        match &e.kind {
            ExprKind::Invocation(inv) => {
                assert_eq!(inv.arguments.len(), 2);
                match &inv.callee.kind {
                    ExprKind::MemberAccess(ma) => assert_eq!(ma.member, "LogInformation"),
                    other => panic!("unexpected callee {other:?}"),
                }
            }
            other => panic!("expected invocation, got {other:?}"),
        }
    }

    #[test]
    fn generic_member_invocation() {
        let e = expr(r#"LoggerMessage.Define<int, string>(LogLevel.Debug, new EventId(9), "{A} and {B}")"#);
        match &e.kind {
            ExprKind::Invocation(inv) => match &inv.callee.kind {
                ExprKind::MemberAccess(ma) => {
                    assert_eq!(ma.member, "Define");
                    assert_eq!(ma.type_args.len(), 2);
                }
                other => panic!("unexpected callee {other:?}"),
            },
            other => panic!("expected invocation, got {other:?}"),
        }
    }

    #[test]
    fn anonymous_object_members() {
        let e = expr("new { UserId = 5, TraceId = id, request.Path }");
        match &e.kind {
            ExprKind::AnonymousObject(obj) => {
                assert_eq!(obj.initializers.len(), 3);
                assert_eq!(obj.initializers[0].name.as_deref(), Some("UserId"));
                assert_eq!(obj.initializers[2].effective_name(), Some("Path"));
            }
            other => panic!("expected anonymous object, got {other:?}"),
        }
    }

    #[test]
    fn array_creation_forms() {
        assert!(matches!(
            expr("new object[] { 1, x }").kind,
            ExprKind::ArrayCreation(_)
        ));
        assert!(matches!(
            expr("new[] { 1, 2 }").kind,
            ExprKind::ArrayCreation(_)
        ));
        assert!(matches!(expr("new int[4]").kind, ExprKind::ArrayCreation(_)));
    }

    #[test]
    fn null_conditional_call() {
        let e = expr(r#"logger?.LogDebug("hi")"#);
        match &e.kind {
            ExprKind::Invocation(inv) => match &inv.callee.kind {
                ExprKind::MemberAccess(ma) => assert!(ma.null_conditional),
                other => panic!("unexpected callee {other:?}"),
            },
            other => panic!("expected invocation, got {other:?}"),
        }
    }

    #[test]
    fn cast_vs_parenthesized() {
        assert!(matches!(expr("(int)x").kind, ExprKind::Cast { .. }));
        assert!(matches!(
            expr("(x + y)").kind,
            ExprKind::Parenthesized(_)
        ));
    }

    #[test]
    fn dictionary_initializer_entries() {
        let e = expr(r#"new Dictionary<string, object?> { ["UserId"] = 7, ["Name"] = name }"#);
        match &e.kind {
            ExprKind::New(new) => {
                let entries = new.initializer.as_ref().unwrap();
                assert_eq!(entries.len(), 2);
                assert!(matches!(
                    entries[0],
                    ObjectInitializerEntry::Indexer { .. }
                ));
            }
            other => panic!("expected new, got {other:?}"),
        }
    }

    #[test]
    fn conditional_and_coalesce() {
        assert!(matches!(
            expr("a ? b : c").kind,
            ExprKind::Conditional { .. }
        ));
        assert!(matches!(expr("a ?? b").kind, ExprKind::Binary { .. }));
    }

    #[test]
    fn spans_recover_source_text() {
        let src = r#"logger.Log(LogLevel.Warning, "oops {X}", x)"#;
        let e = expr(src);
        assert_eq!(e.text(src), src);
        match &e.kind {
            ExprKind::Invocation(inv) => {
                assert_eq!(inv.arguments[2].expr.text(src), "x");
            }
            other => panic!("expected invocation, got {other:?}"),
        }
    }
}
