use crate::parser::expression_parser::parse_expression;
use crate::parser::helpers::{braces, comma_list0, comma_list1, keyword, parens, parse_identifier, sym};
use crate::parser::type_parser::parse_type_expression;
use crate::parser::{Input, PResult};
use crate::syntax::statements::{
    CatchClause, LocalDeclaration, Statement, UsingResource, VariableDeclarator,
};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::combinator::{not, opt, peek, value};
use nom::multi::many0;
use nom::sequence::{pair, preceded, terminated};
use nom::Parser as NomParser;
use nom_supreme::ParserExt;

fn assign_eq(input: Input) -> PResult<Input> {
    terminated(sym("="), peek(not(tag("="))))(input)
}

fn variable_declarator(input: Input) -> PResult<VariableDeclarator> {
    pair(parse_identifier, opt(preceded(assign_eq, parse_expression)))
        .map(|(name, initializer)| VariableDeclarator { name, initializer })
        .parse(input)
}

/// `const? T a = x, b`, without the trailing `;`.
fn local_declaration_core(input: Input) -> PResult<LocalDeclaration> {
    let (input, is_const) = opt(keyword("const"))(input)?;
    let (input, declared_type) = parse_type_expression(input)?;
    let (input, declarators) = comma_list1(variable_declarator)(input)?;
    Ok((
        input,
        LocalDeclaration {
            is_const: is_const.is_some(),
            is_using: false,
            declared_type,
            declarators,
        },
    ))
}

pub fn parse_block(input: Input) -> PResult<Statement> {
    braces(many0(parse_statement))
        .map(Statement::Block)
        .parse(input)
}

fn parse_if(input: Input) -> PResult<Statement> {
    let (input, _) = keyword("if")(input)?;
    let (input, condition) = parens(parse_expression)(input)?;
    let (input, then_branch) = parse_statement(input)?;
    let (input, else_branch) = opt(preceded(keyword("else"), parse_statement))(input)?;
    Ok((
        input,
        Statement::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        },
    ))
}

fn parse_while(input: Input) -> PResult<Statement> {
    let (input, _) = keyword("while")(input)?;
    let (input, condition) = parens(parse_expression)(input)?;
    let (input, body) = parse_statement(input)?;
    Ok((
        input,
        Statement::While {
            condition,
            body: Box::new(body),
        },
    ))
}

fn parse_do(input: Input) -> PResult<Statement> {
    let (input, _) = keyword("do")(input)?;
    let (input, body) = parse_statement(input)?;
    let (input, _) = keyword("while")(input)?;
    let (input, condition) = parens(parse_expression)(input)?;
    let (input, _) = sym(";")(input)?;
    Ok((
        input,
        Statement::Do {
            body: Box::new(body),
            condition,
        },
    ))
}

fn parse_for(input: Input) -> PResult<Statement> {
    let (input, _) = keyword("for")(input)?;
    let (input, _) = sym("(")(input)?;
    let (input, initializer) = opt(alt((
        local_declaration_core.map(Statement::LocalDeclaration),
        parse_expression.map(Statement::Expression),
    )))(input)?;
    let (input, _) = sym(";")(input)?;
    let (input, condition) = opt(parse_expression)(input)?;
    let (input, _) = sym(";")(input)?;
    let (input, iterators) = comma_list0(parse_expression)(input)?;
    let (input, _) = sym(")")(input)?;
    let (input, body) = parse_statement(input)?;
    Ok((
        input,
        Statement::For {
            initializer: initializer.map(Box::new),
            condition,
            iterators,
            body: Box::new(body),
        },
    ))
}

fn parse_foreach(input: Input) -> PResult<Statement> {
    let (input, _) = keyword("foreach")(input)?;
    let (input, _) = sym("(")(input)?;
    let (input, element_type) = parse_type_expression(input)?;
    let (input, name) = parse_identifier(input)?;
    let (input, _) = keyword("in")(input)?;
    let (input, collection) = parse_expression(input)?;
    let (input, _) = sym(")")(input)?;
    let (input, body) = parse_statement(input)?;
    Ok((
        input,
        Statement::Foreach {
            element_type,
            name,
            collection,
            body: Box::new(body),
        },
    ))
}

fn using_resource(input: Input) -> PResult<UsingResource> {
    alt((
        local_declaration_core.map(UsingResource::Declaration),
        parse_expression.map(UsingResource::Expression),
    ))(input)
}

fn parse_using(input: Input) -> PResult<Statement> {
    let (input, _) = keyword("using")(input)?;
    if let Ok((rest, resource)) = parens(using_resource)(input) {
        let (rest, body) = parse_statement(rest)?;
        return Ok((
            rest,
            Statement::Using {
                resource,
                body: Box::new(body),
            },
        ));
    }
    // `using var scope = ...;` declaration form, scoped to the rest of the
    // enclosing block.
    let (input, mut decl) = local_declaration_core(input)?;
    let (input, _) = sym(";")(input)?;
    decl.is_using = true;
    Ok((input, Statement::LocalDeclaration(decl)))
}

fn parse_catch(input: Input) -> PResult<CatchClause> {
    let (input, _) = keyword("catch")(input)?;
    let (input, header) = opt(parens(pair(parse_type_expression, opt(parse_identifier))))(input)?;
    let (input, body) = parse_block(input)?;
    let (exception_type, name) = match header {
        Some((ty, name)) => (Some(ty), name),
        None => (None, None),
    };
    Ok((
        input,
        CatchClause {
            exception_type,
            name,
            body,
        },
    ))
}

fn parse_try(input: Input) -> PResult<Statement> {
    let (input, _) = keyword("try")(input)?;
    let (input, body) = parse_block(input)?;
    let (input, catches) = many0(parse_catch)(input)?;
    let (input, finally_block) = opt(preceded(keyword("finally"), parse_block))(input)?;
    Ok((
        input,
        Statement::Try {
            body: Box::new(body),
            catches,
            finally_block: finally_block.map(Box::new),
        },
    ))
}

pub fn parse_statement(input: Input) -> PResult<Statement> {
    alt((
        parse_block,
        parse_if,
        parse_while,
        parse_do,
        parse_for,
        parse_foreach,
        parse_using,
        parse_try,
        terminated(preceded(keyword("return"), opt(parse_expression)), sym(";"))
            .map(Statement::Return),
        terminated(preceded(keyword("throw"), opt(parse_expression)), sym(";"))
            .map(Statement::Throw),
        value(Statement::Break, terminated(keyword("break"), sym(";"))),
        value(Statement::Continue, terminated(keyword("continue"), sym(";"))),
        value(Statement::Empty, sym(";")),
        terminated(local_declaration_core, sym(";")).map(Statement::LocalDeclaration),
        terminated(parse_expression, sym(";")).map(Statement::Expression),
    ))
    .context("statement")
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(src: &str) -> Statement {
        let (rest, s) = parse_statement(Input::new(src)).unwrap();
        assert!(
            rest.fragment().trim().is_empty(),
            "unparsed: {:?}",
            rest.fragment()
        );
        s
    }

    #[test]
    fn local_declarations() {
        match stmt("var x = 5;") {
            Statement::LocalDeclaration(d) => {
                assert_eq!(d.declarators[0].name, "x");
                assert!(!d.is_const);
            }
            other => panic!("unexpected {other:?}"),
        }
        match stmt(r#"const string Template = "User {Id}";"#) {
            Statement::LocalDeclaration(d) => assert!(d.is_const),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn using_forms() {
        assert!(matches!(
            stmt("using (logger.BeginScope(state)) { }"),
            Statement::Using { .. }
        ));
        match stmt("using var scope = logger.BeginScope(state);") {
            Statement::LocalDeclaration(d) => assert!(d.is_using),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn control_flow_nests() {
        let s = stmt(
            r#"try { if (x > 0) { logger.LogDebug("x {X}", x); } } catch (Exception ex) { } finally { }"#,
        );
        assert!(matches!(s, Statement::Try { .. }));
    }

    #[test]
    fn expression_statement() {
        assert!(matches!(
            stmt(r#"logger.LogError(ex, "boom");"#),
            Statement::Expression(_)
        ));
    }
}
