use crate::parser::expression_parser::parse_expression;
use crate::parser::helpers::{
    braces, brackets, comma_list0, comma_list1, keyword, parens, parse_identifier,
    parse_qualified_identifier, spanned, sym,
};
use crate::parser::statement_parser::parse_block;
use crate::parser::type_parser::{parse_base_list, parse_type_expression, parse_type_parameters};
use crate::parser::{Input, PResult};
use crate::syntax::declarations::{
    Attribute, AttributeArgument, AttributeList, ClassDeclaration, ConstructorDeclaration,
    EnumDeclaration, EnumMember, FieldDeclaration, InterfaceDeclaration, Member,
    MethodDeclaration, Modifier, PropertyAccessor, PropertyDeclaration, TypeDeclaration,
    TypeKeyword,
};
use crate::syntax::types::{Parameter, ParameterModifier};
use crate::syntax::unit::{CompilationUnit, NamespaceDeclaration, TopLevelMember, UsingDirective};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::combinator::{not, opt, peek, value};
use nom::multi::{many0, many1};
use nom::sequence::{pair, preceded, terminated};
use nom::Parser as NomParser;
use nom_supreme::ParserExt;

fn assign_eq(input: Input) -> PResult<Input> {
    terminated(sym("="), peek(not(tag("="))))(input)
}

fn attribute_argument(input: Input) -> PResult<AttributeArgument> {
    alt((
        pair(terminated(parse_identifier, assign_eq), parse_expression).map(|(name, expr)| {
            AttributeArgument {
                name: Some(name),
                expr,
            }
        }),
        parse_expression.map(|expr| AttributeArgument { name: None, expr }),
    ))(input)
}

fn parse_attribute(input: Input) -> PResult<Attribute> {
    spanned(pair(
        parse_qualified_identifier,
        opt(parens(comma_list0(attribute_argument))),
    ))
    .map(|((name, arguments), span)| Attribute {
        name,
        arguments: arguments.unwrap_or_default(),
        span,
    })
    .parse(input)
}

pub fn parse_attribute_lists(input: Input) -> PResult<Vec<AttributeList>> {
    many0(
        brackets(comma_list1(parse_attribute)).map(|attributes| AttributeList { attributes }),
    )(input)
}

fn modifier(input: Input) -> PResult<Modifier> {
    alt((
        value(Modifier::Public, keyword("public")),
        value(Modifier::Private, keyword("private")),
        value(Modifier::Protected, keyword("protected")),
        value(Modifier::Internal, keyword("internal")),
        value(Modifier::Static, keyword("static")),
        value(Modifier::Partial, keyword("partial")),
        value(Modifier::Readonly, keyword("readonly")),
        value(Modifier::Const, keyword("const")),
        value(Modifier::Abstract, keyword("abstract")),
        value(Modifier::Sealed, keyword("sealed")),
        value(Modifier::Virtual, keyword("virtual")),
        value(Modifier::Override, keyword("override")),
        value(Modifier::Async, keyword("async")),
        value(Modifier::New, keyword("new")),
    ))(input)
}

fn parse_modifiers(input: Input) -> PResult<Vec<Modifier>> {
    many0(modifier)(input)
}

fn parameter_modifier(input: Input) -> PResult<ParameterModifier> {
    alt((
        value(ParameterModifier::This, keyword("this")),
        value(ParameterModifier::Params, keyword("params")),
        value(ParameterModifier::Ref, keyword("ref")),
        value(ParameterModifier::Out, keyword("out")),
        value(ParameterModifier::In, keyword("in")),
    ))(input)
}

pub fn parse_parameter(input: Input) -> PResult<Parameter> {
    let (input, attributes) = parse_attribute_lists(input)?;
    let (input, modifier) = opt(parameter_modifier)(input)?;
    let (input, parameter_type) = parse_type_expression(input)?;
    let (input, name) = parse_identifier(input)?;
    let (input, default_value) = opt(preceded(assign_eq, parse_expression))(input)?;
    Ok((
        input,
        Parameter {
            attributes,
            modifier,
            parameter_type,
            name,
            default_value,
        },
    ))
}

pub fn parse_parameter_list(input: Input) -> PResult<Vec<Parameter>> {
    parens(comma_list0(parse_parameter))(input)
}

/// Method tail after the parameter list: block body, `;`, or `=> expr;`.
fn method_body(
    input: Input,
) -> PResult<(Option<crate::syntax::statements::Statement>, Option<crate::syntax::expressions::Expr>)>
{
    alt((
        parse_block.map(|b| (Some(b), None)),
        value((None, None), sym(";")),
        terminated(preceded(sym("=>"), parse_expression), sym(";")).map(|e| (None, Some(e))),
    ))(input)
}

fn property_accessor(input: Input) -> PResult<PropertyAccessor> {
    let (input, _) = parse_attribute_lists(input)?;
    let (input, _) = parse_modifiers(input)?;
    let (input, accessor) = alt((
        value(PropertyAccessor::Get, keyword("get")),
        value(PropertyAccessor::Set, keyword("set")),
        value(PropertyAccessor::Init, keyword("init")),
    ))(input)?;
    let (input, _) = alt((
        value((), sym(";")),
        value((), parse_block),
        value((), terminated(preceded(sym("=>"), parse_expression), sym(";"))),
    ))(input)?;
    Ok((input, accessor))
}

fn parse_member<'a>(containing: &str, input: Input<'a>) -> PResult<'a, Member> {
    let (input, attributes) = parse_attribute_lists(input)?;
    let (input, modifiers) = parse_modifiers(input)?;

    // Nested type declarations.
    if let Ok((rest, ty)) = parse_type_declaration_body(attributes.clone(), modifiers.clone(), input)
    {
        return Ok((rest, Member::NestedType(ty)));
    }

    // Constructor: the containing type's name followed by a parameter list.
    {
        let ctor = pair(parse_identifier, peek(sym("(")));
        let mut ctor_attempt = ctor;
        if let Ok((rest, (name, _))) = ctor_attempt.parse(input) {
            if name == containing {
                let (rest, parameters) = parse_parameter_list(rest)?;
                let (rest, (body, _)) = method_body(rest)?;
                return Ok((
                    rest,
                    Member::Constructor(ConstructorDeclaration {
                        attributes,
                        modifiers,
                        name,
                        parameters,
                        body,
                    }),
                ));
            }
        }
    }

    let (input, return_type) = parse_type_expression(input)?;
    let (input, (name, name_span)) = spanned(parse_identifier)(input)?;

    // Method: type parameters and/or a parameter list.
    if let Ok((rest, type_parameters)) = opt(parse_type_parameters)(input) {
        if let Ok((rest, parameters)) = parse_parameter_list(rest) {
            let (rest, (body, expression_body)) = method_body(rest)?;
            return Ok((
                rest,
                Member::Method(MethodDeclaration {
                    attributes,
                    modifiers,
                    return_type,
                    name,
                    name_span,
                    type_parameters: type_parameters.unwrap_or_default(),
                    parameters,
                    body,
                    expression_body,
                }),
            ));
        }
    }

    // Property: accessor block.
    if let Ok((rest, accessors)) = braces(many1(property_accessor))(input) {
        let (rest, initializer) =
            opt(terminated(preceded(assign_eq, parse_expression), sym(";")))(rest)?;
        return Ok((
            rest,
            Member::Property(PropertyDeclaration {
                attributes,
                modifiers,
                property_type: return_type,
                name,
                accessors,
                initializer,
            }),
        ));
    }

    // Expression-bodied property: `public string Name => "x";`
    if let Ok((rest, body)) = terminated(preceded(sym("=>"), parse_expression), sym(";"))(input) {
        return Ok((
            rest,
            Member::Property(PropertyDeclaration {
                attributes,
                modifiers,
                property_type: return_type,
                name,
                accessors: vec![PropertyAccessor::Get],
                initializer: Some(body),
            }),
        ));
    }

    // Field.
    let (input, initializer) = opt(preceded(assign_eq, parse_expression))(input)?;
    let (input, _) = sym(";")(input)?;
    Ok((
        input,
        Member::Field(FieldDeclaration {
            attributes,
            modifiers,
            field_type: return_type,
            name,
            initializer,
        }),
    ))
}

fn enum_member(input: Input) -> PResult<EnumMember> {
    let (input, _) = parse_attribute_lists(input)?;
    pair(parse_identifier, opt(preceded(assign_eq, parse_expression)))
        .map(|(name, value)| EnumMember { name, value })
        .parse(input)
}

/// Type declaration body after attributes and modifiers were consumed.
fn parse_type_declaration_body<'a>(
    attributes: Vec<AttributeList>,
    modifiers: Vec<Modifier>,
    input: Input<'a>,
) -> PResult<'a, TypeDeclaration> {
    if let Ok((input, keyword_kind)) = alt((
        value(TypeKeyword::Class, keyword("class")),
        value(TypeKeyword::Struct, keyword("struct")),
    ))(input)
    {
        let (input, name) = parse_identifier(input)?;
        let (input, type_parameters) = opt(parse_type_parameters)(input)?;
        let (input, base_types) = opt(parse_base_list)(input)?;
        let (input, _) = sym("{")(input)?;
        let (mut input, mut members) = (input, Vec::new());
        loop {
            if let Ok((rest, _)) = sym("}")(input) {
                input = rest;
                break;
            }
            let (rest, member) = parse_member(&name, input)?;
            members.push(member);
            input = rest;
        }
        return Ok((
            input,
            TypeDeclaration::Class(ClassDeclaration {
                attributes,
                modifiers,
                keyword: keyword_kind,
                name,
                type_parameters: type_parameters.unwrap_or_default(),
                base_types: base_types.unwrap_or_default(),
                members,
            }),
        ));
    }

    if let Ok((input, _)) = keyword("interface")(input) {
        let (input, name) = parse_identifier(input)?;
        let (input, type_parameters) = opt(parse_type_parameters)(input)?;
        let (input, base_types) = opt(parse_base_list)(input)?;
        let (input, _) = sym("{")(input)?;
        let (mut input, mut members) = (input, Vec::new());
        loop {
            if let Ok((rest, _)) = sym("}")(input) {
                input = rest;
                break;
            }
            let (rest, member) = parse_member(&name, input)?;
            members.push(member);
            input = rest;
        }
        return Ok((
            input,
            TypeDeclaration::Interface(InterfaceDeclaration {
                attributes,
                modifiers,
                name,
                type_parameters: type_parameters.unwrap_or_default(),
                base_types: base_types.unwrap_or_default(),
                members,
            }),
        ));
    }

    let (input, _) = keyword("enum")(input)?;
    let (input, name) = parse_identifier(input)?;
    let (input, members) = braces(comma_list0(enum_member))(input)?;
    Ok((
        input,
        TypeDeclaration::Enum(EnumDeclaration {
            attributes,
            modifiers,
            name,
            members,
        }),
    ))
}

pub fn parse_type_declaration(input: Input) -> PResult<TypeDeclaration> {
    let (input, attributes) = parse_attribute_lists(input)?;
    let (input, modifiers) = parse_modifiers(input)?;
    parse_type_declaration_body(attributes, modifiers, input)
}

fn parse_using_directive(input: Input) -> PResult<UsingDirective> {
    let (input, _) = keyword("using")(input)?;
    let (input, _) = opt(keyword("static"))(input)?;
    let (input, namespace) = parse_qualified_identifier(input)?;
    let (input, _) = sym(";")(input)?;
    Ok((input, UsingDirective { namespace }))
}

fn parse_namespace(input: Input) -> PResult<NamespaceDeclaration> {
    let (input, _) = keyword("namespace")(input)?;
    let (input, name) = parse_qualified_identifier(input)?;

    // File-scoped `namespace N;`: the rest of the file belongs to it.
    if let Ok((input, _)) = sym(";")(input) {
        let (input, usings) = many0(parse_using_directive)(input)?;
        let (input, types) = many0(parse_type_declaration)(input)?;
        return Ok((
            input,
            NamespaceDeclaration {
                name,
                usings,
                types,
                file_scoped: true,
            },
        ));
    }

    let (input, _) = sym("{")(input)?;
    let (input, usings) = many0(parse_using_directive)(input)?;
    let (input, types) = many0(parse_type_declaration)(input)?;
    let (input, _) = sym("}")(input)?;
    Ok((
        input,
        NamespaceDeclaration {
            name,
            usings,
            types,
            file_scoped: false,
        },
    ))
}

pub fn parse_compilation_unit(input: Input) -> PResult<CompilationUnit> {
    let (input, usings) = many0(parse_using_directive)(input)?;
    let (input, members) = many0(alt((
        parse_namespace.map(TopLevelMember::Namespace),
        parse_type_declaration.map(TopLevelMember::Type),
    )))
    .context("compilation unit")
    .parse(input)?;
    Ok((input, CompilationUnit { usings, members }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(src: &str) -> CompilationUnit {
        crate::parser::Parser::new().parse("test.cs", src).unwrap()
    }

    #[test]
    fn class_with_logging_method() {
        let cu = unit(
            r#"
using Microsoft.Extensions.Logging;

namespace App
{
    public class Worker
    {
        private readonly ILogger _logger;

        public Worker(ILogger logger)
        {
            _logger = logger;
        }

        public void Run(int userId)
        {
            _logger.LogInformation("User {UserId} logged in", userId);
        }
    }
}
"#,
        );
        assert_eq!(cu.usings.len(), 1);
        match &cu.members[0] {
            TopLevelMember::Namespace(ns) => {
                assert_eq!(ns.name.to_string(), "App");
                assert_eq!(ns.types.len(), 1);
                match &ns.types[0] {
                    TypeDeclaration::Class(c) => {
                        assert_eq!(c.name, "Worker");
                        assert_eq!(c.members.len(), 3);
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn partial_method_with_attribute() {
        let cu = unit(
            r#"
namespace App;

public static partial class Log
{
    [LoggerMessage(3, LogLevel.Error, "Bad {Thing}")]
    public static partial void BadThing(ILogger logger, string thing);
}
"#,
        );
        match &cu.members[0] {
            TopLevelMember::Namespace(ns) => {
                assert!(ns.file_scoped);
                match &ns.types[0] {
                    TypeDeclaration::Class(c) => match &c.members[0] {
                        Member::Method(m) => {
                            assert!(m.is_partial());
                            assert!(m.body.is_none());
                            assert_eq!(m.attributes.len(), 1);
                            let attr = &m.attributes[0].attributes[0];
                            assert_eq!(attr.name.to_string(), "LoggerMessage");
                            assert_eq!(attr.arguments.len(), 3);
                        }
                        other => panic!("unexpected {other:?}"),
                    },
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn enum_and_interface() {
        let cu = unit(
            r#"
namespace App
{
    public enum Severity { Low, High = 5 }

    public interface IWorker
    {
        void Run(int id);
        string Name { get; }
    }
}
"#,
        );
        match &cu.members[0] {
            TopLevelMember::Namespace(ns) => assert_eq!(ns.types.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn field_with_define_initializer() {
        let cu = unit(
            r#"
class C
{
    private static readonly Action<ILogger, int, string, Exception?> _ab =
        LoggerMessage.Define<int, string>(LogLevel.Debug, new EventId(9), "{A} and {B}");
}
"#,
        );
        match &cu.members[0] {
            TopLevelMember::Type(TypeDeclaration::Class(c)) => match &c.members[0] {
                Member::Field(f) => assert!(f.initializer.is_some()),
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }
}
