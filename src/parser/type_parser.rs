use crate::parser::helpers::{bws, comma_list1, parse_qualified_identifier, sym, ws};
use crate::parser::{Input, PResult};
use crate::syntax::types::{PrimitiveType, Type};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::satisfy;
use nom::combinator::{not, opt, peek, value};
use nom::multi::{many0, many0_count};
use nom::sequence::{delimited, preceded, terminated};
use nom::Parser as NomParser;
use nom_supreme::ParserExt;

fn kw_end(input: Input) -> PResult<()> {
    value((), peek(not(satisfy(|c| c.is_alphanumeric() || c == '_'))))(input)
}

fn primitive_keyword<'a>(
    kw: &'static str,
    p: PrimitiveType,
) -> impl FnMut(Input<'a>) -> PResult<'a, PrimitiveType> {
    value(p, terminated(tag(kw), kw_end))
}

pub fn parse_primitive_type(input: Input) -> PResult<PrimitiveType> {
    bws(alt((
        primitive_keyword("object", PrimitiveType::Object),
        primitive_keyword("string", PrimitiveType::String),
        primitive_keyword("bool", PrimitiveType::Bool),
        primitive_keyword("char", PrimitiveType::Char),
        primitive_keyword("byte", PrimitiveType::Byte),
        primitive_keyword("sbyte", PrimitiveType::SByte),
        primitive_keyword("short", PrimitiveType::Short),
        primitive_keyword("ushort", PrimitiveType::UShort),
        primitive_keyword("int", PrimitiveType::Int),
        primitive_keyword("uint", PrimitiveType::UInt),
        primitive_keyword("ulong", PrimitiveType::ULong),
        primitive_keyword("long", PrimitiveType::Long),
        primitive_keyword("float", PrimitiveType::Float),
        primitive_keyword("double", PrimitiveType::Double),
        primitive_keyword("decimal", PrimitiveType::Decimal),
    )))(input)
}

/// One array rank specifier: `[]` or `[,]`, returning its rank.
fn array_rank(input: Input) -> PResult<usize> {
    delimited(sym("["), many0_count(sym(",")), sym("]"))
        .map(|commas| commas + 1)
        .parse(input)
}

fn named_type(input: Input) -> PResult<Type> {
    let (input, base) = parse_qualified_identifier(input)?;
    let (input, args) = opt(delimited(
        sym("<"),
        comma_list1(parse_type_expression),
        sym(">"),
    ))(input)?;
    let ty = match args {
        Some(args) => Type::Generic { base, args },
        None => Type::Reference(base),
    };
    Ok((input, ty))
}

/// A full type expression: core type plus `?` and array suffixes.
/// `Exception?`, `object?[]`, `Dictionary<string, object?>`, `int[,]`.
pub fn parse_type_expression(input: Input) -> PResult<Type> {
    let core = alt((
        value(Type::Void, terminated(preceded(ws, tag("void")), kw_end)),
        value(Type::Var, terminated(preceded(ws, tag("var")), kw_end)),
        parse_primitive_type.map(Type::Primitive),
        named_type,
    ));
    let (input, mut ty) = core.context("type").parse(input)?;
    // `?` binds before array suffixes: `int?[]` is an array of `int?`.
    let (input, nullable) = opt(preceded(ws, terminated(tag("?"), peek(not(tag("?"))))))(input)?;
    if nullable.is_some() {
        ty = Type::Nullable(Box::new(ty));
    }
    let (input, ranks) = many0(array_rank)(input)?;
    for rank in ranks {
        ty = Type::Array {
            element_type: Box::new(ty),
            rank,
        };
        // trailing element nullability (`T[]?`) is not modeled
    }
    Ok((input, ty))
}

/// Type parameter list on declarations: `<T, TState>`.
pub fn parse_type_parameters(input: Input) -> PResult<Vec<String>> {
    delimited(
        sym("<"),
        comma_list1(crate::parser::helpers::parse_identifier),
        sym(">"),
    )(input)
}

/// Base-type list: `: BaseType, IInterface<T>`.
pub fn parse_base_list(input: Input) -> PResult<Vec<Type>> {
    preceded(sym(":"), comma_list1(parse_type_expression))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::identifier::Identifier;

    fn ty(src: &str) -> Type {
        let (rest, t) = parse_type_expression(Input::new(src)).unwrap();
        assert!(rest.fragment().is_empty(), "unparsed: {}", rest.fragment());
        t
    }

    #[test]
    fn primitives_and_named() {
        assert_eq!(ty("int"), Type::Primitive(PrimitiveType::Int));
        assert_eq!(ty("ILogger"), Type::Reference(Identifier::new("ILogger")));
    }

    #[test]
    fn generics_nest() {
        let t = ty("Dictionary<string, object?>");
        match t {
            Type::Generic { base, args } => {
                assert_eq!(base.to_string(), "Dictionary");
                assert_eq!(args.len(), 2);
                assert_eq!(args[1], Type::Nullable(Box::new(Type::Primitive(PrimitiveType::Object))));
            }
            other => panic!("expected generic, got {other:?}"),
        }
    }

    #[test]
    fn arrays_and_nullability() {
        assert_eq!(
            ty("object?[]"),
            Type::Array {
                element_type: Box::new(Type::Nullable(Box::new(Type::Primitive(
                    PrimitiveType::Object
                )))),
                rank: 1
            }
        );
        assert_eq!(
            ty("int[,]"),
            Type::Array {
                element_type: Box::new(Type::Primitive(PrimitiveType::Int)),
                rank: 2
            }
        );
    }

    #[test]
    fn action_of_logger() {
        let t = ty("Action<ILogger, int, Exception?>");
        match t {
            Type::Generic { args, .. } => assert_eq!(args.len(), 3),
            other => panic!("expected generic, got {other:?}"),
        }
    }
}
