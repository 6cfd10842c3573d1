use crate::parser::helpers::bws;
use crate::parser::{Input, PResult};
use crate::syntax::literal::Literal;
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while1};
use nom::character::complete::{char as nom_char, none_of, satisfy};
use nom::combinator::{map, map_opt, map_res, not, opt, peek, recognize, value};
use nom::multi::{fold_many0, many0};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::Parser as NomParser;
use nom_supreme::ParserExt;

fn strip_underscores(s: &str) -> String {
    s.chars().filter(|&c| c != '_').collect()
}

fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit() || c == '_'
}

fn is_bin(c: char) -> bool {
    c == '0' || c == '1' || c == '_'
}

fn is_dec(c: char) -> bool {
    c.is_ascii_digit() || c == '_'
}

// Integer suffixes (u, l, ul, ...) are accepted and ignored.
fn int_suffix(input: Input) -> PResult<()> {
    value(
        (),
        opt(alt((
            tag_no_case("ul"),
            tag_no_case("lu"),
            tag_no_case("u"),
            tag_no_case("l"),
        ))),
    )(input)
}

fn float_suffix(input: Input) -> PResult<()> {
    value((), opt(alt((tag_no_case("f"), tag_no_case("d"), tag_no_case("m")))))(input)
}

pub fn parse_boolean(input: Input) -> PResult<Literal> {
    alt((
        value(Literal::Boolean(true), tag("true")),
        value(Literal::Boolean(false), tag("false")),
    ))
    .terminated(peek(not(satisfy(|c| c.is_alphanumeric() || c == '_'))))
    .context("boolean literal")
    .parse(input)
}

pub fn parse_null(input: Input) -> PResult<Literal> {
    value(Literal::Null, tag("null"))
        .terminated(peek(not(satisfy(|c| c.is_alphanumeric() || c == '_'))))
        .context("null literal")
        .parse(input)
}

/// Decimal, `0x` hex or `0b` binary integers, underscores allowed.
pub fn parse_integer(input: Input) -> PResult<Literal> {
    terminated(
        alt((
            map_res(
                recognize(tuple((tag_no_case("0x"), take_while1(is_hex)))),
                |s: Input| {
                    i64::from_str_radix(&strip_underscores(&s.fragment()[2..]), 16)
                        .map(Literal::Integer)
                },
            ),
            map_res(
                recognize(tuple((tag_no_case("0b"), take_while1(is_bin)))),
                |s: Input| {
                    i64::from_str_radix(&strip_underscores(&s.fragment()[2..]), 2)
                        .map(Literal::Integer)
                },
            ),
            map_res(take_while1(is_dec), |s: Input| {
                strip_underscores(s.fragment()).parse::<i64>().map(Literal::Integer)
            }),
        )),
        int_suffix,
    )
    .context("integer literal")
    .parse(input)
}

/// Floating-point with optional exponent: `1.5`, `.5`, `1e10`, `2.5f`.
pub fn parse_float(input: Input) -> PResult<Literal> {
    terminated(
        map_res(
            recognize(alt((
                recognize(tuple((
                    opt(take_while1(is_dec)),
                    nom_char('.'),
                    take_while1(is_dec),
                    opt(tuple((
                        tag_no_case("e"),
                        opt(alt((nom_char('+'), nom_char('-')))),
                        take_while1(is_dec),
                    ))),
                ))),
                recognize(tuple((
                    take_while1(is_dec),
                    tag_no_case("e"),
                    opt(alt((nom_char('+'), nom_char('-')))),
                    take_while1(is_dec),
                ))),
            ))),
            |s: Input| strip_underscores(s.fragment()).parse::<f64>().map(Literal::Float),
        ),
        float_suffix,
    )
    .context("floating-point literal")
    .parse(input)
}

fn escape_char(input: Input) -> PResult<char> {
    preceded(
        nom_char('\\'),
        alt((
            value('\n', nom_char('n')),
            value('\r', nom_char('r')),
            value('\t', nom_char('t')),
            value('\0', nom_char('0')),
            value('\\', nom_char('\\')),
            value('"', nom_char('"')),
            value('\'', nom_char('\'')),
            // \uXXXX
            map_opt(
                preceded(
                    nom_char('u'),
                    recognize(tuple((
                        satisfy(|c| c.is_ascii_hexdigit()),
                        satisfy(|c| c.is_ascii_hexdigit()),
                        satisfy(|c| c.is_ascii_hexdigit()),
                        satisfy(|c| c.is_ascii_hexdigit()),
                    ))),
                ),
                |s: Input| {
                    u32::from_str_radix(s.fragment(), 16)
                        .ok()
                        .and_then(char::from_u32)
                },
            ),
        )),
    )(input)
}

/// Regular `"..."` string with escapes.
pub fn parse_regular_string(input: Input) -> PResult<Literal> {
    delimited(
        nom_char('"'),
        fold_many0(
            alt((escape_char, none_of("\"\\"))),
            String::new,
            |mut acc, c| {
                acc.push(c);
                acc
            },
        ),
        nom_char('"'),
    )
    .map(Literal::String)
    .context("string literal")
    .parse(input)
}

/// Verbatim `@"..."` string; `""` is the only escape.
pub fn parse_verbatim_string(input: Input) -> PResult<Literal> {
    delimited(
        tag("@\""),
        fold_many0(
            alt((value('"', tag("\"\"")), none_of("\""))),
            String::new,
            |mut acc, c| {
                acc.push(c);
                acc
            },
        ),
        nom_char('"'),
    )
    .map(Literal::String)
    .context("verbatim string literal")
    .parse(input)
}

/// `$"..."`: raw content is kept but the literal is never constant.
pub fn parse_interpolated_string(input: Input) -> PResult<String> {
    delimited(
        tag("$\""),
        map(
            recognize(many0(alt((
                recognize(pair(nom_char('\\'), nom::character::complete::anychar)),
                recognize(none_of("\"\\")),
            )))),
            |s: Input| s.fragment().to_string(),
        ),
        nom_char('"'),
    )
    .context("interpolated string literal")
    .parse(input)
}

pub fn parse_char(input: Input) -> PResult<Literal> {
    delimited(nom_char('\''), alt((escape_char, none_of("'\\"))), nom_char('\''))
        .map(Literal::Char)
        .context("character literal")
        .parse(input)
}

/// Any literal token. Float is tried before integer so `1.5` is not split.
pub fn parse_literal(input: Input) -> PResult<Literal> {
    bws(alt((
        parse_boolean,
        parse_null,
        parse_verbatim_string,
        parse_regular_string,
        parse_char,
        parse_float,
        parse_integer,
    )))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(src: &str) -> Literal {
        let (_, l) = parse_literal(Input::new(src)).unwrap();
        l
    }

    #[test]
    fn integers() {
        assert_eq!(lit("42"), Literal::Integer(42));
        assert_eq!(lit("0x2A"), Literal::Integer(42));
        assert_eq!(lit("0b101010"), Literal::Integer(42));
        assert_eq!(lit("1_000"), Literal::Integer(1000));
        assert_eq!(lit("7L"), Literal::Integer(7));
    }

    #[test]
    fn floats() {
        assert_eq!(lit("1.5"), Literal::Float(1.5));
        assert_eq!(lit("2.5f"), Literal::Float(2.5));
        assert_eq!(lit("1e3"), Literal::Float(1000.0));
    }

    #[test]
    fn strings() {
        assert_eq!(lit(r#""User {UserId} logged in""#), Literal::String("User {UserId} logged in".into()));
        assert_eq!(lit(r#""a\nb""#), Literal::String("a\nb".into()));
        assert_eq!(lit(r#"@"C:\temp""#), Literal::String(r"C:\temp".into()));
        assert_eq!(lit(r#"@"say ""hi""""#), Literal::String(r#"say "hi""#.into()));
    }

    #[test]
    fn keywords_and_chars() {
        assert_eq!(lit("true"), Literal::Boolean(true));
        assert_eq!(lit("null"), Literal::Null);
        assert_eq!(lit("'x'"), Literal::Char('x'));
    }
}
