use crate::parser::{Input, PResult};
use crate::span::TextSpan;
use crate::syntax::identifier::Identifier;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_until, take_while};
use nom::character::complete::{char as nom_char, multispace1, satisfy};
use nom::combinator::{not, opt, peek, recognize, value, verify};
use nom::multi::{many0, separated_list0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::Parser as NomParser;

/// Reserved words that can never be identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];

/// Whitespace and comments.
pub fn ws(input: Input) -> PResult<()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(tag("//"), take_till(|c| c == '\n'))),
            value((), tuple((tag("/*"), take_until("*/"), tag("*/")))),
        ))),
    )(input)
}

/// Wrap a parser so it skips leading whitespace/comments.
pub fn bws<'a, O, F>(inner: F) -> impl FnMut(Input<'a>) -> PResult<'a, O>
where
    F: NomParser<Input<'a>, O, nom_supreme::error::ErrorTree<Input<'a>>>,
{
    preceded(ws, inner)
}

/// A punctuation token.
pub fn sym<'a>(s: &'static str) -> impl FnMut(Input<'a>) -> PResult<'a, Input<'a>> {
    bws(tag(s))
}

fn ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn ident_cont(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A reserved word, guarded against identifier continuation.
pub fn keyword<'a>(kw: &'static str) -> impl FnMut(Input<'a>) -> PResult<'a, Input<'a>> {
    bws(terminated(tag(kw), peek(not(satisfy(ident_cont)))))
}

fn raw_identifier(input: Input) -> PResult<String> {
    let verbatim = preceded(
        nom_char('@'),
        recognize(pair(satisfy(ident_start), take_while(ident_cont))),
    );
    let plain = verify(
        recognize(pair(satisfy(ident_start), take_while(ident_cont))),
        |s: &Input| !KEYWORDS.contains(s.fragment()),
    );
    alt((verbatim, plain))
        .map(|s: Input| s.fragment().to_string())
        .parse(input)
}

/// A simple identifier (leading `@` accepted and stripped).
pub fn parse_identifier(input: Input) -> PResult<String> {
    bws(raw_identifier)(input)
}

/// Dot-separated identifier chain: `Microsoft.Extensions.Logging`.
pub fn parse_qualified_identifier(input: Input) -> PResult<Identifier> {
    bws(separated_list1(
        tuple((ws, nom_char('.'), ws, peek(satisfy(ident_start)))),
        raw_identifier,
    ))
    .map(|parts| {
        if parts.len() == 1 {
            Identifier::Simple(parts.into_iter().next().unwrap_or_default())
        } else {
            Identifier::Qualified(parts)
        }
    })
    .parse(input)
}

/// Comma-separated list, possibly empty.
pub fn comma_list0<'a, O, F>(item: F) -> impl FnMut(Input<'a>) -> PResult<'a, Vec<O>>
where
    F: NomParser<Input<'a>, O, nom_supreme::error::ErrorTree<Input<'a>>>,
{
    terminated(separated_list0(sym(","), item), opt(sym(",")))
}

/// Comma-separated list with at least one item.
pub fn comma_list1<'a, O, F>(item: F) -> impl FnMut(Input<'a>) -> PResult<'a, Vec<O>>
where
    F: NomParser<Input<'a>, O, nom_supreme::error::ErrorTree<Input<'a>>>,
{
    terminated(separated_list1(sym(","), item), opt(sym(",")))
}

pub fn parens<'a, O, F>(inner: F) -> impl FnMut(Input<'a>) -> PResult<'a, O>
where
    F: NomParser<Input<'a>, O, nom_supreme::error::ErrorTree<Input<'a>>>,
{
    delimited(sym("("), inner, sym(")"))
}

pub fn braces<'a, O, F>(inner: F) -> impl FnMut(Input<'a>) -> PResult<'a, O>
where
    F: NomParser<Input<'a>, O, nom_supreme::error::ErrorTree<Input<'a>>>,
{
    delimited(sym("{"), inner, sym("}"))
}

pub fn brackets<'a, O, F>(inner: F) -> impl FnMut(Input<'a>) -> PResult<'a, O>
where
    F: NomParser<Input<'a>, O, nom_supreme::error::ErrorTree<Input<'a>>>,
{
    delimited(sym("["), inner, sym("]"))
}

/// Run `inner` and return its result with the byte span it consumed.
/// Leading whitespace is skipped before the span starts.
pub fn spanned<'a, O, F>(mut inner: F) -> impl FnMut(Input<'a>) -> PResult<'a, (O, TextSpan)>
where
    F: NomParser<Input<'a>, O, nom_supreme::error::ErrorTree<Input<'a>>>,
{
    move |input| {
        let (input, _) = ws(input)?;
        let start = input.location_offset();
        let (rest, out) = inner.parse(input)?;
        let span = TextSpan::new(start, rest.location_offset());
        Ok((rest, (out, span)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_rejects_keywords() {
        assert!(parse_identifier(Input::new("class")).is_err());
        let (_, id) = parse_identifier(Input::new("  logger")).unwrap();
        assert_eq!(id, "logger");
    }

    #[test]
    fn verbatim_identifier_strips_at() {
        let (_, id) = parse_identifier(Input::new("@event")).unwrap();
        assert_eq!(id, "event");
    }

    #[test]
    fn qualified_identifier_chains() {
        let (_, id) = parse_qualified_identifier(Input::new("A.B.C")).unwrap();
        assert_eq!(id.to_string(), "A.B.C");
    }

    #[test]
    fn ws_eats_comments() {
        let (rest, _) = ws(Input::new("  // line\n /* block */ x")).unwrap();
        assert_eq!(*rest.fragment(), "x");
    }
}
