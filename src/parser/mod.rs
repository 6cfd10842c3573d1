//! nom-based parser for the analyzed C# subset.
//!
//! Parsers follow a leading-whitespace convention: every token parser skips
//! whitespace and comments *before* the token and consumes nothing after it,
//! so expression spans are tight at both ends.

pub mod declaration_parser;
pub mod expression_parser;
pub mod helpers;
pub mod literal_parser;
pub mod statement_parser;
pub mod type_parser;

use crate::errors::ParseError;
use crate::syntax::unit::CompilationUnit;
use nom_supreme::error::ErrorTree;

pub type Input<'a> = nom_locate::LocatedSpan<&'a str>;
pub type PResult<'a, O> = nom::IResult<Input<'a>, O, ErrorTree<Input<'a>>>;

/// Parse facade over the combinator stack.
#[derive(Debug, Default)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, file: &str, source: &str) -> Result<CompilationUnit, ParseError> {
        let input = Input::new(source);
        match declaration_parser::parse_compilation_unit(input) {
            Ok((rest, unit)) => {
                let (rest, _) = helpers::ws(rest)
                    .map_err(|e| syntax_error(file, source, offset_of_err(&e, source)))?;
                if rest.fragment().is_empty() {
                    Ok(unit)
                } else {
                    Err(syntax_error(file, source, rest.location_offset()))
                }
            }
            Err(e) => Err(syntax_error(file, source, offset_of_err(&e, source))),
        }
    }
}

fn offset_of_err(err: &nom::Err<ErrorTree<Input<'_>>>, source: &str) -> usize {
    match err {
        nom::Err::Error(tree) | nom::Err::Failure(tree) => deepest_offset(tree),
        nom::Err::Incomplete(_) => source.len(),
    }
}

/// Offset of the furthest point the error tree reached.
fn deepest_offset(tree: &ErrorTree<Input<'_>>) -> usize {
    match tree {
        ErrorTree::Base { location, .. } => location.location_offset(),
        ErrorTree::Stack { base, .. } => deepest_offset(base),
        ErrorTree::Alt(alts) => alts.iter().map(deepest_offset).max().unwrap_or(0),
    }
}

fn syntax_error(file: &str, source: &str, offset: usize) -> ParseError {
    let offset = offset.min(source.len());
    let upto = &source[..offset];
    let line = upto.bytes().filter(|b| *b == b'\n').count() + 1;
    let column = offset - upto.rfind('\n').map(|i| i + 1).unwrap_or(0) + 1;
    ParseError::Syntax {
        file: file.to_string(),
        line,
        column,
        message: "unexpected input".to_string(),
    }
}
