// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP file tokenizer using nom combinators
//!
//! Parses STEP/IFC instance records (`#1=IFCWALL(...);`) and header records
//! (`FILE_SCHEMA(('IFC4'));`) into tokens.

use ifc_checker_model::{AttributeValue, DecodedEntity, EntityId, Error, IfcType, Result};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, digit0, digit1, multispace1, one_of},
    combinator::{map_res, opt, recognize},
    error::{Error as NomError, ErrorKind},
    multi::{many0_count, separated_list0},
    sequence::{delimited, pair},
    IResult, Parser,
};

/// Raw token from STEP file (before conversion to AttributeValue)
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Entity reference (#123)
    EntityRef(u32),
    /// String value, still escaped ('it''s' yields `it''s`)
    String(&'a str),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Enumeration (.VALUE.)
    Enum(&'a str),
    /// List of tokens
    List(Vec<Token<'a>>),
    /// Typed value like IFCLABEL('text')
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value ($)
    Null,
    /// Derived value (*)
    Derived,
}

impl<'a> Token<'a> {
    /// Convert token to owned AttributeValue
    pub fn to_attribute_value(&self) -> AttributeValue {
        match self {
            Token::EntityRef(id) => AttributeValue::EntityRef(EntityId(*id)),
            Token::String(s) => AttributeValue::String(decode_string(s)),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(s) => AttributeValue::Enum((*s).to_string()),
            Token::List(items) => {
                AttributeValue::List(items.iter().map(|t| t.to_attribute_value()).collect())
            }
            Token::TypedValue(name, args) => AttributeValue::TypedValue(
                name.to_ascii_uppercase(),
                args.iter().map(|t| t.to_attribute_value()).collect(),
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }
}

// ============================================================================
// Parsing Primitives
// ============================================================================

/// Parse a `/* ... */` comment
fn comment(input: &str) -> IResult<&str, &str> {
    recognize((tag("/*"), take_until("*/"), tag("*/"))).parse(input)
}

/// Parse whitespace (including comments)
fn ws(input: &str) -> IResult<&str, ()> {
    let (input, _) = many0_count(alt((multispace1, comment))).parse(input)?;
    Ok((input, ()))
}

/// Parse a keyword (entity or defined type name)
fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

/// Parse an instance name (#123) into its number
fn instance_name(input: &str) -> IResult<&str, u32> {
    let (input, _) = char('#')(input)?;
    map_res(digit1, str::parse::<u32>).parse(input)
}

/// Parse an entity reference (#123)
fn entity_ref(input: &str) -> IResult<&str, Token> {
    let (input, id) = instance_name(input)?;
    Ok((input, Token::EntityRef(id)))
}

/// Parse a STEP string ('text' with '' for escaped quotes)
fn step_string(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('\'')(input)?;

    let bytes = input.as_bytes();
    let mut end = 0;
    while end < bytes.len() {
        if bytes[end] == b'\'' {
            if end + 1 < bytes.len() && bytes[end + 1] == b'\'' {
                end += 2;
                continue;
            }
            return Ok((&input[end + 1..], Token::String(&input[..end])));
        }
        end += 1;
    }

    Err(nom::Err::Error(NomError::new(input, ErrorKind::Char)))
}

/// Parse a number (integer or float)
fn number(input: &str) -> IResult<&str, Token> {
    let (rest, num_str) = recognize((
        opt(one_of("+-")),
        digit1,
        opt(pair(char('.'), digit0)),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)?;

    // Use lexical-core for fast parsing
    let parsed = if num_str.contains('.') || num_str.contains('e') || num_str.contains('E') {
        lexical_core::parse::<f64>(num_str.as_bytes()).map(Token::Float)
    } else {
        lexical_core::parse::<i64>(num_str.as_bytes()).map(Token::Integer)
    };

    parsed
        .map(|token| (rest, token))
        .map_err(|_| nom::Err::Error(NomError::new(input, ErrorKind::Float)))
}

/// Parse an enumeration (.VALUE.)
fn enumeration(input: &str) -> IResult<&str, Token> {
    let (input, name) = delimited(
        char('.'),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        char('.'),
    )
    .parse(input)?;
    Ok((input, Token::Enum(name)))
}

/// Parse null ($)
fn null_value(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('$')(input)?;
    Ok((input, Token::Null))
}

/// Parse derived (*)
fn derived_value(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('*')(input)?;
    Ok((input, Token::Derived))
}

/// Parse a parenthesised, comma separated token list
fn parameters(input: &str) -> IResult<&str, Vec<Token>> {
    delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), token),
        pair(ws, char(')')),
    )
    .parse(input)
}

/// Parse a list of tokens
fn list(input: &str) -> IResult<&str, Token> {
    let (input, items) = parameters(input)?;
    Ok((input, Token::List(items)))
}

/// Parse a typed value like IFCLABEL('text')
fn typed_value(input: &str) -> IResult<&str, Token> {
    let (input, type_name) = keyword(input)?;
    let (input, _) = ws(input)?;
    let (input, args) = parameters(input)?;
    Ok((input, Token::TypedValue(type_name, args)))
}

/// Parse any token
fn token(input: &str) -> IResult<&str, Token> {
    alt((
        entity_ref,
        step_string,
        null_value,
        derived_value,
        enumeration,
        number,
        list,
        typed_value,
    ))
    .parse(input)
}

/// Parse `#id = TYPE(attributes);`
fn instance(input: &str) -> IResult<&str, DecodedEntity> {
    let (input, _) = ws(input)?;
    let (input, id) = instance_name(input)?;
    let (input, _) = (ws, char('='), ws).parse(input)?;
    let (input, type_name) = keyword(input)?;
    let (input, _) = ws(input)?;
    let (input, tokens) = parameters(input)?;
    let (input, _) = (ws, char(';')).parse(input)?;

    let attributes = tokens.iter().map(|t| t.to_attribute_value()).collect();
    Ok((
        input,
        DecodedEntity::new(EntityId(id), IfcType::parse(type_name), attributes),
    ))
}

/// Parse `KEYWORD(parameters);`, the shape of every header record
fn record(input: &str) -> IResult<&str, (&str, Vec<Token>)> {
    let (input, _) = ws(input)?;
    let (input, name) = keyword(input)?;
    let (input, _) = ws(input)?;
    let (input, params) = parameters(input)?;
    let (input, _) = (ws, char(';')).parse(input)?;
    Ok((input, (name, params)))
}

/// Short excerpt of the input where tokenizing stopped
fn excerpt(input: &str) -> String {
    input.chars().take(40).collect()
}

// ============================================================================
// Public API
// ============================================================================

/// Parse a complete entity definition
///
/// Format: `#123=IFCWALL(attr1,attr2,...);`
pub fn parse_entity(input: &str) -> Result<DecodedEntity> {
    match instance(input) {
        Ok((_, entity)) => Ok(entity),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let msg = format!("unexpected input near '{}'", excerpt(e.input));
            Err(match instance_name(input.trim_start()) {
                Ok((_, id)) => Error::entity_parse(EntityId(id), msg),
                Err(_) => Error::format(msg),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(Error::format("incomplete entity record")),
    }
}

/// Parse entity from a byte range of `content`
pub fn parse_entity_at(content: &str, start: usize, end: usize) -> Result<DecodedEntity> {
    parse_entity(&content[start..end])
}

/// Parse a header record such as `FILE_NAME('a.ifc', ...);`
///
/// Returns the upper-cased keyword and the decoded parameters.
pub fn parse_record(input: &str) -> Option<(String, Vec<AttributeValue>)> {
    let (_, (name, params)) = record(input).ok()?;
    Some((
        name.to_ascii_uppercase(),
        params.iter().map(|t| t.to_attribute_value()).collect(),
    ))
}

/// Decode the escapes of a STEP string body
///
/// Handles `''`, `\\`, `\S\` (ISO 8859 upper half), `\X\hh`, `\X2\...\X0\`
/// (UTF-16) and `\X4\...\X0\` (UCS-4). Code page switches (`\P?\`) are
/// dropped. Malformed escapes are kept verbatim.
pub fn decode_string(raw: &str) -> String {
    if !raw.contains('\'') && !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(c) = rest.chars().next() {
        match c {
            '\'' if rest.starts_with("''") => {
                out.push('\'');
                rest = &rest[2..];
            }
            '\\' => {
                let consumed = decode_escape(rest, &mut out);
                if consumed == 0 {
                    out.push('\\');
                    rest = &rest[1..];
                } else {
                    rest = &rest[consumed..];
                }
            }
            _ => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

/// Decode one backslash escape at the start of `s`, returning bytes consumed
/// (0 when `s` does not start with a recognised escape)
fn decode_escape(s: &str, out: &mut String) -> usize {
    let bytes = s.as_bytes();
    if s.starts_with("\\\\") {
        out.push('\\');
        return 2;
    }
    if s.starts_with("\\S\\") && bytes.len() > 3 && bytes[3].is_ascii() {
        out.push(char::from(bytes[3] + 0x80));
        return 4;
    }
    if bytes.len() >= 4 && s.starts_with("\\P") && bytes[3] == b'\\' {
        return 4;
    }
    if s.starts_with("\\X\\") {
        if let Some(byte) = s.get(3..5).and_then(|h| u8::from_str_radix(h, 16).ok()) {
            out.push(char::from(byte));
            return 5;
        }
        return 0;
    }
    for (prefix, width) in [("\\X2\\", 4), ("\\X4\\", 8)] {
        if let Some(body) = s.strip_prefix(prefix) {
            let Some(len) = body.find("\\X0\\") else {
                return 0;
            };
            let hex = &body[..len];
            if !hex.is_ascii() || hex.len() % width != 0 {
                return 0;
            }
            let mut units = Vec::with_capacity(hex.len() / width);
            for i in (0..hex.len()).step_by(width) {
                match u32::from_str_radix(&hex[i..i + width], 16) {
                    Ok(unit) => units.push(unit),
                    Err(_) => return 0,
                }
            }
            if width == 4 {
                let utf16: Vec<u16> = units.iter().map(|&u| u as u16).collect();
                out.extend(char::decode_utf16(utf16).map(|r| r.unwrap_or('\u{FFFD}')));
            } else {
                out.extend(units.into_iter().map(|u| char::from_u32(u).unwrap_or('\u{FFFD}')));
            }
            return prefix.len() + len + 4;
        }
    }
    0
}
