//! CSS selector subset
//!
//! Enough of the selector grammar for element lookups inside a card:
//!
//! - Type and universal selectors: `a`, `button`, `*`
//! - `#id` and `.class`
//! - Attribute selectors: `[href]`, `[rel="next"]`, `[href^='/']`, `[href$=".pdf"]`,
//!   `[href*=post]`, `[class~=primary]`, `[lang|=en]`
//! - Pseudo-classes: `:first-child`, `:last-child`, `:first-of-type`, `:not(...)`
//! - Descendant (whitespace) and child (`>`) combinators
//! - Selector lists: `a, button, input`
//!
//! Other pseudo-classes, pseudo-elements and the sibling combinators fail to parse.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{cut, map, opt},
    error::{context, ErrorKind, ParseError as NomParseError, VerboseError, VerboseErrorKind},
    sequence::{delimited, pair, preceded},
    IResult,
};
use smallvec::SmallVec;

use crate::dom::{Dom, NodeId};
use crate::error::{Result, SelectorError};

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Tags that handle their own click semantics
const INTERACTIVE_TAGS: [&str; 5] = ["a", "button", "input", "select", "textarea"];

/// Attribute value comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOperator {
    /// `=` exact value
    Equals,
    /// `~=` one of the whitespace-separated words
    Includes,
    /// `|=` exact value or value followed by `-`
    DashMatch,
    /// `^=` starts with
    Prefix,
    /// `$=` ends with
    Suffix,
    /// `*=` contains
    Substring,
}

impl AttributeOperator {
    fn matches(self, actual: &str, expected: &str) -> bool {
        match self {
            AttributeOperator::Equals => actual == expected,
            AttributeOperator::Includes => {
                !expected.is_empty()
                    && !expected.contains(|c: char| c.is_whitespace())
                    && actual.split_ascii_whitespace().any(|word| word == expected)
            }
            AttributeOperator::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            // An empty value never matches the substring operators
            AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(expected),
            AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(expected),
            AttributeOperator::Substring => !expected.is_empty() && actual.contains(expected),
        }
    }
}

/// Supported pseudo-classes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:not(a, .b)`, matching when none of the compounds match
    Not(Vec<CompoundSelector>),
}

impl PseudoClass {
    fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        // Parentless elements have no siblings, so they are first and last
        let siblings = dom.parent(node).map(|parent| dom.children(parent));

        match self {
            PseudoClass::FirstChild => siblings.map_or(true, |s| s.first() == Some(&node)),
            PseudoClass::LastChild => siblings.map_or(true, |s| s.last() == Some(&node)),
            PseudoClass::FirstOfType => siblings.map_or(true, |s| {
                let tag = dom.tag_name(node);
                s.iter().find(|&&sibling| dom.tag_name(sibling) == tag) == Some(&node)
            }),
            PseudoClass::Not(compounds) => !compounds.iter().any(|c| c.matches(dom, node)),
        }
    }
}

/// A single part of a compound selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorPart {
    /// `*`
    Universal,
    /// Tag name, stored lowercase
    Type(String),
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `[name]`, or `[name<op>value]` when `value` is set
    Attribute {
        name: String,
        value: Option<(AttributeOperator, String)>,
    },
    /// `:first-child`, `:not(...)`, ...
    Pseudo(PseudoClass),
}

impl SelectorPart {
    fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        match self {
            SelectorPart::Universal => dom.tag_name(node).is_some(),
            SelectorPart::Type(tag) => dom
                .tag_name(node)
                .is_some_and(|t| t.eq_ignore_ascii_case(tag)),
            SelectorPart::Id(id) => dom.attribute(node, "id") == Some(id.as_str()),
            SelectorPart::Class(class) => dom
                .attribute(node, "class")
                .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class)),
            SelectorPart::Attribute { name, value } => match (dom.attribute(node, name), value) {
                (Some(_), None) => true,
                (Some(actual), Some((op, expected))) => op.matches(actual, expected),
                (None, _) => false,
            },
            SelectorPart::Pseudo(pseudo) => pseudo.matches(dom, node),
        }
    }
}

/// Combinator between compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Descendant combinator (space): `.card a`
    Descendant,
    /// Child combinator (>): `.card > a`
    Child,
}

/// A compound selector is a sequence of simple selectors with no combinator.
/// e.g. `a.primary[href]` = [Type("a"), Class("primary"), Attribute("href")]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundSelector {
    pub parts: SmallVec<[SelectorPart; 2]>,
}

impl CompoundSelector {
    fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        self.parts.iter().all(|part| part.matches(dom, node))
    }
}

/// A complex selector is a chain of compound selectors joined by combinators.
/// e.g. `.card > .body a`
/// segments: [(card, Some(Child)), (body, Some(Descendant)), (a, None)]
///
/// The last segment always has `combinator = None` (it's the target element).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComplexSelector {
    pub segments: Vec<(CompoundSelector, Option<Combinator>)>,
}

impl ComplexSelector {
    /// A selector matching a single tag name
    fn tag(name: &str) -> Self {
        let mut parts = SmallVec::new();
        parts.push(SelectorPart::Type(name.to_string()));
        Self {
            segments: vec![(CompoundSelector { parts }, None)],
        }
    }

    fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        match self.segments.len() {
            0 => false,
            len => self.matches_segment(dom, node, len - 1),
        }
    }

    /// Match segment `index` at `node`, then walk left through the combinators
    fn matches_segment<D: Dom + ?Sized>(&self, dom: &D, node: NodeId, index: usize) -> bool {
        let (compound, _) = &self.segments[index];
        if !compound.matches(dom, node) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match self.segments[index - 1].1 {
            Some(Combinator::Child) => dom
                .parent(node)
                .is_some_and(|parent| self.matches_segment(dom, parent, index - 1)),
            Some(Combinator::Descendant) | None => {
                let mut current = dom.parent(node);
                while let Some(ancestor) = current {
                    if self.matches_segment(dom, ancestor, index - 1) {
                        return true;
                    }
                    current = dom.parent(ancestor);
                }
                false
            }
        }
    }
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    source: String,
    alternatives: SmallVec<[ComplexSelector; 1]>,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self> {
        let source = input.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }

        let alternatives = parse_selector_list(source)?;
        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// `a, button, input, select, textarea`
    pub fn interactive() -> &'static Selector {
        static INTERACTIVE: OnceLock<Selector> = OnceLock::new();
        INTERACTIVE.get_or_init(|| Selector {
            source: INTERACTIVE_TAGS.join(", "),
            alternatives: INTERACTIVE_TAGS
                .iter()
                .map(|tag| ComplexSelector::tag(tag))
                .collect(),
        })
    }

    /// The selector text as parsed
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The comma-separated alternatives
    pub fn alternatives(&self) -> &[ComplexSelector] {
        &self.alternatives
    }

    /// Check if `node` matches any alternative
    pub fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(dom, node))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ============================================================================
// Nom parsers
// ============================================================================

/// Parse an identifier (alphanumeric, hyphen, underscore)
fn identifier(input: &str) -> ParseResult<&str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

/// Parse an attribute value: quoted with either quote style, or a bare identifier
fn attribute_value(input: &str) -> ParseResult<String> {
    alt((
        map(
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
            String::from,
        ),
        map(
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            String::from,
        ),
        map(identifier, String::from),
    ))(input)
}

/// Parse an attribute operator: `=`, `~=`, `|=`, `^=`, `$=` or `*=`
fn attribute_operator(input: &str) -> ParseResult<AttributeOperator> {
    alt((
        map(tag("="), |_| AttributeOperator::Equals),
        map(tag("~="), |_| AttributeOperator::Includes),
        map(tag("|="), |_| AttributeOperator::DashMatch),
        map(tag("^="), |_| AttributeOperator::Prefix),
        map(tag("$="), |_| AttributeOperator::Suffix),
        map(tag("*="), |_| AttributeOperator::Substring),
    ))(input)
}

/// Parse the inside of `[...]` after the opening bracket
fn attribute_body(input: &str) -> ParseResult<SelectorPart> {
    let (input, _) = multispace0(input)?;
    let (input, name) = cut(identifier)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = opt(pair(
        attribute_operator,
        preceded(multispace0, cut(attribute_value)),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = cut(char(']'))(input)?;

    Ok((
        input,
        SelectorPart::Attribute {
            name: name.to_ascii_lowercase(),
            value,
        },
    ))
}

/// Parse an attribute selector: `[name]` or `[name<op>value]`
fn attribute_selector(input: &str) -> ParseResult<SelectorPart> {
    let (input, _) = char('[')(input)?;
    context("attribute selector", attribute_body)(input)
}

/// Parse the argument list of `:not(...)` after the opening parenthesis
fn negation_body(input: &str) -> ParseResult<Vec<CompoundSelector>> {
    let mut compounds = Vec::new();
    let (mut remaining, _) = multispace0(input)?;

    loop {
        let (rest, compound) = cut(parse_compound_selector)(remaining)?;
        compounds.push(compound);
        let (rest, _) = multispace0(rest)?;

        match rest.strip_prefix(',') {
            Some(after_comma) => remaining = after_comma.trim_start(),
            None => {
                let (rest, _) = cut(char(')'))(rest)?;
                return Ok((rest, compounds));
            }
        }
    }
}

/// Parse a pseudo-class, including the leading `:`
fn pseudo_class(input: &str) -> ParseResult<PseudoClass> {
    let (rest, _) = char(':')(input)?;
    let (rest, name) = cut(identifier)(rest)?;

    match name.to_ascii_lowercase().as_str() {
        "first-child" => Ok((rest, PseudoClass::FirstChild)),
        "last-child" => Ok((rest, PseudoClass::LastChild)),
        "first-of-type" => Ok((rest, PseudoClass::FirstOfType)),
        "not" => {
            let (rest, _) = cut(char('('))(rest)?;
            let (rest, compounds) = context("negation", negation_body)(rest)?;
            Ok((rest, PseudoClass::Not(compounds)))
        }
        _ => Err(nom::Err::Failure(VerboseError::from_error_kind(
            input,
            ErrorKind::Tag,
        ))),
    }
}

/// Parse a compound selector: an optional type or universal selector followed
/// by any number of `#id`, `.class`, `[attr]` and `:pseudo` parts.
fn parse_compound_selector(input: &str) -> ParseResult<CompoundSelector> {
    let mut parts = SmallVec::new();
    let mut remaining = input;

    if let Some(rest) = remaining.strip_prefix('*') {
        parts.push(SelectorPart::Universal);
        remaining = rest;
    } else if let Ok((rest, tag)) = identifier(remaining) {
        parts.push(SelectorPart::Type(tag.to_ascii_lowercase()));
        remaining = rest;
    }

    loop {
        if let Some(rest) = remaining.strip_prefix('#') {
            let (rest, id) = context("ID selector", cut(identifier))(rest)?;
            parts.push(SelectorPart::Id(id.to_string()));
            remaining = rest;
        } else if let Some(rest) = remaining.strip_prefix('.') {
            let (rest, class) = context("class selector", cut(identifier))(rest)?;
            parts.push(SelectorPart::Class(class.to_string()));
            remaining = rest;
        } else if remaining.starts_with('[') {
            let (rest, attr) = attribute_selector(remaining)?;
            parts.push(attr);
            remaining = rest;
        } else if remaining.starts_with(':') {
            let (rest, pseudo) = context("pseudo-class", pseudo_class)(remaining)?;
            parts.push(SelectorPart::Pseudo(pseudo));
            remaining = rest;
        } else {
            break;
        }
    }

    if parts.is_empty() {
        return Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::Many1,
        )));
    }

    Ok((remaining, CompoundSelector { parts }))
}

fn starts_compound(input: &str) -> bool {
    input
        .chars()
        .next()
        .is_some_and(|c| matches!(c, '#' | '.' | '[' | '*' | ':') || c.is_alphanumeric())
}

/// Parse a complex selector, stopping at `,` or end of input
fn parse_complex_selector(input: &str) -> ParseResult<ComplexSelector> {
    let mut segments = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, compound) = parse_compound_selector(remaining)?;
        let trimmed = rest.trim_start();

        if trimmed.is_empty() || trimmed.starts_with(',') {
            segments.push((compound, None));
            remaining = trimmed;
            break;
        }

        if let Some(after_gt) = trimmed.strip_prefix('>') {
            remaining = after_gt.trim_start();
            segments.push((compound, Some(Combinator::Child)));
        } else if trimmed.len() < rest.len() && starts_compound(trimmed) {
            remaining = trimmed;
            segments.push((compound, Some(Combinator::Descendant)));
        } else {
            return Err(nom::Err::Failure(VerboseError::from_error_kind(
                trimmed,
                ErrorKind::Verify,
            )));
        }
    }

    Ok((remaining, ComplexSelector { segments }))
}

/// Parse a comma-separated selector list covering the whole input
fn parse_selector_list(input: &str) -> Result<SmallVec<[ComplexSelector; 1]>> {
    let mut alternatives = SmallVec::new();
    let mut remaining = input;

    loop {
        let (rest, complex) =
            parse_complex_selector(remaining).map_err(|e| to_selector_error(input, e))?;
        alternatives.push(complex);

        match rest.strip_prefix(',') {
            Some(after_comma) => remaining = after_comma.trim_start(),
            None => break,
        }
    }

    Ok(alternatives)
}

/// Convert a nom error into a positioned selector error
fn to_selector_error(input: &str, err: nom::Err<VerboseError<&str>>) -> SelectorError {
    let errors = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.errors,
        nom::Err::Incomplete(_) => Vec::new(),
    };

    let fragment = errors.first().map(|(fragment, _)| *fragment).unwrap_or("");
    let column = input.len().saturating_sub(fragment.len()) + 1;

    let context = errors.iter().find_map(|(_, kind)| match kind {
        VerboseErrorKind::Context(ctx) => Some(*ctx),
        _ => None,
    });

    let message = match (context, fragment.chars().next()) {
        (Some(ctx), Some(found)) => format!("invalid {} near '{}'", ctx, found),
        (Some(ctx), None) => format!("unterminated {}", ctx),
        (None, Some(found)) => format!("unexpected '{}'", found),
        (None, None) => "unexpected end of selector".to_string(),
    };

    SelectorError::Parse {
        selector: input.to_string(),
        column,
        message,
    }
}
