//! The small CSS selector subset the mock document understands.
//!
//! Compound selectors made of a tag, `#id`, `.class`, `[attr]` and
//! `[attr=value]` parts, joined by the descendant combinator (whitespace).

use thiserror::Error;

/// A selector the mock document cannot parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unterminated attribute selector in `{0}`")]
    Unterminated(String),
    #[error("unexpected `{found}` in `{selector}`")]
    Unexpected { found: char, selector: String },
}

/// One `[name]` or `[name=value]` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrTest {
    pub name: String,
    pub value: Option<String>,
}

/// Everything a single element must satisfy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrTest>,
}

/// What the matcher needs to know about an element.
pub trait Matchable {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

impl Compound {
    pub fn matches(&self, node: &impl Matchable) -> bool {
        if let Some(tag) = &self.tag {
            if !node.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if node.attr("id") != Some(id.as_str()) {
                return false;
            }
        }

        if !self.classes.iter().all(|class| node.has_class(class)) {
            return false;
        }

        self.attrs.iter().all(|test| match (&test.value, node.attr(&test.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        })
    }
}

/// A parsed selector: compounds from outermost ancestor to the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let mut parts = Vec::new();
        let mut chars = selector.trim().chars().peekable();

        while chars.peek().is_some() {
            parts.push(parse_compound(&mut chars, selector)?);
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }
        }

        if parts.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[Compound] {
        &self.parts
    }

    /// The compound the matched element itself must satisfy.
    pub fn subject(&self) -> &Compound {
        // parse guarantees at least one part
        &self.parts[self.parts.len() - 1]
    }

    /// Compounds the element's ancestors must satisfy, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Compound> {
        self.parts[..self.parts.len() - 1].iter().rev()
    }
}

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut Chars<'_>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}

fn parse_compound(chars: &mut Chars<'_>, selector: &str) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    let unexpected = |found| SelectorError::Unexpected {
        found,
        selector: selector.to_string(),
    };

    let tag = take_ident(chars);
    if !tag.is_empty() {
        compound.tag = Some(tag);
    }

    while let Some(&c) = chars.peek() {
        match c {
            '#' | '.' => {
                chars.next();
                let ident = take_ident(chars);
                if ident.is_empty() {
                    return Err(unexpected(c));
                }
                if c == '#' {
                    compound.id = Some(ident);
                } else {
                    compound.classes.push(ident);
                }
            }
            '[' => {
                chars.next();
                compound.attrs.push(parse_attr(chars, selector)?);
            }
            c if c.is_whitespace() => break,
            c => return Err(unexpected(c)),
        }
    }
    Ok(compound)
}

fn parse_attr(chars: &mut Chars<'_>, selector: &str) -> Result<AttrTest, SelectorError> {
    let mut body = String::new();
    let mut quote = None;
    loop {
        match chars.next() {
            None => return Err(SelectorError::Unterminated(selector.to_string())),
            Some(c) if Some(c) == quote => quote = None,
            Some(c @ ('"' | '\'')) if quote.is_none() => quote = Some(c),
            Some(']') if quote.is_none() => break,
            Some(c) => body.push(c),
        }
    }

    let test = match body.split_once('=') {
        Some((name, value)) => AttrTest {
            name: name.trim().to_string(),
            value: Some(value.to_string()),
        },
        None => AttrTest {
            name: body.trim().to_string(),
            value: None,
        },
    };
    if test.name.is_empty() {
        return Err(SelectorError::Unexpected {
            found: ']',
            selector: selector.to_string(),
        });
    }
    Ok(test)
}
