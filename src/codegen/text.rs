use std::str::FromStr;

use thiserror::Error;

use crate::codegen::{GenerationTemplate, TemplateCall};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateParseError {
    #[error("unknown placeholder `{{{0}}}`")]
    UnknownPlaceholder(String),

    #[error("unclosed `{{` at byte {0}")]
    Unclosed(usize),

    #[error("unmatched `}}` at byte {0}")]
    Unmatched(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    ReturnStatement,
    ReturnType,
    Name,
    Separator,
    Signature,
    Names,
}

impl Field {
    fn from_placeholder(s: &str) -> Option<Self> {
        match s {
            "return_statement" => Some(Self::ReturnStatement),
            "return_type" => Some(Self::ReturnType),
            "name" => Some(Self::Name),
            "separator" => Some(Self::Separator),
            "signature" => Some(Self::Signature),
            "names" => Some(Self::Names),
            _ => None
        }
    }

    fn value<'a>(&self, call: &TemplateCall<'a>) -> &'a str {
        match self {
            Self::ReturnStatement => call.return_statement,
            Self::ReturnType => call.return_type,
            Self::Name => call.name,
            Self::Separator => call.separator,
            Self::Signature => call.signature,
            Self::Names => call.names,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A template written as a format string, e.g.
/// `"{return_type} {name}(void * self{separator} {signature});\n"`.
///
/// `{{` and `}}` produce literal braces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextTemplate {
    segments: Vec<Segment>,
}

impl FromStr for TextTemplate {
    type Err = TemplateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = s.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut placeholder = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, c)) => placeholder.push(c),
                            None => return Err(TemplateParseError::Unclosed(pos)),
                        }
                    }

                    let field = Field::from_placeholder(placeholder.trim())
                        .ok_or(TemplateParseError::UnknownPlaceholder(placeholder))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => return Err(TemplateParseError::Unmatched(pos)),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }
}

impl GenerationTemplate for TextTemplate {
    fn render(&self, call: &TemplateCall<'_>) -> anyhow::Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Field(field) => out.push_str(field.value(call)),
            }
        }
        Ok(out)
    }
}
