//! Expression language used by text fields and images.
//!
//! ```text
//! expr    := term ('+' term)*
//! term    := $F{name} | $P{name} | $V{PAGE_NUMBER} | "literal" | integer
//! ```

use crate::domain::{ParameterValue, ReportParameters, ReportRow};

/// Built-in variable holding the 1-based page number.
pub const PAGE_NUMBER: &str = "PAGE_NUMBER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Literal(String),
    Field(String),
    Parameter(String),
    PageNumber,
}

/// A parsed expression: terms joined by string concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    terms: Vec<Term>,
}

/// Evaluation context for one band instance.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub row: Option<&'a ReportRow>,
    pub parameters: &'a ReportParameters,
    pub page_number: u32,
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'a> {
    Text(String),
    Image(&'a [u8]),
    Null,
}

impl Expression {
    /// Parse `source`.
    ///
    /// # Errors
    /// Returns a message describing the first syntax error.
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut parser = Parser {
            source,
            chars: source.char_indices().peekable(),
        };
        let mut terms = vec![parser.term()?];
        loop {
            parser.skip_whitespace();
            match parser.chars.next() {
                None => break,
                Some((_, '+')) => terms.push(parser.term()?),
                Some((at, other)) => {
                    return Err(format!("unexpected '{other}' at {at} in `{source}`"));
                }
            }
        }
        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Evaluate against `scope`.
    ///
    /// A lone parameter evaluates to its value, so image parameters pass
    /// through. Concatenation renders every term as text; missing fields and
    /// parameters read as empty text.
    ///
    /// # Errors
    /// Fails when an image parameter takes part in a concatenation.
    pub fn evaluate<'a>(&self, scope: &Scope<'a>) -> Result<Value<'a>, String> {
        if let [Term::Parameter(name)] = self.terms.as_slice() {
            return Ok(match scope.parameters.get(name) {
                Some(ParameterValue::Text(text)) => Value::Text(text.clone()),
                Some(ParameterValue::Image(bytes)) => Value::Image(bytes),
                None => Value::Null,
            });
        }
        if let [Term::Field(name)] = self.terms.as_slice() {
            return Ok(scope
                .row
                .and_then(|row| row.get(name))
                .map_or(Value::Null, |text| Value::Text(text.clone())));
        }

        let mut out = String::new();
        for term in &self.terms {
            match term {
                Term::Literal(text) => out.push_str(text),
                Term::Field(name) => {
                    if let Some(text) = scope.row.and_then(|row| row.get(name)) {
                        out.push_str(text);
                    }
                }
                Term::Parameter(name) => match scope.parameters.get(name) {
                    Some(ParameterValue::Text(text)) => out.push_str(text),
                    Some(ParameterValue::Image(_)) => {
                        return Err(format!("image parameter {name} cannot be used as text"));
                    }
                    None => {}
                },
                Term::PageNumber => out.push_str(&scope.page_number.to_string()),
            }
        }
        Ok(Value::Text(out))
    }
}

struct Parser<'s> {
    source: &'s str,
    chars: std::iter::Peekable<std::str::CharIndices<'s>>,
}

impl Parser<'_> {
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn term(&mut self) -> Result<Term, String> {
        self.skip_whitespace();
        match self.chars.next() {
            Some((_, '"')) => self.literal().map(Term::Literal),
            Some((_, '$')) => self.reference(),
            Some((_, digit)) if digit.is_ascii_digit() => {
                let mut number = String::from(digit);
                while let Some((_, next)) = self.chars.next_if(|(_, c)| c.is_ascii_digit()) {
                    number.push(next);
                }
                Ok(Term::Literal(number))
            }
            Some((at, other)) => Err(format!(
                "unexpected '{other}' at {at} in `{}`",
                self.source
            )),
            None => Err(format!("expression `{}` is incomplete", self.source)),
        }
    }

    fn literal(&mut self) -> Result<String, String> {
        let mut text = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(text),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, 'n')) => text.push('\n'),
                    Some((_, escaped)) => text.push(escaped),
                    None => break,
                },
                Some((_, c)) => text.push(c),
                None => break,
            }
        }
        Err(format!("unterminated string in `{}`", self.source))
    }

    fn reference(&mut self) -> Result<Term, String> {
        let kind = self.chars.next().map(|(_, c)| c);
        if self.chars.next().map(|(_, c)| c) != Some('{') {
            return Err(format!("malformed reference in `{}`", self.source));
        }
        let mut name = String::new();
        loop {
            match self.chars.next() {
                Some((_, '}')) => break,
                Some((_, c)) => name.push(c),
                None => return Err(format!("unterminated reference in `{}`", self.source)),
            }
        }
        if name.is_empty() {
            return Err(format!("empty reference in `{}`", self.source));
        }
        match kind {
            Some('F') => Ok(Term::Field(name)),
            Some('P') => Ok(Term::Parameter(name)),
            Some('V') if name == PAGE_NUMBER => Ok(Term::PageNumber),
            Some('V') => Err(format!("unknown variable {name}")),
            _ => Err(format!("malformed reference in `{}`", self.source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row() -> ReportRow {
        ReportRow::from([("name".to_owned(), "Ada".to_owned())])
    }

    fn parameters() -> ReportParameters {
        ReportParameters::from([
            (
                "createdBy".to_owned(),
                ParameterValue::Text("Reports".to_owned()),
            ),
            ("logoLeft".to_owned(), ParameterValue::Image(vec![7, 8])),
        ])
    }

    #[rstest]
    #[case("$F{name}", vec![Term::Field("name".to_owned())])]
    #[case(
        "\"Page \" + $V{PAGE_NUMBER}",
        vec![Term::Literal("Page ".to_owned()), Term::PageNumber]
    )]
    #[case(
        "$P{createdBy}+\" \\\"x\\\"\"",
        vec![Term::Parameter("createdBy".to_owned()), Term::Literal(" \"x\"".to_owned())]
    )]
    #[case("12", vec![Term::Literal("12".to_owned())])]
    fn parses_terms(#[case] source: &str, #[case] expected: Vec<Term>) {
        let expression = Expression::parse(source).expect("parse");
        assert_eq!(expression.terms(), expected.as_slice());
    }

    #[rstest]
    #[case("$F{name")]
    #[case("\"open")]
    #[case("$V{REPORT_COUNT}")]
    #[case("$X{name}")]
    #[case("$F{name} +")]
    #[case("$F{name} $F{name}")]
    #[case("")]
    fn rejects_malformed_expressions(#[case] source: &str) {
        assert!(Expression::parse(source).is_err(), "{source} should fail");
    }

    #[rstest]
    #[case("$F{name} + \" / \" + $P{createdBy}", Value::Text("Ada / Reports".to_owned()))]
    #[case("\"Page \" + $V{PAGE_NUMBER}", Value::Text("Page 3".to_owned()))]
    #[case("$F{missing}", Value::Null)]
    #[case("$F{missing} + \"!\"", Value::Text("!".to_owned()))]
    #[case("$P{logoLeft}", Value::Image(&[7, 8]))]
    fn evaluates_against_scope(#[case] source: &str, #[case] expected: Value<'static>) {
        let row = row();
        let parameters = parameters();
        let scope = Scope {
            row: Some(&row),
            parameters: &parameters,
            page_number: 3,
        };

        let value = Expression::parse(source)
            .expect("parse")
            .evaluate(&scope)
            .expect("evaluate");

        assert_eq!(value, expected);
    }

    #[rstest]
    fn image_in_concatenation_fails() {
        let parameters = parameters();
        let scope = Scope {
            row: None,
            parameters: &parameters,
            page_number: 1,
        };
        let expression = Expression::parse("\"x\" + $P{logoLeft}").expect("parse");

        assert!(expression.evaluate(&scope).is_err());
    }
}
