//! JSONPath parser (RFC 9535).

use std::ops::Range;

use crate::types::*;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Expected root identifier '$' at start")]
    ExpectedRoot,
    #[error("Unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[error("Invalid escape sequence")]
    InvalidEscape,
    #[error("Invalid number")]
    InvalidNumber,
    #[error("Unclosed string")]
    UnclosedString,
    #[error("Invalid selector")]
    InvalidSelector,
    #[error("Unexpected input at offset {0}")]
    TrailingInput(usize),
}

/// Helper struct returned by `peek_comparison_operator`.
struct ComparisonToken {
    operator: ComparisonOperator,
    len: usize,
}

/// A parsed path that remembers where each top-level segment sits in the
/// source text.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedPath {
    pub path: JSONPath,
    /// Byte range of `path.segments[i]` in the source.
    pub spans: Vec<Range<usize>>,
}

/// JSONPath parser.
pub struct JsonPathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> JsonPathParser<'a> {
    /// Parse a JSONPath expression.
    pub fn parse(input: &'a str) -> Result<JSONPath, ParseError> {
        Self::parse_spanned(input).map(|spanned| spanned.path)
    }

    /// Parse a JSONPath expression and keep the source span of every
    /// top-level segment.
    pub fn parse_spanned(input: &'a str) -> Result<SpannedPath, ParseError> {
        let mut parser = Self { input, pos: 0 };
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<SpannedPath, ParseError> {
        // Must start with $
        if self.peek() != Some('$') {
            return Err(ParseError::ExpectedRoot);
        }
        self.advance();

        let mut segments = Vec::new();
        let mut spans = Vec::new();

        while !self.is_at_end() {
            let start = self.pos;
            match self.peek() {
                Some('.') | Some('[') => {
                    segments.push(self.parse_segment()?);
                    spans.push(start..self.pos);
                }
                _ => return Err(ParseError::TrailingInput(self.pos)),
            }
        }

        Ok(SpannedPath {
            path: JSONPath::new(segments),
            spans,
        })
    }

    /// Parse one `.name`, `.*`, `..x` or `[...]` segment.
    fn parse_segment(&mut self) -> Result<PathSegment, ParseError> {
        if self.peek() == Some('[') {
            let selectors = self.parse_bracket_selectors()?;
            return Ok(PathSegment::new(selectors, false));
        }

        self.expect('.')?;
        if self.peek() == Some('.') {
            self.advance();
            let selectors = self.parse_recursive_selectors()?;
            Ok(PathSegment::new(selectors, true))
        } else if self.peek() == Some('*') {
            self.advance();
            Ok(PathSegment::new(vec![Selector::Wildcard], false))
        } else {
            let name = self.parse_identifier()?;
            Ok(PathSegment::new(vec![Selector::Name(name)], false))
        }
    }

    fn parse_recursive_selectors(&mut self) -> Result<Vec<Selector>, ParseError> {
        // After .. we expect either:
        // - An identifier: ..name
        // - A bracket: ..[...]
        // - A wildcard: ..*

        if self.peek() == Some('*') {
            self.advance();
            return Ok(vec![Selector::Wildcard]);
        }

        if self.peek() == Some('[') {
            return self.parse_bracket_selectors();
        }

        let name = self.parse_identifier()?;
        Ok(vec![Selector::Name(name)])
    }

    fn parse_bracket_selectors(&mut self) -> Result<Vec<Selector>, ParseError> {
        self.expect('[')?;
        let mut selectors = Vec::new();

        loop {
            self.skip_whitespace();

            let selector = self.parse_bracket_selector()?;
            selectors.push(selector);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.advance(),
                Some(']') => {
                    self.advance();
                    break;
                }
                Some(c) => return Err(ParseError::UnexpectedChar(c)),
                None => return Err(ParseError::UnexpectedEnd),
            }
        }

        Ok(selectors)
    }

    fn parse_bracket_selector(&mut self) -> Result<Selector, ParseError> {
        match self.peek() {
            Some('\'') | Some('"') => {
                let name = self.parse_string()?;
                Ok(Selector::Name(name))
            }
            Some('*') => {
                self.advance();
                Ok(Selector::Wildcard)
            }
            Some(':') | Some('-') | Some('0'..='9') => self.parse_index_or_slice(),
            Some('?') => {
                self.advance();
                self.skip_whitespace();
                let expr = match self.parse_filter_expression()? {
                    FilterExpression::Paren(inner) => *inner,
                    other => other,
                };
                Ok(Selector::Filter(expr))
            }
            // Unquoted member name inside brackets: `[name]`.
            Some(c) if c.is_alphabetic() || c == '_' => {
                let name = self.parse_identifier()?;
                Ok(Selector::Name(name))
            }
            Some(_) => Err(ParseError::InvalidSelector),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_index_or_slice(&mut self) -> Result<Selector, ParseError> {
        let start = self.parse_optional_number()?;
        self.skip_whitespace();

        if self.peek() != Some(':') {
            return start.map(Selector::Index).ok_or(ParseError::InvalidSelector);
        }
        self.advance();
        let end = self.parse_optional_number()?;
        self.skip_whitespace();

        let step = if self.peek() == Some(':') {
            self.advance();
            self.parse_optional_number()?
        } else {
            None
        };

        Ok(Selector::Slice { start, end, step })
    }

    fn parse_optional_number(&mut self) -> Result<Option<isize>, ParseError> {
        self.skip_whitespace();
        if matches!(self.peek(), Some('0'..='9') | Some('-')) {
            Ok(Some(self.parse_number()?))
        } else {
            Ok(None)
        }
    }

    fn parse_number(&mut self) -> Result<isize, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }

        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }

        let num_str = &self.input[start..self.pos];
        num_str.parse::<isize>().map_err(|_| ParseError::InvalidNumber)
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return match self.peek() {
                Some(c) => Err(ParseError::UnexpectedChar(c)),
                None => Err(ParseError::UnexpectedEnd),
            };
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let quote = self.peek().ok_or(ParseError::UnexpectedEnd)?;
        self.advance();

        let mut result = String::new();

        loop {
            match self.peek() {
                None => return Err(ParseError::UnclosedString),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('b') => result.push('\u{8}'),
                        Some('f') => result.push('\u{c}'),
                        Some('/') => result.push('/'),
                        Some('\\') => result.push('\\'),
                        Some('\'') => result.push('\''),
                        Some('"') => result.push('"'),
                        Some('u') => {
                            self.advance();
                            result.push(self.parse_unicode_escape()?);
                            continue;
                        }
                        _ => return Err(ParseError::InvalidEscape),
                    }
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }

        Ok(result)
    }

    /// Parse the `XXXX` of a `\uXXXX` escape (the `\u` is already consumed),
    /// joining a following low surrogate when the first unit is a high one.
    fn parse_unicode_escape(&mut self) -> Result<char, ParseError> {
        let high = self.parse_hex4()?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or(ParseError::InvalidEscape);
        }
        if !self.peek_str("\\u") {
            return Err(ParseError::InvalidEscape);
        }
        self.advance_by(2);
        let low = self.parse_hex4()?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(ParseError::InvalidEscape);
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code).ok_or(ParseError::InvalidEscape)
    }

    fn parse_hex4(&mut self) -> Result<u32, ParseError> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or(ParseError::InvalidEscape)?;
        let code = u32::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidEscape)?;
        self.advance_by(4);
        Ok(code)
    }

    fn parse_filter_expression(&mut self) -> Result<FilterExpression, ParseError> {
        self.parse_logical_or_expression()
    }

    fn parse_logical_or_expression(&mut self) -> Result<FilterExpression, ParseError> {
        let mut left = self.parse_logical_and_expression()?;
        self.skip_whitespace();

        while self.peek_str("||") {
            self.advance_by(2);
            self.skip_whitespace();
            let right = self.parse_logical_and_expression()?;
            left = FilterExpression::Logical {
                operator: LogicalOperator::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
            self.skip_whitespace();
        }

        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> Result<FilterExpression, ParseError> {
        let mut left = self.parse_unary_expression()?;
        self.skip_whitespace();

        while self.peek_str("&&") {
            self.advance_by(2);
            self.skip_whitespace();
            let right = self.parse_unary_expression()?;
            left = FilterExpression::Logical {
                operator: LogicalOperator::And,
                left: Box::new(left),
                right: Box::new(right),
            };
            self.skip_whitespace();
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<FilterExpression, ParseError> {
        self.skip_whitespace();

        if self.peek() == Some('!') && !self.peek_str("!=") {
            self.advance();
            self.skip_whitespace();
            let expr = self.parse_unary_expression()?;
            return Ok(FilterExpression::Negation(Box::new(expr)));
        }

        if self.peek() == Some('(') {
            self.advance();
            self.skip_whitespace();
            let expr = self.parse_filter_expression()?;
            self.skip_whitespace();
            self.expect(')')?;
            return Ok(FilterExpression::Paren(Box::new(expr)));
        }

        self.parse_primary_expression()
    }

    fn parse_primary_expression(&mut self) -> Result<FilterExpression, ParseError> {
        let left = self.parse_value_expression()?;
        self.skip_whitespace();

        if let Some(op) = self.peek_comparison_operator() {
            self.advance_by(op.len);
            self.skip_whitespace();
            let right = self.parse_value_expression()?;
            return Ok(FilterExpression::Comparison {
                operator: op.operator,
                left,
                right,
            });
        }

        // No comparison operator: treat as existence test
        match left {
            ValueExpression::Path(path) => Ok(FilterExpression::Existence {
                path,
                from_root: false,
            }),
            ValueExpression::RootPath(path) => Ok(FilterExpression::Existence {
                path,
                from_root: true,
            }),
            ValueExpression::Current => Ok(FilterExpression::Existence {
                path: JSONPath::new(vec![]),
                from_root: false,
            }),
            ValueExpression::Root => Ok(FilterExpression::Existence {
                path: JSONPath::new(vec![]),
                from_root: true,
            }),
            ValueExpression::Function { name, args } => {
                Ok(FilterExpression::Function { name, args })
            }
            ValueExpression::Literal(_) => Err(ParseError::InvalidSelector),
        }
    }

    fn parse_value_expression(&mut self) -> Result<ValueExpression, ParseError> {
        self.skip_whitespace();

        if self.peek() == Some('@') {
            self.advance();
            if self.peek() == Some('.') || self.peek() == Some('[') {
                let segments = self.parse_filter_path_segments()?;
                return Ok(ValueExpression::Path(JSONPath::new(segments)));
            }
            return Ok(ValueExpression::Current);
        }

        if self.peek() == Some('$') {
            self.advance();
            if self.peek() == Some('.') || self.peek() == Some('[') {
                let segments = self.parse_filter_path_segments()?;
                return Ok(ValueExpression::RootPath(JSONPath::new(segments)));
            }
            return Ok(ValueExpression::Root);
        }

        if self.peek() == Some('\'') || self.peek() == Some('"') {
            let s = self.parse_string()?;
            return Ok(ValueExpression::Literal(serde_json::Value::String(s)));
        }

        if matches!(self.peek(), Some('0'..='9') | Some('-')) {
            return self.parse_number_literal().map(ValueExpression::Literal);
        }

        if self.peek_keyword("true") {
            self.advance_by(4);
            return Ok(ValueExpression::Literal(serde_json::Value::Bool(true)));
        }

        if self.peek_keyword("false") {
            self.advance_by(5);
            return Ok(ValueExpression::Literal(serde_json::Value::Bool(false)));
        }

        if self.peek_keyword("null") {
            self.advance_by(4);
            return Ok(ValueExpression::Literal(serde_json::Value::Null));
        }

        // Function call: starts with a lowercase letter
        if matches!(self.peek(), Some('a'..='z')) {
            let name = self.parse_function_name()?;
            self.skip_whitespace();
            self.expect('(')?;
            self.skip_whitespace();
            let mut args = Vec::new();
            if self.peek() != Some(')') {
                loop {
                    args.push(self.parse_value_expression()?);
                    self.skip_whitespace();
                    if self.peek() == Some(',') {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
            self.skip_whitespace();
            self.expect(')')?;
            return Ok(ValueExpression::Function { name, args });
        }

        match self.peek() {
            Some(_) => Err(ParseError::InvalidSelector),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// Parse path segments in a filter context.
    /// Stops when it encounters `)`, `,`, `&&`, `||`, a comparison operator, or `]`.
    fn parse_filter_path_segments(&mut self) -> Result<Vec<PathSegment>, ParseError> {
        let mut segments = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_filter_path_terminator() {
                break;
            }
            match self.peek() {
                Some('.') | Some('[') => segments.push(self.parse_segment()?),
                _ => break,
            }
        }

        Ok(segments)
    }

    fn is_filter_path_terminator(&self) -> bool {
        match self.peek() {
            None => true,
            Some(')') | Some(',') | Some(']') => true,
            Some('&') => self.peek_str("&&"),
            Some('|') => self.peek_str("||"),
            Some('=') => self.peek_str("=="),
            Some('!') => self.peek_str("!="),
            Some('<') | Some('>') => true,
            _ => false,
        }
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    /// Like `peek_str`, but the keyword must not run into an identifier.
    fn peek_keyword(&self, keyword: &str) -> bool {
        if !self.peek_str(keyword) {
            return false;
        }
        match self.input[self.pos + keyword.len()..].chars().next() {
            Some(c) => !(c.is_alphanumeric() || c == '_'),
            None => true,
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn parse_function_name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        // First char must be lowercase letter
        match self.peek() {
            Some(c) if c.is_ascii_lowercase() => self.advance(),
            _ => return Err(ParseError::InvalidSelector),
        }
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        Ok(self.input[start..self.pos].to_string())
    }

    /// Parse a numeric literal, keeping integers as integers so that
    /// `@.id == 3` compares against `3` rather than `3.0`.
    fn parse_number_literal(&mut self) -> Result<serde_json::Value, ParseError> {
        let start = self.pos;
        let mut is_float = false;

        // Optional minus
        if self.peek() == Some('-') {
            self.advance();
        }

        // Integer part
        if !matches!(self.peek(), Some('0'..='9')) {
            return Err(ParseError::InvalidNumber);
        }
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }

        // Optional decimal
        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(ParseError::InvalidNumber);
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        // Optional exponent
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(ParseError::InvalidNumber);
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        if !is_float {
            if let Ok(n) = num_str.parse::<i64>() {
                return Ok(serde_json::Value::from(n));
            }
        }
        let n = num_str.parse::<f64>().map_err(|_| ParseError::InvalidNumber)?;
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .ok_or(ParseError::InvalidNumber)
    }

    /// Peek at the next comparison operator without consuming input.
    /// Returns the operator token length and enum value, or None.
    fn peek_comparison_operator(&self) -> Option<ComparisonToken> {
        if self.peek_str("==") {
            Some(ComparisonToken {
                operator: ComparisonOperator::Equal,
                len: 2,
            })
        } else if self.peek_str("!=") {
            Some(ComparisonToken {
                operator: ComparisonOperator::NotEqual,
                len: 2,
            })
        } else if self.peek_str("<=") {
            Some(ComparisonToken {
                operator: ComparisonOperator::LessEqual,
                len: 2,
            })
        } else if self.peek_str(">=") {
            Some(ComparisonToken {
                operator: ComparisonOperator::GreaterEqual,
                len: 2,
            })
        } else if self.peek_str("<") {
            Some(ComparisonToken {
                operator: ComparisonOperator::Less,
                len: 1,
            })
        } else if self.peek_str(">") {
            Some(ComparisonToken {
                operator: ComparisonOperator::Greater,
                len: 1,
            })
        } else {
            None
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(ParseError::UnexpectedChar(c)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_cover_each_segment() {
        let input = "$.store['a.b'][0]";
        let spanned = JsonPathParser::parse_spanned(input).unwrap();
        let texts: Vec<&str> = spanned.spans.iter().map(|r| &input[r.clone()]).collect();
        assert_eq!(texts, vec![".store", "['a.b']", "[0]"]);
    }

    #[test]
    fn spans_of_descendant_segment() {
        let input = "$..book[?(@.price > 1)].title";
        let spanned = JsonPathParser::parse_spanned(input).unwrap();
        let texts: Vec<&str> = spanned.spans.iter().map(|r| &input[r.clone()]).collect();
        assert_eq!(texts, vec!["..book", "[?(@.price > 1)]", ".title"]);
    }

    #[test]
    fn escapes_in_quoted_names() {
        let path = JsonPathParser::parse(r#"$['a\'b', "cé", '😀']"#).unwrap();
        assert_eq!(
            path.segments[0].selectors,
            vec![
                Selector::Name("a'b".into()),
                Selector::Name("cé".into()),
                Selector::Name("😀".into()),
            ]
        );
    }

    #[test]
    fn unicode_escape_requires_four_hex_digits() {
        assert_eq!(
            JsonPathParser::parse(r"$['\u0041']").unwrap().segments[0].selectors,
            vec![Selector::Name("A".into())]
        );
        for bad in [r"$['\u+041']", r"$['\u-041']", r"$['\u00g1']", r"$['\u41']"] {
            assert_eq!(JsonPathParser::parse(bad), Err(ParseError::InvalidEscape), "{bad}");
        }
    }

    #[test]
    fn lone_high_surrogate_is_rejected() {
        assert_eq!(
            JsonPathParser::parse(r"$['\ud83d']"),
            Err(ParseError::InvalidEscape)
        );
    }

    #[test]
    fn bare_bracket_name() {
        let path = JsonPathParser::parse("$[store][book]").unwrap();
        assert_eq!(path.segments[0].as_single_name(), Some("store"));
        assert_eq!(path.segments[1].as_single_name(), Some("book"));
    }

    #[test]
    fn trailing_input_reports_offset() {
        assert_eq!(
            JsonPathParser::parse("$.store?bad"),
            Err(ParseError::TrailingInput(7))
        );
        assert_eq!(JsonPathParser::parse("$ .a"), Err(ParseError::TrailingInput(1)));
    }

    #[test]
    fn integer_literal_stays_integer() {
        let path = JsonPathParser::parse("$[?(@.id == 3)]").unwrap();
        match &path.segments[0].selectors[0] {
            Selector::Filter(FilterExpression::Comparison { right, .. }) => {
                assert_eq!(right, &ValueExpression::Literal(serde_json::json!(3)));
            }
            other => panic!("expected comparison, got {other:?}"),
        }
    }

    #[test]
    fn keyword_prefix_is_not_a_literal() {
        // `trueish` is a function name, not `true` followed by garbage.
        assert!(JsonPathParser::parse("$[?trueish(@)]").is_ok());
    }

    #[test]
    fn root_query_in_filter() {
        let path = JsonPathParser::parse("$.items[?(@.n < $.limit)]").unwrap();
        match &path.segments[1].selectors[0] {
            Selector::Filter(FilterExpression::Comparison { right, .. }) => {
                assert!(matches!(right, ValueExpression::RootPath(p) if p.segments.len() == 1));
            }
            other => panic!("expected comparison, got {other:?}"),
        }
    }

    #[test]
    fn script_expressions_are_rejected() {
        assert!(JsonPathParser::parse("$.items[(@.length-1)]").is_err());
    }
}
