use crate::error_handling::*;
use crate::operators::*;

use smallvec::SmallVec;
use tracing::debug;

/// Paren depth tracked without touching the heap.
const INLINE_PAREN_DEPTH: usize = 16;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    identifier(String),
    number(f64),
    operator(BinaryOperator),
    punctuation(Punctuation),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self{kind, span}
    }

    /// Precedence of an operator or delimiter; `None` for operands.
    pub fn precedence(&self) -> Option<u8> {
        match &self.kind {
            TokenKind::operator(operator) => Some(operator.precedence()),
            TokenKind::punctuation(_) => Some(0),
            _ => None,
        }
    }

    pub fn is_delimiter(&self) -> bool {
        self.precedence() == Some(0)
    }

    pub fn is_punctuation(&self, punctuation: Punctuation) -> bool {
        self.kind == TokenKind::punctuation(punctuation)
    }

    pub fn is_operator(&self, operator: BinaryOperator) -> bool {
        self.kind == TokenKind::operator(operator)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            TokenKind::number(value) => Some(value),
            _ => None,
        }
    }
}

fn is_exponent_marker(character: u8) -> bool {
    matches!(character, b'e' | b'E')
}

fn is_digit_or_dot(character: u8) -> bool {
    character.is_ascii_digit() || character == b'.'
}

/// Parses the longest prefix of `text` that forms a number, returning how
/// many bytes it used.
fn parse_number_prefix(text: &str) -> (usize, f64) {
    for length in (1..=text.len()).rev() {
        if let Ok(value) = text[..length].parse::<f64>() {
            return (length, value);
        }
    }
    (0, 0.0)
}

struct StringScanner<'a> {
    string: &'a str,
    index: usize,
    tokens: Vec<Token>,
    parens: SmallVec<[usize; INLINE_PAREN_DEPTH]>,
}

impl<'a> StringScanner<'a> {
    fn new(string: &'a str) -> Self {
        Self {
            string,
            index: 0,
            tokens: vec![Token::new(TokenKind::punctuation(Punctuation::open_paren), Span::at(0))],
            parens: SmallVec::new(),
        }
    }

    fn byte(&self, index: usize) -> Option<u8> {
        self.string.as_bytes().get(index).copied()
    }

    fn count<P: Fn(u8) -> bool>(&self, predicate: P) -> usize {
        self.string.as_bytes()[self.index..]
            .iter()
            .take_while(|&&c| predicate(c))
            .count()
    }

    fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    fn push(&mut self, kind: TokenKind, span: Span) {
        self.tokens.push(Token::new(kind, span));
    }

    /// Inserts a zero-width `*` right after the previous token if it is
    /// something that can be multiplied by what comes next.
    fn multiply_if<P: Fn(&TokenKind) -> bool>(&mut self, predicate: P) {
        if let Some(last) = self.last().filter(|token| predicate(&token.kind)) {
            let position = last.span.end + 1;
            self.push(TokenKind::operator(BinaryOperator::multiplication), Span::at(position));
        }
    }

    fn after_operand(kind: &TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::number(_) | TokenKind::identifier(_) | TokenKind::punctuation(Punctuation::close_paren)
        )
    }

    fn after_value(kind: &TokenKind) -> bool {
        matches!(kind, TokenKind::number(_) | TokenKind::punctuation(Punctuation::close_paren))
    }

    fn scan_number(&mut self) -> Result<()> {
        let start = self.index;
        let mut dot_seen = self.byte(start) == Some(b'.');
        let mut exponent_seen = false;
        let mut length = 1;

        while let Some(c) = self.byte(start + length) {
            let previous = self.string.as_bytes()[start + length - 1];
            let signed_exponent = is_exponent_marker(previous) && (c == b'+' || c == b'-');
            if !(is_digit_or_dot(c) || is_exponent_marker(c) || signed_exponent) {
                break;
            }

            let position = Span::at(start + length);
            if c == b'.' {
                if dot_seen {
                    return Err(PositionedError::new(position, ErrorKind::more_than_one_dot));
                } else if exponent_seen {
                    return Err(PositionedError::new(position, ErrorKind::dot_in_exponent));
                }
                dot_seen = true;
            }
            if is_exponent_marker(c) {
                if exponent_seen {
                    return Err(PositionedError::new(position, ErrorKind::more_than_one_exponent));
                }
                exponent_seen = true;
            }
            length += 1;
        }

        // `2e` is `2 * e`, not a number with an empty exponent.
        let mut end = start + length;
        let trailing_e = self.byte(end - 1).filter(|&c| is_exponent_marker(c));
        if trailing_e.is_some() {
            end -= 1;
        }

        let text = &self.string[start..end];
        let (consumed, value) = parse_number_prefix(text);
        if consumed != text.len() {
            return Err(PositionedError::new(Span::at(start + consumed), ErrorKind::invalid_number));
        }

        self.multiply_if(Self::after_operand);
        self.push(TokenKind::number(value), Span::new(start, end - 1));

        if let Some(marker) = trailing_e {
            self.push(TokenKind::operator(BinaryOperator::multiplication), Span::at(end));
            self.push(TokenKind::identifier(char::from(marker).to_string()), Span::at(end));
        }

        self.index = start + length;
        Ok(())
    }

    fn scan_identifier(&mut self) {
        let start = self.index;
        let length = self.count(|c| c.is_ascii_alphabetic());
        let name = self.string[start..start + length].to_string();

        self.multiply_if(Self::after_operand);
        self.push(TokenKind::identifier(name), Span::new(start, start + length - 1));
        self.index += length;
    }

    fn scan_punctuation(&mut self, punctuation: Punctuation) -> Result<()> {
        let position = self.index;
        match punctuation {
            Punctuation::open_paren => {
                self.parens.push(position);
                self.multiply_if(Self::after_value);
            },
            Punctuation::close_paren => {
                if self.parens.pop().is_none() {
                    return Err(PositionedError::new(Span::at(position), ErrorKind::unmatched_close_paren));
                }
            },
            Punctuation::comma => {},
        }
        self.push(TokenKind::punctuation(punctuation), Span::at(position));
        self.index += 1;
        Ok(())
    }

    fn scan(mut self) -> Result<Vec<Token>> {
        while let Some(c) = self.byte(self.index) {
            if c == b' ' {
                self.index += 1;
            } else if is_digit_or_dot(c) {
                self.scan_number()?;
            } else if c.is_ascii_alphabetic() {
                self.scan_identifier();
            } else if let Ok(punctuation) = Punctuation::try_from(c) {
                self.scan_punctuation(punctuation)?;
            } else if let Ok(operator) = BinaryOperator::try_from(c) {
                self.push(TokenKind::operator(operator), Span::at(self.index));
                self.index += 1;
            } else {
                return Err(PositionedError::new(Span::at(self.index), ErrorKind::unrecognized_symbol));
            }
        }

        if let Some(&position) = self.parens.last() {
            return Err(PositionedError::new(Span::at(position), ErrorKind::unmatched_open_paren));
        }

        let end = self.string.len();
        self.push(TokenKind::punctuation(Punctuation::close_paren), Span::at(end));
        Ok(self.tokens)
    }
}

/// Splits `text` into tokens framed by a synthetic `(` ... `)` pair, with
/// implicit multiplications already spelled out.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    let tokens = StringScanner::new(text).scan()?;
    debug!(input = text, tokens = tokens.len(), "tokenized expression");
    Ok(tokens)
}
