use crate::builtins::*;
use crate::error_handling::*;
use crate::operators::*;
use crate::scanning::*;
use crate::stack::ensure_sufficient_stack;
use crate::symbol_table::SymbolTable;

use smallvec::SmallVec;
use tracing::{debug, trace};

/// Argument values held inline per call; longer argument lists spill to the heap.
pub const INLINE_ARGUMENTS: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct Function {
    pub action: Action,
    pub arity: usize,
}

type Arguments = SmallVec<[f64; INLINE_ARGUMENTS]>;

/// Owns an expression's tokens and the symbols it is evaluated against.
///
/// `set` tokenizes once; every `evaluate` starts from a fresh copy of those
/// tokens and collapses the copy in place, so the stored expression can be
/// evaluated again after variables change.
pub struct Evaluator {
    tokens: Vec<Token>,
    working: Vec<Token>,
    variables: SymbolTable<f64>,
    functions: SymbolTable<Function>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// An evaluator preloaded with the builtin functions and constants.
    pub fn new() -> Self {
        let mut evaluator = Self::empty();
        for builtin in BUILTIN_FUNCTIONS {
            evaluator.register_builtin(builtin);
        }
        for builtin in BUILTIN_VARIABLES {
            evaluator.set_variable(builtin.name, builtin.value);
        }
        evaluator
    }

    pub fn empty() -> Self {
        Self {
            tokens: Vec::new(),
            working: Vec::new(),
            variables: SymbolTable::new(),
            functions: SymbolTable::new(),
        }
    }

    /// Replaces the stored expression. On error nothing is stored.
    pub fn set(&mut self, expression: &str) -> Result<()> {
        self.tokens.clear();
        self.working.clear();
        self.tokens = tokenize(expression)?;
        Ok(())
    }

    pub fn evaluate(&mut self) -> Result<f64> {
        if self.tokens.is_empty() {
            return Err(PositionedError::new(Span::at(0), ErrorKind::no_expression));
        }

        self.working.clear();
        self.working.extend_from_slice(&self.tokens);

        let result = self.eval(0);
        match &result {
            Ok(value) => debug!(value, "evaluated expression"),
            Err(error) => {
                debug!(%error, start = error.start(), end = error.end(), "evaluation failed");
                self.working.clear();
            },
        }
        result
    }

    pub fn set_variable(&mut self, name: &str, value: f64) {
        self.variables.set(name, value);
    }

    pub fn get_variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    pub fn register_function(&mut self, name: &str, action: NativeFn, arity: usize) {
        self.functions.set(name, Function{action: Action::native(action), arity});
    }

    pub fn register_builtin(&mut self, builtin: &BuiltinFunction) {
        self.functions.set(builtin.name, Function{action: builtin.action, arity: builtin.arity()});
    }

    pub fn get_function(&self, name: &str) -> Option<Function> {
        self.functions.get(name).copied()
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, f64)> {
        self.variables.iter().map(|(name, value)| (name, *value))
    }

    pub fn functions(&self) -> impl Iterator<Item = (&str, &Function)> {
        self.functions.iter()
    }

    /// Tokens of the stored expression, untouched by evaluation.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn is_at<P: FnOnce(&Token) -> bool>(&self, index: usize, predicate: P) -> bool {
        self.working.get(index).is_some_and(predicate)
    }

    fn span_at(&self, index: usize) -> Span {
        self.working
            .get(index)
            .or(self.working.last())
            .map(|token| token.span)
            .unwrap_or_default()
    }

    fn next_delimiter(&self, from: usize) -> Result<usize> {
        (from..self.working.len())
            .find(|&index| self.working[index].is_delimiter())
            .ok_or_else(|| PositionedError::new(self.span_at(from), ErrorKind::invalid_token_order))
    }

    fn collapse(&mut self, t: usize) -> Result<()> {
        ensure_sufficient_stack(|| self.collapse_factor(t))
    }

    /// Reduces the token right after `t` to a number.
    fn collapse_factor(&mut self, t: usize) -> Result<()> {
        if self.is_at(t + 1, |token| token.is_operator(BinaryOperator::subtraction)) {
            self.collapse(t + 1)?;
            let minus = self.span_at(t + 1);
            match self.working.get_mut(t + 2) {
                Some(Token{kind: TokenKind::number(value), span}) => {
                    *value = -*value;
                    *span = minus.to(*span);
                },
                _ => return Err(PositionedError::new(self.span_at(t + 2), ErrorKind::invalid_after_minus)),
            }
            self.working.drain(t + 1..t + 2);
        }

        if self.is_at(t + 1, |token| token.is_punctuation(Punctuation::open_paren)) {
            let value = self.eval(t + 1)?;
            let close = self.next_delimiter(t + 2)?;
            let span = self.working[t + 1].span.to(self.working[close].span);
            self.working.drain(t + 2..=close);
            self.working[t + 1] = Token::new(TokenKind::number(value), span);
        }

        let name = match self.working.get_mut(t + 1) {
            Some(Token{kind: TokenKind::identifier(name), ..}) => std::mem::take(name),
            _ => return Ok(()),
        };
        let span = self.working[t + 1].span;

        let (value, span) = if self.is_at(t + 2, |token| token.is_punctuation(Punctuation::open_paren)) {
            self.call_function(t + 2, &name, span)?
        } else {
            let value = self
                .get_variable(&name)
                .ok_or(PositionedError::new(span, ErrorKind::unknown_variable))?;
            (value, span)
        };
        self.working[t + 1] = Token::new(TokenKind::number(value), span);
        Ok(())
    }

    /// Evaluates the call whose argument list opens at `open` and removes the
    /// list from the buffer. Returns the result and the span of the whole call.
    fn call_function(&mut self, open: usize, name: &str, name_span: Span) -> Result<(f64, Span)> {
        let function = self.get_function(name);
        if let Some(Function{action: Action::assign, arity}) = function {
            return self.call_assignment(open, name_span, arity);
        }

        let (arguments, close) = self.collect_arguments(open)?;
        let Some(Function{action: Action::native(action), arity}) = function else {
            return Err(PositionedError::new(name_span, ErrorKind::unknown_function));
        };
        if arguments.len() != arity {
            return Err(PositionedError::new(name_span, ErrorKind::invalid_argument_count));
        }

        let value = action(&arguments);
        trace!(function = name, ?arguments, value, "called function");
        Ok((value, name_span.to(close)))
    }

    /// `set(name, value)`: the first argument names the variable instead of
    /// being evaluated.
    fn call_assignment(&mut self, open: usize, name_span: Span, arity: usize) -> Result<(f64, Span)> {
        let target = match self.working.get_mut(open + 1) {
            Some(Token{kind: TokenKind::identifier(name), ..}) => std::mem::take(name),
            _ => return Err(PositionedError::new(self.span_at(open + 1), ErrorKind::expected_variable_name)),
        };
        let target_span = self.span_at(open + 1);

        if !self.is_at(open + 2, |token| token.is_punctuation(Punctuation::comma)) {
            if self.is_at(open + 2, |token| token.is_punctuation(Punctuation::close_paren)) {
                return Err(PositionedError::new(name_span, ErrorKind::invalid_argument_count));
            }
            return Err(PositionedError::new(target_span, ErrorKind::expected_variable_name));
        }
        // `( name , rest... )` becomes `( rest... )`
        self.working.drain(open + 1..=open + 2);

        let (arguments, close) = self.collect_arguments(open)?;
        if arguments.len() + 1 != arity {
            return Err(PositionedError::new(name_span, ErrorKind::invalid_argument_count));
        }

        let value = arguments.first().copied().unwrap_or(f64::NAN);
        debug!(variable = %target, value, "assigned variable from expression");
        self.set_variable(&target, value);
        Ok((value, name_span.to(close)))
    }

    /// Evaluates each comma-separated argument starting at the `(` at `open`,
    /// deleting each one as it is folded. Afterwards `open` holds whatever
    /// followed the closing `)`.
    fn collect_arguments(&mut self, open: usize) -> Result<(Arguments, Span)> {
        let mut arguments = Arguments::new();

        loop {
            arguments.push(self.eval(open)?);

            let delimiter = self.next_delimiter(open + 1)?;
            let token = &self.working[delimiter];
            if token.is_punctuation(Punctuation::comma) {
                self.working.drain(open..delimiter);
            } else if token.is_punctuation(Punctuation::close_paren) {
                let close = token.span;
                self.working.drain(open..=delimiter);
                return Ok((arguments, close));
            } else {
                return Err(PositionedError::new(token.span, ErrorKind::invalid_token_order));
            }
        }
    }

    fn eval(&mut self, start: usize) -> Result<f64> {
        ensure_sufficient_stack(|| self.climb(start))
    }

    /// Precedence climbing over `delimiter number operator number ... delimiter`
    /// starting at the delimiter at `start`.
    fn climb(&mut self, start: usize) -> Result<f64> {
        if !self.is_at(start, Token::is_delimiter) {
            return Err(PositionedError::new(self.span_at(start), ErrorKind::expected_delimiter));
        }

        let mut t = start;
        loop {
            self.collapse(t)?;

            let current = self.working.get(t).and_then(Token::precedence);
            let value = self.working.get(t + 1).and_then(Token::as_number);
            let next = self.working.get(t + 2).and_then(Token::precedence);
            let (Some(current), Some(rhs), Some(next)) = (current, value, next) else {
                let span = self.span_at(t).to(self.span_at(t + 1));
                return Err(PositionedError::new(span, ErrorKind::invalid_token_order));
            };

            // A number between two delimiters is the result of this level.
            if current == 0 && next == 0 {
                return Ok(rhs);
            }

            let operator = match self.working[t].kind {
                TokenKind::operator(operator) => Some(operator),
                _ => None,
            };
            let right_associative = operator.is_some_and(|operator| operator.associativity() == Associativity::right);

            if next > current || (next == current && right_associative) {
                t += 2;
                continue;
            }

            let Some(operator) = operator else {
                return Err(PositionedError::new(self.span_at(t), ErrorKind::invalid_operator));
            };
            let Some(lhs) = t.checked_sub(1).and_then(|index| self.working.get(index)).and_then(Token::as_number) else {
                let span = self.span_at(t.saturating_sub(1)).to(self.span_at(t));
                return Err(PositionedError::new(span, ErrorKind::invalid_token_order));
            };

            let result = operator.call(lhs, rhs);
            trace!(lhs, operator = %operator.symbol(), rhs, result, "fired operator");

            let span = self.working[t - 1].span.to(self.working[t + 1].span);
            self.working[t + 1] = Token::new(TokenKind::number(result), span);
            self.working.drain(t - 1..t + 1);
            t -= 2;
        }
    }
}
