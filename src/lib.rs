#![allow(nonstandard_style)]

pub mod builtins;
pub mod error_handling;
pub mod evaluating;
pub mod operators;
pub mod scanning;
pub mod symbol_table;
mod stack;

pub use builtins::{Action, BuiltinFunction, BuiltinVariable, NativeFn, BUILTIN_FUNCTIONS, BUILTIN_VARIABLES};
pub use error_handling::{ErrorKind, PositionedError, Result, Span};
pub use evaluating::{Evaluator, Function, INLINE_ARGUMENTS};
