//! Compact text syntax.
//!
//! ```text
//! expr := ident | ident '.' ident | number | string
//!       | expr '(' args? ')' | expr '[' args ']'
//! args := expr (',' expr)*
//! ```
//!
//! `cd.name` is a symbol, a bare identifier a variable. In `head[v1,...,vn,body]` the
//! last argument is the body and all others must be variables. Strings take single or
//! double quotes; inside, only the enclosing quote character can be escaped.
//!
//! [`OmArena::simple_decode`](crate::arena::OmArena::simple_decode) parses and
//! [`OmArena::simple_encode`](crate::arena::OmArena::simple_encode) prints.
mod lexer;
mod parser;
mod printer;

pub use parser::parse_shape;
