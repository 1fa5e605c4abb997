//! Lossless parsing of Go `text/template` style actions.
//!
//! [`parse`] splits a template into literal text and `{{ ... }}` actions and
//! turns every action into a [`Tree`] that [`Render`] writes back out
//! unchanged. [`WalkVariables`] visits each variable group of a tree, and
//! [`remove_comments`] / [`prune_comments`] strip `/* ... */` comments.
//!
//! ```rust
//! use tmpltree::{Render, parse, prune_comments};
//!
//! let source = "Hi {{- .Name /* who */ | printf \"%q\" }}!";
//! let tree = parse("greeting.tmpl", source).unwrap();
//! assert_eq!(tree.render(), source);
//! assert_eq!(
//!     prune_comments(source).unwrap(),
//!     "Hi {{- .Name  | printf \"%q\" }}!"
//! );
//! ```

mod ast;
mod comments;
mod error;
mod escape;
mod lexer;
mod options;
mod parser;
mod render;
mod segment;
mod walk;

// Public exports.
pub use ast::{Action, Branch, Grouping, Pipeline, Pipelines, Tree, Variable, Variables};
pub use comments::{prune_comments, remove_comments};
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use escape::{quote_rune, quote_string};
pub use lexer::{Token, TokenKind, tokenize};
pub use options::{DEFAULT_MAX_DEPTH, ParseOptions};
pub use parser::{parse, parse_with_options};
pub use render::{Render, render};
pub use walk::{WalkVariables, walk_variables};
