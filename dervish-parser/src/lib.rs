//! Turns the text of a math expression into a tree.
//!
//! Parsing happens in two stages. The [`tokenizer`] splits the text into tokens, and the
//! [`parser`] turns those tokens into a flat stream of [`Item`](parser::builder::Item)s, each
//! tagged with its bracket depth. The [`TreeBuilder`](parser::builder::TreeBuilder) then inserts
//! the items one by one into a tree, rotating nodes as needed so that precedence and
//! associativity are honored.

pub mod parser;
pub mod tokenizer;
