//! Syntax stage for the BoxLang/CFML front end
//!
//! Owns the pest grammars that produce the concrete parse tree, the position
//! resolver that maps parse-tree spans onto AST positions, and the comment
//! harvester.

use pest_derive::Parser;

pub mod comments;
pub mod position;

pub use position::PositionResolver;

/// The script grammar shared by both dialects.
#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
pub struct BoxGrammar;

/// The query-of-query SQL grammar. Lives in its own module so its `Rule`
/// enum does not collide with the script grammar's.
pub mod sql {
    use pest_derive::Parser;

    #[derive(Parser)]
    #[grammar = "syntax/sql.pest"]
    pub struct SqlGrammar;
}

/// Shorthand for a parse-tree node of the script grammar.
pub type Pair<'i> = pest::iterators::Pair<'i, Rule>;
