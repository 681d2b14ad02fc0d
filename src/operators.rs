//! Operator alias tables.
//!
//! Lexemes are matched by stripping whitespace and upper-casing, so
//! `greater than or equal to` and `GTE` land on the same key. A lexeme missing
//! from the tables means the grammar and the builder disagree, which is an
//! internal error.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ast::{AssignmentOperator, BinaryOperator, ComparisonOperator, UnaryOperator};
use crate::diagnostics::BxError;
use crate::err_msg;

static BINARY: Lazy<HashMap<&'static str, BinaryOperator>> = Lazy::new(|| {
    use BinaryOperator::*;
    HashMap::from([
        ("+", Plus),
        ("-", Minus),
        ("*", Star),
        ("/", Slash),
        ("\\", Backslash),
        ("^", Power),
        ("%", Modulus),
        ("MOD", Modulus),
        ("&", Concat),
        ("&&", And),
        ("AND", And),
        ("||", Or),
        ("OR", Or),
        ("XOR", Xor),
        ("EQV", Equivalence),
        ("IMP", Implies),
        ("CONTAINS", Contains),
        ("DOESNOTCONTAIN", NotContains),
        ("NOTCONTAINS", NotContains),
        ("INSTANCEOF", InstanceOf),
        ("CASTAS", CastAs),
        ("?:", Elvis),
        ("B&", BitwiseAnd),
        ("B|", BitwiseOr),
        ("B^", BitwiseXor),
        ("B<<", BitwiseSignedLeftShift),
        ("B>>", BitwiseSignedRightShift),
        ("B>>>", BitwiseUnsignedRightShift),
    ])
});

static COMPARISON: Lazy<HashMap<&'static str, ComparisonOperator>> = Lazy::new(|| {
    use ComparisonOperator::*;
    HashMap::from([
        ("==", Equal),
        ("EQ", Equal),
        ("EQUAL", Equal),
        ("IS", Equal),
        ("!=", NotEqual),
        ("<>", NotEqual),
        ("NEQ", NotEqual),
        ("NE", NotEqual),
        ("ISNOT", NotEqual),
        ("NOTEQUAL", NotEqual),
        ("===", TEqual),
        ("!==", TNotEqual),
        (">", GreaterThan),
        ("GT", GreaterThan),
        ("GREATERTHAN", GreaterThan),
        (">=", GreaterThanEquals),
        ("GE", GreaterThanEquals),
        ("GTE", GreaterThanEquals),
        ("GREATERTHANOREQTO", GreaterThanEquals),
        ("GREATERTHANOREQUALTO", GreaterThanEquals),
        ("<", LessThan),
        ("LT", LessThan),
        ("LESSTHAN", LessThan),
        ("<=", LessThanEquals),
        ("LE", LessThanEquals),
        ("LTE", LessThanEquals),
        ("LESSTHANOREQTO", LessThanEquals),
        ("LESSTHANOREQUALTO", LessThanEquals),
    ])
});

static ASSIGNMENT: Lazy<HashMap<&'static str, AssignmentOperator>> = Lazy::new(|| {
    use AssignmentOperator::*;
    HashMap::from([
        ("=", Equal),
        ("+=", PlusEqual),
        ("-=", MinusEqual),
        ("*=", StarEqual),
        ("/=", SlashEqual),
        ("%=", ModEqual),
        ("&=", ConcatEqual),
    ])
});

static UNARY: Lazy<HashMap<&'static str, UnaryOperator>> = Lazy::new(|| {
    use UnaryOperator::*;
    HashMap::from([
        ("+", Plus),
        ("-", Minus),
        ("!", Not),
        ("NOT", Not),
        ("B~", BitwiseComplement),
        ("++", PrePlusPlus),
        ("--", PreMinusMinus),
    ])
});

/// Canonical lookup key: whitespace removed, upper-cased.
///
/// # Examples
///
/// ```rust
/// assert_eq!(bxast::operators::canonical("greater than or equal to"), "GREATERTHANOREQUALTO");
/// ```
pub fn canonical(lexeme: &str) -> String {
    lexeme
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn binary(lexeme: &str) -> Result<BinaryOperator, BxError> {
    BINARY
        .get(canonical(lexeme).as_str())
        .copied()
        .ok_or_else(|| err_msg!(Internal, "Unknown binary operator [{}]", lexeme))
}

pub fn comparison(lexeme: &str) -> Result<ComparisonOperator, BxError> {
    COMPARISON
        .get(canonical(lexeme).as_str())
        .copied()
        .ok_or_else(|| err_msg!(Internal, "Unknown comparison operator [{}]", lexeme))
}

pub fn assignment(lexeme: &str) -> Result<AssignmentOperator, BxError> {
    ASSIGNMENT
        .get(canonical(lexeme).as_str())
        .copied()
        .ok_or_else(|| err_msg!(Internal, "Unknown assignment operator [{}]", lexeme))
}

pub fn prefix(lexeme: &str) -> Result<UnaryOperator, BxError> {
    UNARY
        .get(canonical(lexeme).as_str())
        .copied()
        .ok_or_else(|| err_msg!(Internal, "Unknown unary operator [{}]", lexeme))
}

pub fn postfix(lexeme: &str) -> Result<UnaryOperator, BxError> {
    match lexeme {
        "++" => Ok(UnaryOperator::PostPlusPlus),
        "--" => Ok(UnaryOperator::PostMinusMinus),
        other => Err(err_msg!(Internal, "Unknown postfix operator [{}]", other)),
    }
}
