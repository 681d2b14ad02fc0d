// tests/expression_tests.rs

mod common;

use bxast::ast::{
    AssignmentModifier, BinaryOperator, ComparisonOperator, Expr, StructType, UnaryOperator,
    WithSpan,
};
use bxast::DialectKind;
use common::{assert_spans_cover_text, expr, expression, messages, name, script, statement_expr};

// ---
// Operators
// ---

#[test]
fn comparison_aliases_resolve_to_one_operator() {
    let shapes: Vec<_> = ["1 GT 2", "1 > 2", "1 GREATERTHAN 2", "1 greater than 2"]
        .iter()
        .map(|src| {
            let result = expression(DialectKind::Cf, src);
            assert!(result.issues.is_empty(), "{src}: {:?}", result.issues);
            match &expr(&result).value {
                Expr::ComparisonOperation {
                    left,
                    operator,
                    right,
                } => (left.value.clone(), *operator, right.value.clone()),
                other => panic!("{src}: expected a comparison, got {other:?}"),
            }
        })
        .collect();
    for shape in &shapes {
        assert_eq!(shape.1, ComparisonOperator::GreaterThan);
        assert_eq!(shape, &shapes[0]);
    }
}

#[test]
fn word_operators_cover_the_long_forms() {
    let cases = [
        ("a gte b", ComparisonOperator::GreaterThanEquals),
        ("a greater than or equal to b", ComparisonOperator::GreaterThanEquals),
        ("a LESS THAN OR EQ TO b", ComparisonOperator::LessThanEquals),
        ("a is not b", ComparisonOperator::NotEqual),
        ("a neq b", ComparisonOperator::NotEqual),
        ("a === b", ComparisonOperator::TEqual),
    ];
    for (src, expected) in cases {
        let result = expression(DialectKind::BoxScript, src);
        assert!(
            matches!(expr(&result).value, Expr::ComparisonOperation { operator, .. } if operator == expected),
            "{src}"
        );
    }
}

#[test]
fn logical_words_are_binary_operators() {
    let cases = [
        ("a EQV b", BinaryOperator::Equivalence),
        ("a imp b", BinaryOperator::Implies),
        ("a does not contain b", BinaryOperator::NotContains),
        ("a contains b", BinaryOperator::Contains),
        ("a and b", BinaryOperator::And),
        ("a mod b", BinaryOperator::Modulus),
        ("a ?: b", BinaryOperator::Elvis),
    ];
    for (src, expected) in cases {
        let result = expression(DialectKind::Cf, src);
        assert!(
            matches!(expr(&result).value, Expr::BinaryOperation { operator, .. } if operator == expected),
            "{src}"
        );
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let result = expression(DialectKind::BoxScript, "1 + 2 * 3");
    let Expr::BinaryOperation {
        left,
        operator: BinaryOperator::Plus,
        right,
    } = &expr(&result).value
    else {
        panic!("expected an addition at the root");
    };
    assert!(matches!(left.value, Expr::IntegerLiteral { ref value } if value == "1"));
    assert!(matches!(
        right.value,
        Expr::BinaryOperation {
            operator: BinaryOperator::Star,
            ..
        }
    ));
}

#[test]
fn subtraction_is_left_associative() {
    let result = expression(DialectKind::BoxScript, "a - b - c");
    let Expr::BinaryOperation { left, right, .. } = &expr(&result).value else {
        panic!("expected a subtraction");
    };
    assert_eq!(name(right), "c");
    assert_eq!(left.text, "a - b");
}

#[test]
fn concatenation_is_flattened() {
    let result = expression(DialectKind::BoxScript, r#""a" & b & "c" & d"#);
    let Expr::StringConcat { parts } = &expr(&result).value else {
        panic!("expected a concatenation");
    };
    assert_eq!(parts.len(), 4);
    assert_eq!(name(&parts[1]), "b");
}

#[test]
fn ternary_and_postfix() {
    let result = expression(DialectKind::BoxScript, "i++ > 3 ? 'big' : 'small'");
    let Expr::TernaryOperation { condition, .. } = &expr(&result).value else {
        panic!("expected a ternary");
    };
    let Expr::ComparisonOperation { left, .. } = &condition.value else {
        panic!("expected a comparison condition");
    };
    assert!(matches!(
        left.value,
        Expr::UnaryOperation {
            operator: UnaryOperator::PostPlusPlus,
            ..
        }
    ));
}

#[test]
fn strict_inequality_is_modern_only() {
    let modern = expression(DialectKind::BoxScript, "a !== b");
    assert!(modern.issues.is_empty());
    let legacy = expression(DialectKind::Cf, "a !== b");
    assert_eq!(
        messages(&legacy),
        vec!["Operator [!==] is not supported in the CF dialect"]
    );
    assert!(matches!(
        expr(&legacy).value,
        Expr::ComparisonOperation {
            operator: ComparisonOperator::TNotEqual,
            ..
        }
    ));
}

// ---
// Literals and names
// ---

#[test]
fn minus_before_boolean_is_reported_but_built() {
    let result = expression(DialectKind::BoxScript, "-true");
    assert_eq!(
        messages(&result),
        vec!["Minus operator cannot be applied to literal [true]"]
    );
    let Expr::UnaryOperation {
        operator: UnaryOperator::Minus,
        expression: operand,
    } = &expr(&result).value
    else {
        panic!("expected a unary minus");
    };
    assert!(matches!(operand.value, Expr::BooleanLiteral { value: true }));
}

#[test]
fn minus_before_numbers_and_strings_is_fine() {
    for src in ["-1", "-1.5", "-'a'", "-x"] {
        let result = expression(DialectKind::BoxScript, src);
        assert!(result.issues.is_empty(), "{src}");
    }
}

#[test]
fn illegal_identifier_keeps_its_text() {
    let result = expression(DialectKind::BoxScript, "1abc");
    assert_eq!(
        messages(&result),
        vec!["Identifier name cannot start with a number [1abc]"]
    );
    let root = expr(&result);
    assert!(matches!(root.value, Expr::Identifier { ref name } if name == "1abc"));
    assert_eq!(root.text, "1abc");
}

#[test]
fn scope_names_depend_on_the_dialect() {
    let legacy = expression(DialectKind::Cf, "client");
    assert!(matches!(expr(&legacy).value, Expr::Scope { .. }));
    let modern = expression(DialectKind::BoxScript, "client");
    assert!(matches!(expr(&modern).value, Expr::Identifier { .. }));
    let modern = expression(DialectKind::BoxScript, "VARIABLES");
    assert!(matches!(expr(&modern).value, Expr::Scope { ref name } if name == "VARIABLES"));
}

#[test]
fn struct_keys_are_names_first() {
    let result = expression(DialectKind::BoxScript, "{ true: 1, \"b c\": 2, 3: 3, a.b = 4 }");
    assert!(result.issues.is_empty());
    let Expr::StructLiteral {
        struct_type: StructType::Unordered,
        members,
    } = &expr(&result).value
    else {
        panic!("expected a struct literal");
    };
    assert!(matches!(members[0].key.value, Expr::Identifier { ref name } if name == "true"));
    assert!(matches!(members[1].key.value, Expr::StringLiteral { ref value } if value == "b c"));
    assert!(matches!(members[2].key.value, Expr::IntegerLiteral { ref value } if value == "3"));
    assert!(matches!(members[3].key.value, Expr::Fqn { ref value } if value == "a.b"));
}

#[test]
fn ordered_structs_and_arrays() {
    let result = expression(DialectKind::BoxScript, "[ a: 1, b: [1, 2] ]");
    let Expr::StructLiteral {
        struct_type: StructType::Ordered,
        members,
    } = &expr(&result).value
    else {
        panic!("expected an ordered struct");
    };
    assert!(matches!(members[1].value.value, Expr::ArrayLiteral { ref values } if values.len() == 2));

    let empty = expression(DialectKind::BoxScript, "[:]");
    assert!(matches!(
        expr(&empty).value,
        Expr::StructLiteral { ref members, .. } if members.is_empty()
    ));
}

// ---
// Strings
// ---

#[test]
fn plain_strings_are_unescaped_by_their_own_quote() {
    let result = expression(DialectKind::BoxScript, r#""say ""hi"" to ##1 and 'x'""#);
    assert!(matches!(
        expr(&result).value,
        Expr::StringLiteral { ref value } if value == r#"say "hi" to #1 and 'x'"#
    ));
    let result = expression(DialectKind::BoxScript, "'it''s \"q\"'");
    assert!(matches!(
        expr(&result).value,
        Expr::StringLiteral { ref value } if value == "it's \"q\""
    ));
}

#[test]
fn interpolation_alternates_text_and_expressions() {
    let result = expression(DialectKind::Cf, r#""Hello #user.name#, you are #age + 1#!""#);
    let Expr::StringInterpolation { parts } = &expr(&result).value else {
        panic!("expected an interpolation");
    };
    let kinds: Vec<_> = parts.iter().map(|p| p.value.kind_name()).collect();
    assert_eq!(
        kinds,
        vec![
            "StringLiteral",
            "DotAccess",
            "StringLiteral",
            "BinaryOperation",
            "StringLiteral"
        ]
    );
    assert!(matches!(parts[2].value, Expr::StringLiteral { ref value } if value == ", you are "));
}

// ---
// Assignment and declarations
// ---

#[test]
fn var_without_initializer_is_a_valueless_assignment() {
    let result = script(DialectKind::BoxScript, "var x;");
    assert!(result.issues.is_empty());
    let assignment = statement_expr(&result, 0);
    let Expr::Assignment {
        left,
        operator,
        right,
        modifiers,
    } = &assignment.value
    else {
        panic!("expected an assignment");
    };
    assert!(matches!(left.value, Expr::Identifier { ref name } if name == "x"));
    assert!(operator.is_none());
    assert!(right.is_none());
    assert_eq!(modifiers, &vec![AssignmentModifier::Var]);
    assert_eq!(assignment.text, "var x");
}

#[test]
fn modifiers_attach_to_the_assignment() {
    let result = script(DialectKind::BoxScript, "final var total = a + 1;");
    let Expr::Assignment {
        modifiers, right, ..
    } = &statement_expr(&result, 0).value
    else {
        panic!("expected an assignment");
    };
    assert_eq!(
        modifiers,
        &vec![AssignmentModifier::Final, AssignmentModifier::Var]
    );
    assert!(right.is_some());
}

#[test]
fn compound_assignment_operators() {
    let result = script(DialectKind::BoxScript, "s &= 'x'; n += 2;");
    assert!(matches!(
        statement_expr(&result, 0).value,
        Expr::Assignment {
            operator: Some(bxast::ast::AssignmentOperator::ConcatEqual),
            ..
        }
    ));
    assert!(matches!(
        statement_expr(&result, 1).value,
        Expr::Assignment {
            operator: Some(bxast::ast::AssignmentOperator::PlusEqual),
            ..
        }
    ));
}

// ---
// Arguments, new, closures
// ---

#[test]
fn mixed_arguments_are_reported_once() {
    let result = expression(DialectKind::BoxScript, "f(1, b=2)");
    assert_eq!(
        messages(&result),
        vec!["cannot mix named and positional arguments"]
    );
    let Expr::FunctionInvocation { name, arguments } = &expr(&result).value else {
        panic!("expected a function invocation");
    };
    assert_eq!(name, "f");
    assert_eq!(arguments.len(), 2);
    assert!(arguments[1].value.is_named_argument());
}

#[test]
fn named_arguments_accept_colon_and_quoted_names() {
    let result = expression(DialectKind::BoxScript, "f(a: 1, \"b\" = 2)");
    assert!(result.issues.is_empty());
    let Expr::FunctionInvocation { arguments, .. } = &expr(&result).value else {
        panic!("expected a function invocation");
    };
    assert!(arguments.iter().all(|a| a.value.is_named_argument()));
}

#[test]
fn new_with_module_suffix_becomes_a_string_target() {
    let result = expression(DialectKind::BoxScript, "new models.User@core(1)");
    let Expr::New {
        prefix,
        target,
        arguments,
    } = &expr(&result).value
    else {
        panic!("expected new");
    };
    assert!(prefix.is_none());
    assert!(matches!(target.value, Expr::StringLiteral { ref value } if value == "models.User@core"));
    assert_eq!(target.text, "models.User@core");
    assert_eq!(arguments.len(), 1);
}

#[test]
fn new_with_a_prefix() {
    let result = expression(DialectKind::BoxScript, "new java:java.util.ArrayList()");
    let Expr::New { prefix, target, .. } = &expr(&result).value else {
        panic!("expected new");
    };
    assert_eq!(prefix.as_deref().map(name), Some("java"));
    assert!(matches!(target.value, Expr::Fqn { ref value } if value == "java.util.ArrayList"));
}

#[test]
fn short_lambda_gets_an_any_parameter() {
    let result = expression(DialectKind::BoxScript, "x -> x * 2");
    let Expr::Lambda { parameters, .. } = &expr(&result).value else {
        panic!("expected a lambda");
    };
    let WithSpan { value: param, .. } = &parameters[0];
    assert_eq!(param.name, "x");
    assert_eq!(param.type_name, "Any");
    assert!(!param.required);

    let result = expression(DialectKind::BoxScript, "(a, b) => a + b");
    assert!(matches!(
        expr(&result).value,
        Expr::Closure { ref parameters, .. } if parameters.len() == 2
    ));
}

#[test]
fn closure_with_typed_parameters() {
    let result = expression(
        DialectKind::BoxScript,
        "function(required numeric n, s = 'x') { return n; }",
    );
    let Expr::Closure { parameters, .. } = &expr(&result).value else {
        panic!("expected a closure");
    };
    assert!(parameters[0].value.required);
    assert_eq!(parameters[0].value.type_name, "numeric");
    assert!(parameters[1].value.default_value.is_some());
}

#[test]
fn headless_functional_references() {
    let result = expression(DialectKind::BoxScript, "::ucase");
    assert!(matches!(
        expr(&result).value,
        Expr::FunctionalBifAccess { ref name } if name == "ucase"
    ));
    let result = expression(DialectKind::BoxScript, ".left(3)");
    assert!(matches!(
        expr(&result).value,
        Expr::FunctionalMemberAccess { ref name, arguments: Some(ref args) } if name == "left" && args.len() == 1
    ));
}

#[test]
fn empty_list_slots_stay_local() {
    let input = "[1, , 2]";
    let result = expression(DialectKind::BoxScript, input);
    assert_eq!(messages(&result), vec!["Missing expression"]);
    let Expr::ArrayLiteral { values } = &expr(&result).value else {
        panic!("expected an array literal");
    };
    let kinds: Vec<_> = values.iter().map(|v| v.value.kind_name()).collect();
    assert_eq!(kinds, vec!["IntegerLiteral", "ExpressionError", "IntegerLiteral"]);
    assert_eq!(values[1].text, "");
    assert_spans_cover_text(input, &result);

    let result = expression(DialectKind::Cf, "f(,)");
    assert_eq!(messages(&result), vec!["Missing expression"]);
    let Expr::FunctionInvocation { arguments, .. } = &expr(&result).value else {
        panic!("expected a function invocation");
    };
    assert_eq!(arguments.len(), 1);
    assert!(matches!(
        arguments[0].value,
        Expr::Argument { ref value, .. } if matches!(value.value, Expr::ExpressionError)
    ));
}

#[test]
fn trailing_commas_are_not_empty_slots() {
    for input in ["[1, 2,]", "f(1,)"] {
        let result = expression(DialectKind::BoxScript, input);
        assert!(result.is_correct(), "{input}: {:?}", result.issues);
    }
}
