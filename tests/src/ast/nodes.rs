use rustc_hash::FxHashSet;
use waki_ast::{
    builder::{create_if, create_literal_float, create_literal_string, create_round},
    nodes::{LiteralValue, Node, NodeKind, Position, ValueType},
};

use crate::utils::{at, bin, block, full_program, ident, int, preorder_kinds};

#[test]
fn test_position_new() {
    let pos = Position::new(4, 12);
    assert_eq!(pos.line, 4);
    assert_eq!(pos.column, 12);
}

#[test]
fn test_position_display() {
    let pos = Position::new(2, 3);
    assert_eq!(format!("{pos}"), "2:3");
}

#[test]
fn test_position_default_is_unknown() {
    let pos = Position::default();
    assert_eq!(pos, Position::new(0, 0));
}

#[test]
fn test_node_without_position_reports_zero() {
    let node = ident("x");
    assert_eq!(node.position(), None);
    assert_eq!(node.line(), 0);
    assert_eq!(node.column(), 0);
}

#[test]
fn test_node_with_position() {
    let node = create_literal_float(1.5, at(7, 9));
    assert_eq!(node.position(), Some(Position::new(7, 9)));
    assert_eq!(node.line(), 7);
    assert_eq!(node.column(), 9);
}

#[test]
fn test_node_kind_tags_are_unique_and_resolvable() {
    let tags: FxHashSet<&str> = NodeKind::ALL.iter().map(|kind| kind.tag()).collect();
    assert_eq!(tags.len(), NodeKind::ALL.len());
    assert_eq!(NodeKind::ALL.len(), 14);
    for kind in NodeKind::ALL {
        assert_eq!(NodeKind::from_tag(kind.tag()), Some(*kind));
    }
    assert_eq!(NodeKind::from_tag("UNKNOWN"), None);
}

#[test]
fn test_node_kind_display_uses_tag() {
    assert_eq!(NodeKind::VariableDeclaration.to_string(), "VAR_DECL");
    assert_eq!(NodeKind::RangeLoop.to_string(), "ROUND");
    assert_eq!(NodeKind::FunctionCall.to_string(), "FUNC_CALL");
}

#[test]
fn test_only_programs_and_blocks_have_statements() {
    let with_statements: Vec<NodeKind> = NodeKind::ALL
        .iter()
        .copied()
        .filter(|kind| kind.has_statements())
        .collect();
    assert_eq!(with_statements, vec![NodeKind::Program, NodeKind::Block]);
}

#[test]
fn test_literal_value_type_follows_value() {
    assert_eq!(LiteralValue::Int(1).value_type(), ValueType::Int);
    assert_eq!(LiteralValue::Float(1.0).value_type(), ValueType::Float);
    assert_eq!(
        LiteralValue::String("s".to_string()).value_type(),
        ValueType::String
    );
    let Node::Literal(literal) = create_literal_string("hi", None) else {
        panic!("expected a literal");
    };
    assert_eq!(literal.value_type(), ValueType::String);
}

#[test]
fn test_value_type_names() {
    for value_type in [ValueType::Int, ValueType::Float, ValueType::String] {
        assert_eq!(ValueType::from_name(value_type.as_str()), Some(value_type));
    }
    assert_eq!(ValueType::from_name("bool"), None);
    assert_eq!(ValueType::Float.to_string(), "float");
}

#[test]
fn test_literal_value_display() {
    assert_eq!(LiteralValue::Int(-3).to_string(), "-3");
    assert_eq!(LiteralValue::Float(2.0).to_string(), "2.0");
    assert_eq!(LiteralValue::Float(0.25).to_string(), "0.25");
    assert_eq!(
        LiteralValue::String("say \"hi\"\n".to_string()).to_string(),
        r#""say \"hi\"\n""#
    );
}

#[test]
fn test_if_children_in_rendering_order() {
    let node = create_if(ident("c"), ident("t"), Some(ident("e")), None);
    let names: Vec<String> = node
        .children()
        .into_iter()
        .map(|child| match child {
            Node::Identifier(ident) => ident.name.clone(),
            other => panic!("unexpected child {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["c", "t", "e"]);
}

#[test]
fn test_round_children_skip_missing_step() {
    let node = create_round("i", int(0), int(3), None, block(Vec::new()), None);
    let kinds: Vec<NodeKind> = node.children().into_iter().map(Node::kind).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Literal, NodeKind::Literal, NodeKind::Block]
    );
    let Node::RangeLoop(round) = node else {
        panic!("expected a round loop");
    };
    assert!(round.has_implicit_step());
}

#[test]
fn test_preorder_visits_parent_before_children() {
    let node = bin("+", bin("*", int(1), int(2)), ident("x"));
    assert_eq!(
        preorder_kinds(&node),
        vec![
            NodeKind::BinaryOperation,
            NodeKind::BinaryOperation,
            NodeKind::Literal,
            NodeKind::Literal,
            NodeKind::Identifier,
        ]
    );
}

#[test]
fn test_full_program_covers_every_kind() {
    let program = full_program();
    let seen: FxHashSet<NodeKind> = program.preorder().map(Node::kind).collect();
    for kind in NodeKind::ALL {
        assert!(seen.contains(kind), "{kind} is not covered");
    }
    assert_eq!(program.node_count(), 40);
}
