use serde_json::{Value, json};
use waki_ast::{
    builder::{
        create_function_call, create_function_declaration, create_if, create_literal_float,
        create_literal_int, create_literal_string, create_return, create_round,
        create_variable_declaration,
    },
    errors::AstError,
    json::{JsonStyle, from_json, render_json, to_json},
    lifecycle::destroy,
    node_list::NodeList,
    nodes::{Node, Parameter},
    tree::SyntaxTree,
};

use crate::utils::{
    CountingWriter, FailingWriter, at, block, else_if_chain, full_program, ident, int,
    read_golden, sample_trees,
};

fn compact(node: &Node) -> String {
    to_json(Some(node), JsonStyle::Compact).unwrap()
}

#[test]
fn test_int_literal() {
    assert_eq!(
        compact(&create_literal_int(42, None)),
        r#"{"type":"LITERAL","value":42,"value_type":"int"}"#
    );
}

#[test]
fn test_float_literal_is_a_number() {
    let parsed: Value = serde_json::from_str(&compact(&create_literal_float(2.5, None))).unwrap();
    assert_eq!(parsed, json!({"type": "LITERAL", "value": 2.5, "value_type": "float"}));
}

#[test]
fn test_non_finite_float_is_null() {
    let parsed: Value =
        serde_json::from_str(&compact(&create_literal_float(f64::NAN, None))).unwrap();
    assert_eq!(parsed["value"], Value::Null);
}

#[test]
fn test_string_literal_escapes_quote() {
    assert_eq!(
        compact(&create_literal_string("a\"b", None)),
        r#"{"type":"LITERAL","value":"a\"b","value_type":"string"}"#
    );
}

#[test]
fn test_string_literal_escapes_control_characters() {
    let text = compact(&create_literal_string("back\\slash\nline\ttab\u{1}", None));
    assert!(text.contains(r#""back\\slash\nline\ttab\u0001""#), "{text}");
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["value"], "back\\slash\nline\ttab\u{1}");
}

#[test]
fn test_variable_declaration_with_initializer_object() {
    let node = create_variable_declaration("x", "int", false, Some(int(1)), None);
    let parsed: Value = serde_json::from_str(&compact(&node)).unwrap();
    assert_eq!(
        parsed,
        json!({
            "type": "VAR_DECL",
            "name": "x",
            "declared_type": "int",
            "is_global": false,
            "initializer": {"type": "LITERAL", "value": 1, "value_type": "int"}
        })
    );
}

#[test]
fn test_absent_children_are_explicit_null() {
    let if_node = create_if(ident("c"), block(Vec::new()), None, None);
    let round = create_round("i", int(0), int(1), None, block(Vec::new()), None);
    let ret = create_return(None, None);
    let decl = create_variable_declaration("v", "int", false, None, None);
    let forward = create_function_declaration("f", Vec::new(), "void", None, None);

    for (node, member) in [
        (if_node, "else"),
        (round, "step"),
        (ret, "value"),
        (decl, "initializer"),
        (forward, "body"),
    ] {
        let parsed: Value = serde_json::from_str(&compact(&node)).unwrap();
        let object = parsed.as_object().unwrap();
        assert_eq!(object.get(member), Some(&Value::Null), "{member} of {}", node.kind());
    }
}

#[test]
fn test_call_without_arguments_has_empty_array() {
    let node = create_function_call("f", NodeList::new(), None);
    assert_eq!(compact(&node), r#"{"type":"FUNC_CALL","name":"f","args":[]}"#);
}

#[test]
fn test_function_declaration_params() {
    let node = create_function_declaration(
        "add",
        vec![Parameter::new("a", "int"), Parameter::new("b", "int")],
        "int",
        Some(block(Vec::new())),
        None,
    );
    let parsed: Value = serde_json::from_str(&compact(&node)).unwrap();
    assert_eq!(
        parsed["params"],
        json!([{"name": "a", "param_type": "int"}, {"name": "b", "param_type": "int"}])
    );
    assert_eq!(parsed["return_type"], "int");
    assert_eq!(parsed["body"], json!({"type": "BLOCK", "children": []}));
}

#[test]
fn test_position_members_follow_fields() {
    let node = create_literal_int(7, at(12, 4));
    assert_eq!(
        compact(&node),
        r#"{"type":"LITERAL","value":7,"value_type":"int","line":12,"column":4}"#
    );
}

#[test]
fn test_program_children_keep_order() {
    let parsed: Value = serde_json::from_str(&compact(&full_program())).unwrap();
    let types: Vec<&str> = parsed["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|child| child["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        vec!["VAR_DECL", "VAR_DECL", "FUNC_DECL", "FUNC_DECL", "ROUND", "WHILE", "IF", "RETURN"]
    );
}

#[test]
fn test_pretty_style_matches_golden() {
    let node = create_variable_declaration("x", "int", false, Some(int(1)), at(3, 5));
    let expected = read_golden(module_path!(), "var_decl_pretty.json");
    assert_eq!(
        to_json(Some(&node), JsonStyle::Pretty).unwrap(),
        expected.trim_end()
    );
}

#[test]
fn test_null_root() {
    assert_eq!(to_json(None, JsonStyle::Compact).unwrap(), "null");
    let mut out = Vec::new();
    SyntaxTree::new()
        .render_json(&mut out, JsonStyle::Pretty)
        .unwrap();
    assert_eq!(out, b"null");
}

#[test]
fn test_render_json_to_sink_matches_to_json() -> anyhow::Result<()> {
    let program = full_program();
    let mut out = Vec::new();
    render_json(Some(&program), &mut out, JsonStyle::Compact)?;
    assert_eq!(String::from_utf8(out)?, to_json(Some(&program), JsonStyle::Compact)?);
    Ok(())
}

#[test]
fn test_render_json_reports_io_failure() {
    let program = full_program();
    let mut sink = FailingWriter { budget: 10 };
    let err = render_json(Some(&program), &mut sink, JsonStyle::Compact).unwrap_err();
    assert!(matches!(err, AstError::Io(_)), "unexpected error {err:?}");
}

#[test]
fn test_json_style_from_config() {
    let style: JsonStyle = serde_json::from_str(r#""pretty""#).unwrap();
    assert_eq!(style, JsonStyle::Pretty);
    assert_eq!(JsonStyle::default(), JsonStyle::Compact);
}

#[test]
fn test_from_json_restores_trees() -> anyhow::Result<()> {
    for tree in sample_trees() {
        for style in [JsonStyle::Compact, JsonStyle::Pretty] {
            let text = to_json(Some(&tree), style)?;
            assert_eq!(from_json(&text)?, Some(tree.clone()));
        }
    }
    assert_eq!(from_json("null")?, None);
    Ok(())
}

fn malformed_reason(text: &str) -> String {
    match from_json(text) {
        Err(AstError::MalformedJson { reason }) => reason,
        other => panic!("expected malformed JSON error, got {other:?}"),
    }
}

#[test]
fn test_from_json_rejects_unknown_type() {
    let reason = malformed_reason(r#"{"type":"GOTO","label":"x"}"#);
    assert_eq!(reason, "unknown node type `GOTO`");
}

#[test]
fn test_from_json_rejects_missing_member() {
    let reason = malformed_reason(r#"{"type":"ASSIGN","target":"x"}"#);
    assert_eq!(reason, "`ASSIGN` node is missing `value`");
}

#[test]
fn test_from_json_rejects_mismatched_literal() {
    let reason = malformed_reason(r#"{"type":"LITERAL","value":"1","value_type":"int"}"#);
    assert!(reason.contains("does not match value type `int`"), "{reason}");
}

#[test]
fn test_from_json_rejects_partial_position() {
    let reason = malformed_reason(r#"{"type":"IDENT","name":"x","line":3}"#);
    assert!(reason.contains("both `line` and `column`"), "{reason}");
}

#[test]
fn test_from_json_rejects_invalid_syntax() {
    assert!(matches!(
        from_json("{\"type\":"),
        Err(AstError::MalformedJson { .. })
    ));
}

#[test]
fn test_from_json_accepts_missing_optional_member() -> anyhow::Result<()> {
    let node = from_json(r#"{"type":"RETURN"}"#)?;
    assert_eq!(node, Some(create_return(None, None)));
    Ok(())
}

#[test]
fn test_from_json_reads_documents_deeper_than_parser_default() -> anyhow::Result<()> {
    for depth in [127, 128, 129, 600] {
        let chain = else_if_chain(depth);
        for style in [JsonStyle::Compact, JsonStyle::Pretty] {
            let text = to_json(Some(&chain), style)?;
            let restored = from_json(&text)?.expect("a node");
            assert_eq!(restored.node_count(), 5 * depth + 1);
            assert_eq!(to_json(Some(&restored), style)?, text);
        }
    }
    Ok(())
}

#[test]
fn test_deep_else_if_chain_round_trips() -> anyhow::Result<()> {
    const DEPTH: usize = 50_000;
    let chain = else_if_chain(DEPTH);
    let text = to_json(Some(&chain), JsonStyle::Compact)?;
    let restored = from_json(&text)?.expect("a node");
    assert_eq!(to_json(Some(&restored), JsonStyle::Compact)?, text);
    assert_eq!(destroy(Some(restored)), 5 * DEPTH + 1);
    Ok(())
}

#[test]
fn test_render_json_buffers_output() -> anyhow::Result<()> {
    let program = full_program();
    let mut sink = CountingWriter::default();
    render_json(Some(&program), &mut sink, JsonStyle::Compact)?;
    assert_eq!(sink.writes, 1);
    assert_eq!(sink.bytes, to_json(Some(&program), JsonStyle::Compact)?.len());
    Ok(())
}

#[test]
fn test_styles_describe_the_same_document() -> anyhow::Result<()> {
    for tree in sample_trees() {
        let compact: Value = serde_json::from_str(&to_json(Some(&tree), JsonStyle::Compact)?)?;
        let pretty: Value = serde_json::from_str(&to_json(Some(&tree), JsonStyle::Pretty)?)?;
        assert_eq!(compact, pretty);
    }
    Ok(())
}

#[test]
fn test_from_json_rejects_non_node_child() {
    let reason = malformed_reason(r#"{"type":"PRINT","expression":[1]}"#);
    assert_eq!(reason, "`PRINT` member `expression` must be a node");
    let reason = malformed_reason(r#"{"type":"BLOCK","children":[3]}"#);
    assert_eq!(reason, "expected a node object, found `3`");
}

#[test]
fn test_from_json_rejects_trailing_text() {
    assert!(matches!(
        from_json(r#"{"type":"IDENT","name":"x"} extra"#),
        Err(AstError::MalformedJson { .. })
    ));
}
