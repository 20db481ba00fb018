//! Snapshot tests for the writer on larger programs.
//!
//! Run `cargo insta review` to update snapshots after intentional changes.

use cobra_syntax::{Program, StructureEq, compile, read_python};

fn parse(code: &str) -> Program {
    read_python(code).expect("parse failed")
}

#[test]
fn event_handler_module() {
    let source = r#"
def setup(selector, url):
    el = jQuery(selector)
    el.on("click", lambda e: e.preventDefault())
    el.on("submit", lambda e: post(url, {"id": e.target.id, "meta": {"tags": [1, 2]}}))
    return el
"#;
    insta::assert_snapshot!(compile(source).unwrap(), @r#"
    var setup;
    setup = function(selector, url) {
        var el;
        el = jQuery(selector);
        el.on("click", function(e) {
            e.preventDefault();
        });
        el.on("submit", function(e) {
            post(url, {
                "id": e.target.id,
                "meta": {
                    "tags": [1,2]
                }
            });
        });
        return el;
    };
    "#);
}

#[test]
fn nested_control_flow() {
    let source = "
def classify(n):
    if n is None:
        return 'none'
    elif n < 0:
        sign = -1
        if n < -100:
            return 'tiny'
    else:
        sign = 1
    def helper(m):
        return m % 2 == 0
    even = helper(n)
    return [sign, even]
";
    insta::assert_snapshot!(compile(source).unwrap(), @r"
    var classify;
    classify = function(n) {
        var sign, helper, even;
        if (n === null) {
            return 'none';
        } else if (n < 0) {
            sign = -1;
            if (n < -100) {
                return 'tiny';
            }
        } else {
            sign = 1;
        }
        helper = function(m) {
            return m % 2 === 0;
        };
        even = helper(n);
        return [sign,even];
    };
    ");
}

#[test]
fn syntax_tree_serializes_with_kind_tags() {
    let program = parse("def f(a):\n    return (a)\nf(None)\n");
    let json = serde_json::to_value(&program).unwrap();

    let function = &json["body"][0];
    assert_eq!(function["kind"], "function");
    assert_eq!(function["name"], "f");
    assert_eq!(function["params"], serde_json::json!(["a"]));

    let returned = &function["body"][0]["value"];
    assert_eq!(function["body"][0]["kind"], "return");
    assert_eq!(returned["kind"], "grouped");
    let ident = serde_json::json!({"kind": "ident", "name": "a"});
    assert_eq!(returned["inner"], ident);

    let call = &json["body"][1]["expr"];
    assert_eq!(call["kind"], "call");
    assert_eq!(call["args"][0]["kind"], "none");
}

#[test]
fn grouping_only_changes_text() {
    let grouped = parse("x = ((a + b)) * (c)");
    let plain = parse("x = a + b * c");
    let reordered = parse("x = (a + b) * c");

    assert!(grouped.structure_eq(&reordered));
    assert!(!grouped.structure_eq(&plain));
    insta::assert_snapshot!(compile("x = ((a + b)) * (c)").unwrap(), @r"
    var x;
    x = ((a + b)) * (c);
    ");
}
