//! Signature-chain type inference integration tests (spec.md §4.4, §8
//! scenarios S1 and S5, and universal property 5).

mod support;

use apimap::Scope;
use rstest::rstest;
use support::overlay_map;

#[test]
fn class_new_instance_method_chain_resolves() {
    // S1: class Foo; def bar; end; end
    let map = overlay_map("class Foo\ndef bar\nend\nend\n", "a.rb");

    let inferred = map.infer_signature_type("Foo.new.bar", "", Scope::Class, None);
    assert_eq!(inferred, Some(String::new()));

    let methods = map.get_instance_methods("Foo", "", apimap::Visibility::Public);
    assert!(methods.iter().any(|s| s.label == "bar"));
}

#[test]
fn bar_with_declared_return_type_carries_through() {
    let map = overlay_map("class Foo\ndef bar: Baz\nend\nend\n", "a.rb");
    let inferred = map.infer_signature_type("Foo.new.bar", "", Scope::Class, None);
    assert_eq!(inferred, Some("Baz".to_string()));
}

#[test]
fn instance_variable_literal_assignment_infers_its_class() {
    // S5: @x = 5 at instance scope of Foo
    let map = overlay_map("class Foo\n@x = 5\nend\n", "a.rb");
    let inferred = map.infer_instance_variable("x", "Foo", Scope::Instance);
    assert_eq!(inferred, Some("Integer".to_string()));
}

#[test]
fn signature_inference_is_deterministic_and_cache_consistent() {
    let map = overlay_map("class Foo\ndef bar\nend\nend\n", "a.rb");
    let first = map.infer_signature_type("Foo.new.bar", "", Scope::Class, None);
    let second = map.infer_signature_type("Foo.new.bar", "", Scope::Class, None);
    assert_eq!(first, second);
}

#[test]
fn self_reference_in_assignment_breaks_recursion() {
    // `@x = @x.foo` must not infinitely recurse; it should report nothing
    // for @x rather than hang or stack overflow.
    let map = overlay_map("class Foo\n@x = @x.foo\nend\n", "a.rb");
    let inferred = map.infer_instance_variable("x", "Foo", Scope::Instance);
    assert_eq!(inferred, None);
}

#[rstest]
#[case("a", "String")]
#[case("b", "Array")]
#[case("c", "Symbol")]
#[case("d", "TrueClass")]
fn literal_shortcuts_skip_the_chain_walker(#[case] ivar: &str, #[case] expected_type: &str) {
    let map = overlay_map(
        r#"
class Foo
@a = "text"
@b = [1, 2]
@c = :sym
@d = true
end
"#,
        "a.rb",
    );
    assert_eq!(
        map.infer_instance_variable(ivar, "Foo", Scope::Instance),
        Some(expected_type.to_string())
    );
}

#[test]
fn empty_signature_at_instance_scope_returns_the_namespace_itself() {
    let map = overlay_map("class Foo\nend\n", "a.rb");
    assert_eq!(
        map.infer_signature_type("", "Foo", Scope::Instance, None),
        Some("Foo".to_string())
    );
}

#[test]
fn empty_signature_at_class_scope_wraps_as_class_type() {
    let map = overlay_map("class Foo\nend\n", "a.rb");
    assert_eq!(
        map.infer_signature_type("", "Foo", Scope::Class, None),
        Some("Class<Foo>".to_string())
    );
}

#[test]
fn empty_signature_at_class_scope_wraps_modules_distinctly() {
    let map = overlay_map("module Foo\nend\n", "a.rb");
    assert_eq!(
        map.infer_signature_type("", "Foo", Scope::Class, None),
        Some("Module<Foo>".to_string())
    );
}
