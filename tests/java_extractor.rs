//! Java extraction integration tests
//!
//! Full-source scenarios for the Java front end:
//! - Primary declaration, package, supertypes, type parameters
//! - Field and method enumeration with modifiers and annotations
//! - Javadoc tag parsing
//! - Body usage facts and syntactic call resolution
//! - Dependency list invariants and graceful-failure behavior

use dockit_core::{parse_source, ClassInfo, Lang};

fn parse(source: &str) -> Option<ClassInfo> {
    parse_source(source, Lang::Java).expect("java extraction should not fail")
}

#[test]
fn extracts_class_shape() {
    let source = r#"
package com.example;

public class TestClass extends Base implements Runnable, Cloneable {
    private int testField;

    public void run() {}
}
"#;
    let class = parse(source).unwrap();
    assert_eq!(class.name, "TestClass");
    assert_eq!(class.package_name, "com.example");
    assert_eq!(class.super_class.as_deref(), Some("Base"));
    assert_eq!(class.interfaces, vec!["Runnable", "Cloneable"]);

    assert_eq!(class.fields.len(), 1);
    assert_eq!(class.fields[0].name, "testField");
    assert_eq!(class.fields[0].field_type, "int");
    assert_eq!(class.fields[0].modifiers, vec!["private"]);

    assert_eq!(class.methods.len(), 1);
    assert_eq!(class.methods[0].name, "run");
    assert_eq!(class.methods[0].return_type, "void");
    assert_eq!(class.methods[0].modifiers, vec!["public"]);
}

#[test]
fn extracts_interface_declaration() {
    let source = r#"
package com.example;

public interface Repository<T> {
    T findById(String id);
}
"#;
    let class = parse(source).unwrap();
    assert_eq!(class.name, "Repository");
    assert_eq!(class.type_parameters, vec!["T"]);
    assert_eq!(class.methods.len(), 1);
    assert_eq!(class.methods[0].name, "findById");
    assert_eq!(class.methods[0].return_type, "T");
}

#[test]
fn extracts_method_signature_details() {
    let source = r#"
package com.example;

import java.io.IOException;

public class Service {
    public String fetch(String id, int count) throws IOException {
        return id;
    }

    public void log(String... parts) {}
}
"#;
    let class = parse(source).unwrap();

    let fetch = &class.methods[0];
    assert_eq!(fetch.parameters.len(), 2);
    assert_eq!(fetch.parameters[0].name, "id");
    assert_eq!(fetch.parameters[0].param_type, "String");
    assert_eq!(fetch.parameters[1].name, "count");
    assert_eq!(fetch.parameters[1].param_type, "int");
    assert_eq!(fetch.throws, vec!["IOException"]);

    let log = &class.methods[1];
    assert_eq!(log.parameters.len(), 1);
    assert!(log.parameters[0].is_vararg);
    assert_eq!(log.parameters[0].name, "parts");
}

#[test]
fn one_declaration_many_variables() {
    let source = r#"
public class Pair {
    private int first, second;
}
"#;
    let class = parse(source).unwrap();
    assert_eq!(class.fields.len(), 2);
    assert_eq!(class.fields[0].name, "first");
    assert_eq!(class.fields[1].name, "second");
    assert_eq!(class.fields[1].field_type, "int");
}

#[test]
fn extracts_annotations_with_attributes() {
    let source = r#"
package com.example;

public class Endpoint {
    @Deprecated
    @SuppressWarnings("unchecked")
    public void old() {}
}
"#;
    let class = parse(source).unwrap();
    let annotations = &class.methods[0].annotations;
    assert_eq!(annotations.len(), 2);
    assert_eq!(annotations[0].name, "Deprecated");
    assert!(annotations[0].attributes.is_empty());
    assert_eq!(annotations[1].name, "SuppressWarnings");
    assert_eq!(
        annotations[1].attributes.get("value").map(String::as_str),
        Some("\"unchecked\"")
    );
}

#[test]
fn parses_javadoc_tags() {
    let source = r#"
package com.example;

public class Store {
    /**
     * Adds a widget.
     *
     * @param widget the widget to add
     * @return true when added
     * @throws IllegalStateException when closed
     */
    public boolean add(String widget) {
        return true;
    }
}
"#;
    let class = parse(source).unwrap();
    let doc = class.methods[0].documentation.as_ref().unwrap();
    assert_eq!(doc.description, "Adds a widget.");
    assert_eq!(
        doc.params.get("widget").map(String::as_str),
        Some("the widget to add")
    );
    assert_eq!(doc.returns.as_deref(), Some("true when added"));
    assert_eq!(
        doc.throws.get("IllegalStateException").map(String::as_str),
        Some("when closed")
    );
}

#[test]
fn tracks_field_access_locals_and_invocations() {
    let source = r#"
package com.example;

import java.util.List;

public class Tracker {
    private List<String> items;
    private int count;

    public void record(String value) {
        String tmp = value.trim();
        items.add(tmp);
        count = count + 1;
        System.out.println(tmp);
    }
}
"#;
    let class = parse(source).unwrap();
    let record = &class.methods[0];

    assert!(record.accesses_fields.contains("items"));
    assert!(record.accesses_fields.contains("count"));
    assert!(record.local_variables.contains("tmp"));

    // items is typed by an explicit import, so the call resolves
    assert!(record
        .method_invocations
        .contains(&"java.util.List.add".to_string()));
    // stdout printing is always reported under its canonical name
    assert!(record
        .method_invocations
        .contains(&"System.out.println".to_string()));
}

#[test]
fn unscoped_calls_resolve_to_own_class() {
    let source = r#"
package com.example;

public class Chain {
    public void outer() {
        inner();
    }

    public void inner() {}
}
"#;
    let class = parse(source).unwrap();
    assert_eq!(
        class.methods[0].method_invocations,
        vec!["com.example.Chain.inner"]
    );
    assert!(class.dependencies.contains(&"com.example.Chain".to_string()));
}

#[test]
fn dependencies_are_qualified_sorted_and_deduped() {
    let source = r#"
package com.example;

import java.util.List;
import java.io.IOException;
import java.util.List;

public class Multi {
    private List<String> items;

    public List<String> all() throws IOException {
        return items;
    }
}
"#;
    let class = parse(source).unwrap();
    let mut sorted = class.dependencies.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(class.dependencies, sorted);
    assert!(class.dependencies.iter().all(|d| d.contains('.')));
    assert!(class.dependencies.contains(&"java.util.List".to_string()));
    assert!(class
        .dependencies
        .contains(&"java.io.IOException".to_string()));
}

#[test]
fn extraction_is_idempotent() {
    let source = r#"
package com.example;

import java.util.List;

/** A widget container. */
public class Box {
    private List<String> content;

    public void push(String item) {
        content.add(item);
    }
}
"#;
    let first = parse(source).unwrap();
    let second = parse(source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn garbage_and_classless_sources_yield_none() {
    assert!(parse("this is not java at all %%%").is_none());
    assert!(parse("").is_none());
    assert!(parse("package com.example;\nimport java.util.List;\n").is_none());
}

#[test]
fn missing_package_yields_empty_string() {
    let class = parse("public class Bare {}").unwrap();
    assert_eq!(class.package_name, "");
    assert!(class.dependencies.is_empty());
}

#[test]
fn serializes_to_json() {
    let class = parse("public class Bare {}").unwrap();
    let json = serde_json::to_string(&class).unwrap();
    assert!(json.contains("\"name\":\"Bare\""));

    let back: ClassInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(back, class);
}
