#![no_main]

use beanwire::{BeanDocument, Container, TypeRegistry};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Default)]
struct Node {
    label: String,
    weight: i64,
    deps: Vec<Arc<Node>>,
}

fn types() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types
        .register::<Node>("Node")
        .default_constructor(Node::default)
        .constructor(|(label,): (String,)| Node { label, ..Node::default() })
        .constructor(|(label, dep): (String, Arc<Node>)| Node {
            label,
            deps: vec![dep],
            ..Node::default()
        })
        .property("label", |n: &mut Node, label: String| n.label = label)
        .property("weight", |n: &mut Node, weight: i64| n.weight = weight)
        .property("dep", |n: &mut Node, dep: Arc<Node>| n.deps.push(dep))
        .init_hook("init", |n: &mut Node| n.weight = n.weight.wrapping_add(1))
        .destroy_hook("destroy", |n: &Node| {
            let _ = n.deps.len();
        });
    types
}

// Any document, valid or not, must yield a value or an error; never a panic.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for parsed in [BeanDocument::from_yaml_str(text), BeanDocument::from_json_str(text)] {
        let Ok(doc) = parsed else { continue };
        let Ok(defs) = doc.into_definitions() else { continue };
        if let Ok(mut container) = Container::load(types(), defs) {
            for name in container.bean_names().into_iter().map(String::from).collect::<Vec<_>>() {
                let _ = container.get_bean(&name);
            }
            let _ = container.close();
        }
    }
});
