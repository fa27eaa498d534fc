//! Enumeration / state values and entity instances.

use crate::graph::{ElementId, ElementKind, EntityInstance, ScalarValue, Value};
use crate::store::Term;
use crate::vocab::iris;

use super::{base, entity, LoadContext};

/// Resolves the object of `samm-c:values`: an RDF list, in list order, or
/// a single node.
pub(super) fn resolve_values(ctx: &mut LoadContext<'_>, node: &Term) -> Vec<Value> {
    let store = ctx.store;
    if store.is_list(node) {
        store
            .resolve_list(node)
            .iter()
            .filter_map(|member| resolve_value(ctx, member))
            .collect()
    } else {
        resolve_value(ctx, node).into_iter().collect()
    }
}

/// A literal becomes a [`ScalarValue`]; any other node an entity instance.
pub(super) fn resolve_value(ctx: &mut LoadContext<'_>, node: &Term) -> Option<Value> {
    match node {
        Term::Literal(lit) => Some(Value::Scalar(ScalarValue::from_literal(lit))),
        _ => instance(ctx, node).map(Value::Instance),
    }
}

/// Builds the entity instance at `node`.
///
/// The instance is registered before its assertions are walked, so
/// instances that reference each other resolve to the cached element
/// instead of recursing.
fn instance(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        let is_instance = ctx
            .graph
            .element(id)
            .is_some_and(|e| matches!(e.kind, ElementKind::EntityInstance(_)));
        return is_instance.then_some(id);
    }
    let store = ctx.store;
    let Some(type_node) = store.object(node, iris::RDF_TYPE) else {
        ctx.unresolved(node, "entity_instance");
        return None;
    };
    let meta = base::extract(ctx, node, "instance");
    let id = ctx.reserve(node, meta, ElementKind::EntityInstance(EntityInstance::default()));
    let mut instance = EntityInstance {
        entity: entity::build(ctx, type_node),
        ..EntityInstance::default()
    };

    let samm = ctx.samm;
    for quad in store.quads_for_subject(node) {
        let predicate = quad.predicate.as_str();
        // Type and element metadata are not property assertions.
        if predicate == iris::RDF_TYPE
            || samm.is_preferred_name(predicate)
            || samm.is_description(predicate)
            || samm.is_see(predicate)
        {
            continue;
        }
        let values: Vec<Value> = if store.is_list(&quad.object) {
            store
                .resolve_list(&quad.object)
                .iter()
                .filter_map(|member| resolve_value(ctx, member))
                .collect()
        } else {
            resolve_value(ctx, &quad.object).into_iter().collect()
        };
        instance
            .assertions
            .entry(quad.predicate.clone())
            .or_default()
            .extend(values);
    }
    ctx.finish(id, ElementKind::EntityInstance(instance));
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::store::{Literal, TripleStore};
    use crate::vocab::Samm;

    #[test]
    fn mutually_referencing_instances_terminate() {
        let samm = Samm::default();
        let mut store = TripleStore::new();
        let entity = Term::iri("urn:x:1.0.0#Node");
        store.add(entity.clone(), iris::RDF_TYPE, Term::iri(samm.meta("Entity")));
        let a = Term::iri("urn:x:1.0.0#a");
        let b = Term::iri("urn:x:1.0.0#b");
        store.add(a.clone(), iris::RDF_TYPE, entity.clone());
        store.add(b.clone(), iris::RDF_TYPE, entity.clone());
        store.add(a.clone(), "urn:x:1.0.0#next", b.clone());
        store.add(b.clone(), "urn:x:1.0.0#next", a.clone());
        let config = LoaderConfig::seeded(13);
        let mut ctx = LoadContext::new(&store, &samm, &config);
        let value = resolve_value(&mut ctx, &a);
        let Some(Value::Instance(a_id)) = value else {
            unreachable!("expected an instance");
        };
        let b_id = ctx.graph.get("urn:x:1.0.0#b");
        let next = ctx
            .graph
            .element(a_id)
            .and_then(|e| e.as_instance())
            .map(|i| i.assertion("urn:x:1.0.0#next").to_vec());
        assert_eq!(next, b_id.map(|b| vec![Value::Instance(b)]));
        let back = b_id
            .and_then(|b| ctx.graph.element(b))
            .and_then(|e| e.as_instance())
            .map(|i| i.assertion("urn:x:1.0.0#next").to_vec());
        assert_eq!(back, Some(vec![Value::Instance(a_id)]));
    }

    #[test]
    fn instance_metadata_is_not_an_assertion() {
        let samm = Samm::default();
        let mut store = TripleStore::new();
        let entity = Term::iri("urn:x:1.0.0#Person");
        store.add(entity.clone(), iris::RDF_TYPE, Term::iri(samm.meta("Entity")));
        let alice = Term::iri("urn:x:1.0.0#alice");
        store.add(alice.clone(), iris::RDF_TYPE, entity);
        store.add(alice.clone(), samm.meta("preferredName"), Term::Literal(Literal::lang("Alice", "en")));
        store.add(alice.clone(), samm.meta("description"), Term::Literal(Literal::lang("A person.", "en")));
        store.add(alice.clone(), samm.meta("see"), Term::iri("https://example.org/alice"));
        store.add(alice.clone(), "urn:x:1.0.0#name", Term::Literal(Literal::string("Alice")));
        let config = LoaderConfig::seeded(13);
        let mut ctx = LoadContext::new(&store, &samm, &config);
        let Some(Value::Instance(id)) = resolve_value(&mut ctx, &alice) else {
            unreachable!("expected an instance");
        };
        let element = ctx.graph.element(id).expect("instance");
        let keys: Vec<&str> = element
            .as_instance()
            .map(|i| i.assertions.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys, ["urn:x:1.0.0#name"]);
        assert_eq!(element.meta.preferred_names.get("en").map(String::as_str), Some("Alice"));
        assert_eq!(element.meta.see, ["https://example.org/alice"]);
    }

    #[test]
    fn literals_are_scalars() {
        let samm = Samm::default();
        let store = TripleStore::new();
        let config = LoaderConfig::seeded(13);
        let mut ctx = LoadContext::new(&store, &samm, &config);
        let value = resolve_value(&mut ctx, &Term::Literal(Literal::typed("3", iris::XSD_INTEGER)));
        assert_eq!(value.as_ref().and_then(Value::as_scalar).and_then(|s| s.value.as_number()), Some(3.0));
    }
}
