//! Structural comparison of two graphs.
//!
//! A signature renders an element's kind, attributes and children. Named
//! children appear as `<urn>`; anonymous children have no stable URN across
//! loads and are rendered inline instead.

use std::collections::HashSet;
use std::fmt::Write as _;

use super::{CharacteristicKind, Element, ElementId, ElementKind, ModelGraph, StructuredElement, Value};

/// Structural signature of the element at `id`.
#[must_use]
pub fn signature(graph: &ModelGraph, id: ElementId) -> String {
    let mut out = String::new();
    let mut visiting = HashSet::new();
    write_element(graph, id, &mut out, &mut visiting);
    out
}

/// Every named element of `a` whose counterpart in `b` is missing or has a
/// different signature, one line each. Empty when `b` is structurally
/// equivalent to `a`.
#[must_use]
pub fn differences(a: &ModelGraph, b: &ModelGraph) -> Vec<String> {
    let mut out = Vec::new();
    for id in a.all_elements() {
        let Some(element) = a.element(id) else {
            continue;
        };
        if element.meta.anonymous {
            continue;
        }
        let urn = element.urn();
        match b.get(urn) {
            None => out.push(format!("missing {urn}")),
            Some(other) => {
                let left = signature(a, id);
                let right = signature(b, other);
                if left != right {
                    out.push(format!("differs {urn}: {left} != {right}"));
                }
            }
        }
    }
    out
}

fn write_element(graph: &ModelGraph, id: ElementId, out: &mut String, visiting: &mut HashSet<ElementId>) {
    let Some(element) = graph.element(id) else {
        out.push('?');
        return;
    };
    if !visiting.insert(id) {
        out.push_str("<cycle>");
        return;
    }
    write_meta(element, out);
    let _ = write!(out, "{}{{", element.kind.label());
    match &element.kind {
        ElementKind::Aspect(aspect) => {
            write_structure(graph, id, &aspect.structure.properties, out, visiting);
            write_list(graph, "operations", &aspect.operations, out, visiting);
            write_list(graph, "events", &aspect.events, out, visiting);
        }
        ElementKind::Property(property) => {
            let _ = write!(out, "abstract={};", property.is_abstract);
            write_opt(graph, "characteristic", property.characteristic, out, visiting);
            write_opt(graph, "extends", property.extends, out, visiting);
            if let Some(example) = &property.example_value {
                let _ = write!(out, "example={:?}^^{};", example.lexical, example.datatype);
            }
        }
        ElementKind::Operation(operation) => {
            write_list(graph, "input", &operation.input, out, visiting);
            write_opt(graph, "output", operation.output, out, visiting);
        }
        ElementKind::Event(event) => write_structure(graph, id, &event.structure.properties, out, visiting),
        ElementKind::Entity(entity) => {
            let _ = write!(out, "abstract={};", entity.is_abstract);
            write_opt(graph, "extends", entity.extends, out, visiting);
            write_structure(graph, id, &entity.structure.properties, out, visiting);
        }
        ElementKind::Characteristic(characteristic) => {
            write_opt(graph, "dataType", characteristic.data_type, out, visiting);
            write_characteristic(graph, &characteristic.kind, out, visiting);
        }
        ElementKind::Constraint(constraint) => {
            let _ = write!(out, "{constraint:?};");
        }
        ElementKind::Unit(unit) => {
            let _ = write!(
                out,
                "symbol={:?};code={:?};factor={:?};numeric={:?};",
                unit.symbol, unit.code, unit.conversion_factor, unit.numeric_conversion_factor
            );
            write_opt(graph, "referenceUnit", unit.reference_unit, out, visiting);
            write_list(graph, "quantityKinds", &unit.quantity_kinds, out, visiting);
        }
        ElementKind::QuantityKind(kind) => {
            let _ = write!(out, "label={:?};", kind.label);
        }
        ElementKind::Scalar(_) => {}
        ElementKind::EntityInstance(instance) => {
            write_opt(graph, "type", instance.entity, out, visiting);
            for (property, values) in &instance.assertions {
                let _ = write!(out, "{property}=");
                write_values(graph, values, out, visiting);
            }
        }
    }
    out.push('}');
    visiting.remove(&id);
}

fn write_meta(element: &Element, out: &mut String) {
    let meta = &element.meta;
    for (lang, text) in &meta.preferred_names {
        let _ = write!(out, "name@{lang}={text:?};");
    }
    for (lang, text) in &meta.descriptions {
        let _ = write!(out, "description@{lang}={text:?};");
    }
    for see in &meta.see {
        let _ = write!(out, "see={see};");
    }
}

fn write_characteristic(
    graph: &ModelGraph,
    kind: &CharacteristicKind,
    out: &mut String,
    visiting: &mut HashSet<ElementId>,
) {
    match kind {
        CharacteristicKind::Trait { base, constraints } => {
            write_opt(graph, "base", *base, out, visiting);
            write_list(graph, "constraints", constraints, out, visiting);
        }
        CharacteristicKind::Quantity { unit, .. } => write_opt(graph, "unit", *unit, out, visiting),
        CharacteristicKind::Enumeration { values } => {
            out.push_str("values=");
            write_values(graph, values, out, visiting);
        }
        CharacteristicKind::State {
            values,
            default_value,
        } => {
            out.push_str("values=");
            write_values(graph, values, out, visiting);
            out.push_str("default=");
            write_values(graph, default_value.as_slice(), out, visiting);
        }
        CharacteristicKind::Collection {
            element_characteristic,
            ..
        } => write_opt(graph, "elementCharacteristic", *element_characteristic, out, visiting),
        CharacteristicKind::Either { left, right } => {
            write_opt(graph, "left", *left, out, visiting);
            write_opt(graph, "right", *right, out, visiting);
        }
        CharacteristicKind::StructuredValue {
            deconstruction_rule,
            elements,
        } => {
            let _ = write!(out, "rule={deconstruction_rule:?};elements=[");
            for element in elements {
                match element {
                    StructuredElement::Text(text) => {
                        let _ = write!(out, "{text:?},");
                    }
                    StructuredElement::Property(id) => {
                        write_ref(graph, *id, out, visiting);
                        out.push(',');
                    }
                }
            }
            out.push_str("];");
        }
        CharacteristicKind::Plain | CharacteristicKind::Code | CharacteristicKind::SingleEntity => {}
    }
}

fn write_structure(
    graph: &ModelGraph,
    owner: ElementId,
    properties: &[ElementId],
    out: &mut String,
    visiting: &mut HashSet<ElementId>,
) {
    out.push_str("properties=[");
    for &property in properties {
        write_ref(graph, property, out, visiting);
        if let Some(payload) = graph.payload_of(owner, property) {
            let _ = write!(
                out,
                "(optional={},notInPayload={},payloadName={:?})",
                payload.optional, payload.not_in_payload, payload.payload_name
            );
        }
        out.push(',');
    }
    out.push_str("];");
}

fn write_list(
    graph: &ModelGraph,
    label: &str,
    ids: &[ElementId],
    out: &mut String,
    visiting: &mut HashSet<ElementId>,
) {
    let _ = write!(out, "{label}=[");
    for &id in ids {
        write_ref(graph, id, out, visiting);
        out.push(',');
    }
    out.push_str("];");
}

fn write_opt(
    graph: &ModelGraph,
    label: &str,
    id: Option<ElementId>,
    out: &mut String,
    visiting: &mut HashSet<ElementId>,
) {
    if let Some(id) = id {
        let _ = write!(out, "{label}=");
        write_ref(graph, id, out, visiting);
        out.push(';');
    }
}

fn write_values(graph: &ModelGraph, values: &[Value], out: &mut String, visiting: &mut HashSet<ElementId>) {
    out.push('[');
    for value in values {
        match value {
            Value::Scalar(scalar) => {
                let _ = write!(out, "{:?}", scalar.lexical);
                match &scalar.language {
                    Some(lang) => {
                        let _ = write!(out, "@{lang}");
                    }
                    None => {
                        let _ = write!(out, "^^{}", scalar.datatype);
                    }
                }
            }
            Value::Instance(id) => write_ref(graph, *id, out, visiting),
        }
        out.push(',');
    }
    out.push_str("];");
}

fn write_ref(graph: &ModelGraph, id: ElementId, out: &mut String, visiting: &mut HashSet<ElementId>) {
    match graph.element(id) {
        Some(element) if element.meta.anonymous => write_element(graph, id, out, visiting),
        Some(element) => {
            let _ = write!(out, "<{}>", element.urn());
        }
        None => out.push('?'),
    }
}
