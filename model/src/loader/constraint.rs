//! Constraint dispatch.

use crate::graph::{BoundDefinition, ConstraintKind, ElementId, ElementKind, ScalarValue};
use crate::store::Term;

use super::{base, LoadContext};

/// Constraint kinds recognised by `rdf:type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ConstraintType {
    Length,
    Range,
    Encoding,
    Language,
    Locale,
    RegularExpression,
    FixedPoint,
    Plain,
}

/// Characteristic-namespace constraint types. `samm:Constraint` is the
/// fallback and is checked after all of these.
const PRIORITY: &[(&str, ConstraintType)] = &[
    ("LengthConstraint", ConstraintType::Length),
    ("RangeConstraint", ConstraintType::Range),
    ("EncodingConstraint", ConstraintType::Encoding),
    ("LanguageConstraint", ConstraintType::Language),
    ("LocaleConstraint", ConstraintType::Locale),
    ("RegularExpressionConstraint", ConstraintType::RegularExpression),
    ("FixedPointConstraint", ConstraintType::FixedPoint),
];

impl ConstraintType {
    fn empty_kind(self) -> ConstraintKind {
        match self {
            ConstraintType::Length => ConstraintKind::Length { min: None, max: None },
            ConstraintType::Range => ConstraintKind::Range {
                min: None,
                max: None,
                lower_bound: BoundDefinition::Open,
                upper_bound: BoundDefinition::Open,
            },
            ConstraintType::Encoding => ConstraintKind::Encoding { value: String::new() },
            ConstraintType::Language => ConstraintKind::Language {
                language_code: String::new(),
            },
            ConstraintType::Locale => ConstraintKind::Locale {
                locale_code: String::new(),
            },
            ConstraintType::RegularExpression => ConstraintKind::RegularExpression {
                pattern: String::new(),
            },
            ConstraintType::FixedPoint => ConstraintKind::FixedPoint { scale: 0, integer: 0 },
            ConstraintType::Plain => ConstraintKind::Plain,
        }
    }
}

pub(super) fn classify(ctx: &LoadContext<'_>, node: &Term) -> Option<ConstraintType> {
    let samm = ctx.samm;
    let types = ctx.store.types_of(node);
    PRIORITY
        .iter()
        .find(|(local, _)| types.iter().any(|t| samm.is_characteristic(t, local)))
        .map(|&(_, kind)| kind)
        .or_else(|| {
            types
                .iter()
                .any(|t| samm.is_meta(t, "Constraint"))
                .then_some(ConstraintType::Plain)
        })
}

/// Builds the constraint at `node`, or records it as unresolved.
pub(super) fn build(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        return Some(id);
    }
    let Some(kind) = classify(ctx, node) else {
        ctx.unresolved(node, "constraint");
        return None;
    };
    let meta = base::extract(ctx, node, "constraint");
    let id = ctx.reserve(node, meta, ElementKind::Constraint(kind.empty_kind()));

    let store = ctx.store;
    let samm = ctx.samm;
    let mut constraint = kind.empty_kind();
    for quad in store.quads_for_subject(node) {
        let object = &quad.object;
        if samm.is_meta(&quad.predicate, "value") {
            match &mut constraint {
                ConstraintKind::Encoding { value } => {
                    *value = object
                        .as_iri()
                        .map(str::to_owned)
                        .or_else(|| base::text(object))
                        .unwrap_or_default();
                }
                ConstraintKind::RegularExpression { pattern } => {
                    *pattern = base::text(object).unwrap_or_default();
                }
                _ => {}
            }
            continue;
        }
        let Some(local) = samm.characteristic_local(&quad.predicate) else {
            continue;
        };
        match (&mut constraint, local) {
            (ConstraintKind::Length { min, .. }, "minValue") => *min = base::unsigned(object),
            (ConstraintKind::Length { max, .. }, "maxValue") => *max = base::unsigned(object),
            (ConstraintKind::Range { min, .. }, "minValue") => {
                *min = object.as_literal().map(ScalarValue::from_literal);
            }
            (ConstraintKind::Range { max, .. }, "maxValue") => {
                *max = object.as_literal().map(ScalarValue::from_literal);
            }
            (ConstraintKind::Range { lower_bound, .. }, "lowerBoundDefinition") => {
                *lower_bound = bound(ctx, object);
            }
            (ConstraintKind::Range { upper_bound, .. }, "upperBoundDefinition") => {
                *upper_bound = bound(ctx, object);
            }
            (ConstraintKind::Language { language_code }, "languageCode") => {
                *language_code = base::text(object).unwrap_or_default();
            }
            (ConstraintKind::Locale { locale_code }, "localeCode") => {
                *locale_code = base::text(object).unwrap_or_default();
            }
            (ConstraintKind::FixedPoint { scale, .. }, "scale") => {
                *scale = base::unsigned(object).unwrap_or_default();
            }
            (ConstraintKind::FixedPoint { integer, .. }, "integer") => {
                *integer = base::unsigned(object).unwrap_or_default();
            }
            _ => {}
        }
    }
    ctx.finish(id, ElementKind::Constraint(constraint));
    Some(id)
}

fn bound(ctx: &LoadContext<'_>, object: &Term) -> BoundDefinition {
    object
        .as_iri()
        .and_then(|iri| ctx.samm.characteristic_local(iri))
        .and_then(BoundDefinition::from_local_name)
        .unwrap_or_default()
}
