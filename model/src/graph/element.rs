//! Element kinds of the aspect model graph.
//!
//! Cross references are [`ElementId`]s into the owning
//! [`ModelGraph`](super::ModelGraph); no element owns another.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

use super::value::{ScalarValue, Value};

/// Stable index of an element inside its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32);

impl ElementId {
    /// The raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Attributes every named element carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementMeta {
    /// Identity key. Two elements with the same URN are the same element.
    pub urn: String,
    /// Local name.
    pub name: String,
    /// `samm:preferredName` by language tag.
    pub preferred_names: BTreeMap<String, String>,
    /// `samm:description` by language tag.
    pub descriptions: BTreeMap<String, String>,
    /// `samm:see` links.
    pub see: Vec<String>,
    /// Built from a blank node; emitted inline on serialization.
    pub anonymous: bool,
    /// The name was generated rather than read from the source.
    pub synthetic_name: bool,
    /// Owned by the vocabulary (XSD types, predefined characteristics,
    /// catalogue units); referenced but never defined in a model document.
    pub predefined: bool,
    /// Elements that reference this one.
    pub parents: BTreeSet<ElementId>,
}

impl ElementMeta {
    /// Meta for a named element.
    pub fn named(urn: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            urn: urn.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Namespace part of the URN (everything before `#`), if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.urn.split_once('#').map(|(ns, _)| ns)
    }
}

/// Payload metadata of one property reference inside a structure element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadOverride {
    /// `samm:optional`.
    pub optional: bool,
    /// `samm:notInPayload`.
    pub not_in_payload: bool,
    /// `samm:payloadName`.
    pub payload_name: Option<String>,
}

impl PayloadOverride {
    /// Returns true when nothing differs from a plain property reference.
    #[must_use]
    pub fn is_default(&self) -> bool {
        !self.optional && !self.not_in_payload && self.payload_name.is_none()
    }
}

/// Ordered properties plus per-reference payload overrides, shared by
/// aspects, entities and events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    /// Properties in declaration order.
    pub properties: Vec<ElementId>,
    /// Overrides keyed by property URN. Default entries are not stored.
    pub payload: BTreeMap<String, PayloadOverride>,
}

impl Structure {
    /// Payload override recorded for `property_urn`, if any.
    #[must_use]
    pub fn payload_of(&self, property_urn: &str) -> Option<&PayloadOverride> {
        self.payload.get(property_urn)
    }

    /// Records an override; default overrides remove the entry.
    pub fn set_payload(&mut self, property_urn: impl Into<String>, payload: PayloadOverride) {
        let key = property_urn.into();
        if payload.is_default() {
            self.payload.remove(&key);
        } else {
            self.payload.insert(key, payload);
        }
    }
}

/// `samm:Aspect`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aspect {
    /// Properties and payload overrides.
    pub structure: Structure,
    /// `samm:operations`.
    pub operations: Vec<ElementId>,
    /// `samm:events`.
    pub events: Vec<ElementId>,
}

/// `samm:Property` or `samm:AbstractProperty`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    /// `samm:characteristic`.
    pub characteristic: Option<ElementId>,
    /// `samm:exampleValue`.
    pub example_value: Option<ScalarValue>,
    /// Typed `samm:AbstractProperty`.
    pub is_abstract: bool,
    /// `samm:extends`, pointing at an abstract property.
    pub extends: Option<ElementId>,
}

/// `samm:Operation`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operation {
    /// `samm:input` properties in order.
    pub input: Vec<ElementId>,
    /// `samm:output` property.
    pub output: Option<ElementId>,
}

/// `samm:Event`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    /// `samm:parameters` and their payload overrides.
    pub structure: Structure,
}

/// `samm:Entity` or `samm:AbstractEntity`; the complex type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    /// Own properties (inherited ones are reached through `extends`).
    pub structure: Structure,
    /// Parent complex type.
    pub extends: Option<ElementId>,
    /// Typed `samm:AbstractEntity`.
    pub is_abstract: bool,
    /// Entities whose `extends` points here.
    pub extending_elements: Vec<ElementId>,
}

/// Scalar data type; the URN is the datatype IRI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scalar;

/// Which collection characteristic a [`CharacteristicKind::Collection`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// `samm-c:Collection`.
    Collection,
    /// `samm-c:List`.
    List,
    /// `samm-c:Set`.
    Set,
    /// `samm-c:SortedSet`.
    SortedSet,
    /// `samm-c:TimeSeries`.
    TimeSeries,
}

impl CollectionKind {
    /// Local name in the characteristic namespace.
    #[must_use]
    pub fn local_name(self) -> &'static str {
        match self {
            CollectionKind::Collection => "Collection",
            CollectionKind::List => "List",
            CollectionKind::Set => "Set",
            CollectionKind::SortedSet => "SortedSet",
            CollectionKind::TimeSeries => "TimeSeries",
        }
    }

    /// Whether equal elements may repeat.
    #[must_use]
    pub fn allow_duplicates(self) -> bool {
        matches!(self, CollectionKind::Collection | CollectionKind::List)
    }

    /// Whether element order is significant.
    #[must_use]
    pub fn ordered(self) -> bool {
        !matches!(self, CollectionKind::Collection | CollectionKind::Set)
    }
}

/// Unit-bearing characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityKindOf {
    /// `samm-c:Quantifiable`.
    Quantifiable,
    /// `samm-c:Measurement`.
    Measurement,
    /// `samm-c:Duration`.
    Duration,
}

impl QuantityKindOf {
    /// Local name in the characteristic namespace.
    #[must_use]
    pub fn local_name(self) -> &'static str {
        match self {
            QuantityKindOf::Quantifiable => "Quantifiable",
            QuantityKindOf::Measurement => "Measurement",
            QuantityKindOf::Duration => "Duration",
        }
    }
}

/// One entry of a structured value's `samm-c:elements` list.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredElement {
    /// A literal separator.
    Text(String),
    /// A property capturing one group of the deconstruction rule.
    Property(ElementId),
}

/// Kind-specific characteristic fields.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacteristicKind {
    /// `samm:Characteristic`, including predefined ones like `samm-c:Text`.
    Plain,
    /// `samm-c:Trait`.
    Trait {
        /// `samm-c:baseCharacteristic`.
        base: Option<ElementId>,
        /// `samm-c:constraint`, in source order.
        constraints: Vec<ElementId>,
    },
    /// `samm-c:Quantifiable`, `samm-c:Measurement` or `samm-c:Duration`.
    Quantity {
        /// Which of the three.
        kind: QuantityKindOf,
        /// `samm-c:unit`.
        unit: Option<ElementId>,
    },
    /// `samm-c:Enumeration`.
    Enumeration {
        /// `samm-c:values`, in list order.
        values: Vec<Value>,
    },
    /// `samm-c:State`.
    State {
        /// `samm-c:values`, in list order.
        values: Vec<Value>,
        /// `samm-c:defaultValue`.
        default_value: Option<Value>,
    },
    /// The collection family.
    Collection {
        /// Which collection.
        kind: CollectionKind,
        /// `samm-c:elementCharacteristic`.
        element_characteristic: Option<ElementId>,
    },
    /// `samm-c:Code`.
    Code,
    /// `samm-c:Either`.
    Either {
        /// `samm-c:left`.
        left: Option<ElementId>,
        /// `samm-c:right`.
        right: Option<ElementId>,
    },
    /// `samm-c:SingleEntity`.
    SingleEntity,
    /// `samm-c:StructuredValue`.
    StructuredValue {
        /// `samm-c:deconstructionRule`.
        deconstruction_rule: String,
        /// `samm-c:elements`.
        elements: Vec<StructuredElement>,
    },
}

impl CharacteristicKind {
    /// Local RDF type name: `Characteristic` lives in the meta-model, every
    /// other kind in the characteristic namespace.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            CharacteristicKind::Plain => "Characteristic",
            CharacteristicKind::Trait { .. } => "Trait",
            CharacteristicKind::Quantity { kind, .. } => kind.local_name(),
            CharacteristicKind::Enumeration { .. } => "Enumeration",
            CharacteristicKind::State { .. } => "State",
            CharacteristicKind::Collection { kind, .. } => kind.local_name(),
            CharacteristicKind::Code => "Code",
            CharacteristicKind::Either { .. } => "Either",
            CharacteristicKind::SingleEntity => "SingleEntity",
            CharacteristicKind::StructuredValue { .. } => "StructuredValue",
        }
    }

    /// Enumeration and state values, empty for every other kind.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        match self {
            CharacteristicKind::Enumeration { values } | CharacteristicKind::State { values, .. } => {
                values
            }
            _ => &[],
        }
    }
}

/// A characteristic: an optional data type plus kind-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Characteristic {
    /// `samm:dataType`: a scalar or an entity.
    pub data_type: Option<ElementId>,
    /// Kind-specific fields.
    pub kind: CharacteristicKind,
}

impl Characteristic {
    /// A characteristic of `kind` with no data type yet.
    #[must_use]
    pub fn new(kind: CharacteristicKind) -> Self {
        Self {
            data_type: None,
            kind,
        }
    }
}

/// `samm-c:RangeConstraint` bound semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BoundDefinition {
    /// No bound.
    #[default]
    Open,
    /// `AT_LEAST`.
    AtLeast,
    /// `GREATER_THAN`.
    GreaterThan,
    /// `AT_MOST`.
    AtMost,
    /// `LESS_THAN`.
    LessThan,
}

impl BoundDefinition {
    /// The vocabulary individual name, `None` for [`BoundDefinition::Open`].
    #[must_use]
    pub fn local_name(self) -> Option<&'static str> {
        match self {
            BoundDefinition::Open => None,
            BoundDefinition::AtLeast => Some("AT_LEAST"),
            BoundDefinition::GreaterThan => Some("GREATER_THAN"),
            BoundDefinition::AtMost => Some("AT_MOST"),
            BoundDefinition::LessThan => Some("LESS_THAN"),
        }
    }

    /// Parses a vocabulary individual name.
    #[must_use]
    pub fn from_local_name(local: &str) -> Option<Self> {
        match local {
            "AT_LEAST" => Some(BoundDefinition::AtLeast),
            "GREATER_THAN" => Some(BoundDefinition::GreaterThan),
            "AT_MOST" => Some(BoundDefinition::AtMost),
            "LESS_THAN" => Some(BoundDefinition::LessThan),
            _ => None,
        }
    }
}

/// Kind-specific constraint fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    /// `samm:Constraint`.
    Plain,
    /// `samm-c:LengthConstraint`.
    Length {
        /// `samm-c:minValue`.
        min: Option<u64>,
        /// `samm-c:maxValue`.
        max: Option<u64>,
    },
    /// `samm-c:RangeConstraint`.
    Range {
        /// `samm-c:minValue`.
        min: Option<ScalarValue>,
        /// `samm-c:maxValue`.
        max: Option<ScalarValue>,
        /// `samm-c:lowerBoundDefinition`.
        lower_bound: BoundDefinition,
        /// `samm-c:upperBoundDefinition`.
        upper_bound: BoundDefinition,
    },
    /// `samm-c:EncodingConstraint`.
    Encoding {
        /// `samm:value`, an encoding individual IRI.
        value: String,
    },
    /// `samm-c:LanguageConstraint`.
    Language {
        /// `samm-c:languageCode`.
        language_code: String,
    },
    /// `samm-c:LocaleConstraint`.
    Locale {
        /// `samm-c:localeCode`.
        locale_code: String,
    },
    /// `samm-c:RegularExpressionConstraint`.
    RegularExpression {
        /// `samm:value`.
        pattern: String,
    },
    /// `samm-c:FixedPointConstraint`.
    FixedPoint {
        /// `samm-c:scale`.
        scale: u64,
        /// `samm-c:integer`.
        integer: u64,
    },
}

impl ConstraintKind {
    /// Local RDF type name; `Constraint` lives in the meta-model.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            ConstraintKind::Plain => "Constraint",
            ConstraintKind::Length { .. } => "LengthConstraint",
            ConstraintKind::Range { .. } => "RangeConstraint",
            ConstraintKind::Encoding { .. } => "EncodingConstraint",
            ConstraintKind::Language { .. } => "LanguageConstraint",
            ConstraintKind::Locale { .. } => "LocaleConstraint",
            ConstraintKind::RegularExpression { .. } => "RegularExpressionConstraint",
            ConstraintKind::FixedPoint { .. } => "FixedPointConstraint",
        }
    }
}

/// `samm:Unit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unit {
    /// `samm:symbol`.
    pub symbol: Option<String>,
    /// `samm:commonCode`.
    pub code: Option<String>,
    /// `samm:conversionFactor`.
    pub conversion_factor: Option<String>,
    /// `samm:numericConversionFactor`.
    pub numeric_conversion_factor: Option<String>,
    /// `samm:referenceUnit`.
    pub reference_unit: Option<ElementId>,
    /// `samm:quantityKind`.
    pub quantity_kinds: Vec<ElementId>,
}

/// `samm:QuantityKind`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantityKind {
    /// `rdfs:label`.
    pub label: Option<String>,
}

/// A concrete instance of an entity with its property assertions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityInstance {
    /// The entity this instance is typed with.
    pub entity: Option<ElementId>,
    /// Values keyed by property URN, in source order. One property may carry
    /// several values (e.g. one per language).
    pub assertions: IndexMap<String, Vec<Value>>,
}

impl EntityInstance {
    /// Values asserted for `property_urn`; empty if none.
    #[must_use]
    pub fn assertion(&self, property_urn: &str) -> &[Value] {
        self.assertions
            .get(property_urn)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Appends a value for `property_urn`.
    pub fn push_assertion(&mut self, property_urn: impl Into<String>, value: Value) {
        self.assertions
            .entry(property_urn.into())
            .or_default()
            .push(value);
    }
}

/// Kind-specific part of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// `samm:Aspect`.
    Aspect(Aspect),
    /// `samm:Property` / `samm:AbstractProperty`.
    Property(Property),
    /// `samm:Operation`.
    Operation(Operation),
    /// `samm:Event`.
    Event(Event),
    /// `samm:Entity` / `samm:AbstractEntity`.
    Entity(Entity),
    /// Any characteristic kind.
    Characteristic(Characteristic),
    /// Any constraint kind.
    Constraint(ConstraintKind),
    /// `samm:Unit`.
    Unit(Unit),
    /// `samm:QuantityKind`.
    QuantityKind(QuantityKind),
    /// An XSD or vocabulary scalar type.
    Scalar(Scalar),
    /// An entity instance used as an enumeration or state value.
    EntityInstance(EntityInstance),
}

impl ElementKind {
    /// Short kind label used in logs and structural signatures.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ElementKind::Aspect(_) => "Aspect",
            ElementKind::Property(_) => "Property",
            ElementKind::Operation(_) => "Operation",
            ElementKind::Event(_) => "Event",
            ElementKind::Entity(_) => "Entity",
            ElementKind::Characteristic(c) => c.kind.type_name(),
            ElementKind::Constraint(c) => c.type_name(),
            ElementKind::Unit(_) => "Unit",
            ElementKind::QuantityKind(_) => "QuantityKind",
            ElementKind::Scalar(_) => "Scalar",
            ElementKind::EntityInstance(_) => "EntityInstance",
        }
    }

    /// The structure of aspects, entities and events.
    #[must_use]
    pub fn structure(&self) -> Option<&Structure> {
        match self {
            ElementKind::Aspect(a) => Some(&a.structure),
            ElementKind::Entity(e) => Some(&e.structure),
            ElementKind::Event(e) => Some(&e.structure),
            _ => None,
        }
    }

    /// Mutable access to the structure of aspects, entities and events.
    pub fn structure_mut(&mut self) -> Option<&mut Structure> {
        match self {
            ElementKind::Aspect(a) => Some(&mut a.structure),
            ElementKind::Entity(e) => Some(&mut e.structure),
            ElementKind::Event(e) => Some(&mut e.structure),
            _ => None,
        }
    }
}

/// One node of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Named-element attributes.
    pub meta: ElementMeta,
    /// Kind-specific fields.
    pub kind: ElementKind,
}

impl Element {
    /// Pairs `meta` with `kind`.
    #[must_use]
    pub fn new(meta: ElementMeta, kind: ElementKind) -> Self {
        Self { meta, kind }
    }

    /// The element's URN.
    #[must_use]
    pub fn urn(&self) -> &str {
        &self.meta.urn
    }

    /// The element's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// The characteristic fields, if this is a characteristic.
    #[must_use]
    pub fn as_characteristic(&self) -> Option<&Characteristic> {
        match &self.kind {
            ElementKind::Characteristic(c) => Some(c),
            _ => None,
        }
    }

    /// The property fields, if this is a property.
    #[must_use]
    pub fn as_property(&self) -> Option<&Property> {
        match &self.kind {
            ElementKind::Property(p) => Some(p),
            _ => None,
        }
    }

    /// The entity fields, if this is an entity.
    #[must_use]
    pub fn as_entity(&self) -> Option<&Entity> {
        match &self.kind {
            ElementKind::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// The aspect fields, if this is an aspect.
    #[must_use]
    pub fn as_aspect(&self) -> Option<&Aspect> {
        match &self.kind {
            ElementKind::Aspect(a) => Some(a),
            _ => None,
        }
    }

    /// The instance fields, if this is an entity instance.
    #[must_use]
    pub fn as_instance(&self) -> Option<&EntityInstance> {
        match &self.kind {
            ElementKind::EntityInstance(i) => Some(i),
            _ => None,
        }
    }

    /// The constraint fields, if this is a constraint.
    #[must_use]
    pub fn as_constraint(&self) -> Option<&ConstraintKind> {
        match &self.kind {
            ElementKind::Constraint(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_flags() {
        assert!(CollectionKind::List.allow_duplicates() && CollectionKind::List.ordered());
        assert!(!CollectionKind::Set.allow_duplicates() && !CollectionKind::Set.ordered());
        assert!(!CollectionKind::SortedSet.allow_duplicates() && CollectionKind::SortedSet.ordered());
        assert!(CollectionKind::Collection.allow_duplicates() && !CollectionKind::Collection.ordered());
        assert!(CollectionKind::TimeSeries.ordered());
    }

    #[test]
    fn default_payload_entries_are_dropped() {
        let mut s = Structure::default();
        s.set_payload(
            "urn:x#p",
            PayloadOverride {
                optional: true,
                ..PayloadOverride::default()
            },
        );
        assert!(s.payload_of("urn:x#p").is_some());
        s.set_payload("urn:x#p", PayloadOverride::default());
        assert!(s.payload_of("urn:x#p").is_none());
    }

    #[test]
    fn bound_definitions_round_trip_names() {
        for b in [
            BoundDefinition::AtLeast,
            BoundDefinition::GreaterThan,
            BoundDefinition::AtMost,
            BoundDefinition::LessThan,
        ] {
            let name = b.local_name().unwrap_or_default();
            assert_eq!(BoundDefinition::from_local_name(name), Some(b));
        }
        assert_eq!(BoundDefinition::Open.local_name(), None);
    }

    #[test]
    fn namespace_is_urn_prefix() {
        let meta = ElementMeta::named("urn:samm:org.example:1.0.0#Movement", "Movement");
        assert_eq!(meta.namespace(), Some("urn:samm:org.example:1.0.0"));
        assert_eq!(ElementMeta::named("nohash", "x").namespace(), None);
    }
}
