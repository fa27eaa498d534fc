//! SAMM vocabulary: versioned namespace IRIs and predicate tests.
//!
//! Every IRI the loader and serializer compare against comes from here. The
//! meta-model, characteristic, entity and unit namespaces are versioned; the
//! W3C namespaces are fixed.

use std::fmt;

use crate::error::ModelError;

/// Standard W3C IRI constants.
pub mod iris {
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:first`.
    pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    /// `rdf:rest`.
    pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    /// `rdf:nil`.
    pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    /// `rdf:langString`.
    pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:boolean`.
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `xsd:integer`.
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:decimal`.
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:double`.
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    /// `xsd:float`.
    pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    /// `xsd:dateTime`.
    pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    /// `xsd:anyURI`.
    pub const XSD_ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
    /// `xsd:nonNegativeInteger`.
    pub const XSD_NON_NEGATIVE_INTEGER: &str =
        "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    /// `xsd:positiveInteger`.
    pub const XSD_POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";
}

/// Local names of the XSD datatypes whose literals convert to numbers.
const NUMERIC_XSD_TYPES: &[&str] = &[
    "decimal",
    "integer",
    "double",
    "float",
    "byte",
    "short",
    "int",
    "long",
    "unsignedByte",
    "unsignedShort",
    "unsignedInt",
    "unsignedLong",
    "positiveInteger",
    "nonPositiveInteger",
    "negativeInteger",
    "nonNegativeInteger",
];

/// Returns true if literals of `datatype` carry a numeric value.
#[must_use]
pub fn is_numeric_datatype(datatype: &str) -> bool {
    datatype
        .strip_prefix(iris::XSD)
        .is_some_and(|local| NUMERIC_XSD_TYPES.contains(&local))
}

/// Supported SAMM vocabulary versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SammVersion {
    /// SAMM 2.0.0.
    V2_0_0,
    /// SAMM 2.1.0.
    V2_1_0,
}

impl SammVersion {
    /// All versions, oldest first.
    pub const ALL: [SammVersion; 2] = [SammVersion::V2_0_0, SammVersion::V2_1_0];

    /// Parses a version string.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnsupportedVersion`] carrying `version` when it is
    /// not one of [`SammVersion::ALL`].
    pub fn parse(version: &str) -> Result<Self, ModelError> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == version.trim())
            .ok_or_else(|| ModelError::UnsupportedVersion {
                version: version.to_owned(),
            })
    }

    /// The dotted version string used inside vocabulary URNs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SammVersion::V2_0_0 => "2.0.0",
            SammVersion::V2_1_0 => "2.1.0",
        }
    }
}

impl Default for SammVersion {
    fn default() -> Self {
        SammVersion::V2_1_0
    }
}

impl fmt::Display for SammVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predefined characteristic of the characteristic namespace and the data
/// type it fixes.
#[derive(Debug, Clone, Copy)]
pub struct PredefinedCharacteristic {
    /// Local name within the characteristic namespace (e.g. `Text`).
    pub local: &'static str,
    /// Full IRI of its data type. `None` means the meta-model `curie` type.
    pub data_type: Option<&'static str>,
}

/// The characteristic namespace's predefined instances.
pub const PREDEFINED_CHARACTERISTICS: &[PredefinedCharacteristic] = &[
    PredefinedCharacteristic {
        local: "Text",
        data_type: Some(iris::XSD_STRING),
    },
    PredefinedCharacteristic {
        local: "Boolean",
        data_type: Some(iris::XSD_BOOLEAN),
    },
    PredefinedCharacteristic {
        local: "Timestamp",
        data_type: Some(iris::XSD_DATETIME),
    },
    PredefinedCharacteristic {
        local: "MultiLanguageText",
        data_type: Some(iris::RDF_LANG_STRING),
    },
    PredefinedCharacteristic {
        local: "ResourcePath",
        data_type: Some(iris::XSD_ANY_URI),
    },
    PredefinedCharacteristic {
        local: "MimeType",
        data_type: Some(iris::XSD_STRING),
    },
    PredefinedCharacteristic {
        local: "UnitReference",
        data_type: None,
    },
    PredefinedCharacteristic {
        local: "Locale",
        data_type: Some(iris::XSD_STRING),
    },
    PredefinedCharacteristic {
        local: "Language",
        data_type: Some(iris::XSD_STRING),
    },
];

/// Vocabulary IRIs for one SAMM version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Samm {
    version: SammVersion,
    meta: String,
    characteristic: String,
    entity: String,
    unit: String,
}

impl Samm {
    /// Builds the vocabulary for `version`.
    #[must_use]
    pub fn new(version: SammVersion) -> Self {
        let v = version.as_str();
        Self {
            version,
            meta: format!("urn:samm:org.eclipse.esmf.samm:meta-model:{v}#"),
            characteristic: format!("urn:samm:org.eclipse.esmf.samm:characteristic:{v}#"),
            entity: format!("urn:samm:org.eclipse.esmf.samm:entity:{v}#"),
            unit: format!("urn:samm:org.eclipse.esmf.samm:unit:{v}#"),
        }
    }

    /// The version this vocabulary was built for.
    #[must_use]
    pub fn version(&self) -> SammVersion {
        self.version
    }

    /// Meta-model namespace IRI (`samm:`).
    #[must_use]
    pub fn meta_ns(&self) -> &str {
        &self.meta
    }

    /// Characteristic namespace IRI (`samm-c:`).
    #[must_use]
    pub fn characteristic_ns(&self) -> &str {
        &self.characteristic
    }

    /// Entity namespace IRI (`samm-e:`).
    #[must_use]
    pub fn entity_ns(&self) -> &str {
        &self.entity
    }

    /// Unit namespace IRI (`unit:`).
    #[must_use]
    pub fn unit_ns(&self) -> &str {
        &self.unit
    }

    /// Full IRI of a meta-model term.
    #[must_use]
    pub fn meta(&self, local: &str) -> String {
        format!("{}{local}", self.meta)
    }

    /// Full IRI of a characteristic-namespace term.
    #[must_use]
    pub fn characteristic(&self, local: &str) -> String {
        format!("{}{local}", self.characteristic)
    }

    /// Full IRI of an entity-namespace term.
    #[must_use]
    pub fn entity(&self, local: &str) -> String {
        format!("{}{local}", self.entity)
    }

    /// Full IRI of a unit-namespace term.
    #[must_use]
    pub fn unit(&self, local: &str) -> String {
        format!("{}{local}", self.unit)
    }

    /// Tests `iri` against a meta-model term without allocating.
    #[must_use]
    pub fn is_meta(&self, iri: &str, local: &str) -> bool {
        iri.strip_prefix(self.meta.as_str()) == Some(local)
    }

    /// Tests `iri` against a characteristic-namespace term without allocating.
    #[must_use]
    pub fn is_characteristic(&self, iri: &str, local: &str) -> bool {
        iri.strip_prefix(self.characteristic.as_str()) == Some(local)
    }

    /// Local name of `iri` if it lies in the characteristic namespace.
    #[must_use]
    pub fn characteristic_local<'a>(&self, iri: &'a str) -> Option<&'a str> {
        iri.strip_prefix(self.characteristic.as_str())
    }

    /// Local name of `iri` if it lies in the meta-model namespace.
    #[must_use]
    pub fn meta_local<'a>(&self, iri: &'a str) -> Option<&'a str> {
        iri.strip_prefix(self.meta.as_str())
    }

    /// Returns true if `iri` lies in the unit namespace.
    #[must_use]
    pub fn is_unit_catalogue(&self, iri: &str) -> bool {
        iri.starts_with(self.unit.as_str())
    }

    /// Returns true if `iri` lies in the entity namespace.
    #[must_use]
    pub fn is_entity_catalogue(&self, iri: &str) -> bool {
        iri.starts_with(self.entity.as_str())
    }

    /// Returns true if `iri` names a scalar data type: any XSD type,
    /// `rdf:langString`, or the meta-model `curie` type.
    #[must_use]
    pub fn is_scalar_type(&self, iri: &str) -> bool {
        iri.starts_with(iris::XSD) || iri == iris::RDF_LANG_STRING || self.is_meta(iri, "curie")
    }

    /// Looks up a predefined characteristic by IRI.
    #[must_use]
    pub fn predefined_characteristic(&self, iri: &str) -> Option<PredefinedCharacteristic> {
        let local = self.characteristic_local(iri)?;
        PREDEFINED_CHARACTERISTICS
            .iter()
            .find(|p| p.local == local)
            .copied()
    }

    /// `samm:dataType`.
    #[must_use]
    pub fn is_data_type(&self, iri: &str) -> bool {
        self.is_meta(iri, "dataType")
    }

    /// `samm:characteristic`.
    #[must_use]
    pub fn is_characteristic_pred(&self, iri: &str) -> bool {
        self.is_meta(iri, "characteristic")
    }

    /// `samm:properties`.
    #[must_use]
    pub fn is_properties(&self, iri: &str) -> bool {
        self.is_meta(iri, "properties")
    }

    /// `samm:property`, the payload-override back-reference.
    #[must_use]
    pub fn is_property_ref(&self, iri: &str) -> bool {
        self.is_meta(iri, "property")
    }

    /// `samm:extends`.
    #[must_use]
    pub fn is_extends(&self, iri: &str) -> bool {
        self.is_meta(iri, "extends")
    }

    /// `samm:preferredName`.
    #[must_use]
    pub fn is_preferred_name(&self, iri: &str) -> bool {
        self.is_meta(iri, "preferredName")
    }

    /// `samm:description`.
    #[must_use]
    pub fn is_description(&self, iri: &str) -> bool {
        self.is_meta(iri, "description")
    }

    /// `samm:see`.
    #[must_use]
    pub fn is_see(&self, iri: &str) -> bool {
        self.is_meta(iri, "see")
    }
}

impl Default for Samm {
    fn default() -> Self {
        Self::new(SammVersion::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_versions() {
        assert_eq!(SammVersion::parse("2.1.0").ok(), Some(SammVersion::V2_1_0));
        assert_eq!(SammVersion::parse(" 2.0.0 ").ok(), Some(SammVersion::V2_0_0));
    }

    #[test]
    fn rejects_unknown_version_with_its_string() {
        match SammVersion::parse("1.0.0") {
            Err(ModelError::UnsupportedVersion { version }) => assert_eq!(version, "1.0.0"),
            other => unreachable!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn predicate_tests_do_not_cross_namespaces() {
        let samm = Samm::new(SammVersion::V2_1_0);
        let dt = "urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#dataType";
        assert!(samm.is_data_type(dt));
        assert!(!samm.is_data_type("urn:samm:org.eclipse.esmf.samm:meta-model:2.0.0#dataType"));
        assert!(!samm.is_characteristic(dt, "dataType"));
    }

    #[test]
    fn numeric_datatypes() {
        assert!(is_numeric_datatype(iris::XSD_INTEGER));
        assert!(is_numeric_datatype("http://www.w3.org/2001/XMLSchema#unsignedLong"));
        assert!(!is_numeric_datatype(iris::XSD_STRING));
        assert!(!is_numeric_datatype(iris::RDF_LANG_STRING));
    }

    #[test]
    fn predefined_lookup() {
        let samm = Samm::default();
        let text = samm.predefined_characteristic(&samm.characteristic("Text"));
        assert_eq!(text.and_then(|p| p.data_type), Some(iris::XSD_STRING));
        assert!(samm
            .predefined_characteristic(&samm.characteristic("Enumeration"))
            .is_none());
    }
}
