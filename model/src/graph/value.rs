//! Enumeration, state and example values.

use std::fmt;

use super::element::ElementId;
use crate::store::Literal;
use crate::vocab::{self, iris};

/// Parsed content of a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A numeric XSD literal.
    Number(f64),
    /// Every other datatype, including `rdf:langString`.
    Text(String),
}

impl LiteralValue {
    /// The number, if numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LiteralValue::Number(n) => Some(*n),
            LiteralValue::Text(_) => None,
        }
    }

    /// The text, if not numeric.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LiteralValue::Text(s) => Some(s),
            LiteralValue::Number(_) => None,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::Text(s) => f.write_str(s),
        }
    }
}

/// A typed literal value. The lexical form is kept so serialization writes
/// back exactly what was read.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarValue {
    /// Converted value.
    pub value: LiteralValue,
    /// Lexical form.
    pub lexical: String,
    /// Datatype IRI.
    pub datatype: String,
    /// Language tag of `rdf:langString` values.
    pub language: Option<String>,
}

impl ScalarValue {
    /// Converts a literal: numeric XSD datatypes become
    /// [`LiteralValue::Number`] when the lexical form parses, everything else
    /// stays text.
    #[must_use]
    pub fn from_literal(literal: &Literal) -> Self {
        let value = if vocab::is_numeric_datatype(&literal.datatype) {
            literal
                .lexical
                .trim()
                .parse::<f64>()
                .map_or_else(|_| LiteralValue::Text(literal.lexical.clone()), LiteralValue::Number)
        } else {
            LiteralValue::Text(literal.lexical.clone())
        };
        Self {
            value,
            lexical: literal.lexical.clone(),
            datatype: literal.datatype.clone(),
            language: literal.language.clone(),
        }
    }

    /// A plain `xsd:string` value.
    pub fn string(text: impl Into<String>) -> Self {
        Self::from_literal(&Literal::string(text))
    }

    /// A language-tagged string value.
    pub fn lang(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self::from_literal(&Literal::lang(text, language))
    }

    /// An `xsd:integer` value.
    #[must_use]
    pub fn integer(n: i64) -> Self {
        Self::from_literal(&Literal::typed(n.to_string(), iris::XSD_INTEGER))
    }

    /// Back to an RDF literal.
    #[must_use]
    pub fn to_literal(&self) -> Literal {
        Literal {
            lexical: self.lexical.clone(),
            datatype: self.datatype.clone(),
            language: self.language.clone(),
        }
    }
}

/// One enumeration / state value or one entity-instance assertion value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A literal.
    Scalar(ScalarValue),
    /// A reference to an [`EntityInstance`](super::EntityInstance) element.
    Instance(ElementId),
}

impl Value {
    /// The scalar, if this is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Instance(_) => None,
        }
    }

    /// The instance id, if this is one.
    #[must_use]
    pub fn as_instance(&self) -> Option<ElementId> {
        match self {
            Value::Instance(id) => Some(*id),
            Value::Scalar(_) => None,
        }
    }

    /// Language tag of a language-tagged scalar.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.as_scalar().and_then(|s| s.language.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_become_numbers() {
        let v = ScalarValue::from_literal(&Literal::typed("42", iris::XSD_INTEGER));
        assert_eq!(v.value.as_number(), Some(42.0));
        assert_eq!(v.lexical, "42");
    }

    #[test]
    fn unsigned_and_float_variants_are_numeric() {
        let v = ScalarValue::from_literal(&Literal::typed(
            "7",
            "http://www.w3.org/2001/XMLSchema#unsignedShort",
        ));
        assert_eq!(v.value.as_number(), Some(7.0));
        let v = ScalarValue::from_literal(&Literal::typed("2.5", iris::XSD_FLOAT));
        assert_eq!(v.value.as_number(), Some(2.5));
    }

    #[test]
    fn strings_and_lang_strings_stay_text() {
        let v = ScalarValue::from_literal(&Literal::typed("42", iris::XSD_STRING));
        assert_eq!(v.value.as_text(), Some("42"));
        let v = ScalarValue::lang("Hallo", "de");
        assert_eq!(v.value.as_text(), Some("Hallo"));
        assert_eq!(Value::Scalar(v).language(), Some("de"));
    }

    #[test]
    fn malformed_numeric_lexical_falls_back_to_text() {
        let v = ScalarValue::from_literal(&Literal::typed("abc", iris::XSD_INTEGER));
        assert_eq!(v.value.as_text(), Some("abc"));
    }
}
