//! Serializers from the element graph back to RDF.
//!
//! [`serialize_aspect`] and [`serialize_graph`] produce a [`TripleStore`](crate::store::TripleStore)
//! that [`turtle::to_turtle`] or [`ntriples::to_ntriples`] render as text.

pub mod ntriples;
pub mod turtle;

mod prefixes;
mod rdf;
mod trigger;

pub use prefixes::PrefixTable;
pub use rdf::{serialize_aspect, serialize_graph, RdfSerializer};
pub use trigger::SerializeTrigger;
