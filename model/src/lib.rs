//! SAMM aspect models as a typed, cross-referenced element graph.
//!
//! The `samm-model` crate turns the RDF statements of an aspect model into a
//! [`ModelGraph`]: an arena of aspects, properties, characteristics,
//! constraints, entities, units and values that reference each other by
//! [`ElementId`]. Every element is registered under its URN in an instance
//! cache, so shared and cyclic references resolve to one element. The
//! [`serializer`] writes a graph back to RDF that loads into an equivalent
//! graph.
//!
//! # Entry Point
//!
//! ```
//! # #[cfg(feature = "turtle")] {
//! use samm_model::{load_aspect, LoaderConfig, TripleStore};
//!
//! let ttl = r#"
//! @prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#> .
//! @prefix samm-c: <urn:samm:org.eclipse.esmf.samm:characteristic:2.1.0#> .
//! @prefix : <urn:samm:org.example:1.0.0#> .
//!
//! :Movement a samm:Aspect ;
//!   samm:properties ( :speed ) ;
//!   samm:operations ( ) .
//!
//! :speed a samm:Property ;
//!   samm:characteristic samm-c:Text .
//! "#;
//! let store = TripleStore::from_turtle(ttl)?;
//! let model = load_aspect(&store, &LoaderConfig::default(), None)?;
//! assert_eq!(model.graph.urn(model.aspect), "urn:samm:org.example:1.0.0#Movement");
//! # }
//! # Ok::<(), samm_model::ModelError>(())
//! ```
//!
//! # Serialization
//!
//! ```
//! # #[cfg(feature = "turtle")] {
//! # use samm_model::{load_aspect, LoaderConfig, TripleStore};
//! # let ttl = "@prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#> .
//! #   <urn:samm:org.example:1.0.0#A> a samm:Aspect ; samm:properties () ; samm:operations () .";
//! # let store = TripleStore::from_turtle(ttl)?;
//! # let model = load_aspect(&store, &LoaderConfig::default(), None)?;
//! let triples = samm_model::serializer::serialize_aspect(&model.graph, model.aspect, &LoaderConfig::default())?;
//! let turtle = samm_model::serializer::turtle::to_turtle(&triples);
//! assert!(turtle.contains(":A\n  a samm:Aspect ;"));
//! # }
//! # Ok::<(), samm_model::ModelError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod loader;
pub mod serializer;
pub mod store;
#[cfg(feature = "turtle")]
mod turtle_reader;
pub mod vocab;

pub use cache::{InstanceCache, Registration};
pub use config::LoaderConfig;
pub use error::ModelError;
pub use graph::{Diagnostic, Element, ElementId, ElementKind, ElementMeta, ModelGraph};
pub use loader::{load_aspect, load_namespaces, LoadedModel, NamespaceIndex};
pub use store::{Literal, Quad, Term, TripleStore};
pub use vocab::{Samm, SammVersion};
