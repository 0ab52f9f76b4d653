//! Vocabulary elements and scope references.
//!
//! A vocabulary is a finite set of named, kind-tagged elements. Names
//! are unique within their owning domain language. Rules point into
//! the vocabulary through a [`ScopeRef`], either locally or through a
//! declared import.

use serde::{Deserialize, Serialize};

/// Kind tag for a vocabulary item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A category of things the domain admits.
    Class,

    /// A named property or ground fact over the domain.
    Property,

    /// A single distinguished individual.
    Individual,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Property => write!(f, "property"),
            Self::Individual => write!(f, "individual"),
        }
    }
}

/// A named vocabulary item.
///
/// The name is the element's identity: two elements with the same name
/// and kind are the same element, and a domain language rejects two
/// declarations of the same name at build time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DomainElement {
    pub name: String,
    pub kind: ElementKind,
}

impl DomainElement {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Class)
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Property)
    }

    pub fn individual(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Individual)
    }
}

impl std::fmt::Display for DomainElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind, self.name)
    }
}

/// Where a rule's scope points.
///
/// `Local` names an element declared in the same domain language.
/// `Imported` names an element in another module; the module must be
/// among the language's declared imports, and the element reference is
/// resolved (and flattened to `Local`) during graph composition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeRef {
    Local(String),
    Imported { module: String, element: String },
}

impl ScopeRef {
    pub fn local(name: impl Into<String>) -> Self {
        Self::Local(name.into())
    }

    pub fn imported(module: impl Into<String>, element: impl Into<String>) -> Self {
        Self::Imported {
            module: module.into(),
            element: element.into(),
        }
    }

    /// The element name this scope ultimately points at.
    pub fn element_name(&self) -> &str {
        match self {
            Self::Local(name) => name,
            Self::Imported { element, .. } => element,
        }
    }
}

impl std::fmt::Display for ScopeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(name) => write!(f, "{name}"),
            Self::Imported { module, element } => write!(f, "{module}:{element}"),
        }
    }
}
