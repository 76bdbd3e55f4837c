use serde::Serialize;

///
/// Element
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Element {
    pub name: String,
    pub type_name: String,
    pub min_occurs: u32,
    pub unbounded: bool,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            min_occurs: 1,
            unbounded: false,
        }
    }

    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.min_occurs = 0;
        self
    }
}

///
/// Attribute
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub type_name: String,
}

///
/// ComplexType
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ComplexType {
    pub name: String,
    pub base_type: Option<String>,
    pub is_abstract: bool,
    pub documentation: String,
    pub elements: Vec<Element>,
    pub attributes: Vec<Attribute>,
}

impl ComplexType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn based_on(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    #[must_use]
    pub fn documented(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    #[must_use]
    pub fn element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }
}

///
/// Facet
///
/// One restriction facet of a simple type.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Facet {
    Enumeration(String),
    FractionDigits(u32),
    MaxInclusive(String),
    MaxLength(u32),
    MinInclusive(String),
    MinLength(u32),
    TotalDigits(u32),
}

impl Facet {
    /// Facet element name and value.
    #[must_use]
    pub fn parts(&self) -> (&'static str, String) {
        match self {
            Self::Enumeration(v) => ("enumeration", v.clone()),
            Self::FractionDigits(v) => ("fractionDigits", v.to_string()),
            Self::MaxInclusive(v) => ("maxInclusive", v.clone()),
            Self::MaxLength(v) => ("maxLength", v.to_string()),
            Self::MinInclusive(v) => ("minInclusive", v.clone()),
            Self::MinLength(v) => ("minLength", v.to_string()),
            Self::TotalDigits(v) => ("totalDigits", v.to_string()),
        }
    }
}

///
/// SimpleType
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SimpleType {
    pub name: String,
    pub base_type: String,
    pub documentation: String,
    pub facets: Vec<Facet>,
}

impl SimpleType {
    #[must_use]
    pub fn new(name: impl Into<String>, base_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_type: base_type.into(),
            documentation: String::new(),
            facets: Vec::new(),
        }
    }

    #[must_use]
    pub fn facet(mut self, facet: Facet) -> Self {
        self.facets.push(facet);
        self
    }
}

///
/// EntityTypes
///
/// Everything one entity contributes to its namespace schema.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EntityTypes {
    pub complex_type: Option<ComplexType>,
    pub simple_type: Option<SimpleType>,
    pub identity_type: Option<ComplexType>,
    pub reference_type: Option<ComplexType>,
}

///
/// SchemaSection
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SchemaSection {
    pub documentation: String,
    pub complex_types: Vec<ComplexType>,
    pub simple_types: Vec<SimpleType>,
}

impl SchemaSection {
    #[must_use]
    pub fn new(documentation: impl Into<String>) -> Self {
        Self {
            documentation: documentation.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.complex_types.is_empty() && self.simple_types.is_empty()
    }
}

///
/// SchemaContainer
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SchemaContainer {
    pub is_extension: bool,
    pub documentation: String,
    pub sections: Vec<SchemaSection>,
}

impl SchemaContainer {
    /// Complex type by name, across every section.
    #[must_use]
    pub fn complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.sections
            .iter()
            .flat_map(|s| &s.complex_types)
            .find(|t| t.name == name)
    }

    /// Simple type by name, across every section.
    #[must_use]
    pub fn simple_type(&self, name: &str) -> Option<&SimpleType> {
        self.sections
            .iter()
            .flat_map(|s| &s.simple_types)
            .find(|t| t.name == name)
    }
}
