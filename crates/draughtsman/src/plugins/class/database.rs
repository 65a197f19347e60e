//! Class diagram model store
//!
//! Holds classes and relationships in insertion order, plus the two
//! post-processing passes that make the model consistent: inheritance
//! resolution and association-to-field conversion.

use crate::core::VOID_TYPE;

/// Visibility modifier for class members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public, // +
    Private,   // -
    Protected, // #
    Package,   // ~
}

impl Visibility {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Visibility::Public),
            '-' => Some(Visibility::Private),
            '#' => Some(Visibility::Protected),
            '~' => Some(Visibility::Package),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Private => '-',
            Visibility::Protected => '#',
            Visibility::Package => '~',
        }
    }
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub param_type: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
        }
    }
}

/// A class attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Free-form UML type token, possibly generic or a collection
    pub field_type: String,
    pub visibility: Visibility,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            visibility: Visibility::default(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// A class method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub return_type: String,
    pub visibility: Visibility,
    pub parameters: Vec<Parameter>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: VOID_TYPE.to_string(),
            visibility: Visibility::default(),
            parameters: Vec::new(),
        }
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }
}

/// A class in the diagram
///
/// Created on the first `class X` declaration encountered and mutated
/// incrementally as body lines are parsed; never deleted within a parse
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassModel {
    pub name: String,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub super_class: Option<String>,
    /// Raw stereotype token, when one was written
    pub stereotype: Option<String>,
    pub is_abstract: bool,
    pub is_interface: bool,
    pub is_enumeration: bool,
}

impl ClassModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_class: None,
            stereotype: None,
            is_abstract: false,
            is_interface: false,
            is_enumeration: false,
        }
    }

    /// Record a `<<stereotype>>` annotation, setting the matching flag.
    pub fn apply_stereotype(&mut self, stereotype: &str) {
        match stereotype {
            "abstract" => self.is_abstract = true,
            "interface" => self.is_interface = true,
            "enumeration" => self.is_enumeration = true,
            _ => {}
        }
        self.stereotype = Some(stereotype.to_string());
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn add_method(&mut self, method: Method) {
        self.methods.push(method);
    }
}

/// Relationship kind between two classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    Association, // -->
    Inheritance, // <|--
    Composition, // *--
    Aggregation, // o--
}

/// Endpoint cardinality reduced to the two values the relation table knows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

impl Cardinality {
    /// Reduce a UML multiplicity token to a cardinality.
    ///
    /// `*`, `0..*` and `1..*` are MANY; everything else (including `0..1`
    /// and absent multiplicities) is ONE.
    pub fn from_multiplicity(multiplicity: &str) -> Self {
        match multiplicity.trim() {
            "*" | "0..*" | "1..*" => Cardinality::Many,
            _ => Cardinality::One,
        }
    }
}

/// The four relation shapes derived from endpoint cardinalities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationKind {
    /// The authoritative 2x2 table over {1, *} on each side.
    pub fn from_cardinalities(source: Cardinality, target: Cardinality) -> Self {
        match (source, target) {
            (Cardinality::One, Cardinality::One) => RelationKind::OneToOne,
            (Cardinality::One, Cardinality::Many) => RelationKind::OneToMany,
            (Cardinality::Many, Cardinality::One) => RelationKind::ManyToOne,
            (Cardinality::Many, Cardinality::Many) => RelationKind::ManyToMany,
        }
    }
}

/// A relationship between two classes, referenced by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
    pub source_multiplicity: Option<String>,
    pub target_multiplicity: Option<String>,
    /// Derived during association post-processing when both multiplicities
    /// are present
    pub relation_kind: Option<RelationKind>,
}

impl Relationship {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: RelationshipKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            source_multiplicity: None,
            target_multiplicity: None,
            relation_kind: None,
        }
    }

    pub fn with_multiplicities(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.source_multiplicity = Some(source.into());
        self.target_multiplicity = Some(target.into());
        self
    }
}

/// Class diagram model: ordered classes plus relationships
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    classes: Vec<ClassModel>,
    relationships: Vec<Relationship>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class, keeping names unique within the diagram.
    ///
    /// A repeated declaration keeps the first model; callers that need to
    /// mutate should go through [`Diagram::get_or_create_class`].
    pub fn add_class(&mut self, class: ClassModel) {
        if self.get_class(&class.name).is_none() {
            self.classes.push(class);
        }
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    pub fn classes(&self) -> &[ClassModel] {
        &self.classes
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn get_class(&self, name: &str) -> Option<&ClassModel> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn get_class_mut(&mut self, name: &str) -> Option<&mut ClassModel> {
        self.classes.iter_mut().find(|c| c.name == name)
    }

    /// Get or create a class by name
    pub fn get_or_create_class(&mut self, name: &str) -> &mut ClassModel {
        if self.get_class(name).is_none() {
            self.classes.push(ClassModel::new(name));
        }
        self.get_class_mut(name).expect("class was just inserted")
    }

    pub fn clear(&mut self) {
        self.classes.clear();
        self.relationships.clear();
    }

    /// Resolve inheritance relationships onto `super_class` pointers.
    ///
    /// Runs after the whole diagram is parsed so declaration order does not
    /// matter. Resolution is best-effort: a relationship endpoint that was
    /// never declared simply stays unresolved.
    pub fn resolve_inheritance(&mut self) {
        let links: Vec<(String, String)> = self
            .relationships
            .iter()
            .filter(|r| r.kind == RelationshipKind::Inheritance)
            .map(|r| (r.source.clone(), r.target.clone()))
            .collect();

        for (parent, child) in links {
            if let Some(child_class) = self.get_class_mut(&child) {
                child_class.super_class = Some(parent.clone());
            }
            // A parent declared with an abstract stereotype but without a
            // body keeps its flag once children point at it.
            if let Some(parent_class) = self.get_class_mut(&parent) {
                if parent_class.stereotype.as_deref() == Some("abstract") {
                    parent_class.is_abstract = true;
                }
            }
        }
    }

    /// Convert quoted-multiplicity associations into synthetic fields.
    ///
    /// A many-valued target side becomes a collection field named after the
    /// pluralized target class; a one-valued side becomes a singular
    /// reference. The derived relation kind is recorded on the
    /// relationship.
    pub fn apply_associations(&mut self) {
        let mut synthetic: Vec<(String, String, Field)> = Vec::new();

        for relationship in &mut self.relationships {
            if relationship.kind != RelationshipKind::Association {
                continue;
            }
            let (Some(source_mult), Some(target_mult)) = (
                relationship.source_multiplicity.as_deref(),
                relationship.target_multiplicity.as_deref(),
            ) else {
                continue;
            };

            let source_card = Cardinality::from_multiplicity(source_mult);
            let target_card = Cardinality::from_multiplicity(target_mult);
            relationship.relation_kind =
                Some(RelationKind::from_cardinalities(source_card, target_card));

            let target = relationship.target.clone();
            let field = match target_card {
                Cardinality::Many => Field::new(
                    pluralize(&target.to_lowercase()),
                    format!("List<{}>", target),
                )
                .with_visibility(Visibility::Private),
                Cardinality::One => {
                    Field::new(target.to_lowercase(), target.clone())
                        .with_visibility(Visibility::Private)
                }
            };
            synthetic.push((relationship.source.clone(), target, field));
        }

        // Only attach fields when both endpoints resolved to real classes.
        for (source, target, field) in synthetic {
            if self.get_class(&target).is_none() {
                continue;
            }
            if let Some(class) = self.get_class_mut(&source) {
                class.add_field(field);
            }
        }
    }
}

/// Pluralize a (lowercased) class name for collection fields.
fn pluralize(name: &str) -> String {
    format!("{}s", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_bijection() {
        for (symbol, visibility) in [
            ('+', Visibility::Public),
            ('-', Visibility::Private),
            ('#', Visibility::Protected),
            ('~', Visibility::Package),
        ] {
            assert_eq!(Visibility::from_symbol(symbol), Some(visibility));
            assert_eq!(visibility.symbol(), symbol);
        }
        assert_eq!(Visibility::from_symbol('x'), None);
    }

    #[test]
    fn test_relation_kind_table() {
        use Cardinality::*;
        assert_eq!(RelationKind::from_cardinalities(One, One), RelationKind::OneToOne);
        assert_eq!(RelationKind::from_cardinalities(One, Many), RelationKind::OneToMany);
        assert_eq!(RelationKind::from_cardinalities(Many, One), RelationKind::ManyToOne);
        assert_eq!(RelationKind::from_cardinalities(Many, Many), RelationKind::ManyToMany);
    }

    #[test]
    fn test_multiplicity_reduction() {
        assert_eq!(Cardinality::from_multiplicity("1"), Cardinality::One);
        assert_eq!(Cardinality::from_multiplicity("*"), Cardinality::Many);
        assert_eq!(Cardinality::from_multiplicity("0..*"), Cardinality::Many);
        assert_eq!(Cardinality::from_multiplicity("1..*"), Cardinality::Many);
        assert_eq!(Cardinality::from_multiplicity("0..1"), Cardinality::One);
    }

    #[test]
    fn test_class_names_unique() {
        let mut diagram = Diagram::new();
        diagram.add_class(ClassModel::new("User"));
        diagram.add_class(ClassModel::new("User"));
        assert_eq!(diagram.class_count(), 1);
    }

    #[test]
    fn test_get_or_create_class() {
        let mut diagram = Diagram::new();
        diagram.get_or_create_class("User").add_field(Field::new("id", "UUID"));
        diagram.get_or_create_class("User");
        assert_eq!(diagram.class_count(), 1);
        assert_eq!(diagram.get_class("User").unwrap().fields.len(), 1);
    }

    #[test]
    fn test_stereotype_flags() {
        let mut class = ClassModel::new("Entity");
        class.apply_stereotype("abstract");
        assert!(class.is_abstract);
        assert!(!class.is_interface);

        let mut class = ClassModel::new("Repo");
        class.apply_stereotype("interface");
        assert!(class.is_interface);

        let mut class = ClassModel::new("Status");
        class.apply_stereotype("enumeration");
        assert!(class.is_enumeration);
    }

    #[test]
    fn test_resolve_inheritance_order_independent() {
        // Child declared before parent
        let mut diagram = Diagram::new();
        diagram.add_class(ClassModel::new("Author"));
        diagram.add_class(ClassModel::new("User"));
        diagram.add_relationship(Relationship::new(
            "User",
            "Author",
            RelationshipKind::Inheritance,
        ));
        diagram.resolve_inheritance();
        assert_eq!(
            diagram.get_class("Author").unwrap().super_class.as_deref(),
            Some("User")
        );
    }

    #[test]
    fn test_resolve_inheritance_unknown_child_is_noop() {
        let mut diagram = Diagram::new();
        diagram.add_class(ClassModel::new("User"));
        diagram.add_relationship(Relationship::new(
            "User",
            "Ghost",
            RelationshipKind::Inheritance,
        ));
        diagram.resolve_inheritance();
        assert_eq!(diagram.class_count(), 1);
    }

    #[test]
    fn test_association_to_collection_field() {
        let mut diagram = Diagram::new();
        diagram.add_class(ClassModel::new("User"));
        diagram.add_class(ClassModel::new("Order"));
        diagram.add_relationship(
            Relationship::new("User", "Order", RelationshipKind::Association)
                .with_multiplicities("1", "*"),
        );
        diagram.apply_associations();

        let user = diagram.get_class("User").unwrap();
        let field = user.fields.last().unwrap();
        assert_eq!(field.name, "orders");
        assert_eq!(field.field_type, "List<Order>");
        assert_eq!(
            diagram.relationships()[0].relation_kind,
            Some(RelationKind::OneToMany)
        );
    }

    #[test]
    fn test_association_to_singular_field() {
        let mut diagram = Diagram::new();
        diagram.add_class(ClassModel::new("Order"));
        diagram.add_class(ClassModel::new("Invoice"));
        diagram.add_relationship(
            Relationship::new("Order", "Invoice", RelationshipKind::Association)
                .with_multiplicities("1", "1"),
        );
        diagram.apply_associations();

        let order = diagram.get_class("Order").unwrap();
        let field = order.fields.last().unwrap();
        assert_eq!(field.name, "invoice");
        assert_eq!(field.field_type, "Invoice");
        assert_eq!(
            diagram.relationships()[0].relation_kind,
            Some(RelationKind::OneToOne)
        );
    }

    #[test]
    fn test_association_without_target_class_adds_nothing() {
        let mut diagram = Diagram::new();
        diagram.add_class(ClassModel::new("User"));
        diagram.add_relationship(
            Relationship::new("User", "Ghost", RelationshipKind::Association)
                .with_multiplicities("1", "*"),
        );
        diagram.apply_associations();
        assert!(diagram.get_class("User").unwrap().fields.is_empty());
    }
}
