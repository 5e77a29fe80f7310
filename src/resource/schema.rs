use bson::Bson;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Number,
    Bool,
    /// A string id pointing at a document in another collection.
    Reference,
}

/// One field's constraints. Schemas are static tables; rules use the
/// `..FieldRule::new(..)` spread so each entry states only what it checks.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub immutable: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub one_of: &'static [&'static str],
    pub references: Option<&'static str>,
}

impl FieldRule {
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            immutable: false,
            min: None,
            max: None,
            min_len: None,
            max_len: None,
            one_of: &[],
            references: None,
        }
    }
}

/// Const-friendly default values applied on create.
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Double(f64),
    Int(i64),
    Bool(bool),
    Str(&'static str),
}

impl DefaultValue {
    #[must_use]
    pub fn to_bson(self) -> Bson {
        match self {
            Self::Double(f) => Bson::Double(f),
            Self::Int(i) => Bson::Int64(i),
            Self::Bool(b) => Bson::Boolean(b),
            Self::Str(s) => Bson::String(s.to_string()),
        }
    }
}

/// Everything the generic handler needs to know about one entity type.
/// Type-specific behavior lives here and in the entity's own service
/// module, never in the handler.
pub struct Schema {
    pub collection: &'static str,
    pub fields: &'static [FieldRule],
    /// Compound uniqueness invariants; each inner slice is one key set.
    pub unique: &'static [&'static [&'static str]],
    pub defaults: &'static [(&'static str, DefaultValue)],
    /// Cross-field invariants checked against the full (merged) document;
    /// each returns a violation message when broken.
    pub cross_checks: &'static [fn(&bson::Document) -> Option<String>],
    /// Soft-visibility flag: `(field, value-that-hides)`. Documents where
    /// the field equals the value are excluded from listings unless the
    /// request filters on that field explicitly.
    pub hidden_when: Option<(&'static str, bool)>,
}

impl Schema {
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|r| r.name == name)
    }
}
