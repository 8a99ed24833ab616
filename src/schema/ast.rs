//! The Blueprint schema AST (C6, §3.3): typed entities produced from either
//! surface syntax by the shared `DecodeNode`-generic decoders in
//! `crate::schema::decode`.

use indexmap::IndexMap;

use crate::base::Range;
use crate::value::{InterpolatedString, MappingNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    String,
    Integer,
    Float,
    Boolean,
    /// A provider-defined extension type, opaque to this crate (§6.2).
    Custom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub type_name: String,
    pub var_type: VariableType,
    pub description: Option<InterpolatedString>,
    pub secret: Option<bool>,
    pub default: Option<MappingNode>,
    pub allowed_values: Option<Vec<MappingNode>>,
    pub range: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Integer,
    Float,
    Boolean,
    Array,
    Object,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueDecl {
    pub value_type: ValueType,
    pub value: MappingNode,
    pub description: Option<InterpolatedString>,
    pub secret: Option<bool>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub path: InterpolatedString,
    pub variables: Option<IndexMap<String, MappingNode>>,
    pub metadata: Option<MappingNode>,
    pub description: Option<InterpolatedString>,
    pub range: Range,
}

/// `dependsOn`/`transform`: a single string, or a sequence of strings
/// (§4.6 polymorphic fields).
#[derive(Debug, Clone, PartialEq)]
pub enum StringOrList {
    Single(InterpolatedString),
    List(Vec<InterpolatedString>),
}

impl StringOrList {
    pub fn as_list(&self) -> Vec<&InterpolatedString> {
        match self {
            StringOrList::Single(s) => vec![s],
            StringOrList::List(items) => items.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub resource_type: InterpolatedString,
    pub description: Option<InterpolatedString>,
    pub metadata: Option<MappingNode>,
    pub depends_on: Option<StringOrList>,
    pub condition: Option<Condition>,
    pub each: Option<InterpolatedString>,
    pub link_selector: Option<MappingNode>,
    pub spec: MappingNode,
    pub range: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    NotEq,
    In,
    NotIn,
    HasKey,
    NotHasKey,
    Contains,
    NotContains,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
}

impl FilterOperator {
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "=" => FilterOperator::Eq,
            "!=" => FilterOperator::NotEq,
            "in" => FilterOperator::In,
            "not in" => FilterOperator::NotIn,
            "has key" => FilterOperator::HasKey,
            "not has key" => FilterOperator::NotHasKey,
            "contains" => FilterOperator::Contains,
            "not contains" => FilterOperator::NotContains,
            "starts with" => FilterOperator::StartsWith,
            "not starts with" => FilterOperator::NotStartsWith,
            "ends with" => FilterOperator::EndsWith,
            "not ends with" => FilterOperator::NotEndsWith,
            _ => return None,
        })
    }
}

/// `search`: a single value, or a list of values. §9 open question: a
/// scalar carrying a `${ ... }` that resolves to a list *at runtime* is
/// still treated as `Single` at parse time; this crate does not attempt to
/// predict the runtime shape of an unresolved substitution.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchValue {
    Single(InterpolatedString),
    Multiple(Vec<InterpolatedString>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceFilter {
    pub field: InterpolatedString,
    pub operator: FilterOperator,
    pub search: SearchValue,
    pub range: Range,
}

/// `filter`: a single filter object, or a sequence of filter objects.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSourceFilters {
    Single(DataSourceFilter),
    List(Vec<DataSourceFilter>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceFieldType {
    String,
    Integer,
    Float,
    Boolean,
    Array,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceExportSpec {
    pub field_type: DataSourceFieldType,
    pub description: Option<InterpolatedString>,
    pub range: Range,
}

/// `exports`: either the sentinel `"*"` (all fields) or a named map of
/// export specs (§8 boundary behaviour: `exports: "*"` yields
/// `export_all == true` and an empty map).
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceExports {
    pub export_all: bool,
    pub fields: IndexMap<String, DataSourceExportSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    pub data_source_type: InterpolatedString,
    pub metadata: MappingNode,
    pub filter: Option<DataSourceFilters>,
    pub exports: DataSourceExports,
    pub description: Option<InterpolatedString>,
    pub range: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportType {
    String,
    Object,
    Integer,
    Float,
    Array,
    Boolean,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub export_type: ExportType,
    pub field: InterpolatedString,
    pub description: Option<InterpolatedString>,
    pub range: Range,
}

/// A resource/data-source condition: exactly one of `and`, `or`, `not`, or
/// a plain (interpolated-boolean) string value (§3.3, §8).
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    And(Vec<Condition>, Range),
    Or(Vec<Condition>, Range),
    Not(Box<Condition>, Range),
    StringValue(InterpolatedString, Range),
}

impl Condition {
    pub fn range(&self) -> Range {
        match self {
            Condition::And(_, r) | Condition::Or(_, r) | Condition::Not(_, r) | Condition::StringValue(_, r) => *r,
        }
    }

    pub fn eq_ignoring_range(&self, other: &Condition) -> bool {
        match (self, other) {
            (Condition::And(a, _), Condition::And(b, _)) | (Condition::Or(a, _), Condition::Or(b, _)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.eq_ignoring_range(y))
            }
            (Condition::Not(a, _), Condition::Not(b, _)) => a.eq_ignoring_range(b),
            (Condition::StringValue(a, _), Condition::StringValue(b, _)) => a.eq_ignoring_range(b),
            _ => false,
        }
    }
}

fn opt_eq<T>(a: &Option<T>, b: &Option<T>, eq: impl Fn(&T, &T) -> bool) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => eq(x, y),
        (None, None) => true,
        _ => false,
    }
}

impl StringOrList {
    pub fn eq_ignoring_range(&self, other: &StringOrList) -> bool {
        match (self, other) {
            (StringOrList::Single(a), StringOrList::Single(b)) => a.eq_ignoring_range(b),
            (StringOrList::List(a), StringOrList::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.eq_ignoring_range(y))
            }
            _ => false,
        }
    }
}

impl Variable {
    pub fn eq_ignoring_range(&self, other: &Variable) -> bool {
        self.var_type == other.var_type
            && self.type_name == other.type_name
            && self.secret == other.secret
            && opt_eq(&self.description, &other.description, InterpolatedString::eq_ignoring_range)
            && opt_eq(&self.default, &other.default, MappingNode::eq_ignoring_range)
    }
}

impl ValueDecl {
    pub fn eq_ignoring_range(&self, other: &ValueDecl) -> bool {
        self.value_type == other.value_type
            && self.secret == other.secret
            && self.value.eq_ignoring_range(&other.value)
            && opt_eq(&self.description, &other.description, InterpolatedString::eq_ignoring_range)
    }
}

impl Include {
    pub fn eq_ignoring_range(&self, other: &Include) -> bool {
        self.path.eq_ignoring_range(&other.path)
            && opt_eq(&self.description, &other.description, InterpolatedString::eq_ignoring_range)
    }
}

impl Resource {
    pub fn eq_ignoring_range(&self, other: &Resource) -> bool {
        self.resource_type.eq_ignoring_range(&other.resource_type)
            && self.spec.eq_ignoring_range(&other.spec)
            && opt_eq(&self.description, &other.description, InterpolatedString::eq_ignoring_range)
            && opt_eq(&self.condition, &other.condition, Condition::eq_ignoring_range)
            && opt_eq(&self.each, &other.each, InterpolatedString::eq_ignoring_range)
            && opt_eq(&self.depends_on, &other.depends_on, StringOrList::eq_ignoring_range)
    }
}

impl DataSource {
    pub fn eq_ignoring_range(&self, other: &DataSource) -> bool {
        self.data_source_type.eq_ignoring_range(&other.data_source_type)
            && self.metadata.eq_ignoring_range(&other.metadata)
            && self.exports.export_all == other.exports.export_all
            && opt_eq(&self.description, &other.description, InterpolatedString::eq_ignoring_range)
    }
}

impl Export {
    pub fn eq_ignoring_range(&self, other: &Export) -> bool {
        self.export_type == other.export_type && self.field.eq_ignoring_range(&other.field)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    pub version: String,
    pub version_range: Range,
    pub transform: Option<StringOrList>,
    pub variables: IndexMap<String, Variable>,
    pub values: IndexMap<String, ValueDecl>,
    pub includes: IndexMap<String, Include>,
    pub resources: IndexMap<String, Resource>,
    pub datasources: IndexMap<String, DataSource>,
    pub exports: IndexMap<String, Export>,
    pub metadata: Option<MappingNode>,
    pub range: Range,
}

impl Blueprint {
    /// Structural equality ignoring every `Range` in the tree (§8 invariant
    /// 4 "round-trip normalisation", invariant 5 "substitution
    /// idempotence"): lets a YAML-decoded and a JSON-decoded `Blueprint`
    /// compare equal even though only YAML carries positions everywhere.
    pub fn eq_ignoring_range(&self, other: &Blueprint) -> bool {
        fn map_eq<T>(a: &IndexMap<String, T>, b: &IndexMap<String, T>, eq: impl Fn(&T, &T) -> bool) -> bool {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| ka == kb && eq(va, vb))
        }
        self.version == other.version
            && opt_eq(&self.transform, &other.transform, StringOrList::eq_ignoring_range)
            && map_eq(&self.variables, &other.variables, Variable::eq_ignoring_range)
            && map_eq(&self.values, &other.values, ValueDecl::eq_ignoring_range)
            && map_eq(&self.includes, &other.includes, Include::eq_ignoring_range)
            && map_eq(&self.resources, &other.resources, Resource::eq_ignoring_range)
            && map_eq(&self.datasources, &other.datasources, DataSource::eq_ignoring_range)
            && map_eq(&self.exports, &other.exports, Export::eq_ignoring_range)
            && opt_eq(&self.metadata, &other.metadata, MappingNode::eq_ignoring_range)
    }
}
