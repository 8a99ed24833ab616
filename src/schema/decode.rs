//! Generic schema decoders (C6): written once against [`DecodeNode`] and
//! shared by the YAML (C7) and JWCC (C8) surface formats.

use indexmap::IndexMap;

use crate::schema::ast::*;
use crate::schema::decode_node::{DecodeNode, NodeKind};
use crate::schema::errors::{SchemaError, SchemaReason};
use crate::subst::{self, errors::BodyError};
use crate::value::{InterpolatedString, MappingNode, Scalar};

type Result1<T> = std::result::Result<T, SchemaError>;

/// Runs the interpolation splitter (C5) over a scalar node's text,
/// wrapping any lex/parse failure as a schema-level
/// `invalid_reference_substitution` (§7 propagation policy).
pub fn decode_interpolated_string<N: DecodeNode>(node: &N) -> Result1<InterpolatedString> {
    let text = node.as_str().ok_or_else(|| {
        SchemaError::new(SchemaReason::General, "expected a string", node.range().start)
    })?;
    match subst::split(text, node.host_offset()) {
        Ok((segments, range)) => {
            let range = range.with_accuracy(node.column_accuracy());
            Ok(InterpolatedString { segments, range })
        }
        Err(e) => {
            let approximate = node.column_accuracy() != crate::base::ColumnAccuracy::Exact;
            let children: Vec<BodyError> = e
                .children
                .into_iter()
                .map(|c| if approximate { c.with_approximate_accuracy() } else { c })
                .collect();
            Err(SchemaError::new(
                SchemaReason::InvalidReferenceSubstitution,
                format!("invalid substitution ({} error(s))", children.len()),
                node.range().start,
            )
            .with_children(children))
        }
    }
}

/// Decodes any node into the generic recursive value container (§3.2, §9
/// "polymorphic decoding"): peeks at the node kind and dispatches.
pub fn decode_mapping_node<N: DecodeNode>(node: &N) -> Result1<MappingNode> {
    match node.kind() {
        NodeKind::Mapping => {
            let mut entries = IndexMap::new();
            let mut key_ranges = IndexMap::new();
            for name in node.field_names() {
                let child = node.field(&name).expect("field_names entry must resolve");
                entries.insert(name.clone(), decode_mapping_node(child)?);
                if let Some(r) = node.key_range(&name) {
                    key_ranges.insert(name, r);
                }
            }
            Ok(MappingNode::Fields { entries, key_ranges, range: node.range() })
        }
        NodeKind::Sequence => {
            let items = node
                .items()
                .unwrap_or_default()
                .into_iter()
                .map(decode_mapping_node)
                .collect::<Result1<Vec<_>>>()?;
            Ok(MappingNode::Items { items, range: node.range() })
        }
        NodeKind::Scalar => {
            if let Some(b) = node.as_bool() {
                Ok(MappingNode::Scalar(Scalar::Bool(b, node.range())))
            } else if let Some(i) = node.as_int() {
                Ok(MappingNode::Scalar(Scalar::Int(i, node.range())))
            } else if let Some(f) = node.as_float() {
                Ok(MappingNode::Scalar(Scalar::Float(f, node.range())))
            } else {
                let interp = decode_interpolated_string(node)?;
                if interp.is_plain() {
                    let text = interp.plain_text().unwrap_or_default().to_string();
                    Ok(MappingNode::Scalar(Scalar::Str(text, interp.range)))
                } else {
                    Ok(MappingNode::Interpolated(interp))
                }
            }
        }
    }
}

fn require_mapping<'a, N: DecodeNode>(node: &'a N, what: &str) -> Result1<&'a N> {
    if node.kind() == NodeKind::Mapping {
        Ok(node)
    } else {
        Err(SchemaError::new(
            SchemaReason::InvalidMap,
            format!("{what} must be a mapping"),
            node.range().start,
        ))
    }
}

fn required_field<'a, N: DecodeNode>(node: &'a N, name: &str) -> Result1<&'a N> {
    node.field(name).ok_or_else(|| {
        SchemaError::new(
            SchemaReason::General,
            format!("missing required field '{name}'"),
            node.range().start,
        )
    })
}

fn decode_string_or_list<N: DecodeNode>(node: &N, reason: SchemaReason) -> Result1<StringOrList> {
    match node.kind() {
        NodeKind::Scalar => Ok(StringOrList::Single(decode_interpolated_string(node)?)),
        NodeKind::Sequence => {
            let items = node
                .items()
                .unwrap_or_default()
                .into_iter()
                .map(decode_interpolated_string)
                .collect::<Result1<Vec<_>>>()?;
            Ok(StringOrList::List(items))
        }
        NodeKind::Mapping => Err(SchemaError::new(
            reason,
            "expected a string or a list of strings",
            node.range().start,
        )),
    }
}

fn parse_variable_type(s: &str) -> VariableType {
    match s {
        "string" => VariableType::String,
        "integer" => VariableType::Integer,
        "float" => VariableType::Float,
        "boolean" => VariableType::Boolean,
        _ => VariableType::Custom,
    }
}

fn parse_value_type<N: DecodeNode>(s: &str, node: &N) -> Result1<ValueType> {
    Ok(match s {
        "string" => ValueType::String,
        "integer" => ValueType::Integer,
        "float" => ValueType::Float,
        "boolean" => ValueType::Boolean,
        "array" => ValueType::Array,
        "object" => ValueType::Object,
        other => {
            return Err(SchemaError::new(
                SchemaReason::InvalidValueType,
                format!("unknown value type '{other}'"),
                node.range().start,
            ))
        }
    })
}

fn parse_export_type<N: DecodeNode>(s: &str, node: &N) -> Result1<ExportType> {
    Ok(match s {
        "string" => ExportType::String,
        "object" => ExportType::Object,
        "integer" => ExportType::Integer,
        "float" => ExportType::Float,
        "array" => ExportType::Array,
        "boolean" => ExportType::Boolean,
        other => {
            return Err(SchemaError::new(
                SchemaReason::General,
                format!("unknown export type '{other}'"),
                node.range().start,
            ))
        }
    })
}

fn parse_data_source_field_type<N: DecodeNode>(s: &str, node: &N) -> Result1<DataSourceFieldType> {
    Ok(match s {
        "string" => DataSourceFieldType::String,
        "integer" => DataSourceFieldType::Integer,
        "float" => DataSourceFieldType::Float,
        "boolean" => DataSourceFieldType::Boolean,
        "array" => DataSourceFieldType::Array,
        other => {
            return Err(SchemaError::new(
                SchemaReason::InvalidDataSourceFieldType,
                format!("unknown data source field type '{other}'"),
                node.range().start,
            ))
        }
    })
}

pub fn decode_variable<N: DecodeNode>(node: &N) -> Result1<Variable> {
    let node = require_mapping(node, "variable")?;
    let type_field = required_field(node, "type")?;
    let type_name = type_field.as_str().unwrap_or_default().to_string();
    let description = match node.field("description") {
        Some(d) => Some(decode_interpolated_string(d)?),
        None => None,
    };
    let secret = node.field("secret").and_then(|n| n.as_bool());
    let default = match node.field("default") {
        Some(d) => Some(decode_mapping_node(d)?),
        None => None,
    };
    let allowed_values = match node.field("allowedValues") {
        Some(a) => Some(
            a.items()
                .unwrap_or_default()
                .into_iter()
                .map(decode_mapping_node)
                .collect::<Result1<Vec<_>>>()?,
        ),
        None => None,
    };
    Ok(Variable {
        var_type: parse_variable_type(&type_name),
        type_name,
        description,
        secret,
        default,
        allowed_values,
        range: node.range(),
    })
}

pub fn decode_value<N: DecodeNode>(node: &N) -> Result1<ValueDecl> {
    let node = require_mapping(node, "value")?;
    let type_field = required_field(node, "type")?;
    let type_name = type_field.as_str().unwrap_or_default();
    let value_type = parse_value_type(type_name, type_field)?;
    let value_field = required_field(node, "value")?;
    let value = decode_mapping_node(value_field)?;
    let description = match node.field("description") {
        Some(d) => Some(decode_interpolated_string(d)?),
        None => None,
    };
    let secret = node.field("secret").and_then(|n| n.as_bool());
    Ok(ValueDecl {
        value_type,
        value,
        description,
        secret,
        range: node.range(),
    })
}

pub fn decode_include<N: DecodeNode>(node: &N) -> Result1<Include> {
    let node = require_mapping(node, "include")?;
    let path_field = required_field(node, "path")?;
    let path = decode_interpolated_string(path_field)?;
    let variables = match node.field("variables") {
        Some(v) => {
            let mut map = IndexMap::new();
            for name in v.field_names() {
                let child = v.field(&name).expect("field_names entry must resolve");
                map.insert(name, decode_mapping_node(child)?);
            }
            Some(map)
        }
        None => None,
    };
    let metadata = match node.field("metadata") {
        Some(m) => Some(decode_mapping_node(m)?),
        None => None,
    };
    let description = match node.field("description") {
        Some(d) => Some(decode_interpolated_string(d)?),
        None => None,
    };
    Ok(Include {
        path,
        variables,
        metadata,
        description,
        range: node.range(),
    })
}

pub fn decode_condition<N: DecodeNode>(node: &N) -> Result1<Condition> {
    match node.kind() {
        NodeKind::Scalar => {
            let interp = decode_interpolated_string(node)?;
            Ok(Condition::StringValue(interp, node.range()))
        }
        NodeKind::Mapping => {
            let and = node.field("and");
            let or = node.field("or");
            let not = node.field("not");
            // §8 scenario 5 / §9 open question 2: only *pairwise* combinations
            // are rejected; a triple-and/or/not mapping is left unvalidated,
            // matching the historical decoder's silence on that case.
            let present = [and.is_some(), or.is_some(), not.is_some()]
                .iter()
                .filter(|b| **b)
                .count();
            if present == 2 {
                return Err(SchemaError::new(
                    SchemaReason::InvalidResourceCondition,
                    "a condition may not mix 'and', 'or', and 'not'",
                    node.range().start,
                ));
            }
            if let Some(and_node) = and {
                let items = and_node
                    .items()
                    .unwrap_or_default()
                    .into_iter()
                    .map(decode_condition)
                    .collect::<Result1<Vec<_>>>()?;
                return Ok(Condition::And(items, node.range()));
            }
            if let Some(or_node) = or {
                let items = or_node
                    .items()
                    .unwrap_or_default()
                    .into_iter()
                    .map(decode_condition)
                    .collect::<Result1<Vec<_>>>()?;
                return Ok(Condition::Or(items, node.range()));
            }
            if let Some(not_node) = not {
                let inner = decode_condition(not_node)?;
                return Ok(Condition::Not(Box::new(inner), node.range()));
            }
            Err(SchemaError::new(
                SchemaReason::InvalidResourceCondition,
                "a condition mapping must contain one of 'and', 'or', 'not'",
                node.range().start,
            ))
        }
        NodeKind::Sequence => Err(SchemaError::new(
            SchemaReason::InvalidResourceCondition,
            "a condition may not be a sequence",
            node.range().start,
        )),
    }
}

pub fn decode_resource<N: DecodeNode>(node: &N) -> Result1<Resource> {
    let node = require_mapping(node, "resource")?;
    let type_field = required_field(node, "type")?;
    let resource_type = decode_interpolated_string(type_field)?;
    let description = match node.field("description") {
        Some(d) => Some(decode_interpolated_string(d)?),
        None => None,
    };
    let metadata = match node.field("metadata") {
        Some(m) => Some(decode_mapping_node(m)?),
        None => None,
    };
    let depends_on = match node.field("dependsOn") {
        Some(d) => Some(decode_string_or_list(d, SchemaReason::InvalidDependencyType)?),
        None => None,
    };
    let condition = match node.field("condition") {
        Some(c) => Some(decode_condition(c)?),
        None => None,
    };
    let each = match node.field("each") {
        Some(e) => Some(decode_interpolated_string(e)?),
        None => None,
    };
    let link_selector = match node.field("linkSelector") {
        Some(l) => Some(decode_mapping_node(l)?),
        None => None,
    };
    let spec_field = required_field(node, "spec")?;
    let spec = decode_mapping_node(spec_field)?;
    Ok(Resource {
        resource_type,
        description,
        metadata,
        depends_on,
        condition,
        each,
        link_selector,
        spec,
        range: node.range(),
    })
}

fn decode_search_value<N: DecodeNode>(node: &N) -> Result1<SearchValue> {
    match node.kind() {
        NodeKind::Sequence => {
            let items = node
                .items()
                .unwrap_or_default()
                .into_iter()
                .map(decode_interpolated_string)
                .collect::<Result1<Vec<_>>>()?;
            Ok(SearchValue::Multiple(items))
        }
        // A scalar is always treated as a single value at parse time, even
        // when it embeds a substitution that could resolve to a list at
        // runtime (§9 open question 1).
        _ => Ok(SearchValue::Single(decode_interpolated_string(node)?)),
    }
}

fn decode_filter<N: DecodeNode>(node: &N) -> Result1<DataSourceFilter> {
    let node = require_mapping(node, "filter")?;
    let field = decode_interpolated_string(required_field(node, "field")?)?;
    let op_field = required_field(node, "operator")?;
    let op_text = op_field.as_str().unwrap_or_default();
    let operator = FilterOperator::from_str(op_text).ok_or_else(|| {
        SchemaError::new(
            SchemaReason::InvalidDataSourceFilterOperator,
            format!("unknown filter operator '{op_text}'"),
            op_field.range().start,
        )
    })?;
    let search = decode_search_value(required_field(node, "search")?)?;
    Ok(DataSourceFilter { field, operator, search, range: node.range() })
}

fn decode_filters<N: DecodeNode>(node: &N) -> Result1<DataSourceFilters> {
    match node.kind() {
        NodeKind::Sequence => {
            let items = node
                .items()
                .unwrap_or_default()
                .into_iter()
                .map(decode_filter)
                .collect::<Result1<Vec<_>>>()?;
            Ok(DataSourceFilters::List(items))
        }
        NodeKind::Mapping => Ok(DataSourceFilters::Single(decode_filter(node)?)),
        NodeKind::Scalar => Err(SchemaError::new(
            SchemaReason::InvalidArray,
            "filter must be an object or a list of objects",
            node.range().start,
        )),
    }
}

fn decode_data_source_exports<N: DecodeNode>(node: &N) -> Result1<DataSourceExports> {
    if node.is_star_sentinel() {
        return Ok(DataSourceExports { export_all: true, fields: IndexMap::new() });
    }
    if node.kind() != NodeKind::Mapping {
        return Err(SchemaError::new(
            SchemaReason::InvalidArrayOrString,
            "exports must be a map of export specs or the literal \"*\"",
            node.range().start,
        ));
    }
    let mut fields = IndexMap::new();
    for name in node.field_names() {
        let spec_node = node.field(&name).expect("field_names entry must resolve");
        let type_field = required_field(spec_node, "type")?;
        let type_name = type_field.as_str().unwrap_or_default();
        let field_type = parse_data_source_field_type(type_name, type_field)?;
        let description = match spec_node.field("description") {
            Some(d) => Some(decode_interpolated_string(d)?),
            None => None,
        };
        fields.insert(
            name,
            DataSourceExportSpec { field_type, description, range: spec_node.range() },
        );
    }
    Ok(DataSourceExports { export_all: false, fields })
}

pub fn decode_data_source<N: DecodeNode>(node: &N) -> Result1<DataSource> {
    let node = require_mapping(node, "data source")?;
    let type_field = required_field(node, "type")?;
    let data_source_type = decode_interpolated_string(type_field)?;
    let metadata = decode_mapping_node(required_field(node, "metadata")?)?;
    let filter = match node.field("filter") {
        Some(f) => Some(decode_filters(f)?),
        None => None,
    };
    let exports = decode_data_source_exports(required_field(node, "exports")?)?;
    let description = match node.field("description") {
        Some(d) => Some(decode_interpolated_string(d)?),
        None => None,
    };
    Ok(DataSource {
        data_source_type,
        metadata,
        filter,
        exports,
        description,
        range: node.range(),
    })
}

pub fn decode_export<N: DecodeNode>(node: &N) -> Result1<Export> {
    let node = require_mapping(node, "export")?;
    let type_field = required_field(node, "type")?;
    let type_name = type_field.as_str().unwrap_or_default();
    let export_type = parse_export_type(type_name, type_field)?;
    let field = decode_interpolated_string(required_field(node, "field")?)?;
    let description = match node.field("description") {
        Some(d) => Some(decode_interpolated_string(d)?),
        None => None,
    };
    Ok(Export { export_type, field, description, range: node.range() })
}

/// Decodes every entry of a named-map section (`variables`, `resources`, ...).
/// A shape error in one entry is fatal to that entry but not its siblings
/// (§7 propagation policy): every entry is attempted, and all failures are
/// returned together rather than stopping at the first.
fn decode_named_map<N: DecodeNode, T>(
    node: &N,
    decode_one: impl Fn(&N) -> Result1<T>,
) -> std::result::Result<IndexMap<String, T>, Vec<SchemaError>> {
    let node = require_mapping(node, "map").map_err(|e| vec![e])?;
    let mut out = IndexMap::new();
    let mut errors = Vec::new();
    for name in node.field_names() {
        let child = node.field(&name).expect("field_names entry must resolve");
        match decode_one(child) {
            Ok(v) => {
                out.insert(name, v);
            }
            Err(e) => errors.push(e),
        }
    }
    if errors.is_empty() {
        Ok(out)
    } else {
        Err(errors)
    }
}

pub fn decode_blueprint<N: DecodeNode>(node: &N) -> std::result::Result<Blueprint, Vec<SchemaError>> {
    let node = require_mapping(node, "blueprint").map_err(|e| vec![e])?;
    let mut errors = Vec::new();

    let version_field = match required_field(node, "version") {
        Ok(f) => Some(f),
        Err(e) => {
            errors.push(e);
            None
        }
    };
    let transform = match node.field("transform") {
        Some(t) => match decode_string_or_list(t, SchemaReason::InvalidTransformType) {
            Ok(v) => Some(v),
            Err(e) => {
                errors.push(e);
                None
            }
        },
        None => None,
    };

    macro_rules! section {
        ($key:literal, $decode_one:expr) => {
            match node.field($key) {
                Some(v) => match decode_named_map(v, $decode_one) {
                    Ok(map) => map,
                    Err(mut e) => {
                        errors.append(&mut e);
                        IndexMap::new()
                    }
                },
                None => IndexMap::new(),
            }
        };
    }

    let variables = section!("variables", decode_variable);
    let values = section!("values", decode_value);
    let includes = section!("include", decode_include);
    let resources = section!("resources", decode_resource);
    let datasources = section!("datasources", decode_data_source);
    let exports = section!("exports", decode_export);

    let metadata = match node.field("metadata") {
        Some(m) => match decode_mapping_node(m) {
            Ok(v) => Some(v),
            Err(e) => {
                errors.push(e);
                None
            }
        },
        None => None,
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let version_field = version_field.expect("checked above");
    Ok(Blueprint {
        version: version_field.as_str().unwrap_or_default().to_string(),
        version_range: version_field.range(),
        transform,
        variables,
        values,
        includes,
        resources,
        datasources,
        exports,
        metadata,
        range: node.range(),
    })
}
