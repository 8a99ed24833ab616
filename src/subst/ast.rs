//! The substitution expression AST (§3.4).

use std::fmt;

use crate::base::Range;

/// A single step in a property path: a field name or an array index.
#[derive(Debug, Clone, PartialEq)]
pub enum PathItem {
    Field(String),
    Index(i64),
}

/// An ordered property path.
pub type Path = Vec<PathItem>;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// A function call argument: `expr` or `name = expr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<String>,
    pub value: Substitution,
}

/// A reference to `variables.<name><path>`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRef {
    pub name: String,
    pub path: Path,
}

/// A reference to `values.<name><path>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRef {
    pub name: String,
    pub path: Path,
}

/// A reference to a resource, either `resources.<name><path>` or the bare
/// shorthand `<name><path>`. `each_index` is set when the reference carries
/// an `each`-template index, e.g. `resources.contentBuckets[2].state...`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRef {
    pub name: String,
    pub each_index: Option<i64>,
    pub path: Path,
}

/// A reference to `datasources["name"]["field"][idx]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceRef {
    pub data_source_name: String,
    pub field_name: String,
    pub primitive_arr_index: Option<i64>,
}

/// A reference to `children.<name><path>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRef {
    pub name: String,
    pub path: Path,
}

/// A reference to `elem<path>` (the current `each` iteration element).
#[derive(Debug, Clone, PartialEq)]
pub struct ElemRef {
    pub path: Path,
}

/// A function call: `name(args...)<path>`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Argument>,
    pub path: Path,
}

/// The sum type at the root of every parsed `${ ... }` body (§3.4).
#[derive(Debug, Clone, PartialEq)]
pub enum SubstitutionKind {
    Literal(Literal),
    Variable(VariableRef),
    Value(ValueRef),
    Resource(ResourceRef),
    DataSource(DataSourceRef),
    Child(ChildRef),
    Elem(ElemRef),
    ElemIndex,
    FunctionCall(FunctionCall),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub kind: SubstitutionKind,
    pub range: Range,
}

impl Substitution {
    pub fn new(kind: SubstitutionKind, range: Range) -> Self {
        Self { kind, range }
    }

    /// Structural equality ignoring ranges (§9 "Normalisation for tests").
    pub fn eq_ignoring_range(&self, other: &Substitution) -> bool {
        fn path_eq(a: &Path, b: &Path) -> bool {
            a == b
        }
        match (&self.kind, &other.kind) {
            (SubstitutionKind::Literal(a), SubstitutionKind::Literal(b)) => a == b,
            (SubstitutionKind::Variable(a), SubstitutionKind::Variable(b)) => {
                a.name == b.name && path_eq(&a.path, &b.path)
            }
            (SubstitutionKind::Value(a), SubstitutionKind::Value(b)) => {
                a.name == b.name && path_eq(&a.path, &b.path)
            }
            (SubstitutionKind::Resource(a), SubstitutionKind::Resource(b)) => {
                a.name == b.name && a.each_index == b.each_index && path_eq(&a.path, &b.path)
            }
            (SubstitutionKind::DataSource(a), SubstitutionKind::DataSource(b)) => {
                a.data_source_name == b.data_source_name
                    && a.field_name == b.field_name
                    && a.primitive_arr_index == b.primitive_arr_index
            }
            (SubstitutionKind::Child(a), SubstitutionKind::Child(b)) => {
                a.name == b.name && path_eq(&a.path, &b.path)
            }
            (SubstitutionKind::Elem(a), SubstitutionKind::Elem(b)) => path_eq(&a.path, &b.path),
            (SubstitutionKind::ElemIndex, SubstitutionKind::ElemIndex) => true,
            (SubstitutionKind::FunctionCall(a), SubstitutionKind::FunctionCall(b)) => {
                a.name == b.name
                    && path_eq(&a.path, &b.path)
                    && a.args.len() == b.args.len()
                    && a.args
                        .iter()
                        .zip(b.args.iter())
                        .all(|(x, y)| x.name == y.name && x.value.eq_ignoring_range(&y.value))
            }
            _ => false,
        }
    }
}

fn fmt_path(path: &Path, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for item in path {
        match item {
            PathItem::Field(name) => write!(f, ".{name}")?,
            PathItem::Index(idx) => write!(f, "[{idx}]")?,
        }
    }
    Ok(())
}

fn fmt_literal(lit: &Literal, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match lit {
        Literal::Str(s) => {
            write!(f, "\"")?;
            for ch in s.chars() {
                match ch {
                    '"' => write!(f, "\\\"")?,
                    '\\' => write!(f, "\\\\")?,
                    other => write!(f, "{other}")?,
                }
            }
            write!(f, "\"")
        }
        Literal::Int(v) => write!(f, "{v}"),
        Literal::Float(v) => write!(f, "{v}"),
        Literal::Bool(v) => write!(f, "{v}"),
    }
}

/// Re-prints a parsed `Substitution` back into surface syntax (§8 invariant
/// 5: "substitution idempotence" — `parse(print(s))` normalised equals `s`
/// normalised). Resource references always print with the explicit
/// `resources.` prefix rather than the bare-name shorthand, since that form
/// re-parses unambiguously regardless of what follows.
impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SubstitutionKind::Literal(lit) => fmt_literal(lit, f),
            SubstitutionKind::Variable(v) => {
                write!(f, "variables.{}", v.name)?;
                fmt_path(&v.path, f)
            }
            SubstitutionKind::Value(v) => {
                write!(f, "values.{}", v.name)?;
                fmt_path(&v.path, f)
            }
            SubstitutionKind::Resource(r) => {
                write!(f, "resources.{}", r.name)?;
                if let Some(idx) = r.each_index {
                    write!(f, "[{idx}]")?;
                }
                fmt_path(&r.path, f)
            }
            SubstitutionKind::DataSource(d) => {
                write!(f, "datasources[\"{}\"][\"{}\"]", d.data_source_name, d.field_name)?;
                if let Some(idx) = d.primitive_arr_index {
                    write!(f, "[{idx}]")?;
                }
                Ok(())
            }
            SubstitutionKind::Child(c) => {
                write!(f, "children.{}", c.name)?;
                fmt_path(&c.path, f)
            }
            SubstitutionKind::Elem(e) => {
                write!(f, "elem")?;
                fmt_path(&e.path, f)
            }
            SubstitutionKind::ElemIndex => write!(f, "i"),
            SubstitutionKind::FunctionCall(call) => {
                write!(f, "{}(", call.name)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if let Some(name) = &arg.name {
                        write!(f, "{name} = ")?;
                    }
                    write!(f, "{}", arg.value)?;
                }
                write!(f, ")")?;
                fmt_path(&call.path, f)
            }
        }
    }
}
