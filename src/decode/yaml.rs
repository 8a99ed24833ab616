//! YAML decoder (C7, §4.7).
//!
//! Built on `yaml-rust2`'s low-level `Parser`/`EventReceiver` event stream
//! rather than `YamlLoader` or `serde_yaml`: only the event stream hands
//! back a `Marker` (line/column) per node. `serde_yaml::Value` discards
//! position information entirely, which is disqualifying here — every
//! decoded node must carry an exact source range (§3.1).

use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::base::{ColumnAccuracy, Position, Range};
use crate::schema::decode_node::{DecodeNode, NodeKind};
use crate::subst::HostOffset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    Quoted,
    Block,
}

#[derive(Debug, Clone)]
enum Payload {
    Scalar { text: String, style: Style },
    Sequence(Vec<YamlNode>),
    Mapping(Vec<(String, YamlNode, Range)>),
}

/// One node of the decoded YAML tree, carrying an exact `Range`.
#[derive(Debug, Clone)]
pub struct YamlNode {
    payload: Payload,
    range: Range,
}

impl YamlNode {
    fn scalar(text: String, style: Style, range: Range) -> Self {
        Self { payload: Payload::Scalar { text, style }, range }
    }
}

impl DecodeNode for YamlNode {
    fn kind(&self) -> NodeKind {
        match &self.payload {
            Payload::Scalar { .. } => NodeKind::Scalar,
            Payload::Sequence(_) => NodeKind::Sequence,
            Payload::Mapping(_) => NodeKind::Mapping,
        }
    }

    fn range(&self) -> Range {
        self.range
    }

    fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::Scalar { text, .. } => Some(text),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match &self.payload {
            Payload::Scalar { text, style: Style::Plain } => text.parse::<i64>().ok(),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match &self.payload {
            Payload::Scalar { text, style: Style::Plain } => {
                if text.parse::<i64>().is_ok() {
                    None
                } else {
                    text.parse::<f64>().ok()
                }
            }
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match &self.payload {
            Payload::Scalar { text, style: Style::Plain } => match text.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    fn field(&self, name: &str) -> Option<&Self> {
        match &self.payload {
            Payload::Mapping(entries) => entries.iter().find(|(k, _, _)| k == name).map(|(_, v, _)| v),
            _ => None,
        }
    }

    fn key_range(&self, name: &str) -> Option<Range> {
        match &self.payload {
            Payload::Mapping(entries) => entries.iter().find(|(k, _, _)| k == name).map(|(_, _, r)| *r),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<String> {
        match &self.payload {
            Payload::Mapping(entries) => entries.iter().map(|(k, _, _)| k.clone()).collect(),
            _ => Vec::new(),
        }
    }

    fn items(&self) -> Option<Vec<&Self>> {
        match &self.payload {
            Payload::Sequence(items) => Some(items.iter().collect()),
            _ => None,
        }
    }

    fn host_offset(&self) -> HostOffset {
        let preceding = match &self.payload {
            Payload::Scalar { style: Style::Quoted, .. } => 1,
            _ => 0,
        };
        HostOffset::new(self.range.start).with_preceding_chars(preceding)
    }

    fn column_accuracy(&self) -> ColumnAccuracy {
        match &self.payload {
            Payload::Scalar { style: Style::Block, .. } => ColumnAccuracy::Approximate,
            _ => ColumnAccuracy::Exact,
        }
    }
}

fn position_from_marker(mark: Marker) -> Position {
    // yaml-rust2 markers are already 1-indexed lines; columns are 0-indexed
    // rune counts.
    Position::new(mark.line(), mark.col() + 1)
}

enum Frame {
    Sequence(Vec<YamlNode>, Position),
    Mapping(Vec<(String, YamlNode, Range)>, Option<(String, Range)>, Position),
}

struct Builder {
    stack: Vec<Frame>,
    root: Option<YamlNode>,
    errors: Vec<String>,
}

impl Builder {
    fn new() -> Self {
        Self { stack: Vec::new(), root: None, errors: Vec::new() }
    }

    fn push_node(&mut self, node: YamlNode) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Frame::Sequence(items, _)) => items.push(node),
            Some(Frame::Mapping(entries, pending, _)) => match pending.take() {
                None => {
                    // this node must serve as a key; only scalar keys are
                    // supported (blueprint documents never use complex keys).
                    let key_range = node.range;
                    match node.as_str() {
                        Some(s) => *pending = Some((s.to_string(), key_range)),
                        None => self.errors.push("non-scalar mapping key is unsupported".into()),
                    }
                }
                Some((key, key_range)) => entries.push((key, node, key_range)),
            },
        }
    }
}

impl EventReceiver for Builder {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        match ev {
            Event::MappingStart(..) => {
                self.stack.push(Frame::Mapping(Vec::new(), None, position_from_marker(mark)));
            }
            Event::MappingEnd => {
                if let Some(Frame::Mapping(entries, _, start)) = self.stack.pop() {
                    let end = position_from_marker(mark);
                    let node = YamlNode {
                        payload: Payload::Mapping(entries),
                        range: Range::new(start, end),
                    };
                    self.push_node(node);
                }
            }
            Event::SequenceStart(..) => {
                self.stack.push(Frame::Sequence(Vec::new(), position_from_marker(mark)));
            }
            Event::SequenceEnd => {
                if let Some(Frame::Sequence(items, start)) = self.stack.pop() {
                    let end = position_from_marker(mark);
                    let node = YamlNode {
                        payload: Payload::Sequence(items),
                        range: Range::new(start, end),
                    };
                    self.push_node(node);
                }
            }
            Event::Scalar(value, style, _anchor_id, _tag) => {
                let start = position_from_marker(mark);
                let kind = match style {
                    TScalarStyle::Plain => Style::Plain,
                    TScalarStyle::SingleQuoted | TScalarStyle::DoubleQuoted => Style::Quoted,
                    TScalarStyle::Literal | TScalarStyle::Folded => Style::Block,
                };
                let end = if kind == Style::Block {
                    start
                } else {
                    let mut p = start;
                    for ch in value.chars() {
                        p = p.advance(ch);
                    }
                    p
                };
                let mut range = Range::new(start, end);
                if kind == Style::Block {
                    range = range.with_accuracy(ColumnAccuracy::Approximate);
                }
                self.push_node(YamlNode::scalar(value, kind, range));
            }
            Event::Alias(_) => {
                let start = position_from_marker(mark);
                self.push_node(YamlNode::scalar(
                    String::new(),
                    Style::Plain,
                    Range::point(start).with_accuracy(ColumnAccuracy::Approximate),
                ));
            }
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}
        }
    }
}

/// Parses `src` (a single YAML document) into a root [`YamlNode`].
pub fn parse(src: &str) -> Result<YamlNode, crate::error::BlueprintError> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    let mut parser = Parser::new(src.chars());
    let mut builder = Builder::new();
    parser
        .load(&mut builder, false)
        .map_err(|e| crate::error::BlueprintError::Lex(format!("{e}")))?;
    if !builder.errors.is_empty() {
        return Err(crate::error::BlueprintError::Lex(builder.errors.join("; ")));
    }
    builder
        .root
        .ok_or_else(|| crate::error::BlueprintError::Lex("empty YAML document".into()))
}
