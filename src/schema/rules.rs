use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::schema::violation::{Reason, ValidationError, Violation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Primitive shape a property value must have.
pub enum ValueKind {
    String,
    Integer,
    Object,
    Array,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

#[derive(Debug, Clone)]
/// One structural check on a single property value.
pub enum Rule {
    Type(ValueKind),
    Enum(&'static [&'static str]),
    Pattern(&'static LazyLock<Regex>),
    ArrayBounds { min: usize, max: usize },
    Items(ItemRule),
}

#[derive(Debug, Clone)]
/// Shape of the elements of an array property.
pub enum ItemRule {
    Kind(ValueKind),
    Schema(Box<Schema>),
}

impl Rule {
    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) {
        match self {
            Self::Type(kind) => {
                if !kind.matches(value) {
                    out.push(Violation {
                        path: path.to_owned(),
                        reason: Reason::WrongType {
                            expected: kind.name(),
                        },
                    });
                }
            }
            Self::Enum(allowed) => match value.as_str() {
                Some(text) if allowed.contains(&text) => {}
                // Non-strings are already flagged by the type rule; the enum
                // check still fails them so the constraint stands on its own.
                _ => out.push(Violation {
                    path: path.to_owned(),
                    reason: Reason::NotInEnum { allowed: *allowed },
                }),
            },
            Self::Pattern(pattern) => {
                if let Some(text) = value.as_str() {
                    if !pattern.is_match(text) {
                        out.push(Violation {
                            path: path.to_owned(),
                            reason: Reason::PatternMismatch {
                                pattern: pattern.as_str(),
                            },
                        });
                    }
                }
            }
            Self::ArrayBounds { min, max } => {
                if let Some(items) = value.as_array() {
                    if items.len() < *min {
                        out.push(Violation {
                            path: path.to_owned(),
                            reason: Reason::TooFewItems {
                                min: *min,
                                actual: items.len(),
                            },
                        });
                    }
                    if items.len() > *max {
                        out.push(Violation {
                            path: path.to_owned(),
                            reason: Reason::TooManyItems {
                                max: *max,
                                actual: items.len(),
                            },
                        });
                    }
                }
            }
            Self::Items(item) => {
                if let Some(items) = value.as_array() {
                    for (idx, element) in items.iter().enumerate() {
                        let item_path = format!("{path}[{idx}]");
                        match item {
                            ItemRule::Kind(kind) => {
                                if !kind.matches(element) {
                                    out.push(Violation {
                                        path: item_path,
                                        reason: Reason::WrongType {
                                            expected: kind.name(),
                                        },
                                    });
                                }
                            }
                            ItemRule::Schema(schema) => schema.check(element, &item_path, out),
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
/// A schema-level requirement over the set of present properties.
///
/// Every clause attached to a schema must hold; disjunction lives inside
/// [`Clause::AnyOf`].
pub enum Clause {
    /// All listed properties must be present.
    Required(&'static [&'static str]),
    /// At least one sub-clause must hold.
    AnyOf(Vec<Clause>),
    /// If `property` equals `equals`, `then` must hold, otherwise `otherwise`.
    If {
        property: &'static str,
        equals: &'static str,
        then: Box<Clause>,
        otherwise: Box<Clause>,
    },
}

impl Clause {
    fn holds(&self, map: &Map<String, Value>) -> bool {
        match self {
            Self::Required(names) => names.iter().all(|name| map.contains_key(*name)),
            Self::AnyOf(clauses) => clauses.iter().any(|clause| clause.holds(map)),
            Self::If {
                property,
                equals,
                then,
                otherwise,
            } => {
                if map.get(*property).and_then(Value::as_str) == Some(*equals) {
                    then.holds(map)
                } else {
                    otherwise.holds(map)
                }
            }
        }
    }

    fn check(&self, map: &Map<String, Value>, path: &str, out: &mut Vec<Violation>) {
        match self {
            Self::Required(names) => {
                for name in *names {
                    if !map.contains_key(*name) {
                        out.push(Violation {
                            path: join_path(path, name),
                            reason: Reason::MissingProperty,
                        });
                    }
                }
            }
            Self::AnyOf(clauses) => {
                if !self.holds(map) {
                    out.push(Violation {
                        path: path.to_owned(),
                        reason: Reason::NoAlternativeMatched {
                            alternatives: clauses.iter().map(Clause::describe).collect(),
                        },
                    });
                }
            }
            Self::If {
                property,
                equals,
                then,
                otherwise,
            } => {
                let branch = if map.get(*property).and_then(Value::as_str) == Some(*equals) {
                    then
                } else {
                    otherwise
                };
                branch.check(map, path, out);
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Required(names) => names.join(", "),
            Self::AnyOf(clauses) => clauses
                .iter()
                .map(Clause::describe)
                .collect::<Vec<_>>()
                .join(" | "),
            Self::If {
                property,
                equals,
                then,
                otherwise,
            } => format!(
                "if {property} == {equals:?} then ({}) else ({})",
                then.describe(),
                otherwise.describe()
            ),
        }
    }
}

#[derive(Debug, Clone)]
/// Declarative structural contract over a key/value payload.
///
/// A schema is plain data interpreted by one generic matcher: per-property
/// [`Rule`]s, schema-level [`Clause`]s, and a flag rejecting undeclared keys.
/// Defined once and reused for the lifetime of the client.
pub struct Schema {
    name: &'static str,
    properties: BTreeMap<&'static str, Vec<Rule>>,
    clauses: Vec<Clause>,
    additional_properties: bool,
}

impl Schema {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            properties: BTreeMap::new(),
            clauses: Vec::new(),
            additional_properties: true,
        }
    }

    pub(crate) fn property(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.properties.insert(name, rules);
        self
    }

    pub(crate) fn required(self, names: &'static [&'static str]) -> Self {
        self.clause(Clause::Required(names))
    }

    pub(crate) fn clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub(crate) fn deny_additional_properties(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check `payload` against this schema.
    ///
    /// The matcher does not short-circuit: the returned [`ValidationError`]
    /// carries every violated constraint with a path to the offending field.
    pub fn validate(&self, payload: &Value) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        self.check(payload, "", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.name, violations))
        }
    }

    fn check(&self, payload: &Value, path: &str, out: &mut Vec<Violation>) {
        let Value::Object(map) = payload else {
            out.push(Violation {
                path: path.to_owned(),
                reason: Reason::WrongType {
                    expected: ValueKind::Object.name(),
                },
            });
            return;
        };

        if !self.additional_properties {
            for key in map.keys() {
                if !self.properties.contains_key(key.as_str()) {
                    out.push(Violation {
                        path: join_path(path, key),
                        reason: Reason::UnknownProperty,
                    });
                }
            }
        }

        for (name, rules) in &self.properties {
            if let Some(value) = map.get(*name) {
                let property_path = join_path(path, name);
                for rule in rules {
                    rule.check(value, &property_path, out);
                }
            }
        }

        for clause in &self.clauses {
            clause.check(map, path, out);
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}
