//! Declarative argument schemas.
//!
//! Every tool describes its arguments as an [`ArgSchema`]: an ordered list of
//! [`Field`]s (name, [`Kind`], bounds, default, required flag) plus
//! cross-field [`Rule`]s. One shared evaluator checks raw JSON input against
//! the schema, and the same schema renders the JSON Schema that is advertised
//! to callers, so the two can never drift apart.
//!
//! Validation failures use the two validation variants of [`ToolError`]:
//! [`ToolError::InvalidType`] for a value of the wrong JSON type and
//! [`ToolError::InvalidValue`] for everything else (missing, out of range,
//! malformed, not an allowed value, missing dependent field).

use std::fmt;

use regex::Regex;
use serde_json::{Map, Value, json};

use crate::error::ToolError;

/// A compiled character-set pattern for string arguments.
pub struct Pattern {
    regex: Regex,
    charset: &'static str,
}

impl Pattern {
    /// Compile a pattern. `charset` is the human wording used in error
    /// messages, e.g. `"alphanumeric characters, hyphens, underscores, and periods"`.
    ///
    /// # Panics
    ///
    /// Panics if `regex` is not a valid regular expression. Patterns are
    /// compile-time literals, so this is a programming error.
    #[must_use]
    pub fn new(regex: &str, charset: &'static str) -> Self {
        Self {
            regex: Regex::new(regex).expect("valid regex"),
            charset,
        }
    }

    /// Whether `value` matches the pattern.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// The regular expression source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

/// Constraints on a string value.
#[derive(Debug, Clone, Default)]
pub struct StringKind {
    /// Minimum length in characters.
    pub min_len: usize,
    /// Maximum length in characters.
    pub max_len: Option<usize>,
    /// Allowed character set.
    pub pattern: Option<&'static Pattern>,
    /// Enumeration of allowed values.
    pub one_of: Option<&'static [&'static str]>,
    /// Case-insensitive prefix the value must not start with.
    pub reserved_prefix: Option<&'static str>,
}

/// The shape of a single argument value.
#[derive(Debug, Clone)]
pub enum Kind {
    /// A string.
    String(StringKind),
    /// A whole number within an inclusive range.
    Integer {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// `true` or `false`.
    Boolean,
    /// An RFC 3339 string or a number of seconds since the Unix epoch.
    Timestamp,
    /// A list of items of one kind.
    List {
        /// Smallest accepted item count.
        min_items: usize,
        /// Largest accepted item count.
        max_items: usize,
        /// Shape of each item.
        item: Box<Kind>,
    },
    /// A string-to-string mapping.
    Map {
        /// Largest accepted entry count.
        max_entries: usize,
        /// Constraints on each key.
        key: StringKind,
        /// Constraints on each value.
        value: StringKind,
    },
    /// A nested object with its own schema.
    Object(ArgSchema),
}

impl Kind {
    fn expected(&self) -> &'static str {
        match self {
            Kind::String(_) => "a string",
            Kind::Integer { .. } => "an integer",
            Kind::Boolean => "a boolean",
            Kind::Timestamp => "an RFC 3339 string or epoch seconds",
            Kind::List { .. } => "a list",
            Kind::Map { .. } | Kind::Object(_) => "a dictionary",
        }
    }

    fn check(&self, path: &str, value: Value) -> Result<Value, ToolError> {
        match self {
            Kind::String(string) => {
                let Value::String(s) = &value else {
                    return Err(type_error(path, self));
                };
                check_string(path, string, s)?;
                Ok(value)
            }
            Kind::Integer { min, max } => {
                let Some(n) = value.as_i64() else {
                    return Err(type_error(path, self));
                };
                if n < *min || n > *max {
                    return Err(ToolError::InvalidValue(format!(
                        "{path} must be between {min} and {max}"
                    )));
                }
                Ok(value)
            }
            Kind::Boolean => {
                if !value.is_boolean() {
                    return Err(type_error(path, self));
                }
                Ok(value)
            }
            Kind::Timestamp => match &value {
                Value::Number(n) if n.as_f64().is_some_and(|secs| secs >= 0.0) => Ok(value),
                Value::Number(_) => Err(ToolError::InvalidValue(format!(
                    "{path} must not be before the Unix epoch"
                ))),
                Value::String(s) => {
                    if chrono::DateTime::parse_from_rfc3339(s).is_err() {
                        return Err(ToolError::InvalidValue(format!(
                            "{path} must be an RFC 3339 timestamp"
                        )));
                    }
                    Ok(value)
                }
                _ => Err(type_error(path, self)),
            },
            Kind::List {
                min_items,
                max_items,
                item,
            } => {
                let Value::Array(items) = value else {
                    return Err(type_error(path, self));
                };
                if items.len() < *min_items || items.len() > *max_items {
                    return Err(ToolError::InvalidValue(format!(
                        "Number of {path} must be between {min_items} and {max_items}"
                    )));
                }
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| item.check(&format!("{path}[{i}]"), v))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            Kind::Map {
                max_entries,
                key,
                value: value_kind,
            } => {
                let Value::Object(entries) = &value else {
                    return Err(type_error(path, self));
                };
                if entries.len() > *max_entries {
                    return Err(ToolError::InvalidValue(format!(
                        "Number of {path} cannot exceed {max_entries}"
                    )));
                }
                for (k, v) in entries {
                    check_string(&format!("{path} key"), key, k)?;
                    let Value::String(s) = v else {
                        return Err(ToolError::InvalidType(format!(
                            "{path} keys and values must be strings"
                        )));
                    };
                    check_string(&format!("{path} value"), value_kind, s)?;
                }
                Ok(value)
            }
            Kind::Object(schema) => {
                let Value::Object(map) = value else {
                    return Err(type_error(path, self));
                };
                schema.validate_map(path, map).map(Value::Object)
            }
        }
    }

    fn to_json_schema(&self) -> Value {
        match self {
            Kind::String(string) => string_schema(string),
            Kind::Integer { min, max } => json!({
                "type": "integer",
                "minimum": min,
                "maximum": max,
            }),
            Kind::Boolean => json!({ "type": "boolean" }),
            Kind::Timestamp => json!({
                "anyOf": [
                    { "type": "string", "format": "date-time" },
                    { "type": "number", "minimum": 0 },
                ]
            }),
            Kind::List {
                min_items,
                max_items,
                item,
            } => json!({
                "type": "array",
                "minItems": min_items,
                "maxItems": max_items,
                "items": item.to_json_schema(),
            }),
            Kind::Map {
                max_entries,
                key,
                value,
            } => json!({
                "type": "object",
                "maxProperties": max_entries,
                "propertyNames": string_schema(key),
                "additionalProperties": string_schema(value),
            }),
            Kind::Object(schema) => schema.to_json_schema(),
        }
    }
}

fn check_string(path: &str, string: &StringKind, s: &str) -> Result<(), ToolError> {
    if let Some(allowed) = string.one_of {
        if !allowed.contains(&s) {
            return Err(ToolError::InvalidValue(format!(
                "{path} must be one of [{}]",
                allowed.join(", ")
            )));
        }
        return Ok(());
    }

    let len = s.chars().count();
    if let Some(max_len) = string.max_len
        && (len < string.min_len || len > max_len)
    {
        return Err(ToolError::InvalidValue(format!(
            "{path} length must be between {} and {max_len} characters",
            string.min_len
        )));
    }
    if string.max_len.is_none() && len < string.min_len {
        return Err(ToolError::InvalidValue(format!(
            "{path} must be at least {} characters",
            string.min_len
        )));
    }
    if let Some(prefix) = string.reserved_prefix
        && s.to_lowercase().starts_with(&prefix.to_lowercase())
    {
        return Err(ToolError::InvalidValue(format!(
            "{path} cannot start with \"{prefix}\""
        )));
    }
    if let Some(pattern) = string.pattern
        && !pattern.is_match(s)
    {
        return Err(ToolError::InvalidValue(format!(
            "{path} can only contain {}",
            pattern.charset
        )));
    }
    Ok(())
}

fn string_schema(string: &StringKind) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), json!("string"));
    if let Some(allowed) = string.one_of {
        schema.insert("enum".into(), json!(allowed));
        return Value::Object(schema);
    }
    if string.min_len > 0 {
        schema.insert("minLength".into(), json!(string.min_len));
    }
    if let Some(max_len) = string.max_len {
        schema.insert("maxLength".into(), json!(max_len));
    }
    if let Some(pattern) = string.pattern {
        schema.insert("pattern".into(), json!(pattern.as_str()));
    }
    Value::Object(schema)
}

fn type_error(path: &str, kind: &Kind) -> ToolError {
    ToolError::InvalidType(format!("{path} must be {}", kind.expected()))
}

fn missing(path: &str) -> ToolError {
    ToolError::InvalidValue(format!("{path} is required"))
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// One named argument.
#[derive(Debug, Clone)]
pub struct Field {
    /// Argument name as the caller supplies it.
    pub name: &'static str,
    /// Shape and bounds of the value.
    pub kind: Kind,
    /// Whether the argument must be present.
    pub required: bool,
    /// Value filled in when the argument is absent.
    pub default: Option<Value>,
    /// Description shown to the calling agent.
    pub description: &'static str,
}

impl Field {
    fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            description: "",
        }
    }

    /// A string argument with no constraints yet.
    #[must_use]
    pub fn string(name: &'static str) -> Self {
        Self::new(name, Kind::String(StringKind::default()))
    }

    /// A string argument restricted to an enumeration.
    #[must_use]
    pub fn one_of(name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self::new(
            name,
            Kind::String(StringKind {
                one_of: Some(allowed),
                ..StringKind::default()
            }),
        )
    }

    /// An integer argument within an inclusive range.
    #[must_use]
    pub fn integer(name: &'static str, min: i64, max: i64) -> Self {
        Self::new(name, Kind::Integer { min, max })
    }

    /// A boolean argument.
    #[must_use]
    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, Kind::Boolean)
    }

    /// A timestamp argument.
    #[must_use]
    pub fn timestamp(name: &'static str) -> Self {
        Self::new(name, Kind::Timestamp)
    }

    /// A list argument.
    #[must_use]
    pub fn list(name: &'static str, item: Kind, min_items: usize, max_items: usize) -> Self {
        Self::new(
            name,
            Kind::List {
                min_items,
                max_items,
                item: Box::new(item),
            },
        )
    }

    /// A string-to-string mapping argument.
    #[must_use]
    pub fn map(name: &'static str, max_entries: usize, key: StringKind, value: StringKind) -> Self {
        Self::new(
            name,
            Kind::Map {
                max_entries,
                key,
                value,
            },
        )
    }

    /// A nested object argument.
    #[must_use]
    pub fn object(name: &'static str, schema: ArgSchema) -> Self {
        Self::new(name, Kind::Object(schema))
    }

    /// A field with an already-built kind.
    #[must_use]
    pub fn of_kind(name: &'static str, kind: Kind) -> Self {
        Self::new(name, kind)
    }

    /// Bound the length of a string argument, in characters.
    #[must_use]
    pub fn len(mut self, min: usize, max: usize) -> Self {
        if let Kind::String(string) = &mut self.kind {
            string.min_len = min;
            string.max_len = Some(max);
        }
        self
    }

    /// Restrict a string argument to a character set.
    #[must_use]
    pub fn pattern(mut self, pattern: &'static Pattern) -> Self {
        if let Kind::String(string) = &mut self.kind {
            string.pattern = Some(pattern);
        }
        self
    }

    /// Reject string values starting with `prefix`, ignoring case.
    #[must_use]
    pub fn reserved_prefix(mut self, prefix: &'static str) -> Self {
        if let Kind::String(string) = &mut self.kind {
            string.reserved_prefix = Some(prefix);
        }
        self
    }

    /// Mark the argument as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value used when the argument is absent.
    #[must_use]
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Description shown to the calling agent.
    #[must_use]
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut schema = self.kind.to_json_schema();
        if let Value::Object(obj) = &mut schema {
            if !self.description.is_empty() {
                obj.insert("description".into(), json!(self.description));
            }
            if let Some(default) = &self.default {
                obj.insert("default".into(), default.clone());
            }
        }
        schema
    }
}

/// A constraint spanning several arguments.
#[derive(Debug, Clone)]
pub enum Rule {
    /// At least one of the named arguments must be present.
    AnyOf(&'static [&'static str]),
    /// `field` must be present when `when` holds one of `is_one_of`.
    RequiredWhen {
        /// The dependent argument.
        field: &'static str,
        /// The discriminating argument.
        when: &'static str,
        /// Values of `when` that make `field` required.
        is_one_of: &'static [&'static str],
    },
    /// `field` must be present whenever `with` is, unless one of `unless` is.
    RequiredWith {
        /// The dependent argument.
        field: &'static str,
        /// The argument that brings `field` along.
        with: &'static str,
        /// Arguments whose presence lifts the requirement.
        unless: &'static [&'static str],
    },
}

impl Rule {
    fn check(&self, parent: &str, args: &Map<String, Value>) -> Result<(), ToolError> {
        match self {
            Rule::AnyOf(names) => {
                if names.iter().any(|n| args.contains_key(*n)) {
                    return Ok(());
                }
                let paths: Vec<String> = names.iter().map(|n| join(parent, n)).collect();
                let msg = match paths.as_slice() {
                    [a, b] => format!("Either {a} or {b} must be provided"),
                    _ => format!("At least one of {} must be provided", paths.join(", ")),
                };
                Err(ToolError::InvalidValue(msg))
            }
            Rule::RequiredWhen {
                field,
                when,
                is_one_of,
            } => {
                let triggered = args
                    .get(*when)
                    .and_then(Value::as_str)
                    .is_some_and(|v| is_one_of.contains(&v));
                if triggered && !args.contains_key(*field) {
                    return Err(ToolError::InvalidValue(format!(
                        "{} is required when {} is {}",
                        join(parent, field),
                        join(parent, when),
                        is_one_of.join(" or ")
                    )));
                }
                Ok(())
            }
            Rule::RequiredWith {
                field,
                with,
                unless,
            } => {
                let exempt = unless.iter().any(|n| args.contains_key(*n));
                if !exempt && args.contains_key(*with) && !args.contains_key(*field) {
                    return Err(ToolError::InvalidValue(format!(
                        "{} is required when {} is provided",
                        join(parent, field),
                        join(parent, with)
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Declarative description of a tool's arguments.
#[derive(Debug, Clone, Default)]
pub struct ArgSchema {
    fields: Vec<Field>,
    rules: Vec<Rule>,
}

impl ArgSchema {
    /// An empty schema (the tool takes no arguments).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Fields are checked in the order they are added.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a cross-field rule, checked after all fields.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The declared fields.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The declared cross-field rules.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Check raw input against the schema.
    ///
    /// Returns the normalized argument object: absent optional arguments with
    /// a default are filled in, explicit `null`s are dropped. A `null` input is
    /// treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidType`] or [`ToolError::InvalidValue`] for
    /// the first violation found.
    pub fn validate(&self, input: Value) -> Result<Value, ToolError> {
        let map = match input {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => {
                return Err(ToolError::InvalidType(
                    "arguments must be a dictionary".to_string(),
                ));
            }
        };
        self.validate_map("", map).map(Value::Object)
    }

    fn validate_map(
        &self,
        parent: &str,
        mut map: Map<String, Value>,
    ) -> Result<Map<String, Value>, ToolError> {
        if let Some(unknown) = map
            .keys()
            .find(|k| !self.fields.iter().any(|f| f.name == k.as_str()))
        {
            return Err(ToolError::InvalidValue(format!(
                "unexpected argument: {}",
                join(parent, unknown)
            )));
        }

        let mut out = Map::new();
        for field in &self.fields {
            let path = join(parent, field.name);
            match map.remove(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        return Err(missing(&path));
                    }
                    if let Some(default) = &field.default {
                        out.insert(field.name.to_string(), default.clone());
                    }
                }
                Some(value) => {
                    if field.required && is_empty(&value) {
                        return Err(missing(&path));
                    }
                    let value = field.kind.check(&path, value)?;
                    out.insert(field.name.to_string(), value);
                }
            }
        }

        for rule in &self.rules {
            rule.check(parent, &out)?;
        }
        Ok(out)
    }

    /// Render the schema as a JSON Schema object.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
            "additionalProperties": false,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}
