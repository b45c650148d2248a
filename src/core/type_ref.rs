//! Type identity - WHICH type a contract, part, or member refers to.
//!
//! A TypeRef is a qualified path (`app::logging::Sink`) plus an optional list
//! of generic arguments (`composition::Lazy<app::Sink, app::SinkMeta>`).
//! TypeRefs are interned, so equality and hashing are pointer operations and
//! the handle is `Copy`.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{LazyLock, RwLock};

use serde::{Deserialize, Serialize};

use crate::core::error::{DescriptorError, Result};

/// Path separator between namespace segments.
pub const PATH_SEPARATOR: &str = "::";

/// Deepest generic nesting the parser accepts.
pub const MAX_TYPE_DEPTH: usize = 64;

/// Global type interner, keyed by full name.
static TYPE_INTERNER: LazyLock<RwLock<HashMap<String, &'static TypeRefInner>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// An interned type identity.
#[derive(Clone, Copy)]
pub struct TypeRef {
    inner: &'static TypeRefInner,
}

#[derive(Debug)]
struct TypeRefInner {
    /// Qualified path without generic arguments
    path: String,
    /// Byte offset of the simple name within `path`
    name_start: usize,
    args: Vec<TypeRef>,
    /// Path plus rendered arguments; also the interner key
    full_name: String,
}

impl TypeRef {
    /// Create a type identity from a qualified path and generic arguments.
    pub fn new(path: &str, args: Vec<TypeRef>) -> Result<Self> {
        validate_path(path)?;

        let full_name = render_full_name(path, &args);
        let name_start = path
            .rfind(PATH_SEPARATOR)
            .map(|i| i + PATH_SEPARATOR.len())
            .unwrap_or(0);

        Ok(Self::intern(TypeRefInner {
            path: path.to_string(),
            name_start,
            args,
            full_name,
        }))
    }

    /// Create a non-generic type identity.
    pub fn simple(path: &str) -> Result<Self> {
        Self::new(path, Vec::new())
    }

    /// Parse a type identity such as `a::b::Name<Arg1, a::Arg2<X>>`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parser = TypeParser::new(text);
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if !parser.at_end() {
            return Err(DescriptorError::invalid(
                "type_identity",
                format!(
                    "unexpected `{}` after type in `{}`",
                    parser.rest(),
                    text
                ),
            ));
        }
        Ok(ty)
    }

    fn intern(inner: TypeRefInner) -> Self {
        // Fast path: check if already interned
        {
            let interner = TYPE_INTERNER.read().unwrap_or_else(|e| e.into_inner());
            if let Some(&interned) = interner.get(&inner.full_name) {
                return TypeRef { inner: interned };
            }
        }

        let mut interner = TYPE_INTERNER.write().unwrap_or_else(|e| e.into_inner());

        // Double-check after acquiring write lock
        if let Some(&interned) = interner.get(&inner.full_name) {
            return TypeRef { inner: interned };
        }

        let key = inner.full_name.clone();
        let leaked: &'static TypeRefInner = Box::leak(Box::new(inner));
        interner.insert(key, leaked);

        TypeRef { inner: leaked }
    }

    /// Unqualified simple name, without namespace or generic arguments.
    pub fn name(&self) -> &'static str {
        &self.inner.path[self.inner.name_start..]
    }

    /// Namespace path, empty for types declared at the root.
    pub fn namespace(&self) -> &'static str {
        if self.inner.name_start == 0 {
            ""
        } else {
            &self.inner.path[..self.inner.name_start - PATH_SEPARATOR.len()]
        }
    }

    /// Qualified path without generic arguments.
    pub fn generic_definition(&self) -> &'static str {
        &self.inner.path
    }

    /// Generic arguments, in declaration order.
    pub fn type_args(&self) -> &'static [TypeRef] {
        &self.inner.args
    }

    /// Number of generic arguments.
    pub fn arity(&self) -> usize {
        self.inner.args.len()
    }

    pub fn is_generic(&self) -> bool {
        !self.inner.args.is_empty()
    }

    /// Qualified path including rendered generic arguments.
    pub fn full_name(&self) -> &'static str {
        &self.inner.full_name
    }
}

fn render_full_name(path: &str, args: &[TypeRef]) -> String {
    if args.is_empty() {
        return path.to_string();
    }
    let rendered: Vec<&str> = args.iter().map(|a| a.full_name()).collect();
    format!("{}<{}>", path, rendered.join(", "))
}

pub(crate) fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DescriptorError::invalid(
            "type_identity",
            "type path is empty",
        ));
    }
    for segment in path.split(PATH_SEPARATOR) {
        if !is_identifier(segment) {
            return Err(DescriptorError::invalid(
                "type_identity",
                format!("`{}` is not a valid path segment in `{}`", segment, path),
            ));
        }
    }
    Ok(())
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Recursive-descent parser for type names.
struct TypeParser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> TypeParser<'a> {
    fn new(src: &'a str) -> Self {
        TypeParser {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn error(&self, reason: impl Into<String>) -> DescriptorError {
        DescriptorError::invalid(
            "type_identity",
            format!("{} in `{}`", reason.into(), self.src),
        )
    }

    fn parse_type(&mut self) -> Result<TypeRef> {
        self.skip_whitespace();
        let path = self.parse_path()?;

        self.skip_whitespace();
        let mut args = Vec::new();
        if self.peek() == Some('<') {
            if self.depth == MAX_TYPE_DEPTH {
                return Err(DescriptorError::invalid(
                    "type_identity",
                    format!(
                        "generic arguments of `{}` nest deeper than {} levels",
                        path, MAX_TYPE_DEPTH
                    ),
                ));
            }
            self.pos += 1;
            self.depth += 1;
            loop {
                args.push(self.parse_type()?);
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => self.pos += 1,
                    Some('>') => {
                        self.pos += 1;
                        self.depth -= 1;
                        break;
                    }
                    Some(c) => {
                        return Err(self.error(format!("expected `,` or `>`, found `{}`", c)))
                    }
                    None => return Err(self.error("unbalanced `<`")),
                }
            }
        }

        TypeRef::new(path, args)
    }

    fn parse_path(&mut self) -> Result<&'a str> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else if c == ':' && self.rest().starts_with(PATH_SEPARATOR) {
                self.pos += PATH_SEPARATOR.len();
            } else {
                break;
            }
        }

        if start == self.pos {
            return match self.peek() {
                Some(c) => Err(self.error(format!("expected a type name, found `{}`", c))),
                None => Err(self.error("expected a type name")),
            };
        }
        Ok(&self.src[start..self.pos])
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.inner, other.inner)
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.inner, state)
    }
}

impl PartialOrd for TypeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.full_name.cmp(&other.inner.full_name)
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.inner.full_name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.full_name)
    }
}

impl std::str::FromStr for TypeRef {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self> {
        TypeRef::parse(s)
    }
}

impl Serialize for TypeRef {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.full_name())
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        TypeRef::parse(&text).map_err(serde::de::Error::custom)
    }
}
