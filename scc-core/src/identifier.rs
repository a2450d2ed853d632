//! Identifier - Composite identifiers for remote resources
//!
//! A remote resource is often addressed by several keys (service instance,
//! parent, child). They are packed into one opaque identifier by joining
//! them with `/`. Segments that themselves contain `/` or `%` are
//! percent-escaped so decoding always yields the original parts.

use chrono::Utc;

pub const SEPARATOR: char = '/';

/// Identifier decoding error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("Identifier '{0}' has no '/' separator")]
    MissingSeparator(String),

    #[error("Identifier '{id}' has {got} segments, expected {expected}")]
    SegmentCount {
        id: String,
        expected: usize,
        got: usize,
    },

    #[error("Identifier '{0}' has an empty segment")]
    EmptySegment(String),

    #[error("Identifier '{0}' has an invalid escape sequence")]
    InvalidEscape(String),
}

/// A named tuple of keys that round-trips through one identifier string
pub trait CompositeKey: Sized {
    /// Part names, in identifier order
    const PARTS: &'static [&'static str];

    fn segments(&self) -> Vec<&str>;

    /// Build from exactly `PARTS.len()` segments
    fn from_segments(segments: Vec<String>) -> Self;

    fn encode(&self) -> String {
        encode_segments(&self.segments())
    }

    fn decode(id: &str) -> Result<Self, IdentifierError> {
        decode_segments(id, Self::PARTS.len()).map(Self::from_segments)
    }
}

/// Declare a [`CompositeKey`] struct with one `String` field per part
#[macro_export]
macro_rules! composite_key {
    ($(#[$meta:meta])* $name:ident { $($field:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            $(pub $field: String,)+
        }

        impl $crate::identifier::CompositeKey for $name {
            const PARTS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn segments(&self) -> Vec<&str> {
                vec![$(self.$field.as_str()),+]
            }

            fn from_segments(segments: Vec<String>) -> Self {
                let mut segments = segments.into_iter();
                Self {
                    $($field: segments.next().unwrap_or_default(),)+
                }
            }
        }
    };
}

pub fn encode_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| escape(s.as_ref()))
        .collect::<Vec<_>>()
        .join("/")
}

pub fn decode_segments(id: &str, expected: usize) -> Result<Vec<String>, IdentifierError> {
    if expected > 1 && !id.contains(SEPARATOR) {
        return Err(IdentifierError::MissingSeparator(id.to_string()));
    }

    let parts: Vec<&str> = id.split(SEPARATOR).collect();
    if parts.len() != expected {
        return Err(IdentifierError::SegmentCount {
            id: id.to_string(),
            expected,
            got: parts.len(),
        });
    }
    if parts.iter().any(|p| p.is_empty()) {
        return Err(IdentifierError::EmptySegment(id.to_string()));
    }

    parts
        .into_iter()
        .map(|p| unescape(p).ok_or_else(|| IdentifierError::InvalidEscape(id.to_string())))
        .collect()
}

/// Identifier for list-style reads with no natural key.
///
/// Changes on every call.
pub fn timestamp_identifier() -> String {
    Utc::now().to_string()
}

fn escape(segment: &str) -> String {
    segment.replace('%', "%25").replace('/', "%2F")
}

fn unescape(segment: &str) -> Option<String> {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let code = rest.get(pos + 1..pos + 3)?;
        match code.to_ascii_uppercase().as_str() {
            "25" => out.push('%'),
            "2F" => out.push('/'),
            _ => return None,
        }
        rest = &rest[pos + 3..];
    }
    out.push_str(rest);
    Some(out)
}
