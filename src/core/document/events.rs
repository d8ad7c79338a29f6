//! Parse events over a JSON document.
//!
//! Top-level values are delimited with `serde_json`'s stream deserializer,
//! so a document may be one value, an array of maps, or several values back
//! to back. Each value is then driven through a visitor that reports every
//! token to an [`EventSink`] as it is read. Nothing is collected into a map
//! first, so a repeated object key reaches the sink once per occurrence.

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::Number;

use crate::core::error::{KeyError, KeyResult};

/// One event produced while walking a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParseEvent<'a> {
    /// `{`
    MapOpen,
    /// `}`
    MapClose,
    /// `[`
    ArrayOpen,
    /// `]`
    ArrayClose,
    /// An object key.
    MapKey(&'a str),
    /// A string value.
    String(&'a str),
    /// A numeric value, unconverted.
    Number(&'a Number),
}

/// Receiver of parse events.
pub trait EventSink {
    /// Handles one event. An error stops the walk.
    ///
    /// # Errors
    ///
    /// Implementations return whatever error makes the document invalid.
    fn event(&mut self, event: ParseEvent<'_>) -> KeyResult<()>;
}

/// Walks every top-level value in `text`, reporting events to `sink`.
///
/// Returns the number of top-level values seen.
///
/// # Errors
///
/// - [`KeyError::CorruptData`] if the text is not valid JSON, or holds a
///   boolean or `null` anywhere
/// - any error returned by `sink`
pub fn walk_document<S: EventSink>(text: &str, sink: &mut S) -> KeyResult<usize> {
    let mut walker = Walker {
        sink,
        failure: None,
    };
    let mut values = serde_json::Deserializer::from_str(text).into_iter::<IgnoredAny>();
    let mut start = 0;
    let mut count = 0;

    while let Some(value) = values.next() {
        value.map_err(|_| KeyError::CorruptData)?;
        let end = values.byte_offset();

        let mut de = serde_json::Deserializer::from_str(&text[start..end]);
        (&mut walker)
            .deserialize(&mut de)
            .and_then(|()| de.end())
            .map_err(|_| walker.failure.take().unwrap_or(KeyError::CorruptData))?;

        start = end;
        count += 1;
    }
    Ok(count)
}

/// Visitor that forwards tokens to a sink.
///
/// A sink error is parked in `failure` so it survives the trip through
/// `serde_json::Error`.
struct Walker<'s, S> {
    sink: &'s mut S,
    failure: Option<KeyError>,
}

impl<S: EventSink> Walker<'_, S> {
    fn emit<E: de::Error>(&mut self, event: ParseEvent<'_>) -> Result<(), E> {
        self.sink.event(event).map_err(|err| {
            self.failure = Some(err);
            E::custom("rejected")
        })
    }
}

impl<'de, S: EventSink> DeserializeSeed<'de> for &mut Walker<'_, S> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, S: EventSink> Visitor<'de> for &mut Walker<'_, S> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map, array, string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<(), E> {
        self.emit(ParseEvent::String(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<(), E> {
        self.emit(ParseEvent::Number(&Number::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<(), E> {
        self.emit(ParseEvent::Number(&Number::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<(), E> {
        let number = Number::from_f64(v).ok_or_else(|| E::custom("non-finite number"))?;
        self.emit(ParseEvent::Number(&number))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        self.emit(ParseEvent::MapOpen)?;
        while let Some(key) = map.next_key::<String>()? {
            self.emit(ParseEvent::MapKey(&key))?;
            map.next_value_seed(&mut *self)?;
        }
        self.emit(ParseEvent::MapClose)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        self.emit(ParseEvent::ArrayOpen)?;
        while seq.next_element_seed(&mut *self)?.is_some() {}
        self.emit(ParseEvent::ArrayClose)
    }
}
