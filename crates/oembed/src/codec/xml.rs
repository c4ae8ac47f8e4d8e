//! XML response codec.
//!
//! Maps an `<oembed>` document onto the same shape a JSON response has: the
//! root element is dropped and its children become top-level keys. Text-only
//! elements become strings, elements with children or attributes become
//! objects (text alongside them lands under `content`), and repeated sibling
//! names collect into arrays.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

struct Frame {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, String> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut fields = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            insert_field(&mut fields, key, Value::String(value.into_owned()));
        }
        Ok(Self {
            name,
            fields,
            text: String::new(),
        })
    }

    fn into_value(self) -> Value {
        if self.fields.is_empty() {
            return Value::String(self.text);
        }
        let mut fields = self.fields;
        if !self.text.is_empty() {
            insert_field(&mut fields, "content".to_string(), Value::String(self.text));
        }
        Value::Object(fields)
    }
}

fn insert_field(fields: &mut Map<String, Value>, key: String, value: Value) {
    match fields.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(key, value);
        }
    }
}

/// Decodes an XML response body.
pub(super) fn decode(body: &[u8]) -> Result<Map<String, Value>, String> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("at byte {}: {e}", reader.buffer_position()))?;
        match event {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                match stack.last_mut() {
                    Some(parent) => {
                        insert_field(&mut parent.fields, frame.name.clone(), frame.into_value())
                    }
                    None => return Ok(frame.fields),
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| e.to_string())?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| "unexpected closing tag".to_string())?;
                match stack.last_mut() {
                    Some(parent) => {
                        let name = frame.name.clone();
                        insert_field(&mut parent.fields, name, frame.into_value());
                    }
                    None => return Ok(frame.fields),
                }
            }
            Event::Eof => {
                return Err(match stack.last() {
                    Some(open) => format!("unexpected end of document inside <{}>", open.name),
                    None => "document has no root element".to_string(),
                });
            }
            _ => {}
        }
    }
}
