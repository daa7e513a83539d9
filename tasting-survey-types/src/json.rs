//! The JSON document delivered as the email attachment.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::ResponseModel;

/// Media type of the serialized document.
pub const CONTENT_TYPE: &str = "application/json";

/// Serialize a response as indented UTF-8 JSON.
///
/// Non-ASCII text is written as-is and keys keep their declaration and
/// catalog order, so equal models always produce identical bytes.
pub fn to_json(model: &ResponseModel) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    model.serialize(&mut ser)?;
    Ok(buf)
}

/// Parse a document produced by [`to_json`].
pub fn from_json(bytes: &[u8]) -> Result<ResponseModel, serde_json::Error> {
    serde_json::from_slice(bytes)
}
