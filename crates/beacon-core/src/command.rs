use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::RelayError;

/// An opaque controller command.
///
/// Any well-formed JSON document is accepted. By convention commands carry a
/// `type` field, but the relay never inspects the payload beyond parsing it;
/// whatever the controller sends is forwarded verbatim to every display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(Value);

impl Command {
    /// Parse a raw request body. This is the only validation the relay does.
    pub fn parse(raw: &[u8]) -> Result<Self, RelayError> {
        serde_json::from_slice(raw)
            .map(Self)
            .map_err(|err| RelayError::MalformedCommand(err.to_string()))
    }

    /// The conventional `type` field, when present and a string.
    pub fn command_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Compact wire encoding. Produced once per publish and shared by every
    /// subscriber queue.
    pub fn to_wire(&self) -> String {
        self.0.to_string()
    }
}

impl From<Value> for Command {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_any_json_document() {
        let cmd = Command::parse(br#"{"type":"flash","ms":200}"#).unwrap();
        assert_eq!(cmd.command_type(), Some("flash"));

        // Non-object documents are fine too; the payload is opaque.
        assert!(Command::parse(b"[1,2,3]").is_ok());
        assert!(Command::parse(b"\"ping\"").is_ok());
        assert!(Command::parse(b"42").is_ok());
    }

    #[test]
    fn rejects_malformed_bodies() {
        for raw in [&b"not-json"[..], &b"{"[..], &b""[..], &b"{\"type\":"[..]] {
            let err = Command::parse(raw).unwrap_err();
            assert_eq!(err.kind(), "malformed_command", "body: {raw:?}");
        }
    }

    #[test]
    fn command_type_absent_or_not_a_string() {
        let cmd = Command::from(json!({"kind": "flash"}));
        assert_eq!(cmd.command_type(), None);

        let cmd = Command::from(json!({"type": 7}));
        assert_eq!(cmd.command_type(), None);
    }

    #[test]
    fn wire_encoding_is_compact() {
        let cmd = Command::from(json!({"type": "clear"}));
        assert_eq!(cmd.to_wire(), r#"{"type":"clear"}"#);
    }

    #[test]
    fn serde_is_transparent() {
        let cmd = Command::from(json!({"type": "goto", "slide": 3}));
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
