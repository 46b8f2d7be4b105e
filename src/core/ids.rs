//! Opaque session identifiers.
//!
//! Identifiers are strings chosen by the hosting application (room codes,
//! user ids, card names). The engine only compares them for equality and
//! never interprets their contents.
//!
//! ```
//! use table_sync::core::{GameId, RoomId};
//!
//! let game = GameId::new("game-42");
//! let room: RoomId = "table-7".into();
//! assert_eq!(game.as_str(), "game-42");
//! assert_eq!(format!("{}", room), "table-7");
//! ```

/// Declares a string-backed identifier newtype.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

pub(crate) use opaque_id;

opaque_id!(
    /// Identifier of one game. Envelopes carrying another id are ignored.
    GameId
);

opaque_id!(
    /// Identifier of the relay room the session's peers share.
    RoomId
);

opaque_id!(
    /// Identifier of an opposing commander card, keying commander damage.
    CommanderId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_conversions() {
        let a = GameId::new("g1");
        let b: GameId = "g1".into();
        let c: GameId = String::from("g1").into();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "g1");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = CommanderId::new("Atraxa");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Atraxa\"");

        let back: CommanderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
