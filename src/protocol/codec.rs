//! JSON wire codec.
//!
//! ```json
//! {
//!   "gameId": "g1",
//!   "type": "life-change",
//!   "playerId": "p2",
//!   "data": { "playerId": "p2", "newTotal": 25 },
//!   "timestamp": 1700000000000
//! }
//! ```
//!
//! Decoding reads the raw `type` string before touching `data`, so a frame
//! from a newer protocol version fails with `UnrecognizedEnvelopeType`
//! instead of a generic parse error. Unknown fields inside `data` are
//! ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::{Envelope, Update, UpdateKind};
use crate::core::{GameId, PlayerId, Timestamp};
use crate::error::{SyncError, SyncResult};

/// Envelope as it appears on the wire, with the payload still untyped.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEnvelope {
    pub game_id: GameId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub data: Value,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
}

impl WireEnvelope {
    /// Type the payload according to `type`.
    pub fn into_envelope(self) -> SyncResult<Envelope> {
        let kind: UpdateKind = self.kind.parse()?;
        let update = match kind {
            UpdateKind::LifeChange => Update::LifeChange(payload(kind, self.data)?),
            UpdateKind::CommanderDamage => Update::CommanderDamage(payload(kind, self.data)?),
            UpdateKind::CounterChange => Update::CounterChange(payload(kind, self.data)?),
            UpdateKind::TurnPass => Update::TurnPass(payload(kind, self.data)?),
            UpdateKind::GameStart => Update::GameStart(payload(kind, self.data)?),
            UpdateKind::GameEnd => Update::GameEnd(payload(kind, self.data)?),
        };
        Ok(Envelope {
            game_id: self.game_id,
            player_id: self.player_id,
            update,
            timestamp: self.timestamp,
        })
    }
}

impl TryFrom<&Envelope> for WireEnvelope {
    type Error = SyncError;

    fn try_from(envelope: &Envelope) -> SyncResult<Self> {
        let data = match &envelope.update {
            Update::LifeChange(p) => serde_json::to_value(p)?,
            Update::CommanderDamage(p) => serde_json::to_value(p)?,
            Update::CounterChange(p) => serde_json::to_value(p)?,
            Update::TurnPass(p) => serde_json::to_value(p)?,
            Update::GameStart(p) => serde_json::to_value(p)?,
            Update::GameEnd(p) => serde_json::to_value(p)?,
        };
        Ok(Self {
            game_id: envelope.game_id.clone(),
            kind: envelope.kind().as_str().to_string(),
            player_id: envelope.player_id.clone(),
            data,
            timestamp: envelope.timestamp,
        })
    }
}

fn payload<T: DeserializeOwned>(kind: UpdateKind, data: Value) -> SyncResult<T> {
    // `game-end` may legitimately travel without a payload.
    let data = if data.is_null() && kind == UpdateKind::GameEnd {
        Value::Object(serde_json::Map::new())
    } else {
        data
    };
    serde_json::from_value(data)
        .map_err(|e| SyncError::MalformedEnvelope(format!("{kind} payload: {e}")))
}

/// Encode an envelope as a JSON frame.
pub fn encode(envelope: &Envelope) -> SyncResult<String> {
    let wire = WireEnvelope::try_from(envelope)?;
    Ok(serde_json::to_string(&wire)?)
}

/// Decode a JSON frame.
pub fn decode(frame: &str) -> SyncResult<Envelope> {
    let wire: WireEnvelope = serde_json::from_str(frame)
        .map_err(|e| SyncError::MalformedEnvelope(e.to_string()))?;
    wire.into_envelope()
}
