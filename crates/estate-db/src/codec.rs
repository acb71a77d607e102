//! Encoding and decoding of the whole save file.
//!
//! The file is one gzip-compressed JSON document:
//!
//! ```text
//! { "version": 1, "savedAt": "...", "players": { "<uuid>": { ...actor... } } }
//! ```
//!
//! Actors are decoded one at a time from raw JSON values, so a damaged
//! actor entry costs only that actor. Uncompressed JSON is accepted on
//! read for hand-edited files.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use estate_types::{ActorDefaults, ActorId, ActorState};

use crate::document::ActorDocument;
use crate::error::DbError;

/// Document format version written by [`encode`].
pub const FORMAT_VERSION: u32 = 1;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Every actor, keyed by id.
pub type Snapshot = BTreeMap<ActorId, ActorState>;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveDocument {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    players: BTreeMap<String, serde_json::Value>,
}

/// Serialize and compress every actor.
///
/// # Errors
///
/// Returns [`DbError::Serialization`] if a document cannot be built, or
/// [`DbError::Io`] if compression fails.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, DbError> {
    let mut players = BTreeMap::new();
    for (actor, state) in snapshot {
        let value = serde_json::to_value(ActorDocument::from(state))?;
        players.insert(actor.to_string(), value);
    }
    let document = SaveDocument {
        version: FORMAT_VERSION,
        saved_at: Some(Utc::now()),
        players,
    };

    let json = serde_json::to_vec(&document)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let bytes = encoder.finish()?;
    debug!(
        actors = snapshot.len(),
        raw_bytes = json.len(),
        compressed_bytes = bytes.len(),
        "Encoded save"
    );
    Ok(bytes)
}

/// Decompress and decode every actor.
///
/// Actors with an unparsable id or a malformed document are skipped with
/// a warning. Unknown catalog kinds inside an actor are dropped.
///
/// # Errors
///
/// Returns [`DbError::Corrupt`] if the root document cannot be
/// decompressed or parsed.
pub fn decode(bytes: &[u8], defaults: &ActorDefaults) -> Result<Snapshot, DbError> {
    let json = if bytes.starts_with(&GZIP_MAGIC) {
        let mut json = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut json)
            .map_err(|e| DbError::Corrupt(format!("decompression failed: {e}")))?;
        json
    } else {
        bytes.to_vec()
    };

    let document: SaveDocument = serde_json::from_slice(&json)
        .map_err(|e| DbError::Corrupt(format!("root document unreadable: {e}")))?;
    if document.version > FORMAT_VERSION {
        warn!(
            version = document.version,
            supported = FORMAT_VERSION,
            "Save written by a newer format version, loading what is understood"
        );
    }

    let mut snapshot = Snapshot::new();
    let mut skipped: usize = 0;
    for (key, value) in document.players {
        let actor: ActorId = match key.parse() {
            Ok(actor) => actor,
            Err(e) => {
                warn!(key = %key, error = %e, "Skipping actor with invalid id");
                skipped = skipped.saturating_add(1);
                continue;
            }
        };
        match serde_json::from_value::<ActorDocument>(value) {
            Ok(doc) => {
                snapshot.insert(actor, doc.into_state(defaults));
            }
            Err(e) => {
                warn!(%actor, error = %e, "Skipping malformed actor document");
                skipped = skipped.saturating_add(1);
            }
        }
    }

    debug!(
        actors = snapshot.len(),
        skipped,
        saved_at = ?document.saved_at,
        "Decoded save"
    );
    Ok(snapshot)
}
