//! v002 -- Canonical favorite fields.
//!
//! Older clients wrote favorites with `movieId` or `id` for the catalog
//! title, `poster` for the poster path and `userId` for the owner.  Every
//! favorite is rewritten to `titleId` / `posterPath` / `ownerId`.  Documents
//! without a usable title id or owner cannot be served and are removed.

use rusqlite::{params, Connection};
use serde_json::{Map, Value};

use streamverse_shared::constants::COLLECTION_FAVORITES;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    let docs: Vec<(String, String, String)> = {
        let mut stmt = conn
            .prepare("SELECT key, body, created_at FROM documents WHERE collection = ?1")?;
        let rows = stmt.query_map(params![COLLECTION_FAVORITES], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;
        let collected = rows.collect::<Result<Vec<_>, _>>()?;
        collected
    };

    let mut rewritten = 0usize;
    let mut dropped = 0usize;

    for (key, body, created_at) in docs {
        let canonical = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| match v {
                Value::Object(map) => canonicalize(map, &created_at),
                _ => None,
            });

        match canonical {
            Some(map) => {
                let new_body = Value::Object(map).to_string();
                if new_body != body {
                    conn.execute(
                        "UPDATE documents SET body = ?1 WHERE collection = ?2 AND key = ?3",
                        params![new_body, COLLECTION_FAVORITES, key],
                    )?;
                    rewritten += 1;
                }
            }
            None => {
                tracing::warn!(key = %key, "dropping favorite without title id or owner");
                conn.execute(
                    "DELETE FROM documents WHERE collection = ?1 AND key = ?2",
                    params![COLLECTION_FAVORITES, key],
                )?;
                dropped += 1;
            }
        }
    }

    if rewritten > 0 || dropped > 0 {
        tracing::info!(rewritten, dropped, "favorites canonicalised");
    }
    Ok(())
}

/// Rename legacy fields in place.  `None` when the document is unusable.
fn canonicalize(mut map: Map<String, Value>, created_at: &str) -> Option<Map<String, Value>> {
    let legacy_title = map.remove("movieId");
    let legacy_id = map.remove("id");
    let title_id = map
        .remove("titleId")
        .or(legacy_title)
        .or(legacy_id)
        .and_then(|v| as_title_id(&v))?;
    map.insert("titleId".into(), Value::from(title_id));

    if let Some(poster) = map.remove("poster") {
        map.entry("posterPath").or_insert(poster);
    }

    let legacy_owner = map.remove("userId");
    let owner = map.remove("ownerId").or(legacy_owner)?;
    if !owner.is_string() {
        return None;
    }
    map.insert("ownerId".into(), owner);

    map.entry("title").or_insert_with(|| Value::from(""));
    map.entry("createdAt")
        .or_insert_with(|| Value::from(created_at));

    Some(map)
}

/// Title ids were sometimes stored as numeric strings.
fn as_title_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
