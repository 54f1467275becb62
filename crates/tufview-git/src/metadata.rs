// Copyright The gittuf Authors
// SPDX-License-Identifier: Apache-2.0

//! Metadata envelope extraction and decoding
//!
//! gittuf stores each metadata file under `metadata/` in the policy ref's
//! tree as a signing envelope: a JSON object whose `payload` field holds the
//! base64-encoded metadata document. This module pulls that blob out of a
//! commit and returns the decoded document as an uninterpreted JSON value.
//! Signatures are not verified.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use git2::{ErrorCode, ObjectType, Oid};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{FormatStage, RepoError};
use crate::repository::RepoHandle;

/// Tree directory that holds metadata envelopes
pub const METADATA_DIR: &str = "metadata";

/// Decode `metadata/<file>` as it exists in `commit`
///
/// # Errors
///
/// - `CommitNotFound` if `commit` is not a commit in the repository
/// - `FileNotFound` if the commit's tree has no blob at `metadata/<file>`
/// - `ReadBlob` if the tree or blob cannot be read
/// - `Format` if the envelope or its payload is malformed
pub fn decode(handle: &RepoHandle, commit: &str, file: &str) -> Result<Value, RepoError> {
    info!(file, commit, "Decoding metadata");
    let bytes = read_metadata_blob(handle, commit, file)?;
    decode_envelope(&bytes)
}

/// Read the raw envelope bytes for `metadata/<file>` in `commit`
///
/// # Errors
///
/// See [`decode`].
pub fn read_metadata_blob(
    handle: &RepoHandle,
    commit: &str,
    file: &str,
) -> Result<Vec<u8>, RepoError> {
    let repo = handle.repo();
    let not_found = || RepoError::CommitNotFound {
        commit: commit.to_string(),
    };

    let oid = Oid::from_str(commit).map_err(|_| not_found())?;
    let git_commit = repo.find_commit(oid).map_err(|_| not_found())?;

    let tree_path = format!("{METADATA_DIR}/{file}");
    let read_err = |source| RepoError::ReadBlob {
        path: tree_path.clone(),
        commit: commit.to_string(),
        source,
    };
    let file_not_found = || RepoError::FileNotFound {
        path: tree_path.clone(),
        commit: commit.to_string(),
    };

    let tree = git_commit.tree().map_err(read_err)?;
    let entry = match tree.get_path(Path::new(&tree_path)) {
        Ok(entry) => entry,
        Err(e) if e.code() == ErrorCode::NotFound => return Err(file_not_found()),
        Err(e) => return Err(read_err(e)),
    };
    if entry.kind() != Some(ObjectType::Blob) {
        return Err(file_not_found());
    }

    let blob = repo.find_blob(entry.id()).map_err(read_err)?;
    debug!(path = %tree_path, size = blob.size(), "Found metadata blob");
    Ok(blob.content().to_vec())
}

/// Decode a signing envelope into the JSON document it carries
///
/// Surrounding whitespace and embedded line breaks in the payload are
/// ignored, so wrapped base64 blocks decode the same as unwrapped ones.
///
/// # Errors
///
/// Returns `RepoError::Format` naming the first stage that failed.
pub fn decode_envelope(bytes: &[u8]) -> Result<Value, RepoError> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| RepoError::format(FormatStage::Envelope, e))?;

    let envelope: Value =
        serde_json::from_str(text).map_err(|e| RepoError::format(FormatStage::Envelope, e))?;
    let Value::Object(envelope) = envelope else {
        return Err(RepoError::format(
            FormatStage::Envelope,
            "expected a JSON object",
        ));
    };

    let payload = match envelope.get("payload") {
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(RepoError::format(FormatStage::Payload, "not a string"));
        }
        None => return Err(RepoError::format(FormatStage::Payload, "missing")),
    };

    let decoded = STANDARD
        .decode(normalize_payload(payload))
        .map_err(|e| RepoError::format(FormatStage::Base64, e))?;

    let document: Value = serde_json::from_slice(&decoded)
        .map_err(|e| RepoError::format(FormatStage::DecodedJson, e))?;
    if !document.is_object() {
        return Err(RepoError::format(
            FormatStage::DecodedJson,
            "expected a JSON object",
        ));
    }
    Ok(document)
}

/// Strip surrounding whitespace and line breaks from a base64 block
fn normalize_payload(payload: &str) -> String {
    payload
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r'))
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        /// Property: line breaks inserted anywhere in the payload do not
        /// change the decoded document
        #[test]
        fn prop_line_breaks_are_ignored(
            value in "[a-zA-Z0-9 ]{0,64}",
            positions in proptest::collection::vec(any::<prop::sample::Index>(), 0..6),
        ) {
            let document = json!({ "value": value });
            let encoded = STANDARD.encode(serde_json::to_vec(&document).unwrap());

            let mut wrapped: Vec<char> = encoded.chars().collect();
            for pos in positions {
                let at = pos.index(wrapped.len() + 1);
                wrapped.insert(at, '\n');
            }
            let wrapped: String = wrapped.into_iter().collect();

            let bytes = serde_json::to_vec(&json!({ "payload": wrapped })).unwrap();
            let decoded = decode_envelope(&bytes).expect("decode");
            prop_assert_eq!(decoded, document);
        }

        /// Property: any JSON object survives encode-then-decode unchanged
        #[test]
        fn prop_object_payload_roundtrip(
            entries in proptest::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8)
        ) {
            let document = serde_json::to_value(&entries).unwrap();
            let encoded = STANDARD.encode(serde_json::to_vec(&document).unwrap());
            let bytes = serde_json::to_vec(&json!({ "payload": encoded })).unwrap();
            prop_assert_eq!(decode_envelope(&bytes).expect("decode"), document);
        }

        /// Property: decoding arbitrary bytes never panics
        #[test]
        fn prop_arbitrary_bytes_do_not_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let _ = decode_envelope(&bytes);
        }
    }
}
