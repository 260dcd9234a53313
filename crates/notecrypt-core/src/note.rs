//! Note-level helpers over the envelope cipher.
//!
//! A note's title and body are sealed as separate envelopes so the backend
//! stores two opaque strings per note, exactly as it would store plaintext.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::crypto::DerivedKey;
use crate::envelope;
use crate::error::Result;

/// Plaintext note as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

/// Note as handed to the CRUD layer: both fields are envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedNote {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Seal title and body of a note.
pub fn seal_note(draft: &NoteDraft, key: &DerivedKey) -> Result<SealedNote> {
    Ok(SealedNote {
        title: envelope::seal(&draft.title, key)?,
        content: envelope::seal(&draft.content, key)?,
    })
}

/// Open both fields of a stored note.
///
/// Fails as a whole if either field fails; a note is never returned with a
/// blank title or body standing in for undecryptable data.
pub fn open_note(sealed: &SealedNote, key: &DerivedKey) -> Result<NoteDraft> {
    Ok(NoteDraft {
        title: envelope::open(&sealed.title, key)?,
        content: envelope::open(&sealed.content, key)?,
    })
}

/// Seal any serializable value as JSON text.
pub fn seal_json<T: Serialize>(value: &T, key: &DerivedKey) -> Result<String> {
    let json = serde_json::to_string(value)?;
    envelope::seal(&json, key)
}

/// Open an envelope produced by [`seal_json`].
pub fn open_json<T: DeserializeOwned>(sealed: &str, key: &DerivedKey) -> Result<T> {
    let json = envelope::open(sealed, key)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KEY_LENGTH;
    use crate::error::NotecryptError;

    fn key(fill: u8) -> DerivedKey {
        DerivedKey::from_bytes([fill; KEY_LENGTH])
    }

    #[test]
    fn test_note_round_trip() {
        let draft = NoteDraft::new("Groceries", "Buy milk");
        let sealed = seal_note(&draft, &key(4)).unwrap();

        assert_ne!(sealed.title, draft.title);
        assert_ne!(sealed.content, draft.content);
        assert_eq!(open_note(&sealed, &key(4)).unwrap(), draft);
    }

    #[test]
    fn test_empty_note_round_trip() {
        let draft = NoteDraft::new("", "");
        let sealed = seal_note(&draft, &key(4)).unwrap();
        assert_eq!(open_note(&sealed, &key(4)).unwrap(), draft);
    }

    #[test]
    fn test_one_bad_field_fails_whole_note() {
        let draft = NoteDraft::new("Title", "Body");
        let mut sealed = seal_note(&draft, &key(4)).unwrap();
        sealed.content = seal_note(&draft, &key(5)).unwrap().content;

        assert!(matches!(
            open_note(&sealed, &key(4)),
            Err(NotecryptError::Decryption(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Settings {
            theme: String,
            pinned: Vec<u32>,
        }

        let value = Settings {
            theme: "dark".to_string(),
            pinned: vec![3, 1, 4],
        };
        let sealed = seal_json(&value, &key(4)).unwrap();
        let opened: Settings = open_json(&sealed, &key(4)).unwrap();
        assert_eq!(opened, value);
    }

    #[test]
    fn test_json_type_mismatch_is_json_error() {
        let sealed = seal_json(&"just a string", &key(4)).unwrap();
        let result: Result<Vec<u32>> = open_json(&sealed, &key(4));
        assert!(matches!(result, Err(NotecryptError::Json { .. })));
    }
}
