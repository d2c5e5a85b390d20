//! Corpus source: turns a challenge-data directory of `<id>.pem` public keys
//! and `<id>.bin` ciphertexts into scanner entries.

use crate::error::CrackError;
use cipher::rsa::PublicKey;
use encode::der;
use encode::pem::Pem;
use scanner::{CorpusEntry, KeyId};
use std::path::Path;

const SPKI_LABEL: &str = "PUBLIC KEY";
const PKCS1_LABEL: &str = "RSA PUBLIC KEY";

/// Enumerates every `<id>.pem`/`<id>.bin` pair under `dir`, sorted by id so
/// the scan order never depends on directory enumeration order.
pub fn load_corpus(dir: &Path) -> Result<Vec<CorpusEntry>, CrackError> {
    if !dir.is_dir() {
        return Err(CrackError::PathNotExist(dir.display().to_string()));
    }

    let mut entries = Vec::new();
    let items = std::fs::read_dir(dir)
        .map_err(|e| CrackError::Io(dir.display().to_string(), e.to_string()))?;
    for item in items {
        let path = item
            .map_err(|e| CrackError::Io(dir.display().to_string(), e.to_string()))?
            .path();
        if path.extension().and_then(|x| x.to_str()) != Some("pem") {
            continue;
        }

        let id = key_id(&path)?;
        let key = load_public_key(&path)?;

        let cipher_path = path.with_extension("bin");
        let ciphertext = std::fs::read(&cipher_path).map_err(|e| {
            CrackError::MissingCiphertext(cipher_path.display().to_string(), e.to_string())
        })?;

        entries.push(CorpusEntry::new(id, key, ciphertext));
    }

    entries.sort_by_key(|x| x.id);
    Ok(entries)
}

fn key_id(path: &Path) -> Result<KeyId, CrackError> {
    path.file_stem()
        .and_then(|x| x.to_str())
        .unwrap_or_default()
        .parse()
        .map_err(|_| CrackError::InvalidStem(path.display().to_string()))
}

/// Accepts both armors PyCrypto's `importKey` writes: the X.509
/// SubjectPublicKeyInfo wrapper and the bare PKCS#1 structure.
fn load_public_key(path: &Path) -> Result<PublicKey, CrackError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CrackError::Io(path.display().to_string(), e.to_string()))?;

    let invalid = |e: String| CrackError::InvalidKeyFile(path.display().to_string(), e);
    let pem = Pem::parse(&text).map_err(|e| invalid(e.to_string()))?;
    let (n, e) = match pem.label.as_str() {
        SPKI_LABEL => der::subject_public_key_info_from_der(&pem.data),
        PKCS1_LABEL => der::rsa_public_key_from_der(&pem.data),
        other => return Err(invalid(format!("unexpected PEM label `{other}`"))),
    }
    .map_err(|e| invalid(e.to_string()))?;

    Ok(PublicKey::from_be_bytes(&n, &e))
}
