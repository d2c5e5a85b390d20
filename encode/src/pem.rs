//! RFC 7468 textual armor around DER payloads.

use crate::base::Base64;
use crate::{Decode, Encode, EncodeError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pem {
    pub label: String,
    pub data: Vec<u8>,
}

impl Pem {
    const BEGIN: &'static str = "-----BEGIN ";
    const END: &'static str = "-----END ";
    const TAIL: &'static str = "-----";
    const WRAP: usize = 64;

    pub fn new(label: &str, data: Vec<u8>) -> Self {
        Self {
            label: label.to_string(),
            data,
        }
    }

    /// Parses the first armored block found in `text`.
    pub fn parse(text: &str) -> Result<Self, EncodeError> {
        let begin = text
            .find(Self::BEGIN)
            .ok_or_else(|| EncodeError::InvalidPem("missing BEGIN boundary".to_string()))?;
        let rest = &text[begin + Self::BEGIN.len()..];

        let label_end = rest
            .find(Self::TAIL)
            .ok_or_else(|| EncodeError::InvalidPem("unterminated BEGIN boundary".to_string()))?;
        let label = rest[..label_end].to_string();
        let body = &rest[label_end + Self::TAIL.len()..];

        let end_marker = format!("{}{}{}", Self::END, label, Self::TAIL);
        let body_end = body.find(&end_marker).ok_or_else(|| {
            EncodeError::InvalidPem(format!("missing END boundary for `{label}`"))
        })?;

        let mut b64 = body[..body_end].as_bytes();
        let mut data = Vec::with_capacity(1024);
        Base64::new(true).decode(&mut b64, &mut data)?;

        Ok(Self { label, data })
    }

    /// Renders the block with a 64-column body and trailing newline.
    pub fn encode(&self) -> String {
        let mut b64 = Vec::with_capacity(self.data.len() / 3 * 4 + 4);
        let mut raw = self.data.as_slice();
        Base64::new(true)
            .encode(&mut raw, &mut b64)
            .expect("base64 into a Vec cannot fail");

        let mut s = String::with_capacity(b64.len() + b64.len() / Self::WRAP + 64);
        s.push_str(Self::BEGIN);
        s.push_str(&self.label);
        s.push_str(Self::TAIL);
        s.push('\n');
        for line in b64.chunks(Self::WRAP) {
            s.push_str(std::str::from_utf8(line).expect("base64 output is ascii"));
            s.push('\n');
        }
        s.push_str(Self::END);
        s.push_str(&self.label);
        s.push_str(Self::TAIL);
        s.push('\n');

        s
    }
}
