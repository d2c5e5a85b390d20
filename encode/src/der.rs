//! Just enough DER for RSA public keys: the PKCS#1 `RSAPublicKey` structure
//! (RFC 8017 A.1.1) and its X.509 `SubjectPublicKeyInfo` wrapper (RFC 5280).
//! Integers travel as raw unsigned big-endian byte strings so callers choose
//! their own big-integer representation.

use crate::EncodeError;

const TAG_INTEGER: u8 = 0x02;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_NULL: u8 = 0x05;
const TAG_OID: u8 = 0x06;
const TAG_SEQUENCE: u8 = 0x30;

/// rsaEncryption, OID 1.2.840.113549.1.1.1
const RSA_ENCRYPTION_OID: [u8; 9] = [0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];

struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], EncodeError> {
        if self.data.len() < n {
            return Err(EncodeError::InvalidDer("truncated element".to_string()));
        }

        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    fn tlv(&mut self, expect: u8) -> Result<&'a [u8], EncodeError> {
        let tag = self.take(1)?[0];
        if tag != expect {
            return Err(EncodeError::InvalidDer(format!(
                "expected tag {expect:#04x}, got {tag:#04x}"
            )));
        }

        let first = self.take(1)?[0];
        let len = if first < 0x80 {
            first as usize
        } else {
            let cnt = (first & 0x7f) as usize;
            if cnt == 0 || cnt > 4 {
                return Err(EncodeError::InvalidDer(format!(
                    "unsupported length-of-length {cnt}"
                )));
            }
            let mut len = 0usize;
            for &b in self.take(cnt)? {
                len = (len << 8) | b as usize;
            }
            len
        };

        self.take(len)
    }

    /// Unsigned big-endian INTEGER content with the sign padding stripped.
    fn uint(&mut self) -> Result<Vec<u8>, EncodeError> {
        let mut v = self.tlv(TAG_INTEGER)?;
        if v.is_empty() {
            return Err(EncodeError::InvalidDer("empty INTEGER".to_string()));
        }
        if v[0] & 0x80 != 0 {
            return Err(EncodeError::InvalidDer(
                "negative INTEGER in key material".to_string(),
            ));
        }
        while v.len() > 1 && v[0] == 0 {
            v = &v[1..];
        }

        Ok(v.to_vec())
    }
}

fn push_len(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        out.push(0x80 | (bytes.len() - skip) as u8);
        out.extend_from_slice(&bytes[skip..]);
    }
}

fn push_tlv(out: &mut Vec<u8>, tag: u8, content: &[u8]) {
    out.push(tag);
    push_len(out, content.len());
    out.extend_from_slice(content);
}

fn push_uint(out: &mut Vec<u8>, v: &[u8]) {
    let mut v = v;
    while v.len() > 1 && v[0] == 0 {
        v = &v[1..];
    }

    let mut content = Vec::with_capacity(v.len() + 1);
    if v.is_empty() {
        content.push(0);
    } else {
        if v[0] & 0x80 != 0 {
            content.push(0);
        }
        content.extend_from_slice(v);
    }
    push_tlv(out, TAG_INTEGER, &content);
}

/// `RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }`
pub fn rsa_public_key_to_der(n: &[u8], e: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(n.len() + e.len() + 8);
    push_uint(&mut body, n);
    push_uint(&mut body, e);

    let mut out = Vec::with_capacity(body.len() + 8);
    push_tlv(&mut out, TAG_SEQUENCE, &body);
    out
}

/// Returns the (modulus, exponent) byte strings of a PKCS#1 public key.
pub fn rsa_public_key_from_der(der: &[u8]) -> Result<(Vec<u8>, Vec<u8>), EncodeError> {
    let mut outer = Reader::new(der);
    let mut seq = Reader::new(outer.tlv(TAG_SEQUENCE)?);
    let n = seq.uint()?;
    let e = seq.uint()?;
    if !seq.is_empty() {
        return Err(EncodeError::InvalidDer(
            "trailing data after RSAPublicKey".to_string(),
        ));
    }

    Ok((n, e))
}

/// X.509 `SubjectPublicKeyInfo` carrying a PKCS#1 public key.
pub fn subject_public_key_info_to_der(n: &[u8], e: &[u8]) -> Vec<u8> {
    let mut alg = Vec::with_capacity(16);
    push_tlv(&mut alg, TAG_OID, &RSA_ENCRYPTION_OID);
    push_tlv(&mut alg, TAG_NULL, &[]);

    let pk = rsa_public_key_to_der(n, e);
    let mut bits = Vec::with_capacity(pk.len() + 1);
    bits.push(0);
    bits.extend_from_slice(&pk);

    let mut body = Vec::with_capacity(alg.len() + bits.len() + 8);
    push_tlv(&mut body, TAG_SEQUENCE, &alg);
    push_tlv(&mut body, TAG_BIT_STRING, &bits);

    let mut out = Vec::with_capacity(body.len() + 8);
    push_tlv(&mut out, TAG_SEQUENCE, &body);
    out
}

pub fn subject_public_key_info_from_der(der: &[u8]) -> Result<(Vec<u8>, Vec<u8>), EncodeError> {
    let mut outer = Reader::new(der);
    let mut spki = Reader::new(outer.tlv(TAG_SEQUENCE)?);

    let mut alg = Reader::new(spki.tlv(TAG_SEQUENCE)?);
    let oid = alg.tlv(TAG_OID)?;
    if oid != RSA_ENCRYPTION_OID {
        return Err(EncodeError::InvalidDer(
            "algorithm is not rsaEncryption".to_string(),
        ));
    }
    if !alg.is_empty() {
        alg.tlv(TAG_NULL)?;
    }

    let bits = spki.tlv(TAG_BIT_STRING)?;
    let Some((&unused, pk)) = bits.split_first() else {
        return Err(EncodeError::InvalidDer("empty BIT STRING".to_string()));
    };
    if unused != 0 {
        return Err(EncodeError::InvalidDer(format!(
            "unexpected unused bit count {unused}"
        )));
    }

    rsa_public_key_from_der(pk)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    // n = 247420319524936345577020248239725688279, e = 65537
    const N_HEX: &str = "ba236b93b02eadfb7656f77d463135d7";
    const PKCS1_HEX: &str = "3018021100ba236b93b02eadfb7656f77d463135d70203010001";
    const SPKI_HEX: &str =
        "302c300d06092a864886f70d0101010500031b003018021100ba236b93b02eadfb7656f77d463135d70203010001";

    #[test]
    fn pkcs1_encode() {
        assert_eq!(rsa_public_key_to_der(&h(N_HEX), &[0x01, 0x00, 0x01]), h(PKCS1_HEX));
    }

    #[test]
    fn pkcs1_decode() {
        let (n, e) = rsa_public_key_from_der(&h(PKCS1_HEX)).unwrap();
        assert_eq!(n, h(N_HEX));
        assert_eq!(e, [0x01, 0x00, 0x01]);
    }

    #[test]
    fn spki_round_trip() {
        let der = subject_public_key_info_to_der(&h(N_HEX), &[0x01, 0x00, 0x01]);
        assert_eq!(der, h(SPKI_HEX));

        let (n, e) = subject_public_key_info_from_der(&der).unwrap();
        assert_eq!(n, h(N_HEX));
        assert_eq!(e, [0x01, 0x00, 0x01]);
    }

    #[test]
    fn long_form_length() {
        // a modulus long enough to need a 2-byte length
        let n = vec![0x7fu8; 200];
        let der = rsa_public_key_to_der(&n, &[3]);
        let (back_n, back_e) = rsa_public_key_from_der(&der).unwrap();
        assert_eq!(back_n, n);
        assert_eq!(back_e, [3]);
    }

    #[test]
    fn reject_malformed() {
        assert!(rsa_public_key_from_der(&h("3003020100")).is_err()); // lone INTEGER
        assert!(rsa_public_key_from_der(&[0x30, 0x05, 0x02, 0x10, 0x00]).is_err()); // truncated
        assert!(subject_public_key_info_from_der(&h(PKCS1_HEX)).is_err()); // missing wrapper
    }
}
