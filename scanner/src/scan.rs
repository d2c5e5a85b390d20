use crate::ScanError;
use cipher::rsa::{PKCS1Decrypt, PrivateKey, PublicKey};
use cipher::{CipherError, Decrypt};
use num_traits::{One, Zero};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use utils::BigUintExt;

/// Orderable corpus identifier, the numeric stem of the source file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyId(u64);

impl KeyId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for KeyId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

impl Display for KeyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// unordered pair of identifiers, the dedup token for processed pairs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PairKey(KeyId, KeyId);

impl PairKey {
    fn new(a: KeyId, b: KeyId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// One key/ciphertext file pair of the corpus.
#[derive(Debug)]
pub struct CorpusEntry {
    pub id: KeyId,
    pub key: PublicKey,
    pub ciphertext: Vec<u8>,
}

impl CorpusEntry {
    pub fn new(id: KeyId, key: PublicKey, ciphertext: Vec<u8>) -> Self {
        Self {
            id,
            key,
            ciphertext,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveredPlaintext {
    pub id: KeyId,
    pub plaintext: Vec<u8>,
}

/// Decryption capability the scanner hands each rebuilt key to.
pub trait Decryptor {
    fn decrypt(&self, key: &PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>;
}

/// PKCS #1 v1.5 padded decryption backed by the cipher crate.
#[derive(Clone, Copy, Default)]
pub struct Pkcs1Decryptor;

impl Decryptor for Pkcs1Decryptor {
    fn decrypt(&self, key: &PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let pkcs = PKCS1Decrypt::new(key.clone())?;
        let mut plaintext = Vec::with_capacity(ciphertext.len());
        pkcs.decrypt(ciphertext, &mut plaintext)?;

        Ok(plaintext)
    }
}

/// Observation points of a running scan. Progress reporting and the optional
/// private key persistence both live behind this seam, the scanner itself
/// carries no output state.
pub trait ScanObserver {
    fn on_key_recovered(&mut self, _id: KeyId, _key: &PrivateKey) {}

    fn on_plaintext(&mut self, _id: KeyId, _ciphertext: &[u8], _plaintext: &[u8]) {}

    fn on_decrypt_failed(&mut self, _id: KeyId, _err: &CipherError) {}
}

impl ScanObserver for () {}

/// Pairwise scan state: the set of already processed unordered pairs.
#[derive(Default)]
pub struct Scanner {
    visited: HashSet<PairKey>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerates every unordered pair of distinct corpus entries once,
    /// O(N^2) for the small corpora of this domain.
    ///
    /// A pair is compared only when both keys use the same public exponent;
    /// a gcd of 1 moves on without touching the skip set (a negative result
    /// is one cheap gcd to recheck). A nontrivial gcd marks the pair
    /// processed, rebuilds both private keys and decrypts both sides
    /// independently.
    pub fn scan<D, O>(
        &mut self,
        corpus: &[CorpusEntry],
        decryptor: &D,
        observer: &mut O,
    ) -> Result<Vec<RecoveredPlaintext>, ScanError>
    where
        D: Decryptor,
        O: ScanObserver,
    {
        let mut recovered = Vec::new();

        for (i, a) in corpus.iter().enumerate() {
            for b in corpus.iter().skip(i + 1) {
                let pair = PairKey::new(a.id, b.id);
                if self.visited.contains(&pair) {
                    continue;
                }

                // a shared factor is only exploitable when both keys agree on e
                if a.key.exponent() != b.key.exponent() {
                    continue;
                }

                let g = BigUintExt(a.key.modules()).gcd(b.key.modules());
                // gcd of zero means two zero moduli, nothing to divide by
                if g.is_zero() || g.is_one() {
                    continue;
                }

                // g divides both moduli exactly, the cofactors complete both
                // factorizations; g equal to a modulus gets no special case
                // and surfaces below as an unusable factorization
                let (qa, qb) = (a.key.modules() / &g, b.key.modules() / &g);
                let ka = PrivateKey::from_common_factor(&g, &qa, a.key.exponent()).map_err(
                    |source| ScanError::Reconstruct {
                        id: a.id,
                        peer: b.id,
                        source,
                    },
                )?;
                let kb = PrivateKey::from_common_factor(&g, &qb, b.key.exponent()).map_err(
                    |source| ScanError::Reconstruct {
                        id: b.id,
                        peer: a.id,
                        source,
                    },
                )?;

                self.visited.insert(pair);

                observer.on_key_recovered(a.id, &ka);
                observer.on_key_recovered(b.id, &kb);

                for (entry, key) in [(a, &ka), (b, &kb)] {
                    match decryptor.decrypt(key, &entry.ciphertext) {
                        Ok(plaintext) => {
                            observer.on_plaintext(entry.id, &entry.ciphertext, &plaintext);
                            recovered.push(RecoveredPlaintext {
                                id: entry.id,
                                plaintext,
                            });
                        }
                        // one side failing to decrypt never blocks the other
                        Err(e) => observer.on_decrypt_failed(entry.id, &e),
                    }
                }
            }
        }

        Ok(recovered)
    }
}

#[cfg(test)]
mod tests {
    use super::{CorpusEntry, KeyId, Pkcs1Decryptor, ScanObserver, Scanner};
    use crate::{collate, ScanError};
    use cipher::rsa::{PrivateKey, PublicKey};
    use cipher::CipherError;
    use encode::base::Base64;
    use encode::Decode;
    use num_bigint::BigUint;
    use num_traits::Num;

    // n1 = P1 * P2, n2 = P3 * P4, n3 = P1 * P5: entries 1 and 3 share P1
    const P1: &str = "14765610730145606971";
    const P2: &str = "16756524606178377749";
    const N1: &str = "247420319524936345577020248239725688279";
    const N2: &str = "299847794639394419332360202591466387661";
    const N3: &str = "204758587394501528287259525445498494417";
    const CT1: &str = "L8jB7ULdHR8UFEEbglnYVg==";
    const CT2: &str = "wYvqYCpccfuxFMkfAp1M6g==";
    const CT3: &str = "i9RADep0SUMDuhqXOgjG1w==";

    fn uint(s: &str) -> BigUint {
        BigUint::from_str_radix(s, 10).unwrap()
    }

    fn entry(id: u64, n: &str, e: u32, ct_b64: &str) -> CorpusEntry {
        let (mut b64, mut ct) = (ct_b64.as_bytes(), Vec::new());
        Base64::new(true).decode(&mut b64, &mut ct).unwrap();
        CorpusEntry::new(
            KeyId::new(id),
            PublicKey::new_uncheck(uint(n), BigUint::from(e)),
            ct,
        )
    }

    fn corpus() -> Vec<CorpusEntry> {
        vec![
            entry(1, N1, 65537, CT1),
            entry(2, N2, 65537, CT2),
            entry(3, N3, 65537, CT3),
        ]
    }

    #[derive(Default)]
    struct Recorder {
        keys: Vec<KeyId>,
        failed: Vec<KeyId>,
    }

    impl ScanObserver for Recorder {
        fn on_key_recovered(&mut self, id: KeyId, _key: &PrivateKey) {
            self.keys.push(id);
        }

        fn on_decrypt_failed(&mut self, id: KeyId, _err: &CipherError) {
            self.failed.push(id);
        }
    }

    #[test]
    fn shared_factor_breaks_both_keys() {
        let mut recorder = Recorder::default();
        let results = Scanner::new()
            .scan(&corpus(), &Pkcs1Decryptor, &mut recorder)
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, KeyId::new(1));
        assert_eq!(results[0].plaintext, b"m one");
        assert_eq!(results[1].id, KeyId::new(3));
        assert_eq!(results[1].plaintext, b"third");

        // the independent key stays unbroken, each shared key broken once
        assert_eq!(recorder.keys, [KeyId::new(1), KeyId::new(3)]);
        assert!(recorder.failed.is_empty());
    }

    #[test]
    fn processed_pairs_are_skipped() {
        let mut scanner = Scanner::new();
        let first = scanner.scan(&corpus(), &Pkcs1Decryptor, &mut ()).unwrap();
        assert_eq!(first.len(), 2);

        // the (1, 3) pair is on the skip list now
        let second = scanner.scan(&corpus(), &Pkcs1Decryptor, &mut ()).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn fresh_scans_agree() {
        let a = collate(Scanner::new().scan(&corpus(), &Pkcs1Decryptor, &mut ()).unwrap());
        let b = collate(Scanner::new().scan(&corpus(), &Pkcs1Decryptor, &mut ()).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn exponent_mismatch_is_not_compared() {
        // same shared factor as (1, 3), but key 3 speaks e = 3
        let corpus = vec![entry(1, N1, 65537, CT1), entry(3, N3, 3, CT3)];
        let results = Scanner::new()
            .scan(&corpus, &Pkcs1Decryptor, &mut ())
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn decrypt_failure_keeps_the_other_side() {
        // entry 1 carries entry 3's ciphertext, unpaddable under key 1
        let corpus = vec![entry(1, N1, 65537, CT3), entry(3, N3, 65537, CT3)];
        let mut recorder = Recorder::default();
        let results = Scanner::new()
            .scan(&corpus, &Pkcs1Decryptor, &mut recorder)
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, KeyId::new(3));
        assert_eq!(results[0].plaintext, b"third");
        assert_eq!(recorder.failed, [KeyId::new(1)]);
        assert_eq!(recorder.keys, [KeyId::new(1), KeyId::new(3)]);
    }

    #[test]
    fn modulus_dividing_its_peer_is_surfaced() {
        // the degenerate corpus: one "modulus" is itself the shared prime,
        // so gcd(nA, nB) == nA and A's cofactor collapses to 1
        let corpus = vec![entry(7, P1, 65537, CT1), entry(9, N1, 65537, CT1)];

        // the non-degenerate side still factors cleanly
        let qb = uint(N1) / uint(P1);
        assert_eq!(qb, uint(P2));
        assert!(PrivateKey::from_common_factor(&uint(P1), &qb, &BigUint::from(65537u32)).is_ok());

        let err = Scanner::new()
            .scan(&corpus, &Pkcs1Decryptor, &mut ())
            .unwrap_err();
        let ScanError::Reconstruct { id, peer, .. } = err;
        assert_eq!((id, peer), (KeyId::new(7), KeyId::new(9)));
    }
}
