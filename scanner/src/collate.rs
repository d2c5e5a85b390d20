use crate::RecoveredPlaintext;

/// Stable ascending order by identifier, the order of the final report.
pub fn collate(mut results: Vec<RecoveredPlaintext>) -> Vec<RecoveredPlaintext> {
    results.sort_by_key(|r| r.id);
    results
}

#[cfg(test)]
mod tests {
    use super::collate;
    use crate::{KeyId, RecoveredPlaintext};

    #[test]
    fn orders_by_identifier() {
        let results = [42u64, 7, 19]
            .into_iter()
            .map(|id| RecoveredPlaintext {
                id: KeyId::new(id),
                plaintext: id.to_string().into_bytes(),
            })
            .collect();

        let sorted = collate(results);
        let ids: Vec<_> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, [KeyId::new(7), KeyId::new(19), KeyId::new(42)]);
        assert_eq!(sorted[0].plaintext, b"7");
    }

    #[test]
    fn empty_is_fine() {
        assert!(collate(Vec::new()).is_empty());
    }
}
