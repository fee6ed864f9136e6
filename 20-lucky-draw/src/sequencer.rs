use crate::model::Award;

/// Index of the first award, in ledger order, that still has open slots.
/// `None` once every tier is complete (or the ledger is empty).
pub fn next_available(awards: &[Award]) -> Option<usize> {
    awards.iter().position(|award| !award.is_complete())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Participant;

    fn award(count: u32, winners: usize) -> Award {
        Award {
            id: format!("a{count}-{winners}"),
            title: "tier".into(),
            count,
            winners: (0..winners)
                .map(|i| Participant::new(i as i64, format!("w{i}")))
                .collect(),
        }
    }

    #[test]
    fn picks_lowest_incomplete_index() {
        let awards = vec![award(1, 1), award(2, 0), award(1, 0)];
        assert_eq!(next_available(&awards), Some(1));
    }

    #[test]
    fn advances_when_first_tier_completes() {
        let mut awards = vec![award(1, 0), award(1, 0)];
        assert_eq!(next_available(&awards), Some(0));
        awards[0].winners.push(Participant::new(9, "x"));
        assert_eq!(next_available(&awards), Some(1));
    }

    #[test]
    fn none_when_all_complete_or_empty() {
        assert_eq!(next_available(&[award(2, 2), award(1, 1)]), None);
        assert_eq!(next_available(&[]), None);
    }
}
