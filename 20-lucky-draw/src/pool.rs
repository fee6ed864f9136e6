//! The eligible pool: roster minus everyone who already won something.
//!
//! Always derived from the roster and ledger on demand; nothing here is
//! stored or cached.

use std::collections::HashSet;

use crate::model::{Award, Participant, ParticipantId};

/// Ids of every winner across all awards.
pub fn used_ids(awards: &[Award]) -> HashSet<&ParticipantId> {
    awards
        .iter()
        .flat_map(|award| award.winners.iter().map(|winner| &winner.id))
        .collect()
}

/// Participants that can still be drawn, in roster order.
pub fn eligible_pool<'a>(
    participants: &'a [Participant],
    awards: &[Award],
) -> Vec<&'a Participant> {
    let used = used_ids(awards);
    participants
        .iter()
        .filter(|participant| !used.contains(&participant.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn award(winners: Vec<Participant>) -> Award {
        Award {
            id: "a".into(),
            title: "A".into(),
            count: 3,
            winners,
        }
    }

    #[test]
    fn pool_excludes_winners_of_every_award() {
        let roster: Vec<Participant> = (1..=5)
            .map(|i| Participant::new(i, format!("p{i}")))
            .collect();
        let awards = vec![
            award(vec![roster[0].clone()]),
            award(vec![roster[3].clone()]),
        ];

        let pool = eligible_pool(&roster, &awards);
        let ids: Vec<_> = pool.iter().map(|p| p.id.clone()).collect();

        assert_eq!(
            ids,
            vec![
                ParticipantId::Number(2),
                ParticipantId::Number(3),
                ParticipantId::Number(5)
            ]
        );
    }

    #[test]
    fn winners_outside_the_roster_are_ignored() {
        let roster = vec![Participant::new("A", "Alice")];
        let awards = vec![award(vec![Participant::new("Z", "Zed")])];
        assert_eq!(eligible_pool(&roster, &awards).len(), 1);
    }

    #[test]
    fn empty_ledger_leaves_whole_roster() {
        let roster = vec![Participant::new(1, "a"), Participant::new(2, "b")];
        assert_eq!(eligible_pool(&roster, &[]).len(), 2);
        assert!(used_ids(&[]).is_empty());
    }
}
