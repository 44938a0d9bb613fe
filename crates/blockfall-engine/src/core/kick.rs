use std::array;

use arrayvec::ArrayVec;

use crate::PieceDefinitionError;

use super::coord::Coord;

/// Upper bound on the number of offsets tried for a single rotation.
pub const MAX_KICKS: usize = 5;

/// Ordered offsets tried for one rotation transition.
pub type KickList = ArrayVec<Coord, MAX_KICKS>;

/// Wall-kick offsets indexed by `(from, to)` rotation state.
///
/// Every transition added with [`KickTable::from_transitions`] also stores its
/// reverse, holding the element-wise negated offsets, so both directions are
/// plain array lookups. Transitions that were never defined have an empty
/// list; a rotation along them is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KickTable {
    entries: [[KickList; KickTable::STATES]; KickTable::STATES],
}

/// One forward transition literal: `(from, to, offsets)`.
pub type KickTransition<'a> = (usize, usize, &'a [Coord]);

impl KickTable {
    /// Number of rotation states a table can address.
    pub const STATES: usize = 4;

    /// Builds a table from forward transitions, adding every reverse entry.
    pub fn from_transitions(
        transitions: &[KickTransition<'_>],
    ) -> Result<Self, PieceDefinitionError> {
        let mut entries: [[KickList; Self::STATES]; Self::STATES] =
            array::from_fn(|_| array::from_fn(|_| KickList::new()));

        for &(from, to, offsets) in transitions {
            if from >= Self::STATES || to >= Self::STATES || from == to {
                return Err(PieceDefinitionError::InvalidKickTransition { from, to });
            }
            if offsets.is_empty() || offsets.len() > MAX_KICKS {
                return Err(PieceDefinitionError::KickCount {
                    from,
                    to,
                    count: offsets.len(),
                    max: MAX_KICKS,
                });
            }
            for (a, b) in [(from, to), (to, from)] {
                if !entries[a][b].is_empty() {
                    return Err(PieceDefinitionError::DuplicateKickTransition { from: a, to: b });
                }
            }

            entries[from][to].extend(offsets.iter().copied());
            entries[to][from].extend(offsets.iter().map(|&offset| -offset));
        }

        Ok(Self { entries })
    }

    /// Offsets to try, in order, when rotating from `from` to `to`.
    ///
    /// States are reduced modulo [`Self::STATES`]. An empty slice means the
    /// transition is not defined.
    #[must_use]
    pub fn offsets(&self, from: usize, to: usize) -> &[Coord] {
        &self.entries[from % Self::STATES][to % Self::STATES]
    }

    /// Iterates over all defined transitions, both directions included.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, usize, &[Coord])> + '_ {
        self.entries.iter().enumerate().flat_map(|(from, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, offsets)| !offsets.is_empty())
                .map(move |(to, offsets)| (from, to, offsets.as_slice()))
        })
    }
}

const fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

/// Kicks shared by the J, L, S, T and Z pieces.
pub(crate) const JLSTZ_KICKS: [KickTransition<'static>; 4] = [
    (0, 1, &[c(0, 0), c(-1, 0), c(-1, 1), c(0, -2), c(-1, -2)]),
    (1, 2, &[c(0, 0), c(1, 0), c(1, -1), c(0, 2), c(1, 2)]),
    (2, 3, &[c(0, 0), c(1, 0), c(1, 1), c(0, -2), c(1, -2)]),
    (3, 0, &[c(0, 0), c(-1, 0), c(-1, -1), c(0, 2), c(-1, 2)]),
];

pub(crate) const I_KICKS: [KickTransition<'static>; 4] = [
    (0, 1, &[c(0, 0), c(-2, 0), c(1, 0), c(-2, -1), c(1, 2)]),
    (1, 2, &[c(0, 0), c(-1, 0), c(2, 0), c(-1, 2), c(2, -1)]),
    (2, 3, &[c(0, 0), c(2, 0), c(-1, 0), c(2, 1), c(-1, -2)]),
    (3, 0, &[c(0, 0), c(1, 0), c(-2, 0), c(1, -2), c(-2, 1)]),
];

// The O piece has one rotation state; rotating it only ever tests in place.
pub(crate) const O_KICKS: [KickTransition<'static>; 4] = [
    (0, 1, &[c(0, 0)]),
    (1, 2, &[c(0, 0)]),
    (2, 3, &[c(0, 0)]),
    (3, 0, &[c(0, 0)]),
];

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn standard_tables() -> [KickTable; 3] {
        [&JLSTZ_KICKS, &I_KICKS, &O_KICKS]
            .map(|t| KickTable::from_transitions(t).unwrap())
    }

    #[test]
    fn test_reverse_transitions_are_negated() {
        for table in standard_tables() {
            for (from, to, offsets) in table.transitions() {
                let reverse = table.offsets(to, from);
                assert_eq!(offsets.len(), reverse.len());
                for (a, b) in offsets.iter().zip(reverse) {
                    assert_eq!(*a, -*b, "{from}->{to}");
                }
            }
        }
    }

    #[test]
    fn test_standard_tables_define_all_neighbor_transitions() {
        for table in standard_tables() {
            for from in 0..4 {
                assert!(!table.offsets(from, (from + 1) % 4).is_empty());
                assert!(!table.offsets(from, (from + 3) % 4).is_empty());
                assert!(table.offsets(from, (from + 2) % 4).is_empty());
            }
            assert_eq!(table.transitions().count(), 8);
        }
    }

    #[test]
    fn test_lookup_preserves_order() {
        let table = KickTable::from_transitions(&JLSTZ_KICKS).unwrap();
        assert_eq!(
            table.offsets(1, 0),
            [c(0, 0), c(1, 0), c(1, -1), c(0, 2), c(1, 2)]
        );
        assert_eq!(table.offsets(5, 4), table.offsets(1, 0));
    }

    #[test]
    fn test_rejects_duplicate_transition() {
        let zero: &[Coord] = &[c(0, 0)];
        let result = KickTable::from_transitions(&[(0, 1, zero), (1, 0, zero)]);
        assert_eq!(
            result,
            Err(PieceDefinitionError::DuplicateKickTransition { from: 1, to: 0 })
        );
    }

    #[test]
    fn test_rejects_out_of_range_transition() {
        let zero: &[Coord] = &[c(0, 0)];
        let result = KickTable::from_transitions(&[(0, 4, zero)]);
        assert_eq!(
            result,
            Err(PieceDefinitionError::InvalidKickTransition { from: 0, to: 4 })
        );
    }

    #[test]
    fn test_rejects_bad_offset_count() {
        let none: &[Coord] = &[];
        assert!(matches!(
            KickTable::from_transitions(&[(0, 1, none)]),
            Err(PieceDefinitionError::KickCount { count: 0, .. })
        ));
        let six: &[Coord] = &[c(0, 0); 6];
        assert!(matches!(
            KickTable::from_transitions(&[(0, 1, six)]),
            Err(PieceDefinitionError::KickCount { count: 6, .. })
        ));
    }

    proptest! {
        #[test]
        fn test_arbitrary_table_reverse_is_negated(
            from in 0usize..4,
            step in 1usize..4,
            offsets in prop::collection::vec((-3i32..=3, -3i32..=3), 1..=MAX_KICKS),
        ) {
            let to = (from + step) % 4;
            let offsets: Vec<Coord> = offsets.into_iter().map(Coord::from).collect();
            let table = KickTable::from_transitions(&[(from, to, offsets.as_slice())]).unwrap();
            let reverse: Vec<Coord> = table.offsets(to, from).to_vec();
            let negated: Vec<Coord> = offsets.iter().map(|&o| -o).collect();
            prop_assert_eq!(table.offsets(from, to), offsets.as_slice());
            prop_assert_eq!(reverse, negated);
        }
    }
}
