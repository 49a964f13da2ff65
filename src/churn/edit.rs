use super::hunk::HunkHeader;

/// A signed line-count change recorded at one line position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub position: u32,
    pub magnitude: i64,
}

/// The edits a single hunk represents.
///
/// When both sides of the hunk start at the same line the hunk is an
/// in-place edit and collapses into one net delta. Otherwise the removal
/// and the addition are recorded as independent touches. A moved line and
/// an unrelated delete-here/insert-there pair look the same under this
/// rule; that approximation is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSet {
    InPlace(Edit),
    Split { removal: Edit, addition: Edit },
}

impl EditSet {
    pub fn classify(header: &HunkHeader) -> Self {
        let HunkHeader { removal, addition } = *header;
        if removal.position == addition.position {
            EditSet::InPlace(Edit {
                position: addition.position,
                magnitude: i64::from(addition.count) - i64::from(removal.count),
            })
        } else {
            EditSet::Split {
                removal: Edit {
                    position: removal.position,
                    magnitude: i64::from(removal.count),
                },
                addition: Edit {
                    position: addition.position,
                    magnitude: i64::from(addition.count),
                },
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Edit> {
        let (first, second) = match *self {
            EditSet::InPlace(edit) => (edit, None),
            EditSet::Split { removal, addition } => (removal, Some(addition)),
        };
        std::iter::once(first).chain(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classify(spec: &str) -> Vec<(u32, i64)> {
        let header: HunkHeader = spec.parse().unwrap();
        EditSet::classify(&header)
            .iter()
            .map(|e| (e.position, e.magnitude))
            .collect()
    }

    #[test]
    fn different_positions_are_independent_touches() {
        assert_eq!(classify("-5,0 +6,3"), vec![(5, 0), (6, 3)]);
        assert_eq!(classify("-0,0 +1,2"), vec![(0, 0), (1, 2)]);
    }

    #[test]
    fn same_position_collapses_to_net_delta() {
        assert_eq!(classify("-10,2 +10,0"), vec![(10, -2)]);
        assert_eq!(classify("-10,2 +10,3"), vec![(10, 1)]);
        assert_eq!(classify("-1 +1"), vec![(1, 0)]);
    }
}
