use core::ops::AddAssign;

/// Tallies of a single walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub containers_visited: usize,
    pub containers_skipped: usize,
    pub records_added: usize,
    pub members_skipped: usize,
}

impl AddAssign for WalkSummary {
    fn add_assign(&mut self, other: Self) {
        self.containers_visited += other.containers_visited;
        self.containers_skipped += other.containers_skipped;
        self.records_added += other.records_added;
        self.members_skipped += other.members_skipped;
    }
}

impl core::fmt::Display for WalkSummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} dataverse(s) visited, {} skipped; {} dataset(s) recorded, {} skipped",
            self.containers_visited, self.containers_skipped, self.records_added, self.members_skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assign_and_display() {
        let mut total = WalkSummary {
            containers_visited: 2,
            records_added: 5,
            ..WalkSummary::default()
        };
        total += WalkSummary {
            containers_visited: 1,
            containers_skipped: 1,
            records_added: 1,
            members_skipped: 2,
        };

        assert_eq!(total.to_string(), "3 dataverse(s) visited, 1 skipped; 6 dataset(s) recorded, 2 skipped");
    }
}
