//! Stock opname (physical count) derivation.
//!
//! An opname compares the system's stock figure against a physical count.
//! Its status is derived purely from the per-item differences: any non-zero
//! difference makes the opname reconciled, and a reconciled opname is later
//! consumed exactly once by an opname adjustment.

use serde::{Deserialize, Serialize};

/// A single counted item in an opname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpnameCount {
    /// Stock the system reports at count time.
    pub system_stock: i64,
    /// Stock physically counted.
    pub physical_stock: i64,
}

impl OpnameCount {
    /// Signed difference: physical minus system. Negative means shrinkage.
    #[must_use]
    pub const fn difference(self) -> i64 {
        self.physical_stock - self.system_stock
    }
}

/// Status of a stock opname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpnameStatus {
    /// No discrepancies found, or all discrepancies have been applied.
    Completed,
    /// Discrepancies found, awaiting an opname adjustment.
    Reconciled,
}

/// Derives the opname status from its item counts.
#[must_use]
pub fn opname_status(items: &[OpnameCount]) -> OpnameStatus {
    if items.iter().any(|item| item.difference() != 0) {
        OpnameStatus::Reconciled
    } else {
        OpnameStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_difference_shrinkage() {
        let item = OpnameCount {
            system_stock: 100,
            physical_stock: 92,
        };
        assert_eq!(item.difference(), -8);
    }

    #[test]
    fn test_difference_surplus() {
        let item = OpnameCount {
            system_stock: 40,
            physical_stock: 45,
        };
        assert_eq!(item.difference(), 5);
    }

    #[test]
    fn test_status_no_discrepancy() {
        let items = vec![
            OpnameCount {
                system_stock: 10,
                physical_stock: 10,
            },
            OpnameCount {
                system_stock: 25,
                physical_stock: 25,
            },
        ];
        assert_eq!(opname_status(&items), OpnameStatus::Completed);
    }

    #[test]
    fn test_status_with_discrepancy() {
        let items = vec![
            OpnameCount {
                system_stock: 10,
                physical_stock: 10,
            },
            OpnameCount {
                system_stock: 100,
                physical_stock: 92,
            },
        ];
        assert_eq!(opname_status(&items), OpnameStatus::Reconciled);
    }

    #[test]
    fn test_status_empty_opname() {
        assert_eq!(opname_status(&[]), OpnameStatus::Completed);
    }

    proptest! {
        /// **Property: reconciled iff some item has a non-zero difference**
        #[test]
        fn prop_status_matches_differences(
            counts in prop::collection::vec((0i64..1000, 0i64..1000), 0..20),
        ) {
            let items: Vec<OpnameCount> = counts
                .iter()
                .map(|&(system_stock, physical_stock)| OpnameCount {
                    system_stock,
                    physical_stock,
                })
                .collect();

            let any_diff = items.iter().any(|i| i.difference() != 0);
            let expected = if any_diff {
                OpnameStatus::Reconciled
            } else {
                OpnameStatus::Completed
            };
            prop_assert_eq!(opname_status(&items), expected);
        }
    }
}
