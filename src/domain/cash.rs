use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{AtmError, Cents};

/// Face value of a bill, in cents.
pub type Denomination = Cents;

/// Bills handed out for one withdrawal: denomination -> number of bills.
pub type Dispense = BTreeMap<Denomination, u32>;

/// Number of bills held for one denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillCount {
    pub denomination: Denomination,
    pub count: u32,
}

impl From<(Denomination, u32)> for BillCount {
    fn from((denomination, count): (Denomination, u32)) -> Self {
        Self {
            denomination,
            count,
        }
    }
}

/// Bill stock of the cash dispenser. The value of all bills always fits
/// in `Cents`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CashInventory {
    bills: BTreeMap<Denomination, u32>,
    total: Cents,
}

impl CashInventory {
    /// Create an inventory from `(denomination, count)` pairs.
    /// Repeated denominations are summed.
    pub fn new(bills: impl IntoIterator<Item = (Denomination, u32)>) -> Result<Self, AtmError> {
        let mut inventory = Self::default();
        for (denomination, count) in bills {
            inventory.restock(denomination, count)?;
        }
        Ok(inventory)
    }

    /// Load `count` more bills of a denomination.
    pub fn restock(&mut self, denomination: Denomination, count: u32) -> Result<(), AtmError> {
        if denomination <= 0 {
            return Err(AtmError::InvalidAmount(format!(
                "denomination {} must be positive",
                denomination
            )));
        }
        let held = self.count(denomination).checked_add(count).ok_or_else(|| {
            AtmError::InvalidAmount(format!("too many bills of {}", denomination))
        })?;
        let total = denomination
            .checked_mul(Cents::from(count))
            .and_then(|value| self.total.checked_add(value))
            .ok_or_else(|| {
                AtmError::InvalidAmount(format!(
                    "cash total would overflow when adding {} x {}",
                    count, denomination
                ))
            })?;
        self.bills.insert(denomination, held);
        self.total = total;
        Ok(())
    }

    pub fn count(&self, denomination: Denomination) -> u32 {
        self.bills.get(&denomination).copied().unwrap_or(0)
    }

    /// Total value held, in cents.
    pub fn total(&self) -> Cents {
        self.total
    }

    pub fn smallest_denomination(&self) -> Option<Denomination> {
        self.bills.keys().next().copied()
    }

    /// `(denomination, count)` pairs, smallest denomination first.
    pub fn denominations(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        self.bills.iter().map(|(&d, &c)| (d, c))
    }

    /// True iff some combination of the available bills adds up to exactly
    /// `amount`. This is an exact check and may accept amounts that the
    /// greedy `allocate` cannot serve.
    pub fn can_dispense(&self, amount: Cents) -> bool {
        if amount == 0 {
            return true;
        }
        if amount < 0 || amount > self.total {
            return false;
        }
        if self.greedy(amount).is_some() {
            return true;
        }

        // Work in units of the common divisor to keep the table small.
        let unit = self
            .bills
            .iter()
            .filter(|&(_, &count)| count > 0)
            .fold(0, |acc, (&denomination, _)| gcd(acc, denomination));
        if unit == 0 || amount % unit != 0 {
            return false;
        }
        // Bills making up `amount` leave bills making up `total - amount`.
        let smaller = amount.min(self.total - amount);
        let Ok(target) = usize::try_from(smaller / unit) else {
            return false;
        };

        // Bounded subset sum: `used[sum]` counts the bills of the current
        // denomination spent to first reach `sum`.
        let mut reachable = vec![false; target + 1];
        let mut used = vec![0u32; target + 1];
        reachable[0] = true;
        for (&denomination, &count) in &self.bills {
            let Ok(step) = usize::try_from(denomination / unit) else {
                continue;
            };
            if count == 0 || step > target {
                continue;
            }
            used.fill(0);
            for sum in step..=target {
                if !reachable[sum] && reachable[sum - step] && used[sum - step] < count {
                    reachable[sum] = true;
                    used[sum] = used[sum - step] + 1;
                }
            }
            if reachable[target] {
                return true;
            }
        }
        reachable[target]
    }

    /// Pick bills for `amount`, largest denomination first, and remove them
    /// from stock. Nothing is removed unless the whole amount can be covered.
    pub fn allocate(&mut self, amount: Cents) -> Result<Dispense, AtmError> {
        if amount <= 0 {
            return Err(AtmError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        let dispense = self
            .greedy(amount)
            .ok_or(AtmError::InsufficientStock { requested: amount })?;
        for (denomination, taken) in &dispense {
            if let Some(count) = self.bills.get_mut(denomination) {
                *count -= taken;
            }
        }
        self.total -= amount;
        Ok(dispense)
    }

    fn greedy(&self, amount: Cents) -> Option<Dispense> {
        let mut remaining = amount;
        let mut dispense = Dispense::new();
        for (&denomination, &available) in self.bills.iter().rev() {
            let wanted = u32::try_from(remaining / denomination).unwrap_or(u32::MAX);
            let take = wanted.min(available);
            if take > 0 {
                dispense.insert(denomination, take);
                remaining -= denomination * Cents::from(take);
            }
        }
        (remaining == 0).then_some(dispense)
    }
}

fn gcd(a: Cents, b: Cents) -> Cents {
    if b == 0 { a } else { gcd(b, a % b) }
}
