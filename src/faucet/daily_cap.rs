//! Per-network daily disbursement tally.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTally {
    active_day: NaiveDate,
    tally: u64,
}

impl DayTally {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            active_day: today,
            tally: 0,
        }
    }

    pub fn active_day(&self) -> NaiveDate {
        self.active_day
    }

    pub fn tally(&self) -> u64 {
        self.tally
    }

    /// Provisionally charge `delta` against `cap`.
    ///
    /// A new day resets the tally to `delta` without consulting the cap. Returns
    /// false, leaving the tally untouched, when the charge would exceed the cap.
    pub fn charge(&mut self, today: NaiveDate, delta: u64, cap: u64) -> bool {
        if today != self.active_day {
            self.active_day = today;
            self.tally = delta;
            return true;
        }

        match self.tally.checked_add(delta) {
            Some(next) if next <= cap => {
                self.tally = next;
                true
            }
            _ => false,
        }
    }

    /// Undo a charge made on `day`. Charges from a day that has since rolled
    /// over are already gone from the tally and are ignored.
    pub fn refund(&mut self, day: NaiveDate, delta: u64) -> bool {
        if day != self.active_day {
            return false;
        }
        self.tally = self.tally.saturating_sub(delta);
        true
    }
}
