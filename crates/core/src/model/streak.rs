use chrono::NaiveDate;

/// Consecutive-day activity counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streak {
    pub current: u32,
    /// `None` until the first recorded activity.
    pub last_date: Option<NaiveDate>,
}

/// What registering a day of activity did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUpdate {
    /// `today` was already counted.
    AlreadyCounted,
    /// First activity ever.
    Started,
    /// Yesterday was active; streak grew by one.
    Extended,
    /// The chain was broken; streak restarted at 1.
    Reset,
}

impl StreakUpdate {
    /// True when a new day was counted.
    #[must_use]
    pub fn counted(self) -> bool {
        !matches!(self, StreakUpdate::AlreadyCounted)
    }
}

impl Streak {
    #[must_use]
    pub fn new(current: u32, last_date: Option<NaiveDate>) -> Self {
        Self { current, last_date }
    }

    /// Register activity on `today`.
    pub fn register(&mut self, today: NaiveDate) -> StreakUpdate {
        let update = match self.last_date {
            Some(last) if last == today => return StreakUpdate::AlreadyCounted,
            Some(last) if last.succ_opt() == Some(today) => {
                self.current = self.current.saturating_add(1);
                StreakUpdate::Extended
            }
            Some(_) => {
                self.current = 1;
                StreakUpdate::Reset
            }
            None => {
                self.current = 1;
                StreakUpdate::Started
            }
        };
        self.last_date = Some(today);
        update
    }

    #[must_use]
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.last_date == Some(day)
    }
}

/// Streak fields as shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakInfo {
    pub current: u32,
    pub last_date: Option<NaiveDate>,
    pub total_sessions: u32,
}
