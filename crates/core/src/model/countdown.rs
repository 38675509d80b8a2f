use crate::model::config::QuestionCount;

/// Result of one tick of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still running with this many seconds left.
    Running(u32),
    /// This tick reached zero. Reported once per countdown.
    Expired,
    /// The countdown was already stopped; nothing changed.
    Stopped,
}

/// Client-local exam countdown.
///
/// Holds `remaining_seconds` and an `active` flag. Remaining time only goes
/// down and saturates at zero; once stopped (expired or cancelled) it never
/// ticks again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining_secs: u32,
    active: bool,
}

impl Countdown {
    /// Start a countdown of one minute per question.
    #[must_use]
    pub fn start(count: QuestionCount) -> Self {
        Self::from_secs(count.duration_secs())
    }

    #[must_use]
    pub fn from_secs(total_secs: u32) -> Self {
        Self {
            remaining_secs: total_secs,
            active: total_secs > 0,
        }
    }

    pub fn tick(&mut self) -> Tick {
        if !self.active {
            return Tick::Stopped;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.active = false;
            Tick::Expired
        } else {
            Tick::Running(self.remaining_secs)
        }
    }

    /// Stop without expiring. Remaining time is kept.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `mm:ss`, or `h:mm:ss` once an hour or more remains.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

/// Render seconds as `mm:ss` or `h:mm:ss`.
#[must_use]
pub fn format_clock(secs: u32) -> String {
    let hours = secs / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
