//! # Tutor Calendar
//!
//! Builds the month grid shown on a tutor's dashboard.
//!
//! The grid is a list of weeks, Monday first, each exactly seven cells long.
//! Cells outside the viewed month are blank placeholders. Every in-month
//! cell carries its weekday and the meetings held on that day of the month.
//!
//! ## Matching meetings to days
//!
//! Meetings are grouped by day-of-month only. The caller must pass meetings
//! already restricted to the viewed month and year; a meeting from another
//! month would land on the cell with the same day number.
//!
//! Availability windows are accepted for context but never rendered as
//! per-day slots: meetings take the display, so `slots` stays empty.

use std::collections::HashMap;

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;
use crate::errors::{TutorError, TutorResult};
use crate::models::availability::AvailabilityWindow;
use crate::models::meeting::{MeetingDetail, MeetingStatus};
use crate::models::time::format_hm;
use crate::models::weekday;

/// Type tag carried by every per-day entry produced from a meeting.
pub const MEETING_ENTRY: &str = "meeting";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRef {
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayRef {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub id: Uuid,
    pub start: String,
    pub end: String,
    pub topic: String,
    pub student: String,
    pub status: MeetingStatus,
    pub notes: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSummary {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCell {
    /// Day of the month; `None` for placeholders.
    pub day: Option<u32>,
    pub is_current_month: bool,
    pub is_today: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,
    pub meetings: Vec<MeetingSummary>,
    pub slots: Vec<SlotSummary>,
}

impl DayCell {
    fn placeholder() -> Self {
        Self {
            day: None,
            is_current_month: false,
            is_today: false,
            weekday: None,
            meetings: Vec::new(),
            slots: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarData {
    pub weeks: Vec<Vec<DayCell>>,
    pub month_name: String,
    pub year: i32,
    pub month: u32,
    pub prev_month: MonthRef,
    pub next_month: MonthRef,
    pub today: TodayRef,
}

/// One month of one tutor's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorCalendar {
    year: i32,
    month: u32,
    first: NaiveDate,
}

impl TutorCalendar {
    /// Fails with a validation error for a month outside 1–12 or a year
    /// chrono cannot represent.
    pub fn new(year: i32, month: u32) -> TutorResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(TutorError::Validation(format!(
                "Month must be between 1 and 12, got {month}"
            )));
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| TutorError::Validation(format!("Year {year} is out of range")))?;
        Ok(Self { year, month, first })
    }

    /// The month containing the clock's current date.
    pub fn current(clock: &dyn Clock) -> Self {
        let today = clock.today();
        let first = today.with_day(1).unwrap_or(today);
        Self {
            year: today.year(),
            month: today.month(),
            first,
        }
    }

    /// `year`/`month` when given, the clock's current month otherwise.
    pub fn for_query(year: Option<i32>, month: Option<u32>, clock: &dyn Clock) -> TutorResult<Self> {
        let today = clock.today();
        Self::new(year.unwrap_or(today.year()), month.unwrap_or(today.month()))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or_default()
    }

    pub fn days_in_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|day| NaiveDate::from_ymd_opt(self.year, self.month, *day).is_some())
            .unwrap_or(28)
    }

    /// Raw month grid: weeks of seven day numbers, `0` outside the month.
    pub fn month_grid(&self) -> Vec<[u32; 7]> {
        let leading = self.first.weekday().num_days_from_monday();
        let days = self.days_in_month();

        let mut cells: Vec<u32> = std::iter::repeat(0).take(leading as usize).collect();
        cells.extend(1..=days);
        while cells.len() % 7 != 0 {
            cells.push(0);
        }

        cells
            .chunks(7)
            .map(|week| {
                let mut row = [0; 7];
                row.copy_from_slice(week);
                row
            })
            .collect()
    }

    pub fn prev_month(&self) -> MonthRef {
        if self.month > 1 {
            MonthRef { month: self.month - 1, year: self.year }
        } else {
            MonthRef { month: 12, year: self.year - 1 }
        }
    }

    pub fn next_month(&self) -> MonthRef {
        if self.month < 12 {
            MonthRef { month: self.month + 1, year: self.year }
        } else {
            MonthRef { month: 1, year: self.year + 1 }
        }
    }

    /// Builds the annotated grid. `None` for meetings behaves as an empty
    /// list.
    pub fn build(
        &self,
        meetings: Option<&[MeetingDetail]>,
        availability: Option<&[AvailabilityWindow]>,
        clock: &dyn Clock,
    ) -> CalendarData {
        let today = clock.today();
        let meetings = meetings.unwrap_or_default();

        tracing::debug!(
            "Building calendar for {}-{:02}: {} meetings, {} availability windows",
            self.year,
            self.month,
            meetings.len(),
            availability.map_or(0, <[AvailabilityWindow]>::len),
        );

        let mut by_day: HashMap<u32, Vec<&MeetingDetail>> = HashMap::new();
        for detail in meetings {
            by_day.entry(detail.meeting.date.day()).or_default().push(detail);
        }
        for day_meetings in by_day.values_mut() {
            day_meetings.sort_by_key(|d| d.meeting.start_time);
        }

        let weeks = self
            .month_grid()
            .into_iter()
            .map(|week| {
                week.into_iter()
                    .map(|day| self.cell(day, today, &by_day))
                    .collect()
            })
            .collect();

        CalendarData {
            weeks,
            month_name: self.month_name().to_string(),
            year: self.year,
            month: self.month,
            prev_month: self.prev_month(),
            next_month: self.next_month(),
            today: TodayRef {
                day: today.day(),
                month: today.month(),
                year: today.year(),
            },
        }
    }

    fn cell(&self, day: u32, today: NaiveDate, by_day: &HashMap<u32, Vec<&MeetingDetail>>) -> DayCell {
        let Some(date) = NaiveDate::from_ymd_opt(self.year, self.month, day) else {
            return DayCell::placeholder();
        };

        let meetings = by_day
            .get(&day)
            .map(|list| list.iter().map(|detail| summarize(detail)).collect())
            .unwrap_or_default();

        DayCell {
            day: Some(day),
            is_current_month: true,
            is_today: date == today,
            weekday: Some(weekday::full_name(date.weekday()).to_string()),
            meetings,
            slots: Vec::new(),
        }
    }
}

fn summarize(detail: &MeetingDetail) -> MeetingSummary {
    let meeting = &detail.meeting;
    MeetingSummary {
        id: meeting.id,
        start: format_hm(meeting.start_time),
        end: format_hm(meeting.end_time),
        topic: meeting.topic.clone(),
        student: detail.student_name.clone(),
        status: meeting.status,
        notes: meeting.notes.clone(),
        kind: MEETING_ENTRY.to_string(),
    }
}
