//! Weekly demo schedule used to populate an empty site.

use crate::core::{BookingError, BookingService, ClassSession, ClassType, NotificationGateway, SessionStore, WodType};
use crate::util::clock::{TimestampMs, MINUTE_MS};

const HOUR_MS: TimestampMs = 60 * MINUTE_MS;
const DAY_MS: TimestampMs = 24 * HOUR_MS;

/// One recurring slot of the weekly template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    class_type: ClassType,
    offset_hours: u32,
    duration_minutes: u32,
    capacity: u32,
}

/// Generates a run of daily sessions from a fixed template.
///
/// The default template has three classes per day: crossfit at the anchor
/// (90 minutes, 25 seats, workout focus rotating upper, lower, all body),
/// ritmo six hours later and machinefit twelve hours later (60 minutes, 20
/// seats each).
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    site_id: String,
    teacher_id: String,
    first_class_ms: TimestampMs,
    days: u32,
    slots: Vec<Slot>,
}

impl ScheduleBuilder {
    /// Template for `site_id` taught by `teacher_id`, starting at `first_class_ms`.
    pub fn new(site_id: impl Into<String>, teacher_id: impl Into<String>, first_class_ms: TimestampMs) -> Self {
        Self {
            site_id: site_id.into(),
            teacher_id: teacher_id.into(),
            first_class_ms,
            days: 7,
            slots: vec![
                Slot {
                    class_type: ClassType::Crossfit,
                    offset_hours: 0,
                    duration_minutes: ClassSession::DEFAULT_DURATION_MINUTES,
                    capacity: ClassSession::DEFAULT_CAPACITY,
                },
                Slot {
                    class_type: ClassType::Ritmo,
                    offset_hours: 6,
                    duration_minutes: 60,
                    capacity: 20,
                },
                Slot {
                    class_type: ClassType::Machinefit,
                    offset_hours: 12,
                    duration_minutes: 60,
                    capacity: 20,
                },
            ],
        }
    }

    /// Number of consecutive days to generate.
    #[must_use]
    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    /// Last instant covered by the generated schedule.
    ///
    /// The range is `[first_class_ms, first_class_ms + days)`: a session at
    /// the same time `days` later belongs to the next run.
    pub fn range_end_ms(&self) -> TimestampMs {
        self.first_class_ms
            .saturating_add(TimestampMs::from(self.days) * DAY_MS)
            .saturating_sub(1)
    }

    /// Materialize the sessions, earliest first.
    pub fn build(&self) -> Vec<ClassSession> {
        let mut sessions = Vec::with_capacity(self.days as usize * self.slots.len());
        for day in 0..self.days {
            let day_start = self.first_class_ms + TimestampMs::from(day) * DAY_MS;
            for slot in &self.slots {
                let starts_at = day_start + TimestampMs::from(slot.offset_hours) * HOUR_MS;
                let mut session = ClassSession::new(slot.class_type, &self.teacher_id, &self.site_id, starts_at)
                    .with_duration(slot.duration_minutes)
                    .with_capacity(slot.capacity);
                if slot.class_type == ClassType::Crossfit {
                    session = session.with_wod(wod_for_day(day));
                }
                sessions.push(session);
            }
        }
        sessions
    }
}

const fn wod_for_day(day: u32) -> WodType {
    match day % 3 {
        0 => WodType::Upper,
        1 => WodType::Lower,
        _ => WodType::Allbody,
    }
}

/// Insert a week of demo sessions for `site_id` unless that week already has any.
///
/// Returns how many sessions were written.
pub async fn seed_week_if_empty<S, N>(
    service: &BookingService<S, N>,
    site_id: &str,
    teacher_id: &str,
    first_class_ms: TimestampMs,
) -> Result<usize, BookingError>
where
    S: SessionStore + ?Sized,
    N: NotificationGateway,
{
    let builder = ScheduleBuilder::new(site_id, teacher_id, first_class_ms);
    let existing = service
        .list_sessions_in_range(site_id, first_class_ms, builder.range_end_ms())
        .await?;
    if !existing.is_empty() {
        tracing::debug!(site = %site_id, existing = existing.len(), "schedule already seeded");
        return Ok(0);
    }

    let sessions = builder.build();
    let count = sessions.len();
    for session in sessions {
        service.upsert_session(session).await?;
    }
    tracing::info!(site = %site_id, sessions = count, "seeded weekly schedule");
    Ok(count)
}
