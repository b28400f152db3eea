//! ICS generation for the merged timetable.

use chrono::Days;
use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use crate::config::{Config, GeneratorMode};
use crate::error::{ScheduleError, ScheduleResult};
use crate::event::{Event, EventTime};
use crate::week::{DAY_LABELS, LessonSlot, WeekRecord};

/// Build the full .ics document for the generated weeks.
///
/// Events come out in week, day, period order. The output is complete:
/// callers replace any previous file instead of merging into it.
pub fn build_calendar(weeks: &[WeekRecord], config: &Config) -> ScheduleResult<String> {
    // Validate the zone id once; every timed instant carries it uniformly.
    let tz: chrono_tz::Tz = config
        .timezone
        .parse()
        .map_err(|_| ScheduleError::UnknownTimeZone(config.timezone.clone()))?;

    let events = match config.mode {
        GeneratorMode::Session => session_events(weeks, config, tz.name()),
        GeneratorMode::DayAggregate => day_aggregate_events(weeks, config, tz.name()),
    };

    let mut cal = Calendar::new();

    // Calendar-level metadata (de facto standard properties).
    cal.append_property(Property::new("X-WR-CALNAME", calendar_name(weeks, config)));
    cal.append_property(Property::new("X-WR-TIMEZONE", tz.name()));

    for event in &events {
        cal.push(to_ics_event(event));
    }
    let cal = cal.done();

    Ok(tidy_ics(&cal.to_string()))
}

fn calendar_name(weeks: &[WeekRecord], config: &Config) -> String {
    config
        .calendar_name
        .clone()
        .or_else(|| weeks.first().map(|w| w.title.clone()))
        .unwrap_or_else(|| "Thời khóa biểu".to_string())
}

/// One event per lesson slot, timed by its session window.
fn session_events(weeks: &[WeekRecord], config: &Config, tzid: &str) -> Vec<Event> {
    let mut events = Vec::new();

    for week in weeks {
        for (day, slots) in week.days().into_iter().enumerate() {
            let date = week.date_of(day as u8);

            for slot in slots {
                let window = config.session_window(&slot.session);
                events.push(Event {
                    uid: slot_uid(week.week_number, day as u8, slot.period),
                    summary: format!("{} ({})", slot.name, slot.session),
                    description: slot.lesson.clone(),
                    start: zoned(date.and_time(window.start), tzid),
                    end: zoned(date.and_time(window.end), tzid),
                });
            }
        }
    }

    events
}

/// One event per day, spanning the day's first period to its last.
fn day_aggregate_events(weeks: &[WeekRecord], config: &Config, tzid: &str) -> Vec<Event> {
    let mut events = Vec::new();

    for week in weeks {
        for (day, slots) in week.days().into_iter().enumerate() {
            if slots.is_empty() {
                continue;
            }

            let date = week.date_of(day as u8);

            let (start, end) = if config.all_day {
                let next_day = date.checked_add_days(Days::new(1)).unwrap_or(date);
                (EventTime::Date(date), EventTime::Date(next_day))
            } else {
                // Slots are ascending by period; gaps between the first and
                // last present period do not matter.
                let first = config.period_window(slots[0].period);
                let last = config.period_window(slots[slots.len() - 1].period);
                (
                    zoned(date.and_time(first.start), tzid),
                    zoned(date.and_time(last.end), tzid),
                )
            };

            events.push(Event {
                uid: day_uid(week.week_number, day as u8),
                summary: format!("{} - {}", DAY_LABELS[day], week.title),
                description: render_day(slots),
                start,
                end,
            });
        }
    }

    events
}

/// The day's periods, one line each; unfilled slots get a leading marker.
fn render_day(slots: &[LessonSlot]) -> String {
    slots
        .iter()
        .map(|slot| {
            let marker = if slot.is_bold { "* " } else { "" };
            if slot.lesson.is_empty() {
                format!("{}{}. {}", marker, slot.period, slot.name)
            } else {
                format!("{}{}. {}: {}", marker, slot.period, slot.name, slot.lesson)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn zoned(datetime: chrono::NaiveDateTime, tzid: &str) -> EventTime {
    EventTime::Zoned {
        datetime,
        tzid: tzid.to_string(),
    }
}

fn slot_uid(week: u32, day: u8, period: u32) -> String {
    format!("w{:02}d{}p{}@tkb", week, day, period)
}

fn day_uid(week: u32, day: u8) -> String {
    format!("w{:02}d{}@tkb", week, day)
}

fn to_ics_event(event: &Event) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.summary);

    if !event.description.is_empty() {
        ics_event.description(&event.description);
    }

    // DTSTAMP is required by RFC 5545; derive it from the event start so
    // regenerated output is byte-identical across runs.
    ics_event.add_property("DTSTAMP", dtstamp(&event.start));

    add_datetime_property(&mut ics_event, "DTSTART", &event.start);
    add_datetime_property(&mut ics_event, "DTEND", &event.end);

    ics_event.done()
}

fn dtstamp(time: &EventTime) -> String {
    match time {
        EventTime::Date(d) => format!("{}T000000Z", d.format("%Y%m%d")),
        EventTime::Zoned { datetime, .. } => datetime.format("%Y%m%dT%H%M%SZ").to_string(),
    }
}

/// Add a datetime property with formatting based on the EventTime variant.
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(d) => {
            let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            ics_event.append_property(prop);
        }
        EventTime::Zoned { datetime, tzid } => {
            let mut prop = Property::new(name, datetime.format("%Y%m%dT%H%M%S").to_string());
            prop.add_parameter("TZID", tzid);
            ics_event.append_property(prop);
        }
    }
}

/// Clean up the icalendar crate's output:
/// - replace PRODID with our own
/// - drop CALSCALE:GREGORIAN (it is the default)
fn tidy_ics(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:TKB\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
