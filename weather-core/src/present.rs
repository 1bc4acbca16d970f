//! Turning lookup outcomes into something a person can read.
//!
//! [`view`] does all the formatting and decides which fields are shown;
//! [`render_text`] lays the result out for a terminal. Other front ends
//! (the web dashboard) lay out the same [`View`] their own way.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::{Display, Write};

use crate::{LookupError, WeatherReport, model::LookupOutcome};

pub const PROMPT_MESSAGE: &str = "Enter a city name to get started!";
pub const NOT_FOUND_MESSAGE: &str = "City not found. Please check the spelling and try again.";
pub const UNAVAILABLE_MESSAGE: &str = "Weather data is unavailable right now. Please try again.";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong while reading the weather data.";

/// Anything other than a report: the empty state or a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Prompt,
    NotFound,
    Unavailable,
    Failed,
}

impl Notice {
    pub fn for_error(err: &LookupError) -> Self {
        match err {
            LookupError::NotFound => Notice::NotFound,
            err if err.is_transient() => Notice::Unavailable,
            _ => Notice::Failed,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::Prompt => PROMPT_MESSAGE,
            Notice::NotFound => NOT_FOUND_MESSAGE,
            Notice::Unavailable => UNAVAILABLE_MESSAGE,
            Notice::Failed => GENERIC_ERROR_MESSAGE,
        }
    }

    pub fn is_error(self) -> bool {
        !matches!(self, Notice::Prompt)
    }
}

/// A labelled, already formatted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self { label, value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    pub heading: String,
    pub updated: String,
    pub icon_url: String,
    pub summary: Vec<Field>,
    pub details: Vec<Field>,
}

impl ReportView {
    pub fn new<Tz>(report: &WeatherReport, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let t = &report.temperature;

        let summary = vec![
            Field::new("Temperature", celsius(t.current_c)),
            Field::new("Feels like", celsius(t.feels_like_c)),
            Field::new("Humidity", format!("{}%", report.humidity_pct)),
            Field::new("Wind speed", format!("{:.1} m/s", report.wind_speed_mps)),
            Field::new("Pressure", format!("{} hPa", report.pressure_hpa)),
            Field::new("Description", capitalize(&report.description)),
        ];

        let mut details = vec![
            Field::new("Min temperature", celsius(t.min_c)),
            Field::new("Max temperature", celsius(t.max_c)),
        ];

        if let Some(metres) = report.visibility_m {
            details.push(Field::new("Visibility", format!("{:.1} km", f64::from(metres) / 1000.0)));
        }
        if let Some(pct) = report.cloudiness_pct {
            details.push(Field::new("Cloudiness", format!("{pct}%")));
        }
        if let Some(mm) = report.rain_1h_mm {
            details.push(Field::new("Rain (1h)", format!("{mm} mm")));
        }
        if let Some(mm) = report.snow_1h_mm {
            details.push(Field::new("Snow (1h)", format!("{mm} mm")));
        }
        if let Some(at) = report.sunrise {
            details.push(Field::new("Sunrise", clock_time(at, tz)));
        }
        if let Some(at) = report.sunset {
            details.push(Field::new("Sunset", clock_time(at, tz)));
        }

        Self {
            heading: format!("{}, {}", report.location_name, report.country_code),
            updated: report
                .observation_time
                .with_timezone(tz)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            icon_url: report.icon_url(),
            summary,
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Notice(Notice),
    Report(ReportView),
}

/// Formatting for every outcome, with timestamps shown in `tz`.
pub fn view<Tz>(outcome: &LookupOutcome, tz: &Tz) -> View
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match outcome {
        Ok(None) => View::Notice(Notice::Prompt),
        Ok(Some(report)) => View::Report(ReportView::new(report, tz)),
        Err(err) => View::Notice(Notice::for_error(err)),
    }
}

/// Plain-text rendering in the local time zone.
pub fn render_text(outcome: &LookupOutcome) -> String {
    render_text_in(outcome, &Local)
}

pub fn render_text_in<Tz>(outcome: &LookupOutcome, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let report = match view(outcome, tz) {
        View::Notice(notice) => return format!("{}\n", notice.message()),
        View::Report(report) => report,
    };

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", report.heading);
    let _ = writeln!(out, "Last updated: {}", report.updated);
    let _ = writeln!(out);
    write_fields(&mut out, &report.summary);
    let _ = writeln!(out);
    let _ = writeln!(out, "Additional details");
    write_fields(&mut out, &report.details);
    out
}

fn write_fields(out: &mut String, fields: &[Field]) {
    for field in fields {
        let label = format!("{}:", field.label);
        let _ = writeln!(out, "  {label:<17}{}", field.value);
    }
}

fn celsius(value: f64) -> String {
    format!("{value:.1}°C")
}

fn clock_time<Tz>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz).format("%H:%M:%S").to_string()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
