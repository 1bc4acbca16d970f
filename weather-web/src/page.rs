use chrono::TimeZone;
use std::fmt::{Display, Write};
use weather_core::{
    LookupOutcome,
    present::{self, Field, Notice, ReportView, View},
};

const STYLE: &str = "\
body{font-family:sans-serif;max-width:640px;margin:40px auto;padding:0 16px;color:#222}\
form{display:flex;gap:8px;margin:16px 0}\
input[type=text]{flex:1;padding:6px}\
.notice{padding:12px;border-radius:4px;background:#e8f1fb}\
.notice.error{background:#fbe9e9}\
.header{display:flex;justify-content:space-between;align-items:center}\
table{border-collapse:collapse}\
td{padding:4px 16px 4px 0}";

/// The whole dashboard page: search form plus results panel.
pub fn render<Tz>(city: &str, outcome: &LookupOutcome, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>Weather Dashboard</title><style>{STYLE}</style></head><body>\
         <h1>&#9729;&#65039; Weather Dashboard</h1>\
         <p>Get current weather information for any city around the world.</p>\
         <form method=\"get\" action=\"/\">\
         <label for=\"city\">Enter a city name:</label>\
         <input type=\"text\" id=\"city\" name=\"city\" value=\"{}\" autofocus>\
         <button type=\"submit\">Search</button></form>",
        escape(city)
    );

    match present::view(outcome, tz) {
        View::Notice(notice) => write_notice(&mut html, notice),
        View::Report(report) => write_report(&mut html, &report),
    }

    html.push_str("</body></html>");
    html
}

fn write_notice(html: &mut String, notice: Notice) {
    let class = if notice.is_error() { "notice error" } else { "notice" };
    let _ = write!(html, "<div class=\"{class}\">{}</div>", escape(notice.message()));
}

fn write_report(html: &mut String, report: &ReportView) {
    let _ = write!(
        html,
        "<section id=\"report\"><div class=\"header\"><h2>{}</h2>\
         <img src=\"{}\" width=\"100\" alt=\"\"></div>\
         <p>Last updated: {}</p>",
        escape(&report.heading),
        escape(&report.icon_url),
        escape(&report.updated),
    );

    write_table(html, &report.summary);
    html.push_str("<details><summary>Additional details</summary>");
    write_table(html, &report.details);
    html.push_str("</details></section>");
}

fn write_table(html: &mut String, fields: &[Field]) {
    html.push_str("<table>");
    for field in fields {
        let _ = write!(
            html,
            "<tr><td><strong>{}</strong></td><td>{}</td></tr>",
            escape(field.label),
            escape(&field.value)
        );
    }
    html.push_str("</table>");
}

fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
