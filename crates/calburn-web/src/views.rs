//! HTML views
//!
//! Plain string rendering. Every value that originated from a user is
//! escaped before it is written into markup.

use calburn_core::model::GENDER_OPTIONS;
use calburn_core::PredictionRecord;

use crate::form::{
    FIELD_AGE, FIELD_BODY_TEMP, FIELD_DURATION, FIELD_GENDER, FIELD_HEART_RATE, FIELD_HEIGHT,
    FIELD_WEIGHT,
};

const TITLE: &str = "Calories Burnt Prediction";

/// `Calories Burnt: X` with X in shortest round-trip form (`231.0`, `87.35`)
pub fn prediction_text(prediction: f64) -> String {
    format!("Calories Burnt: {:?}", prediction)
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(heading: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{heading}</h1>\n{body}</body>\n</html>\n",
        title = TITLE,
        heading = heading,
        body = body,
    )
}

fn number_input(name: &str, label: &str, step: &str) -> String {
    format!(
        "<p><label for=\"{name}\">{label}</label>\n<input type=\"number\" id=\"{name}\" name=\"{name}\" step=\"{step}\" min=\"0\" required></p>\n"
    )
}

/// Input form, optionally followed by the latest prediction
pub fn render_index(prediction_text: Option<&str>) -> String {
    let mut body = String::new();

    body.push_str("<form action=\"/predict\" method=\"post\">\n");
    body.push_str(&format!(
        "<p><label for=\"{0}\">Gender</label>\n<select id=\"{0}\" name=\"{0}\">\n",
        FIELD_GENDER
    ));
    for option in GENDER_OPTIONS {
        let option = escape_html(option);
        body.push_str(&format!("<option value=\"{0}\">{0}</option>\n", option));
    }
    body.push_str("</select></p>\n");

    body.push_str(&number_input(FIELD_AGE, "Age (years)", "1"));
    body.push_str(&number_input(FIELD_HEIGHT, "Height (cm)", "any"));
    body.push_str(&number_input(FIELD_WEIGHT, "Weight (kg)", "any"));
    body.push_str(&number_input(FIELD_DURATION, "Duration (minutes)", "any"));
    body.push_str(&number_input(FIELD_HEART_RATE, "Heart Rate (bpm)", "any"));
    body.push_str(&number_input(FIELD_BODY_TEMP, "Body Temperature (°C)", "any"));

    body.push_str("<button type=\"submit\">Predict</button>\n</form>\n");

    if let Some(text) = prediction_text {
        body.push_str(&format!("<p class=\"prediction\">{}</p>\n", escape_html(text)));
    }

    body.push_str("<p><a href=\"/history\">Prediction history</a></p>\n");
    page(TITLE, &body)
}

/// Table of stored predictions in the order given (newest first)
pub fn render_history(records: &[PredictionRecord]) -> String {
    let mut body = String::new();

    body.push_str("<table>\n<thead>\n<tr>");
    for heading in [
        "ID",
        "Gender",
        "Age",
        "Height",
        "Weight",
        "Duration",
        "Heart Rate",
        "Body Temp",
        "Prediction",
    ] {
        body.push_str(&format!("<th>{}</th>", heading));
    }
    body.push_str("</tr>\n</thead>\n<tbody>\n");

    if records.is_empty() {
        body.push_str("<tr class=\"empty\"><td colspan=\"9\">No predictions yet</td></tr>\n");
    }

    for r in records {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            r.id,
            escape_html(&r.gender),
            r.age,
            r.height,
            r.weight,
            r.duration,
            r.heart_rate,
            r.body_temp,
            r.prediction,
        ));
    }

    body.push_str("</tbody>\n</table>\n<p><a href=\"/\">New prediction</a></p>\n");
    page("Prediction History", &body)
}
