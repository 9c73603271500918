use chrono::NaiveDate;

use crate::dashboard::hierarchy::Hierarchy;
use crate::domain::{Slot, Venue};

/// Placeholder in the dashboard template that receives the generated markup
pub const CONTENT_PLACEHOLDER: &str = "{{content}}";

pub const TEMPLATE_MISSING_HTML: &str =
    "<h1>Error: Template file not found in /templates/dashboard.html</h1>";

/// Why the dashboard has nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoDataFolder,
    NoData,
}

impl EmptyState {
    pub fn markup(&self) -> &'static str {
        match self {
            Self::NoDataFolder => "<div class='no-data'><h2>No Data Folder Found</h2></div>",
            Self::NoData => {
                "<div class='no-data'><h2>No Data Available</h2><p>Run the scraper first.</p></div>"
            }
        }
    }
}

pub fn fill_template(template: &str, content: &str) -> String {
    template.replace(CONTENT_PLACEHOLDER, content)
}

/// Markup for every date block, in hierarchy order
pub fn render_hierarchy(hierarchy: &Hierarchy) -> String {
    let mut html = String::new();

    for (date, locations) in hierarchy.iter() {
        html.push_str(&format!(
            "\n<div class=\"date-block\" data-date=\"{}\">\n<div class=\"date-header\">{}</div>\n",
            date.format("%Y-%m-%d"),
            format_date(date)
        ));

        for (location, courts) in locations {
            html.push_str(&format!(
                "<div class=\"location-container\">\n<div class=\"location-name\">{}</div>\n<div class=\"court-grid\">\n",
                escape_html(location)
            ));
            for court in courts {
                html.push_str(&render_court(court));
            }
            html.push_str("</div></div>\n"); // location container
        }

        html.push_str("</div>\n"); // date block
    }

    html
}

fn render_court(court: &Venue) -> String {
    let mut html = format!(
        "<div class=\"court-card\">\n<div class=\"court-title\">{}</div>\n<table>\n\
         <thead><tr><th>Time</th><th>Price</th><th>Status</th></tr></thead>\n<tbody>\n",
        escape_html(&court.venue_name)
    );
    for slot in &court.time_slots {
        html.push_str(&render_slot(slot));
    }
    html.push_str("</tbody></table></div>\n");
    html
}

fn render_slot(slot: &Slot) -> String {
    let (row_class, status_class, status_text) = if slot.available {
        ("", "available", "FREE")
    } else {
        ("booked-row", "booked", "Booked")
    };

    format!(
        "<tr class=\"{}\"><td>{} - {}</td><td><span class=\"price-tag\">{}</span></td><td class=\"{}\">{}</td></tr>\n",
        row_class,
        escape_html(&slot.start_time),
        escape_html(&slot.end_time),
        format_price(slot),
        status_class,
        status_text
    )
}

/// e.g. "Friday, 06 Jun 2025"
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%A, %d %b %Y").to_string()
}

pub fn format_price(slot: &Slot) -> String {
    format!("RM{:.0}", slot.price_value())
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
