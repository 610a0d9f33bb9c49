//!
//! Presentation model of the card and its HTML fragment.

use crate::primitives::{DepartureRow, RowSequence};
use crate::types::DepartureStatus;

/// What the board body shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum BoardStatus {
    /// Waiting for the registry before any sensor can be resolved.
    Pending,
    NoServices,
    Services(usize),
}

/// Everything needed to draw the card for one recomputation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CardView {
    pub title: Option<String>,
    pub rows: RowSequence,
    pub last_updated: Option<String>,
    pub status: BoardStatus,
}

impl CardView {
    pub fn new(title: Option<String>, rows: RowSequence, last_updated: Option<String>, pending: bool) -> Self {
        let status = if !rows.is_empty() {
            BoardStatus::Services(rows.len())
        } else if pending {
            BoardStatus::Pending
        } else {
            BoardStatus::NoServices
        };
        CardView { title, rows, last_updated, status }
    }

    /// Renders the card as a self-contained HTML fragment, styles included.
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(STYLE.len() + 256 * (self.rows.len() + 1));
        html.push_str("<style>");
        html.push_str(STYLE);
        html.push_str("</style><ha-card>");

        if let Some(title) = &self.title {
            html.push_str(&format!(r#"<div class="header"><div class="title">{}</div></div>"#, escape_html(title)));
        }

        match self.status {
            BoardStatus::Services(_) => {
                html.push_str(r#"<div class="table">"#);
                for head in ["Scheduled", "Destination", "Estimated"] {
                    html.push_str(&format!(r#"<div class="head">{}</div>"#, head));
                }
                for row in &self.rows {
                    write_row(&mut html, row);
                }
                html.push_str("</div>");
            }
            BoardStatus::Pending => html.push_str(r#"<div class="empty">Loading services…</div>"#),
            BoardStatus::NoServices => html.push_str(r#"<div class="empty">No services available.</div>"#),
        }

        if let Some(updated) = &self.last_updated {
            html.push_str(&format!(r#"<div class="updated">Last updated {}</div>"#, escape_html(updated)));
        }

        html.push_str("</ha-card>");
        html
    }
}

fn write_row(html: &mut String, row: &DepartureRow) {
    let class = match row.status {
        DepartureStatus::Normal => "row",
        DepartureStatus::Delayed => "row delayed",
        DepartureStatus::Cancelled => "row cancelled",
    };
    let badge = if row.is_replacement {
        format!(r#" <span class="badge">{}</span>"#, escape_html(&row.service_type))
    } else {
        String::new()
    };
    html.push_str(&format!(
        r#"<div class="{}"><div class="cell">{}</div><div class="cell">{}{}</div><div class="cell">{}</div></div>"#,
        class,
        escape_html(&row.scheduled),
        escape_html(&row.destination),
        badge,
        escape_html(&row.estimated),
    ));
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

pub const STYLE: &str = r#"
:host { display: block; }
ha-card { overflow: hidden; }
.header { padding: 16px 16px 0 16px; }
.title { font-size: 1.1rem; font-weight: 600; line-height: 1.4; }
.table {
  display: grid;
  grid-template-columns: minmax(70px, 0.8fr) 2fr minmax(70px, 0.8fr);
  gap: 4px 12px;
  padding: 16px;
}
.head {
  font-size: 0.75rem;
  letter-spacing: 0.06em;
  text-transform: uppercase;
  color: var(--secondary-text-color);
}
.row { display: contents; font-size: 0.95rem; }
.cell { padding: 4px 0; border-bottom: 1px solid rgba(0, 0, 0, 0.08); }
.row:last-of-type .cell { border-bottom: none; }
.row.delayed .cell:last-child { color: var(--warning-color); }
.row.cancelled .cell { color: var(--error-color); text-decoration: line-through; }
.badge {
  font-size: 0.7rem;
  padding: 0 4px;
  border-radius: 4px;
  text-transform: uppercase;
  background: var(--secondary-background-color);
}
.empty { padding: 16px; color: var(--secondary-text-color); font-style: italic; }
.updated { padding: 0 16px 12px; font-size: 0.75rem; color: var(--secondary-text-color); }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derivation() {
        assert_eq!(CardView::new(None, vec![], None, true).status, BoardStatus::Pending);
        assert_eq!(CardView::new(None, vec![], None, false).status, BoardStatus::NoServices);
        let rows = vec![DepartureRow::new("10:00", "Leeds", "-")];
        assert_eq!(CardView::new(None, rows, None, true).status, BoardStatus::Services(1));
    }

    #[test]
    fn test_html_escapes_sensor_text() {
        let mut row = DepartureRow::new("10:00", "<b>Leeds</b> & Bradford", "-");
        row.status = DepartureStatus::Cancelled;
        let html = CardView::new(Some("Mine \"board\"".into()), vec![row], Some("10:01".into()), false).to_html();

        assert!(html.contains("&lt;b&gt;Leeds&lt;/b&gt; &amp; Bradford"));
        assert!(html.contains(r#"<div class="title">Mine &quot;board&quot;</div>"#));
        assert!(html.contains(r#"<div class="row cancelled">"#));
        assert!(html.contains("Last updated 10:01"));
        assert!(!html.contains("<b>Leeds"));
    }

    #[test]
    fn test_html_empty_states() {
        let empty = CardView::new(None, vec![], None, false).to_html();
        assert!(empty.contains("No services available."));
        assert!(!empty.contains(r#"class="header""#));
        assert!(!empty.contains(r#"class="table""#));

        let pending = CardView::new(None, vec![], None, true).to_html();
        assert!(pending.contains("Loading services"));
    }

    #[test]
    fn test_replacement_badge() {
        let mut row = DepartureRow::new("10:00", "Leeds", "10:05");
        row.service_type = "bus".into();
        row.is_replacement = true;
        let html = CardView::new(None, vec![row], None, false).to_html();
        assert!(html.contains(r#"Leeds <span class="badge">bus</span>"#));
    }
}
