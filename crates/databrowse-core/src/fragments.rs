//! HTML fragments exchanged between the server and the selectors.
//!
//! The server renders option lists and dataset checkboxes; the browser drops
//! them into the page as-is, while the terminal client parses them back.

use scraper::{ElementRef, Html, Selector};

use crate::ids;
use crate::models::OptionEntry;

pub const CATEGORY_PROMPT: &str = "Select a category...";
pub const CONTEXT_PROMPT: &str = "Select a context...";

/// `<option>` list led by an empty-valued prompt option.
pub fn render_options(prompt: &str, entries: &[OptionEntry]) -> String {
    let mut html = format!(r#"<option value="">{}</option>"#, escape_html(prompt));
    for entry in entries {
        html.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            escape_html(&entry.value),
            escape_html(&entry.label)
        ));
    }
    html
}

/// One labelled checkbox per dataset, named `datasets`.
pub fn render_dataset_checkboxes(entries: &[OptionEntry]) -> String {
    let mut html = String::new();
    for entry in entries {
        let value = escape_html(&entry.value);
        let id = ids::dataset_checkbox(&value);
        html.push_str(&format!(
            r#"
        <div class="checkbox-group">
            <input type="checkbox" id="{id}" name="datasets" value="{value}">
            <label for="{id}">{}</label>
        </div>
        "#,
            escape_html(&entry.label)
        ));
    }
    html
}

/// Options with a non-empty value, in document order.
pub fn parse_options(html: &str) -> Vec<OptionEntry> {
    let doc = Html::parse_fragment(html);
    let option_sel = Selector::parse("option").unwrap();
    doc.select(&option_sel)
        .filter_map(|opt| {
            let value = opt.value().attr("value")?;
            if value.is_empty() {
                return None;
            }
            Some(OptionEntry::new(value, text_of(&opt)))
        })
        .collect()
}

/// Dataset checkboxes with their label text, in document order.
///
/// The label is the `<label for=...>` matching the checkbox id, falling back
/// to the checkbox's next element sibling. Checkboxes without a label are
/// named `Dataset <id>`.
pub fn parse_dataset_checkboxes(html: &str) -> Vec<OptionEntry> {
    let doc = Html::parse_fragment(html);
    let checkbox_sel = Selector::parse(r#"input[type="checkbox"]"#).unwrap();
    let label_sel = Selector::parse("label").unwrap();

    let labels: Vec<(String, String)> = doc
        .select(&label_sel)
        .filter_map(|l| Some((l.value().attr("for")?.to_string(), text_of(&l))))
        .collect();

    doc.select(&checkbox_sel)
        .filter_map(|input| {
            let value = input.value().attr("value")?;
            if value.is_empty() {
                return None;
            }
            let by_for = input
                .value()
                .attr("id")
                .and_then(|id| labels.iter().find(|(f, _)| f == id))
                .map(|(_, text)| text.clone());
            let label = by_for
                .or_else(|| input.next_siblings().find_map(ElementRef::wrap).map(|e| text_of(&e)))
                .unwrap_or_else(|| format!("Dataset {value}"));
            Some(OptionEntry::new(value, label))
        })
        .collect()
}

fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect()
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
