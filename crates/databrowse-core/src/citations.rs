//! Per-dataset citation fetching and IEEE-style formatting.

use futures_util::future::join_all;

use crate::client::Backend;
use crate::ids;
use crate::models::Citation;

pub const NO_CITATION: &str = "No citation available.";

/// Citations fetched for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetCitations {
    pub dataset_id: String,
    pub citations: Vec<Citation>,
}

/// One rendered list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationItem {
    pub index: usize,
    /// `citation_<index>`, shared by all items of the same dataset.
    pub element_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationList {
    pub items: Vec<CitationItem>,
}

impl CitationList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Fetch citations for every dataset concurrently and wait for all of them.
///
/// The result is in `dataset_ids` order. A failed fetch yields an empty list
/// for that dataset only.
pub async fn fetch_all<B>(backend: &B, dataset_ids: &[String]) -> Vec<DatasetCitations>
where
    B: Backend,
{
    let fetches = dataset_ids.iter().map(|dataset_id| async move {
        let citations = match backend.fetch_citations(dataset_id).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(dataset_id = %dataset_id, error = %e, "error fetching citations");
                Vec::new()
            }
        };
        DatasetCitations {
            dataset_id: dataset_id.clone(),
            citations,
        }
    });
    join_all(fetches).await
}

/// Number datasets 1..=N in list order and flatten their citations.
pub fn build_citation_list(results: &[DatasetCitations]) -> CitationList {
    let mut items = Vec::new();
    for (position, result) in results.iter().enumerate() {
        let index = position + 1;
        let element_id = ids::citation_anchor(index);
        if result.citations.is_empty() {
            items.push(CitationItem {
                index,
                element_id,
                text: format!("[{index}] {NO_CITATION}"),
            });
            continue;
        }
        for citation in &result.citations {
            items.push(CitationItem {
                index,
                element_id: element_id.clone(),
                text: format_ieee(index, citation),
            });
        }
    }
    CitationList { items }
}

/// `[i] author, "text," start-end, accessed on date. Available: url`
pub fn format_ieee(index: usize, citation: &Citation) -> String {
    format!(
        "[{}] {}, \"{},\" {}-{}, accessed on {}. Available: {}",
        index,
        citation.author.as_deref().unwrap_or_default(),
        citation.text.as_deref().unwrap_or_default(),
        year(citation.start_date.as_deref()),
        year(citation.end_date.as_deref()),
        citation.date_accessed.as_deref().unwrap_or_default(),
        citation.url.as_deref().unwrap_or_default(),
    )
}

/// First four characters of a date, or empty.
fn year(date: Option<&str>) -> &str {
    match date {
        Some(d) => match d.char_indices().nth(4) {
            Some((end, _)) => &d[..end],
            None => d,
        },
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_citation() -> Citation {
        Citation {
            citation_id: Some(1),
            text: Some("World Development Indicators".into()),
            author: Some("World Bank".into()),
            url: Some("https://data.worldbank.org".into()),
            start_date: Some("1990-01-01".into()),
            end_date: Some("2020-12-31".into()),
            date_accessed: Some("2024-03-05".into()),
        }
    }

    #[test]
    fn ieee_format_uses_years_and_verbatim_access_date() {
        assert_eq!(
            format_ieee(2, &full_citation()),
            "[2] World Bank, \"World Development Indicators,\" 1990-2020, accessed on 2024-03-05. Available: https://data.worldbank.org"
        );
    }

    #[test]
    fn missing_dates_render_empty() {
        let c = Citation {
            start_date: None,
            end_date: None,
            date_accessed: None,
            ..full_citation()
        };
        let text = format_ieee(1, &c);
        assert_eq!(
            text,
            "[1] World Bank, \"World Development Indicators,\" -, accessed on . Available: https://data.worldbank.org"
        );
        assert!(!text.contains("None"));
        assert!(!text.contains("null"));
    }

    #[test]
    fn short_dates_are_kept_whole() {
        assert_eq!(year(Some("199")), "199");
        assert_eq!(year(Some("2001")), "2001");
        assert_eq!(year(None), "");
    }

    #[test]
    fn empty_dataset_gets_one_placeholder() {
        let list = build_citation_list(&[
            DatasetCitations {
                dataset_id: "7".into(),
                citations: vec![full_citation(), full_citation()],
            },
            DatasetCitations {
                dataset_id: "8".into(),
                citations: vec![],
            },
        ]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.items[0].element_id, "citation_1");
        assert_eq!(list.items[1].element_id, "citation_1");
        assert_eq!(
            list.items[2],
            CitationItem {
                index: 2,
                element_id: "citation_2".into(),
                text: "[2] No citation available.".into(),
            }
        );
    }

    #[test]
    fn no_datasets_no_items() {
        assert!(build_citation_list(&[]).is_empty());
    }
}
