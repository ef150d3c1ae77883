// src/utils/url.rs

//! Search URL construction.
//!
//! Craigslist search pages carry their list state in the URL fragment
//! (`#search=1~list~0~0`), so query tags have to land *before* the fragment
//! and the fragment itself must stay intact. `url::Url` normalizes
//! fragments away, so the splicing here works on the raw string and `Url`
//! is only used to validate the final result.

use std::collections::BTreeMap;

use url::Url;

use crate::error::Result;
use crate::models::FilterValue;

/// Fragment suffix selecting the list view.
const LIST_FRAGMENT: &str = "#search=1~list~0~0";

/// Insert `tag=value` pairs into a search link, before the `#search`
/// fragment. A multi-valued filter expands to repeated tags.
pub fn insert_tag(link: &str, tag: &str, values: &[String]) -> String {
    let (mut left, right) = match link.split_once("#search") {
        Some((l, r)) => (l.to_string(), Some(r)),
        None => (link.to_string(), None),
    };

    let tags = values
        .iter()
        .map(|value| format!("{}={}", tag, value))
        .collect::<Vec<_>>()
        .join("&");

    if left.contains('?') {
        left.push('&');
    } else {
        left.push('?');
    }
    left.push_str(&tags);

    match right {
        Some(right) => format!("{}#search{}", left, right),
        None => left,
    }
}

/// Build the search URL for a watch.
///
/// A direct link overrides construction entirely; its `#search=1` suffix is
/// normalized to the list view. Otherwise the URL is assembled from locale,
/// optional sublocale, category, and the filter tags.
pub fn build_search_url(
    locale: &str,
    category: &str,
    sublocale: Option<&str>,
    direct_link: Option<&str>,
    filters: &BTreeMap<String, FilterValue>,
) -> Result<String> {
    if let Some(link) = direct_link {
        let normalized = normalize_direct_link(link);
        Url::parse(&normalized)?;
        return Ok(normalized);
    }

    let sublocale = match sublocale {
        Some(s) => format!("{}/", s),
        None => String::new(),
    };

    let mut link = format!(
        "https://{}.craigslist.org/search/{}{}{}",
        locale, sublocale, category, LIST_FRAGMENT
    );

    for (tag, value) in filters {
        link = insert_tag(&link, tag, &value.values());
    }

    Url::parse(&link)?;
    Ok(link)
}

/// Force a direct link's fragment to the list view.
fn normalize_direct_link(link: &str) -> String {
    match link.split_once("#search=1") {
        Some((left, suffix)) if suffix.starts_with("~list") => {
            format!("{}#search=1{}", left, suffix)
        }
        Some((left, _)) => format!("{}{}", left, LIST_FRAGMENT),
        None => format!("{}{}", link, LIST_FRAGMENT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterScalar;

    #[test]
    fn test_insert_tag_first_tag_uses_question_mark() {
        let link = "https://sfbay.craigslist.org/search/cta#search=1~list~0~0";
        let result = insert_tag(link, "min_price", &["100".to_string()]);
        assert_eq!(
            result,
            "https://sfbay.craigslist.org/search/cta?min_price=100#search=1~list~0~0"
        );
    }

    #[test]
    fn test_insert_tag_second_tag_uses_ampersand() {
        let link = "https://sfbay.craigslist.org/search/cta?min_price=100#search=1~list~0~0";
        let result = insert_tag(link, "query", &["bike".to_string()]);
        assert_eq!(
            result,
            "https://sfbay.craigslist.org/search/cta?min_price=100&query=bike#search=1~list~0~0"
        );
    }

    #[test]
    fn test_insert_tag_multi_value_repeats_tag() {
        let link = "https://sfbay.craigslist.org/search/cta#search=1~list~0~0";
        let result = insert_tag(link, "condition", &["10".to_string(), "20".to_string()]);
        assert!(result.contains("?condition=10&condition=20#search"));
    }

    #[test]
    fn test_build_from_parts() {
        let mut filters = BTreeMap::new();
        filters.insert(
            "query".to_string(),
            FilterValue::One(FilterScalar::Text("road bike".to_string())),
        );

        let link =
            build_search_url("sfbay", "cta", Some("eby"), None, &filters).unwrap();
        assert_eq!(
            link,
            "https://sfbay.craigslist.org/search/eby/cta?query=road bike#search=1~list~0~0"
        );
    }

    #[test]
    fn test_direct_link_overrides_parts() {
        let link = build_search_url(
            "sfbay",
            "cta",
            None,
            Some("https://austin.craigslist.org/search/bia#search=1~list~0~0"),
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(
            link,
            "https://austin.craigslist.org/search/bia#search=1~list~0~0"
        );
    }

    #[test]
    fn test_direct_link_gallery_fragment_is_rewritten() {
        let link = build_search_url(
            "sfbay",
            "cta",
            None,
            Some("https://austin.craigslist.org/search/bia#search=1~gallery~0~0"),
            &BTreeMap::new(),
        )
        .unwrap();
        assert!(link.ends_with("#search=1~list~0~0"));
    }

    #[test]
    fn test_direct_link_without_fragment_gains_one() {
        let link = build_search_url(
            "sfbay",
            "cta",
            None,
            Some("https://austin.craigslist.org/search/bia"),
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(
            link,
            "https://austin.craigslist.org/search/bia#search=1~list~0~0"
        );
    }
}
