//! Listing extraction from search result pages.
//!
//! Craigslist serves two result markups depending on the view: a wide
//! layout (`.result-node-wide`) and a narrow one (`.result-node-narrow`).
//! The probe prefers wide and falls back to narrow; a page with neither is
//! a valid "no results" outcome, not an error. Malformed elements inside a
//! recognized layout are errors, since a broken page should stop the
//! watcher rather than silently drop listings.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::Listing;

/// The two known result-page layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Wide,
    Narrow,
}

impl Layout {
    fn node_selector(self) -> &'static str {
        match self {
            Layout::Wide => ".result-node-wide",
            Layout::Narrow => ".result-node-narrow",
        }
    }

    fn title_selector(self) -> &'static str {
        match self {
            Layout::Wide => ".titlestring",
            Layout::Narrow => ".title-blob .titlestring",
        }
    }
}

/// Extract all listings from a search results page.
pub fn extract_listings(html: &str) -> Result<Vec<Listing>> {
    let document = Html::parse_document(html);

    let wide_nodes: Vec<ElementRef> = document.select(&sel(Layout::Wide.node_selector())?).collect();
    let (layout, nodes) = if wide_nodes.is_empty() {
        let narrow: Vec<ElementRef> = document
            .select(&sel(Layout::Narrow.node_selector())?)
            .collect();
        (Layout::Narrow, narrow)
    } else {
        (Layout::Wide, wide_nodes)
    };

    if nodes.is_empty() {
        return Ok(Vec::new());
    }

    // The wide layout embeds the location in the meta text, delimited by
    // whatever separator character the page uses; probe it from the first
    // element's meta text.
    let sep = match layout {
        Layout::Wide => meta_text(&nodes[0])?.chars().next(),
        Layout::Narrow => None,
    };

    nodes
        .iter()
        .map(|node| parse_element(node, layout, sep))
        .collect()
}

/// Parse one result element into a [`Listing`].
fn parse_element(node: &ElementRef, layout: Layout, sep: Option<char>) -> Result<Listing> {
    let title_elem = node
        .select(&sel(layout.title_selector())?)
        .next()
        .ok_or_else(|| AppError::extract("title", "missing title element"))?;

    let title: String = title_elem.text().collect::<String>().trim().to_string();
    let url = title_elem
        .value()
        .attr("href")
        .ok_or_else(|| AppError::extract("title", "title element has no href"))?
        .to_string();
    let id = listing_id(&url)?;

    let meta = node
        .select(&sel(".meta")?)
        .next()
        .ok_or_else(|| AppError::extract("meta", "missing meta element"))?;

    let posted_at = posted_at(&meta)?;
    let price = price(&meta)?;

    let location = match layout {
        Layout::Narrow => node
            .select(&sel(".supertitle")?)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default(),
        Layout::Wide => wide_location(&meta, sep),
    };

    Ok(Listing {
        id,
        title,
        url,
        location,
        price,
        posted_at,
    })
}

/// Extract the numeric listing id from the URL's trailing path segment.
fn listing_id(url: &str) -> Result<u64> {
    let tail = url.rsplit('/').next().unwrap_or(url);
    tail.trim_end_matches(".html")
        .parse::<u64>()
        .map_err(|e| AppError::extract("id", format!("bad listing id in url {}: {}", url, e)))
}

/// Pull the posting timestamp out of the meta markup's `title` attribute,
/// dropping the trailing ` GMT...` zone suffix. Preserved as raw text.
fn posted_at(meta: &ElementRef) -> Result<String> {
    let inner = meta.inner_html();
    let after = inner
        .split_once("title=\"")
        .map(|(_, rest)| rest)
        .ok_or_else(|| AppError::extract("posted_at", "meta has no title attribute"))?;
    let value = after
        .split_once("\">")
        .map(|(value, _)| value)
        .ok_or_else(|| AppError::extract("posted_at", "unterminated title attribute"))?;

    Ok(value.split(" GMT").next().unwrap_or(value).to_string())
}

/// Parse the price from the meta's `.priceinfo`, stripping `$` and commas.
fn price(meta: &ElementRef) -> Result<u64> {
    let text: String = meta
        .select(&sel(".priceinfo")?)
        .next()
        .ok_or_else(|| AppError::extract("price", "missing priceinfo element"))?
        .text()
        .collect();

    text.trim()
        .trim_matches('$')
        .replace(',', "")
        .parse::<u64>()
        .map_err(|e| AppError::extract("price", format!("bad price '{}': {}", text.trim(), e)))
}

/// Wide-layout location: second separator-delimited segment of the meta
/// text, with padding and `+` markers trimmed. Missing segment means the
/// listing simply has no location.
fn wide_location(meta: &ElementRef, sep: Option<char>) -> String {
    let Some(sep) = sep else {
        return String::new();
    };
    let text: String = meta.text().collect();
    text.split(sep)
        .nth(1)
        .map(|segment| {
            segment
                .trim_matches(|c: char| c == '+' || c.is_whitespace())
                .to_string()
        })
        .unwrap_or_default()
}

fn meta_text(node: &ElementRef) -> Result<String> {
    let meta = node
        .select(&sel(".meta")?)
        .next()
        .ok_or_else(|| AppError::extract("meta", "missing meta element"))?;
    Ok(meta.text().collect())
}

fn sel(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE_PAGE: &str = r#"
        <ul>
          <li class="result-node-wide">
            <a class="titlestring" href="https://sfbay.craigslist.org/sfc/cta/d/road-bike/7811.html">Road bike</a>
            <div class="meta">&#183; oakland +&#183; <span title="Sat, 29 Aug 2026 10:00:11 GMT-0700">2h ago</span> <span class="priceinfo">$1,250</span></div>
          </li>
          <li class="result-node-wide">
            <a class="titlestring" href="https://sfbay.craigslist.org/eby/cta/d/fixie/7812.html">Fixie</a>
            <div class="meta">&#183; berkeley &#183; <span title="Fri, 28 Aug 2026 09:12:00 GMT-0700">1d ago</span> <span class="priceinfo">$300</span></div>
          </li>
        </ul>
    "#;

    const NARROW_PAGE: &str = r#"
        <ul>
          <li class="result-node-narrow">
            <div class="title-blob"><a class="titlestring" href="https://sfbay.craigslist.org/sfc/cta/d/tandem/7813.html">Tandem</a></div>
            <div class="supertitle">alameda</div>
            <div class="meta"><span title="Thu, 27 Aug 2026 17:45:09 GMT-0700">2d ago</span><span class="priceinfo">$780</span></div>
          </li>
        </ul>
    "#;

    #[test]
    fn test_wide_layout() {
        let listings = extract_listings(WIDE_PAGE).unwrap();
        assert_eq!(listings.len(), 2);

        let first = &listings[0];
        assert_eq!(first.id, 7811);
        assert_eq!(first.title, "Road bike");
        assert_eq!(first.location, "oakland");
        assert_eq!(first.price, 1250);
        assert_eq!(first.posted_at, "Sat, 29 Aug 2026 10:00:11");

        assert_eq!(listings[1].id, 7812);
        assert_eq!(listings[1].price, 300);
    }

    #[test]
    fn test_narrow_layout() {
        let listings = extract_listings(NARROW_PAGE).unwrap();
        assert_eq!(listings.len(), 1);

        let listing = &listings[0];
        assert_eq!(listing.id, 7813);
        assert_eq!(listing.title, "Tandem");
        assert_eq!(listing.location, "alameda");
        assert_eq!(listing.price, 780);
        assert_eq!(listing.posted_at, "Thu, 27 Aug 2026 17:45:09");
    }

    #[test]
    fn test_narrow_without_supertitle_has_empty_location() {
        let page = r#"
            <li class="result-node-narrow">
              <div class="title-blob"><a class="titlestring" href="https://x.org/1.html">X</a></div>
              <div class="meta"><span title="Thu, 27 Aug 2026 17:45:09 GMT-0700">2d</span><span class="priceinfo">$5</span></div>
            </li>
        "#;
        let listings = extract_listings(page).unwrap();
        assert_eq!(listings[0].location, "");
    }

    #[test]
    fn test_no_results_is_empty_not_error() {
        let listings = extract_listings("<html><body><p>Nothing here</p></body></html>").unwrap();
        assert!(listings.is_empty());
    }

    #[test]
    fn test_malformed_price_is_error() {
        let page = r#"
            <li class="result-node-narrow">
              <div class="title-blob"><a class="titlestring" href="https://x.org/2.html">X</a></div>
              <div class="meta"><span title="Thu, 27 Aug 2026 17:45:09 GMT-0700">2d</span><span class="priceinfo">call me</span></div>
            </li>
        "#;
        assert!(matches!(
            extract_listings(page),
            Err(AppError::Extract { .. })
        ));
    }

    #[test]
    fn test_bad_listing_id_is_error() {
        let page = r#"
            <li class="result-node-narrow">
              <div class="title-blob"><a class="titlestring" href="https://x.org/not-a-number.html">X</a></div>
              <div class="meta"><span title="t GMT">2d</span><span class="priceinfo">$5</span></div>
            </li>
        "#;
        assert!(extract_listings(page).is_err());
    }

    #[test]
    fn test_listing_id_from_url() {
        assert_eq!(
            listing_id("https://sfbay.craigslist.org/sfc/cta/d/road-bike/7811.html").unwrap(),
            7811
        );
        assert!(listing_id("https://sfbay.craigslist.org/whatever").is_err());
    }
}
