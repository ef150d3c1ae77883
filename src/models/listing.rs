//! Listing data structure.

use serde::{Deserialize, Serialize};

/// A single listing extracted from a search results page.
///
/// `id` is stable across repeated observations of the same listing and is
/// the sole key used for deduplication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    /// Unique identifier extracted from the listing URL
    pub id: u64,

    /// Listing title
    pub title: String,

    /// Full URL to the listing
    pub url: String,

    /// Location text (empty string if the page omits it)
    pub location: String,

    /// Asking price with currency symbol and separators stripped
    pub price: u64,

    /// Raw posting timestamp text, preserved verbatim from the page
    pub posted_at: String,
}

impl Listing {
    /// Format the listing for display using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{title}`, `{url}`, `{location}`, `{price}`, `{posted_at}`
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{id}", &self.id.to_string())
            .replace("{title}", &self.title)
            .replace("{url}", &self.url)
            .replace("{location}", &self.location)
            .replace("{price}", &self.price.to_string())
            .replace("{posted_at}", &self.posted_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing() -> Listing {
        Listing {
            id: 7890,
            title: "Road bike".to_string(),
            url: "https://sfbay.craigslist.org/sfc/cta/d/road-bike/7890.html".to_string(),
            location: "oakland".to_string(),
            price: 450,
            posted_at: "Sat, 29 Aug 2026 18:02:11".to_string(),
        }
    }

    #[test]
    fn test_format() {
        let listing = sample_listing();
        let result = listing.format("{title} | ${price} | {location}");
        assert_eq!(result, "Road bike | $450 | oakland");
    }
}
