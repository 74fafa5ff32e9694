//! DOM listing card → [`RawAttributeBag`].

use crate::catalog::resolve_link;
use crate::fields::{extract_dollar_price, extract_mileage, extract_year};
use crate::page::PageElement;
use crate::raw::RawAttributeBag;

/// Characters of card text kept as the vehicle title.
pub const TITLE_CHARS: usize = 100;

/// Maps one matched card element to a bag. Relative links are resolved
/// against `page_url`.
#[must_use]
pub fn listing_card_bag(element: &PageElement, page_url: &str) -> RawAttributeBag {
    let text = element.text.as_str();
    RawAttributeBag {
        year: extract_year(text).map(|year| year.to_string()),
        price: extract_dollar_price(text).map(|price| price.to_string()),
        mileage: extract_mileage(text).map(|miles| miles.to_string()),
        detail_url: element
            .first_link
            .as_deref()
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(|href| resolve_link(page_url, href)),
        title: Some(text.chars().take(TITLE_CHARS).collect()),
        ..RawAttributeBag::default()
    }
}
