use crate::adapters::listing_card_bag;
use crate::canonicalize::{canonicalize, RetentionRule};
use crate::outcome::{ItemOutcome, SkipReason, StepOutcome, TierOutput};
use crate::page::PageHandle;

/// Common listing-card selectors, tried in order.
pub const LISTING_SELECTORS: &[&str] = &[
    ".vehicle-card",
    ".car-listing",
    ".inventory-item",
    "[data-vehicle]",
    ".product-item",
    ".vehicle-item",
];

/// A selector must match more than this many elements to count as a
/// listing grid.
pub const MIN_CARD_MATCHES: usize = 2;

/// Cards parsed per selector.
pub const MAX_CARDS: usize = 20;

/// Tier 3: vehicles read from repeated listing cards.
///
/// The first qualifying selector that yields a retained vehicle wins; a
/// qualifying selector whose cards all fail falls through to the next one.
pub async fn run_selector_tier(page: &dyn PageHandle, page_url: &str) -> StepOutcome<TierOutput> {
    let mut skipped = Vec::new();

    for selector in LISTING_SELECTORS {
        let elements = match page.find_elements(selector).await {
            Ok(elements) => elements,
            Err(e) => {
                tracing::debug!(selector, error = %e, "selector lookup failed");
                continue;
            }
        };
        if elements.len() <= MIN_CARD_MATCHES {
            continue;
        }
        tracing::info!(selector, matches = elements.len(), "found listing grid");

        let items = elements.iter().take(MAX_CARDS).map(|element| {
            if element.text.trim().is_empty() {
                ItemOutcome::Skipped(SkipReason::Unreadable("card has no text".to_string()))
            } else {
                canonicalize(listing_card_bag(element, page_url), RetentionRule::YearOrPrice)
            }
        });
        let mut output = TierOutput::from_items(items);

        if !output.vehicles.is_empty() {
            output.skipped.splice(0..0, skipped);
            tracing::info!(
                selector,
                vehicles = output.vehicles.len(),
                skipped = output.skipped.len(),
                "selector tier finished"
            );
            return StepOutcome::Found(output);
        }
        tracing::debug!(selector, "listing grid yielded no vehicles, trying next selector");
        skipped.append(&mut output.skipped);
    }

    StepOutcome::NotFound
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::*;
    use crate::page::{PageElement, PageError, StaticPage};

    fn card(text: &str) -> String {
        format!(r#"<div class="vehicle-card"><a href="/v/{}">{text}</a></div>"#, text.len())
    }

    #[tokio::test]
    async fn three_cards_are_parsed_with_year_or_price_rule() {
        let html = format!(
            "<body>{}{}{}</body>",
            card("2019 Honda Civic $12,500 60,000 miles"),
            card("2020 Toyota RAV4 $24,000"),
            card("Contact us for financing"),
        );
        let page = StaticPage::from_html("https://dealer.example.com/used", html);
        let output = run_selector_tier(&page, "https://dealer.example.com/used")
            .await
            .found()
            .expect("two vehicles");
        assert_eq!(output.vehicles.len(), 2);
        let civic = &output.vehicles[0];
        assert_eq!(civic.year, Some(2019));
        assert_eq!(civic.price, Some(Decimal::from(12_500)));
        assert_eq!(civic.mileage, Some(60_000));
        assert!(civic.detail_url.as_deref().unwrap().starts_with("https://dealer.example.com/v/"));
        assert_eq!(output.skipped, vec![SkipReason::NoIdentifyingSignal]);
    }

    #[tokio::test]
    async fn two_matches_do_not_qualify() {
        let html = format!(
            "<body>{}{}</body>",
            card("2019 Honda Civic $12,500"),
            card("2020 Toyota RAV4 $24,000"),
        );
        let page = StaticPage::from_html("https://dealer.example.com/", html);
        assert_eq!(
            run_selector_tier(&page, "https://dealer.example.com/").await,
            StepOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn only_the_first_twenty_cards_are_parsed() {
        let cards: String = (0..30).map(|i| card(&format!("2015 Car {i} $9,{i:03}"))).collect();
        let page = StaticPage::from_html("https://dealer.example.com/", format!("<body>{cards}</body>"));
        let output = run_selector_tier(&page, "https://dealer.example.com/")
            .await
            .found()
            .expect("vehicles");
        assert_eq!(output.vehicles.len(), MAX_CARDS);
    }

    #[tokio::test]
    async fn empty_qualifying_selector_falls_through_to_next() {
        let html = r#"<body>
            <div class="vehicle-card">Call us</div>
            <div class="vehicle-card">Visit us</div>
            <div class="vehicle-card">Email us</div>
            <div class="inventory-item">2016 Kia Soul $8,900</div>
            <div class="inventory-item">2017 Kia Rio $9,400</div>
            <div class="inventory-item">2018 Kia Forte $11,200</div>
        </body>"#;
        let page = StaticPage::from_html("https://dealer.example.com/", html);
        let output = run_selector_tier(&page, "https://dealer.example.com/")
            .await
            .found()
            .expect("inventory-item grid wins");
        assert_eq!(output.vehicles.len(), 3);
        assert_eq!(output.skipped.len(), 3, "skips from the first grid are kept");
    }

    /// Page whose first selector errors; the rest come from a table.
    struct FlakyPage {
        grids: HashMap<&'static str, Vec<PageElement>>,
    }

    #[async_trait]
    impl PageHandle for FlakyPage {
        async fn navigate(&mut self, _url: &str, _timeout: Duration) -> Result<(), PageError> {
            Ok(())
        }
        async fn page_source(&self) -> Result<String, PageError> {
            Ok(String::new())
        }
        async fn body_text(&self) -> Result<String, PageError> {
            Ok(String::new())
        }
        async fn find_elements(&self, selector: &str) -> Result<Vec<PageElement>, PageError> {
            if selector == ".vehicle-card" {
                return Err(PageError::Navigation("frame detached".to_string()));
            }
            Ok(self.grids.get(selector).cloned().unwrap_or_default())
        }
        async fn screenshot_base64(&self) -> Result<String, PageError> {
            Err(PageError::Unsupported("screenshot"))
        }
        async fn current_url(&self) -> Result<String, PageError> {
            Ok("https://dealer.example.com/".to_string())
        }
        async fn title(&self) -> Result<String, PageError> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn selector_errors_are_isolated() {
        let cards = (0..3)
            .map(|i| PageElement {
                text: format!("201{i} Nissan Altima $1{i},000"),
                first_link: None,
            })
            .collect();
        let page = FlakyPage {
            grids: HashMap::from([(".car-listing", cards)]),
        };
        let output = run_selector_tier(&page, "https://dealer.example.com/")
            .await
            .found()
            .expect("car-listing grid");
        assert_eq!(output.vehicles.len(), 3);
    }

    #[tokio::test]
    async fn parsing_is_idempotent() {
        let html = format!(
            "<body>{}{}{}</body>",
            card("2019 Honda Civic $12,500"),
            card("2020 Toyota RAV4 $24,000"),
            card("2021 Ford Edge $29,000"),
        );
        let page = StaticPage::from_html("https://dealer.example.com/", html);
        let first = run_selector_tier(&page, "https://dealer.example.com/").await;
        let second = run_selector_tier(&page, "https://dealer.example.com/").await;
        assert_eq!(first, second);
    }
}
