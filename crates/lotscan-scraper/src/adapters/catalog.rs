//! Catalog product → [`RawAttributeBag`].

use crate::catalog::CatalogProduct;
use crate::fields::{detect_make, extract_mileage, extract_model, extract_vin, extract_year};
use crate::raw::{FieldShape, RawAttributeBag};

/// Maps one storefront product to a bag.
///
/// Year, make, model and mileage come from the title, mileage falls back to
/// the description when the title has no usable reading, and the VIN is only
/// ever taken from a labelled mention in the description.
#[must_use]
pub fn catalog_product_bag(product: &CatalogProduct, origin: &str) -> RawAttributeBag {
    let title = product.title.as_deref().unwrap_or_default();
    let body = product.body_html.as_deref().unwrap_or_default();
    let make = detect_make(title);

    RawAttributeBag {
        year: extract_year(title).map(|year| year.to_string()),
        make: make.map(str::to_owned),
        model: make.and_then(|make| extract_model(title, make)),
        price: product
            .variants
            .first()
            .and_then(|variant| variant.price.as_ref())
            .and_then(FieldShape::from_value)
            .and_then(|shape| shape.resolve("amount")),
        mileage: extract_mileage(title)
            .or_else(|| extract_mileage(body))
            .map(|miles| miles.to_string()),
        vin: extract_vin(body),
        image_url: product.images.first().and_then(|image| image.src.clone()),
        detail_url: product
            .handle
            .as_deref()
            .filter(|handle| !handle.is_empty())
            .map(|handle| format!("{}/products/{handle}", origin.trim_end_matches('/'))),
        listing_date: product
            .published_at
            .clone()
            .filter(|date| !date.is_empty())
            .or_else(|| product.created_at.clone()),
        stock_number: product.id.map(|id| id.to_string()),
        title: product.title.clone(),
    }
}
