//! Source adapters: one per raw input shape, each producing
//! [`RawAttributeBag`](crate::raw::RawAttributeBag)s for the canonicalizer.

mod catalog;
mod linked_data;
mod listing_card;

pub use catalog::catalog_product_bag;
pub use linked_data::{
    is_vehicle_entry, linked_data_bag, linked_data_blocks, linked_data_entries, VEHICLE_TYPES,
};
pub use listing_card::{listing_card_bag, TITLE_CHARS};
