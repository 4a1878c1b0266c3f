//! Property-based test generators using proptest.
//!
//! Provides strategies for generating contractor field values that fit
//! the contractor schema.

use proptest::prelude::*;

const TRADES: [&str; 8] = [
    "Roofing",
    "Painting",
    "Drywall",
    "Plumbing",
    "Heating",
    "Glass",
    "Carpets",
    "Electrical",
];

/// Strategy for contractor names (at most 32 bytes).
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{1,12}( & [A-Z][a-z]{1,10})?").expect("Invalid regex")
}

/// Strategy for locations (at most 64 bytes).
pub fn location_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{2,20}").expect("Invalid regex")
}

/// Strategy for comma-separated specialty lists.
pub fn specialties_strategy() -> impl Strategy<Value = String> {
    prop::sample::subsequence(TRADES.to_vec(), 0..=4).prop_map(|trades| trades.join(", "))
}

/// Strategy for company sizes: blank or up to six digits.
pub fn size_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        4 => (0u32..1_000_000).prop_map(|n| n.to_string()),
    ]
}

/// Strategy for hourly rates such as `$42.50` (at most 8 bytes).
pub fn rate_strategy() -> impl Strategy<Value = String> {
    (prop::sample::select(vec!['$', '£', 'E']), 0u32..100_000)
        .prop_map(|(symbol, cents)| format!("{symbol}{}.{:02}", cents / 100, cents % 100))
        .prop_filter("rate must fit 8 bytes", |s| s.len() <= 8)
}

/// Strategy for owners: blank or an 8-digit customer number.
pub fn owner_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        (10_000_000u32..=99_999_999).prop_map(|n| n.to_string()),
    ]
}

/// Strategy for a full contractor row in schema order.
pub fn contractor_values_strategy() -> impl Strategy<Value = Vec<String>> {
    (
        name_strategy(),
        location_strategy(),
        specialties_strategy(),
        size_strategy(),
        rate_strategy(),
        owner_strategy(),
    )
        .prop_map(|(name, location, specialties, size, rate, owner)| {
            vec![name, location, specialties, size, rate, owner]
        })
}

/// A store mutation for model-based tests.
#[derive(Debug, Clone)]
pub enum StoreOp {
    /// Create a record with these values.
    Create(Vec<String>),
    /// Update the n-th known id (modulo the number of known ids).
    Update(usize, Vec<String>),
    /// Delete the n-th known id (modulo the number of known ids).
    Delete(usize),
}

/// Strategy for sequences of store mutations.
pub fn store_ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<StoreOp>> {
    let op = prop_oneof![
        3 => contractor_values_strategy().prop_map(StoreOp::Create),
        2 => (any::<usize>(), contractor_values_strategy())
            .prop_map(|(i, values)| StoreOp::Update(i, values)),
        2 => any::<usize>().prop_map(StoreOp::Delete),
    ];
    prop::collection::vec(op, 0..max_len)
}
