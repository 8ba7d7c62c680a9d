// Shared helpers for the integration tests.

use smget_engine::{BKey, Element, ElementSet, KeyReply, MergedResult};
use tracing_subscriber::EnvFilter;

/// Route engine logs to the test writer; `RUST_LOG=smget_engine=trace` shows them.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Integer-keyed element set from `(bkey, value)` pairs.
#[allow(dead_code)]
pub fn int_set(pairs: &[(u64, &str)]) -> ElementSet<String> {
    ElementSet::from_elements(
        pairs
            .iter()
            .map(|(k, v)| Element::new(BKey::from(*k), v.to_string())),
        false,
    )
    .unwrap()
}

/// Same as [`int_set`], marked trimmed.
#[allow(dead_code)]
pub fn trimmed_int_set(pairs: &[(u64, &str)]) -> ElementSet<String> {
    ElementSet::from_elements(
        pairs
            .iter()
            .map(|(k, v)| Element::new(BKey::from(*k), v.to_string())),
        true,
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn found(pairs: &[(u64, &str)]) -> KeyReply<String> {
    KeyReply::Found(int_set(pairs))
}

/// Flatten merged elements to `(cache key, bkey, value)` for assertions.
#[allow(dead_code)]
pub fn triples(result: &MergedResult<String>) -> Vec<(String, u64, String)> {
    result
        .elements()
        .iter()
        .map(|m| {
            (
                m.cache_key.clone(),
                m.bkey().as_integer().unwrap(),
                m.value().clone(),
            )
        })
        .collect()
}

#[allow(dead_code)]
pub fn triple(key: &str, bkey: u64, value: &str) -> (String, u64, String) {
    (key.to_string(), bkey, value.to_string())
}
