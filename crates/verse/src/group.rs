use std::collections::BTreeMap;
use std::fmt;

use tokens::VerseRef;
use tracing::warn;

/// Groups `items` by key in one pass over contiguous runs.
///
/// Input is expected to be sorted by key. When a key comes back after a
/// different key, the new run is appended to the existing group and a
/// warning is logged: nothing is overwritten or lost.
pub fn group_by<I, K, F>(items: impl IntoIterator<Item = I>, mut key_fn: F) -> BTreeMap<K, Vec<I>>
where
    K: Ord + Clone + fmt::Display,
    F: FnMut(&I) -> K,
{
    let mut groups: BTreeMap<K, Vec<I>> = BTreeMap::new();
    let mut current: Option<K> = None;
    for item in items {
        let key = key_fn(&item);
        if current.as_ref() != Some(&key) {
            if groups.contains_key(&key) {
                warn!(key = %key, "fragmented_group_merged");
            }
            current = Some(key.clone());
        }
        groups.entry(key).or_default().push(item);
    }
    groups
}

/// Groups items by verse. Items `key_fn` cannot place are skipped; their
/// count is returned alongside the groups.
///
/// With `sort_input` the items are stably sorted by verse first, so the
/// contiguity precondition of [`group_by`] always holds.
pub fn group_by_verse<I, F>(items: impl IntoIterator<Item = I>, key_fn: F, sort_input: bool) -> (BTreeMap<VerseRef, Vec<I>>, usize)
where
    F: Fn(&I) -> Option<VerseRef>,
{
    let mut skipped = 0usize;
    let mut keyed: Vec<(VerseRef, I)> = items
        .into_iter()
        .filter_map(|item| match key_fn(&item) {
            Some(key) => Some((key, item)),
            None => {
                skipped += 1;
                None
            }
        })
        .collect();
    if sort_input {
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
    }
    let groups = group_by(keyed, |(key, _)| key.clone())
        .into_iter()
        .map(|(key, pairs)| (key, pairs.into_iter().map(|(_, item)| item).collect()))
        .collect();
    (groups, skipped)
}
