use std::collections::HashSet;

use crate::api::CommentId;

/// Drops every repeated id, keeping the first occurrence
pub fn dedup_ids(ids: impl IntoIterator<Item = CommentId>) -> Vec<CommentId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Reconciles a freshly fetched page with the ids a feed already lists.
///
/// Appending keeps everything already listed and adds the page after it.
/// Otherwise the page is authoritative, except for ids it does not mention:
/// those were created locally and not echoed back yet, so they are kept in
/// front of it.
pub fn merge_page(existing: &[CommentId], incoming: &[CommentId], append: bool) -> Vec<CommentId> {
    if append {
        return dedup_ids(existing.iter().chain(incoming.iter()).copied());
    }
    let fetched = incoming.iter().copied().collect::<HashSet<_>>();
    let local_only = existing.iter().filter(|id| !fetched.contains(id));
    dedup_ids(local_only.chain(incoming.iter()).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[i64]) -> Vec<CommentId> {
        v.iter().copied().map(CommentId).collect()
    }

    #[test]
    fn refresh_keeps_unechoed_local_items_in_front() {
        // x = 100 is local-only, a = 1, b = 2
        assert_eq!(
            merge_page(&ids(&[100, 1]), &ids(&[1, 2]), false),
            ids(&[100, 1, 2])
        );
    }

    #[test]
    fn refresh_drops_nothing_it_was_not_told_about() {
        assert_eq!(
            merge_page(&ids(&[5, 4, 3]), &ids(&[9, 8]), false),
            ids(&[5, 4, 3, 9, 8])
        );
    }

    #[test]
    fn append_follows_existing_order() {
        assert_eq!(
            merge_page(&ids(&[3, 2]), &ids(&[2, 1]), true),
            ids(&[3, 2, 1])
        );
    }

    #[test]
    fn duplicate_ids_within_a_page_collapse() {
        assert_eq!(merge_page(&[], &ids(&[1, 1, 2, 1]), false), ids(&[1, 2]));
        assert_eq!(merge_page(&[], &ids(&[1, 1, 2, 1]), true), ids(&[1, 2]));
    }

    #[test]
    fn merged_feeds_never_repeat_ids() {
        bolero::check!()
            .with_type::<Vec<(Vec<u8>, bool)>>()
            .cloned()
            .for_each(|pages| {
                let mut feed: Vec<CommentId> = Vec::new();
                for (page, append) in pages {
                    let page = page
                        .into_iter()
                        .map(|i| CommentId(i64::from(i)))
                        .collect::<Vec<_>>();
                    feed = merge_page(&feed, &page, append);
                    let unique = feed.iter().collect::<HashSet<_>>();
                    assert_eq!(unique.len(), feed.len(), "duplicate in {feed:?}");
                }
            })
    }

    #[test]
    fn refresh_preserves_every_local_item_before_the_page() {
        bolero::check!()
            .with_type::<(Vec<u8>, Vec<u8>)>()
            .cloned()
            .for_each(|(existing, incoming)| {
                let existing = dedup_ids(existing.into_iter().map(|i| CommentId(i64::from(i))));
                let incoming = incoming
                    .into_iter()
                    .map(|i| CommentId(i64::from(i)))
                    .collect::<Vec<_>>();
                let merged = merge_page(&existing, &incoming, false);
                let local_only = existing
                    .iter()
                    .filter(|id| !incoming.contains(id))
                    .copied()
                    .collect::<Vec<_>>();
                assert_eq!(&merged[..local_only.len()], &local_only[..]);
                assert_eq!(&merged[local_only.len()..], &dedup_ids(incoming)[..]);
            })
    }
}
