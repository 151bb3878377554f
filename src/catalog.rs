//! Pure search filter + paginator for the story catalog.
//!
//! No hidden state: the same corpus, query and page always produce the same
//! page, so callers can re-run it on every keystroke or page change.

use crate::models::Story;

/// Page size used by the catalog screen.
pub const PAGE_SIZE: usize = 10;

/// Size of the fallback sample shown when a search matches nothing.
pub const FALLBACK_SAMPLE_SIZE: usize = 5;

/// Anything with a searchable title.
pub trait Titled {
    fn title(&self) -> &str;
}

impl Titled for Story {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Filter `corpus` by case-insensitive title match (empty query matches
/// everything), then slice out page `page_index` of `page_size` items.
///
/// When the filtered set is empty the result is a
/// [`FALLBACK_SAMPLE_SIZE`]-item sample of the *unfiltered* corpus instead
/// of an empty page, drawn by a deterministic head sample. Use
/// [`page_with_sampler`] to plug a different sampling strategy.
pub fn page<T: Titled + Clone>(
    corpus: &[T],
    query: &str,
    page_index: usize,
    page_size: usize,
) -> Vec<T> {
    page_with_sampler(corpus, query, page_index, page_size, head_sample)
}

/// [`page`] with an explicit fallback sampler.
///
/// The sampler receives the unfiltered corpus and the sample size; it runs
/// only when the filtered set is empty.
pub fn page_with_sampler<T, F>(
    corpus: &[T],
    query: &str,
    page_index: usize,
    page_size: usize,
    sampler: F,
) -> Vec<T>
where
    T: Titled + Clone,
    F: Fn(&[T], usize) -> Vec<T>,
{
    let needle = query.to_lowercase();
    let filtered: Vec<&T> = corpus
        .iter()
        .filter(|item| needle.is_empty() || item.title().to_lowercase().contains(&needle))
        .collect();

    if filtered.is_empty() {
        return sampler(corpus, FALLBACK_SAMPLE_SIZE);
    }

    filtered
        .into_iter()
        .skip(page_index * page_size)
        .take(page_size)
        .cloned()
        .collect()
}

/// Default fallback sampler: the first `n` items in corpus order.
pub fn head_sample<T: Clone>(corpus: &[T], n: usize) -> Vec<T> {
    corpus.iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Story> {
        Story::stub_corpus()
    }

    #[test]
    fn test_empty_query_returns_first_page_in_order() {
        let corpus = corpus();
        let result = page(&corpus, "", 0, 10);
        assert_eq!(result.len(), 10);
        assert_eq!(result, corpus[..10].to_vec());
    }

    #[test]
    fn test_second_page_continues_where_first_ended() {
        let corpus = corpus();
        let result = page(&corpus, "", 1, 10);
        assert_eq!(result, corpus[10..20].to_vec());
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let corpus = corpus();
        let lower = page(&corpus, "story a", 0, 10);
        let upper = page(&corpus, "STORY A", 0, 10);
        assert_eq!(lower, upper);
        assert!(lower.iter().all(|s| s.title.starts_with("Story A")));
        // A0 and A26 both carry the letter A.
        assert_eq!(lower.len(), 2);
    }

    #[test]
    fn test_last_partial_page() {
        let corpus = corpus();
        let result = page(&corpus, "", 4, 12);
        assert_eq!(result.len(), 2);
        assert_eq!(result, corpus[48..].to_vec());
    }

    #[test]
    fn test_page_past_end_is_empty_not_fallback() {
        let corpus = corpus();
        // The filter matched, so an out-of-range page is genuinely empty.
        assert!(page(&corpus, "", 99, 10).is_empty());
    }

    #[test]
    fn test_no_match_returns_fallback_sample() {
        let corpus = corpus();
        let result = page(&corpus, "zzz-no-match", 0, 10);
        assert_eq!(result.len(), FALLBACK_SAMPLE_SIZE);
        assert_eq!(result, corpus[..FALLBACK_SAMPLE_SIZE].to_vec());
    }

    #[test]
    fn test_pluggable_sampler_is_used_on_no_match() {
        let corpus = corpus();
        let result = page_with_sampler(&corpus, "zzz-no-match", 0, 10, |c, n| {
            c.iter().rev().take(n).cloned().collect()
        });
        assert_eq!(result.len(), 5);
        assert_eq!(result[0], corpus[49]);
    }

    #[test]
    fn test_pure_function_is_repeatable() {
        let corpus = corpus();
        assert_eq!(page(&corpus, "story b", 0, 10), page(&corpus, "story b", 0, 10));
    }

    #[test]
    fn test_empty_corpus_yields_empty_fallback() {
        let corpus: Vec<Story> = Vec::new();
        assert!(page(&corpus, "anything", 0, 10).is_empty());
    }
}
