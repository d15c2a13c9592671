//! Run-wide aggregates built by the collector from per-page results.

use crate::page::Page;
use crate::parsers::text::NgramCounts;
use crate::results::{CrawlError, Keyword};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// N-grams must occur more often than this across the run to be reported
pub const KEYWORD_THRESHOLD: usize = 4;

/// Word, bigram and trigram counts summed over every page of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusCounts {
    pub words: HashMap<String, usize>,
    pub bigrams: HashMap<String, usize>,
    pub trigrams: HashMap<String, usize>,
}

impl CorpusCounts {
    /// Add one page's counts; the result does not depend on merge order
    pub fn merge(&mut self, page: &NgramCounts) {
        merge_into(&mut self.words, &page.words);
        merge_into(&mut self.bigrams, &page.bigrams);
        merge_into(&mut self.trigrams, &page.trigrams);
    }

    /// N-grams of every order counted more than `threshold` times,
    /// most frequent first and alphabetical among equals
    pub fn keywords(&self, threshold: usize) -> Vec<Keyword> {
        let mut keywords = self
            .words
            .iter()
            .chain(&self.bigrams)
            .chain(&self.trigrams)
            .filter(|(_, count)| **count > threshold)
            .map(|(keyword, count)| Keyword {
                keyword: keyword.clone(),
                count: *count,
            })
            .collect::<Vec<_>>();

        keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
        keywords
    }
}

fn merge_into(target: &mut HashMap<String, usize>, source: &HashMap<String, usize>) {
    for (key, count) in source {
        *target.entry(key.clone()).or_insert(0) += count;
    }
}

/// Content hash -> URLs whose visible text produced it
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl ContentIndex {
    pub fn insert(&mut self, hash: &str, url: &str) {
        self.entries
            .entry(hash.to_string())
            .or_default()
            .insert(url.to_string());
    }

    /// URL groups sharing a hash, only those with more than one member
    pub fn duplicate_groups(&self) -> Vec<Vec<String>> {
        self.entries
            .values()
            .filter(|urls| urls.len() > 1)
            .map(|urls| urls.iter().cloned().collect())
            .collect()
    }
}

/// Sink for everything workers report during a run
#[derive(Debug, Default)]
pub struct Corpus {
    pub pages: Vec<Page>,
    pub counts: CorpusCounts,
    pub index: ContentIndex,
    pub errors: Vec<CrawlError>,
}

impl Corpus {
    pub fn add_page(&mut self, page: Page) {
        self.counts.merge(&page.counts);
        if let Some(hash) = &page.content_hash {
            self.index.insert(hash, &page.url);
        }
        self.pages.push(page);
    }

    pub fn add_error(&mut self, error: CrawlError) {
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::text::TokenFilter;

    fn counts(text: &str) -> NgramCounts {
        NgramCounts::from_text(text, &TokenFilter::default())
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = counts("pottery wheel pottery wheel");
        let b = counts("pottery kiln glaze pottery");

        let mut ab = CorpusCounts::default();
        ab.merge(&a);
        ab.merge(&b);
        let mut ba = CorpusCounts::default();
        ba.merge(&b);
        ba.merge(&a);

        assert_eq!(ab, ba);
        assert_eq!(ab.words["pottery"], 4);
        assert_eq!(ab.bigrams["pottery wheel"], 2);
    }

    #[test]
    fn test_keyword_threshold_and_ordering() {
        let mut corpus = CorpusCounts::default();
        corpus.words.insert("glaze".into(), 5);
        corpus.words.insert("clay".into(), 7);
        corpus.words.insert("kiln".into(), 4);
        corpus.bigrams.insert("clay body".into(), 5);
        corpus.trigrams.insert("wood fired kiln".into(), 9);

        let keywords = corpus.keywords(KEYWORD_THRESHOLD);
        let listed: Vec<_> = keywords.iter().map(|k| (k.keyword.as_str(), k.count)).collect();
        assert_eq!(
            listed,
            vec![("wood fired kiln", 9), ("clay", 7), ("clay body", 5), ("glaze", 5)]
        );
    }

    #[test]
    fn test_duplicate_groups() {
        let mut index = ContentIndex::default();
        index.insert("aaa", "https://example.com/b");
        index.insert("aaa", "https://example.com/a");
        index.insert("bbb", "https://example.com/c");

        assert_eq!(
            index.duplicate_groups(),
            vec![vec!["https://example.com/a".to_string(), "https://example.com/b".to_string()]]
        );
    }

    #[test]
    fn test_unextractable_pages_are_not_indexed() {
        let mut corpus = Corpus::default();
        corpus.add_page(Page {
            url: "https://example.com/a.pdf".into(),
            ..Page::default()
        });
        corpus.add_page(Page {
            url: "https://example.com/b.pdf".into(),
            ..Page::default()
        });
        assert!(corpus.index.duplicate_groups().is_empty());
        assert_eq!(corpus.pages.len(), 2);
    }
}
