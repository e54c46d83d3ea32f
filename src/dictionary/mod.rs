use std::{collections::HashSet, path::Path};

use rand::{seq::IndexedRandom, Rng};
use tokio::fs;

use crate::{error::PuzzleError, utils::letters::normalize_word};

/// Number of words drawn for a new board
pub const DEFAULT_WORD_COUNT: usize = 10;

/// Distance a word must keep from the grid edge to be drawn for that grid
pub const GRID_MARGIN: usize = 3;

/// Pool of candidate words, upper-cased and de-duplicated
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Load a word list from a file with one word per line
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, PuzzleError> {
        let content = fs::read_to_string(path).await?;
        let list = Self::from_text(&content);

        tracing::info!("Loaded {} words into word list", list.len());

        Ok(list)
    }

    /// Build a word list from newline separated text
    pub fn from_text(text: &str) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let words = text
            .lines()
            .map(normalize_word)
            .filter(|word| !word.is_empty() && seen.insert(word.clone()))
            .collect();
        Self { words }
    }

    /// Create an empty word list (no file available)
    pub fn empty() -> Self {
        Self { words: Vec::new() }
    }

    /// Words short enough to be drawn for a grid of the given size
    pub fn eligible(&self, grid_size: usize) -> Vec<&String> {
        self.words
            .iter()
            .filter(|word| word.chars().count() + GRID_MARGIN < grid_size)
            .collect()
    }

    /// Draw `count` distinct eligible words without replacement
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
        grid_size: usize,
    ) -> Result<Vec<String>, PuzzleError> {
        let eligible = self.eligible(grid_size);
        if eligible.len() < count {
            return Err(PuzzleError::InsufficientWords {
                needed: count,
                available: eligible.len(),
            });
        }

        Ok(eligible
            .choose_multiple(rng, count)
            .map(|word| (*word).clone())
            .collect())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const FRUIT: &str = "apple\nbanana\n cherry \ndate\n\nelder\nfig\ngrape\nkiwi\nlemon\nmango\nApple\n";

    #[test]
    fn test_empty_word_list() {
        let list = WordList::empty();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_from_text_normalizes_and_deduplicates() {
        let list = WordList::from_text(FRUIT);
        assert_eq!(list.len(), 10);
        assert_eq!(list.words[0], "APPLE");
        assert_eq!(list.words[2], "CHERRY");
    }

    #[test]
    fn test_from_text_handles_large_lists() {
        let text: String = (0..100_000).map(|i| format!("w{}\nw{}\n", i, i)).collect();
        let started = std::time::Instant::now();
        let list = WordList::from_text(&text);

        assert_eq!(list.len(), 100_000);
        assert_eq!(list.words[0], "W0");
        assert_eq!(list.words[99_999], "W99999");
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_eligible_excludes_long_words() {
        let list = WordList::from_text("abc\nabcdef\nabcdefg\n");
        // grid 10 allows words shorter than 7 letters
        let eligible = list.eligible(10);
        assert_eq!(eligible, vec!["ABC", "ABCDEF"]);
    }

    #[test]
    fn test_sample_draws_distinct_words() {
        let list = WordList::from_text(FRUIT);
        let mut rng = StdRng::seed_from_u64(4);
        let sample = list.sample(&mut rng, DEFAULT_WORD_COUNT, 20).unwrap();

        assert_eq!(sample.len(), DEFAULT_WORD_COUNT);
        let unique: HashSet<_> = sample.iter().collect();
        assert_eq!(unique.len(), DEFAULT_WORD_COUNT);
        assert!(sample.iter().all(|w| w == &w.trim().to_uppercase()));
    }

    #[test]
    fn test_sample_is_reproducible() {
        let list = WordList::from_text(FRUIT);
        let first = list.sample(&mut StdRng::seed_from_u64(9), 4, 20).unwrap();
        let second = list.sample(&mut StdRng::seed_from_u64(9), 4, 20).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_reports_insufficient_words() {
        let list = WordList::from_text(FRUIT);
        let mut rng = StdRng::seed_from_u64(4);
        // grid 8 only admits words of at most 4 letters: date, fig, kiwi
        match list.sample(&mut rng, DEFAULT_WORD_COUNT, 8) {
            Err(PuzzleError::InsufficientWords { needed, available }) => {
                assert_eq!(needed, 10);
                assert_eq!(available, 3);
            }
            other => panic!("expected InsufficientWords, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = tokio_test::block_on(WordList::load("/nonexistent/words.txt"));
        assert!(matches!(result, Err(PuzzleError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("words-{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, FRUIT).unwrap();

        let list = tokio_test::block_on(WordList::load(&path)).unwrap();
        assert_eq!(list.len(), 10);

        std::fs::remove_file(path).unwrap();
    }
}
