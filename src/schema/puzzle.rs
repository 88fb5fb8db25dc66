use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An authored retelling puzzle: the phrases of a story in their
/// correct order, with optional English counterparts matched by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetellingPuzzle {
    pub phrases: Vec<String>,
    #[serde(default)]
    pub english: Vec<String>,
}

impl RetellingPuzzle {
    pub fn new(phrases: &[&str], english: &[&str]) -> Self {
        Self {
            phrases: phrases.iter().map(|s| s.to_string()).collect(),
            english: english.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// English phrases, or `None` when the puzzle is Spanish-only.
    pub fn secondary(&self) -> Option<&[String]> {
        if self.english.is_empty() {
            None
        } else {
            Some(&self.english)
        }
    }

    /// Returns true if the English list is absent or pairs up with the
    /// Spanish list one-to-one.
    pub fn is_well_formed(&self) -> bool {
        self.english.is_empty() || self.english.len() == self.phrases.len()
    }

    /// Shuffle the phrases, keeping each English phrase paired with its
    /// Spanish counterpart.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<String>, Option<Vec<String>>) {
        let mut order: Vec<usize> = (0..self.phrases.len()).collect();
        order.shuffle(rng);

        let phrases = order.iter().map(|&i| self.phrases[i].clone()).collect();
        let english = self
            .secondary()
            .filter(|_| self.is_well_formed())
            .map(|english| order.iter().map(|&i| english[i].clone()).collect());
        (phrases, english)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn secondary_absent_when_empty() {
        let puzzle = RetellingPuzzle::new(&["uno", "dos"], &[]);
        assert!(puzzle.secondary().is_none());
        assert!(puzzle.is_well_formed());
    }

    #[test]
    fn mismatched_lengths_are_malformed() {
        let puzzle = RetellingPuzzle::new(&["uno", "dos"], &["one"]);
        assert!(!puzzle.is_well_formed());
    }

    #[test]
    fn shuffle_keeps_pairs_together() {
        let puzzle = RetellingPuzzle::new(
            &["uno", "dos", "tres", "cuatro"],
            &["one", "two", "three", "four"],
        );
        let mut rng = StdRng::seed_from_u64(7);
        let (phrases, english) = puzzle.shuffled(&mut rng);
        let english = english.unwrap();

        assert_eq!(phrases.len(), 4);
        for (es, en) in phrases.iter().zip(&english) {
            let i = puzzle.phrases.iter().position(|p| p == es).unwrap();
            assert_eq!(&puzzle.english[i], en);
        }

        let mut sorted = phrases.clone();
        sorted.sort();
        let mut expected = puzzle.phrases.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }
}
