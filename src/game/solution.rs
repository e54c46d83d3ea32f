use crate::models::Puzzle;

pub type SolutionGrid = Vec<Vec<Option<char>>>;

/// Grid showing only the cells that belong to a placed word
pub fn solution(puzzle: &Puzzle) -> SolutionGrid {
    let mut view = vec![vec![None; puzzle.size]; puzzle.size];
    for letter in puzzle.placements.iter().flat_map(|p| &p.letters) {
        view[letter.row][letter.col] = Some(letter.letter);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PlacementEngine;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_solution_only_shows_placed_letters() {
        let mut rng = StdRng::seed_from_u64(8);
        let words = vec!["TREE".to_string(), "LEAF".to_string()];
        let puzzle = PlacementEngine::default().place(7, &words, &mut rng).unwrap();

        let view = solution(&puzzle);
        let filled: usize = view.iter().flatten().filter(|c| c.is_some()).count();
        let covered: std::collections::HashSet<_> = puzzle
            .placements
            .iter()
            .flat_map(|p| p.positions())
            .collect();
        assert_eq!(filled, covered.len());

        for pos in covered {
            assert_eq!(view[pos.row][pos.col], Some(puzzle.grid[pos.row][pos.col]));
        }
    }

    #[test]
    fn test_solution_does_not_touch_puzzle() {
        let mut rng = StdRng::seed_from_u64(2);
        let puzzle = PlacementEngine::default()
            .place(5, &["SUN".to_string()], &mut rng)
            .unwrap();
        let before = puzzle.clone();
        let _ = solution(&puzzle);
        assert_eq!(before, puzzle);
    }
}
