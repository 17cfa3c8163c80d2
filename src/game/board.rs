//! Static board model for the 100-cell track.
//!
//! The board is a fixed mapping from special cells to their targets: a
//! target below the cell is a snake, above it a ladder. The mapping is
//! pure data with no failure mode; every other rule (shields, magic
//! tiles, bonus rolls) lives in the engine.

/// Final cell of the track. Tokens start on cell 0 and must land on this
/// cell exactly to win.
pub const BOARD_END: u32 = 100;

/// Snake and ladder cells. Invariants: no cell maps to itself and no
/// target is itself a source, so a landing resolves in a single step.
const SNAKES_AND_LADDERS: [(u32, u32); 15] = [
    (9, 27),
    (16, 7),
    (18, 37),
    (25, 54),
    (28, 51),
    (56, 64),
    (59, 17),
    (63, 19),
    (67, 30),
    (68, 88),
    (76, 97),
    (79, 100),
    (93, 69),
    (95, 75),
    (99, 77),
];

/// Resolve a landing: returns the snake/ladder target for `cell`, or the
/// cell itself when nothing applies.
pub fn resolve_landing(cell: u32) -> u32 {
    SNAKES_AND_LADDERS
        .iter()
        .find(|(src, _)| *src == cell)
        .map(|&(_, dst)| dst)
        .unwrap_or(cell)
}

/// Whether `cell` sets a token back on landing.
pub fn is_snake(cell: u32) -> bool {
    resolve_landing(cell) < cell
}

/// Whether `cell` advances a token on landing.
pub fn is_ladder(cell: u32) -> bool {
    resolve_landing(cell) > cell
}

/// All special cells as `(source, target)` pairs, for renderers and tests.
pub fn special_cells() -> impl Iterator<Item = (u32, u32)> {
    SNAKES_AND_LADDERS.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_snakes_and_ladders() {
        assert_eq!(resolve_landing(9), 27);
        assert_eq!(resolve_landing(16), 7);
        assert_eq!(resolve_landing(79), 100);
        assert_eq!(resolve_landing(99), 77);
        assert_eq!(resolve_landing(50), 50);
        assert!(is_snake(16));
        assert!(is_ladder(9));
        assert!(!is_snake(9));
        assert!(!is_ladder(50) && !is_snake(50));
    }

    #[test]
    fn no_cell_maps_to_itself() {
        for (src, dst) in special_cells() {
            assert_ne!(src, dst, "cell {} maps to itself", src);
        }
    }

    #[test]
    fn no_chained_specials() {
        // A target cell must never be a source, otherwise landings would
        // need multi-step resolution.
        for (_, dst) in special_cells() {
            assert_eq!(
                resolve_landing(dst),
                dst,
                "target {} is itself a special cell",
                dst
            );
        }
    }

    #[test]
    fn all_specials_within_track() {
        for (src, dst) in special_cells() {
            assert!(src > 0 && src < BOARD_END);
            assert!(dst > 0 && dst <= BOARD_END);
        }
    }
}
