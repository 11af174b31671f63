//! Proportional score bars for the leaderboard.

pub const BAR_CHAR: char = '█';

/// Width in cells for a score bar, scaled against the best score on the
/// board. Any non-zero score gets at least one cell so low-ranked teams
/// stay visible.
pub fn bar_width(score: u32, max_score: u32, available: u16) -> u16 {
    if score == 0 || max_score == 0 || available == 0 {
        return 0;
    }
    let scaled = (score as u64 * available as u64) / max_score as u64;
    (scaled as u16).clamp(1, available)
}

pub fn score_bar(score: u32, max_score: u32, available: u16) -> String {
    let width = bar_width(score, max_score, available) as usize;
    std::iter::repeat_n(BAR_CHAR, width).collect()
}

/// Clip a team name to `max` cells, padding with spaces so bar columns
/// line up.
pub fn padded_name(name: &str, max: usize) -> String {
    let mut s: String = name.chars().take(max).collect();
    while s.chars().count() < max {
        s.push(' ');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_score_fills_the_available_width() {
        assert_eq!(bar_width(120, 120, 40), 40);
    }

    #[test]
    fn nonzero_score_never_rounds_to_empty() {
        assert_eq!(bar_width(1, 10_000, 40), 1);
        assert_eq!(bar_width(0, 10_000, 40), 0);
    }

    #[test]
    fn widths_scale_proportionally() {
        assert_eq!(bar_width(60, 120, 40), 20);
        assert_eq!(bar_width(30, 120, 40), 10);
    }

    #[test]
    fn degenerate_inputs_yield_no_bar() {
        assert_eq!(bar_width(10, 0, 40), 0);
        assert_eq!(bar_width(10, 20, 0), 0);
    }

    #[test]
    fn names_are_clipped_and_padded() {
        assert_eq!(padded_name("ByteBusters", 6), "ByteBu");
        assert_eq!(padded_name("Ab", 4), "Ab  ");
    }

    #[test]
    fn bar_renders_expected_cells() {
        assert_eq!(score_bar(60, 120, 10), "█████");
    }
}
