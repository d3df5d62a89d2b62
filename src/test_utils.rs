//! Grid boards for tests.
//!
//! Characters: `_` or `?` unknown, `x` unknown but active (counted towards
//! the global rule), `!` known active, `#` blocked, digits are clues.
//! Positions are `(x, y)` with `rows[y][x]`.

use crate::detail::NeighborFind;
use crate::model::FieldRule;

pub(crate) type Point = (usize, usize);

pub(crate) struct Board {
    cells: Vec<Vec<char>>,
    width: usize,
    height: usize,
    hidden: Option<usize>,
}

impl Board {
    /// Parses `rows`. `hidden` counts active unknowns besides the `x`
    /// cells; the global rule is left out when the sum is `-1`.
    pub fn parse(rows: &[&str], hidden: i64) -> Self {
        let cells: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();
        let width = cells[0].len();
        for row in &cells {
            assert_eq!(row.len(), width, "ragged board");
            for &ch in row {
                assert!(
                    ch.is_ascii_digit() || "_?x!#".contains(ch),
                    "'{ch}' is not a valid character"
                );
            }
        }
        let marked = cells.iter().flatten().filter(|&&c| c == 'x').count() as i64;
        let total = hidden + marked;
        Self {
            height: cells.len(),
            width,
            cells,
            hidden: (total != -1).then_some(total as usize),
        }
    }

    pub fn hidden(&self) -> Option<usize> {
        self.hidden
    }

    fn at(&self, (x, y): Point) -> char {
        self.cells[y][x]
    }

    fn is_unknown(&self, point: Point) -> bool {
        matches!(self.at(point), '_' | '?' | 'x')
    }

    /// Every point, column by column.
    fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| (x, y)))
    }

    fn neighbors(&self, (x, y): Point) -> Vec<Point> {
        let mut result = Vec::with_capacity(8);
        for xx in x.saturating_sub(1)..=(x + 1).min(self.width - 1) {
            for yy in y.saturating_sub(1)..=(y + 1).min(self.height - 1) {
                if (xx, yy) != (x, y) {
                    result.push((xx, yy));
                }
            }
        }
        result
    }

    /// The global rule first, then one rule per clue; clues already
    /// satisfied by known active neighbours add their unknown neighbours to
    /// a trailing rule with target zero.
    pub fn rules(&self) -> Vec<FieldRule<Point>> {
        let mut rules = Vec::new();
        if let Some(hidden) = self.hidden {
            let unknown = self.points().filter(|&p| self.is_unknown(p)).collect();
            rules.push(FieldRule::new(unknown, hidden));
        }
        let mut known_zero: Vec<Point> = Vec::new();
        for point in self.points() {
            let Some(value) = self.at(point).to_digit(10) else {
                continue;
            };
            let mut fields = Vec::new();
            let mut found = 0;
            for neighbor in self.neighbors(point) {
                if self.at(neighbor) == '!' {
                    found += 1;
                } else if self.is_unknown(neighbor) {
                    fields.push(neighbor);
                }
            }
            let remaining = value as usize - found;
            if remaining == 0 {
                for field in fields {
                    if !known_zero.contains(&field) {
                        known_zero.push(field);
                    }
                }
            } else {
                let label = format!("({}, {})", point.0, point.1);
                rules.push(FieldRule::labeled(label, fields, remaining));
            }
        }
        if !known_zero.is_empty() {
            rules.push(FieldRule::new(known_zero, 0));
        }
        rules
    }
}

impl NeighborFind<Point> for Board {
    fn neighbors_of(&self, field: &Point) -> Vec<Point> {
        self.neighbors(*field)
    }

    fn is_found_active(&self, field: &Point) -> bool {
        self.at(*field) == '!'
    }
}

/// Field name for position `(x, y)` on a 16x16 board.
pub(crate) fn hex_field(x: usize, y: usize) -> String {
    format!("{x:x}{y:x}")
}

/// A 16x16 board with 51 active fields and 17 isolated "3" clues.
///
/// Large enough that the raw assignment space exceeds `1e36`.
pub(crate) fn connected_threes() -> Vec<FieldRule<String>> {
    const CLUES: [Point; 17] = [
        (1, 1),
        (9, 1),
        (13, 1),
        (3, 3),
        (7, 3),
        (11, 3),
        (5, 5),
        (7, 7),
        (11, 7),
        (1, 9),
        (9, 9),
        (3, 11),
        (7, 11),
        (11, 11),
        (1, 13),
        (5, 13),
        (13, 13),
    ];
    let mut rules = Vec::new();
    for &(x, y) in &CLUES {
        let fields = (x - 1..=x + 1)
            .flat_map(|xx| (y - 1..=y + 1).map(move |yy| (xx, yy)))
            .filter(|&p| p != (x, y))
            .map(|(xx, yy)| hex_field(xx, yy))
            .collect();
        rules.push(FieldRule::new(fields, 3));
    }
    let open = (0..16)
        .flat_map(|x| (0..16).map(move |y| (x, y)))
        .filter(|p| !CLUES.contains(p))
        .map(|(x, y)| hex_field(x, y))
        .collect();
    rules.push(FieldRule::new(open, 51));
    rules
}

/// Two chained clues at the start of a 2000-field line holding 1000 active
/// fields. Both solutions weigh more than `f64::MAX`.
pub(crate) fn beyond_f64_range() -> Vec<FieldRule<usize>> {
    vec![
        FieldRule::new(vec![0, 1, 2], 1),
        FieldRule::new(vec![2, 3, 4], 1),
        FieldRule::new((0..2000).collect(), 1000),
    ]
}

/// Fields on a line; each field neighbours the previous and the next one.
pub(crate) struct Line;

impl NeighborFind<usize> for Line {
    fn neighbors_of(&self, field: &usize) -> Vec<usize> {
        let mut result = vec![field + 1];
        if *field > 0 {
            result.push(field - 1);
        }
        result
    }

    fn is_found_active(&self, _field: &usize) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_at_corners() {
        let board = Board::parse(&["#01!#", "0011#", "00___", "00_2_", "001!_"], -1);
        let corner = board.neighbors((0, 0));
        assert_eq!(corner.len(), 3);
        assert!(corner.contains(&(0, 1)) && corner.contains(&(1, 0)) && corner.contains(&(1, 1)));
        let far = board.neighbors((4, 4));
        assert_eq!(far.len(), 3);
        assert!(far.contains(&(3, 4)) && far.contains(&(4, 3)) && far.contains(&(3, 3)));
    }

    #[test]
    fn test_rules_from_board() {
        let board = Board::parse(&["#01!#", "0011#", "00___", "00_2_", "001!_"], -1);
        assert_eq!(board.hidden(), None);
        let rules = board.rules();
        // the "2" at (3, 3), then the satisfied clues' neighbours
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].target(), 0);
        assert!(board.is_found_active(&(3, 0)));
        assert!(!board.is_found_active(&(4, 0)));
    }

    #[test]
    fn test_connected_threes_layout() {
        let rules = connected_threes();
        assert_eq!(rules.len(), 18);
        assert_eq!(rules[17].field_count(), 239);
        assert_eq!(hex_field(15, 0), "f0");
    }

    #[test]
    #[should_panic(expected = "not a valid character")]
    fn test_invalid_character() {
        Board::parse(&["X"], 0);
    }
}
