use std::fmt;

/// Grid coordinate: `x` is the column, `y` the row, growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, ignoring walls.
    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The four orthogonal neighbours in tie-break order: up, down, left, right.
    pub fn neighbors(&self) -> [Position; 4] {
        [
            Position::new(self.x, self.y - 1), // Up
            Position::new(self.x, self.y + 1), // Down
            Position::new(self.x - 1, self.y), // Left
            Position::new(self.x + 1, self.y), // Right
        ]
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.distance(other) == 1
    }

    pub fn step(&self, mv: Move) -> Position {
        let (dx, dy) = mv.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

impl Move {
    /// Directional moves in the order used to break ties everywhere.
    pub const DIRECTIONS: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Every move, directions first so that equal scores never prefer standing still.
    pub const ALL: [Move; 5] = [Move::Up, Move::Down, Move::Left, Move::Right, Move::Stay];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Move::Up => (0, -1),
            Move::Down => (0, 1),
            Move::Left => (-1, 0),
            Move::Right => (1, 0),
            Move::Stay => (0, 0),
        }
    }

    /// The move that takes `from` to the adjacent (or identical) `to`.
    pub fn between(from: Position, to: Position) -> Option<Move> {
        Move::ALL.into_iter().find(|mv| from.step(*mv) == to)
    }

    /// Wire name used by the turn protocol.
    pub fn as_str_name(self) -> &'static str {
        match self {
            Move::Up => "N",
            Move::Down => "S",
            Move::Left => "W",
            Move::Right => "E",
            Move::Stay => "WAIT",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_follow_tie_break_order() {
        let pos = Position::new(2, 2);
        let expected: Vec<Position> = Move::DIRECTIONS.iter().map(|mv| pos.step(*mv)).collect();
        assert_eq!(pos.neighbors().to_vec(), expected);
    }

    #[test]
    fn test_between_adjacent_cells() {
        let from = Position::new(3, 3);
        assert_eq!(Move::between(from, Position::new(3, 2)), Some(Move::Up));
        assert_eq!(Move::between(from, Position::new(4, 3)), Some(Move::Right));
        assert_eq!(Move::between(from, from), Some(Move::Stay));
        assert_eq!(Move::between(from, Position::new(5, 3)), None);
    }

    #[test]
    fn test_wire_names() {
        let names: Vec<&str> = Move::ALL.iter().map(|mv| mv.as_str_name()).collect();
        assert_eq!(names, vec!["N", "S", "W", "E", "WAIT"]);
    }
}
