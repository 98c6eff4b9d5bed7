#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Moves one cell in `dir`, or `None` when that leaves the `size` x `size` grid.
pub fn step(pos: Pos, dir: Dir, size: usize) -> Option<Pos> {
    let (dx, dy) = dir.delta();
    let nx = pos.x as isize + dx;
    let ny = pos.y as isize + dy;
    if nx < 0 || ny < 0 {
        return None;
    }
    let nx = nx as usize;
    let ny = ny as usize;
    if nx >= size || ny >= size {
        return None;
    }
    Some(Pos { x: nx, y: ny })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for dir in Dir::ALL {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
        }
    }

    #[test]
    fn step_stays_inside_grid() {
        let size = 15;
        assert_eq!(step(Pos::new(5, 7), Dir::Right, size), Some(Pos::new(6, 7)));
        assert_eq!(step(Pos::new(5, 7), Dir::Up, size), Some(Pos::new(5, 6)));
        assert_eq!(step(Pos::new(0, 7), Dir::Left, size), None);
        assert_eq!(step(Pos::new(3, 0), Dir::Up, size), None);
        assert_eq!(step(Pos::new(14, 3), Dir::Right, size), None);
        assert_eq!(step(Pos::new(3, 14), Dir::Down, size), None);
    }
}
