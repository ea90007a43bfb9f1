//! Go board representation and move application.
//!
//! This module provides the rules engine: a board snapshot is an immutable
//! value, and [`Board::apply_move`] returns a new snapshot with captures and
//! the suicide rule resolved. Chain and liberty queries use an explicit
//! worklist flood fill, so arbitrarily large chains cannot overflow the stack.

use std::fmt;

/// Stone state of a single vertex.
///
/// The integer encoding (`0` empty, `+1` black, `-1` white) is what crosses
/// the wire boundary; see [`Sign::from_i8`] and [`Sign::value`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sign {
    #[default]
    Empty,
    Black,
    White,
}

impl Sign {
    /// The opposing color. `Empty` has no opponent and maps to itself.
    pub fn opposite(self) -> Sign {
        match self {
            Sign::Black => Sign::White,
            Sign::White => Sign::Black,
            Sign::Empty => Sign::Empty,
        }
    }

    /// Integer encoding: black `+1`, white `-1`, empty `0`.
    pub fn value(self) -> i8 {
        match self {
            Sign::Empty => 0,
            Sign::Black => 1,
            Sign::White => -1,
        }
    }

    /// Strict decoding of the integer encoding. Returns `None` for any value
    /// outside `{-1, 0, 1}`; used to reject malformed wire payloads.
    pub fn from_i8(raw: i8) -> Option<Sign> {
        match raw {
            0 => Some(Sign::Empty),
            1 => Some(Sign::Black),
            -1 => Some(Sign::White),
            _ => None,
        }
    }

    /// Lenient decoding: any positive value is black, any negative is white.
    pub fn normalize(raw: i8) -> Sign {
        match raw {
            0 => Sign::Empty,
            r if r > 0 => Sign::Black,
            _ => Sign::White,
        }
    }

    /// Whether this is an actual stone rather than an empty vertex.
    pub fn is_stone(self) -> bool {
        self != Sign::Empty
    }
}

/// A board coordinate `(x, y)` with `(0, 0)` at the top-left corner.
pub type Vertex = (usize, usize);

/// Capture counter slot for the given color: black captures are counted in
/// slot 0, white captures in slot 1.
fn capture_slot(sign: Sign) -> usize {
    match sign {
        Sign::Black => 0,
        _ => 1,
    }
}

/// An immutable Go board position.
///
/// All transforms return a fresh snapshot; a `Board` value never changes
/// after construction. This makes speculative move exploration safe: any
/// number of in-flight variations can share a parent position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Sign>,
    captures: [u32; 2],
}

impl Board {
    /// Create an empty board of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Sign::Empty; width * height],
            captures: [0, 0],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Stones captured so far: `[by black, by white]`. Monotonically
    /// non-decreasing across applied moves.
    pub fn captures(&self) -> [u32; 2] {
        self.captures
    }

    /// Stones captured by the given color.
    pub fn captures_by(&self, sign: Sign) -> u32 {
        self.captures[capture_slot(sign)]
    }

    fn idx(&self, (x, y): Vertex) -> usize {
        y * self.width + x
    }

    /// Whether the vertex lies on the board.
    pub fn has_vertex(&self, (x, y): Vertex) -> bool {
        x < self.width && y < self.height
    }

    /// Stone state at a vertex, or `None` if the vertex is out of bounds.
    pub fn get(&self, vertex: Vertex) -> Option<Sign> {
        if !self.has_vertex(vertex) {
            return None;
        }
        Some(self.cells[self.idx(vertex)])
    }

    fn set(&mut self, vertex: Vertex, sign: Sign) {
        let i = self.idx(vertex);
        self.cells[i] = sign;
    }

    /// The orthogonal neighbors of a vertex, filtered to those in bounds,
    /// in left, right, up, down order.
    pub fn neighbors(&self, vertex: Vertex) -> Vec<Vertex> {
        if !self.has_vertex(vertex) {
            return Vec::new();
        }
        let (x, y) = vertex;
        let mut v = Vec::with_capacity(4);
        if x > 0 {
            v.push((x - 1, y));
        }
        if x + 1 < self.width {
            v.push((x + 1, y));
        }
        if y > 0 {
            v.push((x, y - 1));
        }
        if y + 1 < self.height {
            v.push((x, y + 1));
        }
        v
    }

    /// Flood fill from `vertex` over neighbors satisfying `pred`.
    ///
    /// The starting vertex is always part of the result; every other member
    /// is reached through a path of predicate-satisfying vertices. Uses an
    /// explicit worklist with a visited set, so it terminates on any finite
    /// board and visits each vertex at most once.
    pub fn connected_component<F>(&self, vertex: Vertex, pred: F) -> Vec<Vertex>
    where
        F: Fn(Vertex) -> bool,
    {
        if !self.has_vertex(vertex) {
            return Vec::new();
        }
        let mut visited = vec![false; self.width * self.height];
        let mut result = Vec::new();
        let mut stack = vec![vertex];
        visited[self.idx(vertex)] = true;

        while let Some(v) = stack.pop() {
            result.push(v);
            for n in self.neighbors(v) {
                let i = self.idx(n);
                if !visited[i] && pred(n) {
                    visited[i] = true;
                    stack.push(n);
                }
            }
        }
        result
    }

    /// The maximal same-color chain containing `vertex`; empty if the vertex
    /// is empty or out of bounds.
    pub fn chain(&self, vertex: Vertex) -> Vec<Vertex> {
        match self.get(vertex) {
            Some(sign) if sign.is_stone() => {
                self.connected_component(vertex, |v| self.get(v) == Some(sign))
            }
            _ => Vec::new(),
        }
    }

    /// Whether the chain containing `vertex` touches at least one empty
    /// vertex. Short-circuits on the first liberty found.
    pub fn has_liberties(&self, vertex: Vertex) -> bool {
        let sign = match self.get(vertex) {
            Some(s) if s.is_stone() => s,
            _ => return false,
        };
        let mut visited = vec![false; self.width * self.height];
        let mut stack = vec![vertex];
        visited[self.idx(vertex)] = true;

        while let Some(v) = stack.pop() {
            for n in self.neighbors(v) {
                match self.get(n) {
                    Some(Sign::Empty) => return true,
                    Some(s) if s == sign => {
                        let i = self.idx(n);
                        if !visited[i] {
                            visited[i] = true;
                            stack.push(n);
                        }
                    }
                    _ => {}
                }
            }
        }
        false
    }

    /// Place a stone and resolve captures and the suicide rule, returning the
    /// resulting position.
    ///
    /// Placing `Empty` or playing out of bounds is a no-op clone, not an
    /// error. After the stone is placed, every adjacent enemy chain left
    /// without liberties is removed and credited to the mover; if nothing was
    /// captured and the mover's own chain has no liberties, that chain is
    /// removed instead and credited to the opponent.
    pub fn apply_move(&self, sign: Sign, vertex: Vertex) -> Board {
        let mut next = self.clone();
        if !sign.is_stone() || !self.has_vertex(vertex) {
            return next;
        }
        next.set(vertex, sign);

        // Enemy chains that lost their last liberty to the placed stone,
        // in neighbor-scan order.
        let dead_neighbors: Vec<Vertex> = next
            .neighbors(vertex)
            .into_iter()
            .filter(|&n| next.get(n) == Some(sign.opposite()) && !next.has_liberties(n))
            .collect();

        for &n in &dead_neighbors {
            // A chain spanning several dead neighbors is only removed once.
            if next.get(n) == Some(Sign::Empty) {
                continue;
            }
            let chain = next.chain(n);
            next.captures[capture_slot(sign)] += chain.len() as u32;
            for c in chain {
                next.set(c, Sign::Empty);
            }
        }

        if dead_neighbors.is_empty() && !next.has_liberties(vertex) {
            let chain = next.chain(vertex);
            next.captures[capture_slot(sign.opposite())] += chain.len() as u32;
            for c in chain {
                next.set(c, Sign::Empty);
            }
        }

        next
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = match self.cells[self.idx((x, y))] {
                    Sign::Black => 'X',
                    Sign::White => 'O',
                    Sign::Empty => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
