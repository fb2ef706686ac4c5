//! Cellular-automata growth for organic silhouettes

use crate::rng::SeededRng;

/// Birth/survival rule applied each generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellularRule {
    /// Probability a cell starts alive
    pub initial_fill: f32,
    /// A dead cell with at least this many live neighbors is born
    pub birth_limit: u8,
    /// A live cell with fewer than this many live neighbors dies
    pub death_limit: u8,
    pub generations: u32,
}

impl Default for CellularRule {
    fn default() -> Self {
        Self {
            initial_fill: 0.48,
            birth_limit: 5,
            death_limit: 4,
            generations: 4,
        }
    }
}

/// A binary grid, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    pub width: u32,
    pub height: u32,
    cells: Vec<bool>,
}

impl CellGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; (width * height) as usize],
        }
    }

    /// Seed a random grid and run the rule for its configured generations.
    ///
    /// The outermost ring is held dead so blobs never touch the frame.
    pub fn grow(width: u32, height: u32, seed: u32, rule: &CellularRule) -> Self {
        let mut rng = SeededRng::new(seed);
        let mut grid = Self::new(width, height);
        let cx = (width as f32 - 1.0) / 2.0;
        let cy = (height as f32 - 1.0) / 2.0;
        let radius = (cx.min(cy)).max(1.0);

        for y in 0..height {
            for x in 0..width {
                if grid.is_border(x, y) {
                    continue;
                }
                // Bias toward the center so growth reads as one body
                let dx = (x as f32 - cx) / radius;
                let dy = (y as f32 - cy) / radius;
                let falloff = (1.0 - (dx * dx + dy * dy).sqrt() * 0.6).clamp(0.0, 1.0);
                let alive = rng.chance(rule.initial_fill * (0.5 + falloff));
                grid.set(x, y, alive);
            }
        }

        for _ in 0..rule.generations {
            grid = grid.step(rule);
        }
        grid
    }

    /// Apply one generation of the rule
    pub fn step(&self, rule: &CellularRule) -> Self {
        let mut next = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_border(x, y) {
                    continue;
                }
                let n = self.live_neighbors(x, y);
                let alive = if self.get(x, y) {
                    n >= rule.death_limit
                } else {
                    n >= rule.birth_limit
                };
                next.set(x, y, alive);
            }
        }
        next
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.cells[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, alive: bool) {
        if x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize] = alive;
        }
    }

    /// Count of live cells among the eight neighbors
    pub fn live_neighbors(&self, x: u32, y: u32) -> u8 {
        let mut count = 0;
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx >= 0 && ny >= 0 && self.get(nx as u32, ny as u32) {
                    count += 1;
                }
            }
        }
        count
    }

    /// A live cell touching at least one dead orthogonal neighbor
    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        if !self.get(x, y) {
            return false;
        }
        let left = x == 0 || !self.get(x - 1, y);
        let up = y == 0 || !self.get(x, y - 1);
        left || up || !self.get(x + 1, y) || !self.get(x, y + 1)
    }

    /// Row holding the most live cells, used to place features like eyes
    pub fn densest_row(&self) -> Option<u32> {
        (0..self.height)
            .map(|y| (y, (0..self.width).filter(|x| self.get(*x, y)).count()))
            .filter(|(_, n)| *n > 0)
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(y, _)| y)
    }

    fn is_border(&self, x: u32, y: u32) -> bool {
        x == 0 || y == 0 || x + 1 >= self.width || y + 1 >= self.height
    }
}
