/// A dense 2D grid that wraps on both axes (a torus).
///
/// Coordinates outside `0..width` / `0..height` are folded back onto the grid,
/// so the leftmost column neighbours the rightmost one and the top row
/// neighbours the bottom row.
#[derive(Clone, Debug)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Tilemap<T> {
    /// Build a tilemap by evaluating `f` for every cell in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    /// Fold a signed x coordinate onto the grid.
    pub fn wrap_x(&self, x: i64) -> usize {
        x.rem_euclid(self.width as i64) as usize
    }

    /// Fold a signed y coordinate onto the grid.
    pub fn wrap_y(&self, y: i64) -> usize {
        y.rem_euclid(self.height as i64) as usize
    }

    /// Get the index into the data array, wrapping both axes.
    fn index(&self, x: usize, y: usize) -> usize {
        let x = x % self.width;
        let y = y % self.height;
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Signed-coordinate access; any offset maps onto a valid cell.
    pub fn get_wrapped(&self, x: i64, y: i64) -> &T {
        self.get(self.wrap_x(x), self.wrap_y(y))
    }

    pub fn get_wrapped_mut(&mut self, x: i64, y: i64) -> &mut T {
        let (x, y) = (self.wrap_x(x), self.wrap_y(y));
        self.get_mut(x, y)
    }

    /// 4-connected neighbours in Left, Above, Right, Below order.
    /// Every edge wraps, so there are always exactly four.
    pub fn neighbors(&self, x: usize, y: usize) -> [(usize, usize); 4] {
        let left_x = if x == 0 { self.width - 1 } else { x - 1 };
        let right_x = if x + 1 == self.width { 0 } else { x + 1 };
        let above_y = if y == 0 { self.height - 1 } else { y - 1 };
        let below_y = if y + 1 == self.height { 0 } else { y + 1 };

        [(left_x, y), (x, above_y), (right_x, y), (x, below_y)]
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}
