/// Single board axis: a row or column index, and board heights/widths.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Board position as `(row, col)`; board sizes are `(height, width)`.
pub type Coord2 = (Coord, Coord);

/// Converts a position into an `ndarray` index.
pub(crate) const fn ix((row, col): Coord2) -> [usize; 2] {
    [row as usize, col as usize]
}

const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterates the up-to-8 neighbors of `center`, clipped at the board edges.
pub fn iter_neighbors(center: Coord2, size: Coord2) -> impl Iterator<Item = Coord2> {
    let (height, width) = size;
    OFFSETS.into_iter().filter_map(move |(dr, dc)| {
        let row = center.0.checked_add_signed(dr)?;
        let col = center.1.checked_add_signed(dc)?;
        (row < height && col < width).then_some((row, col))
    })
}
