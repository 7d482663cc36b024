use std::fs::File;
use std::io::{self, Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};
use zip::ZipArchive;

use crate::PlannerGrid;

/**
 * Reads a grid archive written by [`crate::store_grid`]: a zip holding
 * `grid.dat` with big-endian row/col counts followed by one byte per cell
 * (0 = walkable, anything else = obstacle), row-major.
 */
pub fn load_grid(file_path: &str) -> io::Result<PlannerGrid> {
    let file = File::open(file_path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut grid_file = archive.by_name("grid.dat")?;
    let mut buffer = Vec::new();
    grid_file.read_to_end(&mut buffer)?;

    let mut cursor = Cursor::new(buffer);

    let rows = cursor.read_i32::<BigEndian>()? as usize;
    let cols = cursor.read_i32::<BigEndian>()? as usize;

    let mut grid = PlannerGrid::new(rows, cols);
    let mut cells = vec![0u8; cols];
    for row in 0..rows {
        cursor.read_exact(&mut cells)?;
        for (col, &cell) in cells.iter().enumerate() {
            if cell != 0 {
                grid.set_obstacle(row as i32, col as i32);
            }
        }
    }

    Ok(grid)
}
