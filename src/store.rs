use std::fs::File;
use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::{PlannerGrid, Point};

/**
 * Writes a grid archive readable by [`crate::load_grid`].
 */
pub fn store_grid(file_path: &str, grid: &PlannerGrid) -> io::Result<()> {
    let file = File::create(file_path)?;
    let mut archive = ZipWriter::new(file);

    archive.start_file("grid.dat", FileOptions::default())?;

    archive.write_i32::<BigEndian>(grid.rows() as i32)?;
    archive.write_i32::<BigEndian>(grid.cols() as i32)?;

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let point = Point::new(row as i32, col as i32);
            archive.write_u8(if grid.is_walkable(&point) { 0 } else { 1 })?;
        }
    }

    archive.finish()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{load_grid, store_grid, Point, PlannerGrid};

    #[test]
    fn test_store_then_load() {
        let mut grid = PlannerGrid::new(4, 6);
        grid.set_obstacle(0, 0);
        grid.set_obstacle(2, 5);
        grid.set_obstacle(3, 1);

        let path = std::env::temp_dir().join("planner-grid-roundtrip.zip");
        let path = path.to_str().unwrap();

        store_grid(path, &grid).unwrap();
        let loaded = load_grid(path).unwrap();

        assert_eq!(loaded.rows(), 4);
        assert_eq!(loaded.cols(), 6);
        for row in 0..4 {
            for col in 0..6 {
                let point = Point::new(row, col);
                assert_eq!(loaded.is_walkable(&point), grid.is_walkable(&point));
            }
        }
    }
}
