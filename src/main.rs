use grid_path_planner::{Point, PlannerGrid};

fn main() {
    let mut grid = PlannerGrid::new(10, 10);
    for row in 2..8 {
        grid.set_obstacle(row, 4);
    }
    for col in 1..5 {
        grid.set_obstacle(5, col);
    }

    let path_result = grid.find_path(&Point::new(0, 0), &Point::new(9, 9));

    match path_result {
        Ok(Some(path)) => {
            println!("path length: {} steps", path.len() - 1);
            print!("{}", grid.render_path(&path));
        }
        Ok(None) => println!("no path"),
        Err(e) => println!("{e}"),
    }
}
