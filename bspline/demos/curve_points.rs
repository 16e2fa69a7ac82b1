//! Prints a clamped cubic B-spline through a fixed control polygon as CSV,
//! control points first, ready to be fed to any plotting tool.
use bspline::{ClampedCurve2, ControlPolygon};
use nalgebra_glm as glm;

fn main() {
    env_logger::init();

    let matches = clap::App::new("curve_points")
        .about("Samples a clamped cubic B-spline curve")
        .arg(
            clap::Arg::with_name("samples")
                .short('n')
                .long("samples")
                .takes_value(true)
                .default_value("1000"),
        )
        .get_matches();
    let samples: usize = matches
        .value_of("samples")
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("--samples must be a positive integer");
            std::process::exit(1);
        });

    let polygon = ControlPolygon::new(vec![
        glm::vec2(1.0, 0.0),
        glm::vec2(1.0, 1.0),
        glm::vec2(1.5, 1.0),
        glm::vec2(2.0, -1.0),
        glm::vec2(3.0, 0.0),
        glm::vec2(4.0, 1.0),
        glm::vec2(5.0, 0.0),
    ])
    .expect("fixed polygon is long enough");

    println!("kind,x,y");
    for p in polygon.points() {
        println!("control,{},{}", p.x, p.y);
    }

    let curve = ClampedCurve2::new(polygon);
    match curve.sample(samples) {
        Ok(points) => {
            for p in points {
                println!("curve,{},{}", p.x, p.y);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
