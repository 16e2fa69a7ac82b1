use kinematics::{launch_system, Bindings};

fn main() {
    env_logger::init();

    let matches = clap::App::new("kinematics")
        .about("Solves the constant-acceleration launch equations for v0 and t")
        .arg(
            clap::Arg::with_name("vf")
                .long("vf")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Speed on arrival"),
        )
        .arg(
            clap::Arg::with_name("a")
                .long("a")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Constant acceleration"),
        )
        .arg(
            clap::Arg::with_name("p0")
                .long("p0")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Starting height, relative to the arrival height"),
        )
        .get_matches();

    let system = launch_system();

    let mut knowns = Bindings::new();
    let mut complete = true;
    for name in &system.knowns {
        match matches.value_of(name.as_str()).map(str::parse::<f64>) {
            Some(Ok(v)) => knowns.set(name, v),
            Some(Err(e)) => {
                eprintln!("Error: --{name}: {e}");
                std::process::exit(1);
            }
            None => complete = false,
        }
    }

    println!("equations:");
    for eq in &system.equations {
        println!("  {eq}");
    }

    for (k, solution) in system.solutions.iter().enumerate() {
        println!();
        println!("solution {k}:");
        let values = if complete {
            match solution.evaluate(&knowns) {
                Ok(v) => Some(v),
                Err(e) => {
                    log::warn!("solution {k} has no numeric value: {e}");
                    None
                }
            }
        } else {
            None
        };
        for (i, (name, expr)) in solution.values.iter().enumerate() {
            match &values {
                Some(values) => println!("  {name} = {expr} = {:.6}", values[i].1),
                None => println!("  {name} = {expr}"),
            }
        }
    }
}
