//! AnimalAI CLI entry point.

#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

fn main() {
    if let Err(e) = animalai::run() {
        eprintln!("error: {}", animalai::output::describe(&e));
        std::process::exit(1);
    }
}
