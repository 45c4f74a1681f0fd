//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::dispatch::Mode;

/// Prompt shown when no image was given.
pub fn upload_prompt(default_mode: Mode) -> String {
    format!(
        "Please provide an image first.\n\
         \n\
         Usage: animalai [IMAGES]... [--mode classification|detection]\n\
         \n\
         Supported images: JPEG or PNG of a tiger, lion, leopard or cheetah.\n\
         Default mode: {default_mode}\n\
         \n\
         Example: animalai harimau.jpg --mode detection\n\
         \n\
         Run 'animalai about' to learn about the project or 'animalai -h' for all options."
    )
}

/// Print the upload prompt.
pub fn print_upload_prompt(default_mode: Mode) {
    println!("{}", upload_prompt(default_mode));
}
