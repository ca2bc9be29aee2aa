#![allow(clippy::let_and_return)]
#![allow(clippy::len_without_is_empty)]
#![warn(clippy::cast_lossless)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::todo)]
#![warn(clippy::unimplemented)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::doc_markdown)]

#[macro_use]
extern crate log;

mod app;

fn main() {
    let return_code = app::run_app();
    std::process::exit(return_code)
}
