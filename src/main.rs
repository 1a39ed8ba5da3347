#![allow(non_snake_case)]
use RustedCalculus::Examples::calculus_examples::calculus_examples;
use RustedCalculus::Utils::logger::init_logger;

fn main() {
    if let Err(e) = init_logger(Some("info"), None) {
        eprintln!("{}", e);
    }
    let example = 0;
    if let Err(e) = calculus_examples(example) {
        eprintln!("example {} failed: {}", example, e);
    }
}
