#![allow(dead_code)]

use logmask::MaskedFields;

#[derive(MaskedFields)]
struct Login {
    #[masked(hide)]
    password: String,
}

fn main() {}
