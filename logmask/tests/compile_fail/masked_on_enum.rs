#![allow(dead_code)]

use logmask::MaskedFields;

#[derive(MaskedFields)]
enum Credentials {
    Password(String),
    Token(String),
}

fn main() {}
