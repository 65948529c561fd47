#![allow(dead_code)]

use logmask::MaskedFields;

#[derive(MaskedFields)]
struct ApiKey(#[masked] String);

fn main() {}
