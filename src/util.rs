// src/util.rs

use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of passwords handed out by `generate_password`.
pub const PASSWORD_LEN: usize = 12;

/// Random lowercase alphanumeric id of `len` characters.
pub fn random_id(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

pub fn generate_password() -> String {
    random_id(PASSWORD_LEN)
}
