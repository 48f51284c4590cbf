//! `folio-server hash-password` - prints a digest for `ADMIN_PASSWORD_HASH`.

use std::io::{self, BufRead, Write};

use folio_core::ports::PasswordService;
use folio_infra::Argon2PasswordService;

/// Subcommand name recognised as the first argument.
pub const HASH_PASSWORD: &str = "hash-password";

/// Read a password from stdin and print its argon2 digest.
pub fn hash_password() -> io::Result<()> {
    eprint!("Password: ");
    io::stderr().flush()?;

    let digest = digest_from(io::stdin().lock())?;
    println!("{}", digest);
    Ok(())
}

/// Hash the first line of `input`, without its line ending.
fn digest_from(mut input: impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);

    Argon2PasswordService::new()
        .hash(password)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))
}
