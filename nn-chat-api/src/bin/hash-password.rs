//! Prints a credentials file line for a user.
//!
//! Usage: `hash-password <name>`, then type the password on standard input.

use argon2::Argon2;
use nn_chat_api::server::auth::hash_password;
use nn_chat_common::model::user::{InvalidUserNameError, UserName};
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
enum HashPasswordError {
    #[error("Usage: hash-password <name>")]
    Usage,
    #[error(transparent)]
    UserName(#[from] InvalidUserNameError),
    #[error("Error reading the password: {0}")]
    Stdin(#[from] io::Error),
    #[error("The password must not be empty")]
    EmptyPassword,
    #[error("Error hashing the password: {0}")]
    Hash(argon2::password_hash::Error),
}

fn main() -> Result<(), HashPasswordError> {
    let name = std::env::args().nth(1).ok_or(HashPasswordError::Usage)?;
    let name = UserName::new(name)?;

    let mut password = String::new();
    io::stdin().lock().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(HashPasswordError::EmptyPassword);
    }

    let hash = hash_password(&Argon2::default(), password).map_err(HashPasswordError::Hash)?;
    println!("{name}:{hash}");

    Ok(())
}
