// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `gen-secret` command.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{rngs::OsRng, RngCore};

use crate::cli::{Cli, GenSecretArgs};
use crate::error::BinResult;

/// Prints a fresh signing secret.
pub fn gen_secret(cli: &Cli, args: GenSecretArgs) -> BinResult<()> {
    let secret = generate_secret(args.bytes as usize);

    if cli.quiet {
        println!("{}", secret);
    } else {
        println!("Generated {}-byte signing secret:", args.bytes);
        println!();
        println!("  {}", secret);
        println!();
        println!("Set it as api.jwt.secret or export REVIEWVERSO_JWT_SECRET.");
    }

    Ok(())
}

/// Returns `len` random bytes from the OS generator, base64 encoded.
pub fn generate_secret(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}
