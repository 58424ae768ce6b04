// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded wallet-store migrations using refinery.

use pawtap_core::TapperError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), TapperError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| TapperError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}
