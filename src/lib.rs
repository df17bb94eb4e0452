/// Single account and its balance rules. The balance only moves through
/// transactions produced by handling validated commands.
pub mod account;

/// Balance-changing commands, validated before [`account`] sees them.
pub mod command;

/// Ordered collection of accounts with unique ids.
pub mod registry;

/// Interactive console session on top of [`registry`], plus seeding,
/// statement output and logging setup used by the binary. Kept in the
/// library so integration tests can drive a whole session.
pub mod shell;
