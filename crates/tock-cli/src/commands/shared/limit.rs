/// Resolve a row limit: the command's own `--limit`, then the global one,
/// then the configured default.
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, configured: u32) -> u32 {
    local.or(global).unwrap_or(configured)
}
