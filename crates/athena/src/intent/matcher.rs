use super::registry::{CategoryRegistry, CommandCategory};

/// First category (registration order) with a pattern (array order) that
/// matches anywhere in `text`. Order is the only tie-break.
pub fn try_exact_match<'r>(text: &str, registry: &'r CategoryRegistry) -> Option<&'r CommandCategory> {
    if text.is_empty() {
        return None;
    }
    registry
        .iter()
        .find(|category| category.first_match(text).is_some())
}
