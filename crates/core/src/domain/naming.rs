//! Scope prefix and scope name composition.
//!
//! A prefix disambiguates sibling replays: table-driven scenarios carry
//! their ordinal, variants carry their kind. Non-empty prefixes end with
//! `/` so they concatenate directly with the scope label that follows.

/// Separator between prefix segments and the following scope label.
pub const PREFIX_SEPARATOR: char = '/';

/// Compose the naming prefix for one replay.
pub fn compose_prefix(index: Option<usize>, kind: &str) -> String {
    let mut prefix = match index {
        Some(i) if kind.is_empty() => i.to_string(),
        Some(i) => format!("{i}{PREFIX_SEPARATOR}{kind}"),
        None => kind.to_string(),
    };
    if !prefix.is_empty() {
        prefix.push(PREFIX_SEPARATOR);
    }
    prefix
}

/// Name of the scope that runs the setup callback.
pub fn given_scope(prefix: &str, given: &str) -> String {
    format!("{prefix}given {given}")
}

/// Name of the scope that runs Act.
///
/// The prefix is only repeated here when no given scope carries it
/// already.
pub fn when_scope(prefix: &str, when: &str, inside_given: bool) -> String {
    if inside_given {
        format!("when {when}")
    } else {
        format!("{prefix}when {when}")
    }
}

/// Name of the scope that runs Assert.
pub fn then_scope(then: &str) -> String {
    format!("then {then}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_prefix() {
        assert_eq!(compose_prefix(None, ""), "");
        assert_eq!(compose_prefix(Some(0), ""), "0/");
        assert_eq!(compose_prefix(Some(12), ""), "12/");
        assert_eq!(compose_prefix(None, "empty-input"), "empty-input/");
        assert_eq!(compose_prefix(Some(3), "empty-input"), "3/empty-input/");
    }

    #[test]
    fn test_scope_names() {
        assert_eq!(given_scope("", "ctx"), "given ctx");
        assert_eq!(given_scope("1/", "ctx"), "1/given ctx");
        assert_eq!(when_scope("1/", "w", false), "1/when w");
        assert_eq!(when_scope("1/", "w", true), "when w");
        assert_eq!(then_scope("t"), "then t");
    }
}
