//! Cache key derivation.
//!
//! Keys are `{namespace}:{part}[:{part}...]`. Each request kind owns one
//! namespace, so an axis pair can never collide with a player name. Parts
//! are used verbatim and in the order given: the axis pair `(x, y)` is a
//! different request from `(y, x)` because the labels are direction
//! specific.

/// Separator between namespace and key parts.
pub const SEPARATOR: char = ':';

/// Namespace for axis-insight labels.
pub const AXIS_INSIGHT_NAMESPACE: &str = "params";

/// Namespace for player scouting reports.
pub const PLAYER_INSIGHT_NAMESPACE: &str = "player";

/// Build a key from a namespace and ordered parts.
pub fn cache_key(namespace: &str, parts: &[&str]) -> String {
    let capacity = namespace.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push_str(namespace);
    for part in parts {
        key.push(SEPARATOR);
        key.push_str(part);
    }
    key
}

/// Prefix matching every key in a namespace (e.g. `"player:"`).
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{namespace}{SEPARATOR}")
}

/// Key for the axis-insight labels of canonical metric ids `x` and `y`.
pub fn axis_insight_key(x: &str, y: &str) -> String {
    cache_key(AXIS_INSIGHT_NAMESPACE, &[x, y])
}

/// Key for the scouting report of a canonical player name.
pub fn player_insight_key(player_name: &str) -> String {
    cache_key(PLAYER_INSIGHT_NAMESPACE, &[player_name])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_key_format() {
        assert_eq!(
            axis_insight_key("goals_minus_xg", "assists_minus_xa"),
            "params:goals_minus_xg:assists_minus_xa"
        );
    }

    #[test]
    fn axis_key_deterministic() {
        let k1 = axis_insight_key("xg_minus_xa", "shots/goals");
        let k2 = axis_insight_key("xg_minus_xa", "shots/goals");
        assert_eq!(k1, k2);
    }

    #[test]
    fn axis_key_order_matters() {
        let k1 = axis_insight_key("goals_minus_xg", "assists_minus_xa");
        let k2 = axis_insight_key("assists_minus_xa", "goals_minus_xg");
        assert_ne!(k1, k2);
    }

    #[test]
    fn player_key_format() {
        assert_eq!(player_insight_key("Lionel Messi"), "player:Lionel Messi");
    }

    #[test]
    fn namespaces_do_not_collide() {
        assert!(!axis_insight_key("a", "b").starts_with(&namespace_prefix(PLAYER_INSIGHT_NAMESPACE)));
        assert!(!player_insight_key("a").starts_with(&namespace_prefix(AXIS_INSIGHT_NAMESPACE)));
    }

    #[test]
    fn namespace_prefix_includes_separator() {
        assert_eq!(namespace_prefix(PLAYER_INSIGHT_NAMESPACE), "player:");
    }
}
