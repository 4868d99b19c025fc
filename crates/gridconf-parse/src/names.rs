use heck::ToUpperCamelCase;

/// Normalize an author-written type or table name: strip a leading `$`,
/// convert to UpperCamelCase and drop whitespace.
pub fn type_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = trimmed.trim_start_matches('$');
    camel(stripped)
}

/// Normalize a field name, value-table ID, or constant name.
pub fn field_name(raw: &str) -> String {
    camel(raw.trim())
}

fn camel(s: &str) -> String {
    s.to_upper_camel_case()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes() {
        assert_eq!(type_name("$rarity"), "Rarity");
        assert_eq!(type_name("player stats"), "PlayerStats");
        assert_eq!(type_name("int"), "Int");
        assert_eq!(field_name("max hp"), "MaxHp");
        assert_eq!(field_name("move_speed"), "MoveSpeed");
        assert_eq!(field_name("Id"), "Id");
    }
}
