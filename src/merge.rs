use crate::store::{StoreBuilder, Tables};

/// Overlay an included document onto the document that includes it.
///
/// Sections are merged key by key; the included value wins for any key the
/// including document has set so far. Keys assigned after the `include` line
/// are written later and win in turn. Section and key comments follow the
/// same rule.
pub fn merge_include(target: &mut StoreBuilder, included: Tables) {
    let tables = &mut target.tables;

    for (section, values) in included.sections {
        tables.sections.entry(section).or_default().extend(values);
    }
    tables.section_comments.extend(included.section_comments);
    tables.key_comments.extend(included.key_comments);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::DEFAULT_SECTION;

    fn builder(entries: &[(&str, &str, &str)]) -> StoreBuilder {
        let mut b = StoreBuilder::new();
        for (section, key, value) in entries {
            b.insert(section, key, value.to_string());
        }
        b
    }

    #[test]
    fn disjoint_sections_union() {
        let mut target = builder(&[(DEFAULT_SECTION, "HOST", "a")]);
        let included = builder(&[("DB", "URL", "pg://")]);
        merge_include(&mut target, included.tables);
        let store = target.build(None);
        assert_eq!(store.get("HOST").as_deref(), Some("a"));
        assert_eq!(store.get("DB::URL").as_deref(), Some("pg://"));
    }

    #[test]
    fn included_value_overwrites_earlier_key() {
        let mut target = builder(&[(DEFAULT_SECTION, "PORT", "1")]);
        let included = builder(&[(DEFAULT_SECTION, "PORT", "2")]);
        merge_include(&mut target, included.tables);
        assert_eq!(target.build(None).get("PORT").as_deref(), Some("2"));
    }

    #[test]
    fn later_assignment_wins_over_include() {
        let mut target = StoreBuilder::new();
        merge_include(&mut target, builder(&[(DEFAULT_SECTION, "PORT", "2")]).tables);
        target.insert(DEFAULT_SECTION, "PORT", "3".into());
        assert_eq!(target.build(None).get("PORT").as_deref(), Some("3"));
    }

    #[test]
    fn same_section_keys_are_merged_not_replaced() {
        let mut target = builder(&[("DB", "URL", "pg://local")]);
        let included = builder(&[("DB", "POOL", "5")]);
        merge_include(&mut target, included.tables);
        let store = target.build(None);
        assert_eq!(store.get("DB::URL").as_deref(), Some("pg://local"));
        assert_eq!(store.get("DB::POOL").as_deref(), Some("5"));
    }

    #[test]
    fn comments_carry_over() {
        let mut target = StoreBuilder::new();
        let mut included = builder(&[("DB", "URL", "pg://")]);
        included.set_section_comment("DB", " database".into());
        included.set_key_comment("DB", "URL", " primary".into());
        merge_include(&mut target, included.tables);
        let store = target.build(None);
        assert_eq!(store.section_comment("DB").as_deref(), Some(" database"));
        assert_eq!(store.key_comment("DB::URL").as_deref(), Some(" primary"));
    }
}
