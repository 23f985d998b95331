use ansible_roles_graph::graph::ExclusionFilter;
use ansible_roles_graph::parser;
use proptest::prelude::*;
use std::path::Path;

// Property-based tests: manifest extraction and exclusion parsing on arbitrary inputs
proptest! {
    // Extraction never panics on whatever YAML the decoder accepts
    #[test]
    fn extraction_never_panics_on_arbitrary_yaml(s in ".*") {
        if let Ok(data) = serde_yaml::from_str::<serde_yaml::Value>(&s) {
            let file = Path::new("/prop.yml");
            let _ = parser::extract_role_dependencies(&data, file);
            let _ = parser::extract_included_roles(&data, file);
            let _ = parser::extract_playbook_relations(&data, file);
        }
    }

    // Bare-name dependency lists come back verbatim and in order
    #[test]
    fn bare_dependencies_round_trip(names in proptest::collection::vec("[a-z][a-z0-9_]{0,12}", 0..8)) {
        let data = serde_yaml::Value::Mapping(serde_yaml::Mapping::from_iter([(
            serde_yaml::Value::from("dependencies"),
            serde_yaml::Value::from(names.clone()),
        )]));
        let deps = parser::extract_role_dependencies(&data, Path::new("/meta/main.yml")).unwrap();
        prop_assert_eq!(deps, names);
    }

    // Every non-blank item of a colon/comma list is excluded, nothing else
    #[test]
    fn exclusion_list_contains_each_item(items in proptest::collection::vec("[a-z.]{1,10}", 0..6), sep in prop_oneof![Just(':'), Just(',')]) {
        let joined = items.join(&sep.to_string());
        let filter = ExclusionFilter::parse(&joined);
        for item in &items {
            prop_assert!(filter.contains(item));
        }
        prop_assert!(!filter.contains("not-listed-role"));
    }
}
