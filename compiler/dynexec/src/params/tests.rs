use super::*;
use pretty_assertions::assert_eq;

#[test]
fn none_is_absent() {
    let params = ParameterSet::none();
    assert!(params.is_absent());
    assert_eq!(params.len(), 0);
}

#[test]
fn empty_sequences_are_present() {
    let params = ParameterSet::new(Vec::new(), Vec::new(), Vec::new());
    assert!(!params.is_absent());
    assert!(params.is_empty());
}

#[test]
fn from_extracted_maps_types() {
    let extracted = vec![
        ExtractedParameter::new(Some("int"), "a"),
        ExtractedParameter::new(Some("List<int>"), "b"),
        ExtractedParameter::new(None, "c"),
    ];
    let params = ParameterSet::from_extracted(
        &extracted,
        vec!["1".to_string(), "2".to_string(), "3".to_string()],
    );
    assert_eq!(
        params,
        ParameterSet::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["1".to_string(), "2".to_string(), "3".to_string()],
            vec![
                SemanticType::Int32,
                SemanticType::Object,
                SemanticType::Object
            ],
        )
    );
}
