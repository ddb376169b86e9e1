use super::*;

#[test]
fn default_provider_returns_source() {
    assert_eq!(DefaultTextProvider.text_for("Layer", "Hello"), "Hello");
}

#[test]
fn closures_are_providers() {
    let upper = |_: &str, source: &str| source.to_uppercase();
    assert_eq!(upper.text_for("Layer", "hello"), "HELLO");
}

#[test]
fn dictionary_replaces_known_keypaths_only() {
    let provider = DictionaryTextProvider::new(HashMap::from([(
        "Title".to_string(),
        "Replaced".to_string(),
    )]));
    assert_eq!(provider.text_for("Title", "Original"), "Replaced");
    assert_eq!(provider.text_for("Subtitle", "Original"), "Original");
}
