use super::*;

#[test]
fn recognized_style_names_map_to_weights() {
    assert_eq!(FontWeight::from_style_name("UltraLight"), Some(FontWeight::ULTRA_LIGHT));
    assert_eq!(FontWeight::from_style_name("Thin"), Some(FontWeight::THIN));
    assert_eq!(FontWeight::from_style_name("Light"), Some(FontWeight::LIGHT));
    assert_eq!(FontWeight::from_style_name("Regular"), Some(FontWeight::REGULAR));
    assert_eq!(FontWeight::from_style_name("Medium"), Some(FontWeight::MEDIUM));
    assert_eq!(FontWeight::from_style_name("Black"), None);
}

#[test]
fn last_matching_entry_wins() {
    let list = FontList::new(vec![
        FontDescriptor::new("Inter", "Light"),
        FontDescriptor::new("Roboto", "Thin"),
        FontDescriptor::new("Inter", "Medium"),
    ]);
    let font = list.resolve("Inter", 18.0);
    assert_eq!(font.weight, FontWeight::MEDIUM);
    assert_eq!(font.size, 18.0);
    assert!(!font.generic);
}

#[test]
fn unrecognized_style_falls_back_to_generic() {
    let list = FontList::new(vec![FontDescriptor::new("Inter", "ExtraBold")]);
    let font = list.resolve("Inter", 12.0);
    assert!(font.generic);
    assert_eq!(font.weight, FontWeight::REGULAR);
    assert_eq!(font.family, "Inter");
}

#[test]
fn missing_list_yields_generic_font() {
    assert_eq!(
        resolve_font(None, "Helvetica", 10.0),
        ResolvedFont::generic("Helvetica", 10.0)
    );
}
