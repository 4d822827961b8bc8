use super::*;

#[test]
fn default_css_uses_stroke_and_overlay_style() {
    let css = StyleConfig::default().css(&OverlayConfig::default()).unwrap();
    assert!(css.contains("path { fill: none; stroke: #a08070; stroke-width: 1; }"));
    assert!(css.contains("path.no-data { fill: #ffffff; }"));
    assert!(css.contains("circle { fill: #ff0000; opacity: 0.1; }"));
}

#[test]
fn inline_stylesheet_replaces_default_and_external_is_appended() {
    let style = StyleConfig {
        stylesheet: Stylesheet::Inline("path { fill: blue; }".into()),
        external_stylesheet: Some(".x { stroke: none; }".into()),
        ..Default::default()
    };
    let css = style.css(&OverlayConfig::default()).unwrap();
    assert_eq!(css, "path { fill: blue; }\n.x { stroke: none; }");
}

#[test]
fn omitted_stylesheet_without_external_yields_no_block() {
    let style = StyleConfig {
        stylesheet: Stylesheet::Omitted,
        ..Default::default()
    };
    assert!(style.css(&OverlayConfig::default()).is_none());
}

#[test]
fn region_classes_append_data_tag() {
    let style = StyleConfig {
        classes: vec!["region".into(), "uk".into()],
        ..Default::default()
    };
    assert_eq!(style.region_classes(false, false), "region uk");
    assert_eq!(style.region_classes(true, true), "region uk has-data");
    assert_eq!(StyleConfig::default().region_classes(true, false), "no-data");
}

#[test]
fn no_data_fill_only_applies_when_tagged() {
    let style = StyleConfig::default();
    assert_eq!(style.region_fill(false, false), style.fill);
    assert_eq!(style.region_fill(true, true), style.fill);
    assert_eq!(style.region_fill(true, false), style.fill_no_data);
}
