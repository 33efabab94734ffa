use pretty_assertions::assert_eq;
use watch_engine::{
    decode_html, EncodingSource, ExtractError, ExtractedPeriod, PeriodExtractor,
    DEFAULT_PERIOD_SELECTOR,
};

fn extractor() -> PeriodExtractor {
    PeriodExtractor::new(DEFAULT_PERIOD_SELECTOR).unwrap()
}

#[test]
fn reads_every_option_trimmed_in_page_order() {
    let html = r#"
    <html><body>
      <select class="form-select other"><option value="x">Ignore me</option></select>
      <select name="period" class="form-select periods">
        <option value=" 2024-02 ">
            Февраль 2024
        </option>
        <option value="2024-01">Январь 2024</option>
        <option>Без значения</option>
      </select>
    </body></html>"#;

    let options = extractor().extract(html).unwrap();
    assert_eq!(
        options,
        vec![
            ExtractedPeriod {
                value: Some("2024-02".to_string()),
                label: "Февраль 2024".to_string(),
            },
            ExtractedPeriod {
                value: Some("2024-01".to_string()),
                label: "Январь 2024".to_string(),
            },
            ExtractedPeriod {
                value: None,
                label: "Без значения".to_string(),
            },
        ]
    );
}

#[test]
fn single_option_page_yields_trimmed_label() {
    let html = r#"<select class="form-select periods"><option value="v1">Jan 2024</option></select>"#;
    let options = extractor().extract(html).unwrap();
    assert_eq!(options[0].label, "Jan 2024");
    assert_eq!(options[0].value.as_deref(), Some("v1"));
}

#[test]
fn empty_page_reports_missing_selector() {
    let err = extractor().extract("").unwrap_err();
    assert_eq!(
        err,
        ExtractError::MissingSelector(DEFAULT_PERIOD_SELECTOR.to_string())
    );
}

#[test]
fn selector_needs_both_classes() {
    let html = r#"<select class="periods"><option>Jan 2024</option></select>"#;
    assert!(matches!(
        extractor().extract(html),
        Err(ExtractError::MissingSelector(_))
    ));
}

#[test]
fn dropdown_without_options_is_reported() {
    let html = r#"<select class="form-select periods"></select>"#;
    assert!(matches!(
        extractor().extract(html),
        Err(ExtractError::NoOptions(_))
    ));
}

#[test]
fn blank_option_text_is_empty_not_an_error() {
    let html = r#"<select class="form-select periods"><option value="v">   </option></select>"#;
    let options = extractor().extract(html).unwrap();
    assert_eq!(options[0].label, "");
}

#[test]
fn invalid_custom_selector_is_rejected() {
    assert!(matches!(
        PeriodExtractor::new("select[["),
        Err(ExtractError::InvalidSelector { .. })
    ));
}

#[test]
fn windows_1251_page_decodes_before_extraction() {
    let html = r#"<select class="form-select periods"><option value="2024-03">Март 2024</option></select>"#;
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(html);

    let decoded = decode_html(&bytes, Some("text/html; charset=windows-1251"), None).unwrap();
    assert_eq!(decoded.encoding_label, "windows-1251");
    assert_eq!(decoded.source, EncodingSource::ContentType);

    let options = extractor().extract(&decoded.html).unwrap();
    assert_eq!(options[0].label, "Март 2024");
}

#[test]
fn decode_handles_utf8_bom() {
    let bytes = b"\xEF\xBB\xBFhello";
    let decoded = decode_html(bytes, Some("text/html; charset=windows-1251"), None).unwrap();
    assert_eq!(decoded.html, "hello");
    assert_eq!(decoded.encoding_label, "UTF-8");
    assert_eq!(decoded.source, EncodingSource::ByteOrderMark);
}

#[test]
fn undeclared_cyrillic_page_is_detected_with_ru_hint() {
    let html = "<html><body><p>Результаты расчета фактических почасовых объемов за период</p>\
        <select class=\"form-select periods\"><option value=\"2024-03\">Март 2024</option>\
        <option value=\"2024-02\">Февраль 2024</option></select></body></html>";
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(html);

    let decoded = decode_html(&bytes, Some("text/html"), Some("ru")).unwrap();
    assert_eq!(decoded.source, EncodingSource::Detected);
    assert_eq!(decoded.encoding_label, "windows-1251");

    let options = extractor().extract(&decoded.html).unwrap();
    assert_eq!(options[0].label, "Март 2024");
}
