use scraper::{ElementRef, Html, Selector};

pub const DEFAULT_PERIOD_SELECTOR: &str = "select.form-select.periods";

/// One `<option>` of the period dropdown, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPeriod {
    /// The `value` attribute, trimmed; `None` when the attribute is absent.
    pub value: Option<String>,
    /// The option text with surrounding whitespace removed.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("no element matches `{0}`")]
    MissingSelector(String),
    #[error("`{0}` has no options")]
    NoOptions(String),
}

/// Reads the period dropdown out of a page.
#[derive(Debug, Clone)]
pub struct PeriodExtractor {
    selector_text: String,
    select: Selector,
    option: Selector,
}

impl PeriodExtractor {
    pub fn new(selector: &str) -> Result<Self, ExtractError> {
        let select = parse_selector(selector)?;
        let option = parse_selector("option")?;
        Ok(Self {
            selector_text: selector.to_string(),
            select,
            option,
        })
    }

    /// All options of the first matching dropdown.
    pub fn extract(&self, html: &str) -> Result<Vec<ExtractedPeriod>, ExtractError> {
        let doc = Html::parse_document(html);
        let dropdown = doc
            .select(&self.select)
            .next()
            .ok_or_else(|| ExtractError::MissingSelector(self.selector_text.clone()))?;

        let options: Vec<ExtractedPeriod> = dropdown.select(&self.option).map(read_option).collect();
        if options.is_empty() {
            return Err(ExtractError::NoOptions(self.selector_text.clone()));
        }
        Ok(options)
    }
}

fn read_option(element: ElementRef<'_>) -> ExtractedPeriod {
    let label = element.text().collect::<String>().trim().to_string();
    let value = element.value().attr("value").map(|v| v.trim().to_string());
    ExtractedPeriod { value, label }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|err| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{err:?}"),
    })
}
