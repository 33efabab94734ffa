#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The page was fetched and its period options extracted, in page order.
    Observed(Vec<crate::PeriodOption>),
    /// The page could not be fetched or did not yield a usable period.
    ProbeFailed(crate::ProbeFailure),
}
