//! Outbound message texts. Subscribers read Russian.

use crate::{ChatId, FailureKind, ProbeFailure, UserId};

pub const CURRENT_UNKNOWN: &str = "Не удалось определить текущий месяц.";

pub fn startup_snapshot(marker: &str) -> String {
    format!("Текущий месяц при старте: {marker}")
}

pub fn new_period(marker: &str) -> String {
    format!("Обнаружен новый месяц: {marker}")
}

pub fn recovered(marker: &str, changed: bool) -> String {
    if changed {
        format!("Сайт восстановился, текущий месяц обновился до: {marker}")
    } else {
        format!("Сайт восстановился, текущий месяц: {marker}")
    }
}

pub fn site_failure(failure: &ProbeFailure) -> String {
    match failure.kind {
        FailureKind::Transport => format!("Ошибка при запросе сайта: {}", failure.detail),
        FailureKind::Parse => format!("Ошибка при парсинге HTML: {}", failure.detail),
        FailureKind::MissingSelector => "Не удалось найти текущий месяц на сайте.".to_string(),
        FailureKind::Empty => "Не удалось определить значение первого месяца.".to_string(),
    }
}

pub fn current_period(marker: Option<&str>) -> String {
    match marker.map(str::trim).filter(|m| !m.is_empty()) {
        Some(marker) => marker.to_string(),
        None => CURRENT_UNKNOWN.to_string(),
    }
}

pub fn identity(user_id: Option<UserId>, chat_id: ChatId) -> String {
    let user_id = user_id.unwrap_or(chat_id);
    format!("User ID: {user_id}, Chat ID: {chat_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_period_trims_and_falls_back() {
        assert_eq!(current_period(Some("  Март 2024 \n")), "Март 2024");
        assert_eq!(current_period(Some("   ")), CURRENT_UNKNOWN);
        assert_eq!(current_period(None), CURRENT_UNKNOWN);
    }

    #[test]
    fn identity_prefers_sender_id() {
        assert_eq!(identity(Some(7), -100), "User ID: 7, Chat ID: -100");
        assert_eq!(identity(None, 42), "User ID: 42, Chat ID: 42");
    }

    #[test]
    fn failure_texts_follow_kind() {
        let transport = ProbeFailure::new(FailureKind::Transport, "timeout");
        assert_eq!(site_failure(&transport), "Ошибка при запросе сайта: timeout");
        let missing = ProbeFailure::new(FailureKind::MissingSelector, "");
        assert_eq!(
            site_failure(&missing),
            "Не удалось найти текущий месяц на сайте."
        );
    }
}
