//! History replay sent to a client right after it logs in.
//!
//! The replay is a single block: a header line, one narrated line per recent message
//! and a footer. Each line starts with a template phrase naming the author:
//!
//! - the first message of the window always uses template 0
//! - the last message uses template 9, see [`LastEntryRule`] for what "last" means
//! - every other message draws one of templates 2..=8 at random
//!
//! Template 1 is part of the table but is never drawn.

use std::ops::RangeInclusive;

use rand::Rng;

use super::{LogEntry, Login, MessageText};

/// Narration templates. `user` is replaced with the author's login.
pub const HISTORY_TEMPLATES: [&str; 10] = [
    "Началось все с user, который написал: ",
    "А потом user пишет: ",
    "А user такой: ",
    "Вдруг user дополняет: ",
    "А user ему: ",
    "А user выдаёт: ",
    "Неожиданно user: ",
    "user внезапно: ",
    "user отвечает: ",
    "И последнее от user: ",
];

const LOGIN_PLACEHOLDER: &str = "user";
const FIRST_TEMPLATE: usize = 0;
const LAST_TEMPLATE: usize = 9;
const INTERIOR_TEMPLATES: RangeInclusive<usize> = 2..=8;

pub const DEFAULT_HISTORY_WINDOW: usize = 10;
pub const HISTORY_HEADER: &str = "Ранее в чате:";
pub const HISTORY_FOOTER: &str = "-- Вы находитесь здесь --";
pub const EMPTY_HISTORY: &str = "В этом чате пока нет сообщений, будьте первым!\n";

/// Decides which window entry counts as "the last one" for template 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastEntryRule {
    /// Compare the window position with the length of the whole log.
    ///
    /// Once the log is longer than the window no position can match, so template 9
    /// only shows up while the whole log still fits in the window.
    #[default]
    LogLength,
    /// Mark the newest entry of the window.
    Newest,
}

/// The most recent slice of the session log, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryWindow {
    entries: Vec<LogEntry>,
    log_len: usize,
}

/// One window entry, annotated for template selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry<'a> {
    pub login: &'a Login,
    pub text: &'a MessageText,
    pub position: usize,
    pub is_last: bool,
}

impl HistoryWindow {
    pub fn new(entries: Vec<LogEntry>, log_len: usize) -> Self {
        Self { entries, log_len }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the full session log the window was cut from.
    pub fn log_len(&self) -> usize {
        self.log_len
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn entries(&self, rule: LastEntryRule) -> impl Iterator<Item = HistoryEntry<'_>> {
        let last_position = match rule {
            LastEntryRule::LogLength => self.log_len.checked_sub(1),
            LastEntryRule::Newest => self.entries.len().checked_sub(1),
        };
        self.entries
            .iter()
            .enumerate()
            .map(move |(position, entry)| HistoryEntry {
                login: &entry.login,
                text: &entry.text,
                position,
                is_last: Some(position) == last_position,
            })
    }
}

/// Pick the template index for a window position.
pub fn select_template<R: Rng>(position: usize, is_last: bool, rng: &mut R) -> usize {
    if position == 0 {
        FIRST_TEMPLATE
    } else if is_last {
        LAST_TEMPLATE
    } else {
        rng.gen_range(INTERIOR_TEMPLATES)
    }
}

/// Renders the history block for a newly logged-in client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryFormatter {
    window_size: usize,
    rule: LastEntryRule,
}

impl Default for HistoryFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW, LastEntryRule::default())
    }
}

impl HistoryFormatter {
    pub fn new(window_size: usize, rule: LastEntryRule) -> Self {
        Self { window_size, rule }
    }

    /// Maximum number of entries replayed.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn render<R: Rng>(&self, window: &HistoryWindow, rng: &mut R) -> String {
        if window.is_empty() {
            return EMPTY_HISTORY.to_string();
        }

        let mut history = format!("{HISTORY_HEADER}\n");
        for entry in window.entries(self.rule) {
            let template = HISTORY_TEMPLATES[select_template(entry.position, entry.is_last, rng)];
            history.push_str(&template.replace(LOGIN_PLACEHOLDER, entry.login.as_str()));
            history.push_str(entry.text.as_str());
            history.push('\n');
        }
        history.push_str(HISTORY_FOOTER);
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatLog, Timestamp};
    use rand::{SeedableRng, rngs::StdRng};

    fn log_with(messages: &[(&str, &str)]) -> ChatLog {
        let mut log = ChatLog::default();
        for (login, text) in messages {
            log.push(LogEntry::new(
                Login::new(*login),
                MessageText::new(*text),
                Timestamp::new(0),
            ));
        }
        log
    }

    fn numbered_log(count: usize) -> ChatLog {
        let mut log = ChatLog::default();
        for i in 0..count {
            log.push(LogEntry::new(
                Login::new(format!("u{i}")),
                MessageText::new(format!("m{i}")),
                Timestamp::new(0),
            ));
        }
        log
    }

    fn template_prefix(index: usize, login: &str) -> String {
        HISTORY_TEMPLATES[index].replace("user", login)
    }

    fn is_interior_line(line: &str, login: &str, text: &str) -> bool {
        INTERIOR_TEMPLATES.into_iter().any(|i| line == format!("{}{}", template_prefix(i, login), text))
    }

    #[test]
    fn test_select_template_first_position_wins() {
        // テスト項目: 先頭の位置は最後の位置でもテンプレート 0 になる
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_template(0, true, &mut rng), 0);
        assert_eq!(select_template(0, false, &mut rng), 0);
    }

    #[test]
    fn test_select_template_last_position() {
        // テスト項目: 最後の位置はテンプレート 9 になる
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_template(3, true, &mut rng), 9);
    }

    #[test]
    fn test_select_template_interior_never_uses_dead_entry() {
        // テスト項目: 中間の位置は 2..=8 から選ばれ、1 は選ばれない
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let index = select_template(4, false, &mut rng);
            assert!(INTERIOR_TEMPLATES.contains(&index), "unexpected template {index}");
        }
    }

    #[test]
    fn test_render_empty_history() {
        // テスト項目: 履歴が空の場合は最初の投稿を促すメッセージになる
        let formatter = HistoryFormatter::default();
        let mut rng = StdRng::seed_from_u64(1);

        let result = formatter.render(&ChatLog::default().recent(10), &mut rng);

        assert_eq!(result, "В этом чате пока нет сообщений, будьте первым!\n");
    }

    #[test]
    fn test_render_single_entry_uses_first_template() {
        // テスト項目: 1 件だけの場合はテンプレート 0 のみが使われる
        let formatter = HistoryFormatter::default();
        let mut rng = StdRng::seed_from_u64(1);
        let log = log_with(&[("alice", "hello")]);

        let result = formatter.render(&log.recent(10), &mut rng);

        assert_eq!(
            result,
            "Ранее в чате:\nНачалось все с alice, который написал: hello\n-- Вы находитесь здесь --"
        );
    }

    #[test]
    fn test_render_short_log_marks_last_entry() {
        // テスト項目: ログが窓に収まる場合、先頭は 0、末尾は 9、中間はランダムになる
        // given (前提条件):
        let formatter = HistoryFormatter::default();
        let mut rng = StdRng::seed_from_u64(42);
        let log = log_with(&[("alice", "one"), ("bob", "two"), ("carol", "three")]);

        // when (操作):
        let result = formatter.render(&log.recent(10), &mut rng);

        // then (期待する結果):
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], HISTORY_HEADER);
        assert_eq!(lines[1], "Началось все с alice, который написал: one");
        assert!(is_interior_line(lines[2], "bob", "two"), "{}", lines[2]);
        assert_eq!(lines[3], "И последнее от carol: three");
        assert_eq!(lines[4], HISTORY_FOOTER);
    }

    #[test]
    fn test_render_long_log_never_marks_last_with_log_length_rule() {
        // テスト項目: ログが窓より長い場合、LogLength ルールではテンプレート 9 が現れない
        // given (前提条件):
        let formatter = HistoryFormatter::new(10, LastEntryRule::LogLength);
        let mut rng = StdRng::seed_from_u64(3);
        let log = numbered_log(15);

        // when (操作):
        let result = formatter.render(&log.recent(formatter.window_size()), &mut rng);

        // then (期待する結果):
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[1], "Началось все с u5, который написал: m5");
        assert!(is_interior_line(lines[10], "u14", "m14"), "{}", lines[10]);
        assert!(!result.contains("И последнее от"));
    }

    #[test]
    fn test_render_long_log_marks_newest_with_newest_rule() {
        // テスト項目: Newest ルールでは窓の最後のエントリにテンプレート 9 が使われる
        let formatter = HistoryFormatter::new(10, LastEntryRule::Newest);
        let mut rng = StdRng::seed_from_u64(3);
        let log = numbered_log(15);

        let result = formatter.render(&log.recent(formatter.window_size()), &mut rng);

        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[10], "И последнее от u14: m14");
    }

    #[test]
    fn test_render_uses_each_entry_text() {
        // テスト項目: 各行には同じエントリの本文が使われる
        let formatter = HistoryFormatter::new(3, LastEntryRule::Newest);
        let mut rng = StdRng::seed_from_u64(9);
        let log = numbered_log(6);

        let result = formatter.render(&log.recent(formatter.window_size()), &mut rng);

        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[1], "Началось все с u3, который написал: m3");
        assert!(is_interior_line(lines[2], "u4", "m4"), "{}", lines[2]);
        assert_eq!(lines[3], "И последнее от u5: m5");
    }

    #[test]
    fn test_render_is_reproducible_with_same_seed() {
        // テスト項目: 同じシードの乱数源からは同じ出力が得られる
        let formatter = HistoryFormatter::default();
        let log = numbered_log(8);
        let window = log.recent(10);

        let first = formatter.render(&window, &mut StdRng::seed_from_u64(11));
        let second = formatter.render(&window, &mut StdRng::seed_from_u64(11));

        assert_eq!(first, second);
    }

    #[test]
    fn test_entries_flags_with_log_length_rule() {
        // テスト項目: LogLength ルールでは窓が全体を含む場合のみ末尾が last になる
        let short = numbered_log(3).recent(10);
        let flags: Vec<bool> = short.entries(LastEntryRule::LogLength).map(|e| e.is_last).collect();
        assert_eq!(flags, vec![false, false, true]);

        let long = numbered_log(12).recent(10);
        assert!(long.entries(LastEntryRule::LogLength).all(|e| !e.is_last));
    }
}
